// Temporary credential generation

use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use rand::Rng;

const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
const SPECIAL: &[u8] = b"!@#$%^&*()-_=+[]{}|;:,.<>?/";

const FILLER_LENGTH: usize = 4;

/// Generate a temporary password carrying at least one character from
/// each class the directory's password policy requires. Drawn from the
/// OS entropy source.
pub fn generate_temporary_password() -> String {
    let mut rng = OsRng;

    let mut chars = vec![
        pick(&mut rng, UPPER),
        pick(&mut rng, LOWER),
        pick(&mut rng, DIGITS),
        pick(&mut rng, SPECIAL),
    ];

    let all: Vec<u8> = [UPPER, LOWER, DIGITS, SPECIAL].concat();
    for _ in 0..FILLER_LENGTH {
        chars.push(pick(&mut rng, &all));
    }

    chars.shuffle(&mut rng);
    format!("temp{}", chars.into_iter().collect::<String>())
}

fn pick(rng: &mut OsRng, set: &[u8]) -> char {
    set[rng.gen_range(0..set.len())] as char
}
