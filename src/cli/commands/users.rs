use serde_json::Value;

use crate::cli::utils::{expect_success, print_json, ApiClient};
use crate::cli::OutputFormat;

pub async fn handle(client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    let (status, body) = client.get("/api/admin/users").await?;
    expect_success(status, &body)?;

    match output_format {
        OutputFormat::Json => print_json(&body),
        OutputFormat::Text => {
            if let Some(counts) = body.get("counts") {
                println!(
                    "Total: {}  Admin: {}  CityOfficial: {}  Citizens: {}",
                    counts.get("total_users").and_then(Value::as_u64).unwrap_or(0),
                    counts.get("admin").and_then(Value::as_u64).unwrap_or(0),
                    counts.get("city_official").and_then(Value::as_u64).unwrap_or(0),
                    counts.get("citizens").and_then(Value::as_u64).unwrap_or(0),
                );
            }

            let empty = Vec::new();
            let users = body.get("users").and_then(Value::as_array).unwrap_or(&empty);
            if users.is_empty() {
                println!("No users found");
                return Ok(());
            }

            println!("{:<35} {:<25} {:<15} {}", "USER", "NAME", "ROLE", "CITY");
            println!("{}", "-".repeat(90));
            for user in users {
                println!(
                    "{:<35} {:<25} {:<15} {}",
                    user.get("user_id").and_then(Value::as_str).unwrap_or("?"),
                    user.get("name").and_then(Value::as_str).unwrap_or("-"),
                    user.get("role").and_then(Value::as_str).unwrap_or("-"),
                    user.get("city").and_then(Value::as_str).unwrap_or("-"),
                );
            }
            Ok(())
        }
    }
}
