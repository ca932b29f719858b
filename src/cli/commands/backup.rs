use serde_json::{json, Value};

use crate::cli::utils::{expect_success, print_json, ApiClient};
use crate::cli::OutputFormat;

pub async fn handle(client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    let (status, body) = client.post("/api/ops/backup", &json!({})).await?;
    expect_success(status, &body)?;

    match output_format {
        OutputFormat::Json => print_json(&body),
        OutputFormat::Text => {
            println!(
                "Backup written to {}",
                body.get("file").and_then(Value::as_str).unwrap_or("?")
            );
            println!(
                "  users: {}, degraded: {}",
                body.get("user_count").and_then(Value::as_u64).unwrap_or(0),
                body.get("degraded_count").and_then(Value::as_u64).unwrap_or(0),
            );
            Ok(())
        }
    }
}
