use serde_json::Value;

use crate::cli::utils::{print_json, ApiClient};
use crate::cli::OutputFormat;

pub async fn handle(client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    // A 503 still carries a meaningful status body.
    let (_status, body) = client.get("/health").await?;

    match output_format {
        OutputFormat::Json => print_json(&body),
        OutputFormat::Text => {
            println!(
                "{}: {}",
                body.get("status").and_then(Value::as_str).unwrap_or("UNKNOWN"),
                body.get("details").and_then(Value::as_str).unwrap_or(""),
            );
            Ok(())
        }
    }
}
