use serde_json::{json, Value};

use crate::cli::utils::{expect_success, print_json, ApiClient};
use crate::cli::OutputFormat;

pub async fn handle(
    client: &ApiClient,
    file: &str,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let (status, body) = client
        .post("/api/ops/restore", &json!({ "file": file }))
        .await?;
    expect_success(status, &body)?;

    match output_format {
        OutputFormat::Json => print_json(&body),
        OutputFormat::Text => {
            println!(
                "Restore completed: {} restored, {} skipped, {} failed",
                body.get("restored_count").and_then(Value::as_u64).unwrap_or(0),
                body.get("skipped_count").and_then(Value::as_u64).unwrap_or(0),
                body.get("failed_count").and_then(Value::as_u64).unwrap_or(0),
            );
            if let Some(errors) = body.get("errors").and_then(Value::as_array) {
                for error in errors {
                    println!(
                        "  {}: {}",
                        error.get("username").and_then(Value::as_str).unwrap_or("?"),
                        error.get("error").and_then(Value::as_str).unwrap_or("?"),
                    );
                }
            }
            Ok(())
        }
    }
}
