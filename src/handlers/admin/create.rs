// handlers/admin/create.rs - POST /api/admin/users

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::directory::model::Group;
use crate::directory::NewUser;
use crate::error::ApiError;
use crate::handlers::admin::require_admin;
use crate::handlers::AppState;
use crate::notify::{LifecycleEvent, RecipientContext};
use crate::services::password::generate_temporary_password;

/// Invite a privileged user: create the directory entry keyed by email,
/// place it in the requested group and render the invitation email.
pub async fn create_admin_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    require_admin(&headers)?;

    let email = required_field(&body, "email")?;
    let name = required_field(&body, "name")?;
    let region = required_field(&body, "region")?;
    let city = required_field(&body, "city")?;
    let telephone = required_field(&body, "telephone")?;
    let role = required_field(&body, "role")?;

    let group = Group::parse(&role)
        .ok_or_else(|| ApiError::bad_request("Only Admin or CityOfficial allowed"))?;

    tracing::info!(email = %email, role = %group, "processing user creation request");

    let temporary_password = generate_temporary_password();
    let attributes: BTreeMap<String, String> = [
        ("email", email.clone()),
        ("name", name.clone()),
        ("region", region),
        ("city", city),
        ("telephone", telephone),
        ("email_verified", "true".to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    state
        .directory
        .create_user(NewUser {
            username: email.clone(),
            attributes,
            temporary_password: temporary_password.clone(),
            suppress_invitation: false,
        })
        .await?;

    state.directory.add_user_to_group(&email, group).await?;

    // Delivery belongs to an external collaborator; hand the rendered
    // message to the log for pickup.
    let invitation = state.notifier.render(
        LifecycleEvent::AdminInvite,
        &RecipientContext {
            name: name.clone(),
            username: email.clone(),
            code: temporary_password,
        },
    );
    tracing::info!(recipient = %email, subject = %invitation.subject,
        "invitation rendered for delivery");

    tracing::info!(name = %name, role = %group, "user created successfully");

    Ok(Json(json!({
        "message": format!("{} {} invited successfully", group, name)
    })))
}

fn required_field(body: &Value, name: &str) -> Result<String, ApiError> {
    body.get(name)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .ok_or_else(|| ApiError::bad_request(format!("Missing required field '{}'", name)))
}
