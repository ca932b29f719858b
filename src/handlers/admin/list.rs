// handlers/admin/list.rs - GET /api/admin/users

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};
use std::collections::HashSet;

use crate::directory::model::{Group, Role};
use crate::error::ApiError;
use crate::handlers::admin::require_admin;
use crate::handlers::AppState;

/// Full-directory listing with per-role counts. Group membership is
/// resolved in bulk, one sweep per group.
pub async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    require_admin(&headers)?;

    let mut all_users = Vec::new();
    let mut token = None;
    loop {
        let page = state.directory.list_users(token).await?;
        all_users.extend(page.users);
        match page.next {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    let admins = users_in_group(&state, Group::Admin).await?;
    let city_officials = users_in_group(&state, Group::CityOfficial).await?;

    let mut admin_count = 0usize;
    let mut city_official_count = 0usize;
    let mut citizens_count = 0usize;
    let mut users_data = Vec::with_capacity(all_users.len());

    for user in &all_users {
        let role = if admins.contains(&user.username) {
            admin_count += 1;
            Role::Admin
        } else if city_officials.contains(&user.username) {
            city_official_count += 1;
            Role::CityOfficial
        } else {
            citizens_count += 1;
            Role::Citizen
        };

        users_data.push(json!({
            "user_id": user.username,
            "name": user.attribute("name"),
            "email": user.attribute("email"),
            "telephone": user.attribute("telephone"),
            "region": user.attribute("region"),
            "city": user.attribute("city"),
            "role": role,
        }));
    }

    tracing::info!(total = all_users.len(), "successfully retrieved user data");

    Ok(Json(json!({
        "counts": {
            "total_users": all_users.len(),
            "admin": admin_count,
            "city_official": city_official_count,
            "citizens": citizens_count,
        },
        "users": users_data,
    })))
}

async fn users_in_group(state: &AppState, group: Group) -> Result<HashSet<String>, ApiError> {
    let mut members = HashSet::new();
    let mut token = None;
    loop {
        let page = state.directory.list_users_in_group(group, token).await?;
        members.extend(page.usernames);
        match page.next {
            Some(next) => token = Some(next),
            None => break,
        }
    }
    Ok(members)
}
