use crate::api::{non_blank, ApiError, ApiResult, CurrentUser};
use crate::entities::{school, user, user::Role, School, User};
use axum::extract::{Extension, Json};
use axum_extra::extract::WithRejection;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const ONBOARDING_PATH: &str = "/onboarding";

/// Where the portal sends a user after sign-in.
pub fn landing_path(role: Option<Role>) -> &'static str {
    match role {
        Some(role) => role.dashboard_path(),
        None => ONBOARDING_PATH,
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Option<Role>,
    pub phone: Option<String>,
    pub school_id: Option<i32>,
    pub school_name: Option<String>,
    pub dashboard: &'static str,
}

impl ProfileView {
    fn new(user: user::Model, school: Option<school::Model>) -> Self {
        Self {
            dashboard: landing_path(user.role),
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            phone: user.phone,
            school_id: user.school_id,
            school_name: school.map(|s| s.name),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    role: Option<String>,
    school_id: Option<i32>,
    phone: Option<String>,
}

pub async fn get_profile(
    Extension(db): Extension<DatabaseConnection>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<Value>> {
    let (user, school) = User::find_by_id(current.id)
        .find_also_related(School)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    Ok(Json(json!({ "user": ProfileView::new(user, school) })))
}

pub async fn update_profile(
    Extension(db): Extension<DatabaseConnection>,
    Extension(current): Extension<CurrentUser>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateProfileRequest>, ApiError>,
) -> ApiResult<Json<Value>> {
    let role = match non_blank(payload.role) {
        Some(raw) => Some(
            Role::parse(&raw)
                .ok_or_else(|| ApiError::validation("Role must be one of parent, teacher, admin"))?,
        ),
        None => None,
    };
    let phone = non_blank(payload.phone);

    if role.is_none() && payload.school_id.is_none() && phone.is_none() {
        return Err(ApiError::validation("No valid fields to update"));
    }

    let school = match payload.school_id {
        Some(school_id) => Some(
            School::find_by_id(school_id)
                .one(&db)
                .await?
                .ok_or(ApiError::NotFound("School not found"))?,
        ),
        None => None,
    };

    let user = User::find_by_id(current.id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    // Onboarding assigns role and school once
    if matches!((user.role, role), (Some(held), Some(wanted)) if held != wanted) {
        return Err(ApiError::Forbidden("Role is already assigned"));
    }
    if let (Some(held), Some(school)) = (user.school_id, &school) {
        if held != school.id {
            return Err(ApiError::Forbidden("School is already assigned"));
        }
    }

    let mut active_user = user.into_active_model();
    if let Some(role) = role {
        active_user.role = Set(Some(role));
    }
    if let Some(school) = &school {
        active_user.school_id = Set(Some(school.id));
    }
    if let Some(phone) = phone {
        active_user.phone = Set(Some(phone));
    }
    active_user.updated_at = Set(chrono::Utc::now().naive_utc());

    let updated = active_user.update(&db).await?;

    tracing::Span::current()
        .record("table", "users")
        .record("action", "update_profile")
        .record("business_event", "Profile updated");

    // The school may be unchanged by this request
    let school = match (school, updated.school_id) {
        (Some(school), _) => Some(school),
        (None, Some(school_id)) => School::find_by_id(school_id).one(&db).await?,
        (None, None) => None,
    };

    Ok(Json(json!({ "user": ProfileView::new(updated, school) })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn users_without_a_role_go_to_onboarding() {
        assert_eq!(landing_path(None), ONBOARDING_PATH);
        assert_eq!(landing_path(Some(Role::Parent)), "/parent/dashboard");
    }
}
