use crate::api::{deserialize_some, non_blank, ApiError, ApiResult, CurrentUser};
use crate::entities::{school, School};
use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Branding fields applied to a school's portal views.
#[derive(Debug, Serialize)]
pub struct ThemeView {
    pub id: i32,
    pub name: String,
    pub logo_url: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub font_style: String,
}

impl From<school::Model> for ThemeView {
    fn from(model: school::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            logo_url: model.logo_url,
            primary_color: model.primary_color,
            secondary_color: model.secondary_color,
            font_style: model.font_style,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSchoolRequest {
    name: Option<String>,
    logo_url: Option<String>,
    primary_color: Option<String>,
    secondary_color: Option<String>,
    font_style: Option<String>,
    subscription_plan: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateThemeRequest {
    #[serde(default, deserialize_with = "deserialize_some")]
    logo_url: Option<Option<String>>,
    primary_color: Option<String>,
    secondary_color: Option<String>,
    font_style: Option<String>,
}

async fn find_school(db: &DatabaseConnection, school_id: i32) -> ApiResult<school::Model> {
    School::find_by_id(school_id)
        .one(db)
        .await?
        .ok_or(ApiError::NotFound("School not found"))
}

// POST /schools
pub async fn create_school(
    Extension(db): Extension<DatabaseConnection>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateSchoolRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let name = non_blank(payload.name).ok_or_else(|| ApiError::validation("School name is required"))?;

    let created = school::ActiveModel {
        name: Set(name),
        logo_url: Set(non_blank(payload.logo_url)),
        primary_color: Set(non_blank(payload.primary_color)
            .unwrap_or_else(|| school::DEFAULT_PRIMARY_COLOR.to_string())),
        secondary_color: Set(non_blank(payload.secondary_color)
            .unwrap_or_else(|| school::DEFAULT_SECONDARY_COLOR.to_string())),
        font_style: Set(non_blank(payload.font_style)
            .unwrap_or_else(|| school::DEFAULT_FONT_STYLE.to_string())),
        subscription_plan: Set(non_blank(payload.subscription_plan)
            .unwrap_or_else(|| school::DEFAULT_SUBSCRIPTION_PLAN.to_string())),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    tracing::Span::current()
        .record("table", "schools")
        .record("action", "create_school")
        .record("business_event", "School created");

    Ok((StatusCode::CREATED, Json(json!({ "school": created }))))
}

// GET /schools/:id/theme
pub async fn get_theme(
    Extension(db): Extension<DatabaseConnection>,
    WithRejection(Path(school_id), _): WithRejection<Path<i32>, ApiError>,
) -> ApiResult<Json<Value>> {
    let school = find_school(&db, school_id).await?;
    Ok(Json(json!({ "theme": ThemeView::from(school) })))
}

// PUT /schools/:id/theme
pub async fn update_theme(
    Extension(db): Extension<DatabaseConnection>,
    Extension(current): Extension<CurrentUser>,
    WithRejection(Path(school_id), _): WithRejection<Path<i32>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateThemeRequest>, ApiError>,
) -> ApiResult<Json<Value>> {
    let primary_color = non_blank(payload.primary_color);
    let secondary_color = non_blank(payload.secondary_color);
    let font_style = non_blank(payload.font_style);
    if payload.logo_url.is_none()
        && primary_color.is_none()
        && secondary_color.is_none()
        && font_style.is_none()
    {
        return Err(ApiError::validation("No valid fields to update"));
    }

    let school = find_school(&db, school_id).await?;
    current.require_school_admin(school_id)?;

    let mut active_school = school.into_active_model();
    if let Some(logo_url) = payload.logo_url {
        active_school.logo_url = Set(non_blank(logo_url));
    }
    if let Some(primary_color) = primary_color {
        active_school.primary_color = Set(primary_color);
    }
    if let Some(secondary_color) = secondary_color {
        active_school.secondary_color = Set(secondary_color);
    }
    if let Some(font_style) = font_style {
        active_school.font_style = Set(font_style);
    }

    let updated = active_school.update(&db).await?;

    tracing::Span::current()
        .record("table", "schools")
        .record("action", "update_theme")
        .record("business_event", "School theme updated");

    Ok(Json(json!({ "theme": ThemeView::from(updated) })))
}
