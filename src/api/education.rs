use crate::api::{non_blank, ApiError, ApiResult, CurrentUser};
use crate::entities::{education_content, EducationContent};
use axum::{
    extract::{Extension, Json, Query},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize)]
pub struct ContentFilter {
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContentRequest {
    title: Option<String>,
    description: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    link: Option<String>,
    thumbnail_url: Option<String>,
}

// GET /education-content
pub async fn list_content(
    Extension(db): Extension<DatabaseConnection>,
    WithRejection(Query(filter), _): WithRejection<Query<ContentFilter>, ApiError>,
) -> ApiResult<Json<Value>> {
    let mut query = EducationContent::find();
    if let Some(kind) = non_blank(filter.kind) {
        query = query.filter(education_content::Column::Kind.eq(kind));
    }

    let content = query
        .order_by_desc(education_content::Column::CreatedAt)
        .order_by_desc(education_content::Column::Id)
        .all(&db)
        .await?;

    Ok(Json(json!({ "content": content })))
}

// POST /education-content
pub async fn create_content(
    Extension(db): Extension<DatabaseConnection>,
    Extension(current): Extension<CurrentUser>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateContentRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    current.require_admin()?;

    let (Some(title), Some(kind), Some(link)) = (
        non_blank(payload.title),
        non_blank(payload.kind),
        non_blank(payload.link),
    ) else {
        return Err(ApiError::validation("Title, type, and link are required"));
    };

    let created = education_content::ActiveModel {
        title: Set(title),
        description: Set(non_blank(payload.description)),
        kind: Set(kind),
        link: Set(link),
        thumbnail_url: Set(non_blank(payload.thumbnail_url)),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    tracing::Span::current()
        .record("table", "education_content")
        .record("action", "create_content")
        .record("business_event", "Education content created");

    Ok((StatusCode::CREATED, Json(json!({ "content": created }))))
}
