use crate::api::{optional_id, true_flag, ApiError, ApiResult};
use crate::entities::{alert, student, Alert, Student};
use axum::extract::{Extension, Json, Query};
use axum_extra::extract::WithRejection;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Serialize)]
pub struct AlertView {
    #[serde(flatten)]
    pub alert: alert::Model,
    pub student_name: Option<String>,
}

impl AlertView {
    fn new(alert: alert::Model, student: Option<student::Model>) -> Self {
        Self {
            alert,
            student_name: student.map(|s| s.name),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertFilter {
    #[serde(default, deserialize_with = "optional_id")]
    parent_id: Option<i32>,
    #[serde(default, deserialize_with = "optional_id")]
    student_id: Option<i32>,
    #[serde(default, deserialize_with = "true_flag")]
    unread_only: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadRequest {
    alert_id: Option<i32>,
}

// GET /alerts
pub async fn list_alerts(
    Extension(db): Extension<DatabaseConnection>,
    WithRejection(Query(filter), _): WithRejection<Query<AlertFilter>, ApiError>,
) -> ApiResult<Json<Value>> {
    let mut query = Alert::find().find_also_related(Student);
    if let Some(parent_id) = filter.parent_id {
        query = query.filter(alert::Column::ParentId.eq(parent_id));
    }
    if let Some(student_id) = filter.student_id {
        query = query.filter(alert::Column::StudentId.eq(student_id));
    }
    if filter.unread_only {
        query = query.filter(alert::Column::Read.eq(false));
    }

    let alerts: Vec<AlertView> = query
        .order_by_desc(alert::Column::SentAt)
        .order_by_desc(alert::Column::Id)
        .all(&db)
        .await?
        .into_iter()
        .map(|(a, s)| AlertView::new(a, s))
        .collect();

    Ok(Json(json!({ "alerts": alerts })))
}

// PUT /alerts
pub async fn mark_alert_read(
    Extension(db): Extension<DatabaseConnection>,
    WithRejection(Json(payload), _): WithRejection<Json<MarkReadRequest>, ApiError>,
) -> ApiResult<Json<Value>> {
    let alert_id = payload
        .alert_id
        .ok_or_else(|| ApiError::validation("Alert ID is required"))?;

    let existing = Alert::find_by_id(alert_id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("Alert not found"))?;

    // Re-reading an alert is a no-op
    if existing.read {
        return Ok(Json(json!({ "alert": existing })));
    }

    let mut active_alert = existing.into_active_model();
    active_alert.read = Set(true);
    let updated = active_alert.update(&db).await?;

    tracing::Span::current()
        .record("table", "alerts")
        .record("action", "mark_alert_read")
        .record("student_id", updated.student_id);
    crate::metrics::record_alert_read();

    Ok(Json(json!({ "alert": updated })))
}
