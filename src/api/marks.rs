use crate::alerting;
use crate::api::students::find_student;
use crate::api::{non_blank, ApiError, ApiResult, CurrentUser};
use crate::entities::{mark, Mark};
use crate::performance;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Select,
    Set,
};
use serde::Deserialize;
use serde_json::{json, Value};

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

#[derive(Deserialize)]
pub struct RecordMarkRequest {
    subject: Option<String>,
    score: Option<f64>,
    term: Option<String>,
}

#[derive(Deserialize)]
pub struct TermFilter {
    term: Option<String>,
}

pub fn validate_score(score: f64) -> ApiResult<f64> {
    if score.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(score)
    } else {
        Err(ApiError::validation("Score must be between 0 and 100"))
    }
}

fn marks_for(student_id: i32, term: Option<String>) -> Select<Mark> {
    let query = Mark::find().filter(mark::Column::StudentId.eq(student_id));
    match non_blank(term) {
        Some(term) => query.filter(mark::Column::Term.eq(term)),
        None => query,
    }
}

// POST /students/:id/marks
pub async fn record_mark(
    Extension(db): Extension<DatabaseConnection>,
    Extension(current): Extension<CurrentUser>,
    WithRejection(Path(student_id), _): WithRejection<Path<i32>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<RecordMarkRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    current.require_staff()?;

    let (Some(subject), Some(score), Some(term)) = (
        non_blank(payload.subject),
        payload.score,
        non_blank(payload.term),
    ) else {
        return Err(ApiError::validation("Subject, score, and term are required"));
    };
    let score = validate_score(score)?;

    find_student(&db, student_id).await?;

    let recorded = mark::ActiveModel {
        student_id: Set(student_id),
        subject: Set(subject),
        score: Set(score),
        term: Set(term),
        date_entered: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    tracing::Span::current()
        .record("table", "marks")
        .record("action", "record_mark")
        .record("student_id", student_id)
        .record("business_event", "Mark recorded");
    crate::metrics::increment_marks_recorded();

    // The mark is stored; alerting can only degrade to "no alert"
    alerting::notify_parent(&db, &recorded).await;

    Ok((StatusCode::CREATED, Json(json!({ "mark": recorded }))))
}

// GET /students/:id/marks
pub async fn list_marks(
    Extension(db): Extension<DatabaseConnection>,
    WithRejection(Path(student_id), _): WithRejection<Path<i32>, ApiError>,
    WithRejection(Query(filter), _): WithRejection<Query<TermFilter>, ApiError>,
) -> ApiResult<Json<Value>> {
    find_student(&db, student_id).await?;

    let marks = marks_for(student_id, filter.term)
        .order_by_desc(mark::Column::DateEntered)
        .order_by_desc(mark::Column::Id)
        .all(&db)
        .await?;

    Ok(Json(json!({ "marks": marks })))
}

// GET /students/:id/performance
pub async fn get_performance(
    Extension(db): Extension<DatabaseConnection>,
    WithRejection(Path(student_id), _): WithRejection<Path<i32>, ApiError>,
    WithRejection(Query(filter), _): WithRejection<Query<TermFilter>, ApiError>,
) -> ApiResult<Json<Value>> {
    find_student(&db, student_id).await?;

    let marks = marks_for(student_id, filter.term)
        .order_by_asc(mark::Column::Subject)
        .order_by_desc(mark::Column::DateEntered)
        .order_by_desc(mark::Column::Id)
        .all(&db)
        .await?;

    let summary = performance::summarize(student_id, marks);

    Ok(Json(json!({ "performance": summary })))
}
