use crate::api::{deserialize_some, non_blank, optional_id, ApiError, ApiResult, CurrentUser};
use crate::entities::{student, user, School, Student, User};
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A student row together with its parent's contact details.
#[derive(Debug, Serialize)]
pub struct StudentView {
    #[serde(flatten)]
    pub student: student::Model,
    pub parent_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_phone: Option<String>,
}

impl StudentView {
    fn summary(student: student::Model, parent: Option<user::Model>) -> Self {
        Self {
            student,
            parent_name: parent.map(|p| p.name),
            parent_email: None,
            parent_phone: None,
        }
    }

    fn detail(student: student::Model, parent: Option<user::Model>) -> Self {
        match parent {
            Some(p) => Self {
                student,
                parent_name: Some(p.name),
                parent_email: Some(p.email),
                parent_phone: p.phone,
            },
            None => Self::summary(student, None),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentFilter {
    #[serde(default, deserialize_with = "optional_id")]
    parent_id: Option<i32>,
    #[serde(default, deserialize_with = "optional_id")]
    school_id: Option<i32>,
    #[serde(rename = "class")]
    class_name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequest {
    name: Option<String>,
    #[serde(rename = "class")]
    class_name: Option<String>,
    stream: Option<String>,
    school_id: Option<i32>,
    parent_id: Option<i32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    name: Option<String>,
    #[serde(rename = "class")]
    class_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    stream: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    parent_id: Option<Option<i32>>,
}

pub(crate) async fn find_student(db: &DatabaseConnection, student_id: i32) -> ApiResult<student::Model> {
    Student::find_by_id(student_id)
        .one(db)
        .await?
        .ok_or(ApiError::NotFound("Student not found"))
}

async fn ensure_parent_exists(db: &DatabaseConnection, parent_id: i32) -> ApiResult<()> {
    match User::find_by_id(parent_id).one(db).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::NotFound("Parent not found")),
    }
}

// GET /students
pub async fn list_students(
    Extension(db): Extension<DatabaseConnection>,
    WithRejection(Query(filter), _): WithRejection<Query<StudentFilter>, ApiError>,
) -> ApiResult<Json<Value>> {
    let mut query = Student::find().find_also_related(User);
    if let Some(parent_id) = filter.parent_id {
        query = query.filter(student::Column::ParentId.eq(parent_id));
    }
    if let Some(school_id) = filter.school_id {
        query = query.filter(student::Column::SchoolId.eq(school_id));
    }
    if let Some(class_name) = non_blank(filter.class_name) {
        query = query.filter(student::Column::ClassName.eq(class_name));
    }

    let students: Vec<StudentView> = query
        .order_by_asc(student::Column::Name)
        .order_by_asc(student::Column::Id)
        .all(&db)
        .await?
        .into_iter()
        .map(|(s, parent)| StudentView::summary(s, parent))
        .collect();

    Ok(Json(json!({ "students": students })))
}

// POST /students
pub async fn create_student(
    Extension(db): Extension<DatabaseConnection>,
    Extension(current): Extension<CurrentUser>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateStudentRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    current.require_staff()?;

    let (Some(name), Some(class_name), Some(school_id)) = (
        non_blank(payload.name),
        non_blank(payload.class_name),
        payload.school_id,
    ) else {
        return Err(ApiError::validation("Name, class, and school ID are required"));
    };

    if School::find_by_id(school_id).one(&db).await?.is_none() {
        return Err(ApiError::NotFound("School not found"));
    }
    if let Some(parent_id) = payload.parent_id {
        ensure_parent_exists(&db, parent_id).await?;
    }

    let created = student::ActiveModel {
        name: Set(name),
        class_name: Set(class_name),
        stream: Set(non_blank(payload.stream)),
        school_id: Set(school_id),
        parent_id: Set(payload.parent_id),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    tracing::Span::current()
        .record("table", "students")
        .record("action", "create_student")
        .record("student_id", created.id)
        .record("business_event", "Student created");
    crate::metrics::increment_students_created();

    Ok((StatusCode::CREATED, Json(json!({ "student": created }))))
}

// GET /students/:id
pub async fn get_student(
    Extension(db): Extension<DatabaseConnection>,
    WithRejection(Path(student_id), _): WithRejection<Path<i32>, ApiError>,
) -> ApiResult<Json<Value>> {
    let (student, parent) = Student::find_by_id(student_id)
        .find_also_related(User)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("Student not found"))?;

    Ok(Json(json!({ "student": StudentView::detail(student, parent) })))
}

// PUT /students/:id
pub async fn update_student(
    Extension(db): Extension<DatabaseConnection>,
    Extension(current): Extension<CurrentUser>,
    WithRejection(Path(student_id), _): WithRejection<Path<i32>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateStudentRequest>, ApiError>,
) -> ApiResult<Json<Value>> {
    current.require_staff()?;

    let name = non_blank(payload.name);
    let class_name = non_blank(payload.class_name);
    if name.is_none()
        && class_name.is_none()
        && payload.stream.is_none()
        && payload.parent_id.is_none()
    {
        return Err(ApiError::validation("No valid fields to update"));
    }

    let student = find_student(&db, student_id).await?;
    if let Some(Some(parent_id)) = payload.parent_id {
        ensure_parent_exists(&db, parent_id).await?;
    }

    let mut active_student = student.into_active_model();
    if let Some(name) = name {
        active_student.name = Set(name);
    }
    if let Some(class_name) = class_name {
        active_student.class_name = Set(class_name);
    }
    if let Some(stream) = payload.stream {
        active_student.stream = Set(non_blank(stream));
    }
    if let Some(parent_id) = payload.parent_id {
        active_student.parent_id = Set(parent_id);
    }

    let updated = active_student.update(&db).await?;

    tracing::Span::current()
        .record("table", "students")
        .record("action", "update_student")
        .record("student_id", updated.id);

    Ok(Json(json!({ "student": updated })))
}
