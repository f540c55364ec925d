use crate::entities::{alert, alert::AlertKind, mark, student, user};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

pub async fn init_metrics(db: &DatabaseConnection) {
    // Total Counts
    let user_count = user::Entity::find().count(db).await.unwrap_or(0);
    metrics::gauge!("shulea_users_total").set(user_count as f64);

    let student_count = student::Entity::find().count(db).await.unwrap_or(0);
    metrics::gauge!("shulea_students_total").set(student_count as f64);

    let mark_count = mark::Entity::find().count(db).await.unwrap_or(0);
    metrics::gauge!("shulea_marks_total").set(mark_count as f64);

    let unread_alerts = alert::Entity::find()
        .filter(alert::Column::Read.eq(false))
        .count(db)
        .await
        .unwrap_or(0);
    metrics::gauge!("shulea_unread_alerts_total").set(unread_alerts as f64);

    tracing::info!(
        "Initialized metrics: Users={}, Students={}, Marks={}, UnreadAlerts={}",
        user_count,
        student_count,
        mark_count,
        unread_alerts
    );
}

pub fn increment_users_registered() {
    metrics::counter!("shulea_users_registered_total").increment(1);
    metrics::gauge!("shulea_users_total").increment(1.0);
}

pub fn increment_students_created() {
    metrics::counter!("shulea_students_created_total").increment(1);
    metrics::gauge!("shulea_students_total").increment(1.0);
}

pub fn increment_marks_recorded() {
    metrics::counter!("shulea_marks_recorded_total").increment(1);
    metrics::gauge!("shulea_marks_total").increment(1.0);
}

pub fn increment_alerts_generated(kind: AlertKind) {
    metrics::counter!("shulea_alerts_generated_total", "type" => kind.as_str()).increment(1);
    metrics::gauge!("shulea_unread_alerts_total").increment(1.0);
}

pub fn increment_alert_generation_failures() {
    metrics::counter!("shulea_alert_generation_failures_total").increment(1);
}

pub fn record_alert_read() {
    metrics::gauge!("shulea_unread_alerts_total").decrement(1.0);
}
