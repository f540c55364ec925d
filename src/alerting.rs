//! Parent alerts derived from newly recorded marks.
//!
//! Runs right after a mark is stored. The previous-mark lookup and the insert
//! are not serialized against other writers: two marks recorded concurrently
//! for the same student and subject may each miss the other as their
//! baseline. This is accepted; the mark write itself is unaffected.

use crate::entities::{alert, alert::AlertKind, mark, prelude::*};
use crate::performance::round_one_decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use tracing::{error, info};

pub const WARNING_THRESHOLD: f64 = 50.0;
pub const EXCELLENT_THRESHOLD: f64 = 80.0;
pub const IMPROVEMENT_THRESHOLD: f64 = 5.0;
pub const DECLINE_THRESHOLD: f64 = -10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct AlertDraft {
    pub kind: AlertKind,
    pub message: String,
    /// Only set when the alert reports an improvement over a previous term.
    pub improvement_percent: Option<f64>,
}

/// Decides whether a mark deserves a parent alert.
///
/// `previous` is the score of the most recent mark for the same subject in a
/// different term. A previous score of zero gives no usable percentage, so
/// such marks are judged like a first recording.
pub fn classify(subject: &str, current: f64, previous: Option<f64>) -> Option<AlertDraft> {
    match previous.filter(|p| *p != 0.0) {
        None => classify_first(subject, current),
        Some(previous) => classify_change(subject, current, previous),
    }
}

fn classify_first(subject: &str, current: f64) -> Option<AlertDraft> {
    if current < WARNING_THRESHOLD {
        Some(AlertDraft {
            kind: AlertKind::Warning,
            message: format!(
                "Your child scored {current}% in {subject}. We recommend additional support to improve performance."
            ),
            improvement_percent: None,
        })
    } else if current >= EXCELLENT_THRESHOLD {
        Some(AlertDraft {
            kind: AlertKind::Positive,
            message: format!(
                "Excellent! Your child scored {current}% in {subject}. Keep up the great work!"
            ),
            improvement_percent: None,
        })
    } else {
        None
    }
}

fn classify_change(subject: &str, current: f64, previous: f64) -> Option<AlertDraft> {
    let improvement = current - previous;

    if improvement >= IMPROVEMENT_THRESHOLD {
        let percent = round_one_decimal(improvement / previous * 100.0);
        Some(AlertDraft {
            kind: AlertKind::Positive,
            message: format!(
                "Great news! Your child improved in {subject} by {percent:.1}% (from {previous}% to {current}%)"
            ),
            improvement_percent: Some(percent),
        })
    } else if current < WARNING_THRESHOLD || improvement <= DECLINE_THRESHOLD {
        Some(AlertDraft {
            kind: AlertKind::Warning,
            message: format!(
                "Your child is struggling in {subject} with a score of {current}%. We recommend additional support."
            ),
            improvement_percent: None,
        })
    } else {
        None
    }
}

/// Score of the most recent mark for `subject` recorded under another term.
pub async fn previous_score<C>(
    db: &C,
    student_id: i32,
    subject: &str,
    term: &str,
) -> Result<Option<f64>, DbErr>
where
    C: ConnectionTrait,
{
    let previous = Mark::find()
        .filter(mark::Column::StudentId.eq(student_id))
        .filter(mark::Column::Subject.eq(subject))
        .filter(mark::Column::Term.ne(term))
        .order_by_desc(mark::Column::DateEntered)
        .order_by_desc(mark::Column::Id)
        .one(db)
        .await?;

    Ok(previous.map(|m| m.score))
}

/// Stores an alert for `recorded` if it qualifies. Students without a linked
/// parent never produce alerts.
pub async fn generate_for_mark<C>(db: &C, recorded: &mark::Model) -> Result<Option<alert::Model>, DbErr>
where
    C: ConnectionTrait,
{
    let parent_id = match Student::find_by_id(recorded.student_id).one(db).await? {
        Some(student) => match student.parent_id {
            Some(parent_id) => parent_id,
            None => return Ok(None),
        },
        None => return Ok(None),
    };

    let previous = previous_score(db, recorded.student_id, &recorded.subject, &recorded.term).await?;

    let Some(draft) = classify(&recorded.subject, recorded.score, previous) else {
        return Ok(None);
    };

    let created = alert::ActiveModel {
        student_id: Set(recorded.student_id),
        parent_id: Set(parent_id),
        kind: Set(draft.kind),
        message: Set(draft.message),
        sent_at: Set(chrono::Utc::now().naive_utc()),
        read: Set(false),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(Some(created))
}

/// Best-effort wrapper used by the mark endpoint. Failures are logged and
/// counted, never returned.
pub async fn notify_parent<C>(db: &C, recorded: &mark::Model) -> Option<alert::Model>
where
    C: ConnectionTrait,
{
    match generate_for_mark(db, recorded).await {
        Ok(Some(created)) => {
            info!(
                alert_id = created.id,
                student_id = created.student_id,
                parent_id = created.parent_id,
                kind = created.kind.as_str(),
                "generated parent alert"
            );
            crate::metrics::increment_alerts_generated(created.kind);
            Some(created)
        }
        Ok(None) => None,
        Err(e) => {
            error!(
                student_id = recorded.student_id,
                mark_id = recorded.id,
                "Failed to generate alert: {}",
                e
            );
            crate::metrics::increment_alert_generation_failures();
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_mark_below_fifty_warns() {
        let draft = classify("Math", 40.0, None).unwrap();
        assert_eq!(draft.kind, AlertKind::Warning);
        assert_eq!(
            draft.message,
            "Your child scored 40% in Math. We recommend additional support to improve performance."
        );
    }

    #[test]
    fn first_mark_at_eighty_or_above_is_positive() {
        let draft = classify("Math", 85.0, None).unwrap();
        assert_eq!(draft.kind, AlertKind::Positive);
        assert_eq!(
            draft.message,
            "Excellent! Your child scored 85% in Math. Keep up the great work!"
        );
        assert_eq!(classify("Math", 80.0, None).unwrap().kind, AlertKind::Positive);
    }

    #[test]
    fn first_mark_in_the_middle_is_silent() {
        assert_eq!(classify("Math", 65.0, None), None);
        assert_eq!(classify("Math", 50.0, None), None);
        assert_eq!(classify("Math", 79.5, None), None);
    }

    #[test]
    fn improvement_of_five_or_more_is_positive() {
        let draft = classify("English", 66.0, Some(60.0)).unwrap();
        assert_eq!(draft.kind, AlertKind::Positive);
        assert_eq!(draft.improvement_percent, Some(10.0));
        assert_eq!(
            draft.message,
            "Great news! Your child improved in English by 10.0% (from 60% to 66%)"
        );
    }

    #[test]
    fn small_decline_above_fifty_is_silent() {
        assert_eq!(classify("English", 58.0, Some(60.0)), None);
        assert_eq!(classify("English", 64.0, Some(60.0)), None);
    }

    #[test]
    fn large_decline_warns() {
        let draft = classify("English", 48.0, Some(60.0)).unwrap();
        assert_eq!(draft.kind, AlertKind::Warning);
        assert_eq!(
            draft.message,
            "Your child is struggling in English with a score of 48%. We recommend additional support."
        );

        // Ten points down still warns above fifty
        let draft = classify("English", 80.0, Some(90.0)).unwrap();
        assert_eq!(draft.kind, AlertKind::Warning);
    }

    #[test]
    fn low_score_with_small_change_warns() {
        let draft = classify("Science", 45.0, Some(43.0)).unwrap();
        assert_eq!(draft.kind, AlertKind::Warning);
    }

    #[test]
    fn improvement_wins_over_low_score() {
        let draft = classify("Science", 45.0, Some(30.0)).unwrap();
        assert_eq!(draft.kind, AlertKind::Positive);
        assert_eq!(draft.improvement_percent, Some(50.0));
    }

    #[test]
    fn zero_previous_score_uses_absolute_thresholds() {
        let draft = classify("Art", 90.0, Some(0.0)).unwrap();
        assert_eq!(draft.kind, AlertKind::Positive);
        assert_eq!(draft.improvement_percent, None);
        assert!(draft.message.starts_with("Excellent!"));

        assert_eq!(classify("Art", 70.0, Some(0.0)), None);
        assert_eq!(classify("Art", 10.0, Some(0.0)).unwrap().kind, AlertKind::Warning);
    }

    #[test]
    fn fractional_scores_keep_their_precision() {
        let draft = classify("Math", 87.5, None).unwrap();
        assert_eq!(
            draft.message,
            "Excellent! Your child scored 87.5% in Math. Keep up the great work!"
        );
    }
}
