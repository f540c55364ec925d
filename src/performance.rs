//! Per-student performance summary over a set of recorded marks.

use crate::entities::mark;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectPerformance {
    pub subject: String,
    pub latest_score: f64,
    pub term: String,
    pub date_entered: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub student_id: i32,
    pub average_score: f64,
    pub total_subjects: usize,
    pub subject_performance: Vec<SubjectPerformance>,
    pub all_marks: Vec<mark::Model>,
}

/// Rounds half away from zero to one decimal place.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Orders marks by subject, then most recently entered first. Rows sharing a
/// timestamp fall back to the higher id, which was inserted later.
pub fn sort_latest_first(marks: &mut [mark::Model]) {
    marks.sort_by(|a, b| {
        a.subject
            .cmp(&b.subject)
            .then_with(|| b.date_entered.cmp(&a.date_entered))
            .then_with(|| b.id.cmp(&a.id))
    });
}

pub fn summarize(student_id: i32, mut marks: Vec<mark::Model>) -> PerformanceSummary {
    sort_latest_first(&mut marks);

    let average_score = if marks.is_empty() {
        0.0
    } else {
        let total: f64 = marks.iter().map(|m| m.score).sum();
        round_one_decimal(total / marks.len() as f64)
    };

    let subject_performance: Vec<SubjectPerformance> = {
        let mut seen = HashSet::new();
        marks
            .iter()
            .filter(|m| seen.insert(m.subject.as_str()))
            .map(|m| SubjectPerformance {
                subject: m.subject.clone(),
                latest_score: m.score,
                term: m.term.clone(),
                date_entered: m.date_entered,
            })
            .collect()
    };

    PerformanceSummary {
        student_id,
        average_score,
        total_subjects: subject_performance.len(),
        subject_performance,
        all_marks: marks,
    }
}
