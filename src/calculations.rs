use crate::models::{BunkForecast, FinalsTarget, SubjectMetrics, DEFAULT_ATTENDANCE_REQUIRED};

const ATTENDANCE_WEIGHT: f64 = 0.3;
const INTERNAL_WEIGHT: f64 = 0.4;
const STUDY_WEIGHT: f64 = 0.3;

/// Weekly study hours that earn full credit.
const STUDY_HOURS_SATURATION: f64 = 10.0;

/// Attendance threshold with 0 standing in for the default.
pub fn effective_required(required: f64) -> f64 {
    if required == 0.0 {
        DEFAULT_ATTENDANCE_REQUIRED
    } else {
        required
    }
}

/// Not clamped: attending more sessions than were held reads above 100.
pub fn attendance_percentage(held: u32, attended: u32) -> f64 {
    if held == 0 {
        return 100.0;
    }
    attended as f64 / held as f64 * 100.0
}

pub fn pass_probability(metrics: &SubjectMetrics) -> u32 {
    let attendance = attendance_percentage(metrics.classes_held, metrics.classes_attended);
    let required = effective_required(metrics.attendance_required);
    let attendance_score = (attendance / required * 100.0).min(100.0) * ATTENDANCE_WEIGHT;

    // A subject without a passing threshold has its internals covered.
    let internal_score = if metrics.passing_marks > 0.0 {
        (metrics.internal_marks / metrics.passing_marks * 100.0).min(100.0) * INTERNAL_WEIGHT
    } else {
        100.0 * INTERNAL_WEIGHT
    };

    let study_score =
        (metrics.weekly_study_hours / STUDY_HOURS_SATURATION * 100.0).min(100.0) * STUDY_WEIGHT;

    (attendance_score + internal_score + study_score).round() as u32
}

/// How many further sessions can be missed outright while attendance still
/// clears `required`, holding the attended count fixed.
pub fn bunk_predictor(held: u32, attended: u32, required: f64) -> BunkForecast {
    let current_pct = attendance_percentage(held, attended);
    let required = effective_required(required);

    if held == 0 {
        return BunkForecast {
            current_pct: 100.0,
            max_future_bunks: 0,
            is_critical: false,
        };
    }

    let max_total_allowed = (attended as f64 / (required / 100.0)).floor() as i64;
    let max_future_bunks = (max_total_allowed - held as i64).max(0);

    BunkForecast {
        current_pct,
        max_future_bunks: u32::try_from(max_future_bunks).unwrap_or(u32::MAX),
        is_critical: current_pct < required,
    }
}

/// A `required_percentage` above 100 means even a perfect final cannot close the gap.
pub fn required_finals_score(metrics: &SubjectMetrics) -> FinalsTarget {
    let required = metrics.passing_marks - metrics.internal_marks;
    let required_percentage = required / metrics.exam_weightage * 100.0;

    FinalsTarget {
        required_marks: required.max(0.0),
        required_percentage: required_percentage.round().max(0.0) as u32,
    }
}
