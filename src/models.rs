use anyhow::bail;
use serde::Serialize;
use uuid::Uuid;

pub const DEFAULT_ATTENDANCE_REQUIRED: f64 = 75.0;
pub const DEFAULT_MAX_INTERNAL_MARKS: f64 = 100.0;
pub const DEFAULT_PASSING_MARKS: f64 = 40.0;
pub const DEFAULT_EXAM_WEIGHTAGE: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubjectMetrics {
    pub classes_held: u32,
    pub classes_attended: u32,
    pub attendance_required: f64,
    pub internal_marks: f64,
    pub max_internal_marks: f64,
    pub passing_marks: f64,
    pub exam_weightage: f64,
    pub weekly_study_hours: f64,
    pub assignment_completion: f64,
}

impl Default for SubjectMetrics {
    fn default() -> Self {
        Self {
            classes_held: 0,
            classes_attended: 0,
            attendance_required: DEFAULT_ATTENDANCE_REQUIRED,
            internal_marks: 0.0,
            max_internal_marks: DEFAULT_MAX_INTERNAL_MARKS,
            passing_marks: DEFAULT_PASSING_MARKS,
            exam_weightage: DEFAULT_EXAM_WEIGHTAGE,
            weekly_study_hours: 0.0,
            assignment_completion: 0.0,
        }
    }
}

/// Subject counters as stored upstream, where any column may be unset.
#[derive(Debug, Clone, Default)]
pub struct RawSubjectData {
    pub classes_held: Option<u32>,
    pub classes_attended: Option<u32>,
    pub attendance_required: Option<f64>,
    pub internal_marks: Option<f64>,
    pub max_internal_marks: Option<f64>,
    pub passing_marks: Option<f64>,
    pub exam_weightage: Option<f64>,
    pub weekly_study_hours: Option<f64>,
    pub assignment_completion: Option<f64>,
}

/// Fills unset counters with their defaults and rejects input the
/// calculations cannot give a meaning to.
pub fn normalize(raw: &RawSubjectData) -> anyhow::Result<SubjectMetrics> {
    let defaults = SubjectMetrics::default();
    let metrics = SubjectMetrics {
        classes_held: raw.classes_held.unwrap_or(defaults.classes_held),
        classes_attended: raw.classes_attended.unwrap_or(defaults.classes_attended),
        attendance_required: raw
            .attendance_required
            .unwrap_or(defaults.attendance_required),
        internal_marks: raw.internal_marks.unwrap_or(defaults.internal_marks),
        max_internal_marks: raw.max_internal_marks.unwrap_or(defaults.max_internal_marks),
        passing_marks: raw.passing_marks.unwrap_or(defaults.passing_marks),
        exam_weightage: raw.exam_weightage.unwrap_or(defaults.exam_weightage),
        weekly_study_hours: raw.weekly_study_hours.unwrap_or(defaults.weekly_study_hours),
        assignment_completion: raw
            .assignment_completion
            .unwrap_or(defaults.assignment_completion),
    };

    if !metrics.exam_weightage.is_finite() || metrics.exam_weightage <= 0.0 {
        bail!(
            "exam_weightage must be a positive number, got {}",
            metrics.exam_weightage
        );
    }

    let non_negative = [
        ("attendance_required", metrics.attendance_required),
        ("internal_marks", metrics.internal_marks),
        ("max_internal_marks", metrics.max_internal_marks),
        ("passing_marks", metrics.passing_marks),
        ("weekly_study_hours", metrics.weekly_study_hours),
        ("assignment_completion", metrics.assignment_completion),
    ];
    for (field, value) in non_negative {
        if !value.is_finite() || value < 0.0 {
            bail!("{field} must be a non-negative number, got {value}");
        }
    }

    if metrics.classes_attended > metrics.classes_held {
        tracing::warn!(
            held = metrics.classes_held,
            attended = metrics.classes_attended,
            "attended count exceeds classes held"
        );
    }

    Ok(metrics)
}

#[derive(Debug, Clone)]
pub struct SubjectRecord {
    pub id: Uuid,
    pub name: String,
    pub metrics: SubjectMetrics,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BunkForecast {
    pub current_pct: f64,
    pub max_future_bunks: u32,
    pub is_critical: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FinalsTarget {
    pub required_marks: f64,
    pub required_percentage: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Safe,
    Warning,
    #[serde(rename = "High Risk")]
    HighRisk,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "Safe",
            RiskLevel::Warning => "Warning",
            RiskLevel::HighRisk => "High Risk",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FinalsOutlook {
    AlreadyPassed,
    Achievable,
    Unreachable,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectResult {
    pub name: String,
    pub attendance_percentage: f64,
    pub pass_probability: u32,
    pub bunk_predictor: BunkForecast,
    pub required_finals: FinalsTarget,
    pub risk_level: RiskLevel,
    pub finals_outlook: FinalsOutlook,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectRow {
    pub id: Uuid,
    pub name: String,
    pub attendance_percentage: f64,
    pub pass_probability: u32,
    pub bunks_left: u32,
    pub required: f64,
    pub at_risk: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskBucket {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Momentum {
    Elite,
    Stable,
    Low,
}

impl Momentum {
    pub fn label(&self) -> &'static str {
        match self {
            Momentum::Elite => "Elite",
            Momentum::Stable => "Stable",
            Momentum::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttendanceHealth {
    Optimal,
    Compromised,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub rows: Vec<SubjectRow>,
    pub at_risk_count: usize,
    pub overall_survival: u32,
    pub risk_distribution: Vec<RiskBucket>,
    pub total_study_hours: f64,
    pub momentum: Momentum,
    pub attendance_health: AttendanceHealth,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_record_takes_every_default() {
        let metrics = normalize(&RawSubjectData::default()).unwrap();
        assert_eq!(metrics, SubjectMetrics::default());
        assert_eq!(metrics.attendance_required, 75.0);
        assert_eq!(metrics.passing_marks, 40.0);
        assert_eq!(metrics.exam_weightage, 60.0);
    }

    #[test]
    fn explicit_zero_requirement_is_kept() {
        let raw = RawSubjectData {
            attendance_required: Some(0.0),
            ..Default::default()
        };
        let metrics = normalize(&raw).unwrap();
        assert_eq!(metrics.attendance_required, 0.0);
    }

    #[test]
    fn rejects_zero_exam_weightage() {
        let raw = RawSubjectData {
            exam_weightage: Some(0.0),
            ..Default::default()
        };
        let err = normalize(&raw).unwrap_err();
        assert!(err.to_string().contains("exam_weightage"));
    }

    #[test]
    fn rejects_negative_marks() {
        let raw = RawSubjectData {
            internal_marks: Some(-5.0),
            ..Default::default()
        };
        let err = normalize(&raw).unwrap_err();
        assert!(err.to_string().contains("internal_marks"));
    }

    #[test]
    fn over_attendance_passes_through() {
        let raw = RawSubjectData {
            classes_held: Some(10),
            classes_attended: Some(12),
            ..Default::default()
        };
        let metrics = normalize(&raw).unwrap();
        assert_eq!(metrics.classes_attended, 12);
    }

    #[test]
    fn momentum_labels_read_as_words() {
        assert_eq!(Momentum::Elite.label(), "Elite");
        assert_eq!(Momentum::Stable.label(), "Stable");
        assert_eq!(Momentum::Low.label(), "Low");
    }
}
