use crate::calculations;
use crate::models::{FinalsOutlook, FinalsTarget, RiskLevel, SubjectRecord, SubjectResult};

pub fn risk_level(pass_probability: u32) -> RiskLevel {
    match pass_probability {
        80.. => RiskLevel::Safe,
        60..=79 => RiskLevel::Warning,
        _ => RiskLevel::HighRisk,
    }
}

pub fn finals_outlook(target: &FinalsTarget) -> FinalsOutlook {
    if target.required_percentage > 100 {
        FinalsOutlook::Unreachable
    } else if target.required_marks == 0.0 {
        FinalsOutlook::AlreadyPassed
    } else {
        FinalsOutlook::Achievable
    }
}

pub fn assess(record: &SubjectRecord) -> SubjectResult {
    let metrics = &record.metrics;
    let pass_probability = calculations::pass_probability(metrics);
    let required_finals = calculations::required_finals_score(metrics);

    SubjectResult {
        name: record.name.clone(),
        attendance_percentage: calculations::attendance_percentage(
            metrics.classes_held,
            metrics.classes_attended,
        ),
        pass_probability,
        bunk_predictor: calculations::bunk_predictor(
            metrics.classes_held,
            metrics.classes_attended,
            metrics.attendance_required,
        ),
        required_finals,
        risk_level: risk_level(pass_probability),
        finals_outlook: finals_outlook(&required_finals),
    }
}
