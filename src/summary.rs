use crate::calculations;
use crate::models::{
    AttendanceHealth, DashboardSummary, Momentum, RiskBucket, SubjectRecord, SubjectRow,
};

pub fn study_momentum(total_hours: f64) -> Momentum {
    if total_hours > 20.0 {
        Momentum::Elite
    } else if total_hours > 10.0 {
        Momentum::Stable
    } else {
        Momentum::Low
    }
}

pub fn subject_row(record: &SubjectRecord) -> SubjectRow {
    let metrics = &record.metrics;
    let attendance =
        calculations::attendance_percentage(metrics.classes_held, metrics.classes_attended);
    let required = calculations::effective_required(metrics.attendance_required);
    let bunks = calculations::bunk_predictor(
        metrics.classes_held,
        metrics.classes_attended,
        metrics.attendance_required,
    );

    SubjectRow {
        id: record.id,
        name: record.name.clone(),
        attendance_percentage: attendance,
        pass_probability: calculations::pass_probability(metrics),
        bunks_left: bunks.max_future_bunks,
        required,
        at_risk: attendance < required,
    }
}

pub fn summarize(records: &[SubjectRecord]) -> DashboardSummary {
    let rows: Vec<SubjectRow> = records.iter().map(subject_row).collect();

    let at_risk_count = rows.iter().filter(|row| row.at_risk).count();
    let overall_survival = if rows.is_empty() {
        0
    } else {
        let total: u64 = rows.iter().map(|row| row.pass_probability as u64).sum();
        (total as f64 / rows.len() as f64).round() as u32
    };

    let risk_distribution: Vec<RiskBucket> = [
        ("Safe", rows.len() - at_risk_count),
        ("At Risk", at_risk_count),
    ]
    .into_iter()
    .filter(|(_, count)| *count > 0)
    .map(|(label, count)| RiskBucket {
        label: label.to_string(),
        count,
    })
    .collect();

    let total_study_hours: f64 = records
        .iter()
        .map(|record| record.metrics.weekly_study_hours)
        .sum();

    DashboardSummary {
        rows,
        at_risk_count,
        overall_survival,
        risk_distribution,
        total_study_hours,
        momentum: study_momentum(total_study_hours),
        attendance_health: if at_risk_count == 0 {
            AttendanceHealth::Optimal
        } else {
            AttendanceHealth::Compromised
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SubjectMetrics;
    use uuid::Uuid;

    fn record(name: &str, held: u32, attended: u32, hours: f64) -> SubjectRecord {
        SubjectRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            metrics: SubjectMetrics {
                classes_held: held,
                classes_attended: attended,
                weekly_study_hours: hours,
                internal_marks: 20.0,
                ..Default::default()
            },
        }
    }

    #[test]
    fn empty_list_yields_zeroed_summary() {
        let summary = summarize(&[]);
        assert!(summary.rows.is_empty());
        assert_eq!(summary.overall_survival, 0);
        assert_eq!(summary.at_risk_count, 0);
        assert!(summary.risk_distribution.is_empty());
        assert_eq!(summary.total_study_hours, 0.0);
        assert_eq!(summary.momentum, Momentum::Low);
        assert_eq!(summary.attendance_health, AttendanceHealth::Optimal);
    }

    #[test]
    fn counts_subjects_below_requirement() {
        let records = vec![
            record("Algebra", 40, 30, 10.0),
            record("Chemistry", 20, 10, 4.0),
            record("History", 0, 0, 0.0),
        ];
        let summary = summarize(&records);

        assert_eq!(summary.at_risk_count, 1);
        assert_eq!(
            summary.risk_distribution,
            vec![
                RiskBucket {
                    label: "Safe".to_string(),
                    count: 2,
                },
                RiskBucket {
                    label: "At Risk".to_string(),
                    count: 1,
                },
            ]
        );
        assert!(summary.rows[1].at_risk);
        assert_eq!(summary.attendance_health, AttendanceHealth::Compromised);
    }

    #[test]
    fn survival_is_rounded_mean_probability() {
        // 30 + 20 + 30, 20 + 20 + 12, 30 + 20 + 0
        let records = vec![
            record("Algebra", 40, 30, 10.0),
            record("Chemistry", 20, 10, 4.0),
            record("History", 0, 0, 0.0),
        ];
        let summary = summarize(&records);
        let probabilities: Vec<u32> = summary.rows.iter().map(|r| r.pass_probability).collect();
        assert_eq!(probabilities, vec![80, 52, 50]);
        assert_eq!(summary.overall_survival, 61);
    }

    #[test]
    fn zero_buckets_are_omitted() {
        let summary = summarize(&[record("Algebra", 40, 30, 10.0)]);
        assert_eq!(summary.risk_distribution.len(), 1);
        assert_eq!(summary.risk_distribution[0].label, "Safe");
        assert_eq!(summary.risk_distribution[0].count, 1);
    }

    #[test]
    fn zero_requirement_is_judged_against_default() {
        let mut subject = record("Physics", 10, 7, 0.0);
        subject.metrics.attendance_required = 0.0;
        let row = subject_row(&subject);
        assert_eq!(row.required, 75.0);
        assert!(row.at_risk);
        assert_eq!(row.bunks_left, 0);
    }

    #[test]
    fn totals_hours_and_momentum() {
        let records = vec![
            record("Algebra", 0, 0, 9.5),
            record("Chemistry", 0, 0, 6.0),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.total_study_hours, 15.5);
        assert_eq!(summary.momentum, Momentum::Stable);

        assert_eq!(study_momentum(20.0), Momentum::Stable);
        assert_eq!(study_momentum(20.5), Momentum::Elite);
        assert_eq!(study_momentum(10.0), Momentum::Low);
    }
}
