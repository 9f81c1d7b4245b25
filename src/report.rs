use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{AttendanceHealth, FinalsOutlook, SubjectRecord};
use crate::risk;
use crate::summary;

fn outlook_note(outlook: FinalsOutlook) -> &'static str {
    match outlook {
        FinalsOutlook::AlreadyPassed => "already cleared by internals",
        FinalsOutlook::Achievable => "achievable",
        FinalsOutlook::Unreachable => "unreachable even with a perfect final",
    }
}

pub fn build_report(
    label: Option<&str>,
    generated_on: NaiveDate,
    subjects: &[SubjectRecord],
) -> String {
    let summary = summary::summarize(subjects);

    let mut output = String::new();
    let label = label.unwrap_or("all subjects");

    let _ = writeln!(output, "# Academic Survival Report");
    let _ = writeln!(output, "Generated for {} on {}", label, generated_on);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Overview");
    let _ = writeln!(output, "- Survival score: {}%", summary.overall_survival);
    let _ = writeln!(output, "- Subjects below attendance: {}", summary.at_risk_count);
    let _ = writeln!(
        output,
        "- Study momentum: {} ({:.1} hours/week)",
        summary.momentum.label(),
        summary.total_study_hours
    );
    let _ = writeln!(
        output,
        "- Attendance health: {}",
        match summary.attendance_health {
            AttendanceHealth::Optimal => "Optimal",
            AttendanceHealth::Compromised => "Compromised",
        }
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Risk Distribution");

    if summary.risk_distribution.is_empty() {
        let _ = writeln!(output, "No subjects tracked yet.");
    } else {
        for bucket in summary.risk_distribution.iter() {
            let _ = writeln!(output, "- {}: {} subjects", bucket.label, bucket.count);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Subject Intel");

    if subjects.is_empty() {
        let _ = writeln!(output, "No subjects tracked yet.");
    } else {
        for subject in subjects {
            let result = risk::assess(subject);
            let _ = writeln!(output, "### {}", result.name);
            let _ = writeln!(
                output,
                "- Attendance {:.1}% of {} required, {} more bunks allowed{}",
                result.attendance_percentage,
                subject.metrics.attendance_required,
                result.bunk_predictor.max_future_bunks,
                if result.bunk_predictor.is_critical {
                    " (critical)"
                } else {
                    ""
                }
            );
            let _ = writeln!(
                output,
                "- Pass probability {}% ({})",
                result.pass_probability,
                result.risk_level.label()
            );
            let _ = writeln!(
                output,
                "- Finals need {:.1} of {} marks ({}%), {}",
                result.required_finals.required_marks,
                subject.metrics.exam_weightage,
                result.required_finals.required_percentage,
                outlook_note(result.finals_outlook)
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Attendance Alerts");

    let at_risk: Vec<_> = summary.rows.iter().filter(|row| row.at_risk).collect();
    if at_risk.is_empty() {
        let _ = writeln!(output, "All subjects are within safe attendance limits.");
    } else {
        for row in at_risk {
            let _ = writeln!(
                output,
                "- {} at {:.1}% against {}% required",
                row.name, row.attendance_percentage, row.required
            );
        }
    }

    output
}
