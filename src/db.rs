use std::io::Read;
use std::path::Path;

use anyhow::Context;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{self, RawSubjectData, SubjectRecord};

pub async fn fetch_subjects(pool: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<SubjectRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT s.id, s.name,
               d.classes_held::int8 AS classes_held,
               d.classes_attended::int8 AS classes_attended,
               d.attendance_required::float8 AS attendance_required,
               d.internal_marks::float8 AS internal_marks,
               d.max_internal_marks::float8 AS max_internal_marks,
               d.passing_marks::float8 AS passing_marks,
               d.exam_weightage::float8 AS exam_weightage,
               d.weekly_study_hours::float8 AS weekly_study_hours,
               d.assignment_completion::float8 AS assignment_completion
        FROM subjects s
        LEFT JOIN LATERAL (
            SELECT * FROM subject_data WHERE subject_id = s.id LIMIT 1
        ) d ON TRUE
        WHERE s.user_id = $1
        ORDER BY s.name
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("failed to fetch subjects")?;

    let mut subjects = Vec::new();

    for row in rows {
        let name: String = row.get("name");
        let raw = RawSubjectData {
            classes_held: count_column(&row, "classes_held", &name)?,
            classes_attended: count_column(&row, "classes_attended", &name)?,
            attendance_required: row.get("attendance_required"),
            internal_marks: row.get("internal_marks"),
            max_internal_marks: row.get("max_internal_marks"),
            passing_marks: row.get("passing_marks"),
            exam_weightage: row.get("exam_weightage"),
            weekly_study_hours: row.get("weekly_study_hours"),
            assignment_completion: row.get("assignment_completion"),
        };
        let metrics =
            models::normalize(&raw).with_context(|| format!("invalid data for subject {name}"))?;

        subjects.push(SubjectRecord {
            id: row.get("id"),
            name,
            metrics,
        });
    }

    tracing::debug!(count = subjects.len(), %user_id, "fetched subjects");
    Ok(subjects)
}

fn count_column(
    row: &sqlx::postgres::PgRow,
    column: &str,
    name: &str,
) -> anyhow::Result<Option<u32>> {
    let value: Option<i64> = row.get(column);
    value
        .map(u32::try_from)
        .transpose()
        .with_context(|| format!("{column} out of range for subject {name}"))
}

#[derive(serde::Deserialize)]
struct CsvRow {
    id: Option<Uuid>,
    name: String,
    classes_held: Option<u32>,
    classes_attended: Option<u32>,
    attendance_required: Option<f64>,
    internal_marks: Option<f64>,
    max_internal_marks: Option<f64>,
    passing_marks: Option<f64>,
    exam_weightage: Option<f64>,
    weekly_study_hours: Option<f64>,
    assignment_completion: Option<f64>,
}

pub fn read_csv(csv_path: &Path) -> anyhow::Result<Vec<SubjectRecord>> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let subjects = read_csv_from(file)?;
    tracing::debug!(count = subjects.len(), path = %csv_path.display(), "loaded subjects");
    Ok(subjects)
}

pub fn read_csv_from<R: Read>(input: R) -> anyhow::Result<Vec<SubjectRecord>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    let mut subjects = Vec::new();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("malformed subject row {}", index + 1))?;
        let raw = RawSubjectData {
            classes_held: row.classes_held,
            classes_attended: row.classes_attended,
            attendance_required: row.attendance_required,
            internal_marks: row.internal_marks,
            max_internal_marks: row.max_internal_marks,
            passing_marks: row.passing_marks,
            exam_weightage: row.exam_weightage,
            weekly_study_hours: row.weekly_study_hours,
            assignment_completion: row.assignment_completion,
        };
        let metrics = models::normalize(&raw)
            .with_context(|| format!("invalid data for subject {}", row.name))?;

        subjects.push(SubjectRecord {
            id: row.id.unwrap_or_else(Uuid::new_v4),
            name: row.name,
            metrics,
        });
    }

    Ok(subjects)
}
