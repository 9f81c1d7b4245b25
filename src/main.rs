use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod calculations;
mod db;
mod models;
mod report;
mod risk;
mod summary;

use models::{SubjectMetrics, SubjectRecord};

#[derive(Parser)]
#[command(name = "survival")]
#[command(about = "Attendance and marks risk dashboard for tracked subjects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct Source {
    /// Read subjects from a CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Read a user's subjects from Postgres (requires DATABASE_URL)
    #[arg(long)]
    user: Option<Uuid>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show survival score, attendance risk and per-subject status
    Dashboard {
        #[command(flatten)]
        source: Source,
        #[arg(long)]
        json: bool,
    },
    /// Show bunk budget and finals target for one subject
    Subject {
        #[command(flatten)]
        source: Source,
        #[arg(long)]
        name: String,
        #[arg(long)]
        json: bool,
    },
    /// Work out the finals score needed to pass
    Finals {
        #[arg(long, default_value_t = 0.0)]
        internal: f64,
        #[arg(long, default_value_t = models::DEFAULT_PASSING_MARKS)]
        passing: f64,
        #[arg(long, default_value_t = models::DEFAULT_EXAM_WEIGHTAGE)]
        weightage: f64,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        source: Source,
        #[arg(long)]
        label: Option<String>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

async fn load_subjects(source: &Source) -> anyhow::Result<Vec<SubjectRecord>> {
    if let Some(path) = &source.csv {
        return db::read_csv(path);
    }

    let user_id = source.user.context("either --csv or --user must be given")?;
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to read subjects from Postgres")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;

    db::fetch_subjects(&pool, user_id).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("survival=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Dashboard { source, json } => {
            let subjects = load_subjects(&source).await?;
            let summary = summary::summarize(&subjects);
            tracing::info!(subjects = subjects.len(), "computed dashboard");

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
                return Ok(());
            }

            if summary.rows.is_empty() {
                println!("No subjects tracked yet.");
                return Ok(());
            }

            println!("Survival score {}%", summary.overall_survival);
            println!("Attendance risk: {} subjects", summary.at_risk_count);
            println!(
                "Study momentum: {} ({:.1} hours/week)",
                summary.momentum.label(),
                summary.total_study_hours
            );
            println!("Subjects:");
            for row in summary.rows.iter() {
                println!(
                    "- {} attendance {:.1}% pass {}% bunks left {} [{}]",
                    row.name,
                    row.attendance_percentage,
                    row.pass_probability,
                    row.bunks_left,
                    if row.at_risk { "Critical" } else { "Safe" }
                );
            }
        }
        Commands::Subject { source, name, json } => {
            let subjects = load_subjects(&source).await?;
            let subject = subjects
                .iter()
                .find(|subject| subject.name.eq_ignore_ascii_case(&name))
                .with_context(|| format!("no subject named {name}"))?;
            let result = risk::assess(subject);

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
                return Ok(());
            }

            println!("{} ({})", result.name, result.risk_level.label());
            println!(
                "Attendance {:.1}% ({}/{} classes)",
                result.attendance_percentage,
                subject.metrics.classes_attended,
                subject.metrics.classes_held
            );
            println!("Pass probability {}%", result.pass_probability);
            println!(
                "Bunks available {}{}",
                result.bunk_predictor.max_future_bunks,
                if result.bunk_predictor.is_critical {
                    " (below required attendance)"
                } else {
                    ""
                }
            );
            println!(
                "Finals need {:.1} marks ({}% of the exam), {:?}",
                result.required_finals.required_marks,
                result.required_finals.required_percentage,
                result.finals_outlook
            );
        }
        Commands::Finals {
            internal,
            passing,
            weightage,
        } => {
            let raw = models::RawSubjectData {
                internal_marks: Some(internal),
                passing_marks: Some(passing),
                exam_weightage: Some(weightage),
                ..Default::default()
            };
            let metrics: SubjectMetrics = models::normalize(&raw)?;
            let target = calculations::required_finals_score(&metrics);

            match risk::finals_outlook(&target) {
                models::FinalsOutlook::AlreadyPassed => {
                    println!("Internals already clear the passing mark.");
                }
                models::FinalsOutlook::Achievable => {
                    println!(
                        "Need {:.1} of {} marks in the final ({}%).",
                        target.required_marks, weightage, target.required_percentage
                    );
                }
                models::FinalsOutlook::Unreachable => {
                    println!(
                        "Need {:.1} of {} marks ({}%), which a perfect final cannot reach.",
                        target.required_marks, weightage, target.required_percentage
                    );
                }
            }
        }
        Commands::Report { source, label, out } => {
            let subjects = load_subjects(&source).await?;
            let report = report::build_report(
                label.as_deref(),
                chrono::Utc::now().date_naive(),
                &subjects,
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            tracing::info!(path = %out.display(), "report written");
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
