use crate::infra::{parse_subject, InMemoryProfileRepository, StaticRecommendationService};
use clap::Args;
use matric_aps::error::AppError;
use matric_aps::profiles::{IntakePolicy, ProfileService, ProfileSubmission, SubjectEntry};
use matric_aps::scoring::{aps_breakdown, level_of, ApsBreakdown, Subject, SubjectImporter};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct LevelArgs {
    /// Percentage mark to map (marks outside 0-100 are extrapolated)
    #[arg(allow_negative_numbers = true)]
    pub(crate) mark: f64,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ScoreArgs {
    /// CSV export with `name` and `mark` columns
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Additional subject as NAME=MARK (repeatable)
    #[arg(long = "subject", value_parser = parse_subject)]
    pub(crate) subjects: Vec<Subject>,
    /// Show which subjects counted, dropped below the cutoff, or were excluded
    #[arg(long)]
    pub(crate) breakdown: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Replace the sample certificate with a CSV export
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Skip the recommendation hand-off portion of the demo.
    #[arg(long)]
    pub(crate) skip_analysis: bool,
}

pub(crate) fn run_level(args: LevelArgs) {
    println!("Mark {} -> level {}", args.mark, level_of(args.mark));
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        csv,
        subjects,
        breakdown,
    } = args;

    let mut all_subjects = match csv {
        Some(path) => SubjectImporter::from_path(path)?,
        None => Vec::new(),
    };
    all_subjects.extend(subjects);

    let report = aps_breakdown(&all_subjects);
    println!("APS: {}", report.total);
    if breakdown {
        render_breakdown(&report);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { csv, skip_analysis } = args;

    let subjects = match csv {
        Some(path) => SubjectImporter::from_path(path)?,
        None => sample_certificate(),
    };

    println!("Matric APS demo");
    let report = aps_breakdown(&subjects);
    println!("APS: {} from {} subjects", report.total, subjects.len());
    render_breakdown(&report);

    println!("\nProfile capture");
    let service = ProfileService::new(
        Arc::new(InMemoryProfileRepository::default()),
        Arc::new(StaticRecommendationService),
        IntakePolicy::default(),
    );
    let submission = ProfileSubmission {
        name: Some("Demo Learner".to_string()),
        id_number: None,
        subjects: subjects
            .iter()
            .map(|subject| SubjectEntry::new(subject.name.clone(), subject.mark))
            .collect(),
    };
    let record = match service.submit(submission) {
        Ok(record) => record,
        Err(err) => {
            println!("  Submission rejected: {}", err);
            return Ok(());
        }
    };
    println!(
        "- Stored {} at {} with APS {}",
        record.profile.profile_id.0,
        record.submitted_at.format("%Y-%m-%d %H:%M UTC"),
        record.profile.aps_score
    );

    if let Some((index, weakest)) = record
        .profile
        .subjects
        .iter()
        .enumerate()
        .filter(|(_, subject)| !matric_aps::scoring::is_life_orientation(subject))
        .min_by_key(|(_, subject)| subject.level)
    {
        let improved = (weakest.mark + 10.0).min(100.0);
        let name = weakest.name.clone();
        match service.update_mark(&record.profile.profile_id, index, improved) {
            Ok(updated) => println!(
                "- Raising {} to {:.0}% moves the APS to {}",
                name, improved, updated.profile.aps_score
            ),
            Err(err) => println!("  Mark update rejected: {}", err),
        }
    }

    if skip_analysis {
        return Ok(());
    }

    println!("\nRecommendation hand-off");
    match service.analyze(&record.profile.profile_id) {
        Ok(payload) => match serde_json::to_string_pretty(&payload) {
            Ok(json) => println!("{}", json),
            Err(err) => println!("  Recommendation payload unavailable: {}", err),
        },
        Err(err) => println!("  Recommendation unavailable: {}", err),
    }

    Ok(())
}

fn sample_certificate() -> Vec<Subject> {
    [
        ("English Home Language", 68.0),
        ("Mathematics", 74.0),
        ("Physical Sciences", 61.0),
        ("Life Sciences", 58.0),
        ("Geography", 47.0),
        ("Accounting", 39.0),
        ("Life Orientation", 82.0),
    ]
    .into_iter()
    .map(|(name, mark)| Subject::new(name, mark))
    .collect()
}

pub(crate) fn render_breakdown(report: &ApsBreakdown) {
    println!("\nCounted subjects");
    for subject in &report.counted {
        println!(
            "- {}: {}% (level {})",
            subject.name, subject.mark, subject.level
        );
    }

    if !report.dropped.is_empty() {
        println!("\nBelow the best-six cutoff");
        for subject in &report.dropped {
            println!(
                "- {}: {}% (level {})",
                subject.name, subject.mark, subject.level
            );
        }
    }

    if !report.excluded.is_empty() {
        println!("\nExcluded from APS");
        for subject in &report.excluded {
            println!("- {}", subject.name);
        }
    }
}
