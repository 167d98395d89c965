use applicant_audit::error::AppError;
use applicant_audit::profile::{
    annotate_profile, risk_report, AuditServiceError, InMemoryProfileStore, ProfileStore,
    ValidationStatus,
};
use chrono::{Local, NaiveDate};
use clap::Args;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Applicant identifier to look up in the seeded store
    #[arg(long)]
    pub(crate) id: String,
    /// Evaluation date for age and experience checks (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

/// Annotate a stored profile and print the verdicts and risk weights.
/// Runs entirely locally; the remote validator is not consulted.
pub(crate) async fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs { id, today } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let store = InMemoryProfileStore::with_samples();
    let raw = store
        .fetch(&id)
        .map_err(AuditServiceError::from)?
        .ok_or_else(|| AuditServiceError::UnknownApplicant(id.clone()))?;

    let profile = annotate_profile(&raw, today).map_err(AuditServiceError::from)?;
    let report = risk_report(&profile, today);

    println!("Applicant audit report");
    println!("  applicant: {id}");
    println!("  evaluated: {today}");

    println!("\nField verdicts");
    let mut doubtful = 0usize;
    for (field, verdict) in profile.fields() {
        let marker = match verdict.status() {
            ValidationStatus::Ok => " ",
            ValidationStatus::Warn => "?",
            ValidationStatus::Error => "!",
        };
        if verdict.status() != ValidationStatus::Ok {
            doubtful += 1;
        }
        match verdict.message() {
            Some(message) => println!(
                "  {marker} {:<24} {:<6} {message}",
                field.as_str(),
                verdict.status().label()
            ),
            None => println!(
                "  {marker} {:<24} {}",
                field.as_str(),
                verdict.status().label()
            ),
        }
    }
    println!("  {doubtful} field(s) need attention");

    println!("\nRisk weighting");
    let mut total = 0u32;
    for (factor, entry) in &report.factors {
        total += entry.score_points;
        println!(
            "  {:<20} {:>3} points (asserted: {})",
            format!("{factor:?}"),
            entry.score_points,
            entry.value
        );
    }
    println!("  total: {total} points");

    Ok(())
}
