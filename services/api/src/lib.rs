mod cli;
mod econ_stub;
mod infra;
mod report;
mod routes;
mod server;

use applicant_audit::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
