mod cli;
mod infra;
mod project;
mod routes;
mod server;

use school_feasibility::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
