mod cli;
mod demo;
mod error;
mod infra;
mod routes;
mod server;

pub use error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
