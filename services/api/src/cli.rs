use crate::project::{run_projection, ProjectArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use school_feasibility::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "school-feasibility",
    about = "Project three years of school income, expenses and staffing",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run a projection from scenario files and print the result
    Project(ProjectArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Project(args) => run_projection(args),
    }
}
