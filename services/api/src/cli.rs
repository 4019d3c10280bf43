use crate::demo::{run_demo, run_project, run_regions, run_score, DemoArgs, ProjectArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use outbreak_risk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Outbreak Risk Engine",
    about = "Score regional outbreak risk and project intervention effects from the command line",
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
    /// Score a single set of risk factors
    Score(ScoreArgs),
    /// Project twelve months of risk for a region with optional interventions
    Project(ProjectArgs),
    /// List the configured regions
    Regions,
    /// Print a risk assessment report for stakeholder demos
    Demo(DemoArgs),
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
        Command::Score(args) => run_score(args),
        Command::Project(args) => run_project(args),
        Command::Regions => run_regions(),
        Command::Demo(args) => run_demo(args),
    }
}
