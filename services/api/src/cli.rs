use crate::demo::{run_demo, run_level, run_score, DemoArgs, LevelArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use matric_aps::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Matric APS Service",
    about = "Score matric results and serve the admission point score API",
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
    /// Map a single percentage mark to its achievement level
    Level(LevelArgs),
    /// Compute the APS for a subject list from a CSV export or the command line
    Score(ScoreArgs),
    /// Run an end-to-end CLI demo covering scoring, mark edits, and recommendations
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
        Command::Level(args) => {
            run_level(args);
            Ok(())
        }
        Command::Score(args) => run_score(args),
        Command::Demo(args) => run_demo(args),
    }
}
