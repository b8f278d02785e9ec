use clap::Parser;
use osslist::validation::InvalidUrlStrategy;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "osslist")]
#[command(about = "Build HTML and CSV catalogs of open-source projects")]
#[command(
    long_about = "Reads a YAML list of projects grouped by category, fills in missing \
license, language, topic and release data from GitHub and GitLab, and writes \
table.html and table.csv.\n\nTokens are read from GITHUB_TOKEN (or GITHUB_API_KEY) \
and GITLAB_TOKEN. Settings are read from the osslist config.yaml in the platform \
config directory unless --config is given."
)]
#[command(version)]
struct Cli {
    /// YAML file with the projects, grouped by category
    input: PathBuf,

    /// How to handle repository or homepage URLs that fail validation
    #[arg(short, long, value_enum, default_value_t = InvalidUrlStrategy::Report)]
    invalid_url: InvalidUrlStrategy,

    /// Only validate the input and its URLs, do not build reports
    #[arg(long, conflicts_with = "skip_validation")]
    validate_only: bool,

    /// Do not check URLs before building reports
    #[arg(long)]
    skip_validation: bool,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory the reports are written to
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Number of repositories queried concurrently
    #[arg(long)]
    workers: Option<usize>,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("osslist=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = cli::generate::run(cli::generate::GenerateOptions {
        input: cli.input,
        invalid_url: cli.invalid_url,
        validate_only: cli.validate_only,
        skip_validation: cli.skip_validation,
        config: cli.config,
        output_dir: cli.output_dir,
        workers: cli.workers,
    })
    .await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\n{}", osslist::format_error_with_help(&e));
            ExitCode::FAILURE
        }
    }
}
