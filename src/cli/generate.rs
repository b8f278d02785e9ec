use indicatif::{ProgressBar, ProgressStyle};
use osslist::catalog::ProjectCatalog;
use osslist::config::Config;
use osslist::core::{OsslistError, OsslistResult};
use osslist::di::{ConfigProvider, ServiceContainer};
use osslist::input::ProjectInput;
use osslist::project::ProjectReconciler;
use osslist::report::write_reports;
use osslist::validation::{self, InvalidUrlStrategy};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

pub struct GenerateOptions {
    pub input: PathBuf,
    pub invalid_url: InvalidUrlStrategy,
    pub validate_only: bool,
    pub skip_validation: bool,
    pub config: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub workers: Option<usize>,
}

pub async fn run(options: GenerateOptions) -> OsslistResult<()> {
    let mut config = match &options.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(workers) = options.workers {
        config.workers = workers.max(1);
    }

    let input = ProjectInput::load(&options.input)?;
    info!(
        categories = input.categories.len(),
        projects = input.len(),
        "input loaded"
    );

    let output = match &options.output_dir {
        Some(dir) => config.output.in_dir(dir),
        None => config.output.clone(),
    };
    let container = ServiceContainer::new(config)?;

    if options.skip_validation {
        info!("skipping URL validation");
    } else {
        let report = validation::validate(&input, container.url_checker()).await;
        report.apply_strategy(options.invalid_url)?;
    }

    if options.validate_only {
        let duplicates = input.duplicate_names();
        if !duplicates.is_empty() {
            return Err(OsslistError::DuplicateProject(duplicates));
        }
        println!("Validated {} project(s)", input.len());
        return Ok(());
    }

    let reconciler = ProjectReconciler::new(Arc::new(container.adapter_factory()));
    let progress = progress_bar(input.len());
    let catalog =
        ProjectCatalog::build(&input, &reconciler, container.config().workers(), &progress).await?;

    write_reports(&catalog, &output)?;
    println!(
        "Wrote {} project(s) to {} and {}",
        catalog.len(),
        output.html.display(),
        output.csv.display()
    );
    Ok(())
}

fn progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    if let Ok(style) =
        ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} projects")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}
