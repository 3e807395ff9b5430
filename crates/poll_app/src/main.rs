mod config;
mod effects;
mod logging;
mod runner;

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgGroup, Parser};
use poll_engine::load_page_blocking;
use poll_logging::poll_info;

use config::PollerConfig;
use logging::LogDestination;

#[derive(Parser, Debug)]
#[command(author, version, about = "Poll render job status for a scene page", long_about = None)]
#[command(group(ArgGroup::new("source").required(true).args(["page", "page_url"])))]
struct Args {
    /// RON config file; CLI flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Server origin for the status endpoints
    #[arg(long)]
    base_url: Option<String>,

    /// Local HTML file carrying the job markup
    #[arg(long)]
    page: Option<PathBuf>,

    /// Page path (relative to the base URL) carrying the job markup
    #[arg(long)]
    page_url: Option<String>,

    /// Directory for the rendered job snapshot
    #[arg(long)]
    out: Option<PathBuf>,

    /// Stop a job's polling when the server answers with `bool: false`
    #[arg(long)]
    honor_stop_flag: bool,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogDestination::Terminal)]
    log: LogDestination,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PollerConfig::load(path)?,
        None => PollerConfig::default(),
    };
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if let Some(out) = args.out {
        config.output_dir = out;
    }
    if args.honor_stop_flag {
        config.honor_stop_flag = true;
    }
    config.validate()?;
    logging::initialize(args.log, config.level()?);

    let html = match (args.page, args.page_url) {
        (Some(path), _) => fs::read_to_string(&path)
            .with_context(|| format!("reading page {}", path.display()))?,
        (None, Some(page_url)) => {
            let page = load_page_blocking(config.fetch_settings(), &page_url)
                .with_context(|| format!("loading page {page_url}"))?;
            if page.lossy {
                poll_info!("Page {} decoded with replacements ({})", page_url, page.encoding_label);
            }
            page.html
        }
        (None, None) => anyhow::bail!("either --page or --page-url is required"),
    };

    let summary = runner::run(&config, &html)?;
    poll_info!(
        "All jobs settled: {} done, {} failed, {} stopped",
        summary.succeeded,
        summary.failed,
        summary.stopped
    );
    if let Some(path) = summary.snapshot {
        println!("{}", path.display());
    }
    Ok(())
}
