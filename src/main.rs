use clap::{ArgGroup, CommandFactory, Parser, error::ErrorKind};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crawldigest::cli::commands::{self, Source};
use crawldigest::cli::ui::Output;
use crawldigest::config::{ConfigLoader, ConfigOverrides};

#[derive(Parser)]
#[command(name = "crawldigest")]
#[command(
    version,
    about = "Digest a website, a git repository or a local directory into one Markdown file"
)]
#[command(group(
    ArgGroup::new("source")
        .args(["url", "repo", "dir"])
        .multiple(false)
))]
struct Cli {
    #[arg(long, short = 'u', help = "Website to crawl (same origin only)")]
    url: Option<String>,

    #[arg(long, short = 'r', help = "Git repository URL (HTTPS or SSH) to clone and digest")]
    repo: Option<String>,

    #[arg(long, short = 'd', help = "Local directory to digest")]
    dir: Option<PathBuf>,

    #[arg(long, short = 'l', help = "Maximum link depth for web crawls [default: 1]")]
    depth: Option<u32>,

    #[arg(long, short = 'o', help = "Output Markdown file [default: output.md]")]
    output: Option<PathBuf>,

    #[arg(long, short = 'b', help = "Branch to clone in repository mode")]
    branch: Option<String>,

    #[arg(long, help = "Include dot-prefixed files and directories (.git stays excluded)")]
    include_dot_files: bool,

    #[arg(long, short = 'c', env = "CRAWLDIGEST_CONFIG", help = "Config file to use instead of ./crawldigest.toml")]
    config: Option<PathBuf>,

    #[arg(long, help = "Print the effective configuration and exit")]
    show_config: bool,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

impl Cli {
    fn source(&self) -> Option<Source> {
        if let Some(url) = &self.url {
            Some(Source::Web { url: url.clone() })
        } else if let Some(url) = &self.repo {
            Some(Source::Repo { url: url.clone() })
        } else {
            self.dir
                .as_ref()
                .map(|path| Source::Directory { path: path.clone() })
        }
    }

    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            output: self.output.clone(),
            depth: self.depth,
            branch: self.branch.clone(),
            include_dot_files: self.include_dot_files,
        }
    }
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mcrawldigest encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }

        eprintln!("\n\x1b[33mPlease report this issue at:\x1b[0m");
        eprintln!("  https://github.com/crawldigest/crawldigest/issues");
        eprintln!();

        // Backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    let cli = Cli::parse();
    let output = Output::new(cli.quiet);

    match run_cli(cli, &output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output.error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run_cli(cli: Cli, output: &Output) -> anyhow::Result<()> {
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ConfigLoader::load(cli.config.as_deref())?.with_overrides(&cli.overrides());
    config.validate()?;

    if cli.show_config {
        commands::config::show(&config)?;
        return Ok(());
    }

    let Some(source) = cli.source() else {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "one of --url, --repo or --dir is required",
            )
            .exit();
    };

    tracing::info!("Source: {}", source);
    tracing::info!("Output file: {}", config.output.file.display());

    let rt = Runtime::new()?;
    let summary = rt.block_on(commands::run::run(&source, &config))?;
    commands::print_summary(&summary, output);

    Ok(())
}
