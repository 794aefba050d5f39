use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::filter::LevelFilter;

mod command;
mod config;
mod ui;

use sitemirror::ui::MirrorUiHandler;

use crate::command::CommandError;
use crate::config::{CliConfig, CliProgressBarStyle};
use crate::ui::*;

#[derive(Debug, Parser)]
#[command(name = "Sitemirror", version = env!("CARGO_PKG_VERSION"), about = "Mirror websites for offline viewing")]
struct Opt {
    #[arg(short = 'v', action = clap::ArgAction::Count, help = "Verbosity")]
    verbosity: u8,

    #[command(flatten)]
    general_options: GeneralOptions,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Args)]
pub struct GeneralOptions {
    #[arg(long = "config-path", help = "Specify config path to use")]
    pub config_path: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    #[command(name = "generate-config", about = "Generate default configuration files")]
    GenerateConfig,

    #[command(name = "mirror", about = "Mirror a website into a local directory")]
    Mirror {
        #[arg(help = "URL of the site to mirror")]
        url: String,
        #[arg(help = "Directory to mirror into")]
        destination: PathBuf,
        #[arg(long = "bar-style", help = "Progress bar style to use (dot|hash|arrow)")]
        bar_style: Option<CliProgressBarStyle>,
        #[arg(long = "no-progress", help = "Disable the progress bar")]
        no_progress: bool,
        #[arg(short = 'q', long = "quiet", help = "Suppress all output")]
        quiet: bool,
    },

    #[command(name = "check", about = "Check that the mirror tool is available")]
    Check,
}

fn main() {
    let opt = Opt::parse();

    // Vary the output based on how many times the user used the "verbose" flag
    // (i.e. 'myprog -v -v -v' or 'myprog -vvv' vs 'myprog -v'
    let log_level = match opt.verbosity {
        0 => LevelFilter::OFF,
        1 => LevelFilter::ERROR,
        2 => LevelFilter::WARN,
        3 => LevelFilter::INFO,
        4 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // Initialize logging
    initialize_logging(log_level);

    debug!("Debug logging enabled.");

    let cfg = if let Some(config_path) = opt
        .general_options
        .config_path
        .as_ref()
        .map(|p| p.to_path_buf())
        .or_else(sitemirror::config::get_default_config_path)
    {
        match CliConfig::from_location(&config_path) {
            Ok(v) => v,
            Err(err) => {
                eprintln!("{}", err);

                CliConfig::default()
            }
        }
    } else {
        warn!("No config path specified, and no default path could be determined.");

        CliConfig::default()
    };

    let cmd_result = match opt.command {
        Command::GenerateConfig => generate_default_configs(),
        Command::Mirror {
            url,
            destination,
            bar_style,
            no_progress,
            quiet,
        } => {
            let mut ui = create_ui_handler(&cfg, bar_style, no_progress, quiet);

            command::mirror(&url, &destination, &opt.general_options, ui.as_mut())
        }
        Command::Check => command::check(&opt.general_options),
    };

    match cmd_result {
        Ok(_) => {}
        Err(err) => {
            // Print error description to stderr
            eprintln!("{}", err.description);

            // Return the exit code that corresponds to the error kind
            std::process::exit(err.kind.exit_code());
        }
    };
}

fn create_ui_handler(
    cfg: &CliConfig,
    bar_style: Option<CliProgressBarStyle>,
    no_progress: bool,
    quiet: bool,
) -> Box<dyn MirrorUiHandler> {
    if quiet {
        return Box::new(NullUiHandler::new());
    }

    if no_progress || !cfg.progress.enable {
        return Box::new(StderrUiHandler::new());
    }

    let progress_chars = match bar_style.unwrap_or(cfg.progress.bar_style) {
        CliProgressBarStyle::Dot => "●●·",
        CliProgressBarStyle::Hash => "##·",
        CliProgressBarStyle::Arrow => "=> ",
    }
    .to_owned();

    Box::new(IndicatifUiHandler::new(progress_chars))
}

fn initialize_logging(log_level: LevelFilter) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn generate_default_configs() -> Result<(), CommandError> {
    config::CliConfig::write_default()?;
    sitemirror::config::MirrorConfig::write_default()?;

    Ok(())
}
