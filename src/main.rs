use clap::Parser;
use quizterm::app::App;
use quizterm::config::QuizConfig;
use quizterm::util::format::parse_time_limit;
use quizterm::{console, error, logging, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error as log_error, info};

/// Topic-based quiz runner with a countdown
#[derive(Parser, Debug)]
#[command(name = "quizterm", version, about)]
struct Cli {
    /// Question file (JSON array of questions)
    #[arg(long, value_name = "PATH")]
    questions: Option<PathBuf>,

    /// Time limit per session, e.g. `20m` or `90s`
    #[arg(long, value_name = "DURATION", value_parser = parse_time_limit)]
    time_limit: Option<Duration>,

    /// Number of questions drawn in random mode
    #[arg(long, value_name = "N")]
    sample_size: Option<usize>,

    /// Line mode instead of the full-screen interface
    #[arg(long)]
    plain: bool,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the resolved settings to the config file and exit
    #[arg(long)]
    save_config: bool,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Load the config file and apply command line overrides
    fn resolve_config(&self) -> Result<QuizConfig> {
        let mut config = match &self.config {
            Some(path) => QuizConfig::load_from(path)?,
            None => QuizConfig::load()?,
        };

        if let Some(path) = &self.questions {
            config = config.with_questions_path(path.clone());
        }
        if let Some(limit) = self.time_limit {
            config = config.with_time_limit(limit);
        }
        if let Some(size) = self.sample_size {
            config = config.with_random_sample_size(size);
        }

        config.validate()?;
        Ok(config)
    }

    /// Store `config` at `--config`, or at the default location without it
    fn write_config(&self, config: &QuizConfig) -> Result<()> {
        match &self.config {
            Some(path) => config.save_to(path),
            None => config.save(),
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    logging::init_tracing(cli.verbose, cli.plain)?;

    let config = cli.resolve_config()?;
    info!(
        questions = %config.questions_path.display(),
        time_limit_secs = config.time_limit_secs,
        plain = cli.plain,
        "starting"
    );

    if cli.save_config {
        cli.write_config(&config)?;
        info!("settings saved");
        println!("Settings saved.");
        return Ok(());
    }

    if cli.plain {
        return console::run_console(config).await;
    }

    let mut app = App::new(config)?;
    app.init()?;
    app.run().await
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_error!(error = %e, "fatal");
            eprintln!("{}", error::user_friendly_message(&e));
            ExitCode::FAILURE
        }
    }
}
