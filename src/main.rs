use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use daily_quiz::config::{data_dir, QuizConfig};
use daily_quiz::models::Difficulty;
use daily_quiz::Quiz;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON file to load the questions from instead of Open Trivia DB
    #[arg(short, long)]
    questions: Option<PathBuf>,

    /// Number of questions per quiz
    #[arg(short, long)]
    amount: Option<usize>,

    /// Open Trivia DB category id
    #[arg(long)]
    category: Option<u32>,

    /// Question difficulty
    #[arg(short, long, value_enum)]
    difficulty: Option<Difficulty>,

    /// Time limit for the whole quiz, in seconds
    #[arg(short, long)]
    time_limit: Option<u32>,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn apply(&self, config: &mut QuizConfig) {
        if let Some(path) = &self.questions {
            config.questions.file = Some(path.clone());
        }
        if let Some(amount) = self.amount {
            config.questions.amount = amount;
        }
        if let Some(category) = self.category {
            config.questions.category = Some(category);
        }
        if let Some(difficulty) = self.difficulty {
            config.questions.difficulty = Some(difficulty);
        }
        if let Some(secs) = self.time_limit {
            config.session.time_limit_secs = secs;
        }
    }
}

/// Log to a file; the TUI owns the terminal.
fn init_tracing(verbose: bool) -> std::io::Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env("DAILYQUIZ_LOG").unwrap_or_else(|_| EnvFilter::new(level));

    let dir = data_dir();
    fs::create_dir_all(&dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("dailyquiz.log"))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = init_tracing(args.verbose) {
        eprintln!("Logging disabled: {}", e);
    }

    let mut config = QuizConfig::load(args.config.as_deref()).unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(2);
    });
    args.apply(&mut config);

    let quiz = Quiz::from_config(config).unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(2);
    });

    if let Err(e) = quiz.run().await {
        eprintln!("Error running quiz: {}", e);
        std::process::exit(1);
    }
}
