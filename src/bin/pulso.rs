//! Pulso CLI - Command-line interface for the pulso analytics engine
//!
//! Commands:
//! - sentiment: Score text sentiment, emotion, and aspects
//! - topics: Extract topics and entities from text
//! - trend: Detect a trend over a JSON time series
//! - anomaly: Detect anomalies over a labeled JSON series
//! - mood: Aggregate community mood over a JSON batch of posts

use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use pulso::types::{AnomalyPoint, Post, TrendPoint};
use pulso::{EngineConfig, InsightEngine, PULSO_VERSION};

/// Pulso - In-process community analytics
#[derive(Parser)]
#[command(name = "pulso")]
#[command(version = PULSO_VERSION)]
#[command(about = "Analyze community text, series, and activity", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score text sentiment, emotion, and aspects
    Sentiment {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Lexicon language
        #[arg(long, default_value = "es")]
        language: String,

        /// Pretty-print the JSON result
        #[arg(long)]
        pretty: bool,
    },

    /// Extract topics and entities from text
    Topics {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Lexicon language
        #[arg(long, default_value = "es")]
        language: String,

        /// Pretty-print the JSON result
        #[arg(long)]
        pretty: bool,
    },

    /// Detect a trend over a JSON array of { timestamp, value } points
    Trend {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Moving-average window in points
        #[arg(long, default_value = "7")]
        window: usize,

        /// Pretty-print the JSON result
        #[arg(long)]
        pretty: bool,
    },

    /// Detect anomalies over a JSON array of labeled points
    Anomaly {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Pretty-print the JSON result
        #[arg(long)]
        pretty: bool,
    },

    /// Aggregate community mood over a JSON array of posts
    Mood {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Lexicon language
        #[arg(long, default_value = "es")]
        language: String,

        /// Pretty-print the JSON result
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), PulsoCliError> {
    match cli.command {
        Commands::Sentiment {
            input,
            language,
            pretty,
        } => cmd_sentiment(&input, &language, pretty),

        Commands::Topics {
            input,
            language,
            pretty,
        } => cmd_topics(&input, &language, pretty),

        Commands::Trend {
            input,
            window,
            pretty,
        } => cmd_trend(&input, window, pretty),

        Commands::Anomaly { input, pretty } => cmd_anomaly(&input, pretty),

        Commands::Mood {
            input,
            language,
            pretty,
        } => cmd_mood(&input, &language, pretty),
    }
}

fn cmd_sentiment(input: &PathBuf, language: &str, pretty: bool) -> Result<(), PulsoCliError> {
    let text = read_input(input)?;
    if text.trim().is_empty() {
        return Err(PulsoCliError::EmptyInput);
    }

    let engine = InsightEngine::new(EngineConfig::default());
    let result = engine.analyze_sentiment(&text, language);
    print_json(&result, pretty)
}

fn cmd_topics(input: &PathBuf, language: &str, pretty: bool) -> Result<(), PulsoCliError> {
    let text = read_input(input)?;
    if text.trim().is_empty() {
        return Err(PulsoCliError::EmptyInput);
    }

    let engine = InsightEngine::new(EngineConfig::default());
    let result = engine.extract_topics(&text, language);
    print_json(&result, pretty)
}

fn cmd_trend(input: &PathBuf, window: usize, pretty: bool) -> Result<(), PulsoCliError> {
    if window == 0 {
        return Err(PulsoCliError::InvalidWindow);
    }

    let data = read_input(input)?;
    let series: Vec<TrendPoint> = serde_json::from_str(&data)?;

    let engine = InsightEngine::new(EngineConfig::default());
    let result = engine.detect_trend_with_window(&series, window);
    print_json(&result, pretty)
}

fn cmd_anomaly(input: &PathBuf, pretty: bool) -> Result<(), PulsoCliError> {
    let data = read_input(input)?;
    let series: Vec<AnomalyPoint> = serde_json::from_str(&data)?;

    let engine = InsightEngine::new(EngineConfig::default());
    let result = engine.detect_anomaly(&series, None);
    print_json(&result, pretty)
}

fn cmd_mood(input: &PathBuf, language: &str, pretty: bool) -> Result<(), PulsoCliError> {
    let data = read_input(input)?;
    let posts: Vec<Post> = serde_json::from_str(&data)?;

    let config = EngineConfig {
        default_language: language.to_string(),
        ..Default::default()
    };
    let engine = InsightEngine::new(config);
    let result = engine.analyze_community_mood(&posts);
    print_json(&result, pretty)
}

// Helper functions

fn read_input(input: &PathBuf) -> Result<String, PulsoCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<(), PulsoCliError> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", output);
    Ok(())
}

// Error types

#[derive(Debug)]
enum PulsoCliError {
    Io(io::Error),
    Json(serde_json::Error),
    EmptyInput,
    InvalidWindow,
}

impl From<io::Error> for PulsoCliError {
    fn from(e: io::Error) -> Self {
        PulsoCliError::Io(e)
    }
}

impl From<serde_json::Error> for PulsoCliError {
    fn from(e: serde_json::Error) -> Self {
        PulsoCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<PulsoCliError> for CliError {
    fn from(e: PulsoCliError) -> Self {
        match e {
            PulsoCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            PulsoCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax and field types".to_string()),
            },
            PulsoCliError::EmptyInput => CliError {
                code: "EMPTY_INPUT".to_string(),
                message: "No text found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            PulsoCliError::InvalidWindow => CliError {
                code: "INVALID_WINDOW".to_string(),
                message: "Trend window must be at least 1".to_string(),
                hint: Some("Pass --window with a positive point count".to_string()),
            },
        }
    }
}
