//! notesort command-line entry point.
//!
//! # Responsibility
//! - Map subcommands onto `notesort_core::api` boundary calls.
//! - Print response envelopes as JSON on stdout and errors on stderr.

use clap::{Parser, Subcommand};
use notesort_core::api::{self, ApiError, FeedbackIn, NoteIn};
use notesort_core::{default_log_level, init_logging, ClassificationService, CoreConfig};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "notesort")]
#[command(about = "Classify notes into categories and learn from corrections", long_about = None)]
#[command(version = notesort_core::core_version())]
struct Cli {
    /// Directory holding categories, notes, feedback and the trained model
    #[arg(long, env = "NOTESORT_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,

    /// Directory for rolling log files (logging is off when unset)
    #[arg(long, env = "NOTESORT_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, env = "NOTESORT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Feedback entries per retrain
    #[arg(long, env = "NOTESORT_RETRAIN_THRESHOLD", default_value_t = notesort_core::DEFAULT_RETRAIN_THRESHOLD)]
    retrain_threshold: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the classifier from the seed corpus and all feedback
    Train,
    /// Predict a category for a note
    Classify {
        note: String,
    },
    /// Correct a prediction and file the note under the right category
    Feedback {
        note: String,
        label: String,
    },
    /// Accept a prediction and file the note under it
    Accept {
        note: String,
        category: String,
    },
    /// List known categories
    Categories,
    /// List notes in a category
    Notes {
        category: String,
    },
    /// Add a note to a category without classifying it
    Add {
        category: String,
        note: String,
    },
    /// Replace the note at an index
    Edit {
        category: String,
        #[arg(allow_negative_numbers = true)]
        index: i64,
        note: String,
    },
    /// Delete the note at an index
    Delete {
        category: String,
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, &absolute(log_dir).to_string_lossy()) {
            eprintln!("warning: {err}");
        }
    }

    let config = match CoreConfig::new(&cli.data_dir)
        .and_then(|config| config.with_retrain_threshold(cli.retrain_threshold))
    {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    };
    let service = ClassificationService::open(&config);

    let result = match cli.command {
        Commands::Train => api::train(&service).map(|resp| render(&resp)),
        Commands::Classify { note } => {
            api::classify(&service, &NoteIn { note }).map(|resp| render(&resp))
        }
        Commands::Feedback { note, label } => api::feedback(
            &service,
            &FeedbackIn {
                note,
                correct_label: label,
            },
        )
        .map(|resp| render(&resp)),
        Commands::Accept { note, category } => {
            api::accept(&service, &NoteIn { note }, &category).map(|resp| render(&resp))
        }
        Commands::Categories => Ok(render(&api::categories(&service))),
        Commands::Notes { category } => api::notes(&service, &category).map(|resp| render(&resp)),
        Commands::Add { category, note } => {
            api::add_note(&service, &category, &NoteIn { note }).map(|resp| render(&resp))
        }
        Commands::Edit {
            category,
            index,
            note,
        } => api::edit_note(&service, &category, index, &NoteIn { note })
            .map(|resp| render(&resp)),
        Commands::Delete { category, index } => {
            api::delete_note(&service, &category, index).map(|resp| render(&resp))
        }
    };

    match result {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", render(&err));
            ExitCode::from(exit_code(&err))
        }
    }
}

fn render<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|err| format!("{{\"detail\": \"{err}\"}}"))
}

fn exit_code(err: &ApiError) -> u8 {
    if (400..500).contains(&err.status) {
        1
    } else {
        3
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
