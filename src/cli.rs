//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use surveytally::models::{Predicate, Rating};
use thiserror::Error;

/// SurveyTally - satisfaction survey aggregation for academic services
///
/// Reads the console's content document, tallies K/C/B/BS answers per
/// question, and reports weighted satisfaction scores.
///
/// Examples:
///   surveytally analyze
///   surveytally --store data/content.json analyze --format json --stdout
///   surveytally analyze --fail-below good
///   surveytally questions add "Was the service counter easy to find?"
///   surveytally submit --name "Budi" --answer 0=BS --answer 1=B
///   surveytally init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to the JSON content document
    ///
    /// Defaults to the value in .surveytally.toml, then content.json.
    #[arg(short, long, global = true, value_name = "FILE", env = "SURVEYTALLY_STORE")]
    pub store: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .surveytally.toml in the current directory
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Aggregate all responses and write a report
    Analyze(AnalyzeArgs),

    /// List or edit the ordered question registry
    Questions(QuestionsArgs),

    /// Record a new survey response
    Submit(SubmitArgs),

    /// Generate a default .surveytally.toml configuration file
    InitConfig,
}

#[derive(clap::Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Output file path for the report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Print the report to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,

    /// Report heading
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Leave respondents' suggestions out of the report
    #[arg(long)]
    pub no_suggestions: bool,

    /// Exit with code 2 if the overall result is below this level
    ///
    /// Values: poor, fair, good, very-good. A survey without answers is
    /// below every level.
    #[arg(long, value_name = "LEVEL")]
    pub fail_below: Option<FailLevel>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct QuestionsArgs {
    #[command(subcommand)]
    pub action: Option<QuestionAction>,
}

/// Registry operations. Indices are zero-based, as stored in answer maps.
#[derive(Subcommand, Debug, Clone)]
pub enum QuestionAction {
    /// Print the questions in order (default)
    List,

    /// Append a question at the end
    Add {
        /// Question text
        text: String,
    },

    /// Replace the text of a question, keeping its position
    Edit {
        /// Zero-based question index
        index: usize,
        /// New question text
        text: String,
    },

    /// Remove a question; later questions shift down
    ///
    /// Stored answers keep their old indices, so answers after the removed
    /// position will be attributed to different questions.
    Remove {
        /// Zero-based question index
        index: usize,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct SubmitArgs {
    /// Respondent name
    #[arg(short, long)]
    pub name: String,

    /// Answer as INDEX=CODE, where CODE is K, C, B or BS (repeatable)
    #[arg(short, long = "answer", value_name = "INDEX=CODE")]
    pub answers: Vec<String>,

    /// Free-text suggestion or comment
    #[arg(long, value_name = "TEXT", default_value = "")]
    pub suggestion: String,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

/// Minimum overall result for --fail-below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, clap::ValueEnum)]
pub enum FailLevel {
    Poor,
    Fair,
    Good,
    VeryGood,
}

impl FailLevel {
    pub fn predicate(self) -> Predicate {
        match self {
            FailLevel::Poor => Predicate::Poor,
            FailLevel::Fair => Predicate::Fair,
            FailLevel::Good => Predicate::Good,
            FailLevel::VeryGood => Predicate::VeryGood,
        }
    }
}

/// Error for a malformed `--answer` value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnswerParseError {
    #[error("answer '{0}' must look like INDEX=CODE (for example 0=BS)")]
    MissingSeparator(String),

    #[error("answer '{0}' has an invalid question index")]
    InvalidIndex(String),
}

/// Parse one `INDEX=CODE` pair. Unknown codes are accepted as-is.
pub fn parse_answer(raw: &str) -> Result<(usize, Rating), AnswerParseError> {
    let (index, code) = raw
        .split_once('=')
        .ok_or_else(|| AnswerParseError::MissingSeparator(raw.to_string()))?;

    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|_| AnswerParseError::InvalidIndex(raw.to_string()))?;

    Ok((index, Rating::from(code.trim())))
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        match &self.command {
            Command::Analyze(analyze) => {
                if analyze.stdout && analyze.output.is_some() {
                    return Err("Cannot use both --stdout and --output".to_string());
                }
            }
            Command::Questions(QuestionsArgs {
                action: Some(QuestionAction::Add { text } | QuestionAction::Edit { text, .. }),
            }) => {
                if text.trim().is_empty() {
                    return Err("Question text cannot be empty".to_string());
                }
            }
            Command::Submit(submit) => {
                if submit.name.trim().is_empty() {
                    return Err("Respondent name cannot be empty".to_string());
                }
                for raw in &submit.answers {
                    parse_answer(raw).map_err(|e| e.to_string())?;
                }
            }
            _ => {}
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings. `-q` wins over both
    /// `-v` and the config file's `verbose`.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surveytally::models::RatingCode;

    fn make_args(command: Command) -> Args {
        Args {
            store: None,
            config: None,
            verbose: false,
            quiet: false,
            command,
        }
    }

    fn submit(answers: &[&str]) -> Command {
        Command::Submit(SubmitArgs {
            name: "Budi".to_string(),
            answers: answers.iter().map(|s| s.to_string()).collect(),
            suggestion: String::new(),
        })
    }

    #[test]
    fn test_parse_answer() {
        assert_eq!(
            parse_answer("2=BS"),
            Ok((2, Rating::Recognized(RatingCode::BaikSekali)))
        );
        assert_eq!(parse_answer(" 0 = K ").map(|(i, _)| i), Ok(0));
        assert_eq!(parse_answer("1=Z").map(|(_, r)| r.code()), Ok(None));
        assert!(matches!(
            parse_answer("BS"),
            Err(AnswerParseError::MissingSeparator(_))
        ));
        assert!(matches!(
            parse_answer("x=BS"),
            Err(AnswerParseError::InvalidIndex(_))
        ));
        assert!(matches!(
            parse_answer("-1=BS"),
            Err(AnswerParseError::InvalidIndex(_))
        ));
    }

    #[test]
    fn test_validation_submit() {
        assert!(make_args(submit(&["0=BS", "1=B"])).validate().is_ok());
        assert!(make_args(submit(&["0:BS"])).validate().is_err());

        let mut args = make_args(submit(&[]));
        if let Command::Submit(ref mut s) = args.command {
            s.name = "  ".to_string();
        }
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_empty_question() {
        let args = make_args(Command::Questions(QuestionsArgs {
            action: Some(QuestionAction::Add {
                text: " ".to_string(),
            }),
        }));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args(Command::InitConfig);
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_fail_level_ordering() {
        assert!(FailLevel::Poor.predicate() < FailLevel::Good.predicate());
        assert_eq!(FailLevel::VeryGood.predicate(), Predicate::VeryGood);
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args(Command::InitConfig);
        assert_eq!(args.log_level(false), tracing::Level::INFO);
        assert_eq!(args.log_level(true), tracing::Level::DEBUG);

        args.verbose = true;
        assert_eq!(args.log_level(false), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(false), tracing::Level::ERROR);
        assert_eq!(args.log_level(true), tracing::Level::ERROR);
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let args = Args::try_parse_from([
            "surveytally",
            "--store",
            "x.json",
            "analyze",
            "--format",
            "json",
            "--fail-below",
            "very-good",
        ])
        .unwrap();

        assert_eq!(args.store, Some(PathBuf::from("x.json")));
        match args.command {
            Command::Analyze(a) => {
                assert_eq!(a.format, OutputFormat::Json);
                assert_eq!(a.fail_below, Some(FailLevel::VeryGood));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
