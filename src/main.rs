//! SurveyTally - satisfaction survey aggregation for academic services
//!
//! A CLI tool that reads the content document kept by the console,
//! aggregates K/C/B/BS survey answers, and writes Markdown or JSON reports.
//!
//! Exit codes:
//!   0 - Success (or overall result at or above --fail-below)
//!   1 - Runtime error (missing document, bad config, invalid arguments, etc.)
//!   2 - Overall result below the --fail-below level

mod cli;
mod config;

use anyhow::{Context, Result};
use cli::{AnalyzeArgs, Args, Command, OutputFormat, QuestionAction, SubmitArgs};
use config::{Config, CONFIG_FILE_NAME};
use std::path::PathBuf;
use surveytally::analysis;
use surveytally::models::{Answers, Response};
use surveytally::registry;
use surveytally::report::{self, ReportOptions};
use surveytally::store::{DocumentStore, JsonFileStore};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Config comes first so `[general] verbose` can pick the log level
    let (mut config, source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(args.log_level(config.general.verbose))?;

    info!("SurveyTally v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    source.log();

    match run(&args, &config) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle init-config: generate a default .surveytally.toml.
fn handle_init_config() -> Result<i32> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        return Ok(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to set the document path, report title, and more.");
    Ok(0)
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) -> Result<()> {
    // stderr: `analyze --stdout` owns stdout
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Dispatch the subcommand. Returns the process exit code.
fn run(args: &Args, config: &Config) -> Result<i32> {
    match &args.command {
        Command::Analyze(analyze) => {
            run_analyze(&open_store(config), config, analyze, args.quiet)
        }
        Command::Questions(questions) => run_questions(
            &open_store(config),
            questions.action.clone().unwrap_or(QuestionAction::List),
        ),
        Command::Submit(submit) => run_submit(&open_store(config), submit),
        Command::InitConfig => handle_init_config(),
    }
}

fn open_store(config: &Config) -> JsonFileStore {
    let store = JsonFileStore::new(config.store.path.clone());
    info!("Using document: {}", store.describe());
    store
}

/// Aggregate the stored responses and write the report. Returns 0 or 2.
fn run_analyze(
    store: &impl DocumentStore,
    config: &Config,
    args: &AnalyzeArgs,
    quiet: bool,
) -> Result<i32> {
    let document = store
        .load()
        .with_context(|| format!("Failed to load survey data from {}", store.describe()))?;

    let questions = registry::questions(&document);
    let analysis = analysis::analyze(questions, &document.responses);

    if analysis.stale_answers > 0 {
        warn!(
            "{} answer(s) reference question indices beyond the current {} questions",
            analysis.stale_answers,
            questions.len()
        );
    }
    if analysis.unrecognized_answers > 0 {
        warn!(
            "{} answer(s) carry an unrecognized rating code and were ignored",
            analysis.unrecognized_answers
        );
    }

    let summary = analysis.summary.clone();
    let report = report::build_report(
        analysis,
        &config.report.title,
        &store.describe(),
        config.report.weakest_questions,
    );

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(
            &report,
            &ReportOptions {
                include_suggestions: config.report.include_suggestions,
                max_suggestions: config.report.max_suggestions,
            },
        ),
    };

    if args.stdout {
        println!("{}", output);
    } else {
        let path = &config.report.output;
        std::fs::write(path, &output)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;

        if !quiet {
            println!("\n📊 Survey Summary:");
            println!("   Questions: {}", report.metadata.question_count);
            println!("   Responses: {}", summary.response_count);
            println!(
                "   Overall: {} {} (mean {:.2} over {} answers)",
                summary.predicate.emoji(),
                summary.predicate,
                summary.pooled_mean,
                summary.answer_count
            );
            println!("\n✅ Report saved to: {}", path.display());
        }
    }

    if let Some(level) = args.fail_below {
        if summary.predicate < level.predicate() {
            eprintln!(
                "\n⛔ Overall result '{}' is below '{}'. Failing (exit code 2).",
                summary.predicate,
                level.predicate()
            );
            return Ok(2);
        }
    }

    Ok(0)
}

/// List or edit the question registry.
fn run_questions(store: &impl DocumentStore, action: QuestionAction) -> Result<i32> {
    match action {
        QuestionAction::List => {
            let document = store
                .load()
                .with_context(|| format!("Failed to load survey data from {}", store.describe()))?;
            let questions = registry::questions(&document);

            if questions.is_empty() {
                println!("No survey questions are configured.");
            }
            for (index, question) in questions.iter().enumerate() {
                println!("[{}] {}", index, question);
            }
        }
        QuestionAction::Add { text } => {
            let mut document = load_for_update(store)?;
            let index = registry::add_question(&mut document, text.trim());
            store.save(&document)?;
            println!("✅ Added question [{}].", index);
        }
        QuestionAction::Edit { index, text } => {
            let mut document = load_for_update(store)?;
            let old = registry::edit_question(&mut document, index, text.trim())?;
            store.save(&document)?;
            debug!("Question [{}] was: {}", index, old);
            println!("✅ Updated question [{}].", index);
        }
        QuestionAction::Remove { index } => {
            let mut document = load_for_update(store)?;
            let removal = registry::remove_question(&mut document, index)?;
            if removal.misaligned_responses > 0 {
                warn!(
                    "{} stored response(s) answered question [{}] or later; \
                     those answers now point at different questions",
                    removal.misaligned_responses, index
                );
            }
            store.save(&document)?;
            println!("✅ Removed question [{}]: {}", index, removal.removed);
        }
    }

    Ok(0)
}

/// Append a response built from the CLI arguments.
fn run_submit(store: &impl DocumentStore, args: &SubmitArgs) -> Result<i32> {
    let mut document = load_for_update(store)?;
    let question_count = registry::questions(&document).len();

    let mut answers = Answers::new();
    for raw in &args.answers {
        let (index, rating) = cli::parse_answer(raw)?;

        if rating.code().is_none() {
            warn!("Answer '{}' has an unrecognized code; it will be ignored by analysis", raw);
        }
        if index >= question_count {
            warn!(
                "Answer '{}' refers to question [{}] but only {} question(s) exist",
                raw, index, question_count
            );
        }

        answers.insert(index.to_string(), rating);
    }

    let response = Response::new(args.name.trim(), answers, args.suggestion.trim());
    let id = response.id.clone();
    document.responses.push(response);
    store.save(&document)?;

    println!("✅ Recorded response {} ({} answers).", id, args.answers.len());
    Ok(0)
}

/// Load the document for an edit, starting empty if it does not exist yet.
fn load_for_update(store: &impl DocumentStore) -> Result<surveytally::models::SurveyDocument> {
    store
        .load_or_default()
        .with_context(|| format!("Failed to load survey data from {}", store.describe()))
}

/// Where the configuration came from. Logged once logging is set up.
enum ConfigSource {
    Explicit(PathBuf),
    DefaultFile,
    Builtin,
    /// The implicit file exists but could not be loaded.
    Fallback(anyhow::Error),
}

impl ConfigSource {
    fn log(&self) {
        match self {
            ConfigSource::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigSource::DefaultFile => info!("Loaded default config from {}", CONFIG_FILE_NAME),
            ConfigSource::Builtin => debug!("No config file found, using defaults"),
            ConfigSource::Fallback(e) => warn!("Failed to load config: {:#}", e),
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigSource)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigSource::Explicit(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigSource::DefaultFile)),
        Ok(None) => Ok((Config::default(), ConfigSource::Builtin)),
        Err(e) => Ok((Config::default(), ConfigSource::Fallback(e))),
    }
}
