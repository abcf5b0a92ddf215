//! `exam`: terminal front end for the exam trainer.

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use exam_core::model::Subject;
use services::{
    AppServices, Clock, DriveOutcome, ExamAttempt, ExamDriver, ExamEvents, ExamServiceError,
    QuestionSourceConfig,
};

mod config;
mod terminal;
mod vm;

use terminal::{StdinInput, TerminalEvents};

#[derive(Parser)]
#[command(name = "exam", version, about = "Multiple-choice exam trainer")]
struct Cli {
    /// SQLite database holding the best score
    #[arg(long, env = "EXAM_DB_URL", default_value = config::DEFAULT_DB_URL, global = true)]
    db: String,

    /// Local question bank JSON file
    #[arg(long, env = "EXAM_QUESTIONS", default_value = "questions.json", global = true)]
    questions: PathBuf,

    /// Remote question store, tried before the local bank
    #[arg(long, env = "EXAM_REMOTE_URL", global = true)]
    remote: Option<String>,

    /// Keep answer options in bank order
    #[arg(long, global = true)]
    no_shuffle_options: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Untimed practice over one subject
    Practice {
        subject: String,

        /// Number of questions (default: the whole subject)
        #[arg(long)]
        count: Option<usize>,
    },

    /// Timed mock exam across all subjects
    Mock,

    /// Show the best score so far
    Best,

    /// List subjects and how many questions each has
    Subjects,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let sources = QuestionSourceConfig {
        bank_path: cli.questions,
        remote_url: cli.remote,
    };

    if matches!(cli.command, Commands::Subjects) {
        return list_subjects(&sources).await;
    }

    let db_url = config::normalize_sqlite_url(&cli.db);
    let services = AppServices::new_sqlite(&db_url, &sources, Clock::default())
        .await
        .with_context(|| format!("failed to open {db_url}"))?
        .with_shuffle_options(!cli.no_shuffle_options);
    let exam_loop = services.exam_loop();

    let started = match cli.command {
        Commands::Practice { subject, count } => exam_loop.start_exam(&subject, count).await,
        Commands::Mock => exam_loop.start_mock_exam(services.mock_config()).await,
        Commands::Best => {
            let best = exam_loop.best_score().await?;
            println!("Best Score: {best}");
            return Ok(());
        }
        Commands::Subjects => return Ok(()),
    };

    let Some(attempt) = notice_or_attempt(started)? else {
        return Ok(());
    };

    let mut events = TerminalEvents::stdout();
    let mut input = StdinInput::new();
    let outcome = match ExamDriver::new(&exam_loop)
        .run(attempt, &mut input, &mut events)
        .await
    {
        Ok(outcome) => outcome,
        Err(err) if err.attempt().is_finished() => {
            let (error, mut attempt) = err.into_parts();
            tracing::warn!(%error, "retrying best score write");
            let finished = exam_loop
                .finalize(&mut attempt)
                .await
                .context("could not record the best score")?;
            events.on_exam_finished(&finished.summary, finished.best_score);
            events.on_review_available(attempt.session().review_log());
            DriveOutcome::Finished(finished)
        }
        Err(err) => return Err(err.into()),
    };

    match outcome {
        DriveOutcome::Finished(finished) => {
            if finished.is_new_best {
                events.notice("🏆 New best score!");
            }
            if input.confirm("Show review analysis? [y/N] ").await {
                events.render_review();
            }
        }
        DriveOutcome::Cancelled { answered } => {
            events.notice(&format!(
                "Exam cancelled after {answered} answer(s); score not recorded."
            ));
        }
    }
    Ok(())
}

/// Start failures with a user-facing message are printed, not raised.
fn notice_or_attempt(
    started: Result<ExamAttempt, ExamServiceError>,
) -> anyhow::Result<Option<ExamAttempt>> {
    match started {
        Ok(attempt) => Ok(Some(attempt)),
        Err(err) => match err.user_message() {
            Some(message) => {
                tracing::debug!(error = %err, "exam not started");
                println!("{message}");
                Ok(None)
            }
            None => Err(err.into()),
        },
    }
}

async fn list_subjects(sources: &QuestionSourceConfig) -> anyhow::Result<()> {
    let source = sources.build()?;
    for name in Subject::well_known() {
        let subject = Subject::new(name)?;
        match source.fetch_subject(&subject).await {
            Ok(questions) => println!("{name:<12}{:>5} questions", questions.len()),
            Err(err) => println!("{name:<12} unavailable ({err})"),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("{err:#}");
        process::exit(2);
    }
}
