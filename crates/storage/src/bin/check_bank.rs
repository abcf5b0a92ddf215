use std::fmt;
use std::path::PathBuf;

use storage::sources::JsonFileSource;

#[derive(Debug, Clone)]
struct Args {
    path: PathBuf,
    strict: bool,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidPath { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidPath { raw } => write!(f, "invalid --bank value: {raw:?}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut path = std::env::var("EXAM_QUESTIONS")
            .map_or_else(|_| PathBuf::from("questions.json"), PathBuf::from);
        let mut strict = false;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--bank" => {
                    let value = require_value(&mut args, "--bank")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidPath { raw: value });
                    }
                    path = PathBuf::from(value);
                }
                "--strict" => strict = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { path, strict })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin check_bank -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --bank <path>   Question bank JSON file (default: questions.json)");
    eprintln!("  --strict        Exit non-zero when any question is rejected or unanswerable");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  EXAM_QUESTIONS");
}

#[tokio::main]
async fn main() {
    let args = match Args::parse() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            std::process::exit(2);
        }
    };

    let bank = match JsonFileSource::new(&args.path).load().await {
        Ok(bank) => bank,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    println!("{}", args.path.display());
    for (subject, questions) in bank.subjects() {
        println!("  {:<12} {:>5} questions", subject.as_str(), questions.len());
    }

    let mut problems = 0_usize;
    for rejected in bank.rejected() {
        problems += 1;
        println!(
            "  rejected  {}[{}]: {}",
            rejected.subject, rejected.position, rejected.error
        );
    }
    for (subject, question) in bank.unanswerable() {
        problems += 1;
        println!(
            "  no match  {subject}: {:?} has answer {:?} outside its options",
            question.text(),
            question.correct_answer()
        );
    }

    if problems == 0 {
        println!("  ok");
    } else if args.strict {
        std::process::exit(1);
    }
}
