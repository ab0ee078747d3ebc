/// Lexicon Linter — checks category files and templates before use.
///
/// Usage: lexicon_linter [<lexicon_dir>] [--template <text>]... [--templates-file <path>]

use clap::Parser;
use prompt_engine::core::lexicon::{LexiconStore, DEFAULT_LEXICON_DIR};
use prompt_engine::core::lint::lint_lexicon;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser, Debug)]
#[command(name = "lexicon_linter", about = "Check a prompt lexicon for problems")]
struct Args {
    #[arg(default_value = DEFAULT_LEXICON_DIR)]
    lexicon_dir: PathBuf,

    /// A template to check against the lexicon. May be repeated.
    #[arg(long = "template")]
    templates: Vec<String>,

    /// JSON array of templates, such as a history file.
    #[arg(long)]
    templates_file: Option<PathBuf>,

    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    if !args.lexicon_dir.is_dir() {
        eprintln!("ERROR: Path '{}' is not a directory", args.lexicon_dir.display());
        process::exit(1);
    }

    let mut templates = args.templates;
    if let Some(path) = &args.templates_file {
        match load_templates(path) {
            Ok(loaded) => templates.extend(loaded),
            Err(e) => {
                eprintln!("ERROR: Failed to load templates from {}: {}", path.display(), e);
                process::exit(1);
            }
        }
    }

    let store = LexiconStore::new(&args.lexicon_dir);
    let report = lint_lexicon(&store, &templates);

    println!("\n=== Lexicon Lint Report ===\n");

    if report.is_clean() {
        println!("All checks passed!");
    }

    for warning in &report.warnings {
        println!("WARNING: {}", warning);
    }

    for error in &report.errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        report.errors.len(),
        report.warnings.len()
    );

    process::exit(report.exit_code());
}

fn load_templates(path: &Path) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}
