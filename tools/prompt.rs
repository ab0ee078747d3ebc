/// Prompt — generate sentences from a template and browse the lexicon.
///
/// Usage:
///   prompt generate "a [uncategorized] car" -n 3 [--seed <n>] [--no-history]
///   prompt words <category>
///   prompt categories
///   prompt types
///   prompt history

use clap::{Parser, Subcommand};
use log::info;
use prompt_engine::core::config::{EngineConfig, DEFAULT_CONFIG_FILE};
use prompt_engine::core::history::History;
use prompt_engine::core::lexicon::{LexiconSource, LexiconStore};
use prompt_engine::core::pipeline::{PipelineError, PromptEngineBuilder};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(name = "prompt", about = "Expand bracketed templates from a JSON lexicon")]
struct Cli {
    /// RON config file; defaults apply when it does not exist.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Lexicon directory, overriding the config.
    #[arg(long)]
    dir: Option<PathBuf>,

    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a template one or more times.
    Generate {
        template: String,
        #[arg(short = 'n', long)]
        count: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        no_history: bool,
    },
    /// Print a category's words, sorted.
    Words { category: String },
    /// Print every category listed under a type.
    Categories,
    /// Print each category type with its categories.
    Types,
    /// Print previously resolved templates.
    History,
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("ERROR: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), PipelineError> {
    let mut config = EngineConfig::load_or_default(&cli.config)?;
    if let Some(dir) = cli.dir {
        config.lexicon_dir = dir;
    }
    info!("configuration: {config:?}");

    let store = LexiconStore::new(&config.lexicon_dir);
    let defaults = config.default_category_types.clone();
    store.load_category_types_or_init(|| defaults.or_else(ask_for_default_types));

    match cli.command {
        Command::Generate {
            template,
            count,
            seed,
            no_history,
        } => {
            let mut builder = PromptEngineBuilder::from_config(&config);
            if let Some(seed) = seed {
                builder = builder.seed(seed);
            }
            if no_history {
                builder = builder.without_history();
            }
            let mut engine = builder.build()?;
            for line in engine.generate_many(&template, count.unwrap_or(config.count))? {
                println!("{line}");
            }
        }
        Command::Words { category } => {
            for word in store.sorted_words(&category) {
                println!("{word}");
            }
        }
        Command::Categories => {
            for category in store.all_categories() {
                println!("{category}");
            }
        }
        Command::Types => {
            for (name, categories) in store.load_category_types().iter() {
                println!("{name}: {}", categories.join(", "));
            }
        }
        Command::History => match config.history_path {
            Some(path) => {
                for entry in History::load(path)?.entries() {
                    println!("{entry}");
                }
            }
            None => println!("History is disabled in the config."),
        },
    }

    Ok(())
}

/// Ask on stdin for the type names to start a new lexicon with.
fn ask_for_default_types() -> Option<String> {
    print!("Enter default category types separated by comma (e.g., uncategorized,nouns): ");
    io::stdout().flush().ok()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).ok()?;
    Some(line.trim().to_string())
}
