#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "cli")]
use colored::*;
#[cfg(feature = "cli")]
use indicatif::{ProgressBar, ProgressStyle};
#[cfg(feature = "cli")]
use spellcheck_pro::{
    checker::describe_misspelling, init_logging, reader, Config, Endpoint,
    Language, OracleClient, SpellCheckResult, SpellChecker,
};
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use std::time::Duration;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "spellcheck-pro-cli")]
#[command(about = "Checks words starting with 'a' in Word documents against the Oxford Dictionaries API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct ApiArgs {
    /// OED API application ID (defaults to OED_APP_ID)
    #[arg(long)]
    app_id: Option<String>,

    /// OED API application key (defaults to OED_APP_KEY)
    #[arg(long)]
    app_key: Option<String>,

    /// Lookup to perform
    #[arg(short, long, value_enum)]
    endpoint: Option<Endpoint>,

    /// Dictionary language code (en-gb, en-us, es, ...)
    #[arg(short, long)]
    language: Option<String>,

    /// Dictionary API base URL
    #[arg(long)]
    base_url: Option<String>,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct FilterArgs {
    /// Number of candidate words to check
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Only check purely alphabetic words
    #[arg(long)]
    english_only: bool,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Check a document and write a flagged copy
    Check {
        /// Word document (.docx) to check
        file: PathBuf,

        #[command(flatten)]
        api: ApiArgs,

        #[command(flatten)]
        filter: FilterArgs,

        /// Directory the modified document is written to
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the words a check would send to the dictionary
    Candidates {
        /// Word document (.docx) to read
        file: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Look up a single word
    Lookup {
        word: String,

        #[command(flatten)]
        api: ApiArgs,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or create the configuration file
    Config {
        /// Write the current settings to the configuration file
        #[arg(long)]
        init: bool,
    },
}

#[cfg(feature = "cli")]
impl ApiArgs {
    fn apply(self, config: &mut Config) -> anyhow::Result<()> {
        if let Some(app_id) = self.app_id {
            config.app_id = app_id;
        }
        if let Some(app_key) = self.app_key {
            config.app_key = app_key;
        }
        if let Some(endpoint) = self.endpoint {
            config.endpoint = endpoint;
        }
        if let Some(language) = self.language {
            config.language = Language::from_code(&language)?;
        }
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        Ok(())
    }
}

#[cfg(feature = "cli")]
impl FilterArgs {
    fn apply(self, config: &mut Config) {
        if let Some(limit) = self.limit {
            config.candidate_limit = limit;
        }
        if self.english_only {
            config.english_only = true;
        }
    }
}

#[cfg(feature = "cli")]
fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(feature = "cli")]
fn print_result(result: &SpellCheckResult) {
    if result.is_correct {
        println!("  {} {}", "✓".green().bold(), result.word.green());
    } else {
        println!("  {} {}", "✗".red().bold(), result.word.red().bold());
        if let Some(suggestion) = &result.suggestion {
            println!("    💡 Suggestion: {}", suggestion.green());
        }
        if let Some(error) = &result.error {
            println!("    ⚠️  {}", error.yellow());
        }
    }
    for definition in &result.definitions {
        println!("    • {}", definition.dimmed());
    }
}

#[cfg(feature = "cli")]
fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let mut config = Config::load();

    match cli.command {
        Commands::Check { file, api, filter, output_dir, json } => {
            api.apply(&mut config)?;
            filter.apply(&mut config);
            if let Some(output_dir) = output_dir {
                config.output_dir = output_dir;
            }

            let checker = SpellChecker::new(OracleClient::from_config(&config)?)
                .with_filter(config.candidate_filter())
                .with_output_dir(&config.output_dir);

            let pb = spinner(format!("Checking '{}'...", file.display()));
            let analysis = checker.check_file(&file);
            pb.finish_and_clear();
            let analysis = analysis?;

            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
                return Ok(());
            }

            println!("{}", format!("Spell Check Report for '{}'", file.display()).bold());
            println!("{}", "-".repeat(50));

            if !analysis.has_candidates() {
                println!("{}", "No words starting with 'a' found in the document.".yellow());
                return Ok(());
            }

            for line in analysis.summary().iter().take(3) {
                println!("  {line}");
            }

            println!("\n{}", "Words:".bold().underline());
            for result in &analysis.results {
                print_result(result);
            }

            if analysis.misspelled_words > 0 {
                println!("\n{}", "Words with potential spelling errors:".red().bold());
                for result in analysis.misspelled() {
                    println!("  {}", describe_misspelling(result));
                }
            }

            match &analysis.modified_document {
                Some(path) => println!(
                    "\n{} {}",
                    "✅ Modified document written to".green().bold(),
                    path.display()
                ),
                None => println!("\n{}", "No changes were made to the document.".blue()),
            }
        }

        Commands::Candidates { file, filter } => {
            filter.apply(&mut config);
            let words = reader::read_candidates(&file, &config.candidate_filter());

            if words.is_empty() {
                println!("{}", "No words starting with 'a' found in the document.".yellow());
            } else {
                println!("{}", format!("Candidate words in '{}':", file.display()).bold());
                for word in words {
                    println!("  • {}", word.cyan());
                }
            }
        }

        Commands::Lookup { word, api, json } => {
            api.apply(&mut config)?;
            let checker = SpellChecker::new(OracleClient::from_config(&config)?);

            let pb = spinner(format!("Looking up '{word}'..."));
            let result = checker.check_word(&word);
            pb.finish_and_clear();
            let result = result?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_result(&result);
            }
        }

        Commands::Config { init } => {
            let Some(path) = Config::config_path() else {
                anyhow::bail!("Could not determine the configuration directory");
            };

            if init {
                config.save(&path)?;
                println!("✅ Wrote configuration to '{}'", path.display());
            } else {
                println!("{:<18} {}", "Config file:".bold(), path.display());
                println!("{:<18} {}", "Base URL:".bold(), config.base_url);
                println!("{:<18} {}", "Language:".bold(), config.language.name());
                println!("{:<18} {}", "Lookup:".bold(), config.endpoint.name());
                println!("{:<18} {}", "Words to check:".bold(), config.candidate_limit);
                println!("{:<18} {}", "English only:".bold(), config.english_only);
                println!("{:<18} {}", "Output folder:".bold(), config.output_dir.display());
                let credentials = if config.credentials().is_some() {
                    "configured".green()
                } else {
                    "missing".red()
                };
                println!("{:<18} {}", "Credentials:".bold(), credentials);
            }
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    println!("CLI feature not enabled. Build with --features cli");
    println!("Example: cargo build --features cli");
    println!("Or: cargo run --bin spellcheck-pro-cli --features cli -- [args]");
}
