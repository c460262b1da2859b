use anyhow::{Context, Result, bail};
use arabic_vocab::config::{Config, ConfigArgs};
use arabic_vocab::db::{self, Stores};
use arabic_vocab::drill::ArabicDrill;
use arabic_vocab::models::{LevelType, NewLevel, WordPatch};
use arabic_vocab::session::SessionController;
use arabic_vocab::stats::{VocabularyStats, search_words, summarize_levels};
use arabic_vocab::terminal::{self, QuizRequest};
use arabic_vocab::{logger, server};
use clap::{Parser, Subcommand};
use std::io;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(name = "arabic-vocab", version, about = "English/Arabic vocabulary quiz")]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (default)
    Serve,

    /// Answer questions in the terminal
    Quiz {
        /// Only words missed more often than answered correctly
        #[arg(long, conflicts_with = "level")]
        errors: bool,

        /// Quiz a custom level by name
        #[arg(long)]
        level: Option<String>,
    },

    /// Practice English recall from the Arabic side without recording anything
    Drill,

    /// Show overall and per-level statistics
    Stats,

    /// Add a word
    Add { english: String, arabic: String },

    /// Change a word's text
    Edit {
        id: String,
        #[arg(long)]
        english: Option<String>,
        #[arg(long)]
        arabic: Option<String>,
    },

    /// List every word
    List,

    /// Find words by English or Arabic text
    Search { term: String },

    /// Delete a word by id
    Delete { id: String },

    /// Manage custom levels
    Level {
        #[command(subcommand)]
        command: LevelCommands,
    },
}

#[derive(Subcommand)]
enum LevelCommands {
    /// Create a level from word ids
    Add {
        name: String,
        /// Comma-separated word ids
        #[arg(long, value_delimiter = ',', required = true)]
        words: Vec<String>,
        /// Which side is shown: english or arabic
        #[arg(long = "type", default_value = "english")]
        level_type: LevelType,
    },

    /// List levels with their statistics
    List,

    /// Delete a level by name
    Delete { name: String },

    /// Replace a level's name, words and type, keeping its statistics
    Edit {
        name: String,
        #[arg(long)]
        rename: Option<String>,
        #[arg(long, value_delimiter = ',', required = true)]
        words: Vec<String>,
        #[arg(long = "type", default_value = "english")]
        level_type: LevelType,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from(cli.config);

    logger::init(config.log_file.as_deref()).context("failed to open log file")?;

    if !config.data_dir.exists() {
        std::fs::create_dir_all(&config.data_dir).with_context(|| {
            format!("failed to create data directory {}", config.data_dir.display())
        })?;
    }
    let stores = db::open_stores(&config).context("failed to open word store")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(&config, stores).await,
        Commands::Quiz { errors, level } => {
            let request = match (errors, level) {
                (_, Some(name)) => QuizRequest::Level(name),
                (true, None) => QuizRequest::ErrorsOnly,
                (false, None) => QuizRequest::Standard,
            };
            quiz(stores, request).await
        }
        Commands::Drill => drill(&stores).await,
        Commands::Stats => stats(&stores).await,
        Commands::Add { english, arabic } => {
            let word = stores.words.create(&english, &arabic).await?;
            println!("Added {} ({} = {})", word.id, word.english, word.arabic);
            Ok(())
        }
        Commands::Edit {
            id,
            english,
            arabic,
        } => {
            if english.is_none() && arabic.is_none() {
                bail!("nothing to change; pass --english and/or --arabic");
            }
            let patch = WordPatch {
                english,
                arabic,
                ..WordPatch::default()
            };
            let word = stores.words.update(&id, patch).await?;
            println!("Updated {} ({} = {})", word.id, word.english, word.arabic);
            Ok(())
        }
        Commands::List => {
            let words = stores.words.list().await?;
            print_words(words.iter());
            Ok(())
        }
        Commands::Search { term } => {
            let words = stores.words.list().await?;
            print_words(search_words(&words, &term).into_iter());
            Ok(())
        }
        Commands::Delete { id } => {
            stores.words.delete(&id).await?;
            println!("Deleted {id}");
            Ok(())
        }
        Commands::Level { command } => level(&stores, command).await,
    }
}

async fn serve(config: &Config, stores: Stores) -> Result<()> {
    let (host, port) = config.bind_target();
    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("failed to bind {host}:{port}"))?;
    server::serve(listener, stores, server::shutdown_signal()).await?;
    Ok(())
}

async fn quiz(stores: Stores, request: QuizRequest) -> Result<()> {
    let mut controller = SessionController::new(stores);
    let stdin = io::stdin();
    let summary = terminal::run_quiz(
        &mut controller,
        request,
        &mut stdin.lock(),
        &mut io::stdout(),
    )
    .await?;

    if summary.answered > 0 {
        println!(
            "Answered {} ({} correct)",
            summary.answered, summary.correct
        );
    }
    Ok(())
}

async fn drill(stores: &Stores) -> Result<()> {
    let words = stores.words.list().await?;
    let mut drill = ArabicDrill::new(words);
    let stdin = io::stdin();
    terminal::run_drill(&mut drill, &mut stdin.lock(), &mut io::stdout())?;
    Ok(())
}

async fn stats(stores: &Stores) -> Result<()> {
    let words = stores.words.list().await?;
    let levels = stores.levels.list().await?;

    let overall = VocabularyStats::from_words(&words);
    println!("Words:    {}", overall.total_words);
    println!("Attempts: {}", overall.total_attempts);
    println!("Correct:  {}", overall.correct_answers);
    println!("Accuracy: {}%", overall.accuracy);

    let summaries = summarize_levels(&levels, &words);
    if !summaries.is_empty() {
        println!();
        for level in summaries {
            println!(
                "{:<20} {:>3} words  {:>4} attempts  {:>3}%",
                level.name, level.words, level.attempts, level.accuracy
            );
        }
    }
    Ok(())
}

async fn level(stores: &Stores, command: LevelCommands) -> Result<()> {
    match command {
        LevelCommands::Add {
            name,
            words,
            level_type,
        } => {
            let level = stores
                .levels
                .create(NewLevel {
                    name,
                    word_ids: words,
                    level_type,
                })
                .await?;
            println!("Created level '{}' with {} words", level.name, level.word_ids.len());
        }
        LevelCommands::List => {
            let levels = stores.levels.list().await?;
            for level in levels {
                let side = match level.level_type {
                    LevelType::English => "english",
                    LevelType::Arabic => "arabic",
                };
                println!(
                    "{:<20} {:<8} {:>3} words  {:>4} attempts  {:>3}%",
                    level.name,
                    side,
                    level.word_ids.len(),
                    level.attempts,
                    level.accuracy()
                );
            }
        }
        LevelCommands::Delete { name } => {
            stores.levels.delete(&name).await?;
            println!("Deleted level '{name}'");
        }
        LevelCommands::Edit {
            name,
            rename,
            words,
            level_type,
        } => {
            let replacement = NewLevel {
                name: rename.unwrap_or_else(|| name.clone()),
                word_ids: words,
                level_type,
            };
            let level = db::edit_level(stores.levels.as_ref(), &name, replacement).await?;
            println!("Saved level '{}'", level.name);
        }
    }
    Ok(())
}

fn print_words<'a>(words: impl Iterator<Item = &'a arabic_vocab::models::Word>) {
    for word in words {
        println!(
            "{:<16} {:<24} {:<24} {}/{}",
            word.id, word.english, word.arabic, word.correct_answers, word.total_attempts
        );
    }
}
