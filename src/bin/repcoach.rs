// ABOUTME: Command-line front end for the repcoach coaching pipeline
// ABOUTME: Interactive chat, one-shot messages, and profile setup against a local SQLite database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

//! Usage:
//! ```bash
//! # Chat interactively
//! cargo run --bin repcoach -- chat --user alice
//!
//! # Send one message and print the parsed action
//! cargo run --bin repcoach -- say --user alice --json "3x10 bench at 135 in Full Super A"
//!
//! # Fill in the profile used to personalize replies
//! cargo run --bin repcoach -- profile --user alice --weight 82 --height 180 --goal "build muscle"
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use repcoach::cache::{Cache, CacheProvider};
use repcoach::coach::{CoachService, CoachStores};
use repcoach::config::AppConfig;
use repcoach::database::{ProfileStore, SqliteDatabase};
use repcoach::llm::ChatProvider;
use repcoach::models::UserProfile;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "repcoach",
    about = "AI strength coach",
    long_about = "Log training in plain language. Messages are interpreted by a language model and stored as routines, workouts and sets."
)]
struct CliArgs {
    #[command(subcommand)]
    command: CoachCommand,

    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Subcommand)]
enum CoachCommand {
    /// Chat with the coach until end of input
    Chat {
        /// User the conversation belongs to
        #[arg(long)]
        user: String,
    },

    /// Send a single message
    Say {
        /// User the message belongs to
        #[arg(long)]
        user: String,

        /// Also print the parsed action as JSON
        #[arg(long)]
        json: bool,

        /// The message
        utterance: String,
    },

    /// Create or replace the user profile
    Profile {
        /// User the profile belongs to
        #[arg(long)]
        user: String,

        /// Current body weight
        #[arg(long)]
        weight: Option<f64>,

        /// Height
        #[arg(long)]
        height: Option<f64>,

        /// Target body weight
        #[arg(long)]
        goal_weight: Option<f64>,

        /// Training goal, e.g. "build muscle"
        #[arg(long)]
        goal: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    let mut config = AppConfig::from_env();
    if args.verbose {
        "debug".clone_into(&mut config.logging.level);
    }
    if let Some(url) = args.database_url {
        config.database_url = url;
    }
    config.logging.init()?;
    config.log_summary();
    ensure_database_dir(&config.database_url)?;

    let database = SqliteDatabase::new(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;

    match args.command {
        CoachCommand::Profile {
            user,
            weight,
            height,
            goal_weight,
            goal,
        } => {
            let profile = UserProfile {
                current_weight: weight,
                height,
                goal_weight,
                fitness_goal: goal,
                profile_complete: true,
            };
            database.upsert_profile(&user, &profile).await?;
            info!(user_id = %user, "Profile saved");
            println!("Profile saved for {user}.");
        }
        CoachCommand::Say {
            user,
            json,
            utterance,
        } => {
            let coach = build_coach(&config, database).await?;
            let reply = coach.respond(&utterance, &user).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&reply.action.to_json())?);
            }
            println!("{}", reply.reply);
        }
        CoachCommand::Chat { user } => {
            let coach = build_coach(&config, database).await?;
            chat_loop(&coach, &user).await?;
        }
    }

    Ok(())
}

/// Create the parent directory of a file-backed `SQLite` URL
fn ensure_database_dir(database_url: &str) -> Result<()> {
    let Some(path) = database_url.strip_prefix("sqlite:") else {
        return Ok(());
    };
    let path = path.trim_start_matches("//");
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path.contains(":memory:") {
        return Ok(());
    }
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
}

async fn build_coach(config: &AppConfig, database: SqliteDatabase) -> Result<CoachService> {
    let llm = ChatProvider::create(config.llm_provider, config.llm_model.clone())
        .context("Failed to initialize LLM provider")?;
    let cache = Cache::new(config.cache.clone()).await?;

    Ok(CoachService::new(
        CoachStores::from_database(database),
        Arc::new(llm),
        cache,
        config.cache.ttl.clone(),
        config.coach.clone(),
    ))
}

async fn chat_loop(coach: &CoachService, user: &str) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    stdout.write_all(b"you> ").await?;
    stdout.flush().await?;
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }
        if !line.is_empty() {
            let reply = coach.respond(line, user).await?;
            stdout
                .write_all(format!("coach> {}\n", reply.reply).as_bytes())
                .await?;
        }
        stdout.write_all(b"you> ").await?;
        stdout.flush().await?;
    }
    Ok(())
}
