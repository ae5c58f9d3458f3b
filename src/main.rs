//! Symposium CLI entry point.

use anyhow::Result;
use clap::Parser;
use symposium::api::{ApiClient, NewCourse};
use symposium::cli::{commands, Cli, Commands};
use symposium::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = match &cli.config {
        Some(path) => Settings::expand_path(path),
        None => Settings::default_config_path(),
    };
    let mut settings = Settings::load_from(Some(&config_path))?;

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("symposium={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if let Some(url) = &cli.api_url {
        settings.api.base_url = url.clone();
    }

    // Execute command
    match cli.command {
        Commands::Config { action } => {
            commands::run_config(&action, settings, config_path)?;
        }

        Commands::Phrases { file, json } => {
            commands::run_phrases(&file, json, &settings)?;
        }

        command => {
            let api = ApiClient::new(&settings.api)?;
            tracing::debug!(base_url = %api.base_url(), "Using backend");
            run_remote(command, &api, &settings).await?;
        }
    }

    Ok(())
}

async fn run_remote(command: Commands, api: &ApiClient, settings: &Settings) -> Result<()> {
    match command {
        Commands::Thinkers { id } => commands::run_thinkers(api, id).await,

        Commands::Courses { thinker } => commands::run_courses(api, thinker).await,

        Commands::Course { id } => commands::run_course(api, id).await,

        Commands::CreateCourse {
            thinker,
            title,
            description,
            difficulty,
            lectures,
        } => {
            let course = NewCourse {
                title,
                description,
                thinker_id: thinker,
                difficulty_level: difficulty,
                num_lectures: lectures,
            };
            commands::run_create_course(api, course).await
        }

        Commands::GenerateLecture { course, topic, title } => {
            commands::run_generate_lecture(api, course, &topic, title).await
        }

        Commands::GenerateAudio { id } => commands::run_generate_audio(api, id).await,

        Commands::Lecture { id, phrases } => {
            commands::run_lecture(api, id, phrases, settings).await
        }

        Commands::Play { id, file } => commands::run_play(api, id, file.as_deref(), settings).await,

        Commands::Config { .. } | Commands::Phrases { .. } => Ok(()),
    }
}
