//! CLI module for Symposium.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};
use uuid::Uuid;

/// Symposium - lectures by historical thinkers, read along word by word
///
/// Browse the lecture catalogue, ask the backend to generate new lectures and
/// audio, and follow a lecture's transcript in sync with its narration.
#[derive(Parser, Debug)]
#[command(name = "symposium")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Backend base URL (overrides the config file)
    #[arg(long, env = "SYMPOSIUM_API_URL", global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List thinkers, or show one
    Thinkers {
        /// Show a single thinker
        #[arg(long)]
        id: Option<Uuid>,
    },

    /// List courses
    Courses {
        /// Only courses by this thinker
        #[arg(short, long)]
        thinker: Option<Uuid>,
    },

    /// Show a course and its lectures
    Course {
        /// Course ID
        id: Uuid,
    },

    /// Create a course for a thinker
    CreateCourse {
        /// Thinker delivering the course
        #[arg(short, long)]
        thinker: Uuid,

        /// Course title
        #[arg(long)]
        title: String,

        /// Course description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Difficulty level (introductory, intermediate, advanced)
        #[arg(long)]
        difficulty: Option<String>,

        /// Number of lectures planned
        #[arg(short, long)]
        lectures: Option<u32>,
    },

    /// Generate a lecture transcript for a course
    GenerateLecture {
        /// Course ID
        #[arg(long)]
        course: Uuid,

        /// Lecture topic
        #[arg(long)]
        topic: String,

        /// Lecture title (defaults to the topic)
        #[arg(long)]
        title: Option<String>,
    },

    /// Generate narration audio for a lecture
    GenerateAudio {
        /// Lecture ID
        id: Uuid,
    },

    /// Print a lecture transcript
    Lecture {
        /// Lecture ID
        id: Uuid,

        /// List phrase boundaries with timestamps
        #[arg(long)]
        phrases: bool,
    },

    /// Analyze phrase grouping of a local word-timings file
    Phrases {
        /// Path to a timings JSON file
        file: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Play a lecture in the terminal with a synced transcript
    Play {
        /// Lecture ID
        #[arg(required_unless_present = "file", conflicts_with = "file")]
        id: Option<Uuid>,

        /// Play a local timings JSON file instead
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "sync.phrase_gap_ms")
        key: String,
        /// Configuration value
        value: String,
    },

    /// Show configuration file path
    Path,
}
