//! CLI command implementations.

mod catalogue;
mod config;
mod lecture;
mod play;

pub use catalogue::{run_course, run_courses, run_create_course, run_thinkers};
pub use config::run_config;
pub use lecture::{read_timings, run_generate_audio, run_generate_lecture, run_lecture, run_phrases};
pub use play::run_play;
