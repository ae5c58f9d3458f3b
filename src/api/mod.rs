//! Data access for the Symposium backend.
//!
//! Provides a trait-based interface so commands can run against the HTTP
//! backend or an in-memory catalogue.

mod client;
mod memory;
mod models;

pub use client::ApiClient;
pub use memory::MemorySource;
pub use models::{
    timings_path_for, Course, GenerateLecture, Lecture, LectureStatus, NewCourse, Thinker,
};

use crate::error::Result;
use crate::sync::TimingsData;
use async_trait::async_trait;
use tracing::{debug, warn};
use uuid::Uuid;

/// Source of thinkers, courses, lectures and word timings.
#[async_trait]
pub trait LectureSource: Send + Sync {
    async fn thinkers(&self) -> Result<Vec<Thinker>>;

    async fn thinker(&self, id: Uuid) -> Result<Thinker>;

    /// List courses, optionally only those by one thinker.
    async fn courses(&self, thinker_id: Option<Uuid>) -> Result<Vec<Course>>;

    async fn course(&self, id: Uuid) -> Result<Course>;

    async fn create_course(&self, course: &NewCourse) -> Result<Course>;

    /// Lectures of a course, ordered by sequence number.
    async fn lectures(&self, course_id: Uuid) -> Result<Vec<Lecture>>;

    async fn lecture(&self, id: Uuid) -> Result<Lecture>;

    /// Ask the backend to write a new lecture transcript.
    async fn generate_lecture(&self, request: &GenerateLecture) -> Result<Lecture>;

    /// Ask the backend to synthesize audio for a lecture.
    async fn generate_audio(&self, lecture_id: Uuid) -> Result<Lecture>;

    /// Word timings for a lecture. `Ok(None)` when the lecture has no audio.
    async fn timings(&self, lecture: &Lecture) -> Result<Option<TimingsData>>;
}

/// A lecture with the timing data needed for synced playback, if available.
#[derive(Debug, Clone)]
pub struct LoadedLecture {
    pub lecture: Lecture,
    /// Present only when audio exists and its timings loaded with at least one word.
    pub timings: Option<TimingsData>,
}

impl LoadedLecture {
    pub fn is_synced(&self) -> bool {
        self.timings.is_some()
    }
}

/// Fetch a lecture and, when it has audio, its word timings.
///
/// A failed or empty timings fetch degrades to a plain transcript.
pub async fn load_lecture(source: &dyn LectureSource, id: Uuid) -> Result<LoadedLecture> {
    let lecture = source.lecture(id).await?;

    let timings = match source.timings(&lecture).await {
        Ok(Some(timings)) if timings.is_syncable() => Some(timings),
        Ok(Some(_)) => {
            debug!(lecture = %id, "Word timings are empty, using plain transcript");
            None
        }
        Ok(None) => None,
        Err(e) => {
            warn!(lecture = %id, "Failed to load word timings: {}", e);
            None
        }
    };

    Ok(LoadedLecture { lecture, timings })
}
