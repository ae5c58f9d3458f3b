//! In-memory lecture catalogue.
//!
//! Useful for testing and for running commands without a backend.

use super::models::{Course, GenerateLecture, Lecture, LectureStatus, NewCourse, Thinker};
use super::LectureSource;
use crate::error::{Result, SymposiumError};
use crate::sync::TimingsData;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

#[derive(Default)]
struct Catalogue {
    thinkers: Vec<Thinker>,
    courses: Vec<Course>,
    lectures: Vec<Lecture>,
    timings: HashMap<Uuid, TimingsData>,
}

/// In-memory lecture source.
#[derive(Default)]
pub struct MemorySource {
    catalogue: RwLock<Catalogue>,
}

impl MemorySource {
    /// Create an empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a thinker with only a name and era.
    pub fn add_thinker(&self, name: &str, era: &str) -> Thinker {
        let thinker = Thinker {
            id: Uuid::new_v4(),
            name: name.to_string(),
            era: era.to_string(),
            birth_year: None,
            death_year: None,
            nationality: String::new(),
            bio: String::new(),
            personality_traits: String::new(),
            speaking_style: String::new(),
            image_url: None,
            discipline_id: None,
        };
        self.write().thinkers.push(thinker.clone());
        thinker
    }

    fn read(&self) -> RwLockReadGuard<'_, Catalogue> {
        self.catalogue.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Catalogue> {
        self.catalogue.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Attach word timings to a lecture's audio.
    pub fn set_timings(&self, lecture_id: Uuid, timings: TimingsData) {
        self.write().timings.insert(lecture_id, timings);
    }
}

#[async_trait]
impl LectureSource for MemorySource {
    async fn thinkers(&self) -> Result<Vec<Thinker>> {
        Ok(self.read().thinkers.clone())
    }

    async fn thinker(&self, id: Uuid) -> Result<Thinker> {
        self.read()
            .thinkers
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| SymposiumError::NotFound("thinker".into()))
    }

    async fn courses(&self, thinker_id: Option<Uuid>) -> Result<Vec<Course>> {
        let catalogue = self.read();
        let mut courses: Vec<Course> = catalogue
            .courses
            .iter()
            .filter(|c| thinker_id.map_or(true, |id| c.thinker_id == id))
            .cloned()
            .collect();
        courses.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(courses)
    }

    async fn course(&self, id: Uuid) -> Result<Course> {
        self.read()
            .courses
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| SymposiumError::NotFound("course".into()))
    }

    async fn create_course(&self, course: &NewCourse) -> Result<Course> {
        let mut catalogue = self.write();
        let thinker_name = catalogue
            .thinkers
            .iter()
            .find(|t| t.id == course.thinker_id)
            .map(|t| t.name.clone())
            .ok_or_else(|| SymposiumError::NotFound("thinker".into()))?;

        let created = Course {
            id: Uuid::new_v4(),
            title: course.title.clone(),
            description: course.description.clone(),
            difficulty_level: course
                .difficulty_level
                .clone()
                .unwrap_or_else(|| "introductory".to_string()),
            num_lectures: course.num_lectures.unwrap_or(5),
            thinker_id: course.thinker_id,
            discipline_id: None,
            thinker_name: Some(thinker_name),
        };
        catalogue.courses.push(created.clone());
        Ok(created)
    }

    async fn lectures(&self, course_id: Uuid) -> Result<Vec<Lecture>> {
        let catalogue = self.read();
        let mut lectures: Vec<Lecture> = catalogue
            .lectures
            .iter()
            .filter(|l| l.course_id == course_id)
            .cloned()
            .collect();
        lectures.sort_by_key(|l| l.sequence_number);
        Ok(lectures)
    }

    async fn lecture(&self, id: Uuid) -> Result<Lecture> {
        self.read()
            .lectures
            .iter()
            .find(|l| l.id == id)
            .cloned()
            .ok_or_else(|| SymposiumError::NotFound("lecture".into()))
    }

    async fn generate_lecture(&self, request: &GenerateLecture) -> Result<Lecture> {
        let mut catalogue = self.write();
        let course = catalogue
            .courses
            .iter()
            .find(|c| c.id == request.course_id)
            .cloned()
            .ok_or_else(|| SymposiumError::NotFound("course".into()))?;
        let sequence_number = catalogue
            .lectures
            .iter()
            .filter(|l| l.course_id == course.id)
            .count() as u32
            + 1;

        let now = Utc::now();
        let lecture = Lecture {
            id: Uuid::new_v4(),
            title: request.topic.clone(),
            sequence_number,
            transcript: String::new(),
            audio_url: None,
            status: LectureStatus::Ready,
            duration_seconds: None,
            course_id: course.id,
            created_at: now,
            updated_at: now,
            thinker_name: course.thinker_name.clone(),
            thinker_image_url: None,
            course_title: Some(course.title.clone()),
        };
        catalogue.lectures.push(lecture.clone());
        Ok(lecture)
    }

    async fn generate_audio(&self, lecture_id: Uuid) -> Result<Lecture> {
        let mut catalogue = self.write();
        let lecture = catalogue
            .lectures
            .iter_mut()
            .find(|l| l.id == lecture_id)
            .ok_or_else(|| SymposiumError::NotFound("lecture".into()))?;
        lecture.audio_url = Some(format!("/audio/{}.mp3", lecture_id));
        lecture.updated_at = Utc::now();
        Ok(lecture.clone())
    }

    async fn timings(&self, lecture: &Lecture) -> Result<Option<TimingsData>> {
        if lecture.audio_url.is_none() {
            return Ok(None);
        }
        self.read()
            .timings
            .get(&lecture.id)
            .cloned()
            .map(Some)
            .ok_or_else(|| SymposiumError::NotFound("word timings".into()))
    }
}
