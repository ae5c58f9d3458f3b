//! Backend records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A historical figure who delivers lectures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thinker {
    pub id: Uuid,
    pub name: String,
    pub era: String,
    #[serde(default)]
    pub birth_year: Option<i32>,
    #[serde(default)]
    pub death_year: Option<i32>,
    #[serde(default)]
    pub nationality: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub personality_traits: String,
    #[serde(default)]
    pub speaking_style: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub discipline_id: Option<Uuid>,
}

impl Thinker {
    /// Life dates for display, e.g. `470 BC – 399 BC` or `1844 – 1900`.
    pub fn lifespan(&self) -> Option<String> {
        match (self.birth_year, self.death_year) {
            (None, None) => None,
            (birth, death) => Some(format!(
                "{} – {}",
                birth.map(format_year).unwrap_or_else(|| "?".to_string()),
                death.map(format_year).unwrap_or_else(|| "?".to_string()),
            )),
        }
    }
}

fn format_year(year: i32) -> String {
    if year < 0 {
        format!("{} BC", -year)
    } else {
        year.to_string()
    }
}

/// A lecture series by one thinker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_difficulty")]
    pub difficulty_level: String,
    #[serde(default = "default_num_lectures")]
    pub num_lectures: u32,
    pub thinker_id: Uuid,
    #[serde(default)]
    pub discipline_id: Option<Uuid>,
    #[serde(default)]
    pub thinker_name: Option<String>,
}

fn default_difficulty() -> String {
    "introductory".to_string()
}

fn default_num_lectures() -> u32 {
    5
}

/// Request body for creating a course.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub thinker_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_lectures: Option<u32>,
}

/// Request body for generating a lecture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateLecture {
    pub course_id: Uuid,
    pub title: String,
    pub topic: String,
}

/// Lecture generation status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LectureStatus {
    Generating,
    Ready,
    Error,
    #[serde(untagged)]
    Other(String),
}

impl std::fmt::Display for LectureStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LectureStatus::Generating => write!(f, "generating"),
            LectureStatus::Ready => write!(f, "ready"),
            LectureStatus::Error => write!(f, "error"),
            LectureStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

/// A single lecture with its transcript and optional audio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lecture {
    pub id: Uuid,
    pub title: String,
    #[serde(default = "default_sequence")]
    pub sequence_number: u32,
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub audio_url: Option<String>,
    pub status: LectureStatus,
    #[serde(default)]
    pub duration_seconds: Option<u32>,
    pub course_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub thinker_name: Option<String>,
    #[serde(default)]
    pub thinker_image_url: Option<String>,
    #[serde(default)]
    pub course_title: Option<String>,
}

fn default_sequence() -> u32 {
    1
}

/// Path of the word-timing sidecar that sits next to an audio file.
///
/// `/audio/{id}.mp3` becomes `/audio/{id}.json`; any query string is kept.
pub fn timings_path_for(audio_url: &str) -> Option<String> {
    if audio_url.is_empty() {
        return None;
    }
    let (path, query) = match audio_url.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (audio_url, None),
    };
    let file_start = path.rfind('/').map(|i| i + 1).unwrap_or(0);
    let stem_end = path[file_start..]
        .rfind('.')
        .map(|i| file_start + i)
        .unwrap_or(path.len());

    let mut timings = format!("{}.json", &path[..stem_end]);
    if let Some(q) = query {
        timings.push('?');
        timings.push_str(q);
    }
    Some(timings)
}

impl Lecture {
    /// Path of the word-timing sidecar for this lecture's audio, if any.
    pub fn timings_path(&self) -> Option<String> {
        self.audio_url.as_deref().and_then(timings_path_for)
    }

    pub fn is_ready(&self) -> bool {
        self.status == LectureStatus::Ready
    }

    /// Rounded length in minutes, when the backend reported one.
    pub fn duration_minutes(&self) -> Option<u32> {
        self.duration_seconds.map(|s| (s + 30) / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lecture_json(audio_url: &str, status: &str) -> String {
        format!(
            r#"{{
                "id": "6f1c2a4e-5d0b-4c86-9b5e-0e3f3b0d9a11",
                "title": "On the Soul",
                "sequence_number": 2,
                "transcript": "Text",
                "audio_url": {},
                "status": "{}",
                "duration_seconds": 754,
                "course_id": "0b8e0a39-2f0e-4c8e-8f0c-6b7a3a6f8a55",
                "created_at": "2025-01-05T10:00:00Z",
                "updated_at": "2025-01-05T10:05:00Z",
                "thinker_name": "Aristotle"
            }}"#,
            audio_url, status
        )
    }

    #[test]
    fn test_lecture_parses() {
        let json = lecture_json(r#""/audio/abc.mp3""#, "ready");
        let lecture: Lecture = serde_json::from_str(&json).unwrap();
        assert!(lecture.is_ready());
        assert_eq!(lecture.sequence_number, 2);
        assert_eq!(lecture.thinker_name.as_deref(), Some("Aristotle"));
        assert_eq!(lecture.course_title, None);
        assert_eq!(lecture.duration_minutes(), Some(13));
    }

    #[test]
    fn test_unknown_status_preserved() {
        let lecture: Lecture = serde_json::from_str(&lecture_json("null", "queued")).unwrap();
        assert_eq!(lecture.status, LectureStatus::Other("queued".to_string()));
        assert_eq!(lecture.status.to_string(), "queued");
    }

    #[test]
    fn test_timings_path() {
        let json = lecture_json(r#""/audio/abc.mp3""#, "ready");
        let mut lecture: Lecture = serde_json::from_str(&json).unwrap();
        assert_eq!(lecture.timings_path().as_deref(), Some("/audio/abc.json"));

        lecture.audio_url = Some("/audio/v1.2/abc.mp3?v=3".to_string());
        assert_eq!(lecture.timings_path().as_deref(), Some("/audio/v1.2/abc.json?v=3"));

        lecture.audio_url = Some("/audio/abc".to_string());
        assert_eq!(lecture.timings_path().as_deref(), Some("/audio/abc.json"));

        lecture.audio_url = None;
        assert_eq!(lecture.timings_path(), None);
    }

    #[test]
    fn test_thinker_lifespan() {
        let json = r#"{
            "id": "1d1c2a4e-5d0b-4c86-9b5e-0e3f3b0d9a11",
            "name": "Socrates",
            "era": "Classical",
            "birth_year": -470,
            "death_year": -399
        }"#;
        let thinker: Thinker = serde_json::from_str(json).unwrap();
        assert_eq!(thinker.lifespan().as_deref(), Some("470 BC – 399 BC"));
        assert_eq!(thinker.bio, "");
    }

    #[test]
    fn test_new_course_omits_unset_fields() {
        let body = NewCourse {
            title: "Ethics".into(),
            description: String::new(),
            thinker_id: Uuid::nil(),
            difficulty_level: None,
            num_lectures: Some(3),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("difficulty_level").is_none());
        assert_eq!(value["num_lectures"], 3);
    }
}
