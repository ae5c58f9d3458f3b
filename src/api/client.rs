//! HTTP client for the Symposium backend.

use super::models::{Course, GenerateLecture, Lecture, NewCourse, Thinker};
use super::LectureSource;
use crate::config::ApiSettings;
use crate::error::{Result, SymposiumError};
use crate::sync::TimingsData;
use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, instrument};
use url::Url;
use uuid::Uuid;

/// REST client over `/api/*` plus the static audio sidecars.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    /// Create a client from settings.
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()?;
        Self::with_http_client(&settings.base_url, http)
    }

    /// Create a client around an existing `reqwest::Client`.
    pub fn with_http_client(base_url: &str, http: reqwest::Client) -> Result<Self> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolve a backend path such as `api/thinkers/` or `/audio/x.json`.
    pub fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, what: &str) -> Result<T> {
        debug!(%url, "GET");
        let response = self.http.get(url).send().await?;
        Self::decode(response, what).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: Url,
        body: Option<&B>,
        what: &str,
    ) -> Result<T> {
        debug!(%url, "POST");
        let mut request = self.http.post(url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        Self::decode(response, what).await
    }

    async fn decode<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SymposiumError::NotFound(what.to_string()));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SymposiumError::Api {
                status: status.as_u16(),
                message: api_error_message(&message, what),
            });
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Fetch word timings given a lecture's audio URL.
    #[instrument(skip(self))]
    pub async fn fetch_timings_for_audio(&self, audio_url: &str) -> Result<TimingsData> {
        let path = super::timings_path_for(audio_url)
            .ok_or_else(|| {
                SymposiumError::InvalidInput(format!("Not an audio URL: {}", audio_url))
            })?;
        let timings: TimingsData = self.get_json(self.url(&path)?, "word timings").await?;
        info!(
            paragraphs = timings.paragraphs.len(),
            words = timings.word_timings.len(),
            "Loaded word timings"
        );
        Ok(timings)
    }
}

/// Prefer the backend's `{"detail": ...}` message when present.
fn api_error_message(body: &str, what: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["detail"].as_str().map(str::to_string))
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
        .unwrap_or_else(|| format!("Failed to fetch {}", what))
}

#[async_trait]
impl LectureSource for ApiClient {
    #[instrument(skip(self))]
    async fn thinkers(&self) -> Result<Vec<Thinker>> {
        self.get_json(self.url("api/thinkers/")?, "thinkers").await
    }

    #[instrument(skip(self))]
    async fn thinker(&self, id: Uuid) -> Result<Thinker> {
        self.get_json(self.url(&format!("api/thinkers/{}", id))?, "thinker").await
    }

    #[instrument(skip(self))]
    async fn courses(&self, thinker_id: Option<Uuid>) -> Result<Vec<Course>> {
        let mut url = self.url("api/courses/")?;
        if let Some(id) = thinker_id {
            url.query_pairs_mut().append_pair("thinker_id", &id.to_string());
        }
        self.get_json(url, "courses").await
    }

    #[instrument(skip(self))]
    async fn course(&self, id: Uuid) -> Result<Course> {
        self.get_json(self.url(&format!("api/courses/{}", id))?, "course").await
    }

    #[instrument(skip(self, course), fields(title = %course.title))]
    async fn create_course(&self, course: &NewCourse) -> Result<Course> {
        let created: Course = self
            .post_json(self.url("api/courses/")?, Some(course), "course")
            .await?;
        info!(id = %created.id, "Created course");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn lectures(&self, course_id: Uuid) -> Result<Vec<Lecture>> {
        let mut url = self.url("api/lectures/")?;
        url.query_pairs_mut().append_pair("course_id", &course_id.to_string());
        self.get_json(url, "lectures").await
    }

    #[instrument(skip(self))]
    async fn lecture(&self, id: Uuid) -> Result<Lecture> {
        self.get_json(self.url(&format!("api/lectures/{}", id))?, "lecture").await
    }

    #[instrument(skip(self, request), fields(course_id = %request.course_id))]
    async fn generate_lecture(&self, request: &GenerateLecture) -> Result<Lecture> {
        let lecture: Lecture = self
            .post_json(self.url("api/lectures/generate")?, Some(request), "lecture")
            .await?;
        info!(id = %lecture.id, status = %lecture.status, "Generated lecture");
        Ok(lecture)
    }

    #[instrument(skip(self))]
    async fn generate_audio(&self, lecture_id: Uuid) -> Result<Lecture> {
        let url = self.url(&format!("api/lectures/{}/generate-audio", lecture_id))?;
        let lecture: Lecture = self.post_json::<(), _>(url, None, "lecture").await?;
        info!(audio_url = ?lecture.audio_url, "Generated audio");
        Ok(lecture)
    }

    async fn timings(&self, lecture: &Lecture) -> Result<Option<TimingsData>> {
        match lecture.audio_url.as_deref() {
            Some(audio_url) if !audio_url.is_empty() => {
                self.fetch_timings_for_audio(audio_url).await.map(Some)
            }
            _ => Ok(None),
        }
    }
}
