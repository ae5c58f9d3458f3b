//! Lecture commands: generation and transcript display.

use crate::api::{load_lecture, GenerateLecture, LectureSource};
use crate::cli::Output;
use crate::config::Settings;
use crate::player::format_time;
use crate::sync::{group_phrases, Phrase, TimingsData, TranscriptLayout, WordPhraseIndex};
use anyhow::{Context, Result};
use uuid::Uuid;

/// Run the generate-lecture command.
pub async fn run_generate_lecture(
    source: &dyn LectureSource,
    course_id: Uuid,
    topic: &str,
    title: Option<String>,
) -> Result<()> {
    let request = GenerateLecture {
        course_id,
        title: title.unwrap_or_else(|| topic.to_string()),
        topic: topic.to_string(),
    };

    let spinner = Output::spinner(&format!("Writing lecture on '{}'...", topic));
    let result = source.generate_lecture(&request).await;
    spinner.finish_and_clear();

    match result {
        Ok(lecture) => {
            Output::success(&format!(
                "Lecture {} '{}' is {}",
                lecture.sequence_number, lecture.title, lecture.status
            ));
            Output::kv("ID", &lecture.id.to_string());
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Lecture generation failed: {}", e));
            Err(e.into())
        }
    }
}

/// Run the generate-audio command.
pub async fn run_generate_audio(source: &dyn LectureSource, id: Uuid) -> Result<()> {
    let spinner = Output::spinner("Synthesizing narration...");
    let result = source.generate_audio(id).await;
    spinner.finish_and_clear();

    match result {
        Ok(lecture) => {
            match &lecture.audio_url {
                Some(url) => {
                    Output::success(&format!("Audio ready for '{}'", lecture.title));
                    Output::kv("Audio", url);
                }
                None => Output::warning(&format!(
                    "Backend reports '{}' but no audio yet",
                    lecture.status
                )),
            }
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Audio generation failed: {}", e));
            Err(e.into())
        }
    }
}

/// Run the lecture command.
pub async fn run_lecture(
    source: &dyn LectureSource,
    id: Uuid,
    show_phrases: bool,
    settings: &Settings,
) -> Result<()> {
    let spinner = Output::spinner("Loading lecture...");
    let result = load_lecture(source, id).await;
    spinner.finish_and_clear();

    let loaded = match result {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::warn!("Failed to load lecture {}: {}", id, e);
            Output::error("Lecture not found.");
            return Ok(());
        }
    };
    let lecture = &loaded.lecture;

    Output::header(&format!("Lecture {}: {}", lecture.sequence_number, lecture.title));
    if let Some(course) = &lecture.course_title {
        Output::kv("Course", course);
    }
    if let Some(name) = &lecture.thinker_name {
        Output::kv("Thinker", name);
    }
    Output::kv("Status", &lecture.status.to_string());
    if let Some(minutes) = lecture.duration_minutes() {
        Output::kv("Length", &format!("{} min", minutes));
    }

    match &loaded.timings {
        Some(timings) if show_phrases => print_phrases(timings, settings),
        Some(timings) => print_synced(timings, settings),
        None => {
            if show_phrases {
                Output::warning("No word timings for this lecture.");
            }
            if lecture.transcript.trim().is_empty() {
                println!();
                Output::info("No transcript available.");
            } else {
                println!("\n{}", lecture.transcript);
            }
        }
    }

    Ok(())
}

/// Run the phrases command over a local timings file.
pub fn run_phrases(path: &str, json: bool, settings: &Settings) -> Result<()> {
    let timings = read_timings(path)?;

    if json {
        let phrases = group_phrases(&timings.word_timings, &settings.sync.phrase_config());
        println!("{}", serde_json::to_string_pretty(&phrases)?);
        return Ok(());
    }

    Output::header(&format!(
        "{} words in {} paragraphs",
        timings.word_count(),
        timings.paragraphs.len()
    ));
    print_phrases(&timings, settings);
    Ok(())
}

/// Read a `{"p": [...], "w": [...]}` timings file.
pub fn read_timings(path: &str) -> Result<TimingsData> {
    let path = Settings::expand_path(path);
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let timings: TimingsData = serde_json::from_str(&content)
        .with_context(|| format!("Invalid timings file {}", path.display()))?;
    Ok(timings)
}

fn print_synced(timings: &TimingsData, settings: &Settings) {
    let layout = TranscriptLayout::build(timings, settings.sync.heading_max_words);
    for paragraph in &layout.paragraphs {
        Output::paragraph(&paragraph.text(), paragraph.is_heading);
    }
}

fn print_phrases(timings: &TimingsData, settings: &Settings) {
    let phrases = group_phrases(&timings.word_timings, &settings.sync.phrase_config());
    let index = WordPhraseIndex::build(&phrases, timings.word_count());
    let layout = TranscriptLayout::build(timings, settings.sync.heading_max_words);
    let texts = layout.phrase_texts(&index, phrases.len());

    println!();
    for (i, (phrase, text)) in phrases.iter().zip(&texts).enumerate() {
        Output::phrase_row(i, &phrase_timestamp(phrase), phrase.word_count(), text);
    }
    println!();
    Output::kv("Phrases", &phrases.len().to_string());
    Output::kv("Length", &format_time(timings.duration_seconds()));
}

fn phrase_timestamp(phrase: &Phrase) -> String {
    format_time(phrase.start_ms / 1000.0)
}
