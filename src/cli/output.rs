//! CLI output formatting utilities.

use crate::api::{Course, Lecture, Thinker};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a thinker summary line.
    pub fn thinker_info(thinker: &Thinker) {
        let dates = thinker
            .lifespan()
            .map(|l| format!(", {}", l))
            .unwrap_or_default();
        println!(
            "  {} {} ({}{})  {}",
            style("*").cyan(),
            style(&thinker.name).bold(),
            thinker.era,
            dates,
            style(thinker.id).dim()
        );
    }

    /// Print a course summary line.
    pub fn course_info(course: &Course) {
        let by = course
            .thinker_name
            .as_deref()
            .map(|n| format!(" by {}", n))
            .unwrap_or_default();
        println!(
            "  {} {}{} ({}, {} lectures)  {}",
            style("*").cyan(),
            style(&course.title).bold(),
            by,
            course.difficulty_level,
            course.num_lectures,
            style(course.id).dim()
        );
    }

    /// Print a lecture summary line.
    pub fn lecture_info(lecture: &Lecture) {
        let minutes = lecture
            .duration_minutes()
            .map(|m| format!(", {} min", m))
            .unwrap_or_default();
        let audio = if lecture.audio_url.is_some() { ", audio" } else { "" };
        println!(
            "  {} {}. {} ({}{}{})  {}",
            style("*").cyan(),
            lecture.sequence_number,
            style(&lecture.title).bold(),
            lecture.status,
            minutes,
            audio,
            style(lecture.id).dim()
        );
    }

    /// Print a transcript paragraph. Headings are emphasized.
    pub fn paragraph(text: &str, is_heading: bool) {
        if is_heading {
            println!("\n{}", style(text).bold().underlined());
        } else {
            println!("\n{}", text);
        }
    }

    /// Print one phrase boundary row.
    pub fn phrase_row(index: usize, timestamp: &str, words: usize, text: &str) {
        println!(
            "  {} {} {} {}",
            style(format!("{:>4}", index)).dim(),
            style(timestamp).cyan(),
            style(format!("({:>2}w)", words)).dim(),
            content_preview(text, 100)
        );
    }

    /// Style one transcript line for the playback view.
    pub fn transcript_line(text: &str, active: bool) -> String {
        if active {
            format!("{} {}", style(">").green().bold(), style(text).bold())
        } else {
            format!("  {}", style(text).dim())
        }
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    /// Create the playback progress bar. Position is in thousandths.
    pub fn playback_bar() -> ProgressBar {
        let pb = ProgressBar::new(1000);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{prefix} [{bar:40.cyan/blue}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        pb
    }
}

/// Truncate content with ellipsis.
pub fn content_preview(content: &str, max_chars: usize) -> String {
    let content = content.replace('\n', " ");
    if content.chars().count() <= max_chars {
        content
    } else {
        let cut: String = content.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}
