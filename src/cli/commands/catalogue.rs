//! Thinker and course browsing commands.

use crate::api::{LectureSource, NewCourse};
use crate::cli::Output;
use anyhow::Result;
use uuid::Uuid;

/// Run the thinkers command.
pub async fn run_thinkers(source: &dyn LectureSource, id: Option<Uuid>) -> Result<()> {
    if let Some(id) = id {
        match source.thinker(id).await {
            Ok(thinker) => {
                Output::header(&thinker.name);
                Output::kv("Era", &thinker.era);
                if let Some(lifespan) = thinker.lifespan() {
                    Output::kv("Lived", &lifespan);
                }
                if !thinker.nationality.is_empty() {
                    Output::kv("Nationality", &thinker.nationality);
                }
                if !thinker.speaking_style.is_empty() {
                    Output::kv("Speaking style", &thinker.speaking_style);
                }
                if !thinker.bio.is_empty() {
                    println!("\n{}", thinker.bio);
                }
            }
            Err(e) => {
                tracing::warn!("Failed to load thinker {}: {}", id, e);
                Output::error("Thinker not found.");
            }
        }
        return Ok(());
    }

    let spinner = Output::spinner("Loading thinkers...");
    let result = source.thinkers().await;
    spinner.finish_and_clear();

    match result {
        Ok(thinkers) if thinkers.is_empty() => Output::info("No thinkers yet."),
        Ok(thinkers) => {
            Output::header(&format!("Thinkers ({})", thinkers.len()));
            println!();
            for thinker in &thinkers {
                Output::thinker_info(thinker);
            }
        }
        Err(e) => {
            tracing::warn!("Failed to load thinkers: {}", e);
            Output::error("Failed to load thinkers.");
        }
    }

    Ok(())
}

/// Run the courses command.
pub async fn run_courses(source: &dyn LectureSource, thinker: Option<Uuid>) -> Result<()> {
    let spinner = Output::spinner("Loading courses...");
    let result = source.courses(thinker).await;
    spinner.finish_and_clear();

    match result {
        Ok(courses) if courses.is_empty() => {
            Output::info("No courses found. Use 'symposium create-course' to add one.");
        }
        Ok(courses) => {
            Output::header(&format!("Courses ({})", courses.len()));
            println!();
            for course in &courses {
                Output::course_info(course);
            }
        }
        Err(e) => {
            tracing::warn!("Failed to load courses: {}", e);
            Output::error("Failed to load courses.");
        }
    }

    Ok(())
}

/// Run the course command: details plus lectures, fetched together.
pub async fn run_course(source: &dyn LectureSource, id: Uuid) -> Result<()> {
    let spinner = Output::spinner("Loading course...");
    let result = futures::try_join!(source.course(id), source.lectures(id));
    spinner.finish_and_clear();

    let (course, lectures) = match result {
        Ok(pair) => pair,
        Err(e) => {
            tracing::warn!("Failed to load course {}: {}", id, e);
            Output::error("Course not found.");
            return Ok(());
        }
    };

    Output::header(&course.title);
    if let Some(name) = &course.thinker_name {
        Output::kv("Thinker", name);
    }
    Output::kv("Difficulty", &course.difficulty_level);
    Output::kv("Planned lectures", &course.num_lectures.to_string());
    if !course.description.is_empty() {
        println!("\n{}", course.description);
    }

    println!();
    if lectures.is_empty() {
        Output::info("No lectures yet. Use 'symposium generate-lecture' to create one.");
    } else {
        let ready = lectures.iter().filter(|l| l.is_ready()).count();
        Output::header(&format!("Lectures ({} of {} ready)", ready, lectures.len()));
        println!();
        for lecture in &lectures {
            Output::lecture_info(lecture);
        }
    }

    Ok(())
}

/// Run the create-course command.
pub async fn run_create_course(source: &dyn LectureSource, course: NewCourse) -> Result<()> {
    if course.title.trim().is_empty() {
        anyhow::bail!("Course title must not be empty");
    }

    let spinner = Output::spinner("Creating course...");
    let result = source.create_course(&course).await;
    spinner.finish_and_clear();

    match result {
        Ok(created) => {
            Output::success(&format!("Created course '{}'", created.title));
            Output::kv("ID", &created.id.to_string());
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Failed to create course: {}", e));
            Err(e.into())
        }
    }
}
