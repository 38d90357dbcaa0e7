//! Progress engine: aggregating completion records, marking lessons done.

use crate::course::{Course, CourseId, LessonId, ModuleId, QuizId};
use crate::error::{LmsError, Result};
use crate::store::{self, keys, CompletionStore};

use super::types::*;

// ---------------------------------------------------------------------------
// Item keys
// ---------------------------------------------------------------------------

/// Progress-map key of a lesson.
pub fn lesson_key(module_id: &ModuleId, lesson_id: &LessonId) -> String {
    format!("{}_{}", module_id.0, lesson_id.0)
}

/// Progress-map key of a quiz.
pub fn quiz_key(quiz_id: &QuizId) -> String {
    format!("quiz_{}", quiz_id.0)
}

/// `round(100 * part / whole)` with half-up rounding, clamped to
/// `[0, 100]`. A zero `whole` yields 0.
pub fn percentage(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let part = part.min(whole) as u64;
    let whole = whole as u64;
    ((200 * part + whole) / (2 * whole)) as u8
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Compute completion statistics for `course` from a learner's records.
///
/// Pure: records for items not in the course are ignored, and calling it
/// twice with the same input yields the same output.
pub fn compute_progress(course: &Course, progress: &ProgressData) -> CourseProgress {
    let mut result = CourseProgress::default();

    for module in &course.modules {
        for lesson in &module.lessons {
            result.total_lessons += 1;
            if let Some(record) = progress.get(&lesson_key(&module.id, &lesson.id)) {
                if record.completed {
                    result.lessons_completed += 1;
                    note_activity(&mut result.last_activity, record);
                }
            }
        }

        for quiz in module.quizzes() {
            result.total_quizzes += 1;
            if let Some(record) = progress.get(&quiz_key(quiz.id())) {
                if record.completed {
                    result.quizzes_completed += 1;
                    note_activity(&mut result.last_activity, record);
                }
            }
        }
    }

    result.total_items = result.total_lessons + result.total_quizzes;
    result.completed_items = result.lessons_completed + result.quizzes_completed;
    result.completion_percentage = percentage(result.completed_items, result.total_items);
    result
}

fn note_activity(last: &mut Option<String>, record: &CompletionRecord) {
    if let Some(at) = &record.completed_at {
        if last.as_ref().map_or(true, |current| at > current) {
            *last = Some(at.clone());
        }
    }
}

// ---------------------------------------------------------------------------
// Store access
// ---------------------------------------------------------------------------

/// Load a learner's progress map for a course. Missing or malformed data
/// yields an empty map.
pub fn load_progress<S: CompletionStore + ?Sized>(
    store: &S,
    learner_email: &str,
    course_id: &CourseId,
) -> ProgressData {
    store::load_or_default(store, &keys::progress(learner_email, course_id.as_str()))
}

/// Load and aggregate a learner's progress on `course`.
pub fn course_progress<S: CompletionStore + ?Sized>(
    store: &S,
    learner_email: &str,
    course: &Course,
) -> CourseProgress {
    compute_progress(course, &load_progress(store, learner_email, &course.id))
}

/// Write (or overwrite) the record for one item in a learner's progress map.
pub(crate) fn record_completion<S: CompletionStore + ?Sized>(
    store: &mut S,
    learner_email: &str,
    course_id: &CourseId,
    item_key: String,
    record: CompletionRecord,
) -> Result<()> {
    let key = keys::progress(learner_email, course_id.as_str());
    let mut progress: ProgressData = store::load_for_update(&*store, &key)?;
    progress.insert(item_key, record);
    store::save(store, &key, &progress)
}

/// Mark a lesson completed.
///
/// The first completion creates the record; completing it again returns
/// the existing record untouched.
pub fn mark_lesson_complete<S: CompletionStore + ?Sized>(
    store: &mut S,
    learner_email: &str,
    course: &Course,
    module_id: &ModuleId,
    lesson_id: &LessonId,
    time_spent: Option<u64>,
) -> Result<CompletionRecord> {
    let module = course
        .module(module_id)
        .ok_or_else(|| LmsError::NotFound(format!("module {module_id} in course {}", course.id)))?;
    if module.lesson(lesson_id).is_none() {
        return Err(LmsError::NotFound(format!(
            "lesson {lesson_id} in module {module_id}"
        )));
    }

    let key = lesson_key(module_id, lesson_id);
    let progress = load_progress(&*store, learner_email, &course.id);
    if let Some(existing) = progress.get(&key).filter(|r| r.completed) {
        return Ok(existing.clone());
    }

    let record = CompletionRecord {
        time_spent,
        ..CompletionRecord::completed(crate::time::now_iso8601())
    };
    record_completion(store, learner_email, &course.id, key, record.clone())?;
    log::debug!("{learner_email} completed lesson {lesson_id} in {}", course.id);
    Ok(record)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
