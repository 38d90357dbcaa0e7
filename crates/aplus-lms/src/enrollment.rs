//! Enrollment: the list of course ids a learner has joined.

use crate::course::CourseId;
use crate::error::Result;
use crate::store::{self, keys, CompletionStore, StoredList};

/// Course ids the learner is enrolled in, in enrollment order.
pub fn enrollments<S: CompletionStore + ?Sized>(store: &S, learner_email: &str) -> Vec<CourseId> {
    store::load_or_default::<StoredList<CourseId>, _>(store, &keys::enrollments(learner_email))
        .into_decoded()
}

pub fn is_enrolled<S: CompletionStore + ?Sized>(
    store: &S,
    learner_email: &str,
    course_id: &CourseId,
) -> bool {
    enrollments(store, learner_email).contains(course_id)
}

/// Enroll a learner in a course. Returns `false` if already enrolled.
pub fn enroll<S: CompletionStore + ?Sized>(
    store: &mut S,
    learner_email: &str,
    course_id: &CourseId,
) -> Result<bool> {
    let key = keys::enrollments(learner_email);
    let mut ids: StoredList<CourseId> = store::load_for_update(&*store, &key)?;
    if ids.iter().any(|id| id == course_id) {
        return Ok(false);
    }
    ids.push(course_id.clone());
    store::save(store, &key, &ids)?;
    log::debug!("{learner_email} enrolled in {course_id}");
    Ok(true)
}
