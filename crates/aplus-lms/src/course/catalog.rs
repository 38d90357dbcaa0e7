//! Course catalog: courses gathered from every educator plus the global list.

use serde::{Deserialize, Serialize};

use crate::error::{LmsError, Result};
use crate::store::{self, keys, CompletionStore, StoredList};
use crate::user::{self, Role};

use super::types::{Course, CourseId};

/// A course together with the educator who owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub course: Course,
    pub educator_email: Option<String>,
    pub educator_name: Option<String>,
}

/// Courses authored by one educator.
pub fn educator_courses<S: CompletionStore + ?Sized>(store: &S, educator_email: &str) -> Vec<Course> {
    store::load_or_default::<StoredList<Course>, _>(store, &keys::educator_courses(educator_email))
        .into_decoded()
}

/// Validate `course` and insert it into the educator's list, replacing a
/// course with the same id.
pub fn save_course<S: CompletionStore + ?Sized>(
    store: &mut S,
    educator_email: &str,
    course: Course,
) -> Result<()> {
    course.validate()?;

    let key = keys::educator_courses(educator_email);
    let mut courses: StoredList<Course> = store::load_for_update(&*store, &key)?;
    match courses.find_mut(|c| c.id == course.id) {
        Some(existing) => *existing = course,
        None => courses.push(course),
    }
    store::save(store, &key, &courses)
}

/// Every course visible on the platform.
///
/// Per-educator lists come first (in registry order), then the global
/// `courses` list. When the same id appears twice the first one wins.
pub fn load_catalog<S: CompletionStore + ?Sized>(store: &S) -> Vec<CatalogEntry> {
    let mut entries: Vec<CatalogEntry> = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for educator in user::users_with_role(store, Role::Educator) {
        for course in educator_courses(store, &educator.email) {
            if seen.insert(course.id.clone()) {
                entries.push(CatalogEntry {
                    course,
                    educator_email: Some(educator.email.clone()),
                    educator_name: Some(educator.name.clone()),
                });
            }
        }
    }

    let global: StoredList<Course> = store::load_or_default(store, keys::GLOBAL_COURSES);
    for course in global.into_decoded() {
        if seen.insert(course.id.clone()) {
            let educator_email = course.created_by.clone();
            let educator_name = educator_email
                .as_deref()
                .and_then(|email| user::find_user(store, email))
                .map(|u| u.name);
            entries.push(CatalogEntry {
                course,
                educator_email,
                educator_name,
            });
        }
    }

    entries
}

/// Case-insensitive match on course title or educator name.
/// A blank query matches everything.
pub fn search<'a>(entries: &'a [CatalogEntry], query: &str) -> Vec<&'a CatalogEntry> {
    let query = query.trim().to_lowercase();
    entries
        .iter()
        .filter(|e| {
            query.is_empty()
                || e.course.title.to_lowercase().contains(&query)
                || e
                    .educator_name
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase().contains(&query))
        })
        .collect()
}

/// Only published courses.
pub fn published(entries: &[CatalogEntry]) -> Vec<&CatalogEntry> {
    entries.iter().filter(|e| e.course.published).collect()
}

/// Look a course up anywhere in the catalog.
pub fn find_course<S: CompletionStore + ?Sized>(store: &S, course_id: &CourseId) -> Result<CatalogEntry> {
    load_catalog(store)
        .into_iter()
        .find(|e| &e.course.id == course_id)
        .ok_or_else(|| LmsError::NotFound(format!("course {course_id}")))
}
