//! Dashboards: read-only views over learners, courses and the platform.
//!
//! Everything here is derived from stored records on demand; nothing is
//! cached or written back.

use serde::{Deserialize, Serialize};

use crate::certificate::{list_certificates, Certificate};
use crate::course::{educator_courses, load_catalog, CatalogEntry, Course, CourseId};
use crate::enrollment::enrollments;
use crate::progress::{course_progress, percentage, CourseProgress};
use crate::quiz::load_attempts;
use crate::store::CompletionStore;
use crate::user::{list_users, Role, User};

// ---------------------------------------------------------------------------
// Learner dashboard
// ---------------------------------------------------------------------------

/// An enrolled course with the learner's progress on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledCourse {
    pub entry: CatalogEntry,
    pub progress: CourseProgress,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerDashboard {
    pub courses: Vec<EnrolledCourse>,
    pub certificates: Vec<Certificate>,
    /// Courses at 100%.
    pub completed_courses: usize,
    /// Mean completion over enrolled courses.
    pub average_progress: u8,
}

/// Everything a learner sees on their dashboard.
///
/// Enrollments pointing at courses no longer in the catalog are skipped.
pub fn learner_dashboard<S: CompletionStore + ?Sized>(
    store: &S,
    learner_email: &str,
) -> LearnerDashboard {
    let catalog = load_catalog(store);
    let courses: Vec<EnrolledCourse> = enrollments(store, learner_email)
        .iter()
        .filter_map(|id| catalog.iter().find(|e| &e.course.id == id))
        .map(|entry| EnrolledCourse {
            progress: course_progress(store, learner_email, &entry.course),
            entry: entry.clone(),
        })
        .collect();

    let completed_courses = courses.iter().filter(|c| c.progress.is_complete()).count();
    let average_progress = mean(courses.iter().map(|c| c.progress.completion_percentage));

    LearnerDashboard {
        courses,
        certificates: list_certificates(store, learner_email),
        completed_courses,
        average_progress,
    }
}

// ---------------------------------------------------------------------------
// Course analytics
// ---------------------------------------------------------------------------

/// Per-course statistics for an educator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseAnalytics {
    pub course_id: CourseId,
    pub title: String,
    pub published: bool,
    pub enrollments: usize,
    pub certificates: usize,
    /// `certificates / enrollments` as a percentage.
    pub completion_rate: u8,
    /// Mean score over every logged attempt on the course's quizzes.
    pub average_quiz_score: u8,
    /// Mean completion over enrolled learners.
    pub average_progress: u8,
    pub total_lessons: usize,
    pub total_quizzes: usize,
}

/// Statistics for every course authored by `educator_email`.
pub fn course_analytics<S: CompletionStore + ?Sized>(
    store: &S,
    educator_email: &str,
) -> Vec<CourseAnalytics> {
    let users = list_users(store);
    educator_courses(store, educator_email)
        .iter()
        .map(|course| analyze_course(store, &users, course))
        .collect()
}

fn analyze_course<S: CompletionStore + ?Sized>(
    store: &S,
    users: &[User],
    course: &Course,
) -> CourseAnalytics {
    let enrolled: Vec<&User> = users
        .iter()
        .filter(|u| enrollments(store, &u.email).contains(&course.id))
        .collect();

    let certificates = enrolled
        .iter()
        .filter(|u| {
            list_certificates(store, &u.email)
                .iter()
                .any(|c| c.course_id == course.id)
        })
        .count();

    let scores: Vec<u8> = enrolled
        .iter()
        .flat_map(|u| {
            course
                .quizzes()
                .flat_map(|q| load_attempts(store, &u.email, q.id()))
                .map(|a| a.score)
                .collect::<Vec<_>>()
        })
        .collect();

    let average_progress = mean(
        enrolled
            .iter()
            .map(|u| course_progress(store, &u.email, course).completion_percentage),
    );

    CourseAnalytics {
        course_id: course.id.clone(),
        title: course.title.clone(),
        published: course.published,
        enrollments: enrolled.len(),
        certificates,
        completion_rate: percentage(certificates, enrolled.len()),
        average_quiz_score: mean(scores),
        average_progress,
        total_lessons: course.lessons().count(),
        total_quizzes: course.quizzes().count(),
    }
}

// ---------------------------------------------------------------------------
// Platform metrics
// ---------------------------------------------------------------------------

/// Platform-wide totals for the admin view.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformMetrics {
    pub total_users: usize,
    pub learners: usize,
    pub educators: usize,
    pub admins: usize,
    pub total_courses: usize,
    pub published_courses: usize,
    pub total_enrollments: usize,
    pub total_certificates: usize,
    /// `certificates / enrollments` as a percentage.
    pub certification_rate: u8,
}

pub fn platform_metrics<S: CompletionStore + ?Sized>(store: &S) -> PlatformMetrics {
    let users = list_users(store);
    let catalog = load_catalog(store);
    let count_role = |role: Role| users.iter().filter(|u| u.role == role).count();

    let total_enrollments: usize = users
        .iter()
        .map(|u| enrollments(store, &u.email).len())
        .sum();
    let total_certificates: usize = users
        .iter()
        .map(|u| list_certificates(store, &u.email).len())
        .sum();

    PlatformMetrics {
        total_users: users.len(),
        learners: count_role(Role::Learner),
        educators: count_role(Role::Educator),
        admins: count_role(Role::Admin),
        total_courses: catalog.len(),
        published_courses: catalog.iter().filter(|e| e.course.published).count(),
        total_enrollments,
        total_certificates,
        certification_rate: percentage(total_certificates, total_enrollments),
    }
}

/// Rounded mean of percentages; 0 for no values.
fn mean(values: impl IntoIterator<Item = u8>) -> u8 {
    let (sum, n) = values
        .into_iter()
        .fold((0u64, 0u64), |(sum, n), v| (sum + u64::from(v), n + 1));
    if n == 0 {
        return 0;
    }
    ((2 * sum + n) / (2 * n)).min(100) as u8
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
