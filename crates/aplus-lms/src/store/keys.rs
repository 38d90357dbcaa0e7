//! Store key builders.
//!
//! These must stay byte-compatible with data already written by the
//! browser front end.

/// Registry of all users.
pub const USERS: &str = "users";

/// Global course list (older catalog layout).
pub const GLOBAL_COURSES: &str = "courses";

/// Per-learner, per-course progress map.
pub fn progress(user_email: &str, course_id: &str) -> String {
    format!("progress_{user_email}_{course_id}")
}

/// Per-learner, per-quiz attempt log.
pub fn quiz_attempts(user_email: &str, quiz_id: &str) -> String {
    format!("quiz_attempts_{user_email}_{quiz_id}")
}

/// Certificates issued to a learner.
pub fn certificates(user_email: &str) -> String {
    format!("certificates_{user_email}")
}

/// Course ids a learner is enrolled in.
pub fn enrollments(user_email: &str) -> String {
    format!("enrollments_{user_email}")
}

/// Courses authored by an educator.
pub fn educator_courses(educator_email: &str) -> String {
    format!("courses_{educator_email}")
}
