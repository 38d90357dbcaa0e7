//! Course progress: completion records and their aggregation.
//!
//! The progress module provides:
//! - Completion records keyed by `{moduleId}_{lessonId}` / `quiz_{quizId}`
//! - Lenient decoding of stored progress maps
//! - Pure aggregation into per-course completion statistics
//! - Marking lessons complete

pub mod engine;
pub mod types;

pub use types::{CompletionRecord, CourseProgress, ProgressData};

pub use engine::{
    compute_progress, course_progress, lesson_key, load_progress, mark_lesson_complete,
    percentage, quiz_key,
};
