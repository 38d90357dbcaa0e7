//! Courses: the content tree and the catalog it is browsed through.
//!
//! The course module provides:
//! - Course / module / lesson / quiz / question types with validated
//!   construction
//! - Authoring operations (add modules and lessons, attach quizzes)
//! - The catalog: per-educator course lists merged with the global list,
//!   search and publication filtering

pub mod catalog;
pub mod types;

pub use types::{
    Course, CourseId, Lesson, LessonId, Module, ModuleId, Question, QuestionId, Quiz, QuizId,
};

pub use catalog::{
    educator_courses, find_course, load_catalog, published, save_course, search, CatalogEntry,
};
