//! A+ LMS core: course progress, quiz evaluation and certification.
//!
//! Tracks which lessons and quizzes a learner has completed, scores quiz
//! attempts under attempt limits, and issues one certificate per learner
//! and course once every item is done. All state lives in an injected
//! key-value store whose layout matches the browser application's
//! local storage.

pub mod certificate;
pub mod course;
pub mod dashboard;
pub mod enrollment;
pub mod error;
pub mod progress;
pub mod quiz;
pub mod store;
pub mod time;
pub mod user;

// Re-export primary types
pub use error::{LmsError, Result};
pub use store::{CompletionStore, FileStore, MemoryStore, StoredList};
pub use user::{Role, User};

// Re-export course types
pub use course::{
    CatalogEntry, Course, CourseId, Lesson, LessonId, Module, ModuleId, Question, QuestionId,
    Quiz, QuizId,
};

// Re-export progress types
pub use progress::{CompletionRecord, CourseProgress, ProgressData};

// Re-export quiz types
pub use quiz::{AttemptState, QuestionReview, QuizAttempt, Score};

// Re-export certificate types
pub use certificate::{Certificate, CertificateId, Issuance};

// Re-export dashboard types
pub use dashboard::{CourseAnalytics, EnrolledCourse, LearnerDashboard, PlatformMetrics};
