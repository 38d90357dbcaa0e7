//! Error types for the A+ LMS core.
//!
//! All errors are strongly typed and propagated without panicking.
//! Read paths recover from malformed stored data locally (see
//! [`crate::store::load_or_default`]); only writes and explicit domain
//! rule violations surface as errors.

/// LMS error types covering all operations.
#[derive(Debug, thiserror::Error)]
pub enum LmsError {
    #[error("Malformed stored data at '{key}': {reason}")]
    MalformedStoredData { key: String, reason: String },

    #[error("Attempt limit exceeded for quiz {quiz_id}: maximum {max_attempts} attempts")]
    AttemptLimitExceeded { quiz_id: String, max_attempts: u32 },

    #[error("Incomplete submission: {} question(s) unanswered", unanswered.len())]
    IncompleteSubmission { unanswered: Vec<usize> },

    #[error("Attempt belongs to quiz {attempt_quiz}, not {quiz_id}")]
    QuizMismatch {
        quiz_id: String,
        attempt_quiz: String,
    },

    #[error("Invalid answer for question {question}: option {option} out of {options} options")]
    InvalidAnswer {
        question: usize,
        option: usize,
        options: usize,
    },

    #[error("Answer count mismatch: expected {expected}, got {actual}")]
    AnswerCountMismatch { expected: usize, actual: usize },

    #[error("Invalid quiz: {0}")]
    InvalidQuiz(String),

    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Invalid course: {0}")]
    InvalidCourse(String),

    #[error("Invalid user: {0}")]
    InvalidUser(String),

    #[error("Not eligible for a certificate in {course_id}: {completion}% complete")]
    NotEligible { course_id: String, completion: u8 },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, LmsError>;
