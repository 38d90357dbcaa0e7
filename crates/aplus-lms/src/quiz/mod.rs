//! Quiz evaluation: attempts, scoring and the attempt log.
//!
//! The quiz module provides:
//! - In-memory attempt state with answer validation and a countdown
//! - Attempt limiting against the learner's attempt log
//! - Scoring and per-question review
//! - Submission, which appends to the log and records quiz completion

pub mod engine;
pub mod types;

pub use types::{AttemptState, QuestionReview, QuizAttempt, Score};

pub use engine::{
    attempts_remaining, best_score, load_attempt_log, load_attempts, review, score_answers,
    start_attempt, submit,
};
