//! Data structures for quiz attempts.

use serde::{Deserialize, Serialize};

use crate::course::{QuestionId, Quiz, QuizId};
use crate::error::{LmsError, Result};

// ---------------------------------------------------------------------------
// Quiz attempt (persisted)
// ---------------------------------------------------------------------------

/// A submitted attempt, as appended to the attempt log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttempt {
    pub quiz_id: QuizId,
    /// Selected option index per question.
    pub answers: Vec<usize>,
    /// Percentage score.
    pub score: u8,
    pub completed_at: String,
    /// Seconds between start and submission.
    pub time_spent: u64,
}

// ---------------------------------------------------------------------------
// Attempt state (in memory until submitted)
// ---------------------------------------------------------------------------

/// An attempt in progress.
///
/// Only [`super::start_attempt`] creates one. Dropping it discards the
/// attempt; nothing is persisted before submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptState {
    quiz_id: QuizId,
    answers: Vec<Option<usize>>,
    option_counts: Vec<usize>,
    started_at: String,
    time_remaining: Option<u32>,
}

impl AttemptState {
    pub(crate) fn new(quiz: &Quiz) -> Self {
        Self {
            quiz_id: quiz.id().clone(),
            answers: vec![None; quiz.questions().len()],
            option_counts: quiz.questions().iter().map(|q| q.options().len()).collect(),
            started_at: crate::time::now_iso8601(),
            time_remaining: quiz.time_limit().map(|minutes| minutes.saturating_mul(60)),
        }
    }

    pub fn quiz_id(&self) -> &QuizId {
        &self.quiz_id
    }

    /// Current selection per question (`None` = unanswered).
    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    pub fn started_at(&self) -> &str {
        &self.started_at
    }

    /// Select `option` for question `question`, replacing any earlier choice.
    pub fn answer(&mut self, question: usize, option: usize) -> Result<()> {
        let options = *self
            .option_counts
            .get(question)
            .ok_or_else(|| {
                LmsError::NotFound(format!(
                    "question {question} (quiz {} has {} questions)",
                    self.quiz_id,
                    self.option_counts.len()
                ))
            })?;
        if option >= options {
            return Err(LmsError::InvalidAnswer {
                question,
                option,
                options,
            });
        }
        self.answers[question] = Some(option);
        Ok(())
    }

    /// Indices of questions without a selection.
    pub fn unanswered(&self) -> Vec<usize> {
        self.answers
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// Whether every question has a selection (submission is allowed).
    pub fn is_complete(&self) -> bool {
        self.answers.iter().all(Option::is_some)
    }

    /// Seconds left on the countdown, if the quiz is timed.
    pub fn time_remaining(&self) -> Option<u32> {
        self.time_remaining
    }

    /// Advance the countdown by `seconds`, saturating at zero.
    pub fn tick(&mut self, seconds: u32) -> Option<u32> {
        if let Some(remaining) = self.time_remaining.as_mut() {
            *remaining = remaining.saturating_sub(seconds);
        }
        self.time_remaining
    }

    /// Whether a timed attempt has run out of time.
    pub fn is_expired(&self) -> bool {
        self.time_remaining == Some(0)
    }

    pub(crate) fn into_answers(self) -> Vec<Option<usize>> {
        self.answers
    }
}

// ---------------------------------------------------------------------------
// Scoring results
// ---------------------------------------------------------------------------

/// Outcome of scoring a full answer sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub correct: usize,
    pub total: usize,
    /// `round(100 * correct / total)`.
    pub percentage: u8,
}

/// Per-question feedback shown after submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionReview {
    pub index: usize,
    pub question_id: QuestionId,
    pub selected: usize,
    pub correct_answer: usize,
    pub is_correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}
