//! Quiz engine: attempt gating, scoring, submission.

use crate::course::{CourseId, Quiz, QuizId};
use crate::error::{LmsError, Result};
use crate::progress::engine::{percentage, quiz_key, record_completion};
use crate::progress::CompletionRecord;
use crate::store::{self, keys, CompletionStore, StoredList};

use super::types::*;

// ---------------------------------------------------------------------------
// Attempt log
// ---------------------------------------------------------------------------

/// A learner's attempt log for a quiz as stored, undecodable entries
/// included.
pub fn load_attempt_log<S: CompletionStore + ?Sized>(
    store: &S,
    learner_email: &str,
    quiz_id: &QuizId,
) -> StoredList<QuizAttempt> {
    store::load_or_default(store, &keys::quiz_attempts(learner_email, quiz_id.as_str()))
}

/// A learner's submitted attempts for a quiz, oldest first.
pub fn load_attempts<S: CompletionStore + ?Sized>(
    store: &S,
    learner_email: &str,
    quiz_id: &QuizId,
) -> Vec<QuizAttempt> {
    load_attempt_log(store, learner_email, quiz_id).into_decoded()
}

fn remaining(quiz: &Quiz, used: usize) -> Option<u32> {
    quiz.max_attempts().map(|max| {
        let used = u32::try_from(used).unwrap_or(u32::MAX);
        max.saturating_sub(used)
    })
}

/// Attempts left before the limit, or `None` for an unlimited quiz.
pub fn attempts_remaining(quiz: &Quiz, prior_attempts: &[QuizAttempt]) -> Option<u32> {
    remaining(quiz, prior_attempts.len())
}

/// Highest score among `attempts`.
pub fn best_score(attempts: &[QuizAttempt]) -> Option<u8> {
    attempts.iter().map(|a| a.score).max()
}

fn check_attempt_limit(quiz: &Quiz, used: usize) -> Result<()> {
    match (quiz.max_attempts(), remaining(quiz, used)) {
        (Some(max_attempts), Some(0)) => Err(LmsError::AttemptLimitExceeded {
            quiz_id: quiz.id().to_string(),
            max_attempts,
        }),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Start attempt
// ---------------------------------------------------------------------------

/// Begin a new attempt.
///
/// Fails with `AttemptLimitExceeded` once `prior_attempts` has reached the
/// quiz's `max_attempts`. The returned state has every answer unset and,
/// for timed quizzes, a countdown of `time_limit * 60` seconds.
pub fn start_attempt(quiz: &Quiz, prior_attempts: &[QuizAttempt]) -> Result<AttemptState> {
    check_attempt_limit(quiz, prior_attempts.len())?;
    Ok(AttemptState::new(quiz))
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

fn check_answers(quiz: &Quiz, answers: &[usize]) -> Result<()> {
    if answers.len() != quiz.questions().len() {
        return Err(LmsError::AnswerCountMismatch {
            expected: quiz.questions().len(),
            actual: answers.len(),
        });
    }
    for (question, (answer, q)) in answers.iter().zip(quiz.questions()).enumerate() {
        if *answer >= q.options().len() {
            return Err(LmsError::InvalidAnswer {
                question,
                option: *answer,
                options: q.options().len(),
            });
        }
    }
    Ok(())
}

/// Score a complete answer sheet against the answer key.
pub fn score_answers(quiz: &Quiz, answers: &[usize]) -> Result<Score> {
    check_answers(quiz, answers)?;

    let total = quiz.questions().len();
    let correct = answers
        .iter()
        .zip(quiz.questions())
        .filter(|(answer, q)| **answer == q.correct_answer())
        .count();

    Ok(Score {
        correct,
        total,
        percentage: percentage(correct, total),
    })
}

/// Per-question feedback for a complete answer sheet.
pub fn review(quiz: &Quiz, answers: &[usize]) -> Result<Vec<QuestionReview>> {
    check_answers(quiz, answers)?;

    Ok(answers
        .iter()
        .zip(quiz.questions())
        .enumerate()
        .map(|(index, (answer, q))| QuestionReview {
            index,
            question_id: q.id().clone(),
            selected: *answer,
            correct_answer: q.correct_answer(),
            is_correct: *answer == q.correct_answer(),
            explanation: q.explanation().map(str::to_string),
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

/// Submit a finished attempt.
///
/// Rejected while any answer is unset. On success the attempt is appended
/// to the learner's attempt log and the quiz's completion record in the
/// course progress map is written (replacing any earlier one) with the
/// score, `elapsed_seconds`, and the submission time.
pub fn submit<S: CompletionStore + ?Sized>(
    store: &mut S,
    learner_email: &str,
    course_id: &CourseId,
    quiz: &Quiz,
    state: AttemptState,
    elapsed_seconds: u64,
) -> Result<QuizAttempt> {
    if state.quiz_id() != quiz.id() {
        return Err(LmsError::QuizMismatch {
            quiz_id: quiz.id().to_string(),
            attempt_quiz: state.quiz_id().to_string(),
        });
    }

    let unanswered = state.unanswered();
    if !unanswered.is_empty() {
        return Err(LmsError::IncompleteSubmission { unanswered });
    }
    let answers: Vec<usize> = state.into_answers().into_iter().flatten().collect();
    let score = score_answers(quiz, &answers)?;

    // The log may have grown since the attempt was started. Entries that
    // no longer decode still count against the limit.
    let log_key = keys::quiz_attempts(learner_email, quiz.id().as_str());
    let mut attempts: StoredList<QuizAttempt> = store::load_for_update(&*store, &log_key)?;
    check_attempt_limit(quiz, attempts.len())?;

    let completed_at = crate::time::now_iso8601();
    let attempt = QuizAttempt {
        quiz_id: quiz.id().clone(),
        answers,
        score: score.percentage,
        completed_at: completed_at.clone(),
        time_spent: elapsed_seconds,
    };

    attempts.push(attempt.clone());
    store::save(store, &log_key, &attempts)?;

    let record = CompletionRecord {
        completed: true,
        completed_at: Some(completed_at),
        time_spent: Some(elapsed_seconds),
        score: Some(score.percentage),
    };
    record_completion(store, learner_email, course_id, quiz_key(quiz.id()), record)?;

    log::debug!(
        "{learner_email} submitted quiz {} ({}/{} correct, {}%)",
        quiz.id(),
        score.correct,
        score.total,
        score.percentage
    );
    Ok(attempt)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
