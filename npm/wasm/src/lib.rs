use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use aplus_lms::certificate::generate_certificate_id;
use aplus_lms::progress::compute_progress;
use aplus_lms::quiz::{self, AttemptState};
use aplus_lms::{Course, ProgressData, Quiz, QuizAttempt};

fn parse<T: DeserializeOwned>(json: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn js_err(e: aplus_lms::LmsError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Compute course progress from a course and a stored progress map.
/// Returns the `CourseProgress` as JSON.
#[wasm_bindgen(js_name = computeProgress)]
pub fn compute_progress_json(course_json: &str, progress_json: &str) -> Result<String, JsValue> {
    let course: Course = parse(course_json)?;
    let progress: ProgressData = parse(progress_json)?;
    to_json(&compute_progress(&course, &progress))
}

/// Score an answer sheet (`[index, ...]`). Returns the `Score` as JSON.
#[wasm_bindgen(js_name = scoreQuiz)]
pub fn score_quiz_json(quiz_json: &str, answers_json: &str) -> Result<String, JsValue> {
    let quiz: Quiz = parse(quiz_json)?;
    let answers: Vec<usize> = parse(answers_json)?;
    to_json(&quiz::score_answers(&quiz, &answers).map_err(js_err)?)
}

/// Per-question review for an answer sheet, as a JSON array.
#[wasm_bindgen(js_name = reviewQuiz)]
pub fn review_quiz_json(quiz_json: &str, answers_json: &str) -> Result<String, JsValue> {
    let quiz: Quiz = parse(quiz_json)?;
    let answers: Vec<usize> = parse(answers_json)?;
    to_json(&quiz::review(&quiz, &answers).map_err(js_err)?)
}

/// Whether another attempt is allowed given the stored attempt log.
#[wasm_bindgen(js_name = canStartAttempt)]
pub fn can_start_attempt_json(quiz_json: &str, attempts_json: &str) -> Result<bool, JsValue> {
    let quiz: Quiz = parse(quiz_json)?;
    let attempts: Vec<QuizAttempt> = parse(attempts_json)?;
    Ok(quiz::start_attempt(&quiz, &attempts).is_ok())
}

/// A fresh certificate id.
#[wasm_bindgen(js_name = newCertificateId)]
pub fn new_certificate_id() -> String {
    generate_certificate_id().0
}

/// An attempt in progress, driven from the quiz page.
#[wasm_bindgen]
pub struct WasmAttempt {
    quiz: Quiz,
    inner: AttemptState,
}

#[wasm_bindgen]
impl WasmAttempt {
    /// Start an attempt; fails when the attempt limit is reached.
    #[wasm_bindgen(constructor)]
    pub fn new(quiz_json: &str, attempts_json: &str) -> Result<WasmAttempt, JsValue> {
        let quiz: Quiz = parse(quiz_json)?;
        let attempts: Vec<QuizAttempt> = parse(attempts_json)?;
        let inner = quiz::start_attempt(&quiz, &attempts).map_err(js_err)?;
        Ok(WasmAttempt { quiz, inner })
    }

    pub fn answer(&mut self, question: usize, option: usize) -> Result<(), JsValue> {
        self.inner.answer(question, option).map_err(js_err)
    }

    #[wasm_bindgen(js_name = isComplete)]
    pub fn is_complete(&self) -> bool {
        self.inner.is_complete()
    }

    /// Advance the countdown; returns the seconds left (or undefined if untimed).
    pub fn tick(&mut self, seconds: u32) -> Option<u32> {
        self.inner.tick(seconds)
    }

    #[wasm_bindgen(js_name = isExpired)]
    pub fn is_expired(&self) -> bool {
        self.inner.is_expired()
    }

    /// Score the current answers. Fails while any question is unanswered.
    #[wasm_bindgen(js_name = scoreJson)]
    pub fn score_json(&self) -> Result<String, JsValue> {
        let answers: Option<Vec<usize>> = self.inner.answers().iter().copied().collect();
        let answers = answers.ok_or_else(|| JsValue::from_str("not every question is answered"))?;
        to_json(&quiz::score_answers(&self.quiz, &answers).map_err(js_err)?)
    }
}
