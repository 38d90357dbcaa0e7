//! Course content tree: courses, modules, lessons, quizzes, questions.
//!
//! Stored JSON uses camelCase. Optional collections and flags are given
//! concrete defaults here, at the deserialization boundary, so nothing
//! downstream has to treat "missing" specially.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{LmsError, Result};

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// Unique identifier for a course.
    CourseId
);
string_id!(
    /// Identifier of a module, unique within its course.
    ModuleId
);
string_id!(
    /// Identifier of a lesson, unique within its module.
    LessonId
);
string_id!(
    /// Identifier of a quiz, unique within its course.
    QuizId
);
string_id!(
    /// Identifier of a question.
    QuestionId
);

// ---------------------------------------------------------------------------
// Question
// ---------------------------------------------------------------------------

/// A multiple-choice question.
///
/// Always has at least two options and a `correct_answer` that indexes
/// into them; both the constructor and deserialization enforce this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "QuestionRecord", into = "QuestionRecord")]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<String>,
    correct_answer: usize,
    explanation: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionRecord {
    id: QuestionId,
    question: String,
    options: Vec<String>,
    correct_answer: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    explanation: Option<String>,
}

impl Question {
    /// Create a question, validating options and the answer key.
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
    ) -> Result<Self> {
        let id = QuestionId::new(id);
        if options.len() < 2 {
            return Err(LmsError::InvalidQuestion(format!(
                "question {id} needs at least 2 options, has {}",
                options.len()
            )));
        }
        if correct_answer >= options.len() {
            return Err(LmsError::InvalidQuestion(format!(
                "question {id}: correct answer {correct_answer} is out of range for {} options",
                options.len()
            )));
        }
        Ok(Self {
            id,
            text: text.into(),
            options,
            correct_answer,
            explanation: None,
        })
    }

    /// Attach an explanation shown after submission.
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Index of the correct option.
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }
}

impl TryFrom<QuestionRecord> for Question {
    type Error = LmsError;

    fn try_from(record: QuestionRecord) -> Result<Self> {
        let question = Question::new(
            record.id.0,
            record.question,
            record.options,
            record.correct_answer,
        )?;
        Ok(match record.explanation {
            Some(explanation) => question.with_explanation(explanation),
            None => question,
        })
    }
}

impl From<Question> for QuestionRecord {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            question: q.text,
            options: q.options,
            correct_answer: q.correct_answer,
            explanation: q.explanation,
        }
    }
}

// ---------------------------------------------------------------------------
// Quiz
// ---------------------------------------------------------------------------

/// A quiz attached to a module.
///
/// A quiz always has at least one question. A time limit or attempt limit
/// of zero means "no limit" and is normalized to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "QuizRecord", into = "QuizRecord")]
pub struct Quiz {
    id: QuizId,
    title: String,
    description: String,
    questions: Vec<Question>,
    time_limit: Option<u32>,
    max_attempts: Option<u32>,
    attempts_field: AttemptsField,
    extra: Map<String, Value>,
}

/// Field a quiz's attempt limit is stored under. Quizzes authored on the
/// educator page use `attempts`; seeded course data uses `maxAttempts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum AttemptsField {
    #[default]
    MaxAttempts,
    Attempts,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuizRecord {
    id: QuizId,
    title: String,
    #[serde(default)]
    description: String,
    questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time_limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_attempts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attempts: Option<u32>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Quiz {
    /// Create a quiz. Fails with `InvalidQuiz` when `questions` is empty.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        questions: Vec<Question>,
    ) -> Result<Self> {
        let id = QuizId::new(id);
        if questions.is_empty() {
            return Err(LmsError::InvalidQuiz(format!(
                "quiz {id} must have at least one question"
            )));
        }
        Ok(Self {
            id,
            title: title.into(),
            description: String::new(),
            questions,
            time_limit: None,
            max_attempts: None,
            attempts_field: AttemptsField::default(),
            extra: Map::new(),
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the time limit in minutes.
    pub fn with_time_limit(mut self, minutes: u32) -> Self {
        self.time_limit = Some(minutes).filter(|m| *m > 0);
        self
    }

    /// Set the maximum number of attempts.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts).filter(|a| *a > 0);
        self
    }

    pub fn id(&self) -> &QuizId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Questions in presentation order; never empty.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Time limit in minutes.
    pub fn time_limit(&self) -> Option<u32> {
        self.time_limit
    }

    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }
}

impl TryFrom<QuizRecord> for Quiz {
    type Error = LmsError;

    fn try_from(record: QuizRecord) -> Result<Self> {
        let mut quiz = Quiz::new(record.id.0, record.title, record.questions)?
            .with_description(record.description);
        if let Some(minutes) = record.time_limit {
            quiz = quiz.with_time_limit(minutes);
        }
        match (record.max_attempts, record.attempts) {
            (Some(max), _) => quiz = quiz.with_max_attempts(max),
            (None, Some(attempts)) => {
                quiz = quiz.with_max_attempts(attempts);
                quiz.attempts_field = AttemptsField::Attempts;
            }
            (None, None) => {}
        }
        quiz.extra = record.extra;
        Ok(quiz)
    }
}

impl From<Quiz> for QuizRecord {
    fn from(q: Quiz) -> Self {
        let (max_attempts, attempts) = match q.attempts_field {
            AttemptsField::MaxAttempts => (q.max_attempts, None),
            // The authoring page always expects a number here.
            AttemptsField::Attempts => (None, Some(q.max_attempts.unwrap_or(0))),
        };
        Self {
            id: q.id,
            title: q.title,
            description: q.description,
            questions: q.questions,
            time_limit: q.time_limit,
            max_attempts,
            attempts,
            extra: q.extra,
        }
    }
}

// ---------------------------------------------------------------------------
// Lesson / Module
// ---------------------------------------------------------------------------

/// Leaf content unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
    /// Fields this crate does not interpret (`order`, ...), kept for writes.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Lesson {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: LessonId::new(id),
            title: title.into(),
            content: String::new(),
            video_url: None,
            pdf_url: None,
            extra: Map::new(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }
}

/// An ordered group of lessons and quizzes.
///
/// A module carries quizzes in two places: the single `quiz` of seeded
/// course data and the `quizzes` list written by the authoring page. Both
/// count; [`Module::quizzes`] yields them in that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: ModuleId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz: Option<Quiz>,
    #[serde(default)]
    pub quizzes: Vec<Quiz>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Module {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: ModuleId::new(id),
            title: title.into(),
            description: String::new(),
            lessons: Vec::new(),
            quiz: None,
            quizzes: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Every quiz in the module: `quiz` first, then `quizzes`.
    pub fn quizzes(&self) -> impl Iterator<Item = &Quiz> {
        self.quiz.iter().chain(&self.quizzes)
    }

    /// Builder-style lesson append (no duplicate check; see [`Course::validate`]).
    pub fn with_lesson(mut self, lesson: Lesson) -> Self {
        self.lessons.push(lesson);
        self
    }

    pub fn with_quiz(mut self, quiz: Quiz) -> Self {
        self.quiz = Some(quiz);
        self
    }

    pub fn lesson(&self, id: &LessonId) -> Option<&Lesson> {
        self.lessons.iter().find(|l| &l.id == id)
    }
}

// ---------------------------------------------------------------------------
// Course
// ---------------------------------------------------------------------------

fn default_published() -> bool {
    true
}

/// A course and its content tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub instructor: String,
    #[serde(rename = "isPublished", default = "default_published")]
    pub published: bool,
    /// Authoring educator's email (set on courses in the global list).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default)]
    pub modules: Vec<Module>,
    /// Fields this crate does not interpret (`createdAt`, `enrollments`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Course {
    /// Create an empty, published course.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        instructor: impl Into<String>,
    ) -> Self {
        Self {
            id: CourseId::new(id),
            title: title.into(),
            description: String::new(),
            category: String::new(),
            instructor: instructor.into(),
            published: true,
            created_by: None,
            modules: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_module(mut self, module: Module) -> Self {
        self.modules.push(module);
        self
    }

    pub fn module(&self, id: &ModuleId) -> Option<&Module> {
        self.modules.iter().find(|m| &m.id == id)
    }

    fn module_mut(&mut self, id: &ModuleId) -> Result<&mut Module> {
        let course_id = self.id.clone();
        self.modules
            .iter_mut()
            .find(|m| &m.id == id)
            .ok_or_else(|| LmsError::NotFound(format!("module {id} in course {course_id}")))
    }

    /// Append a module. Fails if its id is already used in this course.
    pub fn add_module(&mut self, module: Module) -> Result<()> {
        if self.module(&module.id).is_some() {
            return Err(LmsError::InvalidCourse(format!(
                "duplicate module id {} in course {}",
                module.id, self.id
            )));
        }
        self.modules.push(module);
        Ok(())
    }

    /// Append a lesson to a module.
    pub fn add_lesson(&mut self, module_id: &ModuleId, lesson: Lesson) -> Result<()> {
        let module = self.module_mut(module_id)?;
        if module.lesson(&lesson.id).is_some() {
            return Err(LmsError::InvalidCourse(format!(
                "duplicate lesson id {} in module {}",
                lesson.id, module_id
            )));
        }
        module.lessons.push(lesson);
        Ok(())
    }

    fn check_quiz_id_free(&self, quiz_id: &QuizId, except: Option<&ModuleId>) -> Result<()> {
        let clash = self.modules.iter().any(|m| {
            let own_slot = except == Some(&m.id);
            m.quiz
                .as_ref()
                .is_some_and(|q| !own_slot && q.id() == quiz_id)
                || m.quizzes.iter().any(|q| q.id() == quiz_id)
        });
        if clash {
            return Err(LmsError::InvalidCourse(format!(
                "quiz id {quiz_id} already used in course {}",
                self.id
            )));
        }
        Ok(())
    }

    /// Attach or replace a module's quiz.
    pub fn set_quiz(&mut self, module_id: &ModuleId, quiz: Quiz) -> Result<()> {
        self.check_quiz_id_free(quiz.id(), Some(module_id))?;
        self.module_mut(module_id)?.quiz = Some(quiz);
        Ok(())
    }

    /// Append a quiz to a module's `quizzes` list.
    pub fn add_quiz(&mut self, module_id: &ModuleId, quiz: Quiz) -> Result<()> {
        self.check_quiz_id_free(quiz.id(), None)?;
        self.module_mut(module_id)?.quizzes.push(quiz);
        Ok(())
    }

    /// All lessons with their module, in course order.
    pub fn lessons(&self) -> impl Iterator<Item = (&Module, &Lesson)> {
        self.modules
            .iter()
            .flat_map(|m| m.lessons.iter().map(move |l| (m, l)))
    }

    /// All quizzes, in course order.
    pub fn quizzes(&self) -> impl Iterator<Item = &Quiz> {
        self.modules.iter().flat_map(Module::quizzes)
    }

    pub fn quiz(&self, id: &QuizId) -> Option<&Quiz> {
        self.quizzes().find(|q| q.id() == id)
    }

    /// Lessons plus quizzes.
    pub fn total_items(&self) -> usize {
        self.lessons().count() + self.quizzes().count()
    }

    /// Check identifiers: non-empty id and title, unique module ids,
    /// unique lesson ids per module, unique quiz ids per course.
    pub fn validate(&self) -> Result<()> {
        if self.id.0.trim().is_empty() {
            return Err(LmsError::InvalidCourse("course id is empty".into()));
        }
        if self.title.trim().is_empty() {
            return Err(LmsError::InvalidCourse(format!(
                "course {} has an empty title",
                self.id
            )));
        }

        let mut module_ids = std::collections::HashSet::new();
        let mut quiz_ids = std::collections::HashSet::new();
        for module in &self.modules {
            if !module_ids.insert(&module.id) {
                return Err(LmsError::InvalidCourse(format!(
                    "duplicate module id {} in course {}",
                    module.id, self.id
                )));
            }

            let mut lesson_ids = std::collections::HashSet::new();
            for lesson in &module.lessons {
                if !lesson_ids.insert(&lesson.id) {
                    return Err(LmsError::InvalidCourse(format!(
                        "duplicate lesson id {} in module {}",
                        lesson.id, module.id
                    )));
                }
            }

            for quiz in module.quizzes() {
                if !quiz_ids.insert(quiz.id()) {
                    return Err(LmsError::InvalidCourse(format!(
                        "duplicate quiz id {} in course {}",
                        quiz.id(),
                        self.id
                    )));
                }
            }
        }
        Ok(())
    }
}
