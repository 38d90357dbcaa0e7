//! Edge case tests: empty courses, boundary limits, odd identifiers.

use aplus_lms::certificate;
use aplus_lms::course::{Course, CourseId, Lesson, LessonId, Module, ModuleId, Question, Quiz};
use aplus_lms::progress::{self, compute_progress, ProgressData};
use aplus_lms::quiz;
use aplus_lms::user::{Role, User};
use aplus_lms::{LmsError, MemoryStore};

fn one_question(id: &str) -> Quiz {
    Quiz::new(
        id,
        "Quiz",
        vec![Question::new("q", "?", vec!["a".into(), "b".into()], 1).unwrap()],
    )
    .unwrap()
}

#[test]
fn edge_empty_course_never_certifies() {
    let course = Course::new("empty", "Nothing here", "Nobody");
    let mut store = MemoryStore::new();
    let p = compute_progress(&course, &ProgressData::new());
    assert_eq!(p.total_items, 0);
    assert_eq!(p.completion_percentage, 0);

    let learner = User::new("ann@x.io", "Ann", Role::Learner);
    assert!(matches!(
        certificate::issue(&mut store, &learner, &course),
        Err(LmsError::NotEligible { completion: 0, .. })
    ));
}

#[test]
fn edge_module_with_only_a_quiz() {
    let course = Course::new("c", "Quiz only", "X")
        .with_module(Module::new("m", "M").with_quiz(one_question("only")));
    let mut store = MemoryStore::new();

    let q = course.modules[0].quiz.as_ref().unwrap();
    let mut state = quiz::start_attempt(q, &[]).unwrap();
    state.answer(0, 1).unwrap();
    quiz::submit(&mut store, "ann@x.io", &course.id, q, state, 0).unwrap();

    assert!(progress::course_progress(&store, "ann@x.io", &course).is_complete());
}

#[test]
fn edge_single_attempt_quiz() {
    let q = one_question("once").with_max_attempts(1);
    let mut store = MemoryStore::new();
    let course_id = CourseId::new("c");

    assert_eq!(quiz::attempts_remaining(&q, &[]), Some(1));
    let mut state = quiz::start_attempt(&q, &[]).unwrap();
    state.answer(0, 0).unwrap();
    quiz::submit(&mut store, "ann@x.io", &course_id, &q, state, 0).unwrap();

    let log = quiz::load_attempts(&store, "ann@x.io", q.id());
    assert!(matches!(
        quiz::start_attempt(&q, &log),
        Err(LmsError::AttemptLimitExceeded { max_attempts: 1, .. })
    ));
}

#[test]
fn edge_zero_limits_mean_unlimited() {
    let q = one_question("z").with_max_attempts(0).with_time_limit(0);
    assert_eq!(q.max_attempts(), None);
    assert_eq!(q.time_limit(), None);
    let state = quiz::start_attempt(&q, &[]).unwrap();
    assert_eq!(state.time_remaining(), None);
}

#[test]
fn edge_invalid_quiz_shapes_rejected() {
    assert!(matches!(
        Quiz::new("empty", "Empty", vec![]),
        Err(LmsError::InvalidQuiz(_))
    ));
    assert!(matches!(
        Question::new("q", "?", vec!["only".into()], 0),
        Err(LmsError::InvalidQuestion(_))
    ));
    assert!(matches!(
        Question::new("q", "?", vec!["a".into(), "b".into()], 2),
        Err(LmsError::InvalidQuestion(_))
    ));

    let stored = serde_json::json!({"id": "x", "title": "X", "questions": []});
    assert!(serde_json::from_value::<Quiz>(stored).is_err());
}

#[test]
fn edge_separator_collision_counts_for_both() {
    // "a_b" + "c" and "a" + "b_c" share the key "a_b_c"; both count.
    let course = Course::new("c", "Tricky", "X")
        .with_module(Module::new("a_b", "AB").with_lesson(Lesson::new("c", "C")))
        .with_module(Module::new("a", "A").with_lesson(Lesson::new("b_c", "BC")));
    let mut store = MemoryStore::new();

    progress::mark_lesson_complete(
        &mut store,
        "ann@x.io",
        &course,
        &ModuleId::new("a_b"),
        &LessonId::new("c"),
        None,
    )
    .unwrap();
    let p = progress::course_progress(&store, "ann@x.io", &course);
    assert_eq!(p.lessons_completed, 2);
}

#[test]
fn edge_unicode_and_plus_addresses() {
    let course = Course::new("ünïcödé", "Ünïcödé", "X")
        .with_module(Module::new("m", "M").with_lesson(Lesson::new("l", "L")));
    let tmp = tempfile::tempdir().unwrap();
    let mut store = aplus_lms::FileStore::new(tmp.path()).unwrap();

    progress::mark_lesson_complete(
        &mut store,
        "ann+lms@x.io",
        &course,
        &ModuleId::new("m"),
        &LessonId::new("l"),
        None,
    )
    .unwrap();
    assert!(progress::course_progress(&store, "ann+lms@x.io", &course).is_complete());
    assert_eq!(
        store.keys().unwrap(),
        vec!["progress_ann+lms@x.io_ünïcödé".to_string()]
    );
}

#[test]
fn edge_authored_quizzes_gate_the_certificate() {
    let module: Module = serde_json::from_value(serde_json::json!({
        "id": "m1",
        "title": "Basics",
        "order": 1,
        "lessons": [{"id": "l1", "title": "Hello", "order": 1}],
        "quizzes": [{
            "id": "qz",
            "title": "Check",
            "description": "",
            "attempts": 3,
            "order": 1,
            "questions": [{"id": "q1", "question": "?", "options": ["a", "b"], "correctAnswer": 1}]
        }]
    }))
    .unwrap();
    let course = Course::new("authored", "Authored", "Edna").with_module(module);
    let learner = User::new("ann@x.io", "Ann", Role::Learner);
    let mut store = MemoryStore::new();

    progress::mark_lesson_complete(
        &mut store,
        "ann@x.io",
        &course,
        &ModuleId::new("m1"),
        &LessonId::new("l1"),
        None,
    )
    .unwrap();
    assert!(matches!(
        certificate::issue(&mut store, &learner, &course),
        Err(LmsError::NotEligible { completion: 50, .. })
    ));

    let q = course.quizzes().next().unwrap();
    assert_eq!(q.max_attempts(), Some(3));
    let mut state = quiz::start_attempt(q, &[]).unwrap();
    state.answer(0, 1).unwrap();
    quiz::submit(&mut store, "ann@x.io", &course.id, q, state, 20).unwrap();

    assert!(certificate::issue(&mut store, &learner, &course).unwrap().is_new());
}
