//! Integration test: full end-to-end workflow.
//!
//! Tests the complete lifecycle:
//! 1. Register an educator and a learner
//! 2. Author and publish a course (2 lessons + 1 quiz)
//! 3. Enroll the learner
//! 4. Complete lessons and pass the quiz
//! 5. Issue the certificate, exactly once
//! 6. Check the dashboards see the same state

use aplus_lms::certificate::{self, Issuance};
use aplus_lms::course::{self, Course, CourseId, Lesson, LessonId, Module, ModuleId, Question, Quiz};
use aplus_lms::dashboard;
use aplus_lms::enrollment;
use aplus_lms::progress;
use aplus_lms::quiz;
use aplus_lms::user::{self, Role, User};
use aplus_lms::{FileStore, LmsError, MemoryStore};

fn rust_course() -> Course {
    let quiz = Quiz::new(
        "ownership-check",
        "Ownership check",
        vec![
            Question::new(
                "q1",
                "Which keyword makes a binding mutable?",
                vec!["let".into(), "mut".into(), "ref".into()],
                1,
            )
            .unwrap(),
            Question::new(
                "q2",
                "How many owners can a value have?",
                vec!["One".into(), "Two".into()],
                0,
            )
            .unwrap()
            .with_explanation("Every value has exactly one owner."),
        ],
    )
    .unwrap()
    .with_max_attempts(3);

    Course::new("rust-101", "Intro to Rust", "Edna Mode").with_module(
        Module::new("m1", "Basics")
            .with_lesson(Lesson::new("l1", "Hello, world").with_content("fn main() {}"))
            .with_lesson(Lesson::new("l2", "Ownership"))
            .with_quiz(quiz),
    )
}

#[test]
fn full_workflow_enrollment_to_certificate() {
    let mut store = MemoryStore::new();

    // ── Step 1: Register users ──────────────────────────────────────────
    user::register_user(&mut store, User::new("edna@x.io", "Edna Mode", Role::Educator)).unwrap();
    user::register_user(&mut store, User::new("ann@x.io", "Ann Learner", Role::Learner)).unwrap();
    let ann = user::find_user(&store, "ANN@x.io").expect("lookup is case-insensitive");

    // ── Step 2: Author the course ───────────────────────────────────────
    course::save_course(&mut store, "edna@x.io", rust_course()).unwrap();
    let entry = course::find_course(&store, &CourseId::new("rust-101")).unwrap();
    assert_eq!(entry.educator_name.as_deref(), Some("Edna Mode"));
    let course = entry.course;
    assert_eq!(course.total_items(), 3);

    // ── Step 3: Enroll ──────────────────────────────────────────────────
    assert!(enrollment::enroll(&mut store, &ann.email, &course.id).unwrap());
    assert_eq!(
        progress::course_progress(&store, &ann.email, &course).completion_percentage,
        0
    );

    // ── Step 4: Lessons ─────────────────────────────────────────────────
    let m1 = ModuleId::new("m1");
    for lesson in ["l1", "l2"] {
        progress::mark_lesson_complete(
            &mut store,
            &ann.email,
            &course,
            &m1,
            &LessonId::new(lesson),
            Some(60),
        )
        .unwrap();
    }
    let p = progress::course_progress(&store, &ann.email, &course);
    assert_eq!(p.lessons_completed, 2);
    assert_eq!(p.completion_percentage, 67);

    // Not yet eligible
    assert!(matches!(
        certificate::issue(&mut store, &ann, &course),
        Err(LmsError::NotEligible { completion: 67, .. })
    ));

    // ── Step 5: Quiz, all answers correct ───────────────────────────────
    let q = course.modules[0].quiz.as_ref().unwrap();
    let prior = quiz::load_attempts(&store, &ann.email, q.id());
    let mut state = quiz::start_attempt(q, &prior).unwrap();
    state.answer(0, 1).unwrap();
    state.answer(1, 0).unwrap();
    let attempt = quiz::submit(&mut store, &ann.email, &course.id, q, state, 42).unwrap();
    assert_eq!(attempt.score, 100);

    let p = progress::course_progress(&store, &ann.email, &course);
    assert_eq!(p.completed_items, 3);
    assert_eq!(p.completion_percentage, 100);
    assert!(p.last_activity.is_some());

    // ── Step 6: Certificate, exactly once ───────────────────────────────
    let first = certificate::issue(&mut store, &ann, &course).unwrap();
    let second = certificate::issue(&mut store, &ann, &course).unwrap();
    assert!(matches!(first, Issuance::Issued(_)));
    assert!(matches!(second, Issuance::AlreadyIssued(_)));
    assert_eq!(first.certificate().id, second.certificate().id);

    let certs = certificate::list_certificates(&store, &ann.email);
    assert_eq!(certs.len(), 1);
    assert_eq!(certs[0].course_name, "Intro to Rust");
    assert_eq!(certs[0].learner_name, "Ann Learner");
    assert_eq!(certs[0].instructor_name, "Edna Mode");
    assert!(certs[0].id.as_str().starts_with("cert_"));

    // ── Step 7: Dashboards ──────────────────────────────────────────────
    let dash = dashboard::learner_dashboard(&store, &ann.email);
    assert_eq!(dash.courses.len(), 1);
    assert_eq!(dash.completed_courses, 1);
    assert_eq!(dash.certificates.len(), 1);

    let analytics = dashboard::course_analytics(&store, "edna@x.io");
    assert_eq!(analytics[0].enrollments, 1);
    assert_eq!(analytics[0].certificates, 1);
    assert_eq!(analytics[0].completion_rate, 100);
    assert_eq!(analytics[0].average_quiz_score, 100);

    let metrics = dashboard::platform_metrics(&store);
    assert_eq!(metrics.total_enrollments, 1);
    assert_eq!(metrics.total_certificates, 1);
    assert_eq!(metrics.certification_rate, 100);
}

#[test]
fn full_workflow_attempt_limit() {
    let mut store = MemoryStore::new();
    let course = rust_course();
    let q = course.modules[0].quiz.as_ref().unwrap();

    // Three failed attempts use up the limit
    for _ in 0..3 {
        let prior = quiz::load_attempts(&store, "bob@x.io", q.id());
        let mut state = quiz::start_attempt(q, &prior).unwrap();
        state.answer(0, 0).unwrap();
        state.answer(1, 1).unwrap();
        let attempt = quiz::submit(&mut store, "bob@x.io", &course.id, q, state, 10).unwrap();
        assert_eq!(attempt.score, 0);
    }

    let prior = quiz::load_attempts(&store, "bob@x.io", q.id());
    assert_eq!(prior.len(), 3);
    assert!(matches!(
        quiz::start_attempt(q, &prior),
        Err(LmsError::AttemptLimitExceeded { max_attempts: 3, .. })
    ));

    // The failed quiz still counts as a completed item
    let p = progress::course_progress(&store, "bob@x.io", &course);
    assert_eq!(p.quizzes_completed, 1);
}

#[test]
fn full_workflow_persists_across_file_store_instances() {
    let tmp = tempfile::tempdir().unwrap();
    let course = rust_course();

    {
        let mut store = FileStore::new(tmp.path()).unwrap();
        course::save_course(&mut store, "edna@x.io", course.clone()).unwrap();
        progress::mark_lesson_complete(
            &mut store,
            "ann@x.io",
            &course,
            &ModuleId::new("m1"),
            &LessonId::new("l1"),
            None,
        )
        .unwrap();
    }

    let store = FileStore::new(tmp.path()).unwrap();
    assert_eq!(course::educator_courses(&store, "edna@x.io"), vec![course.clone()]);
    let p = progress::course_progress(&store, "ann@x.io", &course);
    assert_eq!(p.lessons_completed, 1);
    assert_eq!(p.completion_percentage, 33);
}
