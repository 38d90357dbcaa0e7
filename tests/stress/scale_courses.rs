//! Scale test: large courses, many learners and long attempt logs.
//!
//! Validates that aggregation stays exact and bounded as course size grows.

use aplus_lms::course::{Course, Lesson, LessonId, Module, ModuleId, Question, Quiz};
use aplus_lms::progress::{self, compute_progress, CompletionRecord, ProgressData};
use aplus_lms::quiz;
use aplus_lms::MemoryStore;

fn big_course(modules: usize, lessons_per_module: usize) -> Course {
    let mut course = Course::new("big", "Big Course", "Scale");
    for m in 0..modules {
        let mut module = Module::new(format!("m{m}"), format!("Module {m}"));
        for l in 0..lessons_per_module {
            module = module.with_lesson(Lesson::new(format!("l{l}"), format!("Lesson {l}")));
        }
        let question = Question::new("q", "?", vec!["a".into(), "b".into()], 0).unwrap();
        module = module.with_quiz(Quiz::new(format!("quiz{m}"), "Check", vec![question]).unwrap());
        course = course.with_module(module);
    }
    course
}

#[test]
fn stress_10k_item_course_aggregates_exactly() {
    let course = big_course(100, 99);
    assert_eq!(course.total_items(), 10_000);

    let mut data = ProgressData::new();
    for (i, (module, lesson)) in course.lessons().enumerate() {
        if i % 2 == 0 {
            data.insert(
                progress::lesson_key(&module.id, &lesson.id),
                CompletionRecord::completed(format!("2024-01-01T00:00:{:02}.000Z", i % 60)),
            );
        }
    }

    let p = compute_progress(&course, &data);
    assert_eq!(p.total_lessons, 9_900);
    assert_eq!(p.total_quizzes, 100);
    assert_eq!(p.lessons_completed, 4_950);
    assert_eq!(p.completion_percentage, 50);
    assert_eq!(p.last_activity.as_deref(), Some("2024-01-01T00:00:58.000Z"));
}

#[test]
fn stress_percentage_bounded_for_every_fraction() {
    for whole in 1..=300 {
        for part in 0..=whole {
            let pct = progress::percentage(part, whole);
            assert!(pct <= 100);
            if part == whole {
                assert_eq!(pct, 100);
            }
            if part == 0 {
                assert_eq!(pct, 0);
            }
        }
    }
}

#[test]
fn stress_1k_learners_isolated() {
    let course = big_course(2, 3);
    let mut store = MemoryStore::new();

    for i in 0..1_000 {
        let email = format!("learner{i}@x.io");
        for l in 0..(i % 4) {
            progress::mark_lesson_complete(
                &mut store,
                &email,
                &course,
                &ModuleId::new("m0"),
                &LessonId::new(format!("l{l}")),
                None,
            )
            .unwrap();
        }
    }

    for i in 0..1_000 {
        let email = format!("learner{i}@x.io");
        let p = progress::course_progress(&store, &email, &course);
        assert_eq!(p.lessons_completed, (i % 4).min(3));
    }
}

#[test]
fn stress_500_attempts_unlimited_quiz() {
    let course = big_course(1, 1);
    let q = course.modules[0].quiz.as_ref().unwrap();
    let mut store = MemoryStore::new();

    for i in 0..500 {
        let prior = quiz::load_attempts(&store, "ann@x.io", q.id());
        assert_eq!(prior.len(), i);
        let mut state = quiz::start_attempt(q, &prior).unwrap();
        state.answer(0, i % 2).unwrap();
        quiz::submit(&mut store, "ann@x.io", &course.id, q, state, 1).unwrap();
    }

    let log = quiz::load_attempts(&store, "ann@x.io", q.id());
    assert_eq!(log.len(), 500);
    assert_eq!(quiz::best_score(&log), Some(100));
    assert_eq!(quiz::attempts_remaining(q, &log), None);
}
