//! A+ LMS CLI: `aplus` command.
//!
//! Provides a command-line interface over a file-backed store: registering
//! users, importing courses, tracking lesson progress, taking quizzes and
//! issuing certificates.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use aplus_lms::certificate::{self, CertificateId};
use aplus_lms::course::{self, CatalogEntry, Course, CourseId, LessonId, ModuleId, QuizId};
use aplus_lms::dashboard;
use aplus_lms::enrollment;
use aplus_lms::progress;
use aplus_lms::quiz;
use aplus_lms::time::display_date;
use aplus_lms::user::{self, Role, User};
use aplus_lms::FileStore;

// ── Directory helpers ─────────────────────────────────────────────────────────

fn data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(dir) => Ok(dir),
        None => {
            let home = std::env::var("HOME").context("HOME not set; pass --data-dir")?;
            Ok(PathBuf::from(home).join(".aplus"))
        }
    }
}

fn open_store(dir: &Path) -> Result<FileStore> {
    FileStore::new(dir).with_context(|| format!("failed to open data directory {}", dir.display()))
}

fn require_course(store: &FileStore, course_id: &str) -> Result<CatalogEntry> {
    course::find_course(store, &CourseId::new(course_id))
        .with_context(|| format!("course '{course_id}' is not in the catalog"))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn require_user(store: &FileStore, email: &str) -> Result<User> {
    user::find_user(store, email).ok_or_else(|| anyhow!("user '{email}' is not registered"))
}

// ── CLI structure ─────────────────────────────────────────────────────────────

/// A+ LMS CLI: track course progress, take quizzes, and issue
/// certificates from the command line.
#[derive(Parser, Debug)]
#[command(
    name = "aplus",
    about = "A+ LMS CLI",
    version,
    long_about = "aplus: A+ LMS CLI\n\nTrack course progress, take quizzes, and issue certificates\nagainst a local data directory."
)]
struct Cli {
    /// Data directory (default: $HOME/.aplus)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print reports as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        subcommand: UserCommands,
    },

    /// Manage courses
    Course {
        #[command(subcommand)]
        subcommand: CourseCommands,
    },

    /// Enroll a learner in a course
    Enroll {
        /// Learner email
        #[arg(long)]
        user: String,

        /// Course ID
        course: String,
    },

    /// Lesson progress
    Lesson {
        #[command(subcommand)]
        subcommand: LessonCommands,
    },

    /// Show a learner's progress on a course
    Progress {
        /// Learner email
        #[arg(long)]
        user: String,

        /// Course ID
        #[arg(long)]
        course: String,
    },

    /// Take quizzes
    Quiz {
        #[command(subcommand)]
        subcommand: QuizCommands,
    },

    /// Issue and list certificates
    Certificate {
        #[command(subcommand)]
        subcommand: CertificateCommands,
    },

    /// Show a learner's dashboard
    Dashboard {
        /// Learner email
        #[arg(long)]
        user: String,
    },

    /// Show per-course analytics for an educator
    Analytics {
        /// Educator email
        #[arg(long)]
        educator: String,
    },

    /// Show platform-wide metrics
    Metrics,
}

#[derive(Subcommand, Debug)]
enum UserCommands {
    /// Register a user (or update one with the same email)
    Add {
        #[arg(long)]
        email: String,

        #[arg(long)]
        name: String,

        /// learner, educator or admin
        #[arg(long, default_value = "learner")]
        role: String,
    },

    /// List registered users
    List {
        /// Only users with this role
        #[arg(long)]
        role: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum CourseCommands {
    /// Import a course from a JSON file into an educator's list
    Import {
        /// Educator email
        #[arg(long)]
        educator: String,

        /// Path to the course JSON
        file: PathBuf,
    },

    /// List courses in the catalog
    List {
        /// Filter by title or educator name
        #[arg(long)]
        search: Option<String>,

        /// Only published courses
        #[arg(long)]
        published: bool,
    },

    /// Show a course's modules, lessons and quizzes
    Show {
        /// Course ID
        course: String,
    },
}

#[derive(Subcommand, Debug)]
enum LessonCommands {
    /// Mark a lesson completed
    Complete {
        #[arg(long)]
        user: String,

        #[arg(long)]
        course: String,

        #[arg(long)]
        module: String,

        #[arg(long)]
        lesson: String,

        /// Seconds spent on the lesson
        #[arg(long)]
        time_spent: Option<u64>,
    },
}

#[derive(Subcommand, Debug)]
enum QuizCommands {
    /// Check whether an attempt can be started and show the questions
    Start {
        #[arg(long)]
        user: String,

        #[arg(long)]
        course: String,

        #[arg(long)]
        quiz: String,
    },

    /// Submit answers (comma-separated option indices, one per question)
    Submit {
        #[arg(long)]
        user: String,

        #[arg(long)]
        course: String,

        #[arg(long)]
        quiz: String,

        #[arg(long, value_delimiter = ',', required = true)]
        answers: Vec<usize>,

        /// Seconds taken
        #[arg(long, default_value = "0")]
        time_spent: u64,
    },

    /// List submitted attempts
    Attempts {
        #[arg(long)]
        user: String,

        #[arg(long)]
        quiz: String,
    },
}

#[derive(Subcommand, Debug)]
enum CertificateCommands {
    /// Issue a certificate for a completed course
    Issue {
        #[arg(long)]
        user: String,

        #[arg(long)]
        course: String,
    },

    /// List a learner's certificates
    List {
        #[arg(long)]
        user: String,
    },

    /// Record where a rendered certificate is stored
    AttachUrl {
        #[arg(long)]
        user: String,

        /// Certificate ID
        #[arg(long)]
        id: String,

        #[arg(long)]
        url: String,
    },
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    let json = cli.json;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if verbose { "debug" } else { "warn" }),
    )
    .init();

    let result = data_dir(cli.data_dir).and_then(|dir| run(&dir, cli.command, verbose, json));

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(dir: &Path, command: Commands, verbose: bool, json: bool) -> Result<()> {
    log::debug!("data directory: {}", dir.display());
    let mut store = open_store(dir)?;
    let store = &mut store;

    match command {
        Commands::User { subcommand } => match subcommand {
            UserCommands::Add { email, name, role } => cmd_user_add(store, &email, &name, &role),
            UserCommands::List { role } => cmd_user_list(store, role.as_deref()),
        },
        Commands::Course { subcommand } => match subcommand {
            CourseCommands::Import { educator, file } => {
                cmd_course_import(store, &educator, &file, verbose)
            }
            CourseCommands::List { search, published } => {
                cmd_course_list(store, search.as_deref(), published)
            }
            CourseCommands::Show { course } => cmd_course_show(store, &course),
        },
        Commands::Enroll { user, course } => cmd_enroll(store, &user, &course),
        Commands::Lesson { subcommand } => match subcommand {
            LessonCommands::Complete {
                user,
                course,
                module,
                lesson,
                time_spent,
            } => cmd_lesson_complete(store, &user, &course, &module, &lesson, time_spent),
        },
        Commands::Progress { user, course } => cmd_progress(store, &user, &course, verbose, json),
        Commands::Quiz { subcommand } => match subcommand {
            QuizCommands::Start { user, course, quiz } => {
                cmd_quiz_start(store, &user, &course, &quiz)
            }
            QuizCommands::Submit {
                user,
                course,
                quiz,
                answers,
                time_spent,
            } => cmd_quiz_submit(store, &user, &course, &quiz, &answers, time_spent, verbose),
            QuizCommands::Attempts { user, quiz } => cmd_quiz_attempts(store, &user, &quiz),
        },
        Commands::Certificate { subcommand } => match subcommand {
            CertificateCommands::Issue { user, course } => {
                cmd_certificate_issue(store, &user, &course)
            }
            CertificateCommands::List { user } => cmd_certificate_list(store, &user, json),
            CertificateCommands::AttachUrl { user, id, url } => {
                cmd_certificate_attach_url(store, &user, &id, &url)
            }
        },
        Commands::Dashboard { user } => cmd_dashboard(store, &user, json),
        Commands::Analytics { educator } => cmd_analytics(store, &educator, json),
        Commands::Metrics => cmd_metrics(store, json),
    }
}

// ── User commands ─────────────────────────────────────────────────────────────

/// `aplus user add --email EMAIL --name NAME [--role ROLE]`
fn cmd_user_add(store: &mut FileStore, email: &str, name: &str, role: &str) -> Result<()> {
    let role: Role = role.parse()?;
    user::register_user(store, User::new(email, name, role)).context("failed to register user")?;
    println!("Registered {} ({role})", email.trim());
    Ok(())
}

/// `aplus user list [--role ROLE]`
fn cmd_user_list(store: &FileStore, role: Option<&str>) -> Result<()> {
    let users = match role {
        Some(r) => user::users_with_role(store, r.parse()?),
        None => user::list_users(store),
    };

    if users.is_empty() {
        println!("No users registered");
        return Ok(());
    }

    println!("{:<32} {:<24} ROLE", "EMAIL", "NAME");
    println!("{}", "-".repeat(66));
    for u in &users {
        println!("{:<32} {:<24} {}", u.email, u.name, u.role);
    }
    Ok(())
}

// ── Course commands ───────────────────────────────────────────────────────────

/// `aplus course import --educator EMAIL FILE`
fn cmd_course_import(store: &mut FileStore, educator: &str, file: &Path, verbose: bool) -> Result<()> {
    let educator_user = require_user(store, educator)?;
    if educator_user.role != Role::Educator {
        return Err(anyhow!("user '{educator}' is not an educator"));
    }

    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let course: Course = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid course", file.display()))?;
    let (id, title, items) = (course.id.clone(), course.title.clone(), course.total_items());

    course::save_course(store, &educator_user.email, course).context("failed to save course")?;

    println!("Imported course '{title}'");
    println!("  ID:    {id}");
    println!("  Items: {items}");
    if verbose {
        println!("  Owner: {}", educator_user.email);
    }
    Ok(())
}

/// `aplus course list [--search QUERY] [--published]`
fn cmd_course_list(store: &FileStore, search: Option<&str>, published_only: bool) -> Result<()> {
    let catalog = course::load_catalog(store);
    let matches = course::search(&catalog, search.unwrap_or(""));
    let shown: Vec<&CatalogEntry> = matches
        .into_iter()
        .filter(|e| !published_only || e.course.published)
        .collect();

    if shown.is_empty() {
        println!("No courses found");
        return Ok(());
    }

    println!("{:<20} {:<32} {:<20} STATUS", "ID", "TITLE", "EDUCATOR");
    println!("{}", "-".repeat(82));
    for e in shown {
        println!(
            "{:<20} {:<32} {:<20} {}",
            e.course.id,
            e.course.title,
            e.educator_name.as_deref().unwrap_or("-"),
            if e.course.published { "published" } else { "draft" }
        );
    }
    Ok(())
}

/// `aplus course show COURSE_ID`
fn cmd_course_show(store: &FileStore, course_id: &str) -> Result<()> {
    let entry = require_course(store, course_id)?;
    let c = &entry.course;

    println!("Course: {}", c.title);
    println!("  ID:         {}", c.id);
    println!("  Instructor: {}", c.instructor);
    if !c.category.is_empty() {
        println!("  Category:   {}", c.category);
    }
    println!("  Status:     {}", if c.published { "published" } else { "draft" });

    for module in &c.modules {
        println!("  Module {}: {}", module.id, module.title);
        for lesson in &module.lessons {
            println!("    - {} {}", lesson.id, lesson.title);
        }
        for q in module.quizzes() {
            println!("    ? {} {} ({} questions)", q.id(), q.title(), q.questions().len());
        }
    }
    Ok(())
}

/// `aplus enroll --user EMAIL COURSE_ID`
fn cmd_enroll(store: &mut FileStore, email: &str, course_id: &str) -> Result<()> {
    require_user(store, email)?;
    let entry = require_course(store, course_id)?;

    if enrollment::enroll(store, email, &entry.course.id)? {
        println!("Enrolled {email} in '{}'", entry.course.title);
    } else {
        println!("{email} is already enrolled in '{}'", entry.course.title);
    }
    Ok(())
}

// ── Progress commands ─────────────────────────────────────────────────────────

/// `aplus lesson complete --user EMAIL --course C --module M --lesson L`
fn cmd_lesson_complete(
    store: &mut FileStore,
    email: &str,
    course_id: &str,
    module_id: &str,
    lesson_id: &str,
    time_spent: Option<u64>,
) -> Result<()> {
    let entry = require_course(store, course_id)?;
    let record = progress::mark_lesson_complete(
        store,
        email,
        &entry.course,
        &ModuleId::new(module_id),
        &LessonId::new(lesson_id),
        time_spent,
    )?;

    let summary = progress::course_progress(&*store, email, &entry.course);
    println!("Lesson {lesson_id} completed");
    if let Some(at) = &record.completed_at {
        println!("  Completed: {}", display_date(at));
    }
    println!("  Progress:  {}%", summary.completion_percentage);
    Ok(())
}

/// `aplus progress --user EMAIL --course C`
fn cmd_progress(
    store: &FileStore,
    email: &str,
    course_id: &str,
    verbose: bool,
    json: bool,
) -> Result<()> {
    let entry = require_course(store, course_id)?;
    let p = progress::course_progress(store, email, &entry.course);
    if json {
        return print_json(&p);
    }

    println!("Progress for {email} on '{}':", entry.course.title);
    println!("  Completion: {}%", p.completion_percentage);
    println!("  Lessons:    {}/{}", p.lessons_completed, p.total_lessons);
    println!("  Quizzes:    {}/{}", p.quizzes_completed, p.total_quizzes);
    if let Some(at) = &p.last_activity {
        println!("  Last activity: {}", display_date(at));
    }

    if verbose {
        let data = progress::load_progress(store, email, &entry.course.id);
        for (key, record) in data.iter() {
            let when = record.completed_at.as_deref().map(display_date);
            println!("    {key}: {}", when.as_deref().unwrap_or("-"));
        }
    }
    Ok(())
}

// ── Quiz commands ─────────────────────────────────────────────────────────────

/// `aplus quiz start --user EMAIL --course C --quiz Q`
fn cmd_quiz_start(store: &FileStore, email: &str, course_id: &str, quiz_id: &str) -> Result<()> {
    let entry = require_course(store, course_id)?;
    let q = entry
        .course
        .quiz(&QuizId::new(quiz_id))
        .ok_or_else(|| anyhow!("quiz '{quiz_id}' is not part of course '{course_id}'"))?;

    let prior = quiz::load_attempts(store, email, q.id());
    let state = quiz::start_attempt(q, &prior)?;

    println!("Quiz: {}", q.title());
    if let Some(seconds) = state.time_remaining() {
        println!("  Time limit: {} min", seconds / 60);
    }
    match quiz::attempts_remaining(q, &prior) {
        Some(left) => println!("  Attempts left: {left}"),
        None => println!("  Attempts left: unlimited"),
    }
    for (i, question) in q.questions().iter().enumerate() {
        println!("  {}. {}", i, question.text());
        for (j, option) in question.options().iter().enumerate() {
            println!("     [{j}] {option}");
        }
    }
    Ok(())
}

/// `aplus quiz submit --user EMAIL --course C --quiz Q --answers 0,1,2`
fn cmd_quiz_submit(
    store: &mut FileStore,
    email: &str,
    course_id: &str,
    quiz_id: &str,
    answers: &[usize],
    time_spent: u64,
    verbose: bool,
) -> Result<()> {
    let entry = require_course(store, course_id)?;
    let q = entry
        .course
        .quiz(&QuizId::new(quiz_id))
        .ok_or_else(|| anyhow!("quiz '{quiz_id}' is not part of course '{course_id}'"))?;

    let prior = quiz::load_attempts(&*store, email, q.id());
    let mut state = quiz::start_attempt(q, &prior)?;
    for (question, option) in answers.iter().enumerate() {
        state.answer(question, *option)?;
    }
    let attempt = quiz::submit(store, email, &entry.course.id, q, state, time_spent)?;

    println!("Quiz '{}' submitted", q.title());
    println!("  Score: {}%", attempt.score);
    if let Some(left) = quiz::attempts_remaining(q, &quiz::load_attempts(&*store, email, q.id())) {
        println!("  Attempts left: {left}");
    }

    if verbose {
        for r in quiz::review(q, &attempt.answers)? {
            let mark = if r.is_correct { "ok" } else { "wrong" };
            println!("    {}. {mark} (answer {})", r.index, r.correct_answer);
            if let Some(explanation) = &r.explanation {
                println!("       {explanation}");
            }
        }
    }
    Ok(())
}

/// `aplus quiz attempts --user EMAIL --quiz Q`
fn cmd_quiz_attempts(store: &FileStore, email: &str, quiz_id: &str) -> Result<()> {
    let attempts = quiz::load_attempts(store, email, &QuizId::new(quiz_id));
    if attempts.is_empty() {
        println!("No attempts for quiz '{quiz_id}'");
        return Ok(());
    }

    println!("{:<4} {:<8} {:<10} SUBMITTED", "#", "SCORE", "TIME");
    println!("{}", "-".repeat(48));
    for (i, a) in attempts.iter().enumerate() {
        println!(
            "{:<4} {:<8} {:<10} {}",
            i + 1,
            format!("{}%", a.score),
            format!("{}s", a.time_spent),
            display_date(&a.completed_at)
        );
    }
    if let Some(best) = quiz::best_score(&attempts) {
        println!("Best score: {best}%");
    }
    Ok(())
}

// ── Certificate commands ──────────────────────────────────────────────────────

/// `aplus certificate issue --user EMAIL --course C`
fn cmd_certificate_issue(store: &mut FileStore, email: &str, course_id: &str) -> Result<()> {
    let learner = require_user(store, email)?;
    let entry = require_course(store, course_id)?;

    let issuance = certificate::issue(store, &learner, &entry.course)?;
    let cert = issuance.certificate();
    if issuance.is_new() {
        println!("Certificate issued");
    } else {
        println!("Certificate already issued");
    }
    println!("  ID:      {}", cert.id);
    println!("  Course:  {}", cert.course_name);
    println!("  Learner: {}", cert.learner_name);
    println!("  Date:    {}", display_date(&cert.completion_date));
    Ok(())
}

/// `aplus certificate list --user EMAIL`
fn cmd_certificate_list(store: &FileStore, email: &str, json: bool) -> Result<()> {
    let certificates = certificate::list_certificates(store, email);
    if json {
        return print_json(&certificates);
    }
    if certificates.is_empty() {
        println!("No certificates for {email}");
        return Ok(());
    }

    println!("{:<32} {:<32} DATE", "ID", "COURSE");
    println!("{}", "-".repeat(78));
    for c in &certificates {
        println!(
            "{:<32} {:<32} {}",
            c.id,
            c.course_name,
            display_date(&c.completion_date)
        );
    }
    Ok(())
}

/// `aplus certificate attach-url --user EMAIL --id ID --url URL`
fn cmd_certificate_attach_url(store: &mut FileStore, email: &str, id: &str, url: &str) -> Result<()> {
    let cert = certificate::attach_certificate_url(store, email, &CertificateId::new(id), url)?;
    println!("Attached {url} to certificate {}", cert.id);
    Ok(())
}

// ── Dashboard commands ────────────────────────────────────────────────────────

/// `aplus dashboard --user EMAIL`
fn cmd_dashboard(store: &FileStore, email: &str, json: bool) -> Result<()> {
    let dash = dashboard::learner_dashboard(store, email);
    if json {
        return print_json(&dash);
    }

    println!("Dashboard for {email}:");
    println!("  Enrolled:     {}", dash.courses.len());
    println!("  Completed:    {}", dash.completed_courses);
    println!("  Certificates: {}", dash.certificates.len());
    println!("  Average:      {}%", dash.average_progress);
    for c in &dash.courses {
        println!(
            "    {:<32} {:>3}%",
            c.entry.course.title, c.progress.completion_percentage
        );
    }
    Ok(())
}

/// `aplus analytics --educator EMAIL`
fn cmd_analytics(store: &FileStore, educator: &str, json: bool) -> Result<()> {
    let analytics = dashboard::course_analytics(store, educator);
    if json {
        return print_json(&analytics);
    }
    if analytics.is_empty() {
        println!("No courses for {educator}");
        return Ok(());
    }

    println!(
        "{:<28} {:>8} {:>6} {:>11} {:>10} {:>9}",
        "COURSE", "ENROLLED", "CERTS", "COMPLETION", "AVG SCORE", "PROGRESS"
    );
    println!("{}", "-".repeat(77));
    for a in &analytics {
        println!(
            "{:<28} {:>8} {:>6} {:>10}% {:>9}% {:>8}%",
            a.title,
            a.enrollments,
            a.certificates,
            a.completion_rate,
            a.average_quiz_score,
            a.average_progress
        );
    }
    Ok(())
}

/// `aplus metrics`
fn cmd_metrics(store: &FileStore, json: bool) -> Result<()> {
    let m = dashboard::platform_metrics(store);
    if json {
        return print_json(&m);
    }
    println!("Platform metrics:");
    println!(
        "  Users:        {} ({} learners, {} educators, {} admins)",
        m.total_users, m.learners, m.educators, m.admins
    );
    println!(
        "  Courses:      {} ({} published)",
        m.total_courses, m.published_courses
    );
    println!("  Enrollments:  {}", m.total_enrollments);
    println!("  Certificates: {}", m.total_certificates);
    println!("  Certified:    {}%", m.certification_rate);
    Ok(())
}
