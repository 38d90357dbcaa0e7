//! Certificate engine: eligibility, issuance and lookup.

use rand::Rng;

use crate::course::{Course, CourseId};
use crate::error::{LmsError, Result};
use crate::progress::course_progress;
use crate::store::{self, keys, CompletionStore, StoredList};
use crate::user::User;

use super::types::*;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;

/// Generate a fresh id: `cert_<unix millis>_<9 base-36 chars>`.
pub fn generate_certificate_id() -> CertificateId {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    CertificateId(format!("cert_{}_{suffix}", crate::time::now_millis()))
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// All certificates held by a learner, in issuance order.
pub fn list_certificates<S: CompletionStore + ?Sized>(
    store: &S,
    learner_email: &str,
) -> Vec<Certificate> {
    store::load_or_default::<StoredList<Certificate>, _>(store, &keys::certificates(learner_email))
        .into_decoded()
}

/// The learner's certificate for `course_id`, if any.
pub fn find_certificate<S: CompletionStore + ?Sized>(
    store: &S,
    learner_email: &str,
    course_id: &CourseId,
) -> Option<Certificate> {
    list_certificates(store, learner_email)
        .into_iter()
        .find(|c| &c.course_id == course_id)
}

// ---------------------------------------------------------------------------
// Issuance
// ---------------------------------------------------------------------------

/// Issue a certificate for `course` to `learner`.
///
/// At most one certificate exists per learner and course: if one is
/// already stored it is returned as [`Issuance::AlreadyIssued`] and nothing
/// is written, whatever the current completion. Otherwise 100% completion
/// is required.
pub fn issue<S: CompletionStore + ?Sized>(
    store: &mut S,
    learner: &User,
    course: &Course,
) -> Result<Issuance> {
    let key = keys::certificates(&learner.email);
    let mut certificates: StoredList<Certificate> = store::load_for_update(&*store, &key)?;
    if let Some(existing) = certificates.iter().find(|c| c.course_id == course.id) {
        return Ok(Issuance::AlreadyIssued(existing.clone()));
    }

    let progress = course_progress(&*store, &learner.email, course);
    if !progress.is_complete() {
        return Err(LmsError::NotEligible {
            course_id: course.id.to_string(),
            completion: progress.completion_percentage,
        });
    }

    let certificate = Certificate {
        id: generate_certificate_id(),
        course_id: course.id.clone(),
        course_name: course.title.clone(),
        learner_name: learner.name.clone(),
        instructor_name: course.instructor.clone(),
        completion_date: crate::time::now_iso8601(),
        certificate_url: None,
    };
    certificates.push(certificate.clone());
    store::save(store, &key, &certificates)?;

    log::debug!(
        "issued certificate {} to {} for {}",
        certificate.id,
        learner.email,
        course.id
    );
    Ok(Issuance::Issued(certificate))
}

/// Record the location of a rendered certificate.
pub fn attach_certificate_url<S: CompletionStore + ?Sized>(
    store: &mut S,
    learner_email: &str,
    certificate_id: &CertificateId,
    url: impl Into<String>,
) -> Result<Certificate> {
    let key = keys::certificates(learner_email);
    let mut certificates: StoredList<Certificate> = store::load_for_update(&*store, &key)?;
    let certificate = certificates
        .find_mut(|c| &c.id == certificate_id)
        .ok_or_else(|| {
            LmsError::NotFound(format!("certificate {certificate_id} for {learner_email}"))
        })?;
    certificate.certificate_url = Some(url.into());
    let updated = certificate.clone();
    store::save(store, &key, &certificates)?;
    Ok(updated)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
