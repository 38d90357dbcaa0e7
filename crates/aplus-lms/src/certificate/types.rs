//! Certificate records.

use serde::{Deserialize, Serialize};

use crate::course::CourseId;

/// Unique identifier for a certificate (`cert_<millis>_<suffix>`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CertificateId(pub String);

impl CertificateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CertificateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Proof that a learner completed every lesson and quiz of a course.
///
/// Names are copied at issuance time, so later renames of the course or
/// the learner don't alter an issued certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: CertificateId,
    pub course_id: CourseId,
    pub course_name: String,
    pub learner_name: String,
    pub instructor_name: String,
    /// ISO-8601 issuance time.
    pub completion_date: String,
    /// Reference to the rendered artifact, once one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_url: Option<String>,
}

/// Result of [`super::issue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issuance {
    /// A new certificate was created and stored.
    Issued(Certificate),
    /// The learner already held a certificate for the course.
    AlreadyIssued(Certificate),
}

impl Issuance {
    pub fn certificate(&self) -> &Certificate {
        match self {
            Issuance::Issued(c) | Issuance::AlreadyIssued(c) => c,
        }
    }

    pub fn into_certificate(self) -> Certificate {
        match self {
            Issuance::Issued(c) | Issuance::AlreadyIssued(c) => c,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Issuance::Issued(_))
    }
}
