//! Certificates: issued once a learner completes a whole course.

pub mod engine;
pub mod types;

pub use types::{Certificate, CertificateId, Issuance};

pub use engine::{
    attach_certificate_url, find_certificate, generate_certificate_id, issue, list_certificates,
};
