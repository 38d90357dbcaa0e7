//! User registry: learners, educators and admins stored under `users`.

use serde::{Deserialize, Serialize};

use crate::error::{LmsError, Result};
use crate::store::{self, keys, CompletionStore, StoredList};

/// Role of a user on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Learner,
    Educator,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Learner => "learner",
            Role::Educator => "educator",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = LmsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "learner" => Ok(Role::Learner),
            "educator" => Ok(Role::Educator),
            "admin" => Ok(Role::Admin),
            other => Err(LmsError::InvalidUser(format!(
                "unknown role '{other}' (expected learner, educator or admin)"
            ))),
        }
    }
}

/// A registered user.
///
/// Fields the core does not interpret are kept in `extra` so that
/// rewriting the registry never drops them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl User {
    pub fn new(email: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            role,
            extra: serde_json::Map::new(),
        }
    }

    fn matches_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }
}

/// All registered users.
pub fn list_users<S: CompletionStore + ?Sized>(store: &S) -> Vec<User> {
    store::load_or_default::<StoredList<User>, _>(store, keys::USERS).into_decoded()
}

/// Users holding `role`.
pub fn users_with_role<S: CompletionStore + ?Sized>(store: &S, role: Role) -> Vec<User> {
    list_users(store)
        .into_iter()
        .filter(|u| u.role == role)
        .collect()
}

/// Look a user up by email (case-insensitive).
pub fn find_user<S: CompletionStore + ?Sized>(store: &S, email: &str) -> Option<User> {
    list_users(store).into_iter().find(|u| u.matches_email(email))
}

/// Insert a user, or replace the one with the same email.
pub fn register_user<S: CompletionStore + ?Sized>(store: &mut S, mut user: User) -> Result<()> {
    user.email = user.email.trim().to_string();
    user.name = user.name.trim().to_string();
    if !user.email.contains('@') {
        return Err(LmsError::InvalidUser(format!(
            "'{}' is not an email address",
            user.email
        )));
    }
    if user.name.is_empty() {
        return Err(LmsError::InvalidUser(format!(
            "user {} has an empty name",
            user.email
        )));
    }

    let mut users: StoredList<User> = store::load_for_update(&*store, keys::USERS)?;
    match users.find_mut(|u| u.matches_email(&user.email)) {
        Some(existing) => *existing = user,
        None => users.push(user),
    }
    store::save(store, keys::USERS, &users)
}

/// Change a user's role.
pub fn set_role<S: CompletionStore + ?Sized>(store: &mut S, email: &str, role: Role) -> Result<User> {
    let mut users: StoredList<User> = store::load_for_update(&*store, keys::USERS)?;
    let user = users
        .find_mut(|u| u.matches_email(email))
        .ok_or_else(|| LmsError::NotFound(format!("user {email}")))?;
    user.role = role;
    let updated = user.clone();
    store::save(store, keys::USERS, &users)?;
    Ok(updated)
}
