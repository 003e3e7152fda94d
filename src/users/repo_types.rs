use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String, // argon2 PHC string, never exposed in JSON
    pub active: bool,
    pub staff: bool,
    pub admin: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated: OffsetDateTime,
}

/// Row to insert; `password_hash` must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub active: bool,
    pub staff: bool,
    pub admin: bool,
    pub created: OffsetDateTime,
}

impl NewUser {
    pub fn new(email: String, password_hash: String) -> Self {
        Self {
            email,
            password_hash,
            active: false,
            staff: false,
            admin: false,
            created: OffsetDateTime::now_utc(),
        }
    }
}

/// A single-column change. Each variant maps to one fixed statement, so the
/// column name never comes from input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Email(String),
    Password(String),
    Active(bool),
    Staff(bool),
    Admin(bool),
}

impl FieldUpdate {
    pub fn column(&self) -> &'static str {
        match self {
            FieldUpdate::Email(_) => "email",
            FieldUpdate::Password(_) => "password",
            FieldUpdate::Active(_) => "active",
            FieldUpdate::Staff(_) => "staff",
            FieldUpdate::Admin(_) => "admin",
        }
    }

    pub(crate) fn statement(&self) -> &'static str {
        match self {
            FieldUpdate::Email(_) => {
                "UPDATE users SET email = ?, updated = ? WHERE id = ? \
                 RETURNING id, email, password, active, staff, admin, created, updated"
            }
            FieldUpdate::Password(_) => {
                "UPDATE users SET password = ?, updated = ? WHERE id = ? \
                 RETURNING id, email, password, active, staff, admin, created, updated"
            }
            FieldUpdate::Active(_) => {
                "UPDATE users SET active = ?, updated = ? WHERE id = ? \
                 RETURNING id, email, password, active, staff, admin, created, updated"
            }
            FieldUpdate::Staff(_) => {
                "UPDATE users SET staff = ?, updated = ? WHERE id = ? \
                 RETURNING id, email, password, active, staff, admin, created, updated"
            }
            FieldUpdate::Admin(_) => {
                "UPDATE users SET admin = ?, updated = ? WHERE id = ? \
                 RETURNING id, email, password, active, staff, admin, created, updated"
            }
        }
    }
}
