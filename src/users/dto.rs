use serde::Serialize;

use super::repo_types::User;

/// `{"user": {...}}`
#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub user: User,
}

/// `{"users": [...]}`
#[derive(Debug, Serialize)]
pub struct UsersEnvelope {
    pub users: Vec<User>,
}
