use axum::routing::{delete, get, post, put};

use crate::{routes::View, state::AppState};

mod dto;
pub mod handlers;
pub mod password;
pub mod repo;
pub mod repo_types;

pub const USER_ROUTE_GROUP: &str = "/user";

/// The user route table. Every route answers other verbs with 405.
pub fn views() -> Vec<View<AppState>> {
    use self::handlers::*;

    let path = |suffix: &str| format!("{USER_ROUTE_GROUP}/{suffix}");
    vec![
        View::new(path("create"), post(create_user).fallback(method_not_allowed)),
        View::new(path("read/:id"), get(read_user).fallback(method_not_allowed)),
        View::new(path("read-email"), get(read_user_by_email).fallback(method_not_allowed)),
        View::new(path("list"), get(list_users).fallback(method_not_allowed)),
        View::new(path("update-email/:id"), put(update_email).fallback(method_not_allowed)),
        View::new(path("update-password/:id"), put(update_password).fallback(method_not_allowed)),
        View::new(path("update-active/:id"), put(update_active).fallback(method_not_allowed)),
        View::new(path("update-staff/:id"), put(update_staff).fallback(method_not_allowed)),
        View::new(path("update-admin/:id"), put(update_admin).fallback(method_not_allowed)),
        View::new(path("delete/:id"), delete(delete_user).fallback(method_not_allowed)),
    ]
}
