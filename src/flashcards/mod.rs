mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;
pub mod web;

use crate::state::AppState;
use axum::Router;

pub fn api_router() -> Router<AppState> {
    handlers::api_routes()
}

pub fn web_router() -> Router<AppState> {
    web::web_routes()
}
