use crate::state::AppState;
use axum::Router;

mod claims;
pub mod cookies;
pub mod dto;
pub(crate) mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;
pub mod web;

pub fn api_router() -> Router<AppState> {
    handlers::api_routes()
}

pub fn web_router() -> Router<AppState> {
    web::web_routes()
}
