mod dto;
mod error;
mod extract;
pub mod handlers;
mod prompt;
mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
