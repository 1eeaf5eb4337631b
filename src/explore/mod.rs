pub mod client;
pub mod dto;
pub mod filter;
pub mod handlers;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::feed_routes()
}
