pub mod artists;
pub mod home;
pub mod shows;
pub mod venues;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};

use crate::http_server::pages;

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Html(pages::not_found_page()))
}
