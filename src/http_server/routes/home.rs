use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;

use crate::http_server::error::Report;
use crate::http_server::pages;
use crate::http_server::state::AppState;
use crate::services::artist::ArtistService;
use crate::services::venue::VenueService;

const HOME_FEED_LIMIT: u64 = 10;

/// The home feed, shared by every handler that falls back to it with a
/// notice.
pub async fn render(state: &Arc<AppState>, notice: Option<&str>) -> Result<Html<String>, Report> {
    let artists = ArtistService::new(state.db.clone())
        .recent(HOME_FEED_LIMIT)
        .await?;
    let venues = VenueService::new(state.db.clone())
        .recent(HOME_FEED_LIMIT)
        .await?;
    Ok(Html(pages::layout(
        "Home",
        notice,
        &pages::home_body(&artists, &venues),
    )))
}

pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, Report> {
    render(&state, None).await
}
