use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::Form;
use chrono::Utc;

use crate::http_server::error::Report;
use crate::http_server::forms::{ArtistFormData, SearchForm};
use crate::http_server::pages;
use crate::http_server::routes::home;
use crate::http_server::state::AppState;
use crate::services::ServiceError;
use crate::services::artist::ArtistService;

pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, Report> {
    let artists = ArtistService::new(state.db.clone()).list().await?;
    Ok(Html(pages::layout(
        "Artists",
        None,
        &pages::artists_index_body(&artists),
    )))
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> Result<Response, Report> {
    let service = ArtistService::new(state.db.clone());
    match service.search(&form.search_term).await {
        Ok(results) => Ok(Html(pages::layout(
            "Artist search",
            None,
            &pages::search_results_body("artists", &form.search_term, &results),
        ))
        .into_response()),
        Err(err @ ServiceError::EmptySearchTerm) => {
            let artists = service.list().await?;
            Ok(Html(pages::layout(
                "Artists",
                Some(&err.to_string()),
                &pages::artists_index_body(&artists),
            ))
            .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn detail(
    State(state): State<Arc<AppState>>,
    Path(artist_id): Path<i64>,
) -> Result<Response, Report> {
    match ArtistService::new(state.db.clone())
        .get_page(artist_id, Utc::now())
        .await
    {
        Ok(page) => Ok(Html(pages::layout(
            &page.artist.name,
            None,
            &pages::artist_detail_body(&page),
        ))
        .into_response()),
        Err(ServiceError::ArtistNotFound(_)) => {
            Ok(home::render(&state, Some("Artist does not exist"))
                .await?
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn create_form() -> Html<String> {
    Html(pages::layout(
        "List a new artist",
        None,
        &pages::artist_form_body(
            "List a new artist",
            "/artists/create",
            &ArtistFormData::default(),
            &[],
        ),
    ))
}

pub async fn create_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ArtistFormData>,
) -> Result<Response, Report> {
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            return Ok(Html(pages::layout(
                "List a new artist",
                None,
                &pages::artist_form_body("List a new artist", "/artists/create", &form, &errors),
            ))
            .into_response());
        }
    };

    let name = input.name.clone();
    match ArtistService::new(state.db.clone()).create(input).await {
        Ok(_) => {
            let notice = format!("Artist {} was successfully listed!", name);
            Ok(home::render(&state, Some(&notice)).await?.into_response())
        }
        Err(e) => {
            log::error!("Artist create failed: {e}");
            let notice = format!("An error occurred. Artist {} could not be listed.", name);
            Ok(home::render(&state, Some(&notice)).await?.into_response())
        }
    }
}

pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Path(artist_id): Path<i64>,
) -> Result<Response, Report> {
    match ArtistService::new(state.db.clone())
        .get_page(artist_id, Utc::now())
        .await
    {
        Ok(page) => {
            let form = ArtistFormData::from_model(&page.artist, &page.genres);
            let action = format!("/artists/{}/edit", artist_id);
            Ok(Html(pages::layout(
                "Edit artist",
                None,
                &pages::artist_form_body("Edit artist", &action, &form, &[]),
            ))
            .into_response())
        }
        Err(ServiceError::ArtistNotFound(_)) => {
            Ok(home::render(&state, Some("Artist does not exist"))
                .await?
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn edit_submit(
    State(state): State<Arc<AppState>>,
    Path(artist_id): Path<i64>,
    Form(form): Form<ArtistFormData>,
) -> Result<Response, Report> {
    let action = format!("/artists/{}/edit", artist_id);
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            return Ok(Html(pages::layout(
                "Edit artist",
                None,
                &pages::artist_form_body("Edit artist", &action, &form, &errors),
            ))
            .into_response());
        }
    };

    let name = input.name.clone();
    match ArtistService::new(state.db.clone())
        .update(artist_id, input)
        .await
    {
        Ok(()) => Ok(Redirect::to(&format!("/artists/{}", artist_id)).into_response()),
        Err(ServiceError::ArtistNotFound(_)) => {
            Ok(home::render(&state, Some("Artist does not exist"))
                .await?
                .into_response())
        }
        Err(e) => {
            log::error!("Artist update failed: {e}");
            let notice = format!("An error occurred. Artist {} could not be updated.", name);
            Ok(home::render(&state, Some(&notice)).await?.into_response())
        }
    }
}
