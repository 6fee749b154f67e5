use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::Form;
use chrono::Utc;

use crate::http_server::error::Report;
use crate::http_server::forms::{SearchForm, VenueFormData};
use crate::http_server::pages;
use crate::http_server::routes::home;
use crate::http_server::state::AppState;
use crate::services::ServiceError;
use crate::services::venue::VenueService;

pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, Report> {
    let groups = VenueService::new(state.db.clone()).list_by_area().await?;
    Ok(Html(pages::layout(
        "Venues",
        None,
        &pages::venues_index_body(&groups),
    )))
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> Result<Response, Report> {
    let service = VenueService::new(state.db.clone());
    match service.search(&form.search_term).await {
        Ok(results) => Ok(Html(pages::layout(
            "Venue search",
            None,
            &pages::search_results_body("venues", &form.search_term, &results),
        ))
        .into_response()),
        Err(err @ ServiceError::EmptySearchTerm) => {
            let groups = service.list_by_area().await?;
            Ok(Html(pages::layout(
                "Venues",
                Some(&err.to_string()),
                &pages::venues_index_body(&groups),
            ))
            .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn detail(
    State(state): State<Arc<AppState>>,
    Path(venue_id): Path<i64>,
) -> Result<Response, Report> {
    match VenueService::new(state.db.clone())
        .get_page(venue_id, Utc::now())
        .await
    {
        Ok(page) => Ok(Html(pages::layout(
            &page.venue.name,
            None,
            &pages::venue_detail_body(&page),
        ))
        .into_response()),
        Err(ServiceError::VenueNotFound(_)) => Ok(home::render(&state, Some("Venue does not exist"))
            .await?
            .into_response()),
        Err(e) => Err(e.into()),
    }
}

pub async fn create_form() -> Html<String> {
    Html(pages::layout(
        "List a new venue",
        None,
        &pages::venue_form_body(
            "List a new venue",
            "/venues/create",
            &VenueFormData::default(),
            &[],
        ),
    ))
}

pub async fn create_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<VenueFormData>,
) -> Result<Response, Report> {
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            return Ok(Html(pages::layout(
                "List a new venue",
                None,
                &pages::venue_form_body("List a new venue", "/venues/create", &form, &errors),
            ))
            .into_response());
        }
    };

    let name = input.name.clone();
    match VenueService::new(state.db.clone()).create(input).await {
        Ok(_) => {
            let notice = format!("Venue {} was successfully listed!", name);
            Ok(home::render(&state, Some(&notice)).await?.into_response())
        }
        Err(e) => {
            log::error!("Venue create failed: {e}");
            let notice = format!("An error occurred. Venue {} could not be listed.", name);
            Ok(home::render(&state, Some(&notice)).await?.into_response())
        }
    }
}

pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Path(venue_id): Path<i64>,
) -> Result<Response, Report> {
    match VenueService::new(state.db.clone())
        .get_page(venue_id, Utc::now())
        .await
    {
        Ok(page) => {
            let form = VenueFormData::from_model(&page.venue, &page.genres);
            let action = format!("/venues/{}/edit", venue_id);
            Ok(Html(pages::layout(
                "Edit venue",
                None,
                &pages::venue_form_body("Edit venue", &action, &form, &[]),
            ))
            .into_response())
        }
        Err(ServiceError::VenueNotFound(_)) => Ok(home::render(&state, Some("Venue does not exist"))
            .await?
            .into_response()),
        Err(e) => Err(e.into()),
    }
}

pub async fn edit_submit(
    State(state): State<Arc<AppState>>,
    Path(venue_id): Path<i64>,
    Form(form): Form<VenueFormData>,
) -> Result<Response, Report> {
    let action = format!("/venues/{}/edit", venue_id);
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            return Ok(Html(pages::layout(
                "Edit venue",
                None,
                &pages::venue_form_body("Edit venue", &action, &form, &errors),
            ))
            .into_response());
        }
    };

    let name = input.name.clone();
    match VenueService::new(state.db.clone()).update(venue_id, input).await {
        Ok(()) => Ok(Redirect::to(&format!("/venues/{}", venue_id)).into_response()),
        Err(ServiceError::VenueNotFound(_)) => Ok(home::render(&state, Some("Venue does not exist"))
            .await?
            .into_response()),
        Err(e) => {
            log::error!("Venue update failed: {e}");
            let notice = format!("An error occurred. Venue {} could not be updated.", name);
            Ok(home::render(&state, Some(&notice)).await?.into_response())
        }
    }
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(venue_id): Path<i64>,
) -> Result<Response, Report> {
    match VenueService::new(state.db.clone()).delete(venue_id).await {
        Ok(()) => {
            let home = home::render(&state, Some("Venue was successfully deleted!")).await?;
            Ok((StatusCode::OK, home).into_response())
        }
        Err(ServiceError::VenueNotFound(_)) => {
            let home = home::render(&state, Some("Venue does not exist")).await?;
            Ok((StatusCode::NOT_FOUND, home).into_response())
        }
        Err(e) => Err(e.into()),
    }
}
