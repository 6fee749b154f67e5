use std::sync::Arc;

use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};
use axum_extra::extract::Form;
use chrono::Utc;

use crate::http_server::error::Report;
use crate::http_server::forms::ShowFormData;
use crate::http_server::pages;
use crate::http_server::routes::home;
use crate::http_server::state::AppState;
use crate::services::ServiceError;
use crate::services::show::ShowService;

pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, Report> {
    let page = ShowService::new(state.db.clone()).list(Utc::now()).await?;
    Ok(Html(pages::layout(
        "Shows",
        None,
        &pages::shows_index_body(&page),
    )))
}

pub async fn create_form() -> Html<String> {
    Html(pages::layout(
        "List a new show",
        None,
        &pages::show_form_body(&ShowFormData::default(), &[]),
    ))
}

pub async fn create_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ShowFormData>,
) -> Result<Response, Report> {
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            return Ok(Html(pages::layout(
                "List a new show",
                None,
                &pages::show_form_body(&form, &errors),
            ))
            .into_response());
        }
    };

    match ShowService::new(state.db.clone()).create(input).await {
        Ok(_) => Ok(home::render(&state, Some("Show was successfully listed!"))
            .await?
            .into_response()),
        // The rejection names the id that failed to resolve
        Err(err @ (ServiceError::NoSuchArtist(_) | ServiceError::NoSuchVenue(_))) => {
            Ok(Html(pages::layout(
                "List a new show",
                Some(&err.to_string()),
                &pages::show_form_body(&form, &[]),
            ))
            .into_response())
        }
        Err(e) => {
            log::error!("Show create failed: {e}");
            Ok(home::render(&state, Some("An error occurred. Show could not be listed."))
                .await?
                .into_response())
        }
    }
}
