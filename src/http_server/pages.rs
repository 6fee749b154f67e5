//! Server-side HTML rendering. Every dynamic value goes through `escape`.

use crate::http_server::forms::{ArtistFormData, ShowFormData, VenueFormData};
use crate::services::artist::{ArtistPage, ArtistSummary};
use crate::services::search::SearchResults;
use crate::services::show::ShowsPage;
use crate::services::venue::{CityGroup, VenuePage, VenueSummary};

const GENRE_CHOICES: &[&str] = &[
    "Alternative",
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Heavy Metal",
    "Instrumental",
    "Jazz",
    "Musical Theatre",
    "Pop",
    "Punk",
    "R&B",
    "Reggae",
    "Rock n Roll",
    "Soul",
    "Other",
];

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn layout(title: &str, notice: Option<&str>, body: &str) -> String {
    let notice_html = match notice {
        Some(message) => format!("<div class=\"notice\">{}</div>\n", escape(message)),
        None => String::new(),
    };
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{} | Showbill</title>\n</head>\n<body>\n\
         <nav><a href=\"/\">Showbill</a> | <a href=\"/venues\">Venues</a> | \
         <a href=\"/artists\">Artists</a> | <a href=\"/shows\">Shows</a></nav>\n\
         {}<main>\n{}\n</main>\n</body>\n</html>\n",
        escape(title),
        notice_html,
        body
    )
}

pub fn home_body(artists: &[ArtistSummary], venues: &[VenueSummary]) -> String {
    let mut body = String::from("<h1>Showbill</h1>\n<h2>Newest artists</h2>\n<ul>\n");
    for artist in artists {
        body.push_str(&format!(
            "<li><a href=\"/artists/{}\">{}</a></li>\n",
            artist.id,
            escape(&artist.name)
        ));
    }
    body.push_str("</ul>\n<h2>Newest venues</h2>\n<ul>\n");
    for venue in venues {
        body.push_str(&format!(
            "<li><a href=\"/venues/{}\">{}</a></li>\n",
            venue.id,
            escape(&venue.name)
        ));
    }
    body.push_str("</ul>\n");
    body
}

pub fn venues_index_body(groups: &[CityGroup]) -> String {
    let mut body = String::from(
        "<h1>Venues</h1>\n<p><a href=\"/venues/create\">List a new venue</a></p>\n\
         <form method=\"post\" action=\"/venues/search\">\
         <input name=\"search_term\" placeholder=\"Find a venue\">\
         <button type=\"submit\">Search</button></form>\n",
    );
    for group in groups {
        body.push_str(&format!(
            "<h2>{}, {}</h2>\n<ul>\n",
            escape(&group.city),
            escape(&group.state)
        ));
        for venue in &group.venues {
            body.push_str(&format!(
                "<li><a href=\"/venues/{}\">{}</a></li>\n",
                venue.id,
                escape(&venue.name)
            ));
        }
        body.push_str("</ul>\n");
    }
    body
}

pub fn venue_detail_body(page: &VenuePage) -> String {
    let venue = &page.venue;
    let mut body = format!("<h1>{}</h1>\n", escape(&venue.name));

    if !page.genres.is_empty() {
        let genres: Vec<String> = page.genres.iter().map(|g| escape(g)).collect();
        body.push_str(&format!("<p>Genres: {}</p>\n", genres.join(", ")));
    }
    if let Some(address) = &venue.address {
        body.push_str(&format!("<p>{}</p>\n", escape(address)));
    }
    body.push_str(&format!(
        "<p>{}, {}</p>\n",
        escape(&venue.city),
        escape(&venue.state)
    ));
    if let Some(phone) = &venue.phone {
        body.push_str(&format!("<p>Phone: {}</p>\n", escape(phone)));
    }
    if let Some(website) = &venue.website {
        body.push_str(&format!(
            "<p><a href=\"{0}\">{0}</a></p>\n",
            escape(website)
        ));
    }
    if let Some(facebook_link) = &venue.facebook_link {
        body.push_str(&format!(
            "<p><a href=\"{0}\">{0}</a></p>\n",
            escape(facebook_link)
        ));
    }
    if venue.seeking_talent {
        body.push_str("<p><strong>Seeking talent</strong></p>\n");
        if let Some(description) = &venue.seeking_description {
            body.push_str(&format!("<p>{}</p>\n", escape(description)));
        }
    }
    if let Some(image_link) = &venue.image_link {
        body.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\">\n",
            escape(image_link),
            escape(&venue.name)
        ));
    }

    body.push_str(&format!(
        "<h2>{} upcoming shows</h2>\n<ul>\n",
        page.upcoming_shows_count
    ));
    for show in &page.upcoming_shows {
        body.push_str(&format!(
            "<li><a href=\"/artists/{}\">{}</a> — {}</li>\n",
            show.artist_id,
            escape(&show.artist_name),
            escape(&show.start_time)
        ));
    }
    body.push_str(&format!(
        "</ul>\n<h2>{} past shows</h2>\n<ul>\n",
        page.past_shows_count
    ));
    for show in &page.past_shows {
        body.push_str(&format!(
            "<li><a href=\"/artists/{}\">{}</a> — {}</li>\n",
            show.artist_id,
            escape(&show.artist_name),
            escape(&show.start_time)
        ));
    }
    body.push_str("</ul>\n");
    body.push_str(&format!(
        "<p><a href=\"/venues/{}/edit\">Edit venue</a></p>\n",
        venue.id
    ));
    body
}

pub fn artists_index_body(artists: &[ArtistSummary]) -> String {
    let mut body = String::from(
        "<h1>Artists</h1>\n<p><a href=\"/artists/create\">List a new artist</a></p>\n\
         <form method=\"post\" action=\"/artists/search\">\
         <input name=\"search_term\" placeholder=\"Find an artist\">\
         <button type=\"submit\">Search</button></form>\n<ul>\n",
    );
    for artist in artists {
        body.push_str(&format!(
            "<li><a href=\"/artists/{}\">{}</a></li>\n",
            artist.id,
            escape(&artist.name)
        ));
    }
    body.push_str("</ul>\n");
    body
}

pub fn artist_detail_body(page: &ArtistPage) -> String {
    let artist = &page.artist;
    let mut body = format!("<h1>{}</h1>\n", escape(&artist.name));

    if !page.genres.is_empty() {
        let genres: Vec<String> = page.genres.iter().map(|g| escape(g)).collect();
        body.push_str(&format!("<p>Genres: {}</p>\n", genres.join(", ")));
    }
    body.push_str(&format!(
        "<p>{}, {}</p>\n",
        escape(&artist.city),
        escape(&artist.state)
    ));
    if let Some(phone) = &artist.phone {
        body.push_str(&format!("<p>Phone: {}</p>\n", escape(phone)));
    }
    if let Some(website) = &artist.website {
        body.push_str(&format!(
            "<p><a href=\"{0}\">{0}</a></p>\n",
            escape(website)
        ));
    }
    if let Some(facebook_link) = &artist.facebook_link {
        body.push_str(&format!(
            "<p><a href=\"{0}\">{0}</a></p>\n",
            escape(facebook_link)
        ));
    }
    if artist.seeking_venue {
        body.push_str("<p><strong>Seeking a venue</strong></p>\n");
        if let Some(description) = &artist.seeking_description {
            body.push_str(&format!("<p>{}</p>\n", escape(description)));
        }
    }
    if let Some(image_link) = &artist.image_link {
        body.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\">\n",
            escape(image_link),
            escape(&artist.name)
        ));
    }

    body.push_str(&format!(
        "<h2>{} upcoming shows</h2>\n<ul>\n",
        page.upcoming_shows_count
    ));
    for show in &page.upcoming_shows {
        body.push_str(&format!(
            "<li><a href=\"/venues/{}\">{}</a> — {}</li>\n",
            show.venue_id,
            escape(&show.venue_name),
            escape(&show.start_time)
        ));
    }
    body.push_str(&format!(
        "</ul>\n<h2>{} past shows</h2>\n<ul>\n",
        page.past_shows_count
    ));
    for show in &page.past_shows {
        body.push_str(&format!(
            "<li><a href=\"/venues/{}\">{}</a> — {}</li>\n",
            show.venue_id,
            escape(&show.venue_name),
            escape(&show.start_time)
        ));
    }
    body.push_str("</ul>\n");
    body.push_str(&format!(
        "<p><a href=\"/artists/{}/edit\">Edit artist</a></p>\n",
        artist.id
    ));
    body
}

/// Both passes of a search, name matches first. `base` is "venues" or
/// "artists" and decides where result links point.
pub fn search_results_body(base: &str, term: &str, results: &SearchResults) -> String {
    let mut body = format!("<h1>Results for \"{}\"</h1>\n", escape(term));

    body.push_str(&format!(
        "<h2>{} name matches</h2>\n<ul>\n",
        results.name_matches.count
    ));
    for hit in &results.name_matches.data {
        body.push_str(&format!(
            "<li><a href=\"/{}/{}\">{}</a></li>\n",
            base,
            hit.id,
            escape(&hit.name)
        ));
    }
    body.push_str(&format!(
        "</ul>\n<h2>{} city/state matches</h2>\n<ul>\n",
        results.location_matches.count
    ));
    for hit in &results.location_matches.data {
        body.push_str(&format!(
            "<li><a href=\"/{}/{}\">{}</a> ({}, {})</li>\n",
            base,
            hit.id,
            escape(&hit.name),
            escape(&hit.city),
            escape(&hit.state)
        ));
    }
    body.push_str("</ul>\n");
    body
}

pub fn shows_index_body(page: &ShowsPage) -> String {
    let mut body = String::from(
        "<h1>Shows</h1>\n<p><a href=\"/shows/create\">List a new show</a></p>\n",
    );
    body.push_str("<h2>Upcoming shows</h2>\n<ul>\n");
    for show in &page.upcoming_shows {
        body.push_str(&format!(
            "<li><a href=\"/artists/{}\">{}</a> at <a href=\"/venues/{}\">{}</a> — {}</li>\n",
            show.artist_id,
            escape(&show.artist_name),
            show.venue_id,
            escape(&show.venue_name),
            escape(&show.start_time)
        ));
    }
    body.push_str("</ul>\n<h2>Past shows</h2>\n<ul>\n");
    for show in &page.past_shows {
        body.push_str(&format!(
            "<li><a href=\"/artists/{}\">{}</a> at <a href=\"/venues/{}\">{}</a> — {}</li>\n",
            show.artist_id,
            escape(&show.artist_name),
            show.venue_id,
            escape(&show.venue_name),
            escape(&show.start_time)
        ));
    }
    body.push_str("</ul>\n");
    body
}

fn errors_html(errors: &[String]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let mut html = String::from("<ul class=\"errors\">\n");
    for error in errors {
        html.push_str(&format!("<li>{}</li>\n", escape(error)));
    }
    html.push_str("</ul>\n");
    html
}

fn text_field(label: &str, name: &str, value: &str) -> String {
    format!(
        "<label>{}<br><input name=\"{}\" value=\"{}\"></label><br>\n",
        escape(label),
        name,
        escape(value)
    )
}

fn genres_field(selected: &[String]) -> String {
    let mut html = String::from("<label>Genres<br><select name=\"genres\" multiple>\n");
    for choice in GENRE_CHOICES {
        let marker = if selected.iter().any(|g| g == choice) {
            " selected"
        } else {
            ""
        };
        html.push_str(&format!(
            "<option value=\"{0}\"{1}>{0}</option>\n",
            escape(choice),
            marker
        ));
    }
    html.push_str("</select></label><br>\n");
    html
}

fn seeking_field(label: &str, name: &str, value: &str) -> String {
    let yes = if value == "YES" { " selected" } else { "" };
    let no = if value == "YES" { "" } else { " selected" };
    format!(
        "<label>{}<br><select name=\"{}\">\
         <option value=\"YES\"{}>YES</option>\
         <option value=\"NO\"{}>NO</option>\
         </select></label><br>\n",
        escape(label),
        name,
        yes,
        no
    )
}

pub fn venue_form_body(
    heading: &str,
    action: &str,
    form: &VenueFormData,
    errors: &[String],
) -> String {
    format!(
        "<h1>{}</h1>\n{}<form method=\"post\" action=\"{}\">\n\
         {}{}{}{}{}{}{}{}{}{}{}\
         <button type=\"submit\">Submit</button>\n</form>\n",
        escape(heading),
        errors_html(errors),
        action,
        text_field("Name", "name", &form.name),
        text_field("City", "city", &form.city),
        text_field("State", "state", &form.state),
        text_field("Address", "address", &form.address),
        text_field("Phone", "phone", &form.phone),
        text_field("Image link", "image_link", &form.image_link),
        text_field("Facebook link", "facebook_link", &form.facebook_link),
        text_field("Website", "website", &form.website),
        genres_field(&form.genres),
        seeking_field("Seeking talent", "seeking_talent", &form.seeking_talent),
        text_field(
            "Seeking description",
            "seeking_description",
            &form.seeking_description
        ),
    )
}

pub fn artist_form_body(
    heading: &str,
    action: &str,
    form: &ArtistFormData,
    errors: &[String],
) -> String {
    format!(
        "<h1>{}</h1>\n{}<form method=\"post\" action=\"{}\">\n\
         {}{}{}{}{}{}{}{}{}{}\
         <button type=\"submit\">Submit</button>\n</form>\n",
        escape(heading),
        errors_html(errors),
        action,
        text_field("Name", "name", &form.name),
        text_field("City", "city", &form.city),
        text_field("State", "state", &form.state),
        text_field("Phone", "phone", &form.phone),
        text_field("Image link", "image_link", &form.image_link),
        text_field("Facebook link", "facebook_link", &form.facebook_link),
        text_field("Website", "website", &form.website),
        genres_field(&form.genres),
        seeking_field("Seeking a venue", "seeking_venue", &form.seeking_venue),
        text_field(
            "Seeking description",
            "seeking_description",
            &form.seeking_description
        ),
    )
}

pub fn show_form_body(form: &ShowFormData, errors: &[String]) -> String {
    format!(
        "<h1>List a new show</h1>\n{}<form method=\"post\" action=\"/shows/create\">\n\
         {}{}{}\
         <button type=\"submit\">Submit</button>\n</form>\n",
        errors_html(errors),
        text_field("Artist ID", "artist_id", &form.artist_id),
        text_field("Venue ID", "venue_id", &form.venue_id),
        text_field("Start time", "start_time", &form.start_time),
    )
}

pub fn not_found_page() -> String {
    layout(
        "Not found",
        None,
        "<h1>404</h1>\n<p>The page you are looking for does not exist.</p>",
    )
}

pub fn server_error_page() -> String {
    layout(
        "Server error",
        None,
        "<h1>500</h1>\n<p>Something went wrong. Please try again later.</p>",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_html_metacharacters() {
        assert_eq!(
            escape("Park Square Live Music & Coffee <b>"),
            "Park Square Live Music &amp; Coffee &lt;b&gt;"
        );
    }

    #[test]
    fn layout_renders_notice_when_present() {
        let html = layout("Home", Some("Venue was successfully listed!"), "<p>hi</p>");
        assert!(html.contains("Venue was successfully listed!"));
        assert!(layout("Home", None, "").matches("notice").count() == 0);
    }
}
