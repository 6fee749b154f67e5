use serde::Deserialize;

use crate::entities;
use crate::services::artist::ArtistInput;
use crate::services::show::NewShow;
use crate::services::venue::VenueInput;

/// The seeking_* form fields post the literal "YES" for true; anything else,
/// including an absent field, is false.
fn seeking_flag(value: &str) -> bool {
    value == "YES"
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search_term: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct VenueFormData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub image_link: String,
    #[serde(default)]
    pub facebook_link: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub seeking_talent: String,
    #[serde(default)]
    pub seeking_description: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

impl VenueFormData {
    pub fn from_model(venue: &entities::venue::Model, genres: &[String]) -> Self {
        VenueFormData {
            name: venue.name.clone(),
            city: venue.city.clone(),
            state: venue.state.clone(),
            address: venue.address.clone().unwrap_or_default(),
            phone: venue.phone.clone().unwrap_or_default(),
            image_link: venue.image_link.clone().unwrap_or_default(),
            facebook_link: venue.facebook_link.clone().unwrap_or_default(),
            website: venue.website.clone().unwrap_or_default(),
            seeking_talent: if venue.seeking_talent { "YES" } else { "NO" }.to_string(),
            seeking_description: venue.seeking_description.clone().unwrap_or_default(),
            genres: genres.to_vec(),
        }
    }

    pub fn validate(&self) -> Result<VenueInput, Vec<String>> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push("Name is required".to_string());
        }
        if self.city.trim().is_empty() {
            errors.push("City is required".to_string());
        }
        if self.state.trim().is_empty() {
            errors.push("State is required".to_string());
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(VenueInput {
            name: self.name.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            address: optional(&self.address),
            phone: optional(&self.phone),
            image_link: optional(&self.image_link),
            facebook_link: optional(&self.facebook_link),
            website: optional(&self.website),
            seeking_talent: seeking_flag(&self.seeking_talent),
            seeking_description: optional(&self.seeking_description),
            genres: self.genres.clone(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ArtistFormData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub image_link: String,
    #[serde(default)]
    pub facebook_link: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub seeking_venue: String,
    #[serde(default)]
    pub seeking_description: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

impl ArtistFormData {
    pub fn from_model(artist: &entities::artist::Model, genres: &[String]) -> Self {
        ArtistFormData {
            name: artist.name.clone(),
            city: artist.city.clone(),
            state: artist.state.clone(),
            phone: artist.phone.clone().unwrap_or_default(),
            image_link: artist.image_link.clone().unwrap_or_default(),
            facebook_link: artist.facebook_link.clone().unwrap_or_default(),
            website: artist.website.clone().unwrap_or_default(),
            seeking_venue: if artist.seeking_venue { "YES" } else { "NO" }.to_string(),
            seeking_description: artist.seeking_description.clone().unwrap_or_default(),
            genres: genres.to_vec(),
        }
    }

    pub fn validate(&self) -> Result<ArtistInput, Vec<String>> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push("Name is required".to_string());
        }
        if self.city.trim().is_empty() {
            errors.push("City is required".to_string());
        }
        if self.state.trim().is_empty() {
            errors.push("State is required".to_string());
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ArtistInput {
            name: self.name.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            phone: optional(&self.phone),
            image_link: optional(&self.image_link),
            facebook_link: optional(&self.facebook_link),
            website: optional(&self.website),
            seeking_venue: seeking_flag(&self.seeking_venue),
            seeking_description: optional(&self.seeking_description),
            genres: self.genres.clone(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ShowFormData {
    #[serde(default)]
    pub artist_id: String,
    #[serde(default)]
    pub venue_id: String,
    #[serde(default)]
    pub start_time: String,
}

impl ShowFormData {
    pub fn validate(&self) -> Result<NewShow, Vec<String>> {
        let mut errors = Vec::new();

        let artist_id = self.artist_id.trim().parse::<i64>();
        if artist_id.is_err() {
            errors.push("Artist ID must be a number".to_string());
        }
        let venue_id = self.venue_id.trim().parse::<i64>();
        if venue_id.is_err() {
            errors.push("Venue ID must be a number".to_string());
        }
        if self.start_time.trim().is_empty() {
            errors.push("Start time is required".to_string());
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewShow {
            artist_id: artist_id.unwrap(),
            venue_id: venue_id.unwrap(),
            start_time: self.start_time.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeking_flag_only_accepts_literal_yes() {
        assert!(seeking_flag("YES"));
        assert!(!seeking_flag("yes"));
        assert!(!seeking_flag("true"));
        assert!(!seeking_flag(""));
    }

    #[test]
    fn venue_form_requires_name_city_state() {
        let form = VenueFormData {
            name: "The Musical Hop".to_string(),
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 2);

        let form = VenueFormData {
            name: "The Musical Hop".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            seeking_talent: "YES".to_string(),
            seeking_description: "Looking for local acts".to_string(),
            ..Default::default()
        };
        let input = form.validate().unwrap();
        assert!(input.seeking_talent);
        assert_eq!(input.seeking_description.as_deref(), Some("Looking for local acts"));
        assert_eq!(input.phone, None);
    }

    #[test]
    fn show_form_rejects_non_numeric_ids() {
        let form = ShowFormData {
            artist_id: "one".to_string(),
            venue_id: "2".to_string(),
            start_time: "2024-12-01 20:00:00".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors, vec!["Artist ID must be a number"]);

        let form = ShowFormData {
            artist_id: "1".to_string(),
            venue_id: "2".to_string(),
            start_time: "2024-12-01 20:00:00".to_string(),
        };
        let show = form.validate().unwrap();
        assert_eq!(show.artist_id, 1);
        assert_eq!(show.venue_id, 2);
    }
}
