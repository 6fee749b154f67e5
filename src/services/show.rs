use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, EntityTrait, QueryOrder};

use crate::database::Database;
use crate::entities;
use crate::services::{ServiceError, schedule};

/// One row of the global shows listing, enriched with both sides.
pub struct ShowEntry {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

pub struct ShowsPage {
    pub past_shows: Vec<ShowEntry>,
    pub upcoming_shows: Vec<ShowEntry>,
}

#[derive(Debug)]
pub struct NewShow {
    pub artist_id: i64,
    pub venue_id: i64,
    pub start_time: String,
}

pub struct ShowService {
    db: Arc<Database>,
}

impl ShowService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// All shows split into past/upcoming against `now`, with the same
    /// strict greater-than rule the detail pages use.
    pub async fn list(&self, now: DateTime<Utc>) -> Result<ShowsPage, ServiceError> {
        let shows = entities::show::Entity::find()
            .order_by_asc(entities::show::Column::Id)
            .all(&self.db.conn)
            .await?;

        let (past, upcoming) = schedule::partition_by_start_time(shows, now, |s| &s.start_time);

        Ok(ShowsPage {
            past_shows: self.resolve(past).await?,
            upcoming_shows: self.resolve(upcoming).await?,
        })
    }

    async fn resolve(
        &self,
        shows: Vec<entities::show::Model>,
    ) -> Result<Vec<ShowEntry>, ServiceError> {
        let mut entries = Vec::with_capacity(shows.len());
        for show in shows {
            let artist = entities::artist::Entity::find_by_id(show.artist_id)
                .one(&self.db.conn)
                .await?;
            let venue = entities::venue::Entity::find_by_id(show.venue_id)
                .one(&self.db.conn)
                .await?;
            let (Some(artist), Some(venue)) = (artist, venue) else {
                log::warn!("Show {} references a missing artist or venue, skipping", show.id);
                continue;
            };
            entries.push(ShowEntry {
                venue_id: venue.id,
                venue_name: venue.name,
                artist_id: artist.id,
                artist_name: artist.name,
                artist_image_link: artist.image_link,
                start_time: show.start_time,
            });
        }
        Ok(entries)
    }

    /// Insert a show after confirming both referenced rows exist. The check
    /// runs before any write, and the rejection names the id that failed.
    pub async fn create(&self, input: NewShow) -> Result<i64, ServiceError> {
        entities::artist::Entity::find_by_id(input.artist_id)
            .one(&self.db.conn)
            .await?
            .ok_or(ServiceError::NoSuchArtist(input.artist_id))?;

        entities::venue::Entity::find_by_id(input.venue_id)
            .one(&self.db.conn)
            .await?
            .ok_or(ServiceError::NoSuchVenue(input.venue_id))?;

        let show = entities::show::ActiveModel {
            id: ActiveValue::NotSet,
            artist_id: ActiveValue::Set(input.artist_id),
            venue_id: ActiveValue::Set(input.venue_id),
            start_time: ActiveValue::Set(input.start_time),
        }
        .insert(&self.db.conn)
        .await?;

        log::info!("Show created (ID: {})", show.id);
        Ok(show.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::artist::{ArtistInput, ArtistService};
    use crate::services::venue::{VenueInput, VenueService};
    use crate::test_utils::test_db;
    use sea_orm::PaginatorTrait;

    async fn seed(db: &Arc<crate::database::Database>) -> (i64, i64) {
        let artist_id = ArtistService::new(db.clone())
            .create(ArtistInput {
                name: "Guns N Petals".to_string(),
                city: "San Francisco".to_string(),
                state: "CA".to_string(),
                phone: None,
                image_link: Some("https://example.com/gnp.jpg".to_string()),
                facebook_link: None,
                website: None,
                seeking_venue: false,
                seeking_description: None,
                genres: vec![],
            })
            .await
            .unwrap();
        let venue_id = VenueService::new(db.clone())
            .create(VenueInput {
                name: "The Musical Hop".to_string(),
                city: "San Francisco".to_string(),
                state: "CA".to_string(),
                address: None,
                phone: None,
                image_link: None,
                facebook_link: None,
                website: None,
                seeking_talent: false,
                seeking_description: None,
                genres: vec![],
            })
            .await
            .unwrap();
        (artist_id, venue_id)
    }

    #[tokio::test]
    async fn listing_partitions_with_strict_greater_than() {
        let db = test_db().await;
        let service = ShowService::new(db.clone());
        let (artist_id, venue_id) = seed(&db).await;

        for start_time in [
            "2024-01-01 20:00:00",
            "2024-06-01 12:00:00",
            "2024-12-01 20:00:00",
        ] {
            service
                .create(NewShow {
                    artist_id,
                    venue_id,
                    start_time: start_time.to_string(),
                })
                .await
                .unwrap();
        }

        let now = schedule::parse_start_time("2024-06-01 12:00:00").unwrap();
        let page = service.list(now).await.unwrap();

        // The show at the current instant is past, not upcoming
        assert_eq!(page.past_shows.len(), 2);
        assert_eq!(page.upcoming_shows.len(), 1);
        assert_eq!(page.upcoming_shows[0].venue_name, "The Musical Hop");
        assert_eq!(page.upcoming_shows[0].artist_name, "Guns N Petals");
    }

    #[tokio::test]
    async fn create_rejects_missing_artist_before_writing() {
        let db = test_db().await;
        let service = ShowService::new(db.clone());
        let (_, venue_id) = seed(&db).await;

        let err = service
            .create(NewShow {
                artist_id: 777,
                venue_id,
                start_time: "2024-12-01 20:00:00".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NoSuchArtist(777)));

        let count = entities::show::Entity::find().count(&db.conn).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn create_rejects_missing_venue_before_writing() {
        let db = test_db().await;
        let service = ShowService::new(db.clone());
        let (artist_id, _) = seed(&db).await;

        let err = service
            .create(NewShow {
                artist_id,
                venue_id: 888,
                start_time: "2024-12-01 20:00:00".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NoSuchVenue(888)));

        let count = entities::show::Entity::find().count(&db.conn).await.unwrap();
        assert_eq!(count, 0);
    }
}
