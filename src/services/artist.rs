use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};

use crate::database::Database;
use crate::entities;
use crate::services::{ServiceError, genre, schedule, search};

/// Editable artist fields as submitted by the create/edit forms.
#[derive(Debug)]
pub struct ArtistInput {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub genres: Vec<String>,
}

pub struct ArtistSummary {
    pub id: i64,
    pub name: String,
}

/// A show on the artist detail page, enriched with the venue side.
pub struct ArtistShowEntry {
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: String,
}

pub struct ArtistPage {
    pub artist: entities::artist::Model,
    pub genres: Vec<String>,
    pub past_shows: Vec<ArtistShowEntry>,
    pub upcoming_shows: Vec<ArtistShowEntry>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

pub struct ArtistService {
    db: Arc<Database>,
}

impl ArtistService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<ArtistSummary>, ServiceError> {
        let artists = entities::artist::Entity::find()
            .order_by_asc(entities::artist::Column::Id)
            .all(&self.db.conn)
            .await?;

        Ok(artists
            .into_iter()
            .map(|a| ArtistSummary {
                id: a.id,
                name: a.name,
            })
            .collect())
    }

    /// The most recently listed artists, newest first.
    pub async fn recent(&self, limit: u64) -> Result<Vec<ArtistSummary>, ServiceError> {
        let artists = entities::artist::Entity::find()
            .order_by_desc(entities::artist::Column::Id)
            .limit(limit)
            .all(&self.db.conn)
            .await?;

        Ok(artists
            .into_iter()
            .map(|a| ArtistSummary {
                id: a.id,
                name: a.name,
            })
            .collect())
    }

    /// Everything the artist detail page needs: the row, its genre names,
    /// and its shows split into past/upcoming against `now`.
    pub async fn get_page(
        &self,
        artist_id: i64,
        now: DateTime<Utc>,
    ) -> Result<ArtistPage, ServiceError> {
        let artist = entities::artist::Entity::find_by_id(artist_id)
            .one(&self.db.conn)
            .await?
            .ok_or(ServiceError::ArtistNotFound(artist_id))?;

        let genres = artist
            .find_related(entities::genre::Entity)
            .all(&self.db.conn)
            .await?
            .into_iter()
            .map(|g| g.name)
            .collect();

        let shows = entities::show::Entity::find()
            .filter(entities::show::Column::ArtistId.eq(artist_id))
            .order_by_asc(entities::show::Column::Id)
            .all(&self.db.conn)
            .await?;

        let (past, upcoming) = schedule::partition_by_start_time(shows, now, |s| &s.start_time);
        let past_shows = self.resolve_venues(past).await?;
        let upcoming_shows = self.resolve_venues(upcoming).await?;

        Ok(ArtistPage {
            artist,
            genres,
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        })
    }

    async fn resolve_venues(
        &self,
        shows: Vec<entities::show::Model>,
    ) -> Result<Vec<ArtistShowEntry>, ServiceError> {
        let mut entries = Vec::with_capacity(shows.len());
        for show in shows {
            let venue = entities::venue::Entity::find_by_id(show.venue_id)
                .one(&self.db.conn)
                .await?;
            let Some(venue) = venue else {
                log::warn!(
                    "Show {} references missing venue {}, skipping",
                    show.id,
                    show.venue_id
                );
                continue;
            };
            entries.push(ArtistShowEntry {
                venue_id: venue.id,
                venue_name: venue.name,
                venue_image_link: venue.image_link,
                start_time: show.start_time,
            });
        }
        Ok(entries)
    }

    /// Search all artists by name and by "city, state".
    pub async fn search(&self, term: &str) -> Result<search::SearchResults, ServiceError> {
        let artists = entities::artist::Entity::find().all(&self.db.conn).await?;
        let records: Vec<search::SearchRecord> = artists
            .into_iter()
            .map(|a| search::SearchRecord {
                id: a.id,
                name: a.name,
                city: a.city,
                state: a.state,
            })
            .collect();
        search::match_records(term, &records)
    }

    /// Insert an artist together with its genre associations in one
    /// transaction. Any failure rolls the whole thing back.
    pub async fn create(&self, input: ArtistInput) -> Result<i64, ServiceError> {
        let id = self
            .db
            .conn
            .transaction::<_, i64, ServiceError>(|txn| {
                Box::pin(async move {
                    let new_artist = entities::artist::ActiveModel {
                        id: ActiveValue::NotSet,
                        name: ActiveValue::Set(input.name),
                        city: ActiveValue::Set(input.city),
                        state: ActiveValue::Set(input.state),
                        phone: ActiveValue::Set(input.phone),
                        image_link: ActiveValue::Set(input.image_link),
                        facebook_link: ActiveValue::Set(input.facebook_link),
                        website: ActiveValue::Set(input.website),
                        seeking_venue: ActiveValue::Set(input.seeking_venue),
                        seeking_description: ActiveValue::Set(input.seeking_description),
                    };
                    let artist = new_artist.insert(txn).await?;

                    let genre_ids = genre::resolve_genre_ids(txn, &input.genres).await?;
                    for genre_id in genre_ids {
                        let link = entities::artist_genre::ActiveModel {
                            artist_id: ActiveValue::Set(artist.id),
                            genre_id: ActiveValue::Set(genre_id),
                        };
                        entities::artist_genre::Entity::insert(link).exec(txn).await?;
                    }

                    Ok(artist.id)
                })
            })
            .await?;

        log::info!("Artist created (ID: {})", id);
        Ok(id)
    }

    /// Overwrite every editable field and rebuild the genre associations
    /// from the submitted list, in one transaction.
    pub async fn update(&self, artist_id: i64, input: ArtistInput) -> Result<(), ServiceError> {
        let artist = entities::artist::Entity::find_by_id(artist_id)
            .one(&self.db.conn)
            .await?
            .ok_or(ServiceError::ArtistNotFound(artist_id))?;

        self.db
            .conn
            .transaction::<_, (), ServiceError>(|txn| {
                Box::pin(async move {
                    let mut active: entities::artist::ActiveModel = artist.into();
                    active.name = ActiveValue::Set(input.name);
                    active.city = ActiveValue::Set(input.city);
                    active.state = ActiveValue::Set(input.state);
                    active.phone = ActiveValue::Set(input.phone);
                    active.image_link = ActiveValue::Set(input.image_link);
                    active.facebook_link = ActiveValue::Set(input.facebook_link);
                    active.website = ActiveValue::Set(input.website);
                    active.seeking_venue = ActiveValue::Set(input.seeking_venue);
                    active.seeking_description = ActiveValue::Set(input.seeking_description);
                    let updated = active.update(txn).await?;

                    entities::artist_genre::Entity::delete_many()
                        .filter(entities::artist_genre::Column::ArtistId.eq(updated.id))
                        .exec(txn)
                        .await?;

                    let genre_ids = genre::resolve_genre_ids(txn, &input.genres).await?;
                    for genre_id in genre_ids {
                        let link = entities::artist_genre::ActiveModel {
                            artist_id: ActiveValue::Set(updated.id),
                            genre_id: ActiveValue::Set(genre_id),
                        };
                        entities::artist_genre::Entity::insert(link).exec(txn).await?;
                    }

                    Ok(())
                })
            })
            .await?;

        log::info!("Artist updated (ID: {})", artist_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_db;
    use sea_orm::PaginatorTrait;

    fn input(name: &str, city: &str, state: &str, genres: &[&str]) -> ArtistInput {
        ArtistInput {
            name: name.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            phone: None,
            image_link: None,
            facebook_link: None,
            website: None,
            seeking_venue: false,
            seeking_description: None,
            genres: genres.iter().map(|g| g.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn recent_lists_newest_first_capped_at_limit() {
        let db = test_db().await;
        let service = ArtistService::new(db);

        for i in 1..=12 {
            service
                .create(input(&format!("Band {i}"), "Austin", "TX", &[]))
                .await
                .unwrap();
        }

        let recent = service.recent(10).await.unwrap();
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].name, "Band 12");
        assert_eq!(recent[9].name, "Band 3");
    }

    #[tokio::test]
    async fn search_matches_name_and_location_independently() {
        let db = test_db().await;
        let service = ArtistService::new(db);

        service.create(input("Guns N Petals", "San Francisco", "CA", &[])).await.unwrap();
        service.create(input("The Wild Sax Band", "Seattle", "WA", &[])).await.unwrap();

        let results = service.search("band").await.unwrap();
        assert_eq!(results.name_matches.count, 1);
        assert_eq!(results.name_matches.data[0].name, "The Wild Sax Band");

        let results = service.search("seattle").await.unwrap();
        assert_eq!(results.location_matches.count, 1);
        assert_eq!(results.location_matches.data[0].city, "Seattle");

        let err = service.search("  ").await.unwrap_err();
        assert!(matches!(err, ServiceError::EmptySearchTerm));
    }

    #[tokio::test]
    async fn update_missing_artist_reports_not_found() {
        let db = test_db().await;
        let service = ArtistService::new(db.clone());

        let err = service
            .update(42, input("Nobody", "Nowhere", "NA", &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::ArtistNotFound(42)));

        let count = entities::artist::Entity::find().count(&db.conn).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn update_overwrites_scalars_and_rebuilds_genres() {
        let db = test_db().await;
        let service = ArtistService::new(db.clone());

        let id = service
            .create(input("Guns N Petals", "San Francisco", "CA", &["Rock n Roll"]))
            .await
            .unwrap();

        let mut updated = input("Guns N Petals", "Los Angeles", "CA", &["Rock n Roll", "Blues"]);
        updated.seeking_venue = true;
        updated.seeking_description = Some("Looking for gigs".to_string());
        service.update(id, updated).await.unwrap();

        let now = schedule::parse_start_time("2024-06-01 12:00:00").unwrap();
        let page = service.get_page(id, now).await.unwrap();
        assert_eq!(page.artist.city, "Los Angeles");
        assert!(page.artist.seeking_venue);
        let mut genres = page.genres;
        genres.sort();
        assert_eq!(genres, vec!["Blues", "Rock n Roll"]);

        // Reused "Rock n Roll" kept a single row
        let genre_count = entities::genre::Entity::find().count(&db.conn).await.unwrap();
        assert_eq!(genre_count, 2);
    }
}
