use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};

use crate::database::Database;
use crate::entities;
use crate::services::{ServiceError, genre, schedule, search};

/// Editable venue fields as submitted by the create/edit forms.
#[derive(Debug)]
pub struct VenueInput {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    pub genres: Vec<String>,
}

pub struct VenueSummary {
    pub id: i64,
    pub name: String,
}

/// One (city, state) group on the venues index.
pub struct CityGroup {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

/// A show on the venue detail page, enriched with the artist side.
pub struct VenueShowEntry {
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

pub struct VenuePage {
    pub venue: entities::venue::Model,
    pub genres: Vec<String>,
    pub past_shows: Vec<VenueShowEntry>,
    pub upcoming_shows: Vec<VenueShowEntry>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

pub struct VenueService {
    db: Arc<Database>,
}

impl VenueService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Venues grouped by (city, state). Groups appear in first-seen order,
    /// members in ascending-id order; every venue lands in exactly one group.
    pub async fn list_by_area(&self) -> Result<Vec<CityGroup>, ServiceError> {
        let venues = entities::venue::Entity::find()
            .order_by_asc(entities::venue::Column::Id)
            .all(&self.db.conn)
            .await?;

        let mut groups: Vec<CityGroup> = Vec::new();
        for venue in venues {
            let summary = VenueSummary {
                id: venue.id,
                name: venue.name,
            };
            match groups
                .iter_mut()
                .find(|g| g.city == venue.city && g.state == venue.state)
            {
                Some(group) => group.venues.push(summary),
                None => groups.push(CityGroup {
                    city: venue.city,
                    state: venue.state,
                    venues: vec![summary],
                }),
            }
        }

        Ok(groups)
    }

    /// The most recently listed venues, newest first.
    pub async fn recent(&self, limit: u64) -> Result<Vec<VenueSummary>, ServiceError> {
        let venues = entities::venue::Entity::find()
            .order_by_desc(entities::venue::Column::Id)
            .limit(limit)
            .all(&self.db.conn)
            .await?;

        Ok(venues
            .into_iter()
            .map(|v| VenueSummary {
                id: v.id,
                name: v.name,
            })
            .collect())
    }

    /// Everything the venue detail page needs: the row, its genre names, and
    /// its shows split into past/upcoming against `now`.
    pub async fn get_page(&self, venue_id: i64, now: DateTime<Utc>) -> Result<VenuePage, ServiceError> {
        let venue = entities::venue::Entity::find_by_id(venue_id)
            .one(&self.db.conn)
            .await?
            .ok_or(ServiceError::VenueNotFound(venue_id))?;

        let genres = venue
            .find_related(entities::genre::Entity)
            .all(&self.db.conn)
            .await?
            .into_iter()
            .map(|g| g.name)
            .collect();

        let shows = entities::show::Entity::find()
            .filter(entities::show::Column::VenueId.eq(venue_id))
            .order_by_asc(entities::show::Column::Id)
            .all(&self.db.conn)
            .await?;

        let (past, upcoming) = schedule::partition_by_start_time(shows, now, |s| &s.start_time);
        let past_shows = self.resolve_artists(past).await?;
        let upcoming_shows = self.resolve_artists(upcoming).await?;

        Ok(VenuePage {
            venue,
            genres,
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        })
    }

    async fn resolve_artists(
        &self,
        shows: Vec<entities::show::Model>,
    ) -> Result<Vec<VenueShowEntry>, ServiceError> {
        let mut entries = Vec::with_capacity(shows.len());
        for show in shows {
            let artist = entities::artist::Entity::find_by_id(show.artist_id)
                .one(&self.db.conn)
                .await?;
            // A show whose artist row has gone missing is skipped rather
            // than failing the whole page
            let Some(artist) = artist else {
                log::warn!(
                    "Show {} references missing artist {}, skipping",
                    show.id,
                    show.artist_id
                );
                continue;
            };
            entries.push(VenueShowEntry {
                artist_id: artist.id,
                artist_name: artist.name,
                artist_image_link: artist.image_link,
                start_time: show.start_time,
            });
        }
        Ok(entries)
    }

    /// Search all venues by name and by "city, state".
    pub async fn search(&self, term: &str) -> Result<search::SearchResults, ServiceError> {
        let venues = entities::venue::Entity::find().all(&self.db.conn).await?;
        let records: Vec<search::SearchRecord> = venues
            .into_iter()
            .map(|v| search::SearchRecord {
                id: v.id,
                name: v.name,
                city: v.city,
                state: v.state,
            })
            .collect();
        search::match_records(term, &records)
    }

    /// Insert a venue together with its genre associations in one
    /// transaction. Any failure rolls the whole thing back.
    pub async fn create(&self, input: VenueInput) -> Result<i64, ServiceError> {
        let id = self
            .db
            .conn
            .transaction::<_, i64, ServiceError>(|txn| {
                Box::pin(async move {
                    let new_venue = entities::venue::ActiveModel {
                        id: ActiveValue::NotSet,
                        name: ActiveValue::Set(input.name),
                        city: ActiveValue::Set(input.city),
                        state: ActiveValue::Set(input.state),
                        address: ActiveValue::Set(input.address),
                        phone: ActiveValue::Set(input.phone),
                        image_link: ActiveValue::Set(input.image_link),
                        facebook_link: ActiveValue::Set(input.facebook_link),
                        website: ActiveValue::Set(input.website),
                        seeking_talent: ActiveValue::Set(input.seeking_talent),
                        seeking_description: ActiveValue::Set(input.seeking_description),
                    };
                    let venue = new_venue.insert(txn).await?;

                    let genre_ids = genre::resolve_genre_ids(txn, &input.genres).await?;
                    for genre_id in genre_ids {
                        let link = entities::venue_genre::ActiveModel {
                            venue_id: ActiveValue::Set(venue.id),
                            genre_id: ActiveValue::Set(genre_id),
                        };
                        entities::venue_genre::Entity::insert(link).exec(txn).await?;
                    }

                    Ok(venue.id)
                })
            })
            .await?;

        log::info!("Venue created (ID: {})", id);
        Ok(id)
    }

    /// Overwrite every editable field and rebuild the genre associations
    /// from the submitted list, in one transaction.
    pub async fn update(&self, venue_id: i64, input: VenueInput) -> Result<(), ServiceError> {
        let venue = entities::venue::Entity::find_by_id(venue_id)
            .one(&self.db.conn)
            .await?
            .ok_or(ServiceError::VenueNotFound(venue_id))?;

        self.db
            .conn
            .transaction::<_, (), ServiceError>(|txn| {
                Box::pin(async move {
                    let mut active: entities::venue::ActiveModel = venue.into();
                    active.name = ActiveValue::Set(input.name);
                    active.city = ActiveValue::Set(input.city);
                    active.state = ActiveValue::Set(input.state);
                    active.address = ActiveValue::Set(input.address);
                    active.phone = ActiveValue::Set(input.phone);
                    active.image_link = ActiveValue::Set(input.image_link);
                    active.facebook_link = ActiveValue::Set(input.facebook_link);
                    active.website = ActiveValue::Set(input.website);
                    active.seeking_talent = ActiveValue::Set(input.seeking_talent);
                    active.seeking_description = ActiveValue::Set(input.seeking_description);
                    let updated = active.update(txn).await?;

                    entities::venue_genre::Entity::delete_many()
                        .filter(entities::venue_genre::Column::VenueId.eq(updated.id))
                        .exec(txn)
                        .await?;

                    let genre_ids = genre::resolve_genre_ids(txn, &input.genres).await?;
                    for genre_id in genre_ids {
                        let link = entities::venue_genre::ActiveModel {
                            venue_id: ActiveValue::Set(updated.id),
                            genre_id: ActiveValue::Set(genre_id),
                        };
                        entities::venue_genre::Entity::insert(link).exec(txn).await?;
                    }

                    Ok(())
                })
            })
            .await?;

        log::info!("Venue updated (ID: {})", venue_id);
        Ok(())
    }

    /// Delete a venue. Dependent shows and genre links go with it via the
    /// store's cascading foreign keys.
    pub async fn delete(&self, venue_id: i64) -> Result<(), ServiceError> {
        let venue = entities::venue::Entity::find_by_id(venue_id)
            .one(&self.db.conn)
            .await?
            .ok_or(ServiceError::VenueNotFound(venue_id))?;

        venue.delete(&self.db.conn).await?;
        log::info!("Venue deleted (ID: {})", venue_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_db;
    use sea_orm::{ConnectionTrait, PaginatorTrait};

    fn input(name: &str, city: &str, state: &str, genres: &[&str]) -> VenueInput {
        VenueInput {
            name: name.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            address: None,
            phone: None,
            image_link: None,
            facebook_link: None,
            website: None,
            seeking_talent: false,
            seeking_description: None,
            genres: genres.iter().map(|g| g.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn groups_venues_by_city_and_state() {
        let db = test_db().await;
        let service = VenueService::new(db);

        service.create(input("The Musical Hop", "San Francisco", "CA", &[])).await.unwrap();
        service.create(input("The Dueling Pianos Bar", "New York", "NY", &[])).await.unwrap();
        service
            .create(input("Park Square Live Music & Coffee", "San Francisco", "CA", &[]))
            .await
            .unwrap();

        let groups = service.list_by_area().await.unwrap();

        assert_eq!(groups.len(), 2);
        // First-seen order of distinct (city, state) pairs
        assert_eq!(groups[0].city, "San Francisco");
        assert_eq!(groups[1].city, "New York");
        // No venue omitted or duplicated
        let total: usize = groups.iter().map(|g| g.venues.len()).sum();
        assert_eq!(total, 3);
        let names: Vec<_> = groups[0].venues.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["The Musical Hop", "Park Square Live Music & Coffee"]);
    }

    #[tokio::test]
    async fn create_reuses_genres_across_submissions() {
        let db = test_db().await;
        let service = VenueService::new(db.clone());

        service
            .create(input("The Musical Hop", "San Francisco", "CA", &["Jazz", "Reggae"]))
            .await
            .unwrap();
        service
            .create(input("Park Square Live Music & Coffee", "San Francisco", "CA", &["Jazz"]))
            .await
            .unwrap();

        let genre_count = entities::genre::Entity::find().count(&db.conn).await.unwrap();
        assert_eq!(genre_count, 2);
    }

    #[tokio::test]
    async fn detail_page_carries_genres_and_show_partition() {
        let db = test_db().await;
        let service = VenueService::new(db.clone());

        let venue_id = service
            .create(input("The Musical Hop", "San Francisco", "CA", &["Jazz"]))
            .await
            .unwrap();

        let artist = entities::artist::ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set("Guns N Petals".to_string()),
            city: ActiveValue::Set("San Francisco".to_string()),
            state: ActiveValue::Set("CA".to_string()),
            phone: ActiveValue::NotSet,
            image_link: ActiveValue::Set(Some("https://example.com/gnp.jpg".to_string())),
            facebook_link: ActiveValue::NotSet,
            website: ActiveValue::NotSet,
            seeking_venue: ActiveValue::Set(false),
            seeking_description: ActiveValue::NotSet,
        }
        .insert(&db.conn)
        .await
        .unwrap();

        for start_time in ["2024-01-01 20:00:00", "2024-12-01 20:00:00"] {
            entities::show::ActiveModel {
                id: ActiveValue::NotSet,
                artist_id: ActiveValue::Set(artist.id),
                venue_id: ActiveValue::Set(venue_id),
                start_time: ActiveValue::Set(start_time.to_string()),
            }
            .insert(&db.conn)
            .await
            .unwrap();
        }

        let now = schedule::parse_start_time("2024-06-01 12:00:00").unwrap();
        let page = service.get_page(venue_id, now).await.unwrap();

        assert_eq!(page.genres, vec!["Jazz"]);
        assert_eq!(page.past_shows_count, 1);
        assert_eq!(page.upcoming_shows_count, 1);
        assert_eq!(page.past_shows[0].artist_name, "Guns N Petals");
        assert_eq!(
            page.upcoming_shows[0].artist_image_link.as_deref(),
            Some("https://example.com/gnp.jpg")
        );
    }

    #[tokio::test]
    async fn update_missing_venue_reports_not_found() {
        let db = test_db().await;
        let service = VenueService::new(db.clone());

        let err = service
            .update(999, input("Nowhere", "Nowhere", "NA", &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::VenueNotFound(999)));

        let count = entities::venue::Entity::find().count(&db.conn).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn update_rebuilds_genre_associations() {
        let db = test_db().await;
        let service = VenueService::new(db.clone());

        let id = service
            .create(input("The Musical Hop", "San Francisco", "CA", &["Jazz", "Reggae"]))
            .await
            .unwrap();
        service
            .update(id, input("The Musical Hop", "San Francisco", "CA", &["Jazz", "Folk"]))
            .await
            .unwrap();

        let now = schedule::parse_start_time("2024-06-01 12:00:00").unwrap();
        let page = service.get_page(id, now).await.unwrap();
        let mut genres = page.genres;
        genres.sort();
        assert_eq!(genres, vec!["Folk", "Jazz"]);

        // "Reggae" row survives; only the association was dropped
        let genre_count = entities::genre::Entity::find().count(&db.conn).await.unwrap();
        assert_eq!(genre_count, 3);
    }

    #[tokio::test]
    async fn failed_create_rolls_back_everything() {
        let db = test_db().await;
        let service = VenueService::new(db.clone());

        // Force the association insert to fail mid-transaction
        db.conn
            .execute_unprepared("DROP TABLE venue_genres")
            .await
            .unwrap();

        let result = service
            .create(input("The Musical Hop", "San Francisco", "CA", &["Jazz"]))
            .await;
        assert!(result.is_err());

        let venue_count = entities::venue::Entity::find().count(&db.conn).await.unwrap();
        assert_eq!(venue_count, 0);
        let genre_count = entities::genre::Entity::find().count(&db.conn).await.unwrap();
        assert_eq!(genre_count, 0);
    }

    #[tokio::test]
    async fn delete_cascades_to_shows_and_links() {
        let db = test_db().await;
        let service = VenueService::new(db.clone());

        let venue_id = service
            .create(input("The Musical Hop", "San Francisco", "CA", &["Jazz"]))
            .await
            .unwrap();

        let artist = entities::artist::ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set("Guns N Petals".to_string()),
            city: ActiveValue::Set("San Francisco".to_string()),
            state: ActiveValue::Set("CA".to_string()),
            phone: ActiveValue::NotSet,
            image_link: ActiveValue::NotSet,
            facebook_link: ActiveValue::NotSet,
            website: ActiveValue::NotSet,
            seeking_venue: ActiveValue::Set(false),
            seeking_description: ActiveValue::NotSet,
        }
        .insert(&db.conn)
        .await
        .unwrap();

        entities::show::ActiveModel {
            id: ActiveValue::NotSet,
            artist_id: ActiveValue::Set(artist.id),
            venue_id: ActiveValue::Set(venue_id),
            start_time: ActiveValue::Set("2024-12-01 20:00:00".to_string()),
        }
        .insert(&db.conn)
        .await
        .unwrap();

        service.delete(venue_id).await.unwrap();

        let show_count = entities::show::Entity::find().count(&db.conn).await.unwrap();
        assert_eq!(show_count, 0);
        let link_count = entities::venue_genre::Entity::find().count(&db.conn).await.unwrap();
        assert_eq!(link_count, 0);

        let err = service.delete(venue_id).await.unwrap_err();
        assert!(matches!(err, ServiceError::VenueNotFound(_)));
    }
}
