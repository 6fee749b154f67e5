pub mod artist;
pub mod artist_genre;
pub mod genre;
pub mod show;
pub mod venue;
pub mod venue_genre;

#[cfg(test)]
mod tests {
    use crate::test_utils::test_db;
    use sea_orm::EntityTrait;

    // Every entity must point at a table the migration actually created
    #[tokio::test]
    async fn migrated_schema_matches_entity_table_names() {
        let db = test_db().await;

        super::venue::Entity::find().all(&db.conn).await.unwrap();
        super::artist::Entity::find().all(&db.conn).await.unwrap();
        super::show::Entity::find().all(&db.conn).await.unwrap();
        super::genre::Entity::find().all(&db.conn).await.unwrap();
        super::venue_genre::Entity::find().all(&db.conn).await.unwrap();
        super::artist_genre::Entity::find().all(&db.conn).await.unwrap();
    }
}
