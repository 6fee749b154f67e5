use sea_orm::{ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::entities;

/// Resolve each submitted genre name to a stable genre id, creating rows
/// lazily for names not present yet. Matching is by exact name. Repeated
/// names in the input resolve once.
///
/// Runs against whatever connection is passed in, so callers can keep the
/// lookups and inserts inside their own transaction.
pub async fn resolve_genre_ids<C: ConnectionTrait>(
    conn: &C,
    names: &[String],
) -> Result<Vec<i64>, sea_orm::DbErr> {
    let mut resolved: Vec<(String, i64)> = Vec::new();

    for name in names {
        if resolved.iter().any(|(n, _)| n == name) {
            continue;
        }

        let existing = entities::genre::Entity::find()
            .filter(entities::genre::Column::Name.eq(name))
            .one(conn)
            .await?;

        let id = match existing {
            Some(genre) => genre.id,
            None => {
                log::debug!("Creating new genre: '{}'", name);
                let new_genre = entities::genre::ActiveModel {
                    id: ActiveValue::NotSet,
                    name: ActiveValue::Set(name.clone()),
                };
                new_genre.insert(conn).await?.id
            }
        };
        resolved.push((name.clone(), id));
    }

    Ok(resolved.into_iter().map(|(_, id)| id).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_db;
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn reuses_existing_genre_rows_by_exact_name() {
        let db = test_db().await;

        let first = resolve_genre_ids(&db.conn, &["Jazz".to_string(), "Folk".to_string()])
            .await
            .unwrap();
        let second = resolve_genre_ids(&db.conn, &["Jazz".to_string(), "Blues".to_string()])
            .await
            .unwrap();

        assert_eq!(first[0], second[0]);

        let total = entities::genre::Entity::find().count(&db.conn).await.unwrap();
        assert_eq!(total, 3);
    }

    #[tokio::test]
    async fn exact_match_does_not_case_normalize() {
        let db = test_db().await;

        resolve_genre_ids(&db.conn, &["Jazz".to_string()]).await.unwrap();
        resolve_genre_ids(&db.conn, &["jazz".to_string()]).await.unwrap();

        let total = entities::genre::Entity::find().count(&db.conn).await.unwrap();
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn repeated_names_in_one_submission_resolve_once() {
        let db = test_db().await;

        let ids = resolve_genre_ids(
            &db.conn,
            &["Rock".to_string(), "Rock".to_string(), "Soul".to_string()],
        )
        .await
        .unwrap();

        assert_eq!(ids.len(), 2);

        let total = entities::genre::Entity::find().count(&db.conn).await.unwrap();
        assert_eq!(total, 2);
    }
}
