use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    ads::repo_types::{AdQuery, Advertisement, NewAdvertisement},
    error::StoreError,
};

/// Advertisement store. Listing results carry the author's username.
#[async_trait]
pub trait AdStore: Send + Sync {
    async fn insert(&self, ad: NewAdvertisement) -> Result<Advertisement, StoreError>;
    async fn list(&self, query: AdQuery) -> Result<Vec<Advertisement>, StoreError>;
}

#[derive(Clone)]
pub struct PgAdStore {
    db: PgPool,
}

impl PgAdStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn list_sql(query: &AdQuery) -> String {
    // column and direction come from closed enums, never from request text
    format!(
        r#"
        SELECT a.id, a.title, a.description, a.image_url, a.price, a.user_id,
               u.username AS author_login, a.created_at
        FROM advertisements a
        JOIN users u ON u.id = a.user_id
        WHERE ($1::float8 IS NULL OR a.price >= $1)
          AND ($2::float8 IS NULL OR a.price <= $2)
        ORDER BY a.{} {}, a.created_at DESC, a.id DESC
        LIMIT $3 OFFSET $4
        "#,
        query.sort.column(),
        query.order.keyword(),
    )
}

#[async_trait]
impl AdStore for PgAdStore {
    async fn insert(&self, ad: NewAdvertisement) -> Result<Advertisement, StoreError> {
        let row = sqlx::query_as::<_, Advertisement>(
            r#"
            WITH inserted AS (
                INSERT INTO advertisements (title, description, image_url, price, user_id)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, title, description, image_url, price, user_id, created_at
            )
            SELECT i.id, i.title, i.description, i.image_url, i.price, i.user_id,
                   u.username AS author_login, i.created_at
            FROM inserted i
            JOIN users u ON u.id = i.user_id
            "#,
        )
        .bind(&ad.title)
        .bind(&ad.description)
        .bind(&ad.image_url)
        .bind(ad.price)
        .bind(ad.user_id)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn list(&self, query: AdQuery) -> Result<Vec<Advertisement>, StoreError> {
        let sql = list_sql(&query);
        let rows = sqlx::query_as::<_, Advertisement>(&sql)
            .bind(query.min_price)
            .bind(query.max_price)
            .bind(query.limit)
            .bind(query.offset())
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }
}
