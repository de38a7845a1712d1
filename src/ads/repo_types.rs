use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Advertisement row joined with its author's username.
#[derive(Debug, Clone, FromRow)]
pub struct Advertisement {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub price: f64,
    pub user_id: Uuid,
    pub author_login: String,
    pub created_at: OffsetDateTime,
}

/// Validated input for a new advertisement.
#[derive(Debug, Clone)]
pub struct NewAdvertisement {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Price,
    CreatedAt,
}

impl SortField {
    pub fn column(self) -> &'static str {
        match self {
            SortField::Price => "price",
            SortField::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// A listing request after normalization; every field is in range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdQuery {
    pub page: i64,
    pub limit: i64,
    pub sort: SortField,
    pub order: SortOrder,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl AdQuery {
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}
