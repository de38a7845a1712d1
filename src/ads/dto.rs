use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{repo_types::Advertisement, services::ListAdsParams};

#[derive(Debug, Deserialize)]
pub struct CreateAdRequest {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub price: f64,
}

/// Query string of `GET /ads`. Values are kept as text and parsed leniently:
/// anything unparseable counts as absent.
#[derive(Debug, Default, Deserialize)]
pub struct ListAdsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

impl From<ListAdsQuery> for ListAdsParams {
    fn from(q: ListAdsQuery) -> Self {
        fn parsed<T: std::str::FromStr>(raw: Option<String>) -> Option<T> {
            raw.and_then(|v| v.trim().parse().ok())
        }
        Self {
            page: parsed(q.page),
            limit: parsed(q.limit),
            sort_by: q.sort_by,
            order: q.order,
            min_price: parsed(q.min_price),
            max_price: parsed(q.max_price),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub price: f64,
    pub author_login: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Only present when the request carried an identity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_owner: Option<bool>,
}

impl AdResponse {
    pub fn for_viewer(ad: Advertisement, viewer: Option<Uuid>) -> Self {
        let is_owner = viewer.map(|id| id == ad.user_id);
        Self {
            id: ad.id,
            title: ad.title,
            description: ad.description,
            image_url: ad.image_url,
            price: ad.price,
            author_login: ad.author_login,
            created_at: ad.created_at,
            is_owner,
        }
    }
}
