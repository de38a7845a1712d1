use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;
use uuid::Uuid;

use crate::{
    ads::{
        repo::AdStore,
        repo_types::{AdQuery, Advertisement, NewAdvertisement, SortField, SortOrder},
    },
    error::{AppError, ValidationError},
};

const TITLE_LEN: std::ops::RangeInclusive<usize> = 5..=100;
const DESCRIPTION_LEN: std::ops::RangeInclusive<usize> = 10..=1000;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

pub(crate) fn is_valid_image_url(url: &str) -> bool {
    lazy_static! {
        static ref IMAGE_URL_RE: Regex =
            Regex::new(r"^(?i:https?)://[^\s/?#]+[^\s]*$").unwrap();
    }
    IMAGE_URL_RE.is_match(url)
}

/// Bounds checks applied at creation time.
pub fn validate_ad(title: &str, description: &str, price: f64) -> Result<(), ValidationError> {
    if !TITLE_LEN.contains(&title.chars().count()) {
        return Err(ValidationError::InvalidTitle);
    }
    if !DESCRIPTION_LEN.contains(&description.chars().count()) {
        return Err(ValidationError::InvalidDescription);
    }
    if !price.is_finite() || price <= 0.0 {
        return Err(ValidationError::InvalidPrice);
    }
    Ok(())
}

/// Raw listing parameters as they arrive from a client.
#[derive(Debug, Clone, Default)]
pub struct ListAdsParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl ListAdsParams {
    /// Out-of-range values fall back to defaults instead of failing. A price
    /// bound of zero (or below) means "no bound on that side".
    pub fn normalize(&self) -> AdQuery {
        let page = self.page.filter(|p| *p >= 1).unwrap_or(1);
        let limit = self
            .limit
            .filter(|l| (1..=MAX_LIMIT).contains(l))
            .unwrap_or(DEFAULT_LIMIT);
        let sort = match self.sort_by.as_deref() {
            Some("price") => SortField::Price,
            _ => SortField::CreatedAt,
        };
        let order = match self.order.as_deref() {
            Some("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        };
        let bound = |p: Option<f64>| p.filter(|v| *v > 0.0 && v.is_finite());

        AdQuery {
            page,
            limit,
            sort,
            order,
            min_price: bound(self.min_price),
            max_price: bound(self.max_price),
        }
    }
}

#[derive(Clone)]
pub struct AdService {
    ads: Arc<dyn AdStore>,
}

impl AdService {
    pub fn new(ads: Arc<dyn AdStore>) -> Self {
        Self { ads }
    }

    pub async fn create_ad(
        &self,
        user_id: Uuid,
        title: &str,
        description: &str,
        image_url: &str,
        price: f64,
    ) -> Result<Advertisement, AppError> {
        validate_ad(title, description, price)?;
        if !is_valid_image_url(image_url) {
            return Err(ValidationError::InvalidImageUrl.into());
        }

        let ad = self
            .ads
            .insert(NewAdvertisement {
                user_id,
                title: title.to_owned(),
                description: description.to_owned(),
                image_url: image_url.to_owned(),
                price,
            })
            .await?;
        Ok(ad)
    }

    pub async fn list_ads(&self, params: &ListAdsParams) -> Result<Vec<Advertisement>, AppError> {
        let query = params.normalize();
        debug!(?query, "listing advertisements");
        Ok(self.ads.list(query).await?)
    }
}
