use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    ads::{
        dto::{AdResponse, CreateAdRequest, ListAdsQuery},
        services::ListAdsParams,
    },
    auth::extractors::{AuthUser, MaybeAuthUser},
    error::AppResult,
    extract::ApiJson,
    state::AppState,
};

pub fn ads_routes() -> Router<AppState> {
    Router::new().route("/ads", get(list_ads).post(create_ad))
}

#[instrument(skip(state, query))]
pub async fn list_ads(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Query(query): Query<ListAdsQuery>,
) -> AppResult<Json<Vec<AdResponse>>> {
    let params = ListAdsParams::from(query);
    let ads = state.ads.list_ads(&params).await?;

    let items: Vec<AdResponse> = ads
        .into_iter()
        .map(|ad| AdResponse::for_viewer(ad, viewer))
        .collect();

    info!(ads_count = items.len(), authenticated = viewer.is_some(), "ads listed");
    Ok(Json(items))
}

#[instrument(skip(state, payload))]
pub async fn create_ad(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(payload): ApiJson<CreateAdRequest>,
) -> AppResult<(StatusCode, Json<AdResponse>)> {
    let ad = state
        .ads
        .create_ad(
            user_id,
            &payload.title,
            &payload.description,
            &payload.image_url,
            payload.price,
        )
        .await?;

    info!(ad_id = %ad.id, %user_id, title = %ad.title, "advertisement created");
    // the creator is the viewer of this response
    Ok((StatusCode::CREATED, Json(AdResponse::for_viewer(ad, Some(user_id)))))
}
