use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::{
    ads::{repo::PgAdStore, services::AdService},
    auth::{jwt::JwtKeys, password::PasswordHashing, repo::PgUserStore, services::AuthService},
    config::AppConfig,
    db,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth: AuthService,
    pub ads: AdService,
}

impl AppState {
    /// Reads the config, connects the pool and applies migrations.
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let pool = db::connect(&config).await?;
        db::migrate(&pool).await?;
        Self::from_pool(pool, config)
    }

    pub fn from_pool(pool: PgPool, config: Arc<AppConfig>) -> anyhow::Result<Self> {
        let auth = AuthService::new(
            Arc::new(PgUserStore::new(pool.clone())),
            JwtKeys::new(&config.jwt),
            PasswordHashing::new(&config.password)?,
        );
        let ads = AdService::new(Arc::new(PgAdStore::new(pool)));
        Ok(Self { config, auth, ads })
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::testing::{fake_auth_service, fake_config, MemoryStore};

        let store = Arc::new(MemoryStore::default());
        Self {
            config: Arc::new(fake_config()),
            auth: fake_auth_service(store.clone()),
            ads: AdService::new(store),
        }
    }
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
