use std::sync::Arc;

use chrono::Duration;

use depot_auth::{
    Hs256SessionCodec, IdentityProvider, SessionCodec, StaticIdentityProvider,
};
use depot_store::{InventoryStore, LedgerService, MemoryStore, PostgresStore};

use crate::config::AppConfig;

/// Shared service wiring for the HTTP layer.
pub struct AppServices {
    store: Arc<dyn InventoryStore>,
    ledger: LedgerService,
    identity: Arc<dyn IdentityProvider>,
    session_codec: Arc<dyn SessionCodec>,
    session_ttl: Duration,
    low_stock_threshold: i64,
}

/// Select and wire the record store plus the auth collaborators.
///
/// `DATABASE_URL` in the config selects Postgres; otherwise the in-memory
/// store backs the process (dev/test).
pub async fn build_services(config: &AppConfig) -> AppServices {
    let store: Arc<dyn InventoryStore> = match &config.database_url {
        Some(url) => {
            let store = PostgresStore::connect(url)
                .await
                .expect("failed to connect to Postgres");
            tracing::info!("using Postgres record store");
            Arc::new(store)
        }
        None => {
            tracing::info!("DATABASE_URL not set; using in-memory record store");
            Arc::new(MemoryStore::new())
        }
    };

    AppServices {
        ledger: LedgerService::new(store.clone()),
        store,
        identity: Arc::new(StaticIdentityProvider::new(config.users.clone())),
        session_codec: Arc::new(Hs256SessionCodec::new(config.session_secret.as_bytes())),
        session_ttl: config.session_ttl,
        low_stock_threshold: config.low_stock_threshold,
    }
}

impl AppServices {
    pub fn store(&self) -> &Arc<dyn InventoryStore> {
        &self.store
    }

    pub fn ledger(&self) -> &LedgerService {
        &self.ledger
    }

    pub fn identity(&self) -> &Arc<dyn IdentityProvider> {
        &self.identity
    }

    pub fn session_codec(&self) -> Arc<dyn SessionCodec> {
        self.session_codec.clone()
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    pub fn low_stock_threshold(&self) -> i64 {
        self.low_stock_threshold
    }
}
