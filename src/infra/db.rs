use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{Database, Pool};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::{OnceCell, RwLock};
use tracing::{info, warn};

pub type ConnectFuture<DB> = Pin<Box<dyn Future<Output = Result<Pool<DB>, sqlx::Error>> + Send>>;
type Connector<DB> = Box<dyn Fn() -> ConnectFuture<DB> + Send + Sync>;

/// Process-wide pool, opened on first use.
///
/// Callers that arrive while the first connection attempt is in flight wait
/// for that attempt instead of opening their own. A failed attempt leaves the
/// cell empty so the next `get` retries. `close` waits for any attempt in
/// flight, tears the pool down, and the next `get` connects again.
pub struct LazyPool<DB: Database> {
    label: &'static str,
    connector: Connector<DB>,
    cell: RwLock<Arc<OnceCell<Pool<DB>>>>,
}

impl<DB: Database> LazyPool<DB> {
    pub fn new<F>(label: &'static str, connector: F) -> Self
    where
        F: Fn() -> ConnectFuture<DB> + Send + Sync + 'static,
    {
        Self {
            label,
            connector: Box::new(connector),
            cell: RwLock::new(Arc::new(OnceCell::new())),
        }
    }

    pub async fn get(&self) -> Result<Pool<DB>, AppError> {
        let cell = self.cell.read().await;
        let pool = cell
            .get_or_try_init(|| async {
                info!(backend = self.label, "Opening database connection pool");
                match (self.connector)().await {
                    Ok(pool) => {
                        info!(backend = self.label, "Database connection pool ready");
                        Ok(pool)
                    }
                    Err(e) => {
                        warn!(backend = self.label, error = %e, "Database connection attempt failed");
                        Err(e)
                    }
                }
            })
            .await?;
        Ok(pool.clone())
    }

    pub async fn is_connected(&self) -> bool {
        self.cell.read().await.initialized()
    }

    pub async fn close(&self) {
        let previous = {
            let mut guard = self.cell.write().await;
            std::mem::replace(&mut *guard, Arc::new(OnceCell::new()))
        };
        if let Some(pool) = previous.get() {
            pool.close().await;
            info!(backend = self.label, "Database connection pool closed");
        }
    }
}

/// Type-erased handle used to tear the shared connection down at shutdown.
#[async_trait]
pub trait Shutdown: Send + Sync {
    async fn shutdown(&self);
}

#[async_trait]
impl<DB: Database> Shutdown for LazyPool<DB> {
    async fn shutdown(&self) {
        self.close().await;
    }
}
