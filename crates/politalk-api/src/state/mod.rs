//! Application state shared by every handler

use std::sync::Arc;

use politalk_common::{AppConfig, JwtService};
use politalk_service::{ImageStore, ServiceContext};

#[derive(Clone)]
pub struct AppState {
    service_context: Arc<ServiceContext>,
    config: Arc<AppConfig>,
}

/// Reachability of the backing stores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyStatus {
    pub database: bool,
    pub redis: bool,
}

impl AppState {
    pub fn new(service_context: ServiceContext, config: AppConfig) -> Self {
        Self {
            service_context: Arc::new(service_context),
            config: Arc::new(config),
        }
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Verifies access, refresh and anonymous tokens
    pub fn jwt_service(&self) -> &JwtService {
        self.service_context.jwt_service()
    }

    /// Where uploaded images live and how large they may be
    pub fn image_store(&self) -> &ImageStore {
        self.service_context.image_store()
    }

    /// Probe PostgreSQL and Redis
    pub async fn check_dependencies(&self) -> DependencyStatus {
        let database = self.service_context.pool().acquire().await.is_ok();
        let redis = self
            .service_context
            .redis_pool()
            .health_check()
            .await
            .is_ok();

        DependencyStatus { database, redis }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("env", &self.config.app.env)
            .field("image_root", &self.image_store().root())
            .finish_non_exhaustive()
    }
}
