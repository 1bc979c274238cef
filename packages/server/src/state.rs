use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::sandbox::{Execute, RuntimeMap};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    /// Single source of truth for which languages are judgeable.
    pub runtimes: RuntimeMap,
    pub sandbox: Arc<dyn Execute>,
}
