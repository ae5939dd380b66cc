use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::config::Config;
use crate::dashboards::d100_best_sellers::repository::SeaOrmSalesStore;
use crate::dashboards::d100_best_sellers::store::SalesStore;

/// State shared by all handlers. Everything a request needs is injected here.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub sales: Arc<dyn SalesStore>,
    pub default_limit: u64,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: &Config) -> Self {
        let sales = Arc::new(SeaOrmSalesStore::new(db.clone()));
        Self {
            db,
            sales,
            default_limit: config.pagination.default_limit,
        }
    }

    /// Replaces the store used by the sales statistics
    pub fn with_sales_store(mut self, sales: Arc<dyn SalesStore>) -> Self {
        self.sales = sales;
        self
    }
}
