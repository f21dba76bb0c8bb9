pub mod config;
pub mod credentials;
pub mod error;
pub mod ideas;
pub mod images;
pub mod posts;
pub mod request;
pub mod responses;
pub mod store;
pub mod types;
pub mod users;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use store::{ObjectStore, TableStore};

pub use config::Config;

/// Store handles shared by every invocation of a function
pub struct AppState {
    pub table: Arc<dyn TableStore>,
    pub objects: Option<Arc<dyn ObjectStore>>,
}

impl AppState {
    pub fn new(
        table: Arc<dyn TableStore>,
        objects: Option<Arc<dyn ObjectStore>>,
    ) -> Arc<Self> {
        Arc::new(Self { table, objects })
    }
}
