pub mod analyzers;
pub mod cli;
pub mod error;
pub mod fetch;
pub mod mock_data;
pub mod models;
pub mod processors;
pub mod readers;
pub mod settings;
pub mod store;
pub mod utils;

pub use error::{DashboardError, Result};
