mod basic;
mod client;
mod guard;
mod source;

pub use basic::BasicClient;
pub use client::HttpClient;
pub use guard::{SelectionGuard, Ticket};
pub use source::DataSourceClient;
