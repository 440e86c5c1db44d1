//! REST API for the query pipeline

#[cfg(feature = "server")]
pub mod query_routes;

#[cfg(feature = "server")]
pub use query_routes::{create_query_router, QueryRequest, QueryResponse};
