/// HTTP transport for the catalog services
pub mod http;
pub mod response;

// Re-export for convenience
pub use http::{api_routes, AppState, HttpServer};
pub use response::{ApiError, ErrorBody};
