pub mod app;
pub mod deserializers;
pub mod error;
pub mod routes;

pub use app::{build_router, run_server, AppState};
pub use error::{ApiError, ApiResponse};
