mod handlers;
mod routes;
mod stats;

pub use handlers::AppState;
pub use routes::create_api_router;
