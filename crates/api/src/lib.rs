pub mod error;
pub mod gate;
pub mod routes;
pub mod session;
pub mod state;

use axum::{middleware, Router};

pub use error::ApiError;
pub use gate::{Gate, DEFAULT_PIN};
pub use session::{SessionKeyError, SessionSigner, DEFAULT_SESSION_KEY};
pub use state::AppState;

pub fn module_ready() -> bool {
    true
}

/// Applies the no-cache headers to every response of `router`, including
/// routes merged in by the caller.
pub fn with_no_cache(router: Router) -> Router {
    router.layer(middleware::map_response(routes::no_cache_headers))
}

pub fn app(state: AppState) -> Router {
    with_no_cache(routes::router(state))
}
