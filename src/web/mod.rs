//! Web server module
//!
//! Server-rendered front end for VizualNetwork. Per-user state lives in a
//! signed cookie, so handlers share nothing mutable beyond metrics and the
//! probe cache.

mod handlers;
mod routes;
mod state;
mod templates;

pub use routes::create_router;
pub use state::AppState;
pub use templates::Templates;
