//! Plug-and-play session gatekeeping for Axum.
//!
//! Mounts the credential lifecycle around an existing application router:
//! the gate classifies every request from the two credential cookies, and
//! the auth routes own login, refresh and logout.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use idiom_web::middleware::{SessionConfig, auth_routes, session_gate};
//! use idiom_web::AuthClient;
//!
//! let config = SessionConfig::from_env()?;
//! let issuer = AuthClient::new(config.api_url().clone());
//!
//! let app = axum::Router::new()
//!     .merge(app_routes())
//!     .layer(axum::middleware::from_fn_with_state(config.gate(), session_gate))
//!     .merge(auth_routes(config, issuer));
//! ```

mod config;
mod cookies;
mod error;
mod extractor;
mod gate;
mod routes;
mod state;

pub use config::SessionConfig;
pub use cookies::CookieCredentials;
pub use error::AuthError;
pub use extractor::Credentials;
pub use gate::{SessionGate, classify, session_gate};
pub use routes::auth_routes;
