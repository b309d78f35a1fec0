#![doc = include_str!("../README.md")]

pub mod codec;
pub mod error;
pub mod origin;
pub mod store;
pub mod types;

#[cfg(feature = "client")]
pub mod authorized;
#[cfg(feature = "client")]
pub mod lookup;
#[cfg(feature = "client")]
pub mod provider;
#[cfg(feature = "client")]
pub mod refresh;

#[cfg(feature = "middleware")]
pub mod middleware;

// Re-exports for convenient access
pub use codec::decode_expiry;
pub use error::Error;
pub use origin::{Origin, OriginConfig, resolve_origins};
pub use store::{CredentialStore, MemoryStore};
pub use types::{CredentialPair, Idiom, SessionState};

#[cfg(feature = "client")]
pub use authorized::{AuthorizedClient, LookupApi, TokenRefresher};
#[cfg(feature = "client")]
pub use lookup::{IdiomClient, LookupError};
#[cfg(feature = "client")]
pub use provider::{AuthClient, CredentialIssuer};
#[cfg(feature = "client")]
pub use refresh::{RefreshClient, RefreshError};
