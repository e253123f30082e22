//! Client-side session store.
//!
//! Holds the signed-in [`Identity`](tp_core::Identity) and the connectivity
//! mode decided at startup, reconciling a remote auth backend with a local
//! fallback cache that keeps the last identity across restarts.

pub mod backend;
pub mod error;
pub mod events;
pub mod fallback;
pub mod state;
pub mod store;


pub use backend::hosted::HostedAuthBackend;
pub use backend::legacy::LegacyAuthBackend;
pub use backend::token_cache::TokenCache;
pub use backend::{OAuthRedirect, RemoteAuthBackend, SignUpOutcome};
pub use error::{ErrorKind, Result, SessionError};
pub use events::{SessionEvents, SessionSubscription};
pub use fallback::error::{Result as StoreResult, StoreError};
pub use fallback::file_store::FileFallbackStore;
pub use fallback::memory_store::MemoryFallbackStore;
pub use fallback::FallbackStore;
pub use state::SessionState;
pub use store::{SessionOptions, SessionStore};

pub const DEFAULT_PROBE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(3);
pub const DEFAULT_IDENTITY_KEY: &str = "user";
pub const DEFAULT_TOKEN_KEY: &str = "auth-token";
