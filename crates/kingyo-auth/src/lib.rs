//! # kingyo-auth
//!
//! Session management for the Kingyo client.
//!
//! - [`TokenStore`]: where the access and refresh tokens live (OS keychain
//!   with file fallback, a credentials file, or memory)
//! - [`TokenManager`]: sign-in, refresh and sign-out, plus the observable
//!   session state; it is the [`kingyo_http::TokenRefresher`] behind the
//!   authenticated transport
//! - [`Navigator`]: how the session tells its host to show the login screen
//! - [`decode_expiry`]: unverified `exp` claim decoding for status display

pub mod error;
pub mod expiry;
pub mod manager;
pub mod navigator;
pub mod token_store;

pub use error::AuthError;
pub use expiry::decode_expiry;
pub use manager::{SessionState, TokenManager, TokenStatus};
pub use navigator::{Navigator, RecordingNavigator, Route};
pub use token_store::{
    FileTokenStore, KeyringTokenStore, MemoryTokenStore, TokenKind, TokenStore, open_token_store,
};
