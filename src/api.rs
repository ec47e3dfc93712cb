//! Kraken REST pieces: endpoint registry, request builder, response validation, and the
//! decoded profile record.
//!
//! Every request carries its [`Endpoint`] tag from construction through the transport and back
//! in the [`ApiExchange`], so a shared completion path can always tell which resource a
//! response belongs to.

pub mod endpoint;
pub mod request;
pub mod response;
pub mod user;

pub use endpoint::*;
pub use request::*;
pub use response::*;
pub use user::*;

/// Media type selecting the Kraken v5 API on every request.
pub const API_VERSION_ACCEPT: &str = "application/vnd.twitchtv.v5+json";
