//! Auth-domain identifiers and the captured access token.

pub mod id;
pub mod token;

pub use id::*;
pub use token::*;
