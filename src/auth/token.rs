//! Access token captured from the redirect fragment.

// self
use crate::_prelude::*;

/// Redacted wrapper around the implicit-grant access token.
///
/// The token lives only in memory for the lifetime of the orchestrator; nothing in this crate
/// persists it or checks its expiry.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);
impl AccessToken {
	/// Wraps a new token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Formats the Kraken `Authorization` header value (`OAuth <token>`).
	pub fn authorization_value(&self) -> String {
		format!("OAuth {}", self.0)
	}
}
impl AsRef<str> for AccessToken {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("AccessToken").field(&"<redacted>").finish()
	}
}
impl Display for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
