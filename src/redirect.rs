//! Redirect URI watcher for the implicit grant.
//!
//! The embedded browser reports every navigation; the watcher ignores them until one starts with
//! the configured redirect prefix, then extracts the access token from the fragment exactly once.
//! After that single capture the watcher is inert, so each sign-in attempt builds a fresh one.

// self
use crate::{_prelude::*, auth::AccessToken, config::SignInConfig, error::RedirectParseError};

const STATE_KEY: &str = "state";

/// Watcher lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatcherState {
	/// Waiting for the redirect callback.
	Watching,
	/// The callback was seen; further navigations are ignored.
	Captured,
}

/// Result of feeding one navigation into the watcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RedirectEvent {
	/// Not the callback (or the watcher already captured one).
	Ignored,
	/// Callback seen and the token extracted.
	Captured(AccessToken),
	/// Callback seen but it carried no usable token.
	Rejected(RedirectParseError),
}

/// Two-state machine that recognizes the provider redirect.
#[derive(Clone, Debug)]
pub struct RedirectWatcher {
	prefix: String,
	token_key: String,
	expected_state: Option<String>,
	state: WatcherState,
}
impl RedirectWatcher {
	/// Creates a watcher for URLs starting with `prefix`, reading the token after `token_key`.
	pub fn new(prefix: impl Into<String>, token_key: impl Into<String>) -> Self {
		Self {
			prefix: prefix.into(),
			token_key: token_key.into(),
			expected_state: None,
			state: WatcherState::Watching,
		}
	}

	/// Creates a watcher from the configured prefix and token marker.
	pub fn from_config(config: &SignInConfig) -> Self {
		Self::new(config.redirect_prefix.as_str(), config.token_key.as_str())
	}

	/// Requires the redirect to echo `state`.
	pub fn expect_state(mut self, state: impl Into<String>) -> Self {
		self.expected_state = Some(state.into());

		self
	}

	/// Current lifecycle state.
	pub fn state(&self) -> WatcherState {
		self.state
	}

	/// Feeds one navigated URL into the watcher.
	pub fn observe(&mut self, url: &str) -> RedirectEvent {
		if self.state == WatcherState::Captured || !url.starts_with(&self.prefix) {
			return RedirectEvent::Ignored;
		}

		self.state = WatcherState::Captured;

		if let Some(expected) = self.expected_state.as_deref() {
			if param(url, STATE_KEY) != Some(expected) {
				return RedirectEvent::Rejected(RedirectParseError::StateMismatch);
			}
		}

		match extract_token(url, &self.token_key) {
			Ok(token) => RedirectEvent::Captured(token),
			Err(e) => RedirectEvent::Rejected(e),
		}
	}
}

/// Cuts the token out of `url`: everything after `token_key` up to the next `&` or the end.
pub fn extract_token(url: &str, token_key: &str) -> Result<AccessToken, RedirectParseError> {
	let start = url
		.find(token_key)
		.map(|idx| idx + token_key.len())
		.ok_or_else(|| RedirectParseError::MissingToken { marker: token_key.to_owned() })?;
	let rest = &url[start..];
	let value = rest.split('&').next().unwrap_or_default();

	if value.is_empty() {
		return Err(RedirectParseError::EmptyToken);
	}

	Ok(AccessToken::new(value))
}

// Reads `key` from the fragment, falling back to the query.
fn param<'a>(url: &'a str, key: &str) -> Option<&'a str> {
	let params = url.split_once('#').or_else(|| url.split_once('?')).map(|(_, tail)| tail)?;

	params.split('&').find_map(|pair| match pair.split_once('=') {
		Some((name, value)) if name == key => Some(value),
		_ => None,
	})
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::config::{DEFAULT_REDIRECT_PREFIX, DEFAULT_TOKEN_KEY};

	fn watcher() -> RedirectWatcher {
		RedirectWatcher::new(DEFAULT_REDIRECT_PREFIX, DEFAULT_TOKEN_KEY)
	}

	#[test]
	fn unrelated_navigations_never_leave_watching() {
		let mut watcher = watcher();

		for url in [
			"about:blank",
			"https://api.twitch.tv/kraken/oauth2/authorize?response_type=token",
			"https://localhost",
			"https://localhost/?error=access_denied",
			"http://localhost/#access_token=abc",
			"",
		] {
			assert_eq!(watcher.observe(url), RedirectEvent::Ignored, "{url} must be ignored.");
			assert_eq!(watcher.state(), WatcherState::Watching);
		}
	}

	#[test]
	fn token_is_cut_at_the_next_delimiter() {
		let mut watcher = watcher();
		let event = watcher.observe("https://localhost/#access_token=abc123&scope=x");

		assert_eq!(event, RedirectEvent::Captured(AccessToken::new("abc123")));
		assert_eq!(watcher.state(), WatcherState::Captured);

		let token = extract_token("https://localhost/#access_token=tok1", DEFAULT_TOKEN_KEY)
			.expect("Trailing token should be extracted.");

		assert_eq!(token.expose(), "tok1");
	}

	#[test]
	fn bare_marker_is_rejected() {
		let mut watcher = watcher();

		assert_eq!(
			watcher.observe("https://localhost/#access_token"),
			RedirectEvent::Rejected(RedirectParseError::MissingToken {
				marker: DEFAULT_TOKEN_KEY.into()
			})
		);
		assert_eq!(
			extract_token("https://localhost/#access_token=&scope=x", DEFAULT_TOKEN_KEY),
			Err(RedirectParseError::EmptyToken)
		);
	}

	#[test]
	fn captured_watcher_is_inert() {
		let mut watcher = watcher();

		watcher.observe("https://localhost/#access_token");

		assert_eq!(watcher.state(), WatcherState::Captured);
		assert_eq!(watcher.observe("https://localhost/#access_token=late"), RedirectEvent::Ignored);
	}

	#[test]
	fn state_must_round_trip_when_expected() {
		let mut matching = watcher().expect_state("s1");

		assert_eq!(
			matching.observe("https://localhost/#access_token=abc&scope=&state=s1"),
			RedirectEvent::Captured(AccessToken::new("abc"))
		);

		let mut mismatched = watcher().expect_state("s1");

		assert_eq!(
			mismatched.observe("https://localhost/#access_token=abc&state=s2"),
			RedirectEvent::Rejected(RedirectParseError::StateMismatch)
		);

		let mut missing = watcher().expect_state("s1");

		assert_eq!(
			missing.observe("https://localhost/#access_token=abc"),
			RedirectEvent::Rejected(RedirectParseError::StateMismatch)
		);
	}
}
