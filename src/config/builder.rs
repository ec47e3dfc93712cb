//! Validating builder for [`SignInConfig`](crate::config::SignInConfig).

// crates.io
use oauth2::RedirectUrl;
use url::Host;
// self
use crate::{
	_prelude::*,
	auth::ClientId,
	config::{
		DEFAULT_API_BASE, DEFAULT_ATTEMPT_TIMEOUT, DEFAULT_AUTHORIZE_ENDPOINT,
		DEFAULT_REDIRECT_PREFIX, DEFAULT_REDIRECT_URI, DEFAULT_TOKEN_KEY, SignInConfig,
	},
	error::ConfigError,
};

/// Builder for [`SignInConfig`] values.
///
/// URLs are kept as raw strings until [`build`](SignInConfigBuilder::build) so parse failures
/// surface together with the field they came from.
#[derive(Debug)]
pub struct SignInConfigBuilder {
	/// Raw client identifier.
	pub client_id: String,
	/// See [`SignInConfig::force_verify`].
	pub force_verify: bool,
	/// Raw API base URL.
	pub api_base: String,
	/// Raw authorization endpoint.
	pub authorize_endpoint: String,
	/// Raw redirect URI.
	pub redirect_uri: String,
	/// See [`SignInConfig::redirect_prefix`].
	pub redirect_prefix: String,
	/// See [`SignInConfig::token_key`].
	pub token_key: String,
	/// See [`SignInConfig::scopes`].
	pub scopes: Vec<String>,
	/// See [`SignInConfig::verify_state`].
	pub verify_state: bool,
	/// See [`SignInConfig::send_client_id`].
	pub send_client_id: bool,
	/// See [`SignInConfig::attempt_timeout`].
	pub attempt_timeout: Option<Duration>,
}
impl SignInConfigBuilder {
	/// Creates a new builder seeded with Twitch defaults.
	pub fn new(client_id: impl AsRef<str>) -> Self {
		Self {
			client_id: client_id.as_ref().to_owned(),
			force_verify: true,
			api_base: DEFAULT_API_BASE.into(),
			authorize_endpoint: DEFAULT_AUTHORIZE_ENDPOINT.into(),
			redirect_uri: DEFAULT_REDIRECT_URI.into(),
			redirect_prefix: DEFAULT_REDIRECT_PREFIX.into(),
			token_key: DEFAULT_TOKEN_KEY.into(),
			scopes: Vec::new(),
			verify_state: false,
			send_client_id: true,
			attempt_timeout: Some(DEFAULT_ATTEMPT_TIMEOUT),
		}
	}

	/// Sets the force-verify flag.
	pub fn force_verify(mut self, force_verify: bool) -> Self {
		self.force_verify = force_verify;

		self
	}

	/// Overrides the API base URL.
	pub fn api_base(mut self, url: impl Into<String>) -> Self {
		self.api_base = url.into();

		self
	}

	/// Overrides the authorization endpoint.
	pub fn authorize_endpoint(mut self, url: impl Into<String>) -> Self {
		self.authorize_endpoint = url.into();

		self
	}

	/// Overrides the redirect URI and the prefix that recognizes it.
	pub fn redirect(mut self, uri: impl Into<String>, prefix: impl Into<String>) -> Self {
		self.redirect_uri = uri.into();
		self.redirect_prefix = prefix.into();

		self
	}

	/// Overrides the marker preceding the token value.
	pub fn token_key(mut self, key: impl Into<String>) -> Self {
		self.token_key = key.into();

		self
	}

	/// Replaces the requested scopes.
	pub fn scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = scopes.into_iter().map(Into::into).collect();

		self
	}

	/// Enables or disables `state` round-trip verification.
	pub fn verify_state(mut self, verify_state: bool) -> Self {
		self.verify_state = verify_state;

		self
	}

	/// Enables or disables the `Client-ID` header.
	pub fn send_client_id(mut self, send_client_id: bool) -> Self {
		self.send_client_id = send_client_id;

		self
	}

	/// Overrides the attempt timeout (`None` disables it).
	pub fn attempt_timeout(mut self, timeout: Option<Duration>) -> Self {
		self.attempt_timeout = timeout;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<SignInConfig, ConfigError> {
		let client_id = ClientId::new(&self.client_id)?;
		let api_base = parse_endpoint("api_base", &self.api_base)?;
		let authorize_endpoint = parse_endpoint("authorize_endpoint", &self.authorize_endpoint)?;
		let redirect_uri = RedirectUrl::new(self.redirect_uri)
			.map_err(|source| ConfigError::InvalidUrl { field: "redirect_uri", source })?;

		if self.redirect_prefix.is_empty() {
			return Err(ConfigError::EmptyRedirectMatcher { field: "redirect_prefix" });
		}
		if self.token_key.is_empty() {
			return Err(ConfigError::EmptyRedirectMatcher { field: "token_key" });
		}
		if let Some(scope) =
			self.scopes.iter().find(|scope| scope.is_empty() || scope.contains(char::is_whitespace))
		{
			return Err(ConfigError::InvalidScope { scope: scope.clone() });
		}
		if self.attempt_timeout.is_some_and(|timeout| !timeout.is_positive()) {
			return Err(ConfigError::NonPositiveTimeout);
		}

		Ok(SignInConfig {
			client_id,
			force_verify: self.force_verify,
			api_base,
			authorize_endpoint,
			redirect_uri,
			redirect_prefix: self.redirect_prefix,
			token_key: self.token_key,
			scopes: self.scopes,
			verify_state: self.verify_state,
			send_client_id: self.send_client_id,
			attempt_timeout: self.attempt_timeout,
		})
	}
}

fn parse_endpoint(field: &'static str, raw: &str) -> Result<Url, ConfigError> {
	let url = Url::parse(raw).map_err(|source| ConfigError::InvalidUrl { field, source })?;

	if url.scheme() == "https" || (url.scheme() == "http" && is_loopback(&url)) {
		Ok(url)
	} else {
		Err(ConfigError::InsecureEndpoint { field, url: url.to_string() })
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(Host::Ipv4(ip)) => ip.is_loopback(),
		Some(Host::Ipv6(ip)) => ip.is_loopback(),
		None => false,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_target_kraken() {
		let config = SignInConfig::builder("client-123").build().expect("Defaults should build.");

		assert_eq!(config.api_base.as_str(), DEFAULT_API_BASE);
		assert_eq!(config.redirect_uri.as_str(), DEFAULT_REDIRECT_URI);
		assert_eq!(config.redirect_prefix, DEFAULT_REDIRECT_PREFIX);
		assert_eq!(config.token_key, DEFAULT_TOKEN_KEY);
		assert!(config.force_verify);
		assert!(!config.verify_state);
		assert_eq!(config.attempt_timeout, Some(DEFAULT_ATTEMPT_TIMEOUT));
	}

	#[test]
	fn rejects_insecure_non_loopback_endpoints() {
		let err = SignInConfig::builder("client-123")
			.api_base("http://api.twitch.tv/kraken")
			.build()
			.expect_err("Plain HTTP must be rejected for remote hosts.");

		assert!(matches!(err, ConfigError::InsecureEndpoint { field: "api_base", .. }));

		SignInConfig::builder("client-123")
			.api_base("http://127.0.0.1:4010")
			.authorize_endpoint("http://localhost:4010/authorize")
			.build()
			.expect("Loopback HTTP endpoints should be accepted.");
	}

	#[test]
	fn rejects_blank_inputs() {
		assert!(matches!(
			SignInConfig::builder("").build(),
			Err(ConfigError::InvalidClientId(_))
		));
		assert!(matches!(
			SignInConfig::builder("client").redirect("https://localhost", "").build(),
			Err(ConfigError::EmptyRedirectMatcher { field: "redirect_prefix" })
		));
		assert!(matches!(
			SignInConfig::builder("client").token_key("").build(),
			Err(ConfigError::EmptyRedirectMatcher { field: "token_key" })
		));
		assert!(matches!(
			SignInConfig::builder("client").scopes(["user read"]).build(),
			Err(ConfigError::InvalidScope { .. })
		));
		assert!(matches!(
			SignInConfig::builder("client").attempt_timeout(Some(Duration::ZERO)).build(),
			Err(ConfigError::NonPositiveTimeout)
		));
		assert!(matches!(
			SignInConfig::builder("client").authorize_endpoint("not a url").build(),
			Err(ConfigError::InvalidUrl { field: "authorize_endpoint", .. })
		));
	}
}
