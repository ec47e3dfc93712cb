//! Sign-in configuration (data) and its validating builder.
//!
//! [`SignInConfig`] captures everything deployment-specific about the flow: the client
//! identifier, provider endpoints, the redirect URI and the prefix that recognizes it, and the
//! attempt deadline. Defaults target Twitch's Kraken API and the `https://localhost` redirect
//! registered for desktop clients.

pub mod builder;

pub use builder::*;

// crates.io
use oauth2::RedirectUrl;
// self
use crate::{_prelude::*, auth::ClientId};

/// Default Kraken API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.twitch.tv/kraken";
/// Default implicit-grant authorization endpoint.
pub const DEFAULT_AUTHORIZE_ENDPOINT: &str = "https://api.twitch.tv/kraken/oauth2/authorize";
/// Default redirect URI registered with the application.
pub const DEFAULT_REDIRECT_URI: &str = "https://localhost";
/// Default prefix identifying the provider's redirect callback.
pub const DEFAULT_REDIRECT_PREFIX: &str = "https://localhost/#access_token";
/// Default marker preceding the token value in the redirect fragment.
pub const DEFAULT_TOKEN_KEY: &str = "access_token=";
/// Default time an attempt may wait for the redirect.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::minutes(10);

/// Immutable configuration consumed by the sign-in orchestrator.
#[derive(Clone, Debug)]
pub struct SignInConfig {
	/// Application client identifier.
	pub client_id: ClientId,
	/// Forces the provider to show the consent screen on every sign-in.
	pub force_verify: bool,
	/// REST API base URL that endpoint paths are appended to.
	pub api_base: Url,
	/// Authorization endpoint the browser is pointed at.
	pub authorize_endpoint: Url,
	/// Redirect URI sent with the authorization request, emitted verbatim.
	pub redirect_uri: RedirectUrl,
	/// Prefix a navigated URL must start with to count as the redirect callback.
	pub redirect_prefix: String,
	/// Marker preceding the token value inside the redirect URL.
	pub token_key: String,
	/// Scopes requested from the provider.
	pub scopes: Vec<String>,
	/// Adds a random `state` to the authorization request and requires the redirect to echo it.
	pub verify_state: bool,
	/// Sends the `Client-ID` header on API calls.
	pub send_client_id: bool,
	/// Maximum time an attempt may wait for the redirect (`None` waits forever).
	pub attempt_timeout: Option<Duration>,
}
impl SignInConfig {
	/// Creates a builder seeded with Twitch defaults.
	pub fn builder(client_id: impl AsRef<str>) -> SignInConfigBuilder {
		SignInConfigBuilder::new(client_id)
	}

	/// Builds the implicit-grant authorization URL, optionally carrying `state`.
	pub fn authorize_url(&self, state: Option<&str>) -> Url {
		let mut url = self.authorize_endpoint.clone();
		let mut pairs = url.query_pairs_mut();

		pairs.append_pair("response_type", "token");
		pairs.append_pair("client_id", &self.client_id);
		pairs.append_pair("redirect_uri", self.redirect_uri.as_str());

		if !self.scopes.is_empty() {
			pairs.append_pair("scope", &self.scopes.join(" "));
		}

		pairs.append_pair("force_verify", if self.force_verify { "true" } else { "false" });

		if let Some(state) = state {
			pairs.append_pair("state", state);
		}

		drop(pairs);

		url
	}
}
