//! Static registry mapping logical endpoints to Kraken paths.

// crates.io
use oauth2::http::Method;
// self
use crate::_prelude::*;

/// API resource addressed by a request.
///
/// "No request yet" is `Option::<Endpoint>::None` at the call site; no URL exists for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
	/// Authenticated user profile.
	User,
	/// Channel resources.
	Channels,
	/// Subscription resources.
	Subscriptions,
}
impl Endpoint {
	/// Every addressable endpoint.
	pub const ALL: [Endpoint; 3] = [Endpoint::User, Endpoint::Channels, Endpoint::Subscriptions];

	/// Path appended to the API base URL.
	pub const fn path(self) -> &'static str {
		match self {
			Endpoint::User => "/user",
			Endpoint::Channels => "/channels",
			Endpoint::Subscriptions => "/subscriptions",
		}
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Endpoint::User => "user",
			Endpoint::Channels => "channels",
			Endpoint::Subscriptions => "subscriptions",
		}
	}

	/// Concatenates the API base with this endpoint's path.
	///
	/// Plain concatenation (not [`Url::join`]) keeps base paths such as `/kraken` intact.
	pub fn url(self, base: &Url) -> String {
		format!("{}{}", base.as_str().trim_end_matches('/'), self.path())
	}
}
impl Display for Endpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Resolves the URL path for an endpoint.
pub const fn resolve_path(endpoint: Endpoint) -> &'static str {
	endpoint.path()
}

/// HTTP verbs the request builder can emit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
	#[default]
	/// `GET`.
	Get,
	/// `POST`.
	Post,
	/// `PUT`.
	Put,
	/// `PATCH`.
	Patch,
	/// `DELETE`.
	Delete,
}
impl HttpVerb {
	/// Returns the method token as sent on the wire.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpVerb::Get => "GET",
			HttpVerb::Post => "POST",
			HttpVerb::Put => "PUT",
			HttpVerb::Patch => "PATCH",
			HttpVerb::Delete => "DELETE",
		}
	}

	/// Converts into the `http` crate's method type.
	pub fn method(self) -> Method {
		match self {
			HttpVerb::Get => Method::GET,
			HttpVerb::Post => Method::POST,
			HttpVerb::Put => Method::PUT,
			HttpVerb::Patch => Method::PATCH,
			HttpVerb::Delete => Method::DELETE,
		}
	}
}
impl Display for HttpVerb {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn every_endpoint_resolves_to_a_rooted_path() {
		for endpoint in Endpoint::ALL {
			assert!(resolve_path(endpoint).starts_with('/'), "{endpoint} path must be rooted.");
		}

		assert_eq!(resolve_path(Endpoint::User), "/user");
	}

	#[test]
	fn url_keeps_base_path_segments() {
		let base = Url::parse("https://api.twitch.tv/kraken").expect("Base URL should parse.");

		assert_eq!(Endpoint::User.url(&base), "https://api.twitch.tv/kraken/user");

		let trailing = Url::parse("http://127.0.0.1:8080").expect("Loopback URL should parse.");

		assert_eq!(Endpoint::Channels.url(&trailing), "http://127.0.0.1:8080/channels");
	}

	#[test]
	fn verbs_map_onto_http_methods() {
		assert_eq!(HttpVerb::default(), HttpVerb::Get);
		assert_eq!(HttpVerb::Patch.method(), Method::PATCH);
		assert_eq!(HttpVerb::Delete.method().as_str(), HttpVerb::Delete.as_str());
	}
}
