//! Outbound request construction.

// crates.io
use oauth2::{
	HttpRequest,
	http::{
		Request,
		header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderValue},
	},
};
// self
use crate::{
	_prelude::*,
	api::{API_VERSION_ACCEPT, Endpoint, HttpVerb},
	auth::{AccessToken, ClientId},
	error::ConfigError,
};

const CLIENT_ID_HEADER: &str = "client-id";

/// HTTP request tagged with the endpoint it targets.
///
/// Building a request has no side effects; transports consume it through
/// [`ApiHttpClient::execute`](crate::http::ApiHttpClient::execute).
#[derive(Debug)]
pub struct ApiRequest {
	endpoint: Endpoint,
	verb: HttpVerb,
	inner: HttpRequest,
}
impl ApiRequest {
	/// Starts a builder for `verb` against `endpoint` under `base`.
	pub fn builder(base: &Url, endpoint: Endpoint, verb: HttpVerb) -> ApiRequestBuilder<'_> {
		ApiRequestBuilder::new(base, endpoint, verb)
	}

	/// Endpoint this request targets.
	pub fn endpoint(&self) -> Endpoint {
		self.endpoint
	}

	/// HTTP verb of this request.
	pub fn verb(&self) -> HttpVerb {
		self.verb
	}

	/// Underlying `http` request.
	pub fn http(&self) -> &HttpRequest {
		&self.inner
	}

	/// Splits the request into its tag and the `http` request.
	pub fn into_parts(self) -> (Endpoint, HttpVerb, HttpRequest) {
		(self.endpoint, self.verb, self.inner)
	}
}

/// Builder for [`ApiRequest`] values.
#[derive(Debug)]
pub struct ApiRequestBuilder<'a> {
	base: &'a Url,
	endpoint: Endpoint,
	verb: HttpVerb,
	bearer: Option<&'a AccessToken>,
	client_id: Option<&'a ClientId>,
	body: Vec<u8>,
}
impl<'a> ApiRequestBuilder<'a> {
	fn new(base: &'a Url, endpoint: Endpoint, verb: HttpVerb) -> Self {
		Self { base, endpoint, verb, bearer: None, client_id: None, body: Vec::new() }
	}

	/// Attaches `Authorization: OAuth <token>`.
	pub fn bearer(mut self, token: Option<&'a AccessToken>) -> Self {
		self.bearer = token;

		self
	}

	/// Attaches the `Client-ID` header.
	pub fn client_id(mut self, client_id: Option<&'a ClientId>) -> Self {
		self.client_id = client_id;

		self
	}

	/// Sets a JSON request body (used by the write verbs).
	pub fn json_body(mut self, body: Vec<u8>) -> Self {
		self.body = body;

		self
	}

	/// Consumes the builder and assembles the request.
	pub fn build(self) -> Result<ApiRequest> {
		let mut builder = Request::builder()
			.method(self.verb.method())
			.uri(self.endpoint.url(self.base))
			.header(ACCEPT, HeaderValue::from_static(API_VERSION_ACCEPT));

		if let Some(token) = self.bearer {
			let mut value = HeaderValue::try_from(token.authorization_value())
				.map_err(|_| ConfigError::InvalidTokenHeader)?;

			value.set_sensitive(true);

			builder = builder.header(AUTHORIZATION, value);
		}
		if let Some(client_id) = self.client_id {
			let value = HeaderValue::try_from(client_id.as_ref())
				.map_err(|e| ConfigError::HttpRequest(e.into()))?;

			builder = builder.header(CLIENT_ID_HEADER, value);
		}
		if !self.body.is_empty() {
			builder = builder.header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		}

		let inner = builder.body(self.body).map_err(ConfigError::from)?;

		Ok(ApiRequest { endpoint: self.endpoint, verb: self.verb, inner })
	}
}

/// Builds a request for `endpoint` with `verb`, optionally carrying `bearer`.
///
/// The Kraken version header is always set; the `Authorization` header uses the legacy `OAuth`
/// scheme rather than `Bearer`.
pub fn build_request(
	base: &Url,
	endpoint: Endpoint,
	verb: HttpVerb,
	bearer: Option<&AccessToken>,
) -> Result<ApiRequest> {
	ApiRequest::builder(base, endpoint, verb).bearer(bearer).build()
}
