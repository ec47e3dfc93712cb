//! Transport primitives for Kraken API calls.
//!
//! [`ApiHttpClient`] is the crate's only dependency on an HTTP stack. Implementations receive
//! an [`ApiRequest`] and must hand back an [`ApiExchange`] that echoes the request's endpoint
//! tag, so callers correlate responses from the exchange itself rather than from shared
//! "last request" state.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
#[cfg(feature = "reqwest")] use oauth2::{HttpRequest, HttpResponse};
// self
use crate::{
	_prelude::*,
	api::{ApiExchange, ApiRequest},
};
#[cfg(feature = "reqwest")] use crate::error::TransportError;

/// Boxed future returned by [`ApiHttpClient::execute`].
pub type ApiFuture<'a> = Pin<Box<dyn Future<Output = ApiExchange> + 'a + Send>>;

/// Abstraction over HTTP transports able to execute Kraken requests.
///
/// Implementations must be `Send + Sync + 'static` so one client can be shared by every sign-in
/// attempt an orchestrator runs. Transport failures are reported inside the returned
/// [`ApiExchange`], never by panicking; implementations must not retry or follow redirects on
/// the caller's behalf.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and resolves once the response body is fully read or the transport fails.
	fn execute(&self, request: ApiRequest) -> ApiFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The wrapped client is cloned per request (reqwest clients are reference counted), so one
/// instance can serve any number of attempts.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Debug for ReqwestHttpClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("ReqwestHttpClient(..)")
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	fn execute(&self, request: ApiRequest) -> ApiFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let (endpoint, verb, request) = request.into_parts();
			let outcome = send(&client, request).await;

			ApiExchange { endpoint, verb, outcome }
		})
	}
}

#[cfg(feature = "reqwest")]
async fn send(client: &ReqwestClient, request: HttpRequest) -> Result<HttpResponse, TransportError> {
	let response = client.execute(request.try_into()?).await?;
	let status = response.status();
	let headers = response.headers().to_owned();
	let mut response_new = HttpResponse::new(response.bytes().await?.to_vec());

	*response_new.status_mut() = status;
	*response_new.headers_mut() = headers;

	Ok(response_new)
}
