//! Response validation and JSON decoding.

// crates.io
use oauth2::HttpResponse;
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	api::{Endpoint, HttpVerb},
	error::{DecodeError, TransportError},
};

/// Parsing failure reported by [`decode`], including the JSON path that failed.
pub type JsonPathError = serde_path_to_error::Error<serde_json::Error>;

/// Completed request: the endpoint tag it was issued for plus the transport outcome.
#[derive(Debug)]
pub struct ApiExchange {
	/// Endpoint echoed from the originating request.
	pub endpoint: Endpoint,
	/// Verb echoed from the originating request.
	pub verb: HttpVerb,
	/// Response, or the reason the request never completed.
	pub outcome: Result<HttpResponse, TransportError>,
}
impl ApiExchange {
	/// Returns `true` when the transport completed and the status is 2xx.
	pub fn is_valid(&self) -> bool {
		is_valid(self.outcome.as_ref().ok(), self.outcome.is_ok())
	}

	/// Returns the HTTP status, when a response arrived.
	pub fn status(&self) -> Option<u16> {
		self.outcome.as_ref().ok().map(|response| response.status().as_u16())
	}

	/// Runs the validity gate, returning the response or the matching error.
	pub fn into_response(self) -> Result<HttpResponse> {
		let response = self.outcome?;
		let status = response.status().as_u16();

		if !is_valid(Some(&response), true) {
			return Err(Error::HttpStatus { endpoint: self.endpoint, status });
		}

		Ok(response)
	}

	/// Validates the exchange and decodes its body into `T`.
	///
	/// Validation always runs first, so a non-2xx body is never decoded.
	pub fn decode<T>(self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let endpoint = self.endpoint;
		let response = self.into_response()?;
		let status = response.status().as_u16();

		decode(response.body()).map_err(|source| DecodeError { endpoint, status, source }.into())
	}
}

/// Checks transport success and a `200..=299` status.
pub fn is_valid(response: Option<&HttpResponse>, transport_succeeded: bool) -> bool {
	if !transport_succeeded {
		return false;
	}

	response.is_some_and(|response| response.status().is_success())
}

/// Decodes a JSON body into `T`.
///
/// Unknown fields are ignored; whether missing fields fall back to defaults is up to `T` (the
/// crate's records opt in with `#[serde(default)]`).
pub fn decode<T>(body: &[u8]) -> Result<T, JsonPathError>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::api::AuthorizedUser;

	fn response(status: u16, body: &str) -> HttpResponse {
		let mut response = HttpResponse::new(body.as_bytes().to_vec());

		*response.status_mut() =
			oauth2::http::StatusCode::from_u16(status).expect("Status fixture should be valid.");

		response
	}

	fn exchange(status: u16, body: &str) -> ApiExchange {
		ApiExchange {
			endpoint: Endpoint::User,
			verb: HttpVerb::Get,
			outcome: Ok(response(status, body)),
		}
	}

	#[test]
	fn validity_gate_covers_status_ranges_and_transport() {
		for status in [200, 201, 204, 299] {
			assert!(is_valid(Some(&response(status, "")), true), "{status} should be valid.");
		}
		for status in [199, 300, 401, 403, 404, 500] {
			assert!(!is_valid(Some(&response(status, "")), true), "{status} should be invalid.");
		}

		assert!(!is_valid(Some(&response(200, "")), false));
		assert!(!is_valid(None, true));
		assert!(!is_valid(None, false));
	}

	#[test]
	fn missing_fields_take_defaults() {
		let user: AuthorizedUser = decode(br#"{"_id":"1","display_name":"Foo","extra":true}"#)
			.expect("Partial profile should decode.");

		assert_eq!(user.id, "1");
		assert_eq!(user.display_name, "Foo");
		assert_eq!(user.name, "");
		assert_eq!(user.bio, "");
		assert_eq!(user.email, "");
	}

	#[test]
	fn status_errors_win_over_decode_errors() {
		let err = exchange(403, "not json")
			.decode::<AuthorizedUser>()
			.expect_err("Forbidden responses must fail validation.");

		assert!(matches!(err, Error::HttpStatus { endpoint: Endpoint::User, status: 403 }));
	}

	#[test]
	fn malformed_bodies_report_decode_errors() {
		let err = exchange(200, "{\"_id\":")
			.decode::<AuthorizedUser>()
			.expect_err("Truncated JSON must fail to decode.");

		match err {
			Error::Decode(DecodeError { endpoint, status, .. }) => {
				assert_eq!(endpoint, Endpoint::User);
				assert_eq!(status, 200);
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn transport_failures_are_invalid() {
		let exchange = ApiExchange {
			endpoint: Endpoint::Channels,
			verb: HttpVerb::Get,
			outcome: Err(TransportError::Io(std::io::Error::other("connection reset"))),
		};

		assert!(!exchange.is_valid());
		assert_eq!(exchange.status(), None);
		assert!(matches!(exchange.into_response(), Err(Error::Transport(_))));
	}
}
