//! Crate-level error types shared by the request pipeline, the redirect watcher, and the
//! sign-in orchestrator.

// self
use crate::{_prelude::*, api::Endpoint, auth::IdentifierError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The request never completed (DNS, TCP, TLS, body read).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// A response arrived but its status is outside `200..=299`.
	#[error("The {endpoint} endpoint responded with HTTP {status}.")]
	HttpStatus {
		/// Endpoint the failing request targeted.
		endpoint: Endpoint,
		/// HTTP status code returned by the API.
		status: u16,
	},
	/// The response body could not be decoded into the expected record.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// The redirect matched but carried no usable access token.
	#[error(transparent)]
	RedirectParse(#[from] RedirectParseError),

	/// A sign-in attempt is already awaiting the redirect or fetching the profile.
	#[error("A sign-in attempt is already in progress ({state}).")]
	AttemptInProgress {
		/// Label of the state the running attempt is in.
		state: &'static str,
	},
	/// An authenticated call was requested before any token was captured.
	#[error("No access token is available; complete a sign-in first.")]
	NotSignedIn,
	/// The attempt was cancelled by the caller.
	#[error("The sign-in attempt was cancelled.")]
	Cancelled,
	/// The user never completed the provider login before the attempt deadline.
	#[error("The sign-in attempt timed out while awaiting the redirect.")]
	TimedOut,
}
impl Error {
	/// Returns the stable failure label for this error.
	pub fn kind(&self) -> FailureKind {
		match self {
			Self::Config(_) => FailureKind::Config,
			Self::Transport(_) => FailureKind::Transport,
			Self::HttpStatus { .. } => FailureKind::HttpStatus,
			Self::Decode(_) => FailureKind::Decode,
			Self::RedirectParse(_) => FailureKind::RedirectParse,
			Self::AttemptInProgress { .. } => FailureKind::AttemptInProgress,
			Self::NotSignedIn => FailureKind::NotSignedIn,
			Self::Cancelled => FailureKind::Cancelled,
			Self::TimedOut => FailureKind::TimedOut,
		}
	}
}

/// Copyable failure label carried by terminal sign-in states, logs, and metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureKind {
	/// See [`Error::Config`].
	Config,
	/// See [`Error::Transport`].
	Transport,
	/// See [`Error::HttpStatus`].
	HttpStatus,
	/// See [`Error::Decode`].
	Decode,
	/// See [`Error::RedirectParse`].
	RedirectParse,
	/// See [`Error::AttemptInProgress`].
	AttemptInProgress,
	/// See [`Error::NotSignedIn`].
	NotSignedIn,
	/// See [`Error::Cancelled`].
	Cancelled,
	/// See [`Error::TimedOut`].
	TimedOut,
}
impl FailureKind {
	/// Returns a stable label suitable for span, log, or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Config => "config",
			Self::Transport => "transport",
			Self::HttpStatus => "http_status",
			Self::Decode => "decode",
			Self::RedirectParse => "redirect_parse",
			Self::AttemptInProgress => "attempt_in_progress",
			Self::NotSignedIn => "not_signed_in",
			Self::Cancelled => "cancelled",
			Self::TimedOut => "timed_out",
		}
	}
}
impl Display for FailureKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// A configured URL cannot be parsed.
	#[error("The {field} URL is invalid.")]
	InvalidUrl {
		/// Configuration field holding the URL.
		field: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A configured endpoint does not use HTTPS and is not a loopback host.
	#[error("The {field} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Configuration field holding the URL.
		field: &'static str,
		/// URL that failed validation.
		url: String,
	},
	/// Client identifier failed validation.
	#[error(transparent)]
	InvalidClientId(#[from] IdentifierError),
	/// Redirect prefix or token marker is empty.
	#[error("The {field} value cannot be empty.")]
	EmptyRedirectMatcher {
		/// Configuration field that was empty.
		field: &'static str,
	},
	/// Attempt timeout is zero or negative.
	#[error("The attempt timeout must be positive.")]
	NonPositiveTimeout,
	/// Scope contains whitespace and would break the space-joined `scope` parameter.
	#[error("Scope `{scope}` is empty or contains whitespace.")]
	InvalidScope {
		/// Offending scope value.
		scope: String,
	},
	/// Bearer token contains bytes that cannot be sent in a header.
	#[error("The access token cannot be encoded as an HTTP header value.")]
	InvalidTokenHeader,
}
/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the Twitch API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the Twitch API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Response body could not be mapped onto the target record.
#[derive(Debug, ThisError)]
#[error("The {endpoint} endpoint returned a body that could not be decoded at `{}`.", .source.path())]
pub struct DecodeError {
	/// Endpoint the response belongs to.
	pub endpoint: Endpoint,
	/// HTTP status of the decoded response.
	pub status: u16,
	/// Structured parsing failure, including the JSON path.
	#[source]
	pub source: serde_path_to_error::Error<serde_json::Error>,
}

/// Redirect URL matched the callback prefix but did not carry a usable token.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum RedirectParseError {
	/// The `access_token=` marker is absent (the provider returned an error instead).
	#[error("Redirect URI does not contain the `{marker}` marker.")]
	MissingToken {
		/// Marker that was searched for.
		marker: String,
	},
	/// The marker is present but its value is empty.
	#[error("Redirect URI carries an empty access token.")]
	EmptyToken,
	/// The echoed `state` does not match the value sent with the authorize URL.
	#[error("Redirect URI state does not match the authorization request.")]
	StateMismatch,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn kinds_keep_status_and_decode_failures_apart() {
		let status = Error::HttpStatus { endpoint: Endpoint::User, status: 403 };
		let parsed: std::result::Result<Vec<u8>, _> =
			serde_path_to_error::deserialize(&mut serde_json::Deserializer::from_str("{"));
		let source = parsed.expect_err("Truncated JSON must fail to decode.");
		let decode = Error::from(DecodeError { endpoint: Endpoint::User, status: 200, source });

		assert_eq!(status.kind(), FailureKind::HttpStatus);
		assert_eq!(decode.kind(), FailureKind::Decode);
		assert_ne!(status.kind(), decode.kind());
		assert_eq!(status.to_string(), "The user endpoint responded with HTTP 403.");
	}

	#[test]
	fn redirect_errors_convert_into_crate_error() {
		let err = Error::from(RedirectParseError::EmptyToken);

		assert_eq!(err.kind(), FailureKind::RedirectParse);
		assert_eq!(FailureKind::RedirectParse.to_string(), "redirect_parse");
	}
}
