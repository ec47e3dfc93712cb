//! Attempt identifiers and the orchestrator state machine labels.

// self
use crate::{_prelude::*, error::FailureKind};

/// Monotonic identifier of one sign-in attempt within an orchestrator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttemptId(pub(crate) u64);
impl AttemptId {
	/// Raw attempt counter (starts at 1).
	pub fn get(self) -> u64 {
		self.0
	}
}
impl Display for AttemptId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "attempt-{}", self.0)
	}
}

/// Orchestrator lifecycle.
///
/// `Idle -> AwaitingRedirect -> FetchingProfile -> SignedIn`, with `Errored` reachable from
/// both in-flight states. `SignedIn` and `Errored` end an attempt; a new attempt may start
/// from either of them or from `Idle`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SignInState {
	#[default]
	/// No attempt has started yet.
	Idle,
	/// The browser shows the authorization page; waiting for the redirect.
	AwaitingRedirect,
	/// Token captured; the profile request is in flight.
	FetchingProfile,
	/// The last attempt populated the user record.
	SignedIn,
	/// The last attempt failed for the given reason.
	Errored(FailureKind),
}
impl SignInState {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			SignInState::Idle => "idle",
			SignInState::AwaitingRedirect => "awaiting_redirect",
			SignInState::FetchingProfile => "fetching_profile",
			SignInState::SignedIn => "signed_in",
			SignInState::Errored(_) => "errored",
		}
	}

	/// Returns `true` while an attempt is awaiting the redirect or fetching the profile.
	pub const fn is_in_flight(self) -> bool {
		matches!(self, SignInState::AwaitingRedirect | SignInState::FetchingProfile)
	}
}
impl Display for SignInState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			SignInState::Errored(kind) => write!(f, "errored({kind})"),
			other => f.write_str(other.as_str()),
		}
	}
}
