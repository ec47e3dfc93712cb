//! Optional observability helpers for sign-in attempts.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `twitch_auth.sign_in` with the `stage` and
//!   `attempt` fields, plus warn/debug events for failed or discarded attempts.
//! - Enable `metrics` to increment the `twitch_auth_sign_in_total` counter for every
//!   attempt/success/failure, labeled by `stage` + `outcome` (failures also carry `kind`).

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::{_prelude::*, error::FailureKind};

/// Sign-in stages observed by the orchestrator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignInStage {
	/// Authorization URL handed to the browser.
	Authorize,
	/// Redirect callback inspection.
	Redirect,
	/// Authenticated profile request.
	Profile,
}
impl SignInStage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			SignInStage::Authorize => "authorize",
			SignInStage::Redirect => "redirect",
			SignInStage::Profile => "profile",
		}
	}
}
impl Display for SignInStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageOutcome {
	/// Entry to a stage.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure that ended the attempt, with its label.
	Failure(FailureKind),
}
impl StageOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StageOutcome::Attempt => "attempt",
			StageOutcome::Success => "success",
			StageOutcome::Failure(_) => "failure",
		}
	}

	/// Failure label carried by [`StageOutcome::Failure`].
	pub const fn failure_kind(self) -> Option<FailureKind> {
		match self {
			StageOutcome::Failure(kind) => Some(kind),
			_ => None,
		}
	}
}
impl Display for StageOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			StageOutcome::Failure(kind) => write!(f, "failure({kind})"),
			other => f.write_str(other.as_str()),
		}
	}
}
