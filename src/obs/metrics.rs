// self
use crate::obs::{SignInStage, StageOutcome};

const SIGN_IN_TOTAL: &str = "twitch_auth_sign_in_total";

/// Counts one stage outcome on the global metrics recorder (when enabled).
///
/// Failures add a `kind` label so status and decode failures stay separate series.
pub fn record_stage_outcome(stage: SignInStage, outcome: StageOutcome) {
	#[cfg(feature = "metrics")]
	{
		match outcome.failure_kind() {
			Some(kind) => metrics::counter!(
				SIGN_IN_TOTAL,
				"stage" => stage.as_str(),
				"outcome" => outcome.as_str(),
				"kind" => kind.as_str()
			)
			.increment(1),
			None => metrics::counter!(
				SIGN_IN_TOTAL,
				"stage" => stage.as_str(),
				"outcome" => outcome.as_str()
			)
			.increment(1),
		}
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (SIGN_IN_TOTAL, stage, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::FailureKind;

	#[test]
	fn failures_carry_their_kind() {
		let outcome = StageOutcome::Failure(FailureKind::Decode);

		assert_eq!(outcome.as_str(), "failure");
		assert_eq!(outcome.failure_kind(), Some(FailureKind::Decode));
		assert_eq!(outcome.to_string(), "failure(decode)");
		assert_eq!(StageOutcome::Success.failure_kind(), None);

		record_stage_outcome(SignInStage::Profile, outcome);
		record_stage_outcome(SignInStage::Authorize, StageOutcome::Attempt);
	}
}
