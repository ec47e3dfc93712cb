// self
use crate::{_prelude::*, api::AuthorizedUser, obs::SignInStage, signin::AttemptId};

/// Future returned by [`StageSpan::instrument`]; a plain passthrough without `tracing`.
#[cfg(feature = "tracing")]
pub type InstrumentedStage<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`StageSpan::instrument`]; a plain passthrough without `tracing`.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedStage<F> = F;

/// `twitch_auth.sign_in` span for one stage of one attempt.
#[derive(Clone, Debug)]
pub struct StageSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl StageSpan {
	/// Opens the span with `stage` and `attempt` (rendered as `attempt-N`) fields.
	pub fn new(stage: SignInStage, attempt: AttemptId) -> Self {
		#[cfg(feature = "tracing")]
		{
			Self {
				span: tracing::info_span!(
					"twitch_auth.sign_in",
					stage = stage.as_str(),
					attempt = %attempt
				),
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (stage, attempt);

			Self {}
		}
	}

	/// Enters the span for a synchronous section.
	pub fn entered(self) -> StageSpanGuard {
		#[cfg(feature = "tracing")]
		{
			StageSpanGuard { _guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			StageSpanGuard {}
		}
	}

	/// Attaches the span to `fut`; nothing is held across its awaits.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedStage<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			tracing::Instrument::instrument(fut, self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Guard returned by [`StageSpan::entered`]; leaves the span on drop.
pub struct StageSpanGuard {
	#[cfg(feature = "tracing")]
	_guard: tracing::span::EnteredSpan,
}
impl Debug for StageSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("StageSpanGuard(..)")
	}
}

/// Warns about an attempt that ended in `error`. The token is never part of the event.
pub fn log_failure(stage: SignInStage, attempt: AttemptId, error: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(
			stage = stage.as_str(),
			%attempt,
			kind = error.kind().as_str(),
			%error,
			"Sign-in attempt failed."
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (stage, attempt, error);
	}
}

/// Notes a completion or browser call dropped because `attempt` is no longer current.
pub fn log_discarded(stage: SignInStage, attempt: AttemptId) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(stage = stage.as_str(), %attempt, "Discarded work for a stale attempt.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (stage, attempt);
	}
}

/// Records who signed in; only the public profile identifiers are logged.
pub fn log_signed_in(attempt: AttemptId, user: &AuthorizedUser) {
	#[cfg(feature = "tracing")]
	{
		tracing::info!(%attempt, user_id = %user.id, login = %user.name, "Sign-in completed.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (attempt, user);
	}
}
