//! Host collaborator contracts: the embedded browser and the completion listener.

// self
use crate::{_prelude::*, api::AuthorizedUser, error::FailureKind};

/// Embedded browser supplied by the host.
///
/// The host forwards every navigation back through
/// [`SignInOrchestrator::on_url_changed`](crate::signin::SignInOrchestrator::on_url_changed).
/// Both calls are made without holding the state lock, and the browser turn they do hold is
/// reentrant, so implementations may call back into the orchestrator from the same thread.
pub trait AuthBrowser
where
	Self: Send + Sync,
{
	/// Shows an interactive web view at `url`.
	fn render_auth_url(&self, url: &Url);

	/// Closes or detaches the web view.
	fn dismiss_auth_url(&self);
}

/// Completion hook registered by the host.
pub trait SignInListener
where
	Self: Send + Sync,
{
	/// Fired exactly once per successful attempt, after the user record is updated.
	fn on_signed_in(&self, user: &AuthorizedUser);

	/// Fired when an attempt ends in `Errored`. Defaults to a no-op.
	fn on_failed(&self, _kind: FailureKind) {}
}
impl<F> SignInListener for F
where
	F: Fn(&AuthorizedUser) + Send + Sync,
{
	fn on_signed_in(&self, user: &AuthorizedUser) {
		self(user)
	}
}
