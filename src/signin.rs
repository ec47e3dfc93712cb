//! Sign-in orchestration for the implicit grant.
//!
//! [`SignInOrchestrator`] drives one attempt at a time: it hands the authorization URL to the
//! host's [`AuthBrowser`], feeds every reported navigation into a fresh
//! [`RedirectWatcher`], and, once the token is captured, fetches `GET /user` and publishes the
//! decoded [`AuthorizedUser`].
//!
//! # Attempt policy
//!
//! - Starting while an attempt is `AwaitingRedirect` or `FetchingProfile` is rejected with
//!   [`Error::AttemptInProgress`]. An `AwaitingRedirect` attempt past its deadline is expired
//!   first, so an abandoned browser never blocks a new start.
//! - [`cancel_sign_in`](SignInOrchestrator::cancel_sign_in) ends the running attempt; a profile
//!   response that completes afterwards is discarded.
//! - All state transitions happen under one lock; the browser, the listener, and the transport
//!   are always called with that lock released.
//! - Browser calls are ordered by attempt. A render needs an attempt newer than every earlier
//!   browser call and a dismiss needs the same or a newer one, so a late dismiss from an ended
//!   attempt never closes the page of the attempt that replaced it.

pub mod hooks;
pub mod state;

pub use hooks::*;
pub use state::*;

// std
use std::cell::Cell;
// crates.io
use parking_lot::ReentrantMutex;
use rand::{Rng, distr::Alphanumeric};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	api::{ApiRequest, AuthorizedUser, Endpoint, HttpVerb},
	auth::AccessToken,
	config::SignInConfig,
	http::ApiHttpClient,
	obs::{self, SignInStage, StageOutcome, StageSpan},
	redirect::{RedirectEvent, RedirectWatcher},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

const STATE_LEN: usize = 32;

#[cfg(feature = "reqwest")]
/// Orchestrator specialized for the crate's default reqwest transport.
pub type ReqwestSignIn = SignInOrchestrator<ReqwestHttpClient>;

/// Drives the implicit-grant sign-in and owns the resulting user record.
pub struct SignInOrchestrator<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// HTTP client shared by every attempt and by [`fetch`](Self::fetch).
	pub http_client: Arc<C>,
	/// Validated configuration.
	pub config: Arc<SignInConfig>,
	browser: Arc<dyn AuthBrowser>,
	listener: Option<Arc<dyn SignInListener>>,
	inner: Arc<Mutex<Inner>>,
	// Attempt that made the latest browser call; reentrant so hooks may call back in.
	browser_turn: Arc<ReentrantMutex<Cell<u64>>>,
}
impl<C> SignInOrchestrator<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates an idle orchestrator using the caller-provided transport.
	pub fn with_http_client(
		config: SignInConfig,
		http_client: impl Into<Arc<C>>,
		browser: Arc<dyn AuthBrowser>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			config: Arc::new(config),
			browser,
			listener: None,
			inner: Default::default(),
			browser_turn: Default::default(),
		}
	}

	/// Registers the completion listener.
	pub fn with_listener(mut self, listener: impl SignInListener + 'static) -> Self {
		self.listener = Some(Arc::new(listener));

		self
	}

	/// Starts an attempt: computes the authorization URL and asks the browser to render it.
	///
	/// Returns immediately; completion is observed through the listener or by polling
	/// [`state`](Self::state) and [`current_user`](Self::current_user).
	pub fn start_sign_in(&self) -> Result<AttemptId> {
		const STAGE: SignInStage = SignInStage::Authorize;

		let now = OffsetDateTime::now_utc();

		self.expire_stale(now);

		let (id, url) = {
			let mut guard = self.inner.lock();
			let inner = &mut *guard;

			if inner.state.is_in_flight() {
				return Err(Error::AttemptInProgress { state: inner.state.as_str() });
			}

			inner.next_attempt += 1;

			let id = AttemptId(inner.next_attempt);
			let state = self.config.verify_state.then(random_state);
			let mut watcher = RedirectWatcher::from_config(&self.config);

			if let Some(state) = &state {
				watcher = watcher.expect_state(state.as_str());
			}

			let url = self.config.authorize_url(state.as_deref());

			inner.attempt = Some(Attempt { id, watcher, started_at: now });
			inner.state = SignInState::AwaitingRedirect;
			inner.authorize_url = Some(url.clone());

			(id, url)
		};
		let _span = StageSpan::new(STAGE, id).entered();

		obs::record_stage_outcome(STAGE, StageOutcome::Attempt);

		if self.render_for(id, &url) {
			obs::record_stage_outcome(STAGE, StageOutcome::Success);
		} else {
			obs::log_discarded(STAGE, id);
		}

		Ok(id)
	}

	/// Feeds one navigation reported by the browser and returns the resulting state.
	///
	/// When the navigation is the redirect callback, the browser is dismissed and the profile is
	/// fetched before this future resolves. Failures never escape; they end the attempt in
	/// [`SignInState::Errored`].
	pub async fn on_url_changed(&self, url: &str) -> SignInState {
		match self.observe_navigation(url, OffsetDateTime::now_utc()) {
			Navigation::Settled(state) => state,
			Navigation::Captured { attempt, token } => self.fetch_profile(attempt, token).await,
		}
	}

	/// Cancels the running attempt. Returns `false` when nothing was in flight.
	pub fn cancel_sign_in(&self) -> bool {
		let cancelled = {
			let mut guard = self.inner.lock();
			let inner = &mut *guard;

			match (inner.state, inner.attempt.as_ref().map(|attempt| attempt.id)) {
				(state, Some(id)) if state.is_in_flight() => {
					let error = inner.fail(Error::Cancelled);

					Some((id, state, error))
				},
				_ => None,
			}
		};
		let Some((id, state, error)) = cancelled else {
			return false;
		};
		let stage = if state == SignInState::AwaitingRedirect {
			self.dismiss_for(id);

			SignInStage::Redirect
		} else {
			SignInStage::Profile
		};

		self.report_failure(stage, id, &error);

		true
	}

	/// Ends an `AwaitingRedirect` attempt whose deadline passed at `now`.
	///
	/// Returns `true` when an attempt was expired. Hosts without navigation traffic can call
	/// this from a timer; navigation events and [`start_sign_in`](Self::start_sign_in) check the
	/// deadline on their own.
	pub fn expire_stale(&self, now: OffsetDateTime) -> bool {
		let expired = {
			let mut guard = self.inner.lock();
			let inner = &mut *guard;

			match inner.attempt.as_ref() {
				Some(attempt)
					if inner.state == SignInState::AwaitingRedirect
						&& self.deadline_passed(attempt, now) =>
				{
					let id = attempt.id;

					Some((id, inner.fail(Error::TimedOut)))
				},
				_ => None,
			}
		};
		let Some((id, error)) = expired else {
			return false;
		};

		self.dismiss_for(id);
		self.report_failure(SignInStage::Redirect, id, &error);

		true
	}

	/// Current lifecycle state.
	pub fn state(&self) -> SignInState {
		self.inner.lock().state
	}

	/// Copy of the user record (empty until a sign-in succeeds).
	pub fn current_user(&self) -> AuthorizedUser {
		self.inner.lock().user.clone()
	}

	/// Identifier of the most recently started attempt.
	pub fn current_attempt(&self) -> Option<AttemptId> {
		let inner = self.inner.lock();

		(inner.next_attempt > 0).then_some(AttemptId(inner.next_attempt))
	}

	/// Error that ended the most recent failed attempt.
	pub fn last_error(&self) -> Option<Arc<Error>> {
		self.inner.lock().last_error.clone()
	}

	/// Authorization URL handed to the browser by the most recent attempt.
	pub fn authorize_url(&self) -> Option<Url> {
		self.inner.lock().authorize_url.clone()
	}

	/// Issues an authenticated request with the token from the last successful sign-in and
	/// decodes the body into `T`.
	///
	/// This never changes the sign-in state.
	pub async fn fetch<T>(&self, endpoint: Endpoint, verb: HttpVerb) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let token = self.inner.lock().token.clone().ok_or(Error::NotSignedIn)?;
		let request = self.request(endpoint, verb, &token)?;

		self.http_client.execute(request).await.decode()
	}

	fn observe_navigation(&self, url: &str, now: OffsetDateTime) -> Navigation {
		let outcome = {
			let mut guard = self.inner.lock();
			let inner = &mut *guard;
			let Some(attempt) = inner.attempt.as_mut() else {
				return Navigation::Settled(inner.state);
			};

			if inner.state != SignInState::AwaitingRedirect {
				return Navigation::Settled(inner.state);
			}

			let id = attempt.id;

			if self.deadline_passed(attempt, now) {
				Err((id, inner.fail(Error::TimedOut)))
			} else {
				match attempt.watcher.observe(url) {
					RedirectEvent::Ignored => return Navigation::Settled(inner.state),
					RedirectEvent::Captured(token) => {
						inner.state = SignInState::FetchingProfile;

						Ok((id, token))
					},
					RedirectEvent::Rejected(e) => Err((id, inner.fail(e.into()))),
				}
			}
		};

		let (Ok((attempt, _)) | Err((attempt, _))) = &outcome;

		self.dismiss_for(*attempt);

		match outcome {
			Ok((attempt, token)) => {
				obs::record_stage_outcome(SignInStage::Redirect, StageOutcome::Success);

				Navigation::Captured { attempt, token }
			},
			Err((attempt, error)) => {
				self.report_failure(SignInStage::Redirect, attempt, &error);

				Navigation::Settled(SignInState::Errored(error.kind()))
			},
		}
	}

	async fn fetch_profile(&self, attempt: AttemptId, token: AccessToken) -> SignInState {
		const STAGE: SignInStage = SignInStage::Profile;

		let span = StageSpan::new(STAGE, attempt);

		obs::record_stage_outcome(STAGE, StageOutcome::Attempt);

		let result: Result<AuthorizedUser> = span
			.instrument(async {
				let request = self.request(Endpoint::User, HttpVerb::Get, &token)?;

				self.http_client.execute(request).await.decode()
			})
			.await;

		self.complete_profile(attempt, token, result)
	}

	fn complete_profile(
		&self,
		attempt: AttemptId,
		token: AccessToken,
		result: Result<AuthorizedUser>,
	) -> SignInState {
		const STAGE: SignInStage = SignInStage::Profile;

		let completion = {
			let mut guard = self.inner.lock();
			let inner = &mut *guard;
			let current = inner.attempt.as_ref().map(|running| running.id);

			if inner.state != SignInState::FetchingProfile || current != Some(attempt) {
				None
			} else {
				match result {
					Ok(user) => {
						inner.user = user.clone();
						inner.token = Some(token);
						inner.attempt = None;
						inner.state = SignInState::SignedIn;

						Some(Ok(user))
					},
					Err(e) => Some(Err(inner.fail(e))),
				}
			}
		};

		match completion {
			None => {
				obs::log_discarded(STAGE, attempt);

				self.state()
			},
			Some(Ok(user)) => {
				obs::record_stage_outcome(STAGE, StageOutcome::Success);
				obs::log_signed_in(attempt, &user);

				if let Some(listener) = &self.listener {
					listener.on_signed_in(&user);
				}

				SignInState::SignedIn
			},
			Some(Err(error)) => {
				self.report_failure(STAGE, attempt, &error);

				SignInState::Errored(error.kind())
			},
		}
	}

	fn request(
		&self,
		endpoint: Endpoint,
		verb: HttpVerb,
		token: &AccessToken,
	) -> Result<ApiRequest> {
		ApiRequest::builder(&self.config.api_base, endpoint, verb)
			.bearer(Some(token))
			.client_id(self.config.send_client_id.then_some(&self.config.client_id))
			.build()
	}

	fn render_for(&self, attempt: AttemptId, url: &Url) -> bool {
		let turn = self.browser_turn.lock();

		if attempt.get() <= turn.get() {
			return false;
		}

		turn.set(attempt.get());
		self.browser.render_auth_url(url);

		true
	}

	fn dismiss_for(&self, attempt: AttemptId) -> bool {
		let turn = self.browser_turn.lock();

		if attempt.get() < turn.get() {
			obs::log_discarded(SignInStage::Redirect, attempt);

			return false;
		}

		turn.set(attempt.get());
		self.browser.dismiss_auth_url();

		true
	}

	fn deadline_passed(&self, attempt: &Attempt, now: OffsetDateTime) -> bool {
		self.config.attempt_timeout.is_some_and(|timeout| now - attempt.started_at >= timeout)
	}

	fn report_failure(&self, stage: SignInStage, attempt: AttemptId, error: &Error) {
		let _span = StageSpan::new(stage, attempt).entered();

		obs::log_failure(stage, attempt, error);
		obs::record_stage_outcome(stage, StageOutcome::Failure(error.kind()));

		if let Some(listener) = &self.listener {
			listener.on_failed(error.kind());
		}
	}
}
#[cfg(feature = "reqwest")]
impl SignInOrchestrator<ReqwestHttpClient> {
	/// Creates an idle orchestrator backed by a default reqwest client.
	pub fn new(config: SignInConfig, browser: Arc<dyn AuthBrowser>) -> Self {
		Self::with_http_client(config, ReqwestHttpClient::default(), browser)
	}
}
impl<C> Clone for SignInOrchestrator<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: Arc::clone(&self.http_client),
			config: Arc::clone(&self.config),
			browser: Arc::clone(&self.browser),
			listener: self.listener.clone(),
			inner: Arc::clone(&self.inner),
			browser_turn: Arc::clone(&self.browser_turn),
		}
	}
}
impl<C> Debug for SignInOrchestrator<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let inner = self.inner.lock();

		f.debug_struct("SignInOrchestrator")
			.field("client_id", &self.config.client_id)
			.field("state", &inner.state)
			.field("attempt", &inner.next_attempt)
			.field("listener_set", &self.listener.is_some())
			.finish()
	}
}

#[derive(Debug)]
struct Attempt {
	id: AttemptId,
	watcher: RedirectWatcher,
	started_at: OffsetDateTime,
}

#[derive(Debug, Default)]
struct Inner {
	state: SignInState,
	next_attempt: u64,
	attempt: Option<Attempt>,
	// Token of the last successful sign-in; a token captured by a failing attempt never lands here.
	token: Option<AccessToken>,
	user: AuthorizedUser,
	last_error: Option<Arc<Error>>,
	authorize_url: Option<Url>,
}
impl Inner {
	fn fail(&mut self, error: Error) -> Arc<Error> {
		let error = Arc::new(error);

		self.state = SignInState::Errored(error.kind());
		self.attempt = None;
		self.last_error = Some(Arc::clone(&error));

		error
	}
}

enum Navigation {
	Settled(SignInState),
	Captured { attempt: AttemptId, token: AccessToken },
}

fn random_state() -> String {
	rand::rng().sample_iter(Alphanumeric).take(STATE_LEN).map(char::from).collect()
}
