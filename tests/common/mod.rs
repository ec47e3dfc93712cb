#![allow(dead_code)]

// std
use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};
// crates.io
use parking_lot::Mutex;
use tokio::sync::Notify;
// self
use twitch_auth::{
	api::{ApiExchange, ApiRequest, AuthorizedUser},
	config::SignInConfig,
	error::FailureKind,
	http::{ApiFuture, ApiHttpClient},
	oauth2::{HttpResponse, http::StatusCode},
	signin::{AuthBrowser, SignInListener},
	url::Url,
};

pub const CLIENT_ID: &str = "client-it";
pub const PROFILE_BODY: &str = r#"{
	"_id": "44322889",
	"bio": "Just a gamer playing games and chatting. :)",
	"display_name": "dallas",
	"email": "email-address@provider.com",
	"logo": "https://static-cdn.jtvnw.net/jtv_user_pictures/dallas-profile_image.png",
	"name": "dallas",
	"type": "staff"
}"#;

/// Redirect URL carrying `token` under the default prefix.
pub fn redirect_with(token: &str) -> String {
	format!("https://localhost/#access_token={token}&scope=user_read")
}

/// Config pointed at `api_base` with the remaining Twitch defaults.
pub fn config(api_base: &str) -> SignInConfig {
	SignInConfig::builder(CLIENT_ID)
		.api_base(api_base)
		.build()
		.expect("Integration config should build.")
}

/// Browser double that records every call.
#[derive(Debug, Default)]
pub struct RecordingBrowser {
	renders: AtomicUsize,
	dismissals: AtomicUsize,
	last_url: Mutex<Option<Url>>,
}
impl RecordingBrowser {
	pub fn renders(&self) -> usize {
		self.renders.load(Ordering::SeqCst)
	}

	pub fn dismissals(&self) -> usize {
		self.dismissals.load(Ordering::SeqCst)
	}

	pub fn last_url(&self) -> Option<Url> {
		self.last_url.lock().clone()
	}
}
impl AuthBrowser for RecordingBrowser {
	fn render_auth_url(&self, url: &Url) {
		self.renders.fetch_add(1, Ordering::SeqCst);
		*self.last_url.lock() = Some(url.clone());
	}

	fn dismiss_auth_url(&self) {
		self.dismissals.fetch_add(1, Ordering::SeqCst);
	}
}

/// Listener double counting completions; clones share the same record.
#[derive(Clone, Debug, Default)]
pub struct CountingListener(Arc<ListenerLog>);
impl CountingListener {
	pub fn signed_in(&self) -> Vec<AuthorizedUser> {
		self.0.signed_in.lock().clone()
	}

	pub fn failures(&self) -> Vec<FailureKind> {
		self.0.failures.lock().clone()
	}
}
impl SignInListener for CountingListener {
	fn on_signed_in(&self, user: &AuthorizedUser) {
		self.0.signed_in.lock().push(user.clone());
	}

	fn on_failed(&self, kind: FailureKind) {
		self.0.failures.lock().push(kind);
	}
}

#[derive(Debug, Default)]
pub struct ListenerLog {
	signed_in: Mutex<Vec<AuthorizedUser>>,
	failures: Mutex<Vec<FailureKind>>,
}

/// Transport double answering every request with one canned response.
///
/// When gated, each request waits for [`ScriptedClient::release`] before answering.
#[derive(Debug)]
pub struct ScriptedClient {
	status: u16,
	body: String,
	gate: Option<Notify>,
	calls: AtomicUsize,
	seen: Mutex<Vec<String>>,
}
impl ScriptedClient {
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		Self {
			status,
			body: body.into(),
			gate: None,
			calls: AtomicUsize::new(0),
			seen: Default::default(),
		}
	}

	pub fn gated(status: u16, body: impl Into<String>) -> Self {
		Self { gate: Some(Notify::new()), ..Self::new(status, body) }
	}

	pub fn release(&self) {
		if let Some(gate) = &self.gate {
			gate.notify_one();
		}
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	/// Request URIs in the order they were executed.
	pub fn seen(&self) -> Vec<String> {
		self.seen.lock().clone()
	}

	fn respond(&self, request: ApiRequest) -> ApiExchange {
		let (endpoint, verb, request) = request.into_parts();
		let mut response = HttpResponse::new(self.body.as_bytes().to_vec());

		self.seen.lock().push(request.uri().to_string());

		*response.status_mut() =
			StatusCode::from_u16(self.status).expect("Scripted status should be valid.");

		ApiExchange { endpoint, verb, outcome: Ok(response) }
	}
}
impl ApiHttpClient for ScriptedClient {
	fn execute(&self, request: ApiRequest) -> ApiFuture<'_> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move {
			if let Some(gate) = &self.gate {
				gate.notified().await;
			}

			self.respond(request)
		})
	}
}
