//! OTP request: identifier input + optional captcha, send the OTP, hand off to the parent flow.

// self
use crate::{
	_prelude::*,
	auth::CaptchaToken,
	config::{FlowConfig, OTP_COMPONENT},
	flows::{ErrorBanner, OidcContext, SubmissionStatus},
	http::{ApiError, AuthApi, SendOtpResponse},
	locale::{self, ErrorDomain, LocaleCatalog, SEND_OTP_FAILED_KEY, SENDING_OTP_MSG_KEY},
	mask::IdentifierField,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Receives the identifier and backend payload once an OTP has been sent, so the parent
/// flow can move on to OTP verification.
pub trait OtpSentHandler
where
	Self: Send,
{
	/// Called exactly once per successful send.
	fn otp_sent(&mut self, identifier: &str, response: &SendOtpResponse);
}
impl<F> OtpSentHandler for F
where
	F: Send + FnMut(&str, &SendOtpResponse),
{
	fn otp_sent(&mut self, identifier: &str, response: &SendOtpResponse) {
		self(identifier, response)
	}
}

/// Result of one send attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum OtpOutcome {
	/// Submission is currently disabled; nothing was sent.
	Blocked,
	/// The OTP was sent and the parent flow was notified.
	Sent(SendOtpResponse),
	/// The backend rejected the request; a banner is shown.
	Rejected {
		/// Banner key chosen for the first backend error.
		banner_key: String,
		/// First backend error.
		error: ApiError,
	},
	/// The call failed in transport; the generic banner is shown.
	Failed,
}

/// What the renderer needs to mount the captcha widget.
///
/// The underlying widget cannot switch language in place, so a language change bumps
/// [`generation`](Self::generation); renderers key the widget on it to force a remount.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CaptchaWidgetState {
	/// Whether the captcha is rendered at all.
	pub visible: bool,
	/// Mount generation; changes whenever the widget must be recreated.
	pub generation: u64,
	/// Language the widget should render in.
	pub lang_code: Option<String>,
	/// Site key passed to the widget.
	pub site_key: Option<String>,
}

/// OTP request component state.
pub struct OtpRequestFlow<A, L, H>
where
	A: ?Sized + AuthApi,
	L: ?Sized + LocaleCatalog,
	H: OtpSentHandler,
{
	api: Arc<A>,
	locale: Arc<L>,
	on_sent: H,
	context: OidcContext,
	channels: Vec<String>,
	identifier: IdentifierField,
	status: SubmissionStatus,
	banner: Option<ErrorBanner>,
	captcha: CaptchaWidgetState,
	captcha_token: Option<CaptchaToken>,
}
impl<A, L, H> OtpRequestFlow<A, L, H>
where
	A: ?Sized + AuthApi,
	L: ?Sized + LocaleCatalog,
	H: OtpSentHandler,
{
	/// Creates the flow with fresh per-instance form state.
	pub fn new(
		context: OidcContext,
		config: FlowConfig,
		api: Arc<A>,
		locale: Arc<L>,
		on_sent: H,
	) -> Self {
		let captcha = CaptchaWidgetState {
			visible: config.captcha_enabled_for(OTP_COMPONENT),
			generation: 0,
			lang_code: None,
			site_key: config.captcha_site_key.clone(),
		};

		Self {
			api,
			locale,
			on_sent,
			context,
			channels: config.send_otp_channels,
			identifier: IdentifierField::new(config.identifier_mask),
			status: SubmissionStatus::Idle,
			banner: None,
			captcha,
			captcha_token: None,
		}
	}

	/// Returns false while the identifier is blank or an enabled captcha is unsolved.
	pub fn can_submit(&self) -> bool {
		!self.identifier.is_blank() && (!self.captcha.visible || self.captcha_token.is_some())
	}

	/// Applies an identifier edit.
	pub fn on_identifier_input(&mut self, raw: &str, caret: usize) -> bool {
		self.identifier.edit(raw, caret)
	}

	/// Records the captcha completion token.
	pub fn on_captcha_solved(&mut self, token: CaptchaToken) {
		self.captcha_token = Some(token);
	}

	/// Clears the token when the captcha expires.
	pub fn on_captcha_expired(&mut self) {
		self.captcha_token = None;
	}

	/// Remounts the captcha in the new language; the user has to solve it again.
	pub fn on_language_changed(&mut self, lang_code: &str) {
		if !self.captcha.visible {
			return;
		}

		self.captcha.generation += 1;
		self.captcha.lang_code = Some(lang_code.to_owned());
		self.captcha_token = None;
	}

	/// Requests an OTP for the current identifier.
	pub async fn send_otp(&mut self) -> OtpOutcome {
		const KIND: FlowKind = FlowKind::OtpRequest;

		if !self.can_submit() {
			return OtpOutcome::Blocked;
		}

		let span = FlowSpan::new(KIND, "send_otp");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		self.banner = None;
		self.status = SubmissionStatus::Submitting { message: SENDING_OTP_MSG_KEY };

		let result = span
			.instrument(self.api.send_otp(
				&self.context.transaction_id,
				self.identifier.value(),
				&self.channels,
				self.captcha_token.as_ref(),
			))
			.await;
		let envelope = match result {
			Ok(envelope) => envelope,
			Err(e) => {
				obs::trace_event(KIND, "send_otp_failed", &e.to_string());
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);

				self.status = SubmissionStatus::Error;
				self.banner = Some(ErrorBanner::show(SEND_OTP_FAILED_KEY));

				return OtpOutcome::Failed;
			},
		};

		self.status = SubmissionStatus::Idle;

		if let Some(error) = envelope.first_error() {
			let banner_key =
				locale::banner_key(self.locale.as_ref(), ErrorDomain::Otp, &error.error_code);

			obs::record_flow_outcome(KIND, FlowOutcome::Rejected);

			self.banner = Some(ErrorBanner::show(banner_key.clone()));

			return OtpOutcome::Rejected { banner_key, error: error.clone() };
		}

		obs::record_flow_outcome(KIND, FlowOutcome::Success);

		let response = envelope.response.unwrap_or_default();

		self.on_sent.otp_sent(self.identifier.value(), &response);
		self.banner = None;

		OtpOutcome::Sent(response)
	}

	/// Hides the banner after an explicit user dismissal.
	pub fn dismiss_banner(&mut self) {
		self.banner = None;
	}

	/// Current loading state.
	pub fn status(&self) -> SubmissionStatus {
		self.status
	}

	/// Banner currently shown, if any.
	pub fn banner(&self) -> Option<&ErrorBanner> {
		self.banner.as_ref()
	}

	/// Captcha mount state.
	pub fn captcha(&self) -> &CaptchaWidgetState {
		&self.captcha
	}

	/// Identifier field state.
	pub fn identifier(&self) -> &IdentifierField {
		&self.identifier
	}

	/// Mutable identifier field state, used to take the pending caret after rendering.
	pub fn identifier_mut(&mut self) -> &mut IdentifierField {
		&mut self.identifier
	}

	/// Channels the OTP is requested on.
	pub fn channels(&self) -> &[String] {
		&self.channels
	}
}
impl<A, L, H> Debug for OtpRequestFlow<A, L, H>
where
	A: ?Sized + AuthApi,
	L: ?Sized + LocaleCatalog,
	H: OtpSentHandler,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OtpRequestFlow")
			.field("transaction_id", &self.context.transaction_id)
			.field("identifier", &self.identifier.value())
			.field("status", &self.status)
			.field("banner", &self.banner)
			.field("captcha", &self.captcha)
			.field("captcha_solved", &self.captcha_token.is_some())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use crate::{_preludet::*, auth::CaptchaToken, http::ScriptedAuthApi};

	#[test]
	fn language_change_remounts_captcha_and_resets_token() {
		let config = test_flow_config().with_captcha("otp", "site-key");
		let mut flow = build_test_otp_flow(
			Arc::new(ScriptedAuthApi::default()),
			config,
			|_: &str, _: &crate::http::SendOtpResponse| {},
		);

		flow.on_identifier_input("1234", 4);
		flow.on_captcha_solved(CaptchaToken::new("token"));

		assert!(flow.can_submit());
		assert_eq!(flow.captcha().generation, 0);

		flow.on_language_changed("km");

		assert_eq!(flow.captcha().generation, 1);
		assert_eq!(flow.captcha().lang_code.as_deref(), Some("km"));
		assert_eq!(flow.captcha().site_key.as_deref(), Some("site-key"));
		assert!(!flow.can_submit(), "A remounted captcha must be solved again.");
	}

	#[test]
	fn language_change_without_captcha_is_ignored() {
		let mut flow = build_test_otp_flow(
			Arc::new(ScriptedAuthApi::default()),
			test_flow_config(),
			|_: &str, _: &crate::http::SendOtpResponse| {},
		);

		flow.on_language_changed("fr");

		assert!(!flow.captcha().visible);
		assert_eq!(flow.captcha().generation, 0);
	}
}
