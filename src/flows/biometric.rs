//! Biometric login: identifier input + embedded capture widget, authenticate, redirect.
//!
//! The flow initializes its [`CaptureWidget`] once on [`mount`](BiometricLoginFlow::mount),
//! keeps it in sync with the language and the identifier's validity through
//! [`CaptureWidget::reconfigure`], and turns each capture event into at most one
//! authenticate call. Local capture validation failures are silent (the widget shows its
//! own message); backend errors raise a localized banner; transport failures raise a fixed
//! generic banner.

// self
use crate::{
	_prelude::*,
	auth::{Challenge, ChallengeList},
	capture::{
		self, CaptureConfig, CapturePatch, CaptureResponse, CaptureValidationError, CaptureWidget,
		SbiEnv,
	},
	config::FlowConfig,
	flows::{ConsentRedirect, ErrorBanner, OidcContext, SubmissionStatus},
	http::{ApiError, AuthApi},
	locale::{self, AUTHENTICATING_MSG_KEY, AUTHENTICATION_FAILED_KEY, ErrorDomain, LocaleCatalog},
	mask::IdentifierField,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Result of handling one capture event.
#[derive(Clone, Debug, PartialEq)]
pub enum BiometricOutcome {
	/// The capture failed local validation; nothing was submitted.
	Skipped(CaptureValidationError),
	/// The backend rejected the challenge; a banner is shown.
	Rejected {
		/// Banner key chosen for the first backend error.
		banner_key: String,
		/// First backend error.
		error: ApiError,
	},
	/// Authentication succeeded; navigate to the consent step.
	Redirect(ConsentRedirect),
	/// The call failed in transport; the generic banner is shown.
	Failed,
}

/// Biometric login component state.
pub struct BiometricLoginFlow<A, W, L>
where
	A: ?Sized + AuthApi,
	W: CaptureWidget,
	L: ?Sized + LocaleCatalog,
{
	api: Arc<A>,
	widget: W,
	locale: Arc<L>,
	context: OidcContext,
	config: FlowConfig,
	identifier: IdentifierField,
	status: SubmissionStatus,
	banner: Option<ErrorBanner>,
	widget_initialized: bool,
}
impl<A, W, L> BiometricLoginFlow<A, W, L>
where
	A: ?Sized + AuthApi,
	W: CaptureWidget,
	L: ?Sized + LocaleCatalog,
{
	/// Creates the flow with fresh per-instance form state.
	pub fn new(
		context: OidcContext,
		config: FlowConfig,
		api: Arc<A>,
		widget: W,
		locale: Arc<L>,
	) -> Self {
		let identifier = IdentifierField::new(config.identifier_mask);

		Self {
			api,
			widget,
			locale,
			context,
			config,
			identifier,
			status: SubmissionStatus::Idle,
			banner: None,
			widget_initialized: false,
		}
	}

	/// Initializes the capture widget. Only the first call has an effect.
	pub fn mount(&mut self, lang_code: &str) -> Result<()> {
		if self.widget_initialized {
			return Ok(());
		}

		let _span = FlowSpan::new(FlowKind::BiometricLogin, "mount").entered();
		let transaction_id = capture::derive_capture_transaction_id(
			&self.context.transaction_id,
			self.config.auth_txn_id_length,
		)?;
		let config = CaptureConfig::new(
			transaction_id,
			SbiEnv::for_domain(self.config.domain_uri.clone()),
			lang_code,
		);

		self.widget.initialize(config);
		self.widget_initialized = true;

		Ok(())
	}

	/// Forwards a language change to the mounted widget.
	pub fn on_language_changed(&mut self, lang_code: &str) {
		if self.widget_initialized {
			self.widget.reconfigure(CapturePatch::language(lang_code));
		}
	}

	/// Applies an identifier edit; the capture button is enabled only for a non-empty value.
	pub fn on_identifier_input(&mut self, raw: &str, caret: usize) -> bool {
		if !self.identifier.edit(raw, caret) {
			return false;
		}
		if self.widget_initialized {
			self.widget.reconfigure(CapturePatch::disabled(self.identifier.value().is_empty()));
		}

		true
	}

	/// Validates a capture event and, when it is usable, authenticates with it.
	pub async fn on_capture(&mut self, response: Option<CaptureResponse>) -> BiometricOutcome {
		const KIND: FlowKind = FlowKind::BiometricLogin;

		self.banner = None;
		self.status = SubmissionStatus::Idle;

		let samples = match capture::validate_capture(response) {
			Ok(samples) => samples,
			Err(e) => {
				obs::trace_event(KIND, "capture_invalid", &e.to_string());

				return BiometricOutcome::Skipped(e);
			},
		};
		let span = FlowSpan::new(KIND, "on_capture");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		self.status = SubmissionStatus::Submitting { message: AUTHENTICATING_MSG_KEY };

		let result = span
			.instrument(async {
				let challenges = ChallengeList::single(Challenge::biometric(
					capture::encode_samples(&samples)?,
				));
				let identifier = self.identifier.value();

				self.api.authenticate(&self.context.transaction_id, identifier, &challenges).await
			})
			.await;
		let envelope = match result {
			Ok(envelope) => envelope,
			Err(e) => {
				obs::trace_event(KIND, "authenticate_failed", &e.to_string());
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);

				self.status = SubmissionStatus::Error;
				self.banner = Some(ErrorBanner::show(AUTHENTICATION_FAILED_KEY));

				return BiometricOutcome::Failed;
			},
		};

		self.status = SubmissionStatus::Idle;

		if let Some(error) = envelope.first_error() {
			let banner_key = locale::banner_key(
				self.locale.as_ref(),
				ErrorDomain::Biometrics,
				&error.error_code,
			);

			obs::record_flow_outcome(KIND, FlowOutcome::Rejected);

			self.banner = Some(ErrorBanner::show(banner_key.clone()));

			return BiometricOutcome::Rejected { banner_key, error: error.clone() };
		}

		obs::record_flow_outcome(KIND, FlowOutcome::Success);

		self.banner = None;

		let response = envelope.response.unwrap_or_default();

		BiometricOutcome::Redirect(ConsentRedirect::build(
			&self.config.public_path,
			&self.context,
			response.consent_action.as_deref(),
		))
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

	/// Identifier field state.
	pub fn identifier(&self) -> &IdentifierField {
		&self.identifier
	}

	/// Mutable identifier field state, used to take the pending caret after rendering.
	pub fn identifier_mut(&mut self) -> &mut IdentifierField {
		&mut self.identifier
	}

	/// Owned capture widget.
	pub fn widget(&self) -> &W {
		&self.widget
	}

	/// OIDC context the flow was started with.
	pub fn context(&self) -> &OidcContext {
		&self.context
	}
}
impl<A, W, L> Debug for BiometricLoginFlow<A, W, L>
where
	A: ?Sized + AuthApi,
	W: CaptureWidget,
	L: ?Sized + LocaleCatalog,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BiometricLoginFlow")
			.field("transaction_id", &self.context.transaction_id)
			.field("identifier", &self.identifier.value())
			.field("status", &self.status)
			.field("banner", &self.banner)
			.field("widget_initialized", &self.widget_initialized)
			.finish()
	}
}
