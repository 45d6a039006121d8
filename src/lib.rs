//! Headless OpenID Connect login flows: biometric and OTP submission state machines, identifier
//! masking, and localized error banners that any rendering layer can drive.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod capture;
pub mod config;
pub mod error;
pub mod flows;
pub mod http;
pub mod locale;
pub mod mask;
pub mod obs;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::TransactionId,
		capture::RecordingCaptureWidget,
		config::FlowConfig,
		flows::{BiometricLoginFlow, OidcContext, OtpRequestFlow, OtpSentHandler},
		http::ScriptedAuthApi,
		locale::LocaleBundle,
	};

	/// Biometric flow wired to the scripted backend + recording widget used across tests.
	pub type TestBiometricFlow =
		BiometricLoginFlow<ScriptedAuthApi, RecordingCaptureWidget, LocaleBundle>;
	/// OTP flow wired to the scripted backend used across tests.
	pub type TestOtpFlow<H> = OtpRequestFlow<ScriptedAuthApi, LocaleBundle, H>;

	/// Transaction identifier shared by test fixtures.
	pub const TEST_TRANSACTION_ID: &str = "d1c3b9f0-77aa-4e2b_9c10-5e21aa04b7f3";

	/// Locale bundle fixture with a couple of domain-specific error translations.
	pub fn test_locale_bundle() -> LocaleBundle {
		LocaleBundle::from_value(serde_json::json!({
			"errors": {
				"authentication_failed_msg": "Authentication failed.",
				"invalid_transaction": "Invalid transaction.",
				"biometrics": {
					"IDA-BIA-001": "Biometric data does not match.",
					"auth_failed": "Biometric authentication failed."
				},
				"otp": {
					"send_otp_failed_msg": "Failed to send OTP.",
					"IDA-OTA-001": "OTP request limit reached."
				}
			}
		}))
		.expect("Locale fixture should be a JSON object.")
	}

	/// Builds an OIDC context for the fixture transaction.
	pub fn test_oidc_context() -> OidcContext {
		let transaction_id = TransactionId::new(TEST_TRANSACTION_ID)
			.expect("Fixture transaction identifier should be valid.");

		OidcContext::new(transaction_id)
			.with_nonce("n-0S6_WzA2Mj")
			.with_state("af0ifjsldkj")
			.with_oauth_details(serde_json::json!({
				"clientName": "Health Portal",
				"essentialClaims": ["name"],
			}))
	}

	/// Flow configuration fixture with captcha disabled and a consent path prefix.
	pub fn test_flow_config() -> FlowConfig {
		FlowConfig::default().with_public_path("/idp").with_domain_uri("https://idp.example.com")
	}

	/// Constructs a biometric flow around a fresh scripted backend and recording widget.
	pub fn build_test_biometric_flow(
		api: Arc<ScriptedAuthApi>,
		config: FlowConfig,
	) -> TestBiometricFlow {
		BiometricLoginFlow::new(
			test_oidc_context(),
			config,
			api,
			RecordingCaptureWidget::default(),
			Arc::new(test_locale_bundle()),
		)
	}

	/// Constructs an OTP flow around a scripted backend and the provided sent-handler.
	pub fn build_test_otp_flow<H>(
		api: Arc<ScriptedAuthApi>,
		config: FlowConfig,
		handler: H,
	) -> TestOtpFlow<H>
	where
		H: OtpSentHandler,
	{
		OtpRequestFlow::new(
			test_oidc_context(),
			config,
			api,
			Arc::new(test_locale_bundle()),
			handler,
		)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, oidc_login_flows as _, temp_env as _, tokio as _};
