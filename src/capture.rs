//! Capability contract for the embedded biometric capture widget, plus the helpers that
//! prepare its transaction token and validate the samples it emits.
//!
//! The widget is initialized once per flow and reconfigured in place afterwards. Flows own
//! their widget through [`CaptureWidget`], so a browser bridge, a native device driver, or
//! the [`RecordingCaptureWidget`] used in tests can be plugged in without touching flow logic.

pub mod recording;
pub mod transaction;
pub mod validation;

pub use recording::RecordingCaptureWidget;
pub use transaction::*;
pub use validation::*;

// self
use crate::_prelude::*;

/// Imperative lifecycle exposed by a capture widget.
pub trait CaptureWidget
where
	Self: Send,
{
	/// Mounts the widget with its full configuration. Flows call this exactly once.
	fn initialize(&mut self, config: CaptureConfig);

	/// Patches an already initialized widget; `None` fields stay unchanged.
	fn reconfigure(&mut self, patch: CapturePatch);
}

/// Full widget configuration passed to [`CaptureWidget::initialize`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureConfig {
	/// DOM container (or native surface) identifier hosting the widget.
	pub container_id: String,
	/// Translation key for the capture button.
	pub button_label: String,
	/// Fixed-length token derived from the login transaction.
	pub transaction_id: String,
	/// Device service settings.
	pub sbi_env: SbiEnv,
	/// Active UI language.
	pub lang_code: String,
	/// Whether the capture button is disabled.
	pub disable: bool,
}
impl CaptureConfig {
	/// Default host container identifier.
	pub const DEFAULT_CONTAINER_ID: &'static str = "secure-biometric-interface-integration";
	/// Default capture button translation key.
	pub const DEFAULT_BUTTON_LABEL: &'static str = "scan_and_verify";

	/// Builds a disabled configuration for the default container.
	pub fn new(
		transaction_id: impl Into<String>,
		sbi_env: SbiEnv,
		lang_code: impl Into<String>,
	) -> Self {
		Self {
			container_id: Self::DEFAULT_CONTAINER_ID.into(),
			button_label: Self::DEFAULT_BUTTON_LABEL.into(),
			transaction_id: transaction_id.into(),
			sbi_env,
			lang_code: lang_code.into(),
			disable: true,
		}
	}
}

/// Settings for the local biometric device service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SbiEnv {
	/// Device environment label.
	pub env: String,
	/// Capture timeout in seconds.
	pub capture_timeout: u32,
	/// Iris subtypes requested.
	pub iris_bio_subtypes: String,
	/// Finger subtypes requested.
	pub finger_bio_subtypes: String,
	/// Number of face captures.
	pub face_capture_count: u32,
	/// Minimum face quality score.
	pub face_capture_score: u32,
	/// Number of finger captures.
	pub finger_capture_count: u32,
	/// Minimum finger quality score.
	pub finger_capture_score: u32,
	/// Number of iris captures.
	pub iris_capture_count: u32,
	/// Minimum iris quality score.
	pub iris_capture_score: u32,
	/// Local port range probed for the device service.
	pub port_range: String,
	/// Device discovery timeout in seconds.
	pub disc_timeout: u32,
	/// Device info timeout in seconds.
	pub dinfo_timeout: u32,
	/// Origin the device service should trust.
	pub domain_uri: String,
}
impl SbiEnv {
	/// Builds the default settings for the provided origin.
	pub fn for_domain(domain_uri: impl Into<String>) -> Self {
		Self {
			env: "Staging".into(),
			capture_timeout: 30,
			iris_bio_subtypes: "UNKNOWN".into(),
			finger_bio_subtypes: "UNKNOWN".into(),
			face_capture_count: 1,
			face_capture_score: 70,
			finger_capture_count: 1,
			finger_capture_score: 70,
			iris_capture_count: 1,
			iris_capture_score: 70,
			port_range: "4501-4512".into(),
			disc_timeout: 15,
			dinfo_timeout: 30,
			domain_uri: domain_uri.into(),
		}
	}
}

/// Partial configuration passed to [`CaptureWidget::reconfigure`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturePatch {
	/// New UI language, if changed.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub lang_code: Option<String>,
	/// New disabled flag, if changed.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub disable: Option<bool>,
}
impl CapturePatch {
	/// Patch that only changes the language.
	pub fn language(lang_code: impl Into<String>) -> Self {
		Self { lang_code: Some(lang_code.into()), ..Default::default() }
	}

	/// Patch that only toggles the disabled flag.
	pub fn disabled(disable: bool) -> Self {
		Self { disable: Some(disable), ..Default::default() }
	}

	/// Applies the patch to a full configuration.
	pub fn apply_to(&self, config: &mut CaptureConfig) {
		if let Some(lang_code) = &self.lang_code {
			config.lang_code = lang_code.clone();
		}
		if let Some(disable) = self.disable {
			config.disable = disable;
		}
	}
}
