//! Runtime configuration for the login flows.
//!
//! Values come from the identity provider's remote configuration first, then from
//! environment variables, then from built-in defaults. [`FlowConfig`] is a plain value:
//! resolve it once and hand a clone to each flow.

// std
use std::env;
// self
use crate::{_prelude::*, error::ConfigError, mask::IdentifierMask};

/// Remote key holding the capture transaction token length.
pub const AUTH_TXN_ID_LENGTH_KEY: &str = "auth.txnid.length";
/// Remote key holding the comma-separated OTP channels.
pub const SEND_OTP_CHANNELS_KEY: &str = "send.otp.channels";
/// Remote key holding the comma-separated components that show a captcha.
pub const CAPTCHA_ENABLE_KEY: &str = "captcha.enable";
/// Remote key holding the captcha site key.
pub const CAPTCHA_SITE_KEY_KEY: &str = "captcha.sitekey";

/// Environment fallback for [`AUTH_TXN_ID_LENGTH_KEY`].
pub const AUTH_TXN_ID_LENGTH_ENV: &str = "AUTH_TXN_ID_LENGTH";
/// Environment fallback for [`SEND_OTP_CHANNELS_KEY`].
pub const SEND_OTP_CHANNELS_ENV: &str = "SEND_OTP_CHANNELS";
/// Environment fallback for [`CAPTCHA_ENABLE_KEY`].
pub const CAPTCHA_ENABLE_ENV: &str = "CAPTCHA_ENABLE";
/// Environment fallback for [`CAPTCHA_SITE_KEY_KEY`].
pub const CAPTCHA_SITE_KEY_ENV: &str = "CAPTCHA_SITE_KEY";

/// Component label that enables the captcha on the OTP request form.
pub const OTP_COMPONENT: &str = "otp";

/// Key/value lookup over the remote configuration document.
pub trait ConfigSource {
	/// Returns the raw value for `key`, if configured.
	fn get(&self, key: &str) -> Option<String>;
}
impl ConfigSource for HashMap<String, String> {
	fn get(&self, key: &str) -> Option<String> {
		HashMap::get(self, key).cloned()
	}
}
impl ConfigSource for BTreeMap<String, String> {
	fn get(&self, key: &str) -> Option<String> {
		BTreeMap::get(self, key).cloned()
	}
}
impl ConfigSource for serde_json::Value {
	fn get(&self, key: &str) -> Option<String> {
		match self.as_object()?.get(key)? {
			serde_json::Value::Null => None,
			serde_json::Value::String(value) => Some(value.clone()),
			other => Some(other.to_string()),
		}
	}
}

/// Resolved configuration shared by both flows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowConfig {
	/// Length of the token handed to the capture widget.
	pub auth_txn_id_length: usize,
	/// Channels the OTP is sent through.
	pub send_otp_channels: Vec<String>,
	/// Lowercased component labels that render a captcha.
	pub captcha_enable_components: Vec<String>,
	/// Captcha site key, when captcha is used.
	pub captcha_site_key: Option<String>,
	/// Path prefix the consent route is mounted under.
	pub public_path: String,
	/// Origin the biometric device service should trust.
	pub domain_uri: String,
	/// Mask applied to the identifier inputs.
	pub identifier_mask: IdentifierMask,
}
impl FlowConfig {
	/// Default capture transaction token length.
	pub const DEFAULT_AUTH_TXN_ID_LENGTH: usize = 10;
	/// Default OTP channels.
	pub const DEFAULT_SEND_OTP_CHANNELS: &'static str = "email,phone";

	/// Resolves every value from `source`, falling back to the environment, then defaults.
	pub fn resolve<S>(source: &S) -> Result<Self>
	where
		S: ?Sized + ConfigSource,
	{
		let mut config = Self::default();

		if let Some(raw) = lookup(source, AUTH_TXN_ID_LENGTH_KEY, AUTH_TXN_ID_LENGTH_ENV) {
			config.auth_txn_id_length = raw.trim().parse().map_err(|_| {
				ConfigError::InvalidValue { key: AUTH_TXN_ID_LENGTH_KEY, value: raw.clone() }
			})?;
		}
		if let Some(raw) = lookup(source, SEND_OTP_CHANNELS_KEY, SEND_OTP_CHANNELS_ENV) {
			config.send_otp_channels = split_list(&raw).collect();
		}
		if let Some(raw) = lookup(source, CAPTCHA_ENABLE_KEY, CAPTCHA_ENABLE_ENV) {
			config.captcha_enable_components =
				split_list(&raw).map(|component| component.to_lowercase()).collect();
		}

		config.captcha_site_key = lookup(source, CAPTCHA_SITE_KEY_KEY, CAPTCHA_SITE_KEY_ENV);

		Ok(config)
	}

	/// Returns true when `component` is listed in the captcha enablement list.
	pub fn captcha_enabled_for(&self, component: &str) -> bool {
		self.captcha_enable_components.iter().any(|c| c.eq_ignore_ascii_case(component))
	}

	/// Overrides the capture transaction token length.
	pub fn with_auth_txn_id_length(mut self, len: usize) -> Self {
		self.auth_txn_id_length = len;

		self
	}

	/// Overrides the OTP channels.
	pub fn with_send_otp_channels<I, S>(mut self, channels: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.send_otp_channels = channels.into_iter().map(Into::into).collect();

		self
	}

	/// Enables the captcha for `component` using `site_key`.
	pub fn with_captcha(mut self, component: &str, site_key: impl Into<String>) -> Self {
		self.captcha_enable_components.push(component.to_lowercase());
		self.captcha_site_key = Some(site_key.into());

		self
	}

	/// Overrides the consent route path prefix.
	pub fn with_public_path(mut self, public_path: impl Into<String>) -> Self {
		self.public_path = public_path.into();

		self
	}

	/// Overrides the origin trusted by the device service.
	pub fn with_domain_uri(mut self, domain_uri: impl Into<String>) -> Self {
		self.domain_uri = domain_uri.into();

		self
	}

	/// Overrides the identifier mask.
	pub fn with_identifier_mask(mut self, mask: IdentifierMask) -> Self {
		self.identifier_mask = mask;

		self
	}
}
impl Default for FlowConfig {
	fn default() -> Self {
		Self {
			auth_txn_id_length: Self::DEFAULT_AUTH_TXN_ID_LENGTH,
			send_otp_channels: split_list(Self::DEFAULT_SEND_OTP_CHANNELS).collect(),
			captcha_enable_components: Vec::new(),
			captcha_site_key: None,
			public_path: String::new(),
			domain_uri: String::new(),
			identifier_mask: IdentifierMask::default(),
		}
	}
}

fn lookup<S>(source: &S, key: &str, env_key: &str) -> Option<String>
where
	S: ?Sized + ConfigSource,
{
	source.get(key).or_else(|| env::var(env_key).ok())
}

fn split_list(raw: &str) -> impl Iterator<Item = String> + '_ {
	raw.split(',').map(str::trim).filter(|entry| !entry.is_empty()).map(ToOwned::to_owned)
}
