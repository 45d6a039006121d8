//! Authentication backend contract and wire envelopes.
//!
//! Flows depend only on [`AuthApi`]. The crate ships [`ReqwestAuthApi`] (feature `reqwest`)
//! for the identity provider's JSON API and [`ScriptedAuthApi`] for tests and demos.
//! Backend-reported failures are data, carried in [`ApiEnvelope::errors`]; only transport
//! problems surface as [`Error`].

pub mod scripted;

pub use scripted::ScriptedAuthApi;

// crates.io
use serde_json::{Map, Value};
use time::format_description::well_known::Rfc3339;
// self
use crate::{
	_prelude::*,
	auth::{CaptchaToken, ChallengeList, TransactionId},
	error::{ConfigError, TransportError},
};

/// Boxed future returned by [`AuthApi`] calls.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<ApiEnvelope<T>>> + 'a + Send>>;

/// Authentication backend operations used by the login flows.
pub trait AuthApi
where
	Self: Send + Sync,
{
	/// Submits the identifier and challenges for the transaction.
	fn authenticate<'a>(
		&'a self,
		transaction_id: &'a TransactionId,
		identifier: &'a str,
		challenges: &'a ChallengeList,
	) -> ApiFuture<'a, AuthenticateResponse>;

	/// Asks the backend to deliver an OTP for the identifier over `channels`.
	fn send_otp<'a>(
		&'a self,
		transaction_id: &'a TransactionId,
		identifier: &'a str,
		channels: &'a [String],
		captcha_token: Option<&'a CaptchaToken>,
	) -> ApiFuture<'a, SendOtpResponse>;
}

/// Request wrapper expected by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope<T> {
	/// RFC 3339 UTC timestamp of the request.
	pub request_time: String,
	/// Operation payload.
	pub request: T,
}
impl<T> RequestEnvelope<T> {
	/// Wraps `request`, stamping it with the current time.
	pub fn new(request: T) -> Result<Self, TransportError> {
		Self::at(request, OffsetDateTime::now_utc())
	}

	/// Wraps `request` with an explicit timestamp.
	///
	/// Fails for instants RFC 3339 cannot represent, such as years before 0000.
	pub fn at(request: T, instant: OffsetDateTime) -> Result<Self, TransportError> {
		let request_time =
			instant.format(&Rfc3339).map_err(|source| TransportError::Timestamp { source })?;

		Ok(Self { request_time, request })
	}
}

/// Payload of the authenticate call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticateRequest<'a> {
	/// Login transaction.
	pub transaction_id: &'a TransactionId,
	/// User identifier.
	pub individual_id: &'a str,
	/// Submitted challenges.
	pub challenge_list: &'a ChallengeList,
}

/// Payload of the send-OTP call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpRequest<'a> {
	/// Login transaction.
	pub transaction_id: &'a TransactionId,
	/// User identifier.
	pub individual_id: &'a str,
	/// Delivery channels.
	pub otp_channels: &'a [String],
	/// Captcha completion token, when a captcha was shown.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub captcha_token: Option<&'a CaptchaToken>,
}

/// Response wrapper returned by the backend: a payload or a list of structured errors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
	/// Success payload.
	#[serde(default = "Option::default")]
	pub response: Option<T>,
	/// Structured errors; empty on success.
	#[serde(default, deserialize_with = "errors_or_null")]
	pub errors: Vec<ApiError>,
}
impl<T> ApiEnvelope<T> {
	/// Successful envelope.
	pub fn success(response: T) -> Self {
		Self { response: Some(response), errors: Vec::new() }
	}

	/// Envelope carrying backend errors.
	pub fn failure<I>(errors: I) -> Self
	where
		I: IntoIterator<Item = ApiError>,
	{
		Self { response: None, errors: errors.into_iter().collect() }
	}

	/// First reported error, which is the one surfaced to the user.
	pub fn first_error(&self) -> Option<&ApiError> {
		self.errors.first()
	}
}
impl<T> ApiEnvelope<T>
where
	T: for<'de> Deserialize<'de>,
{
	/// Decodes a response body, reporting the JSON path of any mismatch.
	pub fn from_slice(body: &[u8]) -> Result<Self, TransportError> {
		let mut deserializer = serde_json::Deserializer::from_slice(body);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| TransportError::Decode { source })
	}
}

/// Structured backend error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
	/// Stable error code, used as a translation key.
	pub error_code: String,
	/// Free-form detail.
	#[serde(default, alias = "errorInfo")]
	pub error_message: Option<String>,
}
impl ApiError {
	/// Creates an error with only a code.
	pub fn new(error_code: impl Into<String>) -> Self {
		Self { error_code: error_code.into(), error_message: None }
	}

	/// Attaches a detail message.
	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.error_message = Some(message.into());

		self
	}
}

/// Success payload of the authenticate call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticateResponse {
	/// Whether the consent screen must capture or may skip consent.
	#[serde(default)]
	pub consent_action: Option<String>,
	/// Remaining fields, passed through.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// Success payload of the send-OTP call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpResponse {
	/// Masked e-mail the OTP went to.
	#[serde(default)]
	pub masked_email: Option<String>,
	/// Masked phone number the OTP went to.
	#[serde(default)]
	pub masked_mobile: Option<String>,
	/// Remaining fields, passed through.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// Endpoint paths relative to the backend base URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthEndpoints {
	/// Authenticate endpoint.
	pub authenticate: Url,
	/// Send-OTP endpoint.
	pub send_otp: Url,
}
impl AuthEndpoints {
	/// Default authenticate path.
	pub const AUTHENTICATE_PATH: &'static str = "authorization/authenticate";
	/// Default send-OTP path.
	pub const SEND_OTP_PATH: &'static str = "authorization/send-otp";

	/// Derives both endpoints from the backend base URL.
	///
	/// A trailing slash is appended to `base` when missing so its last segment is kept.
	pub fn from_base(base: &Url) -> Result<Self> {
		let mut base = base.clone();

		if !base.path().ends_with('/') {
			base.set_path(&format!("{}/", base.path()));
		}

		let join = |path: &str| {
			base.join(path).map_err(|source| ConfigError::InvalidBackendUrl { source })
		};

		Ok(Self {
			authenticate: join(Self::AUTHENTICATE_PATH)?,
			send_otp: join(Self::SEND_OTP_PATH)?,
		})
	}
}

/// reqwest-backed [`AuthApi`] talking to the identity provider's JSON API.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestAuthApi {
	client: ReqwestClient,
	endpoints: AuthEndpoints,
	xsrf_token: Arc<Mutex<Option<String>>>,
}
#[cfg(feature = "reqwest")]
impl ReqwestAuthApi {
	/// Header carrying the anti-forgery token.
	pub const XSRF_HEADER: &'static str = "X-XSRF-TOKEN";

	/// Builds a client with a default reqwest transport.
	pub fn new(base: &Url) -> Result<Self> {
		Self::with_client(ReqwestClient::builder().build().map_err(ConfigError::from)?, base)
	}

	/// Wraps an existing reqwest client.
	pub fn with_client(client: ReqwestClient, base: &Url) -> Result<Self> {
		Ok(Self {
			client,
			endpoints: AuthEndpoints::from_base(base)?,
			xsrf_token: Default::default(),
		})
	}

	/// Sets or replaces the anti-forgery token sent with every call.
	pub fn set_xsrf_token(&self, token: impl Into<String>) {
		*self.xsrf_token.lock() = Some(token.into());
	}

	/// Resolved endpoints.
	pub fn endpoints(&self) -> &AuthEndpoints {
		&self.endpoints
	}

	async fn post<B, T>(&self, url: &Url, body: &RequestEnvelope<B>) -> Result<ApiEnvelope<T>>
	where
		B: Serialize,
		T: for<'de> Deserialize<'de>,
	{
		let mut request = self.client.post(url.clone()).json(body);

		let xsrf_token = self.xsrf_token.lock().clone();

		if let Some(token) = xsrf_token {
			request = request.header(Self::XSRF_HEADER, token);
		}

		let response = request.send().await.map_err(TransportError::from)?;
		let status = response.status();

		if !status.is_success() {
			return Err(TransportError::UnexpectedStatus { status: status.as_u16() }.into());
		}

		let bytes = response.bytes().await.map_err(TransportError::from)?;

		Ok(ApiEnvelope::from_slice(&bytes)?)
	}
}
#[cfg(feature = "reqwest")]
impl AuthApi for ReqwestAuthApi {
	fn authenticate<'a>(
		&'a self,
		transaction_id: &'a TransactionId,
		identifier: &'a str,
		challenges: &'a ChallengeList,
	) -> ApiFuture<'a, AuthenticateResponse> {
		Box::pin(async move {
			let body = RequestEnvelope::new(AuthenticateRequest {
				transaction_id,
				individual_id: identifier,
				challenge_list: challenges,
			})?;

			self.post(&self.endpoints.authenticate, &body).await
		})
	}

	fn send_otp<'a>(
		&'a self,
		transaction_id: &'a TransactionId,
		identifier: &'a str,
		channels: &'a [String],
		captcha_token: Option<&'a CaptchaToken>,
	) -> ApiFuture<'a, SendOtpResponse> {
		Box::pin(async move {
			let body = RequestEnvelope::new(SendOtpRequest {
				transaction_id,
				individual_id: identifier,
				otp_channels: channels,
				captcha_token,
			})?;

			self.post(&self.endpoints.send_otp, &body).await
		})
	}
}

fn errors_or_null<'de, D>(deserializer: D) -> Result<Vec<ApiError>, D::Error>
where
	D: serde::Deserializer<'de>,
{
	Ok(Option::<Vec<ApiError>>::deserialize(deserializer)?.unwrap_or_default())
}
