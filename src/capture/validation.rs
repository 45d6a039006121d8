//! Capture event payloads and the local validation applied before submission.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserializer, de::Error as DeError};
use serde_json::{Map, Value};
// self
use crate::{_prelude::*, error::TransportError};

/// Error code the capture widget uses for a successful modality.
pub const CAPTURE_SUCCESS_CODE: &str = "0";

/// Event delivered by the capture widget once a capture attempt finishes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureResponse {
	/// Captured samples, one per modality/attempt.
	#[serde(default)]
	pub biometrics: Option<Vec<BiometricSample>>,
}

/// One captured sample. Everything except the error entry is passed through untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BiometricSample {
	/// Per-modality error reported by the device service.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<CaptureError>,
	/// Remaining sample fields (data, hash, signature, …).
	#[serde(flatten)]
	pub data: Map<String, Value>,
}

/// Device-reported modality error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureError {
	/// Error code; [`CAPTURE_SUCCESS_CODE`] means no error.
	#[serde(deserialize_with = "code_from_string_or_number")]
	pub error_code: String,
	/// Human-readable detail from the device service.
	#[serde(default)]
	pub error_info: Option<String>,
}
impl CaptureError {
	/// Returns true when the code signals success.
	pub fn is_success(&self) -> bool {
		self.error_code == CAPTURE_SUCCESS_CODE
	}
}

/// Local capture validation failures. These never reach the error banner.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum CaptureValidationError {
	/// The widget delivered no response or no samples.
	#[error("Capture response contains no biometric samples.")]
	EmptyResponse,
	/// A sample carries a non-success error code.
	#[error("Capture failed with code {code}.")]
	Modality {
		/// Device error code.
		code: String,
		/// Device error detail, when supplied.
		info: Option<String>,
	},
}

/// Validates a capture event and strips per-sample error entries.
///
/// The first sample with a non-success code wins; later samples are not inspected.
pub fn validate_capture(
	response: Option<CaptureResponse>,
) -> Result<Vec<BiometricSample>, CaptureValidationError> {
	let mut samples = response
		.and_then(|r| r.biometrics)
		.filter(|samples| !samples.is_empty())
		.ok_or(CaptureValidationError::EmptyResponse)?;

	for sample in samples.iter_mut() {
		match sample.error.take() {
			Some(error) if !error.is_success() =>
				return Err(CaptureValidationError::Modality {
					code: error.error_code,
					info: error.error_info,
				}),
			_ => {},
		}
	}

	Ok(samples)
}

/// Encodes validated samples as the base64 JSON payload carried by a biometric challenge.
pub fn encode_samples(samples: &[BiometricSample]) -> Result<String> {
	let json = serde_json::to_vec(samples).map_err(TransportError::from)?;

	Ok(STANDARD.encode(json))
}

fn code_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	match Value::deserialize(deserializer)? {
		Value::String(code) => Ok(code),
		Value::Number(code) => Ok(code.to_string()),
		other => Err(DeError::custom(format!("unsupported error code: {other}"))),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn response(value: Value) -> CaptureResponse {
		serde_json::from_value(value).expect("Capture fixture should deserialize.")
	}

	#[test]
	fn empty_or_missing_samples_are_rejected() {
		assert_eq!(validate_capture(None), Err(CaptureValidationError::EmptyResponse));
		assert_eq!(
			validate_capture(Some(response(serde_json::json!({ "biometrics": null })))),
			Err(CaptureValidationError::EmptyResponse)
		);
		assert_eq!(
			validate_capture(Some(response(serde_json::json!({ "biometrics": [] })))),
			Err(CaptureValidationError::EmptyResponse)
		);
	}

	#[test]
	fn first_modality_error_wins() {
		let capture = response(serde_json::json!({
			"biometrics": [
				{ "data": "a", "error": { "errorCode": "0", "errorInfo": "Success" } },
				{ "data": "b", "error": { "errorCode": "102", "errorInfo": "Timeout" } },
				{ "data": "c", "error": { "errorCode": 103, "errorInfo": "Bad quality" } }
			]
		}));

		assert_eq!(
			validate_capture(Some(capture)),
			Err(CaptureValidationError::Modality {
				code: "102".into(),
				info: Some("Timeout".into())
			})
		);
	}

	#[test]
	fn numeric_codes_are_accepted() {
		let capture = response(serde_json::json!({
			"biometrics": [{ "data": "a", "error": { "errorCode": 0 } }]
		}));

		assert_eq!(validate_capture(Some(capture)).expect("Zero code is success.").len(), 1);
	}

	#[test]
	fn successful_samples_lose_their_error_entry() {
		let capture = response(serde_json::json!({
			"biometrics": [
				{
					"specVersion": "0.9.5",
					"data": "eyJ",
					"hash": "ab",
					"error": { "errorCode": "0" }
				},
				{ "specVersion": "0.9.5", "data": "eyK", "hash": "cd" }
			]
		}));
		let samples = validate_capture(Some(capture)).expect("Capture should validate.");

		assert!(samples.iter().all(|s| s.error.is_none()));

		let json = serde_json::to_value(&samples).expect("Samples should serialize.");

		assert_eq!(
			json[0],
			serde_json::json!({ "specVersion": "0.9.5", "data": "eyJ", "hash": "ab" })
		);
	}

	#[test]
	fn encoded_samples_decode_back_to_json() {
		let samples = vec![BiometricSample {
			error: None,
			data: Map::from_iter([("data".to_owned(), Value::from("eyJ"))]),
		}];
		let encoded = encode_samples(&samples).expect("Samples should encode.");
		let decoded = STANDARD.decode(encoded).expect("Payload should be valid base64.");

		assert_eq!(decoded, br#"[{"data":"eyJ"}]"#);
	}
}
