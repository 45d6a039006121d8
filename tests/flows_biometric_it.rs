// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
// self
use oidc_login_flows::{
	_preludet::*,
	auth::AuthFactorType,
	capture::{CaptureResponse, CaptureValidationError},
	flows::{BiometricOutcome, SubmissionStatus},
	http::{ApiEnvelope, ApiError, AuthenticateResponse, scripted::RecordedCall, ScriptedAuthApi},
	locale::AUTHENTICATION_FAILED_KEY,
};

fn capture(value: serde_json::Value) -> CaptureResponse {
	serde_json::from_value(value).expect("Capture fixture should deserialize.")
}

fn good_capture() -> CaptureResponse {
	capture(serde_json::json!({
		"biometrics": [{
			"specVersion": "0.9.5",
			"data": "eyJiaW9UeXBlIjoiRmluZ2VyIn0",
			"hash": "A1B2",
			"error": { "errorCode": "0", "errorInfo": "Success" }
		}]
	}))
}

fn consent_response(action: &str) -> ApiEnvelope<AuthenticateResponse> {
	ApiEnvelope::success(AuthenticateResponse {
		consent_action: Some(action.into()),
		..Default::default()
	})
}

#[tokio::test]
async fn empty_capture_never_calls_backend() {
	let api = Arc::new(ScriptedAuthApi::default());
	let mut flow = build_test_biometric_flow(api.clone(), test_flow_config());

	flow.mount("en").expect("Mount should succeed.");
	flow.on_identifier_input("1234567890", 10);

	let outcome = flow.on_capture(Some(capture(serde_json::json!({ "biometrics": [] })))).await;

	assert_eq!(outcome, BiometricOutcome::Skipped(CaptureValidationError::EmptyResponse));
	assert_eq!(
		flow.on_capture(None).await,
		BiometricOutcome::Skipped(CaptureValidationError::EmptyResponse)
	);
	assert_eq!(api.call_count(), 0);
	assert!(flow.banner().is_none(), "Local validation failures stay silent.");
	assert_eq!(flow.status(), SubmissionStatus::Idle);
}

#[tokio::test]
async fn modality_error_is_silent_and_skips_submission() {
	let api = Arc::new(ScriptedAuthApi::default());
	let mut flow = build_test_biometric_flow(api.clone(), test_flow_config());
	let outcome = flow
		.on_capture(Some(capture(serde_json::json!({
			"biometrics": [{
				"data": "",
				"error": { "errorCode": "101", "errorInfo": "No device" }
			}]
		}))))
		.await;

	assert_eq!(
		outcome,
		BiometricOutcome::Skipped(CaptureValidationError::Modality {
			code: "101".into(),
			info: Some("No device".into())
		})
	);
	assert_eq!(api.call_count(), 0);
	assert!(flow.banner().is_none());
}

#[tokio::test]
async fn successful_capture_submits_one_biometric_challenge_and_redirects() {
	let api = Arc::new(ScriptedAuthApi::default());

	api.push_authenticate(consent_response("CAPTURE"));

	let mut flow = build_test_biometric_flow(api.clone(), test_flow_config());

	flow.mount("en").expect("Mount should succeed.");
	flow.on_identifier_input("1234567890", 10);

	let outcome = flow.on_capture(Some(good_capture())).await;
	let BiometricOutcome::Redirect(redirect) = outcome else {
		panic!("Expected a redirect.");
	};

	assert!(redirect.replace);
	assert!(
		redirect
			.location
			.starts_with("/idp/consent?nonce=n-0S6_WzA2Mj&state=af0ifjsldkj&consentAction=CAPTURE#")
	);
	assert_eq!(flow.status(), SubmissionStatus::Idle);
	assert!(flow.banner().is_none());

	let calls = api.calls();
	let [RecordedCall::Authenticate { transaction_id, identifier, challenges }] = calls.as_slice()
	else {
		panic!("Expected exactly one authenticate call, got {calls:?}.");
	};

	assert_eq!(transaction_id.as_ref(), TEST_TRANSACTION_ID);
	assert_eq!(identifier, "123456/78/90");
	assert_eq!(challenges.len(), 1);

	let challenge = challenges.iter().next().expect("One challenge should be present.");

	assert_eq!(challenge.auth_factor_type, AuthFactorType::Biometric);
	assert_eq!(challenge.format, "encoded-json");

	let decoded: serde_json::Value = serde_json::from_slice(
		&STANDARD.decode(&challenge.challenge).expect("Challenge should be base64."),
	)
	.expect("Challenge should be JSON.");

	assert_eq!(
		decoded,
		serde_json::json!([{
			"specVersion": "0.9.5",
			"data": "eyJiaW9UeXBlIjoiRmluZ2VyIn0",
			"hash": "A1B2"
		}])
	);
}

#[tokio::test]
async fn backend_errors_prefer_domain_translation() {
	let api = Arc::new(ScriptedAuthApi::default());

	api.push_authenticate(ApiEnvelope::failure([
		ApiError::new("IDA-BIA-001").with_message("Mismatch"),
		ApiError::new("invalid_transaction"),
	]))
	.push_authenticate(ApiEnvelope::failure([ApiError::new("invalid_transaction")]));

	let mut flow = build_test_biometric_flow(api.clone(), test_flow_config());
	let outcome = flow.on_capture(Some(good_capture())).await;

	assert!(matches!(
		&outcome,
		BiometricOutcome::Rejected { banner_key, error }
			if banner_key == "biometrics.IDA-BIA-001" && error.error_code == "IDA-BIA-001"
	));
	assert_eq!(flow.banner().map(|b| b.code.as_str()), Some("biometrics.IDA-BIA-001"));
	assert_eq!(flow.status(), SubmissionStatus::Idle);

	let outcome = flow.on_capture(Some(good_capture())).await;

	assert!(matches!(
		&outcome,
		BiometricOutcome::Rejected { banner_key, .. } if banner_key == "invalid_transaction"
	));
	assert_eq!(flow.banner().map(|b| b.code.as_str()), Some("invalid_transaction"));
}

#[tokio::test]
async fn transport_failure_shows_generic_banner() {
	let api = Arc::new(ScriptedAuthApi::default());

	api.fail_authenticate("connection reset");

	let mut flow = build_test_biometric_flow(api, test_flow_config());
	let outcome = flow.on_capture(Some(good_capture())).await;
	let banner = flow.banner().expect("Transport failures must raise a banner.");

	assert_eq!(outcome, BiometricOutcome::Failed);
	assert_eq!(banner.code, AUTHENTICATION_FAILED_KEY);
	assert!(banner.visible);
	assert_eq!(flow.status(), SubmissionStatus::Error);
}

#[tokio::test]
async fn next_capture_and_dismissal_clear_the_banner() {
	let api = Arc::new(ScriptedAuthApi::default());

	api.push_authenticate(ApiEnvelope::failure([ApiError::new("auth_failed")]));

	let mut flow = build_test_biometric_flow(api, test_flow_config());

	flow.on_capture(Some(good_capture())).await;

	assert_eq!(flow.banner().map(|b| b.code.as_str()), Some("biometrics.auth_failed"));

	flow.dismiss_banner();

	assert!(flow.banner().is_none());

	flow.on_capture(Some(good_capture())).await;

	assert!(flow.banner().is_some(), "Exhausted script fails in transport.");

	flow.on_capture(None).await;

	assert!(flow.banner().is_none(), "A new capture clears the previous banner.");
}
