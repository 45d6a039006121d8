#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
// self
use oidc_login_flows::{
	_preludet::*,
	auth::{CaptchaToken, Challenge, ChallengeList, TransactionId},
	capture::RecordingCaptureWidget,
	error::TransportError,
	flows::{BiometricLoginFlow, OtpOutcome, OtpRequestFlow},
	http::{AuthApi, ReqwestAuthApi, SendOtpResponse},
};

fn api_for(server: &MockServer) -> ReqwestAuthApi {
	let base = Url::parse(&server.url("/v1/idp")).expect("Mock base URL should parse.");

	ReqwestAuthApi::new(&base).expect("Reqwest client should build.")
}

fn transaction() -> TransactionId {
	TransactionId::new(TEST_TRANSACTION_ID).expect("Fixture transaction should be valid.")
}

#[tokio::test]
async fn authenticate_posts_json_and_decodes_response() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v1/idp/authorization/authenticate")
				.header("content-type", "application/json")
				.header("X-XSRF-TOKEN", "xsrf-1");
			then.status(200).header("content-type", "application/json").body(
				"{\"responseTime\":\"2024-05-01T10:00:00.000Z\",\"response\":{\"transactionId\":\"t\",\"consentAction\":\"NOCAPTURE\"},\"errors\":[]}",
			);
		})
		.await;
	let api = api_for(&server);

	api.set_xsrf_token("xsrf-1");

	let envelope = api
		.authenticate(
			&transaction(),
			"123456/78/90",
			&ChallengeList::single(Challenge::biometric("eyJ9")),
		)
		.await
		.expect("Authenticate call should succeed.");
	let response = envelope.response.expect("Response payload should be present.");

	assert!(envelope.errors.is_empty());
	assert_eq!(response.consent_action.as_deref(), Some("NOCAPTURE"));
	assert_eq!(response.extra.get("transactionId"), Some(&serde_json::json!("t")));

	mock.assert_async().await;
}

#[tokio::test]
async fn backend_errors_are_returned_as_data() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/idp/authorization/send-otp");
			then.status(200).header("content-type", "application/json").body(
				"{\"response\":null,\"errors\":[{\"errorCode\":\"invalid_identifier\",\"errorMessage\":\"Unknown\"}]}",
			);
		})
		.await;
	let api = api_for(&server);
	let channels = vec!["email".to_owned()];
	let envelope = api
		.send_otp(&transaction(), "1", &channels, Some(&CaptchaToken::new("c")))
		.await
		.expect("Send-OTP call should succeed at the transport level.");
	let first = envelope.first_error().expect("First error should be present.");

	assert_eq!(first.error_code, "invalid_identifier");
	assert_eq!(first.error_message.as_deref(), Some("Unknown"));
	assert!(envelope.response.is_none());

	mock.assert_async().await;
}

#[tokio::test]
async fn non_success_status_and_bad_json_are_transport_errors() {
	let server = MockServer::start_async().await;
	let unavailable = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/idp/authorization/send-otp");
			then.status(503);
		})
		.await;
	let garbled = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/idp/authorization/authenticate");
			then.status(200).header("content-type", "application/json").body("{\"errors\":{}}");
		})
		.await;
	let api = api_for(&server);
	let err = api
		.send_otp(&transaction(), "1", &[], None)
		.await
		.expect_err("HTTP 503 must surface as a transport error.");

	assert!(matches!(err, Error::Transport(TransportError::UnexpectedStatus { status: 503 })));

	let err = api
		.authenticate(&transaction(), "1", &ChallengeList::default())
		.await
		.expect_err("Malformed envelopes must surface as transport errors.");

	assert!(matches!(err, Error::Transport(TransportError::Decode { .. })));

	unavailable.assert_async().await;
	garbled.assert_async().await;
}

#[tokio::test]
async fn flows_run_end_to_end_over_http() {
	let server = MockServer::start_async().await;
	let send_otp = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/idp/authorization/send-otp");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"response\":{\"maskedMobile\":\"******6789\"},\"errors\":null}");
		})
		.await;
	let authenticate = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/idp/authorization/authenticate");
			then.status(500);
		})
		.await;
	let api = Arc::new(api_for(&server));
	let locale = Arc::new(test_locale_bundle());
	let mut otp = OtpRequestFlow::new(
		test_oidc_context(),
		test_flow_config(),
		api.clone(),
		locale.clone(),
		|_: &str, _: &SendOtpResponse| {},
	);

	otp.on_identifier_input("1234567890", 10);

	let OtpOutcome::Sent(response) = otp.send_otp().await else {
		panic!("OTP should be sent.");
	};

	assert_eq!(response.masked_mobile.as_deref(), Some("******6789"));

	let mut biometric = BiometricLoginFlow::new(
		test_oidc_context(),
		test_flow_config(),
		api,
		RecordingCaptureWidget::default(),
		locale,
	);
	let capture = serde_json::from_value(serde_json::json!({ "biometrics": [{ "data": "x" }] }))
		.expect("Capture fixture should deserialize.");

	biometric.on_capture(Some(capture)).await;

	assert_eq!(biometric.banner().map(|b| b.code.as_str()), Some("authentication_failed_msg"));

	send_otp.assert_async().await;
	authenticate.assert_async().await;
}
