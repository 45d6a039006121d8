//! Drives the OTP request flow against a mocked identity provider using the default reqwest
//! transport, then shows how backend errors resolve to localized banners.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use oidc_login_flows::{
	auth::{CaptchaToken, TransactionId},
	config::FlowConfig,
	flows::{OidcContext, OtpOutcome, OtpRequestFlow},
	http::{ReqwestAuthApi, SendOtpResponse},
	locale::{LocaleBundle, LocaleCatalog},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let send_otp = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v1/idp/authorization/send-otp")
				.header("X-XSRF-TOKEN", "demo-xsrf");
			then.status(200).header("content-type", "application/json").body(
				"{\"response\":{\"maskedEmail\":\"a***@example.com\",\"maskedMobile\":\"******7890\"},\"errors\":[]}",
			);
		})
		.await;
	let config = FlowConfig::resolve(&serde_json::json!({
		"send.otp.channels": "email,phone",
		"captcha.enable": "otp",
		"captcha.sitekey": "demo-site-key",
	}))?
	.with_public_path("/idp");
	let locale: Arc<LocaleBundle> = Arc::new(
		"{\"errors\":{\"otp\":{\"send_otp_failed_msg\":\"Could not send the OTP.\"}}}".parse()?,
	);
	let api = Arc::new(ReqwestAuthApi::new(&Url::parse(&server.url("/v1/idp"))?)?);

	api.set_xsrf_token("demo-xsrf");

	let context = OidcContext::new(TransactionId::new("demo-transaction")?)
		.with_nonce("demo-nonce")
		.with_state("demo-state");
	let mut flow = OtpRequestFlow::new(
		context,
		config,
		api,
		locale.clone(),
		|identifier: &str, response: &SendOtpResponse| {
			println!(
				"OTP sent for {identifier} to {:?} / {:?}.",
				response.masked_email, response.masked_mobile
			);
		},
	);

	flow.on_identifier_input("1234567890", 10);

	println!("Formatted identifier: {}.", flow.identifier().value());
	println!("Submit enabled before captcha: {}.", flow.can_submit());

	flow.on_captcha_solved(CaptchaToken::new("demo-captcha"));

	match flow.send_otp().await {
		OtpOutcome::Sent(_) => println!("Parent flow can move on to OTP verification."),
		other => println!("Unexpected outcome: {other:?}."),
	}

	println!(
		"Transport failure banner would read: {:?}.",
		locale.message("otp.send_otp_failed_msg")
	);

	send_otp.assert_async().await;

	Ok(())
}
