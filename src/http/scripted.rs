//! Thread-safe in-memory [`AuthApi`] that replays queued replies for local development and tests.

// std
use std::collections::VecDeque;
// self
use crate::{
	_prelude::*,
	auth::{CaptchaToken, ChallengeList, TransactionId},
	error::TransportError,
	http::{ApiEnvelope, ApiFuture, AuthApi, AuthenticateResponse, SendOtpResponse},
};

/// Simulated transport failure raised by [`ScriptedAuthApi`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Scripted transport failure: {0}.")]
pub struct ScriptedTransportError(pub String);

/// Call observed by a [`ScriptedAuthApi`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedCall {
	/// An authenticate call.
	Authenticate {
		/// Submitted transaction.
		transaction_id: TransactionId,
		/// Submitted identifier.
		identifier: String,
		/// Submitted challenges.
		challenges: ChallengeList,
	},
	/// A send-OTP call.
	SendOtp {
		/// Submitted transaction.
		transaction_id: TransactionId,
		/// Submitted identifier.
		identifier: String,
		/// Submitted channels.
		channels: Vec<String>,
		/// Submitted captcha token.
		captcha_token: Option<CaptchaToken>,
	},
}

/// Backend double that answers each call with the next queued reply.
///
/// An empty queue answers with a transport failure so unexpected calls surface in tests.
#[derive(Debug, Default)]
pub struct ScriptedAuthApi(Mutex<Script>);
impl ScriptedAuthApi {
	/// Queues an envelope for the next authenticate call.
	pub fn push_authenticate(&self, envelope: ApiEnvelope<AuthenticateResponse>) -> &Self {
		self.0.lock().authenticate.push_back(Ok(envelope));

		self
	}

	/// Queues a transport failure for the next authenticate call.
	pub fn fail_authenticate(&self, reason: impl Into<String>) -> &Self {
		self.0.lock().authenticate.push_back(Err(ScriptedTransportError(reason.into())));

		self
	}

	/// Queues an envelope for the next send-OTP call.
	pub fn push_send_otp(&self, envelope: ApiEnvelope<SendOtpResponse>) -> &Self {
		self.0.lock().send_otp.push_back(Ok(envelope));

		self
	}

	/// Queues a transport failure for the next send-OTP call.
	pub fn fail_send_otp(&self, reason: impl Into<String>) -> &Self {
		self.0.lock().send_otp.push_back(Err(ScriptedTransportError(reason.into())));

		self
	}

	/// Every call received so far, in order.
	pub fn calls(&self) -> Vec<RecordedCall> {
		self.0.lock().calls.clone()
	}

	/// Number of calls received so far.
	pub fn call_count(&self) -> usize {
		self.0.lock().calls.len()
	}
}
impl AuthApi for ScriptedAuthApi {
	fn authenticate<'a>(
		&'a self,
		transaction_id: &'a TransactionId,
		identifier: &'a str,
		challenges: &'a ChallengeList,
	) -> ApiFuture<'a, AuthenticateResponse> {
		let reply = {
			let mut script = self.0.lock();

			script.calls.push(RecordedCall::Authenticate {
				transaction_id: transaction_id.clone(),
				identifier: identifier.to_owned(),
				challenges: challenges.clone(),
			});

			script.authenticate.pop_front()
		};

		Box::pin(async move { resolve(reply) })
	}

	fn send_otp<'a>(
		&'a self,
		transaction_id: &'a TransactionId,
		identifier: &'a str,
		channels: &'a [String],
		captcha_token: Option<&'a CaptchaToken>,
	) -> ApiFuture<'a, SendOtpResponse> {
		let reply = {
			let mut script = self.0.lock();

			script.calls.push(RecordedCall::SendOtp {
				transaction_id: transaction_id.clone(),
				identifier: identifier.to_owned(),
				channels: channels.to_vec(),
				captcha_token: captcha_token.cloned(),
			});

			script.send_otp.pop_front()
		};

		Box::pin(async move { resolve(reply) })
	}
}

type Reply<T> = Result<ApiEnvelope<T>, ScriptedTransportError>;

#[derive(Debug, Default)]
struct Script {
	authenticate: VecDeque<Reply<AuthenticateResponse>>,
	send_otp: VecDeque<Reply<SendOtpResponse>>,
	calls: Vec<RecordedCall>,
}

fn resolve<T>(reply: Option<Reply<T>>) -> Result<ApiEnvelope<T>> {
	match reply {
		Some(Ok(envelope)) => Ok(envelope),
		Some(Err(e)) => Err(TransportError::network(e).into()),
		None => {
			let reason = ScriptedTransportError("no reply queued".into());

			Err(TransportError::network(reason).into())
		},
	}
}
