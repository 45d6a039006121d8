//! In-process [`CaptureWidget`] that records lifecycle calls for local development and tests.

// self
use crate::{
	_prelude::*,
	capture::{CaptureConfig, CapturePatch, CaptureWidget},
};

/// Lifecycle call observed by a [`RecordingCaptureWidget`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaptureCall {
	/// [`CaptureWidget::initialize`] was invoked.
	Initialize(CaptureConfig),
	/// [`CaptureWidget::reconfigure`] was invoked.
	Reconfigure(CapturePatch),
}

/// Capture widget that keeps the effective configuration and the call log in shared state, so
/// clones handed to a flow remain observable from the test.
#[derive(Clone, Debug, Default)]
pub struct RecordingCaptureWidget(Arc<Mutex<RecordingState>>);
impl RecordingCaptureWidget {
	/// Effective configuration after applying every patch, if initialized.
	pub fn current(&self) -> Option<CaptureConfig> {
		self.0.lock().current.clone()
	}

	/// Every lifecycle call in order.
	pub fn calls(&self) -> Vec<CaptureCall> {
		self.0.lock().calls.clone()
	}

	/// Number of [`CaptureWidget::initialize`] calls.
	pub fn initialize_count(&self) -> usize {
		self.0.lock().calls.iter().filter(|call| matches!(call, CaptureCall::Initialize(_))).count()
	}
}
impl CaptureWidget for RecordingCaptureWidget {
	fn initialize(&mut self, config: CaptureConfig) {
		let mut state = self.0.lock();

		state.current = Some(config.clone());
		state.calls.push(CaptureCall::Initialize(config));
	}

	fn reconfigure(&mut self, patch: CapturePatch) {
		let mut state = self.0.lock();

		if let Some(current) = state.current.as_mut() {
			patch.apply_to(current);
		}

		state.calls.push(CaptureCall::Reconfigure(patch));
	}
}

#[derive(Debug, Default)]
struct RecordingState {
	current: Option<CaptureConfig>,
	calls: Vec<CaptureCall>,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::capture::SbiEnv;

	#[test]
	fn clones_share_recorded_state() {
		let observer = RecordingCaptureWidget::default();
		let mut widget = observer.clone();

		widget.initialize(CaptureConfig::new("1234", SbiEnv::for_domain("https://idp"), "en"));
		widget.reconfigure(CapturePatch::disabled(false));

		assert_eq!(observer.initialize_count(), 1);
		assert_eq!(observer.calls().len(), 2);
		assert!(!observer.current().expect("Widget should be initialized.").disable);
	}
}
