//! Login flow state machines.
//!
//! Each flow owns its per-instance form state (identifier, status, error banner), calls the
//! [`AuthApi`](crate::http::AuthApi) once per submission, and reports a typed outcome. A
//! rendering layer forwards user events in and reads the state back out; nothing here touches
//! the DOM.

pub mod biometric;
pub mod common;
pub mod consent;
pub mod otp;

pub use biometric::*;
pub use common::*;
pub use consent::*;
pub use otp::*;
