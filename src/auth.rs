//! Auth-domain identifiers, challenge payloads, and redacted secrets.

pub mod challenge;
pub mod id;
pub mod secret;

pub use challenge::*;
pub use id::*;
pub use secret::*;
