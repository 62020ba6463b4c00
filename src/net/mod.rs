//! Network layer: the authenticated HTTP wrapper, the response envelope, and
//! the notification sink errors are reported to.
//!
//! ERROR HANDLING
//! ==============
//! Every failure is reported once through the [`notify::Notifier`] and then
//! returned to the caller as an [`crate::ApiError`]. Callers may act on the
//! error but never need to surface it to the user themselves.

pub mod envelope;
pub mod http;
pub mod notify;

pub use envelope::Envelope;
pub use http::{ApiRequest, HttpClient, RequestBody};
pub use notify::{NoticeLevel, NoticeQueue, Notifier, TracingNotifier};
