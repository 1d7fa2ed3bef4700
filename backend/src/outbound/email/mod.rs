//! Winner email adapters.
//!
//! [`ResendMailer`] posts one HTML message per notice to the Resend HTTP
//! API. [`DisabledMailer`] stands in when no API key is configured and fails
//! every send.

mod disabled;
mod resend_mailer;
mod template;

pub use disabled::DisabledMailer;
pub use resend_mailer::{DEFAULT_RESEND_ENDPOINT, ResendIdentity, ResendMailer};
