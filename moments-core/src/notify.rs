//! Outgoing notifications.

use std::future::Future;

use crate::error::MomentsResult;

/// Sends an email to the partner. `Ok(false)` means the message was refused.
pub trait Notifier {
    fn send_email(&self, subject: &str, body: &str)
    -> impl Future<Output = MomentsResult<bool>> + Send;
}
