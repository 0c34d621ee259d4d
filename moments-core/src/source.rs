//! Collaborators that talk to the calendar provider.
//!
//! The planner only depends on these traits; the Google implementation lives
//! in `moments-provider-google`.

use std::future::Future;

use crate::error::MomentsResult;
use crate::event::{NewEvent, RawEvent};
use crate::window::EventWindow;

/// Sign-in against the calendar provider.
pub trait AuthProvider {
    /// Obtain an access token, prompting the user if needed.
    fn sign_in(&self) -> impl Future<Output = MomentsResult<String>> + Send;

    fn is_authenticated(&self) -> bool;
}

/// Where calendar events come from and go to.
pub trait EventSource {
    /// Events within `window`, ordered by start time.
    fn list_events(
        &self,
        window: &EventWindow,
    ) -> impl Future<Output = MomentsResult<Vec<RawEvent>>> + Send;

    fn create_event(&self, event: &NewEvent) -> impl Future<Output = MomentsResult<RawEvent>> + Send;

    fn delete_event(&self, event_id: &str) -> impl Future<Output = MomentsResult<()>> + Send;
}
