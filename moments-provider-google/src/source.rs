//! Google Calendar as an event source.

use anyhow::{Context, Result};
use google_calendar::Client;
use google_calendar::types::{OrderBy, SendUpdates};
use moments_core::error::{MomentsError, MomentsResult};
use moments_core::event::{NewEvent, RawEvent};
use moments_core::source::EventSource;
use moments_core::window::EventWindow;

use crate::convert::{raw_from_google, start_key, to_google};
use crate::session::Session;

pub struct GoogleEventSource {
    account_email: String,
    calendar_id: String,
}

impl GoogleEventSource {
    pub fn new(account_email: impl Into<String>, calendar_id: impl Into<String>) -> Self {
        GoogleEventSource {
            account_email: account_email.into(),
            calendar_id: calendar_id.into(),
        }
    }

    async fn client(&self) -> Result<Client> {
        Session::load_valid(&self.account_email).await?.client()
    }

    async fn fetch(&self, window: &EventWindow) -> Result<Vec<RawEvent>> {
        let client = self.client().await?;

        let response = client
            .events()
            .list_all(
                &self.calendar_id,
                "",
                0,
                OrderBy::StartTime,
                &[],
                "", // search query
                &[],
                false,
                false,
                true, // expand recurring events into instances
                &window.to_rfc3339(),
                &window.from_rfc3339(),
                "",
                "",
            )
            .await
            .context("Failed to fetch events")?;

        let mut events: Vec<RawEvent> = response.body.into_iter().map(raw_from_google).collect();
        events.sort_by_key(start_key);

        tracing::debug!(
            calendar = %self.calendar_id,
            count = events.len(),
            from = %window.from,
            to = %window.to,
            "fetched events"
        );
        Ok(events)
    }

    async fn insert(&self, event: &NewEvent) -> Result<RawEvent> {
        let client = self.client().await?;
        let google_event = to_google(event);

        let response = client
            .events()
            .insert(
                &self.calendar_id,
                0,
                0,
                false,
                SendUpdates::None,
                false,
                &google_event,
            )
            .await
            .with_context(|| format!("Failed to create event: {}", &google_event.summary))?;

        Ok(raw_from_google(response.body))
    }

    async fn remove(&self, event_id: &str) -> Result<()> {
        let client = self.client().await?;

        let result = client
            .events()
            .delete(&self.calendar_id, event_id, false, SendUpdates::None)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                let error_str = e.to_string();
                if is_gone(&error_str) {
                    tracing::debug!(%event_id, "event already gone");
                    Ok(())
                } else {
                    Err(e).with_context(|| format!("Failed to delete event: {}", event_id))
                }
            }
        }
    }
}

fn is_gone(error: &str) -> bool {
    error.contains("410") || error.contains("Gone")
}

fn provider_error(e: anyhow::Error) -> MomentsError {
    MomentsError::Provider(format!("{:#}", e))
}

impl EventSource for GoogleEventSource {
    async fn list_events(&self, window: &EventWindow) -> MomentsResult<Vec<RawEvent>> {
        self.fetch(window).await.map_err(provider_error)
    }

    async fn create_event(&self, event: &NewEvent) -> MomentsResult<RawEvent> {
        self.insert(event).await.map_err(provider_error)
    }

    async fn delete_event(&self, event_id: &str) -> MomentsResult<()> {
        self.remove(event_id).await.map_err(provider_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gone_responses_count_as_deleted() {
        assert!(is_gone("code: 410 Gone, error: Resource has been deleted"));
        assert!(!is_gone("code: 404 Not Found"));
    }

    #[test]
    fn errors_keep_their_context_chain() {
        let err = anyhow::anyhow!("HTTP 403").context("Failed to fetch events");
        match provider_error(err) {
            MomentsError::Provider(message) => {
                assert_eq!(message, "Failed to fetch events: HTTP 403");
            }
            other => panic!("expected provider error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_session_is_a_provider_error() {
        let source = GoogleEventSource::new("nobody-here@invalid.test", "primary");
        let window = EventWindow::next_week(chrono::Utc::now());

        let result = source.list_events(&window).await;

        assert!(matches!(result, Err(MomentsError::Provider(_))));
    }
}
