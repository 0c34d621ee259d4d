//! The "schedule a moment" form and its submission flow.
//!
//! ```text
//! Idle -> Validating -> Submitting -> Success
//!              |              \----> Failed
//!              \-> ConflictRejected
//! ```
//!
//! Validation problems (missing fields, inverted times) keep the form in
//! `Idle` and never reach the event source. Editing the form after a
//! terminal state puts it back in `Idle`.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::conflict::find_conflicts;
use crate::error::{MomentsError, MomentsResult};
use crate::event::{CalendarEvent, NewEvent};
use crate::records::Desire;
use crate::refresh::{RefreshBus, RefreshSignal};
use crate::source::EventSource;

/// Shown to the user when the provider rejects a submission.
pub const SUBMIT_FAILED_MESSAGE: &str = "Failed to schedule moment";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MomentMode {
    /// Free-text title and description
    #[default]
    Custom,
    /// Title, description and category copied from a desire
    FromDesire,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleForm {
    pub mode: MomentMode,
    pub day: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub desire_id: Option<String>,
}

impl ScheduleForm {
    /// Suggested start when the user hasn't picked one.
    pub fn default_start() -> NaiveTime {
        NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
    }

    /// Suggested end when the user hasn't picked one.
    pub fn default_end() -> NaiveTime {
        NaiveTime::from_hms_opt(10, 0, 0).unwrap_or(NaiveTime::MIN)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Validating,
    Submitting,
    Success {
        event: CalendarEvent,
        desire_id: Option<String>,
    },
    ConflictRejected {
        conflicts: Vec<CalendarEvent>,
    },
    Failed {
        message: String,
    },
}

impl FormState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FormState::Success { .. } | FormState::ConflictRejected { .. } | FormState::Failed { .. }
        )
    }
}

/// A form that passed validation, resolved to instants.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Draft {
    title: String,
    description: String,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    desire_id: Option<String>,
}

pub struct Scheduler {
    form: ScheduleForm,
    state: FormState,
    tz: Tz,
    bus: RefreshBus,
}

impl Scheduler {
    pub fn new(tz: Tz, bus: RefreshBus) -> Self {
        Scheduler {
            form: ScheduleForm::default(),
            state: FormState::Idle,
            tz,
            bus,
        }
    }

    pub fn form(&self) -> &ScheduleForm {
        &self.form
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn select_day(&mut self, day: NaiveDate) {
        self.edit().day = Some(day);
    }

    pub fn set_times(&mut self, start: NaiveTime, end: NaiveTime) {
        let form = self.edit();
        form.start_time = Some(start);
        form.end_time = Some(end);
    }

    pub fn set_title(&mut self, title: &str) -> MomentsResult<()> {
        self.ensure_custom()?;
        self.edit().title = title.to_string();
        Ok(())
    }

    pub fn set_description(&mut self, description: &str) -> MomentsResult<()> {
        self.ensure_custom()?;
        self.edit().description = description.to_string();
        Ok(())
    }

    /// Switch to free-text mode, dropping any selected desire.
    pub fn use_custom(&mut self) {
        let form = self.edit();
        form.mode = MomentMode::Custom;
        form.desire_id = None;
        form.category = None;
    }

    /// Use `desire` as the template; its fields become read-only.
    pub fn use_desire(&mut self, desire: &Desire) {
        let form = self.edit();
        form.mode = MomentMode::FromDesire;
        form.desire_id = Some(desire.id.clone());
        form.title = desire.title.clone();
        form.description = desire.description.clone();
        form.category = desire.category.clone();
    }

    /// Like `use_desire`, looking the template up by id in `desires`.
    pub fn use_desire_id(&mut self, id: &str, desires: &[Desire]) -> MomentsResult<()> {
        let desire = desires
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| MomentsError::NotFound(format!("desire {}", id)))?;
        self.use_desire(desire);
        Ok(())
    }

    /// Validate, check `day_events` for conflicts, and create the event.
    ///
    /// `day_events` are the loaded events in progress on the selected day. Validation
    /// errors are returned as `Err` with the form left in `Idle`; every other
    /// outcome is reported through the returned state.
    pub async fn submit<S: EventSource>(
        &mut self,
        source: &S,
        day_events: &[CalendarEvent],
    ) -> MomentsResult<&FormState> {
        let draft = self.validate()?;

        self.transition(FormState::Validating);
        let conflicts: Vec<CalendarEvent> = find_conflicts(day_events, draft.start, draft.end)?
            .into_iter()
            .cloned()
            .collect();

        if !conflicts.is_empty() {
            tracing::debug!(count = conflicts.len(), "moment conflicts with existing events");
            self.transition(FormState::ConflictRejected { conflicts });
            return Ok(&self.state);
        }

        self.transition(FormState::Submitting);
        let new_event = NewEvent {
            title: draft.title.clone(),
            description: draft.description.clone(),
            start: draft.start,
            end: draft.end,
            time_zone: self.tz.name().to_string(),
        };

        match source.create_event(&new_event).await {
            Ok(created) => {
                let event = CalendarEvent::from_raw(created, self.tz).unwrap_or_else(|| {
                    CalendarEvent {
                        id: String::new(),
                        title: draft.title.clone(),
                        start: draft.start,
                        end: draft.end,
                        description: draft.description.clone(),
                        location: String::new(),
                    }
                });

                tracing::info!(event_id = %event.id, title = %event.title, "moment scheduled");
                self.form = ScheduleForm::default();
                self.bus.publish(RefreshSignal::EventCreated {
                    event_id: event.id.clone(),
                });
                self.transition(FormState::Success {
                    event,
                    desire_id: draft.desire_id,
                });
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to create calendar event");
                self.transition(FormState::Failed {
                    message: SUBMIT_FAILED_MESSAGE.to_string(),
                });
            }
        }

        Ok(&self.state)
    }

    fn validate(&self) -> MomentsResult<Draft> {
        let form = &self.form;

        let day = form
            .day
            .ok_or_else(|| MomentsError::Validation("Select a day first".to_string()))?;
        let (start_time, end_time) = match (form.start_time, form.end_time) {
            (Some(start), Some(end)) => (start, end),
            _ => return Err(MomentsError::Validation("Pick a time".to_string())),
        };

        match form.mode {
            MomentMode::Custom if form.title.trim().is_empty() => {
                return Err(MomentsError::Validation("Title is required".to_string()));
            }
            MomentMode::FromDesire if form.desire_id.is_none() => {
                return Err(MomentsError::Validation("Choose a desire".to_string()));
            }
            _ => {}
        }

        let start = self.resolve(day, start_time)?;
        let end = self.resolve(day, end_time)?;
        if start >= end {
            return Err(MomentsError::InvalidInterval);
        }

        Ok(Draft {
            title: form.title.trim().to_string(),
            description: form.description.clone(),
            start,
            end,
            desire_id: form.desire_id.clone(),
        })
    }

    fn resolve(&self, day: NaiveDate, time: NaiveTime) -> MomentsResult<DateTime<Utc>> {
        self.tz
            .from_local_datetime(&day.and_time(time))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| {
                MomentsError::Validation(format!(
                    "{} {} doesn't exist in {}",
                    day,
                    time.format("%H:%M"),
                    self.tz.name()
                ))
            })
    }

    fn ensure_custom(&self) -> MomentsResult<()> {
        if self.form.mode == MomentMode::FromDesire {
            return Err(MomentsError::Validation(
                "Title and description come from the selected desire".to_string(),
            ));
        }
        Ok(())
    }

    /// Mutable access to the form; leaving a terminal state on any edit.
    fn edit(&mut self) -> &mut ScheduleForm {
        if self.state.is_terminal() {
            self.transition(FormState::Idle);
        }
        &mut self.form
    }

    fn transition(&mut self, next: FormState) {
        tracing::debug!(from = ?state_name(&self.state), to = ?state_name(&next), "scheduler state");
        self.state = next;
    }
}

fn state_name(state: &FormState) -> &'static str {
    match state {
        FormState::Idle => "idle",
        FormState::Validating => "validating",
        FormState::Submitting => "submitting",
        FormState::Success { .. } => "success",
        FormState::ConflictRejected { .. } => "conflict_rejected",
        FormState::Failed { .. } => "failed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::memory::MemorySource;
    use chrono_tz::UTC;
    use std::sync::atomic::Ordering;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn morning_meeting() -> CalendarEvent {
        CalendarEvent {
            id: "standup".to_string(),
            title: "Standup".to_string(),
            start: Utc.with_ymd_and_hms(2025, 3, 20, 9, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 3, 20, 10, 0, 0).unwrap(),
            description: String::new(),
            location: String::new(),
        }
    }

    fn filled(bus: &RefreshBus, start: NaiveTime, end: NaiveTime) -> Scheduler {
        let mut scheduler = Scheduler::new(UTC, bus.clone());
        scheduler.select_day(day());
        scheduler.set_times(start, end);
        scheduler.set_title("Coffee walk").unwrap();
        scheduler.set_description("Around the park").unwrap();
        scheduler
    }

    #[tokio::test]
    async fn back_to_back_moment_is_scheduled() {
        let bus = RefreshBus::new();
        let mut refresh = bus.subscribe();
        let source = MemorySource::default();
        let mut scheduler = filled(&bus, time(10, 0), time(11, 0));

        let state = scheduler.submit(&source, &[morning_meeting()]).await.unwrap();

        match state {
            FormState::Success { event, desire_id } => {
                assert_eq!(event.title, "Coffee walk");
                assert_eq!(event.start, Utc.with_ymd_and_hms(2025, 3, 20, 10, 0, 0).unwrap());
                assert_eq!(*desire_id, None);
            }
            other => panic!("expected success, got {:?}", other),
        }
        assert_eq!(source.create_calls.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.form(), &ScheduleForm::default());
        assert!(matches!(
            refresh.try_recv(),
            Some(RefreshSignal::EventCreated { .. })
        ));
    }

    #[tokio::test]
    async fn overlapping_moment_is_rejected_without_network_call() {
        let bus = RefreshBus::new();
        let source = MemorySource::default();
        let mut scheduler = filled(&bus, time(9, 30), time(10, 30));

        let state = scheduler.submit(&source, &[morning_meeting()]).await.unwrap();

        match state {
            FormState::ConflictRejected { conflicts } => {
                assert_eq!(conflicts, &vec![morning_meeting()]);
            }
            other => panic!("expected conflict, got {:?}", other),
        }
        assert_eq!(source.create_calls.load(Ordering::SeqCst), 0);
        // Fields survive so the user can pick another time
        assert_eq!(scheduler.form().title, "Coffee walk");
    }

    #[tokio::test]
    async fn empty_title_without_desire_stays_idle() {
        let bus = RefreshBus::new();
        let source = MemorySource::default();
        let mut scheduler = Scheduler::new(UTC, bus);
        scheduler.select_day(day());
        scheduler.set_times(time(18, 0), time(19, 0));

        let result = scheduler.submit(&source, &[]).await;

        assert!(matches!(result, Err(MomentsError::Validation(_))));
        assert_eq!(scheduler.state(), &FormState::Idle);
        assert_eq!(source.create_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_day_or_time_stays_idle() {
        let source = MemorySource::default();

        let mut no_day = Scheduler::new(UTC, RefreshBus::new());
        no_day.set_times(time(18, 0), time(19, 0));
        no_day.set_title("Dinner").unwrap();
        assert!(no_day.submit(&source, &[]).await.is_err());

        let mut no_time = Scheduler::new(UTC, RefreshBus::new());
        no_time.select_day(day());
        no_time.set_title("Dinner").unwrap();
        assert!(no_time.submit(&source, &[]).await.is_err());
        assert_eq!(no_time.state(), &FormState::Idle);
    }

    #[tokio::test]
    async fn inverted_times_are_a_validation_error() {
        let source = MemorySource::default();
        let mut scheduler = filled(&RefreshBus::new(), time(11, 0), time(10, 0));

        let result = scheduler.submit(&source, &[]).await;

        assert!(matches!(result, Err(MomentsError::InvalidInterval)));
        assert_eq!(scheduler.state(), &FormState::Idle);
    }

    #[tokio::test]
    async fn provider_failure_reports_generic_message() {
        let bus = RefreshBus::new();
        let mut refresh = bus.subscribe();
        let source = MemorySource::failing();
        let mut scheduler = filled(&bus, time(14, 0), time(15, 0));

        let state = scheduler.submit(&source, &[]).await.unwrap();

        assert_eq!(
            state,
            &FormState::Failed {
                message: SUBMIT_FAILED_MESSAGE.to_string()
            }
        );
        assert_eq!(scheduler.form().title, "Coffee walk");
        assert_eq!(refresh.try_recv(), None);
    }

    #[tokio::test]
    async fn desire_template_fills_read_only_fields() {
        let bus = RefreshBus::new();
        let source = MemorySource::default();
        let desire = Desire {
            id: "d1".to_string(),
            title: "Stargazing".to_string(),
            description: "Blanket and thermos".to_string(),
            date: Utc::now(),
            author: "alex".to_string(),
            priority: 3,
            is_hot: false,
            category: Some("Adventure".to_string()),
        };

        let mut scheduler = Scheduler::new(UTC, bus);
        scheduler.select_day(day());
        scheduler.set_times(time(21, 0), time(23, 0));
        scheduler.use_desire(&desire);

        assert_eq!(scheduler.form().category.as_deref(), Some("Adventure"));
        assert!(scheduler.set_title("Something else").is_err());

        let state = scheduler.submit(&source, &[]).await.unwrap();
        match state {
            FormState::Success { event, desire_id } => {
                assert_eq!(event.title, "Stargazing");
                assert_eq!(event.description, "Blanket and thermos");
                assert_eq!(desire_id.as_deref(), Some("d1"));
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn switching_back_to_custom_unlocks_fields() {
        let source = MemorySource::default();
        let desire = Desire {
            id: "d2".to_string(),
            title: "Pottery class".to_string(),
            description: "Saturday workshop".to_string(),
            date: Utc::now(),
            author: "sam".to_string(),
            priority: 2,
            is_hot: true,
            category: Some("Creative".to_string()),
        };

        let mut scheduler = Scheduler::new(UTC, RefreshBus::new());
        scheduler.select_day(day());
        scheduler.set_times(time(15, 0), time(17, 0));
        scheduler.use_desire(&desire);
        assert!(scheduler.set_title("Bowling").is_err());

        scheduler.use_custom();
        assert_eq!(scheduler.form().mode, MomentMode::Custom);
        assert_eq!(scheduler.form().desire_id, None);
        assert_eq!(scheduler.form().category, None);
        scheduler.set_title("Bowling").unwrap();

        let state = scheduler.submit(&source, &[]).await.unwrap();
        match state {
            FormState::Success { event, desire_id } => {
                assert_eq!(event.title, "Bowling");
                assert_eq!(*desire_id, None);
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn unknown_desire_id_is_not_found() {
        let mut scheduler = Scheduler::new(UTC, RefreshBus::new());
        let result = scheduler.use_desire_id("missing", &[]);

        assert!(matches!(result, Err(MomentsError::NotFound(_))));
        assert_eq!(scheduler.form().mode, MomentMode::Custom);
    }

    #[tokio::test]
    async fn editing_after_rejection_returns_to_idle() {
        let source = MemorySource::default();
        let mut scheduler = filled(&RefreshBus::new(), time(9, 30), time(10, 30));
        scheduler.submit(&source, &[morning_meeting()]).await.unwrap();
        assert!(scheduler.state().is_terminal());

        scheduler.set_times(time(10, 0), time(11, 0));
        assert_eq!(scheduler.state(), &FormState::Idle);

        let state = scheduler.submit(&source, &[morning_meeting()]).await.unwrap();
        assert!(matches!(state, FormState::Success { .. }));
    }

    #[tokio::test]
    async fn times_are_read_in_the_viewer_zone() {
        let source = MemorySource::default();
        let mut scheduler = Scheduler::new(chrono_tz::Asia::Tokyo, RefreshBus::new());
        scheduler.select_day(day());
        scheduler.set_times(time(9, 0), time(10, 0));
        scheduler.set_title("Call").unwrap();

        let state = scheduler.submit(&source, &[]).await.unwrap();
        match state {
            FormState::Success { event, .. } => {
                assert_eq!(event.start, Utc.with_ymd_and_hms(2025, 3, 20, 0, 0, 0).unwrap());
            }
            other => panic!("expected success, got {:?}", other),
        }
        let created = source.events.lock().unwrap();
        assert_eq!(created.len(), 1);
    }
}
