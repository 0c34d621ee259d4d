//! Weekly priorities and the wellbeing update shared with the partner.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_SUPPORT_POINTS, PRIORITY_SLOTS};
use crate::error::{MomentsError, MomentsResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyPriority {
    /// 1, 2 or 3; unique within a set
    pub rank: u8,
    pub text: String,
    #[serde(default)]
    pub support_points: Vec<String>,
}

impl WeeklyPriority {
    pub fn new(rank: u8, text: impl Into<String>) -> MomentsResult<Self> {
        validate_rank(rank)?;
        Ok(WeeklyPriority {
            rank,
            text: text.into(),
            support_points: Vec::new(),
        })
    }

    pub fn with_support_points(mut self, points: Vec<String>) -> MomentsResult<Self> {
        if points.len() > MAX_SUPPORT_POINTS {
            return Err(MomentsError::Validation(format!(
                "A priority can have at most {} support points",
                MAX_SUPPORT_POINTS
            )));
        }
        self.support_points = points;
        Ok(self)
    }
}

/// Up to three ranked priorities. Sets are replaced whole, never patched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyPriorities {
    entries: Vec<WeeklyPriority>,
}

impl WeeklyPriorities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from entries, rejecting duplicate or out-of-range ranks.
    pub fn from_entries(entries: Vec<WeeklyPriority>) -> MomentsResult<Self> {
        let mut set = WeeklyPriorities::new();
        for entry in entries {
            validate_rank(entry.rank)?;
            if set.get(entry.rank).is_some() {
                return Err(MomentsError::Validation(format!(
                    "Priority {} appears more than once",
                    entry.rank
                )));
            }
            set.entries.push(entry);
        }
        set.entries.sort_by_key(|e| e.rank);
        Ok(set)
    }

    /// A new set with `rank` replaced by `text`. Blank text drops the rank.
    pub fn with_priority(&self, rank: u8, text: &str) -> MomentsResult<Self> {
        if text.trim().is_empty() {
            validate_rank(rank)?;
            return Self::from_entries(self.without(rank));
        }

        self.with_entry(WeeklyPriority::new(rank, text.trim())?)
    }

    /// A new set with `entry` in place of whatever held its rank.
    pub fn with_entry(&self, entry: WeeklyPriority) -> MomentsResult<Self> {
        let mut entries = self.without(entry.rank);
        entries.push(entry);
        Self::from_entries(entries)
    }

    fn without(&self, rank: u8) -> Vec<WeeklyPriority> {
        self.entries
            .iter()
            .filter(|e| e.rank != rank)
            .cloned()
            .collect()
    }

    pub fn get(&self, rank: u8) -> Option<&WeeklyPriority> {
        self.entries.iter().find(|e| e.rank == rank)
    }

    /// Entries in rank order.
    pub fn entries(&self) -> &[WeeklyPriority] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every rank has an entry.
    pub fn is_complete(&self) -> bool {
        self.entries.len() == PRIORITY_SLOTS as usize
    }
}

fn validate_rank(rank: u8) -> MomentsResult<()> {
    if (1..=PRIORITY_SLOTS).contains(&rank) {
        Ok(())
    } else {
        Err(MomentsError::Validation(format!(
            "Priority rank must be between 1 and {}, got {}",
            PRIORITY_SLOTS, rank
        )))
    }
}

/// Shown when the notifier refused the wellbeing email.
pub const SHARE_FAILED_MESSAGE: &str = "Failed to share. Please try again.";

/// Shown when sending the wellbeing email errored out.
pub const SHARE_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// The email that shares this week's priorities and wellbeing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WellbeingUpdate {
    pub subject: String,
    pub body: String,
}

impl WellbeingUpdate {
    pub fn compose(
        sender: &str,
        priorities: &WeeklyPriorities,
        wellbeing: &str,
        now: DateTime<Utc>,
        tz: Tz,
    ) -> MomentsResult<Self> {
        if !priorities.is_complete() {
            return Err(MomentsError::Validation(format!(
                "All {} priorities are required",
                PRIORITY_SLOTS
            )));
        }
        if wellbeing.trim().is_empty() {
            return Err(MomentsError::Validation(
                "Wellbeing note is required".to_string(),
            ));
        }

        let local = now.with_timezone(&tz);
        let challenges: Vec<&str> = priorities.entries().iter().map(|p| p.text.as_str()).collect();

        let body = format!(
            "Weekly Challenges:\n\n{}\n\nCurrent Wellbeing:\n\n{}\n\nSent on: {}",
            challenges.join("\n"),
            wellbeing.trim(),
            local.format("%d/%m/%Y %H:%M")
        );

        Ok(WellbeingUpdate {
            subject: format!("{} NEEDS - {}", sender, local.format("%d/%m/%Y")),
            body,
        })
    }
}
