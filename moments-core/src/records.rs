//! Planner records kept in the document store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{Collection, Record};

/// Something one partner would like to do, usable as a scheduling template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Desire {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub author: String,
    pub priority: i32,
    pub is_hot: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appreciation {
    #[serde(default)]
    pub id: String,
    pub text: String,
    pub date: DateTime<Utc>,
    pub author: String,
}

/// A moment that was put on the calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledMoment {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desire_id: Option<String>,
}

macro_rules! impl_record {
    ($ty:ty, $collection:literal) => {
        impl Record for $ty {
            const COLLECTION: &'static str = $collection;

            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }
        }
    };
}

impl_record!(Desire, "desires");
impl_record!(Appreciation, "appreciations");
impl_record!(ScheduledMoment, "scheduled-moments");

impl Collection<Desire> {
    pub fn by_author(&self, author: &str) -> Vec<Desire> {
        self.get_all()
            .into_iter()
            .filter(|d| d.author == author)
            .collect()
    }

    pub fn by_mode(&self, is_hot: bool) -> Vec<Desire> {
        self.get_all()
            .into_iter()
            .filter(|d| d.is_hot == is_hot)
            .collect()
    }

    /// The `limit` highest-priority desires of `author`.
    pub fn top_for(&self, author: &str, limit: usize) -> Vec<Desire> {
        let mut desires = self.by_author(author);
        desires.sort_by(|a, b| b.priority.cmp(&a.priority));
        desires.truncate(limit);
        desires
    }

    pub fn by_category(&self, category: &str) -> Vec<Desire> {
        self.get_all()
            .into_iter()
            .filter(|d| d.category.as_deref() == Some(category))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn desire(title: &str, author: &str, priority: i32, is_hot: bool) -> Desire {
        Desire {
            id: String::new(),
            title: title.to_string(),
            description: String::new(),
            date: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
            author: author.to_string(),
            priority,
            is_hot,
            category: None,
        }
    }

    #[test]
    fn desire_queries() {
        let dir = tempfile::tempdir().unwrap();
        let desires = Collection::<Desire>::open(dir.path()).unwrap();

        desires.add(desire("Picnic", "sam", 2, false)).unwrap();
        desires.add(desire("Concert", "sam", 5, false)).unwrap();
        desires.add(desire("Spa day", "alex", 4, true)).unwrap();
        desires
            .add(Desire {
                category: Some("Adventure".to_string()),
                ..desire("Hike", "sam", 3, true)
            })
            .unwrap();

        assert_eq!(desires.by_author("sam").len(), 3);
        assert_eq!(desires.by_mode(true).len(), 2);

        let top: Vec<_> = desires
            .top_for("sam", 2)
            .into_iter()
            .map(|d| d.title)
            .collect();
        assert_eq!(top, vec!["Concert", "Hike"]);

        let adventure = desires.by_category("Adventure");
        assert_eq!(adventure.len(), 1);
        assert_eq!(adventure[0].title, "Hike");
    }

    #[test]
    fn records_use_their_own_files() {
        let dir = tempfile::tempdir().unwrap();
        let moments = Collection::<ScheduledMoment>::open(dir.path()).unwrap();
        moments
            .add(ScheduledMoment {
                id: String::new(),
                title: "Dinner".to_string(),
                description: String::new(),
                date: Utc.with_ymd_and_hms(2025, 3, 14, 19, 0, 0).unwrap(),
                desire_id: None,
            })
            .unwrap();

        assert!(dir.path().join("scheduled-moments.json").exists());
        assert!(!dir.path().join("desires.json").exists());
    }
}
