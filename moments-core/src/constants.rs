/// Days covered by the "upcoming events" list.
pub const DEFAULT_UPCOMING_DAYS: i64 = 7;

/// Longest look-ahead `upcoming` accepts.
pub const MAX_UPCOMING_DAYS: i64 = 366;

/// Google's alias for the user's main calendar.
pub const DEFAULT_CALENDAR_ID: &str = "primary";

/// Number of ranked priorities in a weekly set.
pub const PRIORITY_SLOTS: u8 = 3;

/// Most support points a single priority can carry.
pub const MAX_SUPPORT_POINTS: usize = 3;
