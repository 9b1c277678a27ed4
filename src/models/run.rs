use chrono::{DateTime, Duration, FixedOffset, Utc};

/// Hour of day (local) stamped into every post's frontmatter.
pub const PUBLISH_HOUR: u32 = 9;

/// Length of the collection window ending at the run instant.
pub const COLLECTION_WINDOW_HOURS: i64 = 24;

/// The instant a run started, pinned to the journal's fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunDate {
    now: DateTime<FixedOffset>,
}

impl RunDate {
    pub fn new(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self {
            now: now.with_timezone(&offset),
        }
    }

    pub fn now(offset: FixedOffset) -> Self {
        Self::new(Utc::now(), offset)
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.now.with_timezone(&Utc)
    }

    /// `YYYY-MM-DD` in local time; keys file names and prompts.
    pub fn date_key(&self) -> String {
        self.now.format("%Y-%m-%d").to_string()
    }

    /// ISO-8601 timestamp used in frontmatter, e.g. `2024-01-02T09:00:00+09:00`.
    pub fn frontmatter_timestamp(&self) -> String {
        format!(
            "{}T{:02}:00:00{}",
            self.date_key(),
            PUBLISH_HOUR,
            self.now.format("%:z")
        )
    }

    /// Entries must be strictly newer than this to be collected.
    pub fn window_start(&self) -> DateTime<Utc> {
        self.instant() - Duration::hours(COLLECTION_WINDOW_HOURS)
    }
}
