use chrono::{Duration, NaiveDate, Utc};
use tracing::{debug, info};

use crate::thread::ReconstructPolicy;

/// Number of stories digested per run unless configured otherwise.
pub const DEFAULT_MAX_STORIES: usize = 20;

/// Settings for one digest run.
#[derive(Debug, Clone)]
pub struct DigestConfig {
    /// Stories ranked on this UTC day are digested.
    pub day: NaiveDate,
    pub max_stories: usize,
    pub thread: ReconstructPolicy,
}

impl DigestConfig {
    pub fn for_day(day: NaiveDate) -> Self {
        Self {
            day,
            max_stories: DEFAULT_MAX_STORIES,
            thread: ReconstructPolicy::default(),
        }
    }

    pub fn trace_loaded(&self) {
        info!(
            day = %self.day,
            max_stories = self.max_stories,
            max_children = self.thread.max_children(),
            collect_depths = ?self.thread.collect_depths(),
            "Loaded DigestConfig"
        );
        debug!(?self, "DigestConfig loaded (full debug)");
    }
}

/// The UTC calendar day before today.
pub fn yesterday_utc() -> NaiveDate {
    (Utc::now() - Duration::days(1)).date_naive()
}
