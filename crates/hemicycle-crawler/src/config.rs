use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::profile::SourceProfile;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarvestConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_concurrent_downloads")]
    pub concurrent_downloads: usize,

    #[serde(default)]
    pub max_pages: Option<usize>,

    #[serde(default = "default_on_page_error")]
    pub on_page_error: OnError,

    #[serde(default)]
    pub profile: SourceProfile,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            concurrent_downloads: default_concurrent_downloads(),
            max_pages: None,
            on_page_error: default_on_page_error(),
            profile: SourceProfile::default(),
        }
    }
}

impl HarvestConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_user_agent() -> String {
    String::from("hemicycle")
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_concurrent_downloads() -> usize {
    1
}

fn default_on_page_error() -> OnError {
    OnError::SkipAndLog
}

/// What to do when a pagination page can't be retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ArgEnum))]
pub enum OnError {
    /// Abort the whole crawl
    Fail,
    /// Stop following links and keep what was collected so far
    SkipAndLog,
}
