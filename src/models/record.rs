//! Records extracted from job pages.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

/// An employee benefit and the group it is listed under.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PerkRecord {
    pub name: String,
    pub category: String,
}

/// A technology and the label placed next to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolRecord {
    pub name: String,
    pub category: String,
}

/// Absolute URL of a job detail page.
///
/// Only built from links whose relative path carries the job prefix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct JobUrl(String);

impl JobUrl {
    /// Join `base_url` and `href` when `href` starts with `prefix`.
    pub fn from_href(base_url: &str, href: &str, prefix: &str) -> Option<Self> {
        href.starts_with(prefix)
            .then(|| Self(format!("{base_url}{href}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything extracted from one job page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobRecords {
    /// Name of the site the job was listed on
    pub site: String,

    /// Job page URL
    pub url: JobUrl,

    /// Perks in document order
    pub perks: Vec<PerkRecord>,

    /// Tools in document order
    pub tools: Vec<ToolRecord>,

    /// Elements skipped because the layout did not match
    #[serde(skip)]
    pub issues: Vec<ExtractError>,
}
