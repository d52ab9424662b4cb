use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Lifecycle state of a pull request, named the way the GraphQL API names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrState {
    Merged,
    Open,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRecord {
    pub state: PrState,
    /// Login of the account owning the target repository.
    pub owner: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Counts {
    #[serde(rename = "MERGED")]
    pub merged: u32,
    #[serde(rename = "OPEN")]
    pub open: u32,
    #[serde(rename = "CLOSED")]
    pub closed: u32,
}

impl Counts {
    #[cfg(test)]
    pub fn new(merged: u32, open: u32, closed: u32) -> Self {
        Self {
            merged,
            open,
            closed,
        }
    }

    /// Widened so counts near `u32::MAX` cannot overflow.
    pub fn total(&self) -> u64 {
        u64::from(self.merged) + u64::from(self.open) + u64::from(self.closed)
    }

    /// Merged plus open; closed-only activity does not count.
    pub fn active(&self) -> u64 {
        u64::from(self.merged) + u64::from(self.open)
    }

    fn bump(&mut self, state: PrState) {
        let slot = match state {
            PrState::Merged => &mut self.merged,
            PrState::Open => &mut self.open,
            PrState::Closed => &mut self.closed,
        };
        *slot = slot.saturating_add(1);
    }
}

/// Per-organization pull request counts.
///
/// Serialized as a bare JSON object `{ "org": {"MERGED": n, "OPEN": n, "CLOSED": n} }`.
/// Keys only exist for organizations that at least one record contributed to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Tally(BTreeMap<String, Counts>);

impl Tally {
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = PullRequestRecord>,
    {
        let mut tally = Tally::default();
        for record in records {
            tally.0.entry(record.owner).or_default().bump(record.state);
        }
        tally
    }

    #[cfg(test)]
    pub fn get(&self, org: &str) -> Option<&Counts> {
        self.0.get(org)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Organizations in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Counts)> {
        self.0.iter().map(|(name, counts)| (name.as_str(), counts))
    }

    /// Overwrite `path` with this tally, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| Error::io(path, std::io::Error::other(e)))?;
        fs::write(path, json).map_err(|e| Error::io(path, e))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| Error::data_load(path, e))?;
        serde_json::from_str(&raw).map_err(|e| Error::data_load(path, e))
    }
}

impl FromIterator<(String, Counts)> for Tally {
    fn from_iter<I: IntoIterator<Item = (String, Counts)>>(iter: I) -> Self {
        Tally(iter.into_iter().collect())
    }
}
