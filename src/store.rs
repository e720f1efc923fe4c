//! Bin records and the dustbin-info state container.
//!
//! [`DustbinInfoStore`] is an ordinary value: construct one per consumer
//! and pass it where it is needed. There is no process-wide instance, so
//! tests and concurrent views each get isolated state.

use crate::sample::FillBucket;
use serde::{Deserialize, Serialize};

/// A single bin as reported by the field inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dustbin {
    /// Inventory identifier.
    pub id: String,
    /// Street address or landmark.
    pub location: String,
    /// Operational status ("working", "damaged", ...).
    pub status: String,
    /// Waste category ("organic", "recyclable", ...).
    pub category: String,
    /// Current fill, in the same unit as `capacity`.
    pub filled: f64,
    /// Total capacity.
    pub capacity: f64,
}

impl Dustbin {
    /// Creates a working general-waste bin record.
    #[must_use]
    pub fn new(id: impl Into<String>, filled: f64, capacity: f64) -> Self {
        Self {
            id: id.into(),
            location: String::new(),
            status: "working".to_string(),
            category: "general".to_string(),
            filled,
            capacity,
        }
    }

    /// Fill level as a percentage of capacity; 0 for a zero-capacity bin.
    #[must_use]
    pub fn fill_percentage(&self) -> f64 {
        if self.capacity <= 0.0 {
            return 0.0;
        }
        self.filled / self.capacity * 100.0
    }

    /// Bucket this bin currently falls into.
    #[must_use]
    pub fn bucket(&self) -> FillBucket {
        FillBucket::classify(self.fill_percentage())
    }
}

/// Fleet-wide status totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DustbinOverview {
    /// All registered bins.
    pub total_bins: u32,
    /// Bins reported damaged.
    pub damaged_bins: u32,
    /// Bins in service.
    pub working_bins: u32,
    /// Bins out for maintenance.
    pub under_maintenance: u32,
}

/// Partial update for [`DustbinOverview`]; `None` fields are left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverviewPatch {
    /// New total, if changing.
    pub total_bins: Option<u32>,
    /// New damaged count, if changing.
    pub damaged_bins: Option<u32>,
    /// New working count, if changing.
    pub working_bins: Option<u32>,
    /// New maintenance count, if changing.
    pub under_maintenance: Option<u32>,
}

/// Bin count for one city sector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorCount {
    /// Sector name.
    pub title: String,
    /// Bins in the sector.
    pub count: u32,
}

impl SectorCount {
    /// Creates a sector entry.
    #[must_use]
    pub fn new(title: impl Into<String>, count: u32) -> Self {
        Self { title: title.into(), count }
    }
}

/// Overview plus per-sector counts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DustbinInfo {
    /// Fleet totals.
    pub overview: DustbinOverview,
    /// Per-sector counts, in insertion order.
    pub sector_counts: Vec<SectorCount>,
}

/// Holds the current [`DustbinInfo`] for one consumer.
#[derive(Debug, Clone, Default)]
pub struct DustbinInfoStore {
    info: DustbinInfo,
}

impl DustbinInfoStore {
    /// Creates a store holding the empty initial state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents.
    #[must_use]
    pub fn info(&self) -> &DustbinInfo {
        &self.info
    }

    /// Replaces everything.
    pub fn set_info(&mut self, info: DustbinInfo) {
        self.info = info;
    }

    /// Merges the set fields of `patch` into the overview.
    pub fn update_overview(&mut self, patch: OverviewPatch) {
        let overview = &mut self.info.overview;
        if let Some(v) = patch.total_bins {
            overview.total_bins = v;
        }
        if let Some(v) = patch.damaged_bins {
            overview.damaged_bins = v;
        }
        if let Some(v) = patch.working_bins {
            overview.working_bins = v;
        }
        if let Some(v) = patch.under_maintenance {
            overview.under_maintenance = v;
        }
    }

    /// Replaces the sector list.
    pub fn update_sector_counts(&mut self, sector_counts: Vec<SectorCount>) {
        self.info.sector_counts = sector_counts;
    }

    /// Appends one sector entry.
    pub fn add_sector_count(&mut self, sector_count: SectorCount) {
        self.info.sector_counts.push(sector_count);
    }

    /// Removes every sector entry with this title. Returns how many went.
    pub fn remove_sector_count(&mut self, title: &str) -> usize {
        let before = self.info.sector_counts.len();
        self.info.sector_counts.retain(|s| s.title != title);
        before - self.info.sector_counts.len()
    }

    /// Back to the empty initial state.
    pub fn reset(&mut self) {
        self.info = DustbinInfo::default();
    }
}
