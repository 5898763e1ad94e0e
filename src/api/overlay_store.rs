use tracing::debug;

use crate::core::{OverlayKind, OverlaySegment};

/// Records of one overlay kind plus their staleness flag.
///
/// A dataset starts outdated and only becomes fresh through [`replace`] or
/// [`clear`].
///
/// [`replace`]: OverlayDataset::replace
/// [`clear`]: OverlayDataset::clear
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayDataset {
    kind: OverlayKind,
    records: Vec<OverlaySegment>,
    outdated: bool,
}

impl OverlayDataset {
    #[must_use]
    pub fn new(kind: OverlayKind) -> Self {
        Self {
            kind,
            records: Vec::new(),
            outdated: true,
        }
    }

    #[must_use]
    pub fn kind(&self) -> OverlayKind {
        self.kind
    }

    #[must_use]
    pub fn records(&self) -> &[OverlaySegment] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn is_outdated(&self) -> bool {
        self.outdated
    }

    /// Records that may be drawn against the current candle series.
    #[must_use]
    pub fn fresh_records(&self) -> Option<&[OverlaySegment]> {
        (!self.outdated).then_some(self.records.as_slice())
    }

    /// Wholesale swap with data fetched for the current query.
    pub fn replace(&mut self, records: Vec<OverlaySegment>) {
        debug!(
            kind = %self.kind,
            previous_len = self.records.len(),
            len = records.len(),
            "replace overlay dataset"
        );
        self.records = records;
        self.outdated = false;
    }

    /// Flags the dataset as not matching the current query. Returns `true`
    /// when the flag changed.
    pub fn mark_outdated(&mut self) -> bool {
        let changed = !self.outdated;
        self.outdated = true;
        changed
    }

    /// Empties the dataset after a failed fetch. The empty dataset counts as
    /// the answer for the current query, so it is not refetched.
    pub fn clear(&mut self) {
        self.records.clear();
        self.outdated = false;
    }
}

/// One dataset per overlay kind, owned by the chart controller.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStore {
    datasets: [OverlayDataset; OverlayKind::COUNT],
}

impl Default for OverlayStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            datasets: OverlayKind::ALL.map(OverlayDataset::new),
        }
    }

    #[must_use]
    pub fn dataset(&self, kind: OverlayKind) -> &OverlayDataset {
        &self.datasets[kind.index()]
    }

    pub fn dataset_mut(&mut self, kind: OverlayKind) -> &mut OverlayDataset {
        &mut self.datasets[kind.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &OverlayDataset> {
        self.datasets.iter()
    }

    #[must_use]
    pub fn outdated_count(&self) -> usize {
        self.datasets.iter().filter(|d| d.is_outdated()).count()
    }
}
