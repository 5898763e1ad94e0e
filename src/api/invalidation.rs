use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::core::OverlayKind;
use crate::extensions::ChartEvent;

/// Overlay kinds touched by one invalidation step.
pub type OverlayKinds = SmallVec<[OverlayKind; OverlayKind::COUNT]>;

/// Monotonic query generation. Every fetch ticket carries the generation it
/// was issued for; answers for older generations are discarded.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Generation(u64);

impl Generation {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    #[must_use]
    const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Dataset a fetch fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FetchTarget {
    Candles,
    Overlay(OverlayKind),
}

impl fmt::Display for FetchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Candles => f.write_str("candles"),
            Self::Overlay(kind) => f.write_str(kind.as_str()),
        }
    }
}

/// Receipt handed to the data source with every request and returned with
/// its completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FetchTicket {
    pub target: FetchTarget,
    pub generation: Generation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct TargetState {
    expected: Generation,
    pending: bool,
}

/// Staleness bookkeeping shared by every dataset.
///
/// Holds the dependency rule between events and overlay datasets and the
/// per-target generation each dataset currently expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StalenessTracker {
    current: Generation,
    targets: IndexMap<FetchTarget, TargetState>,
}

impl Default for StalenessTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StalenessTracker {
    #[must_use]
    pub fn new() -> Self {
        let targets = std::iter::once(FetchTarget::Candles)
            .chain(OverlayKind::ALL.into_iter().map(FetchTarget::Overlay))
            .map(|target| (target, TargetState::default()))
            .collect();
        Self {
            current: Generation::default(),
            targets,
        }
    }

    /// Overlay kinds invalidated by `event`.
    ///
    /// A new candle series orphans every overlay's alignment; overlay
    /// replacements only refresh themselves.
    #[must_use]
    pub fn invalidated_by(event: &ChartEvent) -> OverlayKinds {
        match event {
            ChartEvent::CandlesReplaced { .. } => OverlayKind::ALL.into_iter().collect(),
            _ => OverlayKinds::new(),
        }
    }

    #[must_use]
    pub fn current(&self) -> Generation {
        self.current
    }

    #[must_use]
    pub fn expected(&self, target: FetchTarget) -> Generation {
        self.targets
            .get(&target)
            .map_or(self.current, |state| state.expected)
    }

    #[must_use]
    pub fn is_pending(&self, target: FetchTarget) -> bool {
        self.targets.get(&target).is_some_and(|state| state.pending)
    }

    /// Starts a new query: every target now expects the new generation.
    pub fn begin_query(&mut self) -> Generation {
        self.current = self.current.next();
        let current = self.current;
        for state in self.targets.values_mut() {
            *state = TargetState {
                expected: current,
                pending: false,
            };
        }
        debug!(generation = %current, "begin query generation");
        current
    }

    /// Moves only `kinds` to a new generation, e.g. after a parameter change
    /// that alters their remote computation. Other in-flight fetches stay valid.
    pub fn retarget(&mut self, kinds: &[OverlayKind]) -> Generation {
        self.current = self.current.next();
        let current = self.current;
        for kind in kinds {
            if let Some(state) = self.targets.get_mut(&FetchTarget::Overlay(*kind)) {
                *state = TargetState {
                    expected: current,
                    pending: false,
                };
            }
        }
        debug!(generation = %current, kinds = ?kinds, "retarget overlay generation");
        current
    }

    /// Issues a ticket for `target` unless one for the expected generation is
    /// already in flight.
    pub fn issue(&mut self, target: FetchTarget) -> Option<FetchTicket> {
        let state = self.targets.get_mut(&target)?;
        if state.pending {
            trace!(%target, generation = %state.expected, "fetch already in flight");
            return None;
        }
        state.pending = true;
        Some(FetchTicket {
            target,
            generation: state.expected,
        })
    }

    /// Consumes a completion. Returns `false` when the ticket answers a
    /// superseded generation and must be dropped.
    pub fn accept(&mut self, ticket: FetchTicket) -> bool {
        let Some(state) = self.targets.get_mut(&ticket.target) else {
            return false;
        };
        if state.expected != ticket.generation {
            return false;
        }
        state.pending = false;
        true
    }
}
