//! Timestamp-to-index alignment of overlay boundaries.
//!
//! Overlays are keyed by boundary timestamps while the chart lays candles out
//! by index. [`align_segments`] resolves both boundaries of every segment to
//! candle indices in one forward pass over two time-ordered sequences.

use std::cmp::Ordering;

use tracing::{debug, trace};

use crate::core::{Candle, OverlaySegment};

/// Segment annotated with the candle indices of its boundaries.
///
/// Annotations are derived per draw and borrow the segment; they never outlive
/// the candle series they were computed against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignedSegment<'a> {
    pub segment: &'a OverlaySegment,
    pub start_id: usize,
    pub end_id: usize,
}

/// Maps each segment's boundary timestamps onto indices of `candles`.
///
/// Both inputs must be ascending in time. The candle cursor never moves
/// backwards and is not advanced after an end match, so the end candle of one
/// segment is the first candidate for the next segment's start. Chained kinds
/// (strokes, segments, sub-trends) resolve their shared boundary from one
/// candle; gapped kinds (centers, partings) scan forward to their next start.
///
/// A segment is emitted only when both boundaries occur in `candles`. Once the
/// candle cursor has moved past a boundary timestamp that boundary is known to
/// be absent, so a missing end drops that segment without stalling the rest of
/// the chain. Duplicate candle timestamps resolve to the first occurrence.
#[must_use]
pub fn align_segments<'a>(
    candles: &[Candle],
    segments: &'a [OverlaySegment],
) -> Vec<AlignedSegment<'a>> {
    let mut aligned = Vec::with_capacity(segments.len());
    let mut ki = 0;
    let mut si = 0;
    let mut start_matched = false;
    let mut start_id: Option<usize> = None;

    while ki < candles.len() && si < segments.len() {
        let ts = candles[ki].timestamp;
        let segment = &segments[si];

        if !start_matched {
            match ts.total_cmp(&segment.start.timestamp) {
                Ordering::Less => {
                    ki += 1;
                    continue;
                }
                Ordering::Equal => {
                    start_id = Some(ki);
                    start_matched = true;
                }
                // Start lies between candles or outside the series.
                Ordering::Greater => start_matched = true,
            }
        }

        match ts.total_cmp(&segment.end.timestamp) {
            Ordering::Less => ki += 1,
            ordering => {
                match (ordering, start_id) {
                    (Ordering::Equal, Some(start_id)) => aligned.push(AlignedSegment {
                        segment,
                        start_id,
                        end_id: ki,
                    }),
                    _ => trace!(
                        index = si,
                        start = segment.start.timestamp,
                        end = segment.end.timestamp,
                        "drop overlay segment with unmatched boundary"
                    ),
                }
                si += 1;
                start_matched = false;
                start_id = None;
            }
        }
    }

    if let Some(first) = segments.first() {
        debug!(
            kind = %first.kind,
            chained = first.kind.is_chained(),
            candles = candles.len(),
            input = segments.len(),
            aligned = aligned.len(),
            "aligned overlay segments"
        );
    }
    aligned
}
