use std::collections::BTreeSet;

use proptest::prelude::*;
use tanglism_chart::core::{BoundaryPoint, Candle, OverlayKind, OverlaySegment, align_segments};

fn candles_from(times: &BTreeSet<u32>) -> Vec<Candle> {
    times
        .iter()
        .map(|&t| Candle::new(f64::from(t), 10.0, 11.0, 12.0, 9.0))
        .collect()
}

fn chained(kind: OverlayKind, boundaries: &BTreeSet<u32>) -> Vec<OverlaySegment> {
    let points: Vec<_> = boundaries.iter().map(|&t| f64::from(t)).collect();
    points
        .windows(2)
        .map(|pair| {
            OverlaySegment::new(
                kind,
                BoundaryPoint::new(pair[0], 9.0),
                BoundaryPoint::new(pair[1], 12.0),
            )
        })
        .collect()
}

fn gapped(boundaries: &BTreeSet<u32>) -> Vec<OverlaySegment> {
    let points: Vec<_> = boundaries.iter().map(|&t| f64::from(t)).collect();
    points
        .chunks_exact(2)
        .map(|pair| {
            OverlaySegment::new(
                OverlayKind::Center,
                BoundaryPoint::new(pair[0], 9.0),
                BoundaryPoint::new(pair[1], 12.0),
            )
        })
        .collect()
}

fn expected_pairs(times: &BTreeSet<u32>, segments: &[OverlaySegment]) -> Vec<(usize, usize)> {
    let index_of = |ts: f64| times.iter().position(|&t| f64::from(t) == ts);
    segments
        .iter()
        .filter_map(|s| Some((index_of(s.start.timestamp)?, index_of(s.end.timestamp)?)))
        .collect()
}

proptest! {
    #[test]
    fn aligned_indices_point_at_matching_timestamps(
        times in prop::collection::btree_set(0u32..200, 0..60),
        boundaries in prop::collection::btree_set(0u32..210, 0..30)
    ) {
        let candles = candles_from(&times);
        let strokes = chained(OverlayKind::Stroke, &boundaries);

        for item in align_segments(&candles, &strokes) {
            prop_assert_eq!(candles[item.start_id].timestamp, item.segment.start.timestamp);
            prop_assert_eq!(candles[item.end_id].timestamp, item.segment.end.timestamp);
            prop_assert!(item.start_id <= item.end_id);
        }
    }

    #[test]
    fn chained_segments_emit_exactly_when_both_boundaries_exist(
        times in prop::collection::btree_set(0u32..200, 0..60),
        boundaries in prop::collection::btree_set(0u32..210, 0..30)
    ) {
        let candles = candles_from(&times);
        let strokes = chained(OverlayKind::Stroke, &boundaries);

        let actual: Vec<_> = align_segments(&candles, &strokes)
            .iter()
            .map(|item| (item.start_id, item.end_id))
            .collect();
        prop_assert_eq!(actual, expected_pairs(&times, &strokes));
    }

    #[test]
    fn gapped_segments_emit_exactly_when_both_boundaries_exist(
        times in prop::collection::btree_set(0u32..200, 0..60),
        boundaries in prop::collection::btree_set(0u32..210, 0..30)
    ) {
        let candles = candles_from(&times);
        let centers = gapped(&boundaries);

        let actual: Vec<_> = align_segments(&candles, &centers)
            .iter()
            .map(|item| (item.start_id, item.end_id))
            .collect();
        prop_assert_eq!(actual, expected_pairs(&times, &centers));
    }

    #[test]
    fn realignment_is_deterministic(
        times in prop::collection::btree_set(0u32..200, 0..60),
        boundaries in prop::collection::btree_set(0u32..210, 0..30)
    ) {
        let candles = candles_from(&times);
        let segments = chained(OverlayKind::Segment, &boundaries);

        let first = align_segments(&candles, &segments);
        let second = align_segments(&candles, &segments);
        prop_assert_eq!(first, second);
    }
}
