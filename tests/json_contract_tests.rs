use approx::assert_relative_eq;
use chrono::NaiveDate;
use tanglism_chart::api::{parse_candles, parse_overlay};
use tanglism_chart::core::{OverlayExtra, OverlayKind};

fn unix(y: i32, m: u32, d: u32, h: u32, min: u32) -> f64 {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, min, 0))
        .expect("valid datetime")
        .and_utc()
        .timestamp() as f64
}

#[test]
fn candle_envelope_with_decimal_strings() {
    let json = r#"{
        "code": "000001.SZ",
        "tick": "30m",
        "start_ts": "2020-02-03 00:00:00",
        "end_ts": "2020-02-04 00:00:00",
        "data": [
            {"ts": "2020-02-03 10:00:00", "open": "14.10", "close": "14.32",
             "high": "14.50", "low": "14.01", "volume": "120300", "amount": "1.7e6"},
            {"ts": "2020-02-03 10:30:00", "open": 14.32, "close": 14.2,
             "high": 14.4, "low": 14.1}
        ]
    }"#;

    let candles = parse_candles(json).expect("candles");
    assert_eq!(candles.len(), 2);
    assert_eq!(candles[0].timestamp, unix(2020, 2, 3, 10, 0));
    assert_relative_eq!(candles[0].open, 14.10);
    assert_relative_eq!(candles[0].volume.expect("volume"), 120_300.0);
    assert_relative_eq!(candles[0].amount.expect("amount"), 1_700_000.0);
    assert_eq!(candles[1].timestamp, unix(2020, 2, 3, 10, 30));
    assert_eq!(candles[1].volume, None);
}

#[test]
fn candle_bare_array_accepts_timestamp_alias() {
    let json = r#"[{"timestamp": "2020-02-03", "open": "1", "close": "2", "high": "2", "low": "1"}]"#;
    let candles = parse_candles(json).expect("candles");
    assert_eq!(candles[0].timestamp, unix(2020, 2, 3, 0, 0));
    assert!(candles[0].is_bullish());
}

#[test]
fn malformed_decimal_is_reported() {
    let json = r#"[{"ts": "2020-02-03 10:00:00", "open": "abc", "close": "1", "high": "1", "low": "1"}]"#;
    let err = parse_candles(json).expect_err("bad decimal");
    assert!(err.to_string().contains("open"), "{err}");
}

#[test]
fn partings_carry_top_flag() {
    let json = r#"[
        {"start_ts": "2020-02-03 10:00:00", "end_ts": "2020-02-03 11:00:00",
         "extremum_ts": "2020-02-03 10:30:00", "extremum_price": "14.50", "n": 3, "top": true},
        {"start_ts": "2020-02-03 13:00:00", "end_ts": "2020-02-03 14:00:00",
         "extremum_ts": "2020-02-03 13:30:00", "extremum_price": "13.90", "n": 3, "top": false}
    ]"#;

    let partings = parse_overlay(OverlayKind::Parting, json).expect("partings");
    assert_eq!(partings.len(), 2);
    assert!(partings.iter().all(|p| p.is_point()));
    assert_eq!(partings[0].extra, OverlayExtra::Parting { top: true });
    assert_relative_eq!(partings[1].start.price, 13.90);
}

#[test]
fn strokes_use_parting_extrema_as_boundaries() {
    let json = r#"{"data": [
        {"start_pt": {"extremum_ts": "2020-02-03 10:30:00", "extremum_price": "14.50", "top": true},
         "end_pt": {"extremum_ts": "2020-02-03 13:30:00", "extremum_price": "13.90", "top": false}}
    ]}"#;

    let strokes = parse_overlay(OverlayKind::Stroke, json).expect("strokes");
    assert_eq!(strokes.len(), 1);
    assert_eq!(strokes[0].kind, OverlayKind::Stroke);
    assert_eq!(strokes[0].start.timestamp, unix(2020, 2, 3, 10, 30));
    assert_eq!(strokes[0].end.timestamp, unix(2020, 2, 3, 13, 30));
    assert!(!strokes[0].upward());
}

#[test]
fn subtrend_keeps_level_and_label() {
    let json = r#"[{"start": {"ts": "2020-02-03 10:30:00", "value": "14.50"},
                    "end": {"ts": "2020-02-04 10:30:00", "value": "15.20"},
                    "level": 2, "typ": "Normal"}]"#;

    let subtrends = parse_overlay(OverlayKind::SubTrend, json).expect("subtrends");
    assert_eq!(
        subtrends[0].extra,
        OverlayExtra::SubTrend {
            level: 2,
            label: Some("Normal".to_owned())
        }
    );
    assert!(subtrends[0].upward());
}

#[test]
fn center_band_accepts_plain_and_point_bounds() {
    let json = r#"[{
        "start": {"ts": "2020-02-03 10:30:00", "value": "14.00"},
        "end": {"ts": "2020-02-05 10:30:00", "value": "14.20"},
        "shared_low": {"ts": "2020-02-03 13:00:00", "value": "13.80"},
        "shared_high": "14.40",
        "low": 13.5,
        "high": {"ts": "2020-02-04 10:00:00", "value": "14.90"},
        "level": 1
    }]"#;

    let centers = parse_overlay(OverlayKind::Center, json).expect("centers");
    let band = centers[0].center_band().expect("band");
    assert_relative_eq!(band.shared_low, 13.80);
    assert_relative_eq!(band.shared_high, 14.40);
    assert_relative_eq!(band.low, 13.5);
    assert_relative_eq!(band.high, 14.90);
    assert_eq!(band.level, 1);
}

#[test]
fn metric_points_become_chained_segments() {
    let json = r#"[
        {"ts": "2020-02-03 10:00:00", "value": "0.10"},
        {"ts": "2020-02-03 10:30:00", "value": "0.25"},
        {"ts": "2020-02-03 11:00:00", "value": "-0.05"}
    ]"#;

    let metric = parse_overlay(OverlayKind::Metric, json).expect("metric");
    assert_eq!(metric.len(), 2);
    assert_eq!(metric[0].end, metric[1].start);
    assert_relative_eq!(metric[1].end.price, -0.05);
}

#[test]
fn wrong_payload_shape_is_invalid_data() {
    let err = parse_overlay(OverlayKind::Stroke, r#"{"rows": []}"#).expect_err("no data");
    assert!(err.to_string().contains("stroke"), "{err}");
}

#[test]
fn flat_center_from_pattern_service() {
    let json = r#"[{
        "start_ts": "2020-02-03T10:30:00", "start_price": "14.00",
        "end_ts": "2020-02-05T10:30:00", "end_price": "14.20",
        "shared_low": "13.80", "shared_high": "14.40",
        "low": "13.50", "high": "14.90",
        "extension": null, "level": 2
    }]"#;

    let centers = parse_overlay(OverlayKind::Center, json).expect("centers");
    assert_eq!(centers.len(), 1);
    assert_eq!(centers[0].start.timestamp, unix(2020, 2, 3, 10, 30));
    assert_eq!(centers[0].end.timestamp, unix(2020, 2, 5, 10, 30));
    assert_relative_eq!(centers[0].end.price, 14.20);
    let band = centers[0].center_band().expect("band");
    assert_relative_eq!(band.shared_low, 13.80);
    assert_relative_eq!(band.high, 14.90);
    assert_eq!(band.level, 2);
}

#[test]
fn tagged_subtrends_keep_their_source_as_label() {
    let json = r#"[
        {"type": "Segment", "data": {"start_ts": "2020-02-03T10:30:00", "start_price": "14.50",
                                     "end_ts": "2020-02-04T10:30:00", "end_price": "15.20"}},
        {"type": "Stroke", "data": {"start_ts": "2020-02-04T10:30:00", "start_price": "15.20",
                                    "end_ts": "2020-02-04T14:00:00", "end_price": "14.80"}}
    ]"#;

    let subtrends = parse_overlay(OverlayKind::SubTrend, json).expect("subtrends");
    assert_eq!(subtrends.len(), 2);
    assert_eq!(
        subtrends[0].extra,
        OverlayExtra::SubTrend {
            level: 0,
            label: Some("Segment".to_owned())
        }
    );
    assert_eq!(
        subtrends[1].extra,
        OverlayExtra::SubTrend {
            level: 0,
            label: Some("Stroke".to_owned())
        }
    );
    assert_eq!(subtrends[0].end, subtrends[1].start);
    assert!(subtrends[0].upward());
    assert!(!subtrends[1].upward());
}
