//! Wire models of the pattern service and their conversion into engine types.
//!
//! Decimals arrive as JSON strings (numbers are tolerated) and timestamps as
//! `YYYY-MM-DD HH:MM:SS` or its ISO `T` form. Payloads are either a bare array or the service
//! envelope `{code, tick, start_ts, end_ts, data}`.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::core::primitives::{parse_decimal_text, parse_timestamp_text};
use crate::core::{
    BoundaryPoint, Candle, CenterBand, OverlayExtra, OverlayKind, OverlaySegment,
};
use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DecimalText {
    Text(String),
    Number(f64),
}

impl DecimalText {
    pub fn to_f64(&self, field: &'static str) -> ChartResult<f64> {
        match self {
            Self::Text(text) => parse_decimal_text(text, field),
            Self::Number(value) if value.is_finite() => Ok(*value),
            Self::Number(_) => Err(ChartError::Parse {
                field,
                reason: "number must be finite".to_owned(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Payload<T> {
    Bare(Vec<T>),
    Envelope { data: Vec<T> },
}

impl<T> Payload<T> {
    fn into_records(self) -> Vec<T> {
        match self {
            Self::Bare(records) | Self::Envelope { data: records } => records,
        }
    }
}

fn parse_payload<T: DeserializeOwned>(json: &str, what: &str) -> ChartResult<Vec<T>> {
    serde_json::from_str::<Payload<T>>(json)
        .map(Payload::into_records)
        .map_err(|e| ChartError::InvalidData(format!("failed to parse {what} payload: {e}")))
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CandleRecord {
    #[serde(alias = "timestamp")]
    pub ts: String,
    pub open: DecimalText,
    pub close: DecimalText,
    pub high: DecimalText,
    pub low: DecimalText,
    #[serde(default)]
    pub volume: Option<DecimalText>,
    #[serde(default)]
    pub amount: Option<DecimalText>,
}

impl CandleRecord {
    pub fn to_candle(&self) -> ChartResult<Candle> {
        Ok(Candle {
            timestamp: parse_timestamp_text(&self.ts, "ts")?,
            open: self.open.to_f64("open")?,
            close: self.close.to_f64("close")?,
            high: self.high.to_f64("high")?,
            low: self.low.to_f64("low")?,
            volume: self.volume.as_ref().map(|v| v.to_f64("volume")).transpose()?,
            amount: self.amount.as_ref().map(|v| v.to_f64("amount")).transpose()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PartingRecord {
    pub extremum_ts: String,
    pub extremum_price: DecimalText,
    #[serde(default)]
    pub top: bool,
    #[serde(default)]
    pub start_ts: Option<String>,
    #[serde(default)]
    pub end_ts: Option<String>,
    #[serde(default)]
    pub n: Option<i32>,
}

impl PartingRecord {
    pub fn boundary(&self) -> ChartResult<BoundaryPoint> {
        Ok(BoundaryPoint::new(
            parse_timestamp_text(&self.extremum_ts, "extremum_ts")?,
            self.extremum_price.to_f64("extremum_price")?,
        ))
    }
}

/// Stroke and segment records share this shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PartingPairRecord {
    pub start_pt: PartingRecord,
    pub end_pt: PartingRecord,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValuePointRecord {
    pub ts: String,
    pub value: DecimalText,
}

impl ValuePointRecord {
    pub fn boundary(&self) -> ChartResult<BoundaryPoint> {
        Ok(BoundaryPoint::new(
            parse_timestamp_text(&self.ts, "ts")?,
            self.value.to_f64("value")?,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubTrendRecord {
    pub start: ValuePointRecord,
    pub end: ValuePointRecord,
    #[serde(default)]
    pub level: u8,
    #[serde(default)]
    pub typ: Option<String>,
}

/// Flat `{start_ts, start_price, end_ts, end_price}` span used by the
/// pattern service's trend types.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PriceSpanRecord {
    pub start_ts: String,
    pub start_price: DecimalText,
    pub end_ts: String,
    pub end_price: DecimalText,
}

impl PriceSpanRecord {
    pub fn boundaries(&self) -> ChartResult<(BoundaryPoint, BoundaryPoint)> {
        Ok((
            BoundaryPoint::new(
                parse_timestamp_text(&self.start_ts, "start_ts")?,
                self.start_price.to_f64("start_price")?,
            ),
            BoundaryPoint::new(
                parse_timestamp_text(&self.end_ts, "end_ts")?,
                self.end_price.to_f64("end_price")?,
            ),
        ))
    }
}

/// Sub-trend as tagged by the service: `{"type": "Segment", "data": {...}}`.
/// The tag names the lower-level pattern the sub-trend was built from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum TaggedSubTrend {
    Segment(PriceSpanRecord),
    Stroke(PriceSpanRecord),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SubTrendWire {
    Tagged(TaggedSubTrend),
    Nested(SubTrendRecord),
}

impl SubTrendWire {
    pub fn to_segment(&self) -> ChartResult<OverlaySegment> {
        let (start, end, level, label) = match self {
            Self::Tagged(TaggedSubTrend::Segment(span)) => {
                let (start, end) = span.boundaries()?;
                (start, end, 0, Some("Segment".to_owned()))
            }
            Self::Tagged(TaggedSubTrend::Stroke(span)) => {
                let (start, end) = span.boundaries()?;
                (start, end, 0, Some("Stroke".to_owned()))
            }
            Self::Nested(record) => (
                record.start.boundary()?,
                record.end.boundary()?,
                record.level,
                record.typ.clone(),
            ),
        };
        Ok(OverlaySegment::new(OverlayKind::SubTrend, start, end)
            .with_extra(OverlayExtra::SubTrend { level, label }))
    }
}

/// Center band bound: a bare decimal or the value point that set it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BandValue {
    Point(ValuePointRecord),
    Plain(DecimalText),
}

impl BandValue {
    fn to_f64(&self, field: &'static str) -> ChartResult<f64> {
        match self {
            Self::Point(point) => point.value.to_f64(field),
            Self::Plain(value) => value.to_f64(field),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CenterRecord {
    pub start: ValuePointRecord,
    pub end: ValuePointRecord,
    pub shared_low: BandValue,
    pub shared_high: BandValue,
    pub low: BandValue,
    pub high: BandValue,
    #[serde(default)]
    pub level: u8,
}

/// Center in the service's flat layout; `extension` is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlatCenterRecord {
    #[serde(flatten)]
    pub span: PriceSpanRecord,
    pub shared_low: DecimalText,
    pub shared_high: DecimalText,
    pub low: DecimalText,
    pub high: DecimalText,
    #[serde(default)]
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CenterWire {
    Flat(FlatCenterRecord),
    Nested(CenterRecord),
}

impl CenterWire {
    pub fn to_segment(&self) -> ChartResult<OverlaySegment> {
        let (start, end, band) = match self {
            Self::Flat(record) => {
                let (start, end) = record.span.boundaries()?;
                let band = CenterBand {
                    shared_low: record.shared_low.to_f64("shared_low")?,
                    shared_high: record.shared_high.to_f64("shared_high")?,
                    low: record.low.to_f64("low")?,
                    high: record.high.to_f64("high")?,
                    level: record.level,
                };
                (start, end, band)
            }
            Self::Nested(record) => {
                let band = CenterBand {
                    shared_low: record.shared_low.to_f64("shared_low")?,
                    shared_high: record.shared_high.to_f64("shared_high")?,
                    low: record.low.to_f64("low")?,
                    high: record.high.to_f64("high")?,
                    level: record.level,
                };
                (record.start.boundary()?, record.end.boundary()?, band)
            }
        };
        Ok(OverlaySegment::new(OverlayKind::Center, start, end)
            .with_extra(OverlayExtra::Center(band)))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetricRecord {
    pub ts: String,
    pub value: DecimalText,
}

pub fn parse_candles(json: &str) -> ChartResult<Vec<Candle>> {
    parse_payload::<CandleRecord>(json, "candle")?
        .iter()
        .map(CandleRecord::to_candle)
        .collect()
}

/// Parses the payload of `kind` into overlay segments in wire order.
pub fn parse_overlay(kind: OverlayKind, json: &str) -> ChartResult<Vec<OverlaySegment>> {
    let what = kind.as_str();
    match kind {
        OverlayKind::Parting => parse_payload::<PartingRecord>(json, what)?
            .iter()
            .map(|record| {
                Ok(OverlaySegment::point(kind, record.boundary()?)
                    .with_extra(OverlayExtra::Parting { top: record.top }))
            })
            .collect(),
        OverlayKind::Stroke | OverlayKind::Segment => {
            parse_payload::<PartingPairRecord>(json, what)?
                .iter()
                .map(|record| {
                    Ok(OverlaySegment::new(
                        kind,
                        record.start_pt.boundary()?,
                        record.end_pt.boundary()?,
                    ))
                })
                .collect()
        }
        OverlayKind::SubTrend => parse_payload::<SubTrendWire>(json, what)?
            .iter()
            .map(SubTrendWire::to_segment)
            .collect(),
        OverlayKind::Center => parse_payload::<CenterWire>(json, what)?
            .iter()
            .map(CenterWire::to_segment)
            .collect(),
        OverlayKind::Metric => {
            let points = parse_payload::<MetricRecord>(json, what)?
                .iter()
                .map(|record| {
                    Ok(BoundaryPoint::new(
                        parse_timestamp_text(&record.ts, "ts")?,
                        record.value.to_f64("value")?,
                    ))
                })
                .collect::<ChartResult<Vec<_>>>()?;
            Ok(metric_chain(&points))
        }
    }
}

/// Chains consecutive metric samples into segments so a line series aligns
/// like any other chained overlay. A lone sample becomes a point segment.
#[must_use]
pub fn metric_chain(points: &[BoundaryPoint]) -> Vec<OverlaySegment> {
    match points {
        [] => Vec::new(),
        [single] => vec![OverlaySegment::point(OverlayKind::Metric, *single)],
        _ => points
            .windows(2)
            .map(|pair| OverlaySegment::new(OverlayKind::Metric, pair[0], pair[1]))
            .collect(),
    }
}
