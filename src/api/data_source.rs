use std::collections::VecDeque;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::FetchTicket;

/// Sampling granularity of the candle series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tick {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1d")]
    Daily,
}

impl Tick {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneMinute => "1m",
            Self::FiveMinutes => "5m",
            Self::ThirtyMinutes => "30m",
            Self::Daily => "1d",
        }
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of one chart query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartQuery {
    pub code: String,
    pub tick: Tick,
    pub start_dt: NaiveDate,
    #[serde(default)]
    pub end_dt: Option<NaiveDate>,
    /// Stroke construction options forwarded to the pattern service.
    #[serde(default)]
    pub stroke_cfg: Option<String>,
}

impl ChartQuery {
    #[must_use]
    pub fn new(code: impl Into<String>, tick: Tick, start_dt: NaiveDate) -> Self {
        Self {
            code: code.into(),
            tick,
            start_dt,
            end_dt: None,
            stroke_cfg: None,
        }
    }

    #[must_use]
    pub fn with_end_dt(mut self, end_dt: NaiveDate) -> Self {
        self.end_dt = Some(end_dt);
        self
    }

    #[must_use]
    pub fn with_stroke_cfg(mut self, stroke_cfg: impl Into<String>) -> Self {
        self.stroke_cfg = Some(stroke_cfg.into());
        self
    }
}

/// Non-blocking fetch collaborator.
///
/// `request` must return immediately. The host delivers the answer later by
/// passing the same ticket to `ChartController::complete_candles` or
/// `ChartController::complete_overlay`.
pub trait DataSource {
    fn request(&mut self, query: &ChartQuery, ticket: FetchTicket);
}

/// Source for hosts that push data through the direct replace calls.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSource;

impl DataSource for NoopSource {
    fn request(&mut self, _query: &ChartQuery, _ticket: FetchTicket) {}
}

/// Source that queues requests for a host event loop to drain.
#[derive(Debug, Default, Clone)]
pub struct QueuedSource {
    queue: VecDeque<(ChartQuery, FetchTicket)>,
}

impl QueuedSource {
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn pop(&mut self) -> Option<(ChartQuery, FetchTicket)> {
        self.queue.pop_front()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = (ChartQuery, FetchTicket)> + '_ {
        self.queue.drain(..)
    }

    pub fn tickets(&self) -> impl Iterator<Item = FetchTicket> + '_ {
        self.queue.iter().map(|(_, ticket)| *ticket)
    }
}

impl DataSource for QueuedSource {
    fn request(&mut self, query: &ChartQuery, ticket: FetchTicket) {
        self.queue.push_back((query.clone(), ticket));
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{ChartQuery, Tick};

    #[test]
    fn query_serializes_dates_as_iso_days() {
        let query = ChartQuery::new(
            "000001.SZ",
            Tick::Daily,
            NaiveDate::from_ymd_opt(2020, 2, 1).expect("date"),
        )
        .with_end_dt(NaiveDate::from_ymd_opt(2020, 3, 1).expect("date"));

        let json = serde_json::to_string(&query).expect("serialize");
        assert!(json.contains("\"2020-02-01\""), "{json}");

        let back: ChartQuery = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, query);
    }
}
