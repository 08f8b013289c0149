//! Date-scoped sequence identifiers: `OPD-20250110-0001`, `IPD-20250110-0001`.
//!
//! Sequence state is recovered from the store, never kept locally: the first
//! time a run needs a number for a given day, it scans the identifiers
//! already stored for that day and continues after the largest one.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

use crate::calendar::compact;
use crate::store::{text, Filter, Query, RowStore, StoreError};

#[derive(Error, Debug, PartialEq)]
pub enum IdError {
    #[error("Malformed identifier: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdPrefix {
    /// Outpatient visit, stored in `opd_visits.opd_no`.
    Opd,
    /// Inpatient admission, stored in `ipd_admissions.ipd_no`.
    Ipd,
}

impl IdPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Opd => "OPD",
            Self::Ipd => "IPD",
        }
    }

    pub fn table(&self) -> &'static str {
        match self {
            Self::Opd => "opd_visits",
            Self::Ipd => "ipd_admissions",
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            Self::Opd => "opd_no",
            Self::Ipd => "ipd_no",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "OPD" => Some(Self::Opd),
            "IPD" => Some(Self::Ipd),
            _ => None,
        }
    }
}

impl fmt::Display for IdPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed `<PREFIX>-<YYYYMMDD>-<seq>` identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceId {
    pub prefix: IdPrefix,
    pub day: NaiveDate,
    pub seq: u32,
}

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{:04}", self.prefix, compact(self.day), self.seq)
    }
}

pub fn format_identifier(prefix: IdPrefix, day: NaiveDate, seq: u32) -> String {
    SequenceId { prefix, day, seq }.to_string()
}

pub fn parse_identifier(raw: &str) -> Result<SequenceId, IdError> {
    let malformed = || IdError::Malformed(raw.to_string());
    let mut parts = raw.trim().splitn(3, '-');
    let prefix = parts.next().and_then(IdPrefix::parse).ok_or_else(malformed)?;
    let day = parts
        .next()
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y%m%d").ok())
        .ok_or_else(malformed)?;
    let seq = parts
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .ok_or_else(malformed)?;
    Ok(SequenceId { prefix, day, seq })
}

/// Largest trailing sequence number among `ids`; unparsable entries are skipped.
pub fn max_sequence<'a>(ids: impl IntoIterator<Item = &'a str>) -> u32 {
    ids.into_iter()
        .filter_map(|id| id.rsplit('-').next()?.trim().parse::<u32>().ok())
        .max()
        .unwrap_or(0)
}

/// Hands out the next identifier per day for one prefix, within one run.
///
/// Counters are cached per day after the first store scan. Nothing reserves
/// a number between the scan and the insert that uses it, so two runs
/// against the same store at the same time can hand out the same number;
/// runs are expected to be serialized by whoever starts them.
#[derive(Debug)]
pub struct SequenceAllocator {
    prefix: IdPrefix,
    counters: HashMap<NaiveDate, u32>,
}

impl SequenceAllocator {
    pub fn new(prefix: IdPrefix) -> Self {
        Self {
            prefix,
            counters: HashMap::new(),
        }
    }

    /// Next identifier for `day`, seeding the day's counter from the store once.
    pub fn next(&mut self, store: &dyn RowStore, day: NaiveDate) -> Result<String, StoreError> {
        if !self.counters.contains_key(&day) {
            let existing = self.scan_store(store, day)?;
            self.counters.insert(day, existing);
        }
        let counter = self.counters.entry(day).or_insert(0);
        *counter += 1;
        Ok(format_identifier(self.prefix, day, *counter))
    }

    /// Seed a day's counter without touching the store (already known maximum).
    pub fn seed(&mut self, day: NaiveDate, max_seq: u32) {
        let counter = self.counters.entry(day).or_insert(0);
        *counter = (*counter).max(max_seq);
    }

    fn scan_store(&self, store: &dyn RowStore, day: NaiveDate) -> Result<u32, StoreError> {
        let column = self.prefix.column();
        let pattern = format!("{}-{}-%", self.prefix, compact(day));
        let rows = store.select(
            self.prefix.table(),
            &Query::all()
                .columns(column)
                .filter(Filter::ilike(column, &pattern)),
        )?;
        let ids: Vec<String> = rows.iter().filter_map(|r| text(r, column)).collect();
        let max = max_sequence(ids.iter().map(String::as_str));
        tracing::debug!(prefix = %self.prefix, day = %day, existing = ids.len(), max, "Seeded sequence counter");
        Ok(max)
    }
}
