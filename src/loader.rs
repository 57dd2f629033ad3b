//! Referral log loading — the delimited input boundary.
//!
//! The wire format is a comma-delimited file with a header row naming the
//! referrer and referred columns (`life_app_ref_code` and
//! `life_app_personal_ref_code`). Row order is preserved; it decides child
//! insertion order and with it the gravity scan order downstream.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Header name of the referrer column.
pub const REFERRER_COLUMN: &str = "life_app_ref_code";
/// Header name of the referred column.
pub const REFERRED_COLUMN: &str = "life_app_personal_ref_code";

/// One referral edge: `referrer` signed up `referred`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralRecord {
    pub referrer: String,
    pub referred: String,
}

impl ReferralRecord {
    pub fn new(referrer: impl Into<String>, referred: impl Into<String>) -> Self {
        Self { referrer: referrer.into(), referred: referred.into() }
    }
}

/// Read and parse a referral log file.
pub fn read_log(path: impl AsRef<Path>) -> Result<Vec<ReferralRecord>> {
    let text = fs::read_to_string(path)?;
    parse_log(&text)
}

/// Parse referral log text into ordered records.
///
/// Rows with an empty referrer or referred cell are skipped (partial signup
/// exports contain them); structurally broken rows are errors.
pub fn parse_log(text: &str) -> Result<Vec<ReferralRecord>> {
    let mut lines = text.lines().enumerate();

    let (_, header) = lines
        .next()
        .ok_or_else(|| Error::MalformedRecord {
            line: 1,
            message: "empty input, expected a header row".to_string(),
        })?;
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    let referrer_at = column_index(&columns, REFERRER_COLUMN)?;
    let referred_at = column_index(&columns, REFERRED_COLUMN)?;

    let mut records = Vec::new();
    for (idx, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split(',').map(str::trim).collect();
        let width = referrer_at.max(referred_at) + 1;
        if cells.len() < width {
            return Err(Error::MalformedRecord {
                line: idx + 1,
                message: format!("expected at least {width} cells, got {}", cells.len()),
            });
        }
        let referrer = cells[referrer_at];
        let referred = cells[referred_at];
        if referrer.is_empty() || referred.is_empty() {
            tracing::debug!(line = idx + 1, "skipping row with empty cell");
            continue;
        }
        records.push(ReferralRecord::new(referrer, referred));
    }

    Ok(records)
}

fn column_index(columns: &[&str], wanted: &str) -> Result<usize> {
    columns
        .iter()
        .position(|c| *c == wanted)
        .ok_or_else(|| Error::MalformedRecord {
            line: 1,
            message: format!("missing column '{wanted}' in header"),
        })
}
