//! Common utility types shared across models

use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A contiguous run of cylinders on a disk (partition extents, free slots)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CylRegion {
    /// First cylinder (inclusive)
    pub start: u64,

    /// Number of cylinders
    pub len: u64,
}

impl CylRegion {
    pub fn new(start: u64, len: u64) -> Self {
        Self { start, len }
    }

    /// First cylinder past the region (exclusive)
    pub fn end(&self) -> u64 {
        self.start.saturating_add(self.len)
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if the two regions share at least one cylinder
    pub fn overlaps(&self, other: &CylRegion) -> bool {
        !self.is_empty() && !other.is_empty() && self.start < other.end() && other.start < self.end()
    }

    /// Check if `other` lies completely inside this region
    pub fn contains(&self, other: &CylRegion) -> bool {
        other.start >= self.start && other.end() <= self.end()
    }
}

/// Largest number of fractional digits the formatter will print.
pub const MAX_PRECISION: usize = 12;

const BASE2_SUFFIXES: [&str; 7] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];
const BASE10_SUFFIXES: [&str; 7] = ["B", "K", "M", "G", "T", "P", "E"];

/// Errors from converting between byte counts and human-readable sizes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HumanSizeError {
    #[error("byte count must be a non-negative integer that fits in 64 bits")]
    OutOfRange,

    #[error("cannot parse size: {0:?}")]
    Unparseable(String),
}

/// Convert a byte count to a human-readable string (e.g. "1.50 GiB").
///
/// `base2` selects 1024-based units (KiB, MiB, ...) instead of 1000-based
/// ones (K, M, ...). Whole scaled values are printed without fractional
/// digits, all others with exactly `precision` digits. With `exact`, the
/// precise byte count is appended in parentheses whenever the printed value
/// does not represent `bytes` exactly.
///
/// Accepts any integer type; negative input is rejected.
pub fn byte_to_human_string<B>(
    bytes: B,
    base2: bool,
    precision: usize,
    exact: bool,
) -> Result<String, HumanSizeError>
where
    B: TryInto<u64>,
{
    let bytes: u64 = bytes.try_into().map_err(|_| HumanSizeError::OutOfRange)?;
    let precision = precision.min(MAX_PRECISION);

    let (base, suffixes) = if base2 {
        (1024_u128, &BASE2_SUFFIXES)
    } else {
        (1000_u128, &BASE10_SUFFIXES)
    };

    let value = u128::from(bytes);
    let mut unit: u128 = 1;
    let mut step = 0;
    while value >= unit * base && step + 1 < suffixes.len() {
        unit *= base;
        step += 1;
    }
    let suffix = suffixes[step];

    // Fixed-point arithmetic keeps the rounding exact for every u64.
    let scale = 10_u128.pow(precision as u32);
    let scaled = (value * scale + unit / 2) / unit;
    let represented = scaled * unit == value * scale;

    let mut text = if value % unit == 0 {
        format!("{} {}", value / unit, suffix)
    } else if precision == 0 {
        format!("{} {}", scaled, suffix)
    } else {
        format!(
            "{}.{:0width$} {}",
            scaled / scale,
            scaled % scale,
            suffix,
            width = precision
        )
    };

    if exact && !represented {
        text.push_str(&format!(" ({} bytes)", bytes.to_formatted_string(&Locale::en)));
    }

    Ok(text)
}

/// Same as [`byte_to_human_string`] for sizes stored in KiB (`size_k` fields).
pub fn kib_to_human_string(
    size_k: u64,
    base2: bool,
    precision: usize,
    exact: bool,
) -> Result<String, HumanSizeError> {
    let bytes = size_k
        .checked_mul(1024)
        .ok_or(HumanSizeError::OutOfRange)?;
    byte_to_human_string(bytes, base2, precision, exact)
}

/// Parse a human-readable size back to bytes (e.g. "1.5 GiB", "20K", "512").
///
/// Binary suffixes (KiB, MiB, ...) are always 1024-based. The short forms
/// (K, kB, M, MB, ...) are 1000-based unless `base2` is set, in which case
/// they are read as binary units as well. Matching is case-insensitive.
pub fn human_string_to_byte(text: &str, base2: bool) -> Result<u64, HumanSizeError> {
    let trimmed = text.trim();
    let split = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    let (number, suffix) = trimmed.split_at(split);
    let suffix = suffix.trim();

    let value: f64 = number
        .parse()
        .map_err(|_| HumanSizeError::Unparseable(text.to_string()))?;

    let multiplier = suffix_multiplier(suffix, base2)
        .ok_or_else(|| HumanSizeError::Unparseable(text.to_string()))?;

    let bytes = (value * multiplier).round();
    if !bytes.is_finite() || bytes < 0.0 || bytes > u64::MAX as f64 {
        return Err(HumanSizeError::OutOfRange);
    }

    Ok(bytes as u64)
}

fn suffix_multiplier(suffix: &str, base2: bool) -> Option<f64> {
    if suffix.is_empty() || suffix.eq_ignore_ascii_case("b") {
        return Some(1.0);
    }

    for (step, binary) in BASE2_SUFFIXES.iter().enumerate().skip(1) {
        if suffix.eq_ignore_ascii_case(binary) {
            return Some(1024_f64.powi(step as i32));
        }
    }

    let short_base = if base2 { 1024_f64 } else { 1000_f64 };
    for (step, short) in BASE10_SUFFIXES.iter().enumerate().skip(1) {
        let long = format!("{short}B");
        if suffix.eq_ignore_ascii_case(short) || suffix.eq_ignore_ascii_case(&long) {
            return Some(short_base.powi(step as i32));
        }
    }

    None
}
