//! Spreadsheet cell addressing.
//!
//! A1-style addresses with zero-based row/column coordinates internally.
//! Absolute markers (`$B$3`) are accepted and discarded; column letters are
//! case-insensitive. Sheet-qualified forms (`Sheet1!A1`, `'Q3 Plan'!A1`) are
//! handled by [`parse_qualified`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Highest valid zero-based row (xlsx sheet limit).
const MAX_ROW: u32 = 1_048_575;
/// Highest valid zero-based column (`XFD`).
const MAX_COL: u32 = 16_383;

// ============================================================================
// CellAddr
// ============================================================================

/// A single cell position, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellAddr {
    /// Zero-based row index.
    pub row: u32,
    /// Zero-based column index.
    pub col: u32,
}

impl CellAddr {
    /// Construct from zero-based coordinates.
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Render as an A1 address (`B3` for row 2, col 1).
    pub fn to_a1(self) -> String {
        format!("{}{}", col_letters(self.col), self.row + 1)
    }
}

impl fmt::Display for CellAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1())
    }
}

impl FromStr for CellAddr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let mut letters = String::new();
        let mut digits = String::new();
        for ch in trimmed.chars() {
            match ch {
                '$' => {}
                'A'..='Z' | 'a'..='z' if digits.is_empty() => {
                    letters.push(ch.to_ascii_uppercase());
                }
                '0'..='9' if !letters.is_empty() => digits.push(ch),
                _ => return Err(Error::InvalidAddress(s.to_string())),
            }
        }
        if letters.is_empty() || digits.is_empty() {
            return Err(Error::InvalidAddress(s.to_string()));
        }
        let col = letters
            .bytes()
            .try_fold(0u64, |acc, b| {
                let acc = acc * 26 + u64::from(b - b'A') + 1;
                (acc <= u64::from(MAX_COL) + 1).then_some(acc)
            })
            .ok_or_else(|| Error::InvalidAddress(s.to_string()))?;
        let row: u64 = digits
            .parse()
            .map_err(|_| Error::InvalidAddress(s.to_string()))?;
        if row == 0 || row > u64::from(MAX_ROW) + 1 {
            return Err(Error::InvalidAddress(s.to_string()));
        }
        Ok(Self {
            row: (row - 1) as u32,
            col: (col - 1) as u32,
        })
    }
}

/// Render a zero-based column index as spreadsheet letters (`0` → `A`).
pub fn col_letters(col: u32) -> String {
    let mut n = u64::from(col) + 1;
    let mut out = Vec::new();
    while n > 0 {
        out.push(b'A' + ((n - 1) % 26) as u8);
        n = (n - 1) / 26;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// Parse an optionally sheet-qualified address.
///
/// `Sheet1!A1` and quoted `'Q3 Plan'!A1` (with `''` escaping a literal quote)
/// yield the sheet name; a bare `A1` yields `None`.
pub fn parse_qualified(s: &str) -> Result<(Option<String>, CellAddr)> {
    match s.rfind('!') {
        Some(idx) => {
            let sheet = s[..idx].trim();
            let addr: CellAddr = s[idx + 1..].parse()?;
            let sheet = if sheet.len() >= 2 && sheet.starts_with('\'') && sheet.ends_with('\'') {
                sheet[1..sheet.len() - 1].replace("''", "'")
            } else {
                sheet.to_string()
            };
            if sheet.is_empty() {
                return Err(Error::InvalidAddress(s.to_string()));
            }
            Ok((Some(sheet), addr))
        }
        None => Ok((None, s.parse()?)),
    }
}

// ============================================================================
// CellRange
// ============================================================================

/// A rectangular cell range, inclusive on both corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRange {
    /// Top-left corner.
    pub start: CellAddr,
    /// Bottom-right corner.
    pub end: CellAddr,
}

impl CellRange {
    /// Construct a range, normalizing so `start` is the top-left corner.
    pub fn new(a: CellAddr, b: CellAddr) -> Self {
        Self {
            start: CellAddr::new(a.row.min(b.row), a.col.min(b.col)),
            end: CellAddr::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    /// Whether the range covers the given cell.
    pub fn contains(&self, addr: CellAddr) -> bool {
        (self.start.row..=self.end.row).contains(&addr.row)
            && (self.start.col..=self.end.col).contains(&addr.col)
    }

    /// Number of rows covered.
    pub fn row_span(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    /// Number of columns covered.
    pub fn col_span(&self) -> u32 {
        self.end.col - self.start.col + 1
    }

    /// Render as `TL:BR`, or a single address when the range is one cell.
    pub fn to_a1(&self) -> String {
        if self.start == self.end {
            self.start.to_a1()
        } else {
            format!("{}:{}", self.start.to_a1(), self.end.to_a1())
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1())
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((a, b)) => Ok(Self::new(a.parse()?, b.parse()?)),
            None => {
                let addr: CellAddr = s.parse()?;
                Ok(Self::new(addr, addr))
            }
        }
    }
}

// ============================================================================
// CellRef
// ============================================================================

/// Location record attached to compiled fields and approval slots.
///
/// When the source cell belongs to a merged region, the coordinates are the
/// region's top-left corner and the spans cover the whole region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRef {
    /// Sheet the cell lives on.
    pub sheet: String,
    /// Zero-based row of the (top-left) cell.
    pub row: u32,
    /// Zero-based column of the (top-left) cell.
    pub col: u32,
    /// Rows covered (1 for a plain cell).
    pub row_span: u32,
    /// Columns covered (1 for a plain cell).
    pub col_span: u32,
    /// Human-readable address, `B3` or `B3:D5`.
    pub address: String,
}

impl CellRef {
    /// Reference to a single, unmerged cell.
    pub fn single(sheet: impl Into<String>, addr: CellAddr) -> Self {
        Self {
            sheet: sheet.into(),
            row: addr.row,
            col: addr.col,
            row_span: 1,
            col_span: 1,
            address: addr.to_a1(),
        }
    }

    /// Reference covering a merged region.
    pub fn merged(sheet: impl Into<String>, range: CellRange) -> Self {
        Self {
            sheet: sheet.into(),
            row: range.start.row,
            col: range.start.col,
            row_span: range.row_span(),
            col_span: range.col_span(),
            address: range.to_a1(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
