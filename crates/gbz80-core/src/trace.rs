//! Register trace recording and verification against a reference trace.
//!
//! Snapshot lines use the fixed layout
//! `AF=XXXX BC=XXXX DE=XXXX HL=XXXX SP=XXXX PC=XXXX` (uppercase hex), the
//! format debugger-captured reference traces are written in.

use std::fmt;

use crate::MachineError;

/// Register pair values captured for one trace line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterSnapshot {
    /// `AF`.
    pub af: u16,
    /// `BC`.
    pub bc: u16,
    /// `DE`.
    pub de: u16,
    /// `HL`.
    pub hl: u16,
    /// `SP`.
    pub sp: u16,
    /// `PC`.
    pub pc: u16,
}

impl fmt::Display for RegisterSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AF={:04X} BC={:04X} DE={:04X} HL={:04X} SP={:04X} PC={:04X}",
            self.af, self.bc, self.de, self.hl, self.sp, self.pc
        )
    }
}

/// Reference trace the recorded snapshots must reproduce, line for line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ExpectedTrace {
    entries: Vec<String>,
}

impl ExpectedTrace {
    /// Parses a reference trace with one snapshot per line.
    ///
    /// Lines are trimmed and blank lines skipped, so LF and CRLF files both
    /// parse.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let lines = text.lines().map(str::trim);
        Self::from_entries(lines.filter(|line| !line.is_empty()))
    }

    /// Builds a reference trace from individual snapshot lines.
    #[must_use]
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of reference lines.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the reference has no lines.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reference line at `index`, if the reference is that long.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }
}

/// Append-only log of recorded snapshots plus an instruction counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceLog {
    entries: Vec<String>,
    count: usize,
    expected: Option<ExpectedTrace>,
    keep_entries: bool,
}

impl Default for TraceLog {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceLog {
    /// Empty log that keeps every recorded line and verifies nothing.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            count: 0,
            expected: None,
            keep_entries: true,
        }
    }

    /// Empty log verifying its first lines against `expected`.
    #[must_use]
    pub const fn with_expected(expected: ExpectedTrace) -> Self {
        Self {
            entries: Vec::new(),
            count: 0,
            expected: Some(expected),
            keep_entries: true,
        }
    }

    /// Sets whether recorded lines are kept. Counting and verification run
    /// either way.
    #[must_use]
    pub const fn keep_entries(mut self, keep: bool) -> Self {
        self.keep_entries = keep;
        self
    }

    /// Records one snapshot and checks it against the reference trace.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::TraceMismatch`] when the reference has a line
    /// at this index and it differs from the snapshot. The snapshot is
    /// recorded and counted before the comparison.
    pub fn record(&mut self, snapshot: &RegisterSnapshot) -> Result<(), MachineError> {
        let index = self.count;
        let actual = snapshot.to_string();
        self.count += 1;

        let mismatch = self
            .expected
            .as_ref()
            .and_then(|expected| expected.get(index))
            .filter(|expected| *expected != actual)
            .map(str::to_owned);

        if self.keep_entries {
            self.entries.push(actual.clone());
        }

        mismatch.map_or(Ok(()), |expected| {
            Err(MachineError::TraceMismatch {
                index,
                expected,
                actual,
            })
        })
    }

    /// Number of snapshots recorded.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Kept snapshot lines in recording order.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Reference trace, if one was supplied.
    #[must_use]
    pub const fn expected(&self) -> Option<&ExpectedTrace> {
        self.expected.as_ref()
    }

    /// Number of recorded snapshots that were checked against the reference.
    #[must_use]
    pub fn verified(&self) -> usize {
        self.expected
            .as_ref()
            .map_or(0, |expected| expected.len().min(self.count))
    }

    /// Kept lines, each newline-terminated.
    #[must_use]
    pub fn as_text(&self) -> String {
        self.entries.iter().fold(String::new(), |mut text, entry| {
            text.push_str(entry);
            text.push('\n');
            text
        })
    }
}
