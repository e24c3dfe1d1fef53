//! Parsed statistics records and queries over them.

use crate::record_id::RecordId;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Type column value for process records.
pub const PROCESS_TYPE: &str = "P";
/// Type column value for event records.
pub const EVENT_TYPE: &str = "E";
/// Type column value for external component records.
pub const EXTERNAL_TYPE: &str = "X";

pub const COMPLETION_CODE_SUCCESS: i32 = 0;
pub const COMPLETION_CODE_WARNING: i32 = 4;
pub const COMPLETION_CODE_ERROR: i32 = 8;
pub const COMPLETION_CODE_CATASTROPHIC: i32 = 16;

/// The standard return codes of a completed process.
///
/// A completion code is a "numeric code returned from a completed Process
/// that indicates failure or success". Other values can appear in a report
/// and are kept as plain integers on [`SummaryStat::code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionCode {
    Success,
    Warning,
    Error,
    Catastrophic,
}

impl CompletionCode {
    pub const ALL: [CompletionCode; 4] = [
        CompletionCode::Success,
        CompletionCode::Warning,
        CompletionCode::Error,
        CompletionCode::Catastrophic,
    ];

    pub fn value(self) -> i32 {
        match self {
            CompletionCode::Success => COMPLETION_CODE_SUCCESS,
            CompletionCode::Warning => COMPLETION_CODE_WARNING,
            CompletionCode::Error => COMPLETION_CODE_ERROR,
            CompletionCode::Catastrophic => COMPLETION_CODE_CATASTROPHIC,
        }
    }

    pub fn from_value(value: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.value() == value)
    }
}

/// One parsed statistics line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStat {
    /// First column, kept verbatim.
    ///
    /// - `P`: process records (process activity, e.g. copy steps)
    /// - `E`: event records (system events; informational as often as not,
    ///   e.g. process started or session ended)
    /// - `X`: external component records (e.g. Integrated File Agent)
    #[serde(rename = "type")]
    pub record_type: String,
    pub id: RecordId,
    pub date: DateTime<Utc>,
    pub description: String,
    /// Empty when the line shape has no process number.
    pub process_number: String,
    pub code: i32,
    /// Empty when the line shape has no message id.
    pub message_id: String,
}

impl SummaryStat {
    pub fn is_process(&self) -> bool {
        self.record_type == PROCESS_TYPE
    }

    /// The canonical completion code, if `code` is one.
    pub fn completion(&self) -> Option<CompletionCode> {
        CompletionCode::from_value(self.code)
    }
}

/// Counts of process records by completion code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CodeTally {
    pub success: usize,
    pub warning: usize,
    pub error: usize,
    pub catastrophic: usize,
    /// Process records with a non-canonical completion code.
    pub other: usize,
    /// Event and external records, which carry no completion code.
    pub non_process: usize,
}

impl CodeTally {
    /// Tally any selection of records, e.g. the output of
    /// [`SummaryStats::by_codes`].
    pub fn from_stats<'a, I>(stats: I) -> Self
    where
        I: IntoIterator<Item = &'a SummaryStat>,
    {
        let mut tally = CodeTally::default();
        for stat in stats {
            if !stat.is_process() {
                tally.non_process += 1;
                continue;
            }
            match stat.completion() {
                Some(CompletionCode::Success) => tally.success += 1,
                Some(CompletionCode::Warning) => tally.warning += 1,
                Some(CompletionCode::Error) => tally.error += 1,
                Some(CompletionCode::Catastrophic) => tally.catastrophic += 1,
                None => tally.other += 1,
            }
        }
        tally
    }

    pub fn processes(&self) -> usize {
        self.success + self.warning + self.error + self.catastrophic + self.other
    }

    /// True when any process finished with warning or worse.
    pub fn has_failures(&self) -> bool {
        self.warning + self.error + self.catastrophic + self.other > 0
    }
}

/// Ordered collection of parsed records, in report line order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SummaryStats {
    stats: Vec<SummaryStat>,
}

impl SummaryStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stat: SummaryStat) {
        self.stats.push(stat);
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SummaryStat> {
        self.stats.iter()
    }

    pub fn as_slice(&self) -> &[SummaryStat] {
        &self.stats
    }

    /// Process records whose completion code is one of `codes`.
    ///
    /// Event and external records are never returned. Order follows the
    /// report; a record is returned once for every entry of `codes` it
    /// matches, so listing a code twice returns its records twice.
    pub fn by_codes(&self, codes: &[i32]) -> Vec<&SummaryStat> {
        let mut out = Vec::new();
        for stat in self.stats.iter().filter(|stat| stat.is_process()) {
            for &code in codes {
                if stat.code == code {
                    out.push(stat);
                }
            }
        }
        out
    }

    /// [`by_codes`](Self::by_codes) for canonical completion codes.
    pub fn by_completion(&self, codes: &[CompletionCode]) -> Vec<&SummaryStat> {
        let values: Vec<i32> = codes.iter().map(|c| c.value()).collect();
        self.by_codes(&values)
    }

    pub fn tally(&self) -> CodeTally {
        CodeTally::from_stats(&self.stats)
    }
}

impl From<Vec<SummaryStat>> for SummaryStats {
    fn from(stats: Vec<SummaryStat>) -> Self {
        Self { stats }
    }
}

impl IntoIterator for SummaryStats {
    type Item = SummaryStat;
    type IntoIter = std::vec::IntoIter<SummaryStat>;

    fn into_iter(self) -> Self::IntoIter {
        self.stats.into_iter()
    }
}

impl<'a> IntoIterator for &'a SummaryStats {
    type Item = &'a SummaryStat;
    type IntoIter = std::slice::Iter<'a, SummaryStat>;

    fn into_iter(self) -> Self::IntoIter {
        self.stats.iter()
    }
}
