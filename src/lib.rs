//! # selstat
//!
//! A parser for the report printed by the Connect:Direct `select statistics`
//! command.
//!
//! ## Overview
//!
//! A statistics report is semi-tabular text:
//! - **Header**: column titles, ended by a rule of hyphens
//! - **Body**: one record per line, `P` (process), `E` (event) or `X`
//!   (external component), ended by a rule of equals signs
//! - **Record codes**: four or five letter mnemonics like `PSTR` or `CTRC`,
//!   resolved against a built-in knowledge base
//!
//! Parsed records can be filtered by completion code (0 success, 4 warning,
//! 8 error, 16 catastrophic) or tallied for reporting.
//!
//! ## Example
//!
//! ```
//! use selstat::{PROCESS_STARTED, parse_statistics};
//!
//! let report = "\
//! ------
//! E SUBP  02/03/2026 23:28:45 Submit command issued.
//! P PSTR  02/03/2026 23:28:45 sample            14                0      XSMG200I
//! ======
//! ";
//!
//! let stats = parse_statistics(report).unwrap();
//! assert_eq!(stats.len(), 2);
//!
//! let ok = stats.by_codes(&[0]);
//! assert_eq!(ok.len(), 1);
//! assert_eq!(ok[0].id, PROCESS_STARTED);
//! assert_eq!(ok[0].process_number, "14");
//! ```

pub mod error;
pub mod parser;
pub mod record_id;
pub mod render;
pub mod stats;

pub use error::{DateError, ParseError, RecordKind};
pub use parser::{DATE_FORMAT, parse_statistics};
pub use record_id::*;
pub use render::{render_json, render_record_ids, render_tally, render_text, write_output};
pub use stats::{
    COMPLETION_CODE_CATASTROPHIC, COMPLETION_CODE_ERROR, COMPLETION_CODE_SUCCESS,
    COMPLETION_CODE_WARNING, CodeTally, CompletionCode, SummaryStat, SummaryStats,
};
