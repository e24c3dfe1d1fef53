//! Parser for `select statistics` report text.
//!
//! A report looks like:
//! ```text
//! P RECID LOG TIME            PNAME        PNUMBER  STEPNAME   CCOD FDBK MSGID
//! E RECID LOG TIME            MESSAGE TEXT
//! -------------------------------------------------------------------------------
//! E SUBP  02/03/2026 23:28:45 Submit command issued.
//! P PSTR  02/03/2026 23:28:45 sample            14                0      XSMG200I
//! ===============================================================================
//! ```
//!
//! - Lines up to and including the first hyphen rule are header
//! - Lines after it are body, until a line with an equals rule
//! - Each body line is split on whitespace and classified:
//!   - `SUBP` in the code column is a submit notice
//!   - otherwise the type column picks `P`, `E` or `X` extraction
//!   - anything else is ignored
//! - Lines too short for their shape are dropped without error
//! - A bad date or completion code fails the whole parse
//!
//! Statistics come from commands like `sel stat ccode(ge,0) pnumber=18;`.

use crate::error::{DateError, ParseError, RecordKind};
use crate::record_id::{RecordId, SUBMIT_PROCESS};
use crate::stats::{EVENT_TYPE, EXTERNAL_TYPE, PROCESS_TYPE, SummaryStat, SummaryStats};
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{debug, info, trace};

/// Marks the start of the body when found in a trimmed line.
pub const BODY_START: &str = "------";
/// Marks the end of the body once the body has started.
pub const BODY_END: &str = "======";
/// Log timestamp layout, date and time columns joined by one space.
pub const DATE_FORMAT: &str = "%m/%d/%Y %H:%M:%S";
/// Fixed-width shape of a timestamp; `9` is any digit.
const DATE_LAYOUT: &str = "99/99/9999 99:99:99";

/// Minimum columns: type, code, date, time.
const MIN_EVENT_COLUMNS: usize = 4;
/// Minimum columns: type, code, date, time, name, pnumber, ccode, msgid.
const MIN_PROCESS_COLUMNS: usize = 8;

/// Parse the output of a `select statistics` command into records.
///
/// Records come back in line order. Lines before the first hyphen rule are
/// never looked at; without a hyphen rule the result is empty.
pub fn parse_statistics(input: &str) -> Result<SummaryStats, ParseError> {
    let mut out = SummaryStats::new();
    let mut in_body = false;

    for (idx, raw) in input.lines().enumerate() {
        let line = raw.trim();

        let opens_body = !in_body && line.contains(BODY_START);
        if opens_body {
            in_body = true;
        }
        if in_body && line.contains(BODY_END) {
            debug!(line = idx + 1, "end of statistics body");
            break;
        }
        if !in_body || opens_body {
            continue;
        }

        if let Some(stat) = parse_line(idx + 1, line)? {
            trace!(line = idx + 1, code = %stat.id, "parsed record");
            out.push(stat);
        }
    }

    info!(records = out.len(), "parsed statistics report");
    Ok(out)
}

/// Classify one body line and extract its record, if it has one.
fn parse_line(line_num: usize, line: &str) -> Result<Option<SummaryStat>, ParseError> {
    let cols: Vec<&str> = line.split_whitespace().collect();
    if cols.len() < 2 {
        if !cols.is_empty() {
            debug!(line = line_num, "skipping line with a single column");
        }
        return Ok(None);
    }

    if cols[1].eq_ignore_ascii_case(&SUBMIT_PROCESS.code) {
        return parse_submission_record(line_num, &cols);
    }

    // P RECID LOG TIME            PNAME        PNUMBER  STEPNAME   CCOD FDBK MSGID
    // E RECID LOG TIME            MESSAGE TEXT
    // X RECID LOG TIME            APP DESC     USID     NODENAME   CCOD MSGID
    match cols[0] {
        PROCESS_TYPE => parse_process_record(line_num, &cols),
        EVENT_TYPE => parse_event_record(line_num, &cols),
        EXTERNAL_TYPE => parse_external_record(line_num, &cols),
        other => {
            debug!(line = line_num, record_type = other, "skipping unknown record type");
            Ok(None)
        }
    }
}

/// Parse a submit notice:
/// ```text
/// E SUBP  02/03/2026 23:28:45 Submit command issued.
/// ```
fn parse_submission_record(
    line_num: usize,
    cols: &[&str],
) -> Result<Option<SummaryStat>, ParseError> {
    if cols.len() < MIN_EVENT_COLUMNS {
        debug!(line = line_num, columns = cols.len(), "short SUBP line dropped");
        return Ok(None);
    }

    let date = parse_date(line_num, RecordKind::Submission, &SUBMIT_PROCESS, cols)?;

    Ok(Some(SummaryStat {
        record_type: cols[0].to_string(),
        id: SUBMIT_PROCESS,
        date,
        description: cols[4..].join(" "),
        process_number: String::new(),
        code: 0,
        message_id: String::new(),
    }))
}

/// Parse a process record:
/// ```text
/// P PSTR  02/03/2026 23:28:45 sample            14                0      XSMG200I
/// P CTRC  02/03/2026 23:28:52 sample            14   STEP1        0      SCPA000I
/// ```
///
/// The name column has no fixed width, so columns are taken from the right.
/// Lines with more than the minimum column count carry one extra column just
/// before the completion code, which is skipped.
fn parse_process_record(
    line_num: usize,
    cols: &[&str],
) -> Result<Option<SummaryStat>, ParseError> {
    if cols.len() < MIN_PROCESS_COLUMNS {
        debug!(line = line_num, columns = cols.len(), "short process line dropped");
        return Ok(None);
    }

    let id = RecordId::resolve(cols[1]);
    let date = parse_date(line_num, RecordKind::Process, &id, cols)?;

    let mut idx = cols.len() - 1;
    let message_id = cols[idx].to_string();
    idx -= 1;

    let code = cols[idx]
        .parse::<i16>()
        .map_err(|source| ParseError::InvalidCompletionCode {
            line: line_num,
            kind: RecordKind::Process,
            code: id.code.to_string(),
            value: cols[idx].to_string(),
            source,
        })?;
    idx -= 1;

    if cols.len() > MIN_PROCESS_COLUMNS {
        idx -= 1; // node or step name
    }

    Ok(Some(SummaryStat {
        record_type: cols[0].to_string(),
        id,
        date,
        description: cols[4..idx].join(" "),
        process_number: cols[idx].to_string(),
        code: i32::from(code),
        message_id,
    }))
}

/// Parse an event record:
/// ```text
/// E RNCF  02/05/2026 22:45:40 Attempt to connect to remote node frbpajcd02 failed
/// ```
fn parse_event_record(line_num: usize, cols: &[&str]) -> Result<Option<SummaryStat>, ParseError> {
    if cols.len() < MIN_EVENT_COLUMNS {
        debug!(line = line_num, columns = cols.len(), "short event line dropped");
        return Ok(None);
    }

    let id = RecordId::resolve(cols[1]);
    let date = parse_date(line_num, RecordKind::Event, &id, cols)?;

    Ok(Some(SummaryStat {
        record_type: cols[0].to_string(),
        id,
        date,
        description: cols[4..].join(" "),
        process_number: String::new(),
        code: 0,
        message_id: String::new(),
    }))
}

/// External component records are recognised but not extracted yet; they
/// never produce a record and never fail.
fn parse_external_record(
    line_num: usize,
    cols: &[&str],
) -> Result<Option<SummaryStat>, ParseError> {
    let id = RecordId::resolve(cols[1]);
    debug!(line = line_num, code = %id, "external record not extracted");
    Ok(None)
}

/// Parse the date and time columns (`cols[2]`, `cols[3]`) as UTC.
fn parse_date(
    line_num: usize,
    kind: RecordKind,
    id: &RecordId,
    cols: &[&str],
) -> Result<DateTime<Utc>, ParseError> {
    let value = cols[2..4].join(" ");
    let parsed = if matches_layout(&value) {
        NaiveDateTime::parse_from_str(&value, DATE_FORMAT).map_err(DateError::from)
    } else {
        // chrono accepts one-digit fields, the report never prints them
        Err(DateError::Layout)
    };
    parsed
        .map(|naive| naive.and_utc())
        .map_err(|source| ParseError::InvalidDate {
            line: line_num,
            kind,
            code: id.code.to_string(),
            value,
            source,
        })
}

fn matches_layout(value: &str) -> bool {
    value.len() == DATE_LAYOUT.len()
        && value
            .bytes()
            .zip(DATE_LAYOUT.bytes())
            .all(|(v, l)| if l == b'9' { v.is_ascii_digit() } else { v == l })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record_id::{
        COPY_TERMINATION_RECORD, PROCESS_ENDED, PROCESS_STARTED, SESSION_ERROR, TCQ_CHANGE,
    };
    use chrono::TimeZone;
    use std::fs;
    use std::path::Path;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 3, h, m, s).unwrap()
    }

    fn body(lines: &[&str]) -> String {
        let mut text = String::from("P RECID LOG TIME  PNAME  PNUMBER  CCOD MSGID\n");
        text.push_str("--------------------------------------------\n");
        for line in lines {
            text.push_str(line);
            text.push('\n');
        }
        text.push_str("============================================\n");
        text
    }

    #[test]
    fn test_no_hyphen_rule_is_empty() {
        let input = "P PSTR  02/03/2026 23:28:45 sample 14 0 XSMG200I\n======\n";
        let stats = parse_statistics(input).unwrap();
        assert!(stats.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_statistics("").unwrap().is_empty());
    }

    #[test]
    fn test_empty_body() {
        let stats = parse_statistics("header\n------\n======\n").unwrap();
        assert!(stats.is_empty());
    }

    #[test]
    fn test_stops_at_equals_rule() {
        let input = body(&["P PSTR  02/03/2026 23:28:45 sample 14 0 XSMG200I"])
            + "P PRED  02/03/2026 23:28:52 sample 14 0 XSMG252I\n";
        let stats = parse_statistics(&input).unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats.iter().next().unwrap().id, PROCESS_STARTED);
    }

    #[test]
    fn test_equals_rule_before_body_is_header() {
        let input = "=========\nSELECT STATISTICS\n=========\n------\n\
                     E SSTR  02/03/2026 23:28:45 Session started\n=========\n";
        let stats = parse_statistics(input).unwrap();
        assert_eq!(stats.len(), 1);
    }

    #[test]
    fn test_sample_report() {
        let input = "------\n\
                     E SUBP  02/03/2026 23:28:45 Submit command issued.\n\
                     P PSTR  02/03/2026 23:28:45 sample            14                0      XSMG200I\n\
                     ======\n";
        let stats = parse_statistics(input).unwrap();
        assert_eq!(stats.len(), 2);

        let submit = &stats.as_slice()[0];
        assert_eq!(submit.record_type, "E");
        assert_eq!(submit.id, SUBMIT_PROCESS);
        assert_eq!(submit.date, at(23, 28, 45));
        assert_eq!(submit.description, "Submit command issued.");
        assert_eq!(submit.process_number, "");
        assert_eq!(submit.code, 0);
        assert_eq!(submit.message_id, "");

        let started = &stats.as_slice()[1];
        assert_eq!(started.record_type, "P");
        assert_eq!(started.id, PROCESS_STARTED);
        assert_eq!(started.description, "sample");
        assert_eq!(started.process_number, "14");
        assert_eq!(started.code, 0);
        assert_eq!(started.message_id, "XSMG200I");
    }

    #[test]
    fn test_submission_short_line_dropped() {
        let stats = parse_statistics(&body(&["E SUBP 02/03/2026"])).unwrap();
        assert!(stats.is_empty());
    }

    #[test]
    fn test_submission_without_text() {
        let stats = parse_statistics(&body(&["e subp 02/03/2026 23:28:45"])).unwrap();
        assert_eq!(stats.len(), 1);
        let submit = &stats.as_slice()[0];
        assert_eq!(submit.record_type, "e");
        assert_eq!(submit.id, SUBMIT_PROCESS);
        assert_eq!(submit.description, "");
    }

    #[test]
    fn test_submission_bad_date_fails() {
        let err = parse_statistics(&body(&["E SUBP 02/30/2026 23:28:45 Submit"])).unwrap_err();
        assert!(matches!(err, ParseError::InvalidDate { .. }));
        assert_eq!(err.kind(), RecordKind::Submission);
        assert_eq!(err.line(), 3);
        assert!(err.to_string().contains("SUBP"));
    }

    #[test]
    fn test_process_eight_columns() {
        let stats =
            parse_statistics(&body(&["P XIPT  02/05/2026 22:45:40 SENDFILE 21 8 XIPT004I"]))
                .unwrap();
        let stat = &stats.as_slice()[0];
        assert_eq!(stat.process_number, "21");
        assert_eq!(stat.description, "SENDFILE");
        assert_eq!(stat.code, 8);
        assert_eq!(stat.message_id, "XIPT004I");
        assert_eq!(stat.date, Utc.with_ymd_and_hms(2026, 2, 5, 22, 45, 40).unwrap());
    }

    #[test]
    fn test_process_skips_node_column() {
        let stats = parse_statistics(&body(&[
            "P CTRC  02/03/2026 23:28:52 sample            14   STEP1        0      SCPA000I",
        ]))
        .unwrap();
        let stat = &stats.as_slice()[0];
        assert_eq!(stat.id, COPY_TERMINATION_RECORD);
        assert_eq!(stat.process_number, "14");
        assert_eq!(stat.description, "sample");
        assert_eq!(stat.code, 0);
        assert_eq!(stat.message_id, "SCPA000I");
    }

    #[test]
    fn test_process_wide_description() {
        let stats =
            parse_statistics(&body(&["P PRED 02/03/2026 23:28:52 my proc 14 NODEA 4 XSMG252I"]))
                .unwrap();
        let stat = &stats.as_slice()[0];
        assert_eq!(stat.description, "my proc");
        assert_eq!(stat.process_number, "14");
        assert_eq!(stat.code, 4);
    }

    #[test]
    fn test_process_short_line_dropped() {
        let stats =
            parse_statistics(&body(&["P PSTR 02/03/2026 23:28:45 sample 0 XSMG200I"])).unwrap();
        assert!(stats.is_empty());
    }

    #[test]
    fn test_process_bad_code_discards_everything() {
        let result = parse_statistics(&body(&[
            "P PSTR 02/03/2026 23:28:45 sample 14 0 XSMG200I",
            "P PRED 02/03/2026 23:28:52 sample 14 OK XSMG252I",
        ]));
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidCompletionCode { ref value, .. } if value == "OK"
        ));
        assert_eq!(err.kind(), RecordKind::Process);
        assert_eq!(err.line(), 4);
    }

    #[test]
    fn test_process_code_out_of_range_fails() {
        let result = parse_statistics(&body(&["P PRED 02/03/2026 23:28:52 sample 14 99999 X"]));
        assert!(matches!(
            result,
            Err(ParseError::InvalidCompletionCode { .. })
        ));
    }

    #[test]
    fn test_process_bad_date_fails() {
        let err = parse_statistics(&body(&["P PSTR 2026-02-03 23:28:45 sample 14 0 XSMG200I"]))
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidDate { ref code, .. } if code == "PSTR"));
    }

    #[test]
    fn test_process_unknown_code_synthesized() {
        let stats =
            parse_statistics(&body(&["P zzzz 02/03/2026 23:28:45 sample 14 0 XSMG200I"])).unwrap();
        let stat = &stats.as_slice()[0];
        assert_eq!(stat.id, RecordId::unknown("ZZZZ"));
        assert_eq!(stat.id.code, "ZZZZ");
        assert_eq!(stat.id.category, None);
    }

    #[test]
    fn test_event_record() {
        let stats = parse_statistics(&body(&[
            "E SERR  02/05/2026 22:45:40 Attempt to connect to remote node frbpajcd02 failed",
            "E QC9Z  02/05/2026 22:45:41",
        ]))
        .unwrap();
        assert_eq!(stats.len(), 2);

        let err = &stats.as_slice()[0];
        assert_eq!(err.id, SESSION_ERROR);
        assert_eq!(
            err.description,
            "Attempt to connect to remote node frbpajcd02 failed"
        );
        assert_eq!(err.process_number, "");
        assert_eq!(err.code, 0);
        assert_eq!(err.message_id, "");

        let queue = &stats.as_slice()[1];
        assert_eq!(queue.id, TCQ_CHANGE);
        assert_eq!(queue.description, "");
    }

    #[test]
    fn test_event_unknown_code_synthesized() {
        let stats = parse_statistics(&body(&["E RNCF 02/05/2026 22:45:40 failed"])).unwrap();
        assert_eq!(stats.as_slice()[0].id, RecordId::unknown("RNCF"));
    }

    #[test]
    fn test_event_short_line_dropped() {
        let stats = parse_statistics(&body(&["E SSTR 02/05/2026"])).unwrap();
        assert!(stats.is_empty());
    }

    #[test]
    fn test_single_digit_month_fails() {
        let err = parse_statistics("------\nE SSTR 2/3/2026 23:28:45 x\n======\n").unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidDate { source: DateError::Layout, ref value, .. }
                if value == "2/3/2026 23:28:45"
        ));
    }

    #[test]
    fn test_short_time_and_signed_year_fail() {
        for line in [
            "E SSTR 02/03/2026 3:28:45 x",
            "E SSTR 02/03/+026 23:28:45 x",
            "E SSTR 02/03/20260 23:28:45 x",
        ] {
            let result = parse_statistics(&body(&[line]));
            assert!(
                matches!(result, Err(ParseError::InvalidDate { source: DateError::Layout, .. })),
                "{line}"
            );
        }
    }

    #[test]
    fn test_calendar_check_after_layout() {
        let err = parse_statistics(&body(&["E SSTR 13/03/2026 23:28:45 x"])).unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidDate { source: DateError::Chrono(_), .. }
        ));
    }

    #[test]
    fn test_event_bad_date_fails() {
        let err = parse_statistics(&body(&["E SSTR 02/05/2026 25:00:00 x"])).unwrap_err();
        assert_eq!(err.kind(), RecordKind::Event);
    }

    #[test]
    fn test_external_record_is_inert() {
        let stats = parse_statistics(&body(&[
            "X EXFA 02/05/2026 22:45:40 agent desc USER1 NODEA 0 XIFA000I",
            "X EXFA not-a-date",
            "X",
        ]))
        .unwrap();
        assert!(stats.is_empty());
    }

    #[test]
    fn test_unknown_type_ignored() {
        let stats = parse_statistics(&body(&[
            "Q PSTR 02/03/2026 23:28:45 sample 14 0 XSMG200I",
            "- ---- ---------- --------",
            "single",
            "",
        ]))
        .unwrap();
        assert!(stats.is_empty());
    }

    #[test]
    fn test_submission_checked_before_type() {
        let stats =
            parse_statistics(&body(&["P SUBP 02/03/2026 23:28:45 Submit command issued."]))
                .unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats.as_slice()[0].id, SUBMIT_PROCESS);
        assert_eq!(stats.as_slice()[0].record_type, "P");
    }

    #[test]
    fn test_crlf_line_endings() {
        let input = "------\r\nE SUBP  02/03/2026 23:28:45 Submit\r\n======\r\n";
        let stats = parse_statistics(input).unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats.as_slice()[0].description, "Submit");
    }

    #[test]
    fn test_fixture_report() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata/ccode_stats.txt");
        let input = fs::read_to_string(path).unwrap();
        let stats = parse_statistics(&input).unwrap();

        let ids: Vec<&RecordId> = stats.iter().map(|s| &s.id).collect();
        assert_eq!(
            ids,
            vec![
                &SUBMIT_PROCESS,
                &PROCESS_STARTED,
                &PROCESS_STARTED,
                &COPY_TERMINATION_RECORD,
                &COPY_TERMINATION_RECORD,
                &PROCESS_ENDED,
                &PROCESS_ENDED,
            ]
        );

        for stat in stats.iter().skip(1) {
            assert_eq!(stat.description, "sample");
            assert_eq!(stat.process_number, "14");
            assert_eq!(stat.code, 0);
        }
        assert_eq!(stats.as_slice()[3].date, at(23, 28, 52));
        assert_eq!(stats.as_slice()[3].message_id, "SCPA000I");
        assert_eq!(stats.as_slice()[6].message_id, "XSMG252I");
        assert_eq!(stats.by_codes(&[0]).len(), 6);
        assert!(stats.by_codes(&[4, 8, 16]).is_empty());
    }
}
