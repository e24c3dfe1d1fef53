//! Text and JSON rendering of parsed statistics.

use crate::parser::DATE_FORMAT;
use crate::record_id::RecordId;
use crate::stats::{CodeTally, SummaryStat};
use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::Path;

/// Format a timestamp the way the report prints it.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// One line per record, columns aligned like the report body.
pub fn render_text<'a, I>(stats: I) -> String
where
    I: IntoIterator<Item = &'a SummaryStat>,
{
    stats
        .into_iter()
        .map(|s| {
            // completion codes only mean something on process lines
            let code = if s.is_process() {
                s.code.to_string()
            } else {
                String::new()
            };
            format!(
                "{} {:<5} {} {:<16} {:>8} {:>4} {:<8}",
                s.record_type,
                s.id.code,
                format_date(&s.date),
                s.description,
                s.process_number,
                code,
                s.message_id,
            )
            .trim_end()
            .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pretty-printed JSON array of records.
pub fn render_json<'a, I>(stats: I) -> serde_json::Result<String>
where
    I: IntoIterator<Item = &'a SummaryStat>,
{
    let stats: Vec<&SummaryStat> = stats.into_iter().collect();
    serde_json::to_string_pretty(&stats)
}

/// Completion code summary, one count per line.
pub fn render_tally(tally: &CodeTally) -> String {
    [
        ("Success", tally.success),
        ("Warning", tally.warning),
        ("Error", tally.error),
        ("Catastrophic", tally.catastrophic),
        ("Other", tally.other),
        ("Non-process", tally.non_process),
    ]
    .iter()
    .map(|(label, count)| format!("{label:<13}{count}"))
    .collect::<Vec<_>>()
    .join("\n")
}

/// Knowledge base listing: code, category, description.
pub fn render_record_ids<'a, I>(ids: I) -> String
where
    I: IntoIterator<Item = &'a RecordId>,
{
    ids.into_iter()
        .map(|id| {
            let category = id.category.map(|c| c.to_string()).unwrap_or_default();
            format!("{:<5}  {:<15}  {}", id.code, category, id.description)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write `text` to `path`, creating parent directories as needed.
pub fn write_output(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let mut contents = text.to_string();
    if !contents.is_empty() && !contents.ends_with('\n') {
        contents.push('\n');
    }
    fs::write(path, contents)
}
