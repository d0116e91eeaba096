// ColaCup - core/export.rs
//
// CSV and JSON export of the displayed log groups, for sharing more than one
// entry at a time. Writes to any `Write` implementation; the caller owns the
// destination. `path` is only used to give errors context.

use crate::core::details::DetailsFormatter;
use crate::core::model::{LogEntry, LogGroup};
use crate::util::constants::MAX_EXPORT_ENTRIES;
use crate::util::error::ExportError;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// One exported group in JSON form.
#[derive(Debug, Serialize)]
struct ExportedGroup<'a> {
    identifier: Option<&'a str>,
    entries: &'a [LogEntry],
}

fn check_size(groups: &[LogGroup]) -> Result<usize, ExportError> {
    let count: usize = groups.iter().map(Vec::len).sum();
    if count > MAX_EXPORT_ENTRIES {
        return Err(ExportError::TooManyEntries {
            count,
            max: MAX_EXPORT_ENTRIES,
        });
    }
    Ok(count)
}

/// Export groups to CSV, one row per entry, in display order.
///
/// Writes: time, flag, module, file, line, function, identifier, message
pub fn export_csv<W: Write>(
    groups: &[LogGroup],
    formatter: &DetailsFormatter,
    writer: W,
    path: &Path,
) -> Result<usize, ExportError> {
    check_size(groups)?;
    let mut csv_writer = csv::Writer::from_writer(writer);
    let csv_err = |e| ExportError::Csv {
        path: path.to_path_buf(),
        source: e,
    };

    csv_writer
        .write_record([
            "time",
            "flag",
            "module",
            "file",
            "line",
            "function",
            "identifier",
            "message",
        ])
        .map_err(csv_err)?;

    let mut count = 0;
    for entry in groups.iter().flatten() {
        csv_writer
            .write_record([
                formatter.format_time(entry).as_str(),
                entry.flag.as_str(),
                entry.module.as_str(),
                entry.file_name(),
                entry.line.to_string().as_str(),
                entry.function.as_str(),
                entry.identifier.as_deref().unwrap_or(""),
                entry.message.as_str(),
            ])
            .map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(entries = count, path = %path.display(), "CSV export written");
    Ok(count)
}

/// Export groups to JSON: an array of `{ identifier, entries }` objects.
pub fn export_json<W: Write>(
    groups: &[LogGroup],
    writer: W,
    path: &Path,
) -> Result<usize, ExportError> {
    let count = check_size(groups)?;
    let exported: Vec<ExportedGroup<'_>> = groups
        .iter()
        .map(|group| ExportedGroup {
            identifier: group.first().and_then(|e| e.identifier.as_deref()),
            entries: group,
        })
        .collect();

    serde_json::to_writer_pretty(writer, &exported).map_err(|e| ExportError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(entries = count, path = %path.display(), "JSON export written");
    Ok(count)
}
