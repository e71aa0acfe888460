// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Flat CSV export of an index, and the way back in.
//!
//! A snapshot is one `code,symbol,group,subsystem` row per code, ascending, under
//! a header line. Quoting follows RFC 4180 through the `csv` crate, so symbols
//! and group names survive commas, quotes and line breaks. An unclassified code
//! has an empty subsystem. Reading a snapshot and passing [`groups_from_rows`]
//! to the builder recreates the code definitions (the range table is not part
//! of a snapshot).

use crate::errors::SnapshotError;
use crate::registry::{Code, CodeDefinitionGroup, RegistryIndex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Read, Write};

const HEADER: [&str; 4] = ["code", "symbol", "group", "subsystem"];

/// One line of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRow {
    pub code: Code,
    pub symbol: String,
    pub group: String,
    /// Empty in the file when no range covers the code.
    pub subsystem: Option<String>,
}

/// Write every code in `index` as CSV. The header is written even for an empty index.
pub fn write_snapshot<W: Write>(index: &RegistryIndex, writer: W) -> Result<(), SnapshotError> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv.write_record(HEADER).map_err(snapshot_error)?;
    for (code, entry) in index.iter() {
        csv.serialize(SnapshotRow {
            code,
            symbol: entry.symbol.clone(),
            group: entry.group_name.clone(),
            subsystem: entry.subsystem.clone(),
        })
        .map_err(snapshot_error)?;
    }
    csv.flush()?;
    Ok(())
}

/// Read rows back. Blank lines are skipped; the header is required.
pub fn read_snapshot<R: Read>(reader: R) -> Result<Vec<SnapshotRow>, SnapshotError> {
    let mut csv = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = csv.headers().map_err(snapshot_error)?;
    if headers.is_empty() {
        return Err(SnapshotError::MalformedRow {
            line: 0,
            reason: "empty snapshot".to_string(),
        });
    }
    if !headers.iter().eq(HEADER) {
        return Err(SnapshotError::MalformedRow {
            line: 1,
            reason: format!("expected header '{}'", HEADER.join(",")),
        });
    }

    csv.deserialize::<SnapshotRow>()
        .map(|row| row.map_err(snapshot_error))
        .collect()
}

/// Regroup rows by group name, preserving row order within each group.
pub fn groups_from_rows(rows: &[SnapshotRow]) -> Vec<CodeDefinitionGroup> {
    let mut grouped: BTreeMap<&str, Vec<(Code, &str)>> = BTreeMap::new();
    for row in rows {
        grouped
            .entry(row.group.as_str())
            .or_default()
            .push((row.code, row.symbol.as_str()));
    }
    grouped
        .into_iter()
        .map(|(name, entries)| CodeDefinitionGroup::new(name, "").with_entries(entries))
        .collect()
}

/// I/O failures stay I/O errors; everything else is pinned to the line it came from.
fn snapshot_error(err: csv::Error) -> SnapshotError {
    let line = err.position().map_or(0, |pos| pos.line() as usize);
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(io) => SnapshotError::Io(io),
        _ => SnapshotError::MalformedRow { line, reason },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{build_registry, RegistryBuilder, SystemRange};
    use std::io::Cursor;
    use tempfile::NamedTempFile;

    fn index() -> RegistryIndex {
        build_registry(
            vec![SystemRange::new("status", 0, 49, "Status").unwrap()],
            vec![
                CodeDefinitionGroup::new("Status, Extended", "").with_entries([(11, "active"), (3, "pending")]),
                CodeDefinitionGroup::new("Stray", "").with_entry(900, "stray.event"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_write_snapshot_format() {
        let mut out = Vec::new();
        write_snapshot(&index(), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "code,symbol,group,subsystem\n\
             3,pending,\"Status, Extended\",status\n\
             11,active,\"Status, Extended\",status\n\
             900,stray.event,Stray,\n"
        );
    }

    #[test]
    fn test_empty_index_still_has_header() {
        let empty = RegistryBuilder::new().build().unwrap();
        let mut out = Vec::new();
        write_snapshot(&empty, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "code,symbol,group,subsystem\n");
    }

    #[test]
    fn test_snapshot_file_rebuilds_same_codes() {
        let original = index();
        let file = NamedTempFile::new().unwrap();
        write_snapshot(&original, file.as_file()).unwrap();

        let rows = read_snapshot(std::fs::File::open(file.path()).unwrap()).unwrap();
        assert_eq!(rows[2], SnapshotRow {
            code: 900,
            symbol: "stray.event".to_string(),
            group: "Stray".to_string(),
            subsystem: None,
        });

        let rebuilt = RegistryBuilder::new()
            .add_range(SystemRange::new("status", 0, 49, "Status").unwrap())
            .with_definitions(crate::traits::Definitions {
                groups: groups_from_rows(&rows),
                ..Default::default()
            })
            .build()
            .unwrap();
        let before: Vec<_> = original.iter().map(|(c, e)| (c, e.clone())).collect();
        let after: Vec<_> = rebuilt.iter().map(|(c, e)| (c, e.clone())).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_group_names_with_quotes_and_line_breaks_survive() {
        let index = build_registry(
            Vec::<SystemRange>::new(),
            vec![
                CodeDefinitionGroup::new("Status\nExtended", "").with_entry(1, "a"),
                CodeDefinitionGroup::new("say \"hi\"\r\n", "").with_entry(2, "b"),
            ],
        )
        .unwrap();

        let mut csv = Vec::new();
        write_snapshot(&index, &mut csv).unwrap();
        let rows = read_snapshot(Cursor::new(csv)).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].group, "Status\nExtended");
        assert_eq!(rows[1].group, "say \"hi\"\r\n");
        assert_eq!(rows[1].subsystem, None);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let rows = read_snapshot(Cursor::new(
            "code,symbol,group,subsystem\n\n7,x,G,status\n\n",
        ))
        .unwrap();
        assert_eq!(rows, vec![SnapshotRow {
            code: 7,
            symbol: "x".to_string(),
            group: "G".to_string(),
            subsystem: Some("status".to_string()),
        }]);
    }

    #[test]
    fn test_malformed_rows() {
        let missing_header = read_snapshot(Cursor::new("1,a,G,\n")).unwrap_err();
        assert!(matches!(missing_header, SnapshotError::MalformedRow { line: 1, .. }));

        let short = read_snapshot(Cursor::new("code,symbol,group,subsystem\n\n1,a\n")).unwrap_err();
        assert!(matches!(short, SnapshotError::MalformedRow { line: 3, .. }));

        let bad_code = read_snapshot(Cursor::new("code,symbol,group,subsystem\nx,a,G,\n")).unwrap_err();
        assert!(matches!(bad_code, SnapshotError::MalformedRow { line: 2, .. }));

        assert!(matches!(
            read_snapshot(Cursor::new("")),
            Err(SnapshotError::MalformedRow { line: 0, .. })
        ));
    }
}
