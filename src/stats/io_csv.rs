// Primitives for reading CSV files.

use crate::stats::{io_common::flat_rows_to_submissions, *};

pub fn read_csv_submissions(path: &str) -> StatResult<Vec<Submission>> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu {
            path: path.to_string(),
        })?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        // The index starts at 1 to respect most conventions in the spreadsheet world
        let lineno = idx + 1;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        rows.push(line.iter().map(|s| s.to_string()).collect());
    }
    debug!("read_csv_submissions: {:?}: {} lines", path, rows.len());
    flat_rows_to_submissions(path, &rows)
}
