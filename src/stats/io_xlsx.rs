use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::stats::{io_common::flat_rows_to_submissions, *};

pub fn read_xlsx_submissions(path: &str, cfs: &FileSource) -> StatResult<Vec<Submission>> {
    let wrange = get_range(path, cfs)?;
    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, row) in wrange.rows().enumerate() {
        let mut cells: Vec<String> = Vec::new();
        for cell in row.iter() {
            cells.push(read_cell(cell, (idx + 1) as u64)?);
        }
        rows.push(cells);
    }
    debug!("read_xlsx_submissions: {:?}: {} rows", path, rows.len());
    flat_rows_to_submissions(path, &rows)
}

// Numbers are common in the profile columns (age, ward, phone), dates in date and time.
fn read_cell(cell: &DataType, lineno: u64) -> StatResult<String> {
    match cell {
        DataType::String(s) => Ok(s.clone()),
        DataType::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Ok(format!("{}", *f as i64)),
        DataType::Float(f) => Ok(f.to_string()),
        DataType::Int(i) => Ok(i.to_string()),
        DataType::Bool(b) => Ok(b.to_string()),
        DataType::Empty => Ok(String::new()),
        DataType::DateTime(f) => match cell.as_datetime() {
            // Serials below one day carry only a time of day.
            Some(dt) if *f < 1.0 => Ok(dt.format("%H:%M:%S").to_string()),
            Some(dt) if f.fract() == 0.0 => Ok(dt.format("%Y-%m-%d").to_string()),
            Some(dt) => Ok(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => Ok(f.to_string()),
        },
        _ => Err(StatError::ExcelWrongCellType {
            lineno,
            content: format!("{:?}", cell),
        }),
    }
}

fn get_range(path: &str, cfs: &FileSource) -> StatResult<calamine::Range<DataType>> {
    debug!(
        "read_xlsx_submissions: path: {:?} worksheet: {:?}",
        path, cfs.worksheet_name
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu {
        path: path.to_string(),
    })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = cfs.worksheet_name.as_ref() {
        let wrange = workbook
            .worksheet_range(worksheet_name)
            .context(MissingWorksheetSnafu {
                name: worksheet_name.clone(),
                path: path.to_string(),
            })?
            .context(OpeningExcelSnafu {
                path: path.to_string(),
            })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => EmptyExcelSnafu {
                path: path.to_string(),
            }
            .fail(),
            [(worksheet_name, wrange)] => {
                debug!(
                    "read_xlsx_submissions: path: {:?} worksheet: {:?}",
                    path, worksheet_name
                );
                Ok(wrange.clone())
            }
            _ => whatever!(
                "{}: the workbook has several worksheets, the worksheet name must be provided",
                path
            ),
        }
    }
}
