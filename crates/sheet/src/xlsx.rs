use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::table::Grid;
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use indexmap::IndexMap;
use rust_xlsxwriter::{Workbook, Worksheet};
use std::io::Cursor;

/// Excel caps worksheet names at 31 characters.
pub const MAX_SHEET_NAME_CHARS: usize = 31;

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => CellValue::Date(value),
            None => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(format!("#ERROR: {e:?}")),
    }
}

/// Turn a calamine range into a grid anchored at A1.
///
/// Calamine trims leading empty rows and columns; they are restored so that
/// row positions match what a spreadsheet application shows.
fn range_to_grid(range: &Range<Data>) -> Grid {
    let (row_offset, col_offset) = range
        .start()
        .map_or((0, 0), |(r, c)| (r as usize, c as usize));

    let mut grid: Grid = vec![Vec::new(); row_offset];
    for row in range.rows() {
        let mut cells = vec![CellValue::Null; col_offset];
        cells.extend(row.iter().map(data_to_cell_value));
        grid.push(cells);
    }
    grid
}

/// Read every worksheet of an xlsx/xls workbook held in memory.
///
/// Returns sheet names in workbook order along with each sheet's grid.
///
/// # Errors
///
/// Returns [`SheetError::Decode`] if the bytes are not a readable workbook.
pub fn read_workbook(bytes: &[u8]) -> Result<(Vec<String>, IndexMap<String, Grid>)> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| SheetError::Decode(e.to_string()))?;

    let sheet_names = workbook.sheet_names();
    let mut grids = IndexMap::with_capacity(sheet_names.len());
    for name in &sheet_names {
        let range = workbook
            .worksheet_range(name)
            .map_err(|e| SheetError::Decode(format!("sheet '{name}': {e}")))?;
        grids.insert(name.clone(), range_to_grid(&range));
    }

    Ok((sheet_names, grids))
}

/// Truncate a worksheet name to the Excel limit, on a character boundary.
#[must_use]
pub fn cap_sheet_name(name: &str) -> String {
    name.chars().take(MAX_SHEET_NAME_CHARS).collect()
}

fn encode_err(e: impl std::fmt::Display) -> SheetError {
    SheetError::Encode(e.to_string())
}

/// Write grid data to a worksheet. Dates are written as text.
fn write_grid(worksheet: &mut Worksheet, grid: &[Vec<CellValue>]) -> Result<()> {
    for (row_idx, row) in grid.iter().enumerate() {
        let row_num =
            u32::try_from(row_idx).map_err(|_| SheetError::Encode("Row index overflow".into()))?;
        for (col_idx, cell) in row.iter().enumerate() {
            let col_num = u16::try_from(col_idx)
                .map_err(|_| SheetError::Encode("Column index overflow".into()))?;

            match cell {
                CellValue::Null => {}
                CellValue::Bool(b) => {
                    worksheet
                        .write_boolean(row_num, col_num, *b)
                        .map_err(encode_err)?;
                }
                CellValue::Int(i) => {
                    // Excel stores all numbers as f64; integers beyond 2^53 lose precision
                    worksheet
                        .write_number(row_num, col_num, *i as f64)
                        .map_err(encode_err)?;
                }
                CellValue::Float(f) => {
                    worksheet
                        .write_number(row_num, col_num, *f)
                        .map_err(encode_err)?;
                }
                CellValue::Date(_) => {
                    worksheet
                        .write_string(row_num, col_num, cell.to_string())
                        .map_err(encode_err)?;
                }
                CellValue::String(s) => {
                    worksheet
                        .write_string(row_num, col_num, s)
                        .map_err(encode_err)?;
                }
            }
        }
    }
    Ok(())
}

/// Serialize named grids into an xlsx file in memory, one worksheet each.
///
/// # Errors
///
/// Returns [`SheetError::Encode`] if a name is rejected or writing fails.
pub fn write_workbook<'a, I>(sheets: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = (&'a str, &'a [Vec<CellValue>])>,
{
    let mut workbook = Workbook::new();
    for (name, grid) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(cap_sheet_name(name)).map_err(encode_err)?;
        write_grid(worksheet, grid)?;
    }
    workbook.save_to_buffer().map_err(encode_err)
}
