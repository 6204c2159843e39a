use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::survey::io_common::normalize_cell;
use crate::survey::*;

/// Reads a worksheet: the first row is the header, all the other rows are responses.
pub fn read_xlsx_table(path: &str, worksheet_name: Option<&str>) -> SurveyResult<ResponseTable> {
    let wrange = get_range(path, worksheet_name)?;

    let mut iter = wrange.rows();
    let header: Vec<Option<String>> = match iter.next() {
        Some(row) => row.iter().map(cell_text).collect(),
        None => {
            warn!("read_xlsx_table: {:?}: empty worksheet", path);
            Vec::new()
        }
    };
    debug!("read_xlsx_table: header: {:?}", header);

    let mut rows: Vec<Vec<Option<String>>> = Vec::new();
    for (idx, row) in iter.enumerate() {
        let cells: Vec<Option<String>> = row.iter().map(cell_text).collect();
        debug!("read_xlsx_table: idx: {:?} row: {:?}", idx, &cells);
        rows.push(cells);
    }
    Ok(ResponseTable { header, rows })
}

fn cell_text(cell: &DataType) -> Option<String> {
    match cell {
        DataType::String(s) => normalize_cell(s),
        DataType::Int(i) => Some(i.to_string()),
        DataType::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", *f as i64)),
        DataType::Float(f) => Some(f.to_string()),
        DataType::Bool(b) => Some(b.to_string()),
        DataType::Empty => None,
        _ => {
            warn!("cell_text: cannot read cell {:?}, treating it as empty", cell);
            None
        }
    }
}

fn get_range(path: &str, worksheet_name: Option<&str>) -> SurveyResult<calamine::Range<DataType>> {
    debug!("get_range: path: {:?} worksheet: {:?}", path, worksheet_name);
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(name) = worksheet_name {
        let wrange = workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name, path })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let wrange = workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_conversion() {
        assert_eq!(
            cell_text(&DataType::String(" Budi ".to_string())),
            Some("Budi".to_string())
        );
        assert_eq!(cell_text(&DataType::String("".to_string())), None);
        assert_eq!(cell_text(&DataType::Float(12.0)), Some("12".to_string()));
        assert_eq!(cell_text(&DataType::Float(1.5)), Some("1.5".to_string()));
        assert_eq!(cell_text(&DataType::Int(7)), Some("7".to_string()));
        assert_eq!(cell_text(&DataType::Empty), None);
    }

    #[test]
    fn missing_workbook() {
        let err = read_xlsx_table("/nonexistent/jawaban.xlsx", None).unwrap_err();
        assert!(matches!(err, SurveyError::OpeningExcel { .. }));
    }
}
