use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use arrow::datatypes::DataType;
use calamine::{open_workbook_auto, Data, Reader};
use serde_json::Value as JsonValue;

use super::model::{CaseDataset, CaseRecord, CellValue, Column};

// ---------------------------------------------------------------------------
// RawTable – header + untyped rows, straight from a source file
// ---------------------------------------------------------------------------

/// A source sheet before normalization.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    /// Normalize the known columns into a [`CaseDataset`]. Unknown headers
    /// are ignored; known headers absent from the source stay absent.
    pub fn into_dataset(self) -> CaseDataset {
        let known: Vec<(usize, Column)> = self
            .headers
            .iter()
            .enumerate()
            .filter_map(|(i, h)| Column::from_header(h).map(|c| (i, c)))
            .collect();
        let columns: BTreeSet<Column> = known.iter().map(|(_, c)| *c).collect();

        let records = self
            .rows
            .iter()
            .map(|row| {
                let cells: BTreeMap<Column, CellValue> = known
                    .iter()
                    .filter_map(|(i, c)| row.get(*i).map(|v| (*c, v.clone())))
                    .collect();
                CaseRecord::from_cells(&cells)
            })
            .collect();

        CaseDataset::new(records, columns)
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Read a source spreadsheet. Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – first worksheet, header row first
/// * `.csv`  – header row, types guessed outside the text columns
/// * `.json` – `[{ "Processo": "...", "UF": "SP", ... }, ...]`
pub fn read_source(path: &Path) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path),
        "csv" => read_csv(path),
        "json" => read_json(path),
        other => bail!("Unsupported source extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// Workbook reader
// ---------------------------------------------------------------------------

fn read_workbook(path: &Path) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path).map_err(|e| anyhow!("Excel: {e}"))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("Excel file has no worksheets"))?
        .map_err(|e| anyhow!("Excel: {e}"))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(RawTable::default());
    };
    let headers = header_row
        .iter()
        .enumerate()
        .map(|(i, c)| match workbook_cell(c).as_text() {
            Some(h) => h,
            None => format!("column_{}", i + 1),
        })
        .collect();
    let rows = rows.map(|r| r.iter().map(workbook_cell).collect()).collect();

    Ok(RawTable { headers, rows })
}

fn workbook_cell(cell: &Data) -> CellValue {
    match cell {
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) | Data::Empty => CellValue::Null,
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    // Text columns are taken verbatim so identifiers keep leading zeros.
    let verbatim: Vec<bool> = headers
        .iter()
        .map(|h| Column::from_header(h).is_some_and(|c| c.data_type() == DataType::Utf8))
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(
            record
                .iter()
                .enumerate()
                .map(|(i, s)| match verbatim.get(i) {
                    Some(true) if s.is_empty() => CellValue::Null,
                    Some(true) => CellValue::Text(s.to_string()),
                    _ => guess_cell_type(s),
                })
                .collect(),
        );
    }

    Ok(RawTable { headers, rows })
}

fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    match s {
        "true" | "True" | "TRUE" => CellValue::Bool(true),
        "false" | "False" | "FALSE" => CellValue::Bool(false),
        _ => CellValue::Text(s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the shape of `df.to_json(orient='records')`.
/// Headers are taken in first-seen order across all records.
fn read_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(JsonValue::as_object)
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(json_cell).unwrap_or(CellValue::Null))
                .collect()
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn json_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn csv_source_is_normalized() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(
            tmp.path(),
            "cases.csv",
            "Processo,nome_tribunal,UF,ano_base,cnj_ok,extra\n\
             0001,  trt2 ,sp,2016,true,x\n\
             0002,TRT1,rj,abc,false,y\n",
        );

        let ds = read_source(&path).unwrap().into_dataset();
        assert_eq!(ds.len(), 2);
        assert!(ds.has_column(Column::Court));
        assert!(!ds.has_column(Column::DepositOriginal));
        assert_eq!(ds.records[0].court.as_deref(), Some("TRT2"));
        assert_eq!(ds.records[1].state.as_deref(), Some("RJ"));
        assert_eq!(ds.records[0].base_year, Some(2016.0));
        assert_eq!(ds.records[1].base_year, None);
        assert_eq!(ds.records[0].cnj_ok, Some(true));
        assert_eq!(ds.records[0].case_number.as_deref(), Some("0001"));
        assert_eq!(ds.facet_options(Column::State), vec!["RJ", "SP"]);
    }

    #[test]
    fn csv_identifiers_are_not_reinterpreted_as_numbers() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(
            tmp.path(),
            "ids.csv",
            "Processo,Nome Reclamado,Saldo int\n0001234,007,1e3\n1e3,x,\n",
        );

        let ds = read_source(&path).unwrap().into_dataset();
        assert_eq!(ds.records[0].case_number.as_deref(), Some("0001234"));
        assert_eq!(ds.records[0].defendant.as_deref(), Some("007"));
        assert_eq!(ds.records[1].case_number.as_deref(), Some("1e3"));
        assert_eq!(ds.records[1].defendant.as_deref(), Some("X"));
        // Numeric columns are still guessed.
        assert_eq!(ds.records[0].balance, Some(1000.0));
        assert_eq!(ds.records[1].balance, None);
    }

    #[test]
    fn json_source_tolerates_missing_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(
            tmp.path(),
            "cases.json",
            r#"[
                {"Nome Reclamado": " acme ", "Saldo int": 10.5},
                {"Nome Reclamado": "Acme", "UF": "mg"}
            ]"#,
        );

        let ds = read_source(&path).unwrap().into_dataset();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].defendant.as_deref(), Some("ACME"));
        assert_eq!(ds.records[1].defendant.as_deref(), Some("ACME"));
        assert_eq!(ds.records[0].balance, Some(10.5));
        assert_eq!(ds.records[1].balance, None);
        assert_eq!(ds.records[0].state, None);
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        let err = read_source(Path::new("cases.txt")).unwrap_err();
        assert!(err.to_string().contains(".txt"));
    }
}
