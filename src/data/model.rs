use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use arrow::datatypes::DataType;

/// Base years strictly above this are electronic processes.
pub const ELECTRONIC_YEAR_THRESHOLD: f64 = 2014.0;

// ---------------------------------------------------------------------------
// CellValue – a single raw cell read from a source spreadsheet
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as it comes out of a source file, before the
/// case columns are normalized.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Text rendering of the cell, `None` for empty cells.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::Text(s) if s.trim().is_empty() => None,
            other => Some(other.to_string()),
        }
    }

    /// Lenient numeric coercion: numbers pass through, numeric text is
    /// parsed, anything else is missing.
    pub fn coerce_f64(&self) -> Option<f64> {
        let v = match self {
            CellValue::Float(v) => *v,
            CellValue::Integer(i) => *i as f64,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Bool(_) | CellValue::Null => return None,
        };
        v.is_finite().then_some(v)
    }

    /// Boolean flag coercion for the quality columns.
    pub fn coerce_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            CellValue::Integer(0) => Some(false),
            CellValue::Integer(1) => Some(true),
            CellValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Column – the known case columns
// ---------------------------------------------------------------------------

/// The columns the panel understands, keyed by their source header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    CaseNumber,
    Defendant,
    Claimant,
    Court,
    State,
    County,
    BaseYear,
    Balance,
    DepositOriginal,
    CnjOk,
    DocOk,
}

impl Column {
    pub const ALL: [Column; 11] = [
        Column::CaseNumber,
        Column::Defendant,
        Column::Claimant,
        Column::Court,
        Column::State,
        Column::County,
        Column::BaseYear,
        Column::Balance,
        Column::DepositOriginal,
        Column::CnjOk,
        Column::DocOk,
    ];

    /// Columns that are trimmed and uppercased on conversion.
    pub const CATEGORICAL: [Column; 4] =
        [Column::Court, Column::State, Column::County, Column::Defendant];

    /// Header name in the source spreadsheet and in the cache file.
    pub fn header(self) -> &'static str {
        match self {
            Column::CaseNumber => "Processo",
            Column::Defendant => "Nome Reclamado",
            Column::Claimant => "Nome Reclamante",
            Column::Court => "nome_tribunal",
            Column::State => "UF",
            Column::County => "Comarca",
            Column::BaseYear => "ano_base",
            Column::Balance => "Saldo int",
            Column::DepositOriginal => "Valor Depósito Original Float",
            Column::CnjOk => "cnj_ok",
            Column::DocOk => "doc_ok",
        }
    }

    pub fn from_header(header: &str) -> Option<Column> {
        let header = header.trim();
        Column::ALL.into_iter().find(|c| c.header() == header)
    }

    /// Arrow type used for this column in the cache.
    pub fn data_type(self) -> DataType {
        match self {
            Column::BaseYear | Column::Balance | Column::DepositOriginal => DataType::Float64,
            Column::CnjOk | Column::DocOk => DataType::Boolean,
            _ => DataType::Utf8,
        }
    }

    pub fn is_categorical(self) -> bool {
        Column::CATEGORICAL.contains(&self)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// Trim + uppercase, the normal form of every categorical value.
pub fn normalize_categorical(raw: &str) -> String {
    raw.trim().to_uppercase()
}

// ---------------------------------------------------------------------------
// CaseRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// A single legal case. Every field is optional: a missing cell stays missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseRecord {
    pub case_number: Option<String>,
    pub defendant: Option<String>,
    pub claimant: Option<String>,
    pub court: Option<String>,
    pub state: Option<String>,
    pub county: Option<String>,
    pub base_year: Option<f64>,
    pub balance: Option<f64>,
    pub deposit_original: Option<f64>,
    pub cnj_ok: Option<bool>,
    pub doc_ok: Option<bool>,
}

impl CaseRecord {
    /// Build a record from raw cells, normalizing as it goes.
    pub fn from_cells(cells: &BTreeMap<Column, CellValue>) -> Self {
        let text = |col: Column| {
            cells.get(&col).and_then(CellValue::as_text).map(|s| {
                if col.is_categorical() {
                    normalize_categorical(&s)
                } else {
                    s
                }
            })
        };
        let number = |col: Column| cells.get(&col).and_then(CellValue::coerce_f64);
        let flag = |col: Column| cells.get(&col).and_then(CellValue::coerce_bool);

        CaseRecord {
            case_number: text(Column::CaseNumber),
            defendant: text(Column::Defendant),
            claimant: text(Column::Claimant),
            court: text(Column::Court),
            state: text(Column::State),
            county: text(Column::County),
            base_year: number(Column::BaseYear),
            balance: number(Column::Balance),
            deposit_original: number(Column::DepositOriginal),
            cnj_ok: flag(Column::CnjOk),
            doc_ok: flag(Column::DocOk),
        }
    }

    /// Text value of a string column.
    pub fn text(&self, col: Column) -> Option<&str> {
        match col {
            Column::CaseNumber => self.case_number.as_deref(),
            Column::Defendant => self.defendant.as_deref(),
            Column::Claimant => self.claimant.as_deref(),
            Column::Court => self.court.as_deref(),
            Column::State => self.state.as_deref(),
            Column::County => self.county.as_deref(),
            _ => None,
        }
    }

    pub fn number(&self, col: Column) -> Option<f64> {
        match col {
            Column::BaseYear => self.base_year,
            Column::Balance => self.balance,
            Column::DepositOriginal => self.deposit_original,
            _ => None,
        }
    }

    pub fn flag(&self, col: Column) -> Option<bool> {
        match col {
            Column::CnjOk => self.cnj_ok,
            Column::DocOk => self.doc_ok,
            _ => None,
        }
    }

    /// Filed after the threshold year. A missing year is not electronic.
    pub fn is_electronic(&self) -> bool {
        self.base_year
            .is_some_and(|year| year > ELECTRONIC_YEAR_THRESHOLD)
    }
}

// ---------------------------------------------------------------------------
// CaseDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full loaded dataset with pre-computed facet indices.
///
/// Never mutated after construction; filtering works on row indices.
#[derive(Debug, Clone, Default)]
pub struct CaseDataset {
    pub records: Vec<CaseRecord>,
    /// Known columns the source actually carried.
    pub columns: BTreeSet<Column>,
    /// For each categorical column the sorted set of distinct values.
    pub facet_values: BTreeMap<Column, BTreeSet<String>>,
}

impl CaseDataset {
    pub fn new(records: Vec<CaseRecord>, columns: BTreeSet<Column>) -> Self {
        let mut facet_values: BTreeMap<Column, BTreeSet<String>> = BTreeMap::new();
        for col in Column::CATEGORICAL {
            if !columns.contains(&col) {
                continue;
            }
            let values = records
                .iter()
                .filter_map(|r| r.text(col))
                .map(str::to_string)
                .collect();
            facet_values.insert(col, values);
        }
        CaseDataset {
            records,
            columns,
            facet_values,
        }
    }

    pub fn has_column(&self, col: Column) -> bool {
        self.columns.contains(&col)
    }

    /// Sorted distinct values of a facet column, empty if absent.
    pub fn facet_options(&self, col: Column) -> Vec<String> {
        self.facet_values
            .get(&col)
            .map(|vals| vals.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
