use crate::error::{AnalyticsError, Result};
use chrono::{Datelike, NaiveDate};

/// The parsed `Order Date` of a row. `Unknown` never matches a month or
/// year predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDate {
    Known(NaiveDate),
    Unknown,
}

impl OrderDate {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            OrderDate::Known(date) => Some(*date),
            OrderDate::Unknown => None,
        }
    }

    pub fn month(&self) -> Option<u32> {
        self.date().map(|d| d.month())
    }

    pub fn year(&self) -> Option<i32> {
        self.date().map(|d| d.year())
    }

    pub fn day(&self) -> Option<u32> {
        self.date().map(|d| d.day())
    }
}

/// One ledger row. The columns the engine computes over are parsed once at
/// load time; every cell is also kept as text so any column can serve as a
/// grouping field.
#[derive(Debug, Clone)]
pub struct SalesRecord {
    pub order_date: OrderDate,
    pub sales: Option<f64>,
    pub profit: Option<f64>,
    pub quantity: Option<f64>,
    pub discount: Option<f64>,
    pub customer_name: Option<String>,
    pub product_name: Option<String>,
    cells: Vec<Option<String>>,
}

impl SalesRecord {
    pub(crate) fn new(cells: Vec<Option<String>>) -> Self {
        Self {
            order_date: OrderDate::Unknown,
            sales: None,
            profit: None,
            quantity: None,
            discount: None,
            customer_name: None,
            product_name: None,
            cells,
        }
    }

    pub fn cell(&self, column_index: usize) -> Option<&str> {
        self.cells.get(column_index).and_then(|c| c.as_deref())
    }
}

/// An immutable, fully loaded ledger. Queries only ever borrow it.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<SalesRecord>,
}

impl Dataset {
    pub(crate) fn from_parts(columns: Vec<String>, records: Vec<SalesRecord>) -> Self {
        Self { columns, records }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn require_column(&self, name: &str) -> Result<()> {
        if self.has_column(name) {
            Ok(())
        } else {
            Err(AnalyticsError::MissingColumn(name.to_string()))
        }
    }

    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        names.iter().try_for_each(|name| self.require_column(name))
    }

    /// A view over every row.
    pub fn view(&self) -> View<'_> {
        View {
            dataset: self,
            rows: self.records.iter().collect(),
        }
    }
}

/// A read-only subset of a dataset's rows, sharing row identity with it.
#[derive(Debug, Clone)]
pub struct View<'a> {
    dataset: &'a Dataset,
    rows: Vec<&'a SalesRecord>,
}

impl<'a> View<'a> {
    pub(crate) fn new(dataset: &'a Dataset, rows: Vec<&'a SalesRecord>) -> Self {
        Self { dataset, rows }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn rows(&self) -> &[&'a SalesRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a SalesRecord> + '_ {
        self.rows.iter().copied()
    }

    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        self.dataset.require_columns(names)
    }

    /// True when both views hold the same source rows in the same order.
    pub fn same_rows(&self, other: &View<'_>) -> bool {
        self.rows.len() == other.rows.len()
            && self
                .rows
                .iter()
                .zip(other.rows.iter())
                .all(|(a, b)| std::ptr::eq(*a, *b))
    }
}
