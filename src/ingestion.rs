use crate::config::AnalyticsConfig;
use crate::dataset::{Dataset, OrderDate, SalesRecord};
use crate::error::Result;
use crate::schema::{CUSTOMER_NAME, DISCOUNT, ORDER_DATE, PRODUCT_NAME, PROFIT, QUANTITY, SALES};
use crate::utils::{parse_number, parse_order_date};
use log::{debug, warn};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Decodes an ISO-8859-1 field. Bytes 0x80..=0x9F stay C1 controls.
fn decode_field(bytes: &[u8]) -> String {
    encoding_rs::mem::decode_latin1(bytes).into_owned()
}

/// Column positions of the typed fields, resolved once from the header.
struct TypedColumns {
    order_date: Option<usize>,
    sales: Option<usize>,
    profit: Option<usize>,
    quantity: Option<usize>,
    discount: Option<usize>,
    customer_name: Option<usize>,
    product_name: Option<usize>,
}

impl TypedColumns {
    fn resolve(headers: &[String]) -> Self {
        let find = |name: &str| headers.iter().position(|h| h == name);
        Self {
            order_date: find(ORDER_DATE),
            sales: find(SALES),
            profit: find(PROFIT),
            quantity: find(QUANTITY),
            discount: find(DISCOUNT),
            customer_name: find(CUSTOMER_NAME),
            product_name: find(PRODUCT_NAME),
        }
    }
}

impl Dataset {
    /// Loads a Latin-1 encoded CSV ledger with a header row.
    pub fn from_csv_reader<R: Read>(reader: R, config: &AnalyticsConfig) -> Result<Dataset> {
        config.validate()?;

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns: Vec<String> = reader.byte_headers()?.iter().map(decode_field).collect();
        let typed = TypedColumns::resolve(&columns);

        let mut records = Vec::new();
        let mut unknown_dates = 0usize;

        for (idx, result) in reader.byte_records().enumerate() {
            // header is line 1
            let line = idx + 2;
            let raw = result?;

            let mut cells: Vec<Option<String>> = raw
                .iter()
                .map(|field| Some(decode_field(field)).filter(|s| !s.is_empty()))
                .collect();
            cells.resize(columns.len(), None);

            let mut record = SalesRecord::new(cells);

            if let Some(i) = typed.order_date {
                record.order_date = match record
                    .cell(i)
                    .and_then(|v| parse_order_date(v, &config.date_formats))
                {
                    Some(date) => OrderDate::Known(date),
                    None => {
                        unknown_dates += 1;
                        OrderDate::Unknown
                    }
                };
            }

            record.sales = parse_typed_number(&record, typed.sales, SALES, line)?;
            record.profit = parse_typed_number(&record, typed.profit, PROFIT, line)?;
            record.quantity = parse_typed_number(&record, typed.quantity, QUANTITY, line)?;
            record.discount = parse_typed_number(&record, typed.discount, DISCOUNT, line)?;
            record.customer_name = typed
                .customer_name
                .and_then(|i| record.cell(i))
                .map(str::to_string);
            record.product_name = typed
                .product_name
                .and_then(|i| record.cell(i))
                .map(str::to_string);

            records.push(record);
        }

        if unknown_dates > 0 {
            warn!(
                "{} of {} rows have an unparseable '{}' and will be excluded from date filters",
                unknown_dates,
                records.len(),
                ORDER_DATE
            );
        }

        debug!(
            "Loaded ledger with {} rows and {} columns",
            records.len(),
            columns.len()
        );

        Ok(Dataset::from_parts(columns, records))
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P, config: &AnalyticsConfig) -> Result<Dataset> {
        let file = File::open(path.as_ref())?;
        Self::from_csv_reader(file, config)
    }

    pub fn from_csv_str(text: &str, config: &AnalyticsConfig) -> Result<Dataset> {
        Self::from_csv_reader(text.as_bytes(), config)
    }
}

fn parse_typed_number(
    record: &SalesRecord,
    index: Option<usize>,
    column: &str,
    line: usize,
) -> Result<Option<f64>> {
    match index.and_then(|i| record.cell(i)) {
        Some(value) => parse_number(value, column, line),
        None => Ok(None),
    }
}
