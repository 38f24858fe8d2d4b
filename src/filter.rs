use crate::dataset::{Dataset, SalesRecord, View};
use crate::error::Result;
use crate::schema::{CUSTOMER_NAME, ORDER_DATE, PRODUCT_NAME};
use chrono::Datelike;
use log::debug;

/// A conjunction of optional row predicates. An unset predicate matches
/// every row; vendor/product sentinels are resolved by the caller, so a
/// `Some` here is always a literal value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFilter {
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub vendor: Option<String>,
    pub product: Option<String>,
}

impl RowFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }

    pub fn product(mut self, product: impl Into<String>) -> Self {
        self.product = Some(product.into());
        self
    }

    pub fn is_date_scoped(&self) -> bool {
        self.month.is_some() || self.year.is_some()
    }

    /// Checks that every column an active predicate reads exists.
    pub fn validate(&self, dataset: &Dataset) -> Result<()> {
        if self.is_date_scoped() {
            dataset.require_column(ORDER_DATE)?;
        }
        if self.vendor.is_some() {
            dataset.require_column(CUSTOMER_NAME)?;
        }
        if self.product.is_some() {
            dataset.require_column(PRODUCT_NAME)?;
        }
        Ok(())
    }

    pub fn matches(&self, record: &SalesRecord) -> bool {
        if self.is_date_scoped() {
            // unknown dates never satisfy a date predicate
            let Some(date) = record.order_date.date() else {
                return false;
            };
            if self.month.is_some_and(|m| date.month() != m) {
                return false;
            }
            if self.year.is_some_and(|y| date.year() != y) {
                return false;
            }
        }

        if let Some(vendor) = &self.vendor {
            if record.customer_name.as_deref() != Some(vendor.as_str()) {
                return false;
            }
        }

        if let Some(product) = &self.product {
            if record.product_name.as_deref() != Some(product.as_str()) {
                return false;
            }
        }

        true
    }

    pub fn apply<'a>(&self, dataset: &'a Dataset) -> Result<View<'a>> {
        self.apply_to(&dataset.view())
    }

    /// Narrows an existing view. The source rows are never touched.
    pub fn apply_to<'a>(&self, view: &View<'a>) -> Result<View<'a>> {
        self.validate(view.dataset())?;

        let rows: Vec<&'a SalesRecord> = view.iter().filter(|r| self.matches(r)).collect();

        debug!(
            "Filter {:?} kept {} of {} rows",
            self,
            rows.len(),
            view.len()
        );

        Ok(View::new(view.dataset(), rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyticsConfig;
    use crate::error::AnalyticsError;

    fn ledger() -> Dataset {
        let csv = "Order Date,Customer Name,Product Name,Sales\n\
                   2020-01-05,Acme,Chair,100\n\
                   2020-02-10,Acme,Desk,50\n\
                   2020-01-20,Beta,Chair,200\n\
                   2021-01-03,Beta,Desk,75\n\
                   unknown,Acme,Chair,10\n";
        Dataset::from_csv_str(csv, &AnalyticsConfig::default()).unwrap()
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let dataset = ledger();
        let view = RowFilter::new().apply(&dataset).unwrap();
        assert_eq!(view.len(), 5);
    }

    #[test]
    fn test_month_excludes_unknown_dates() {
        let dataset = ledger();
        let view = RowFilter::new().month(1).apply(&dataset).unwrap();
        assert_eq!(view.len(), 3);
        assert!(view.iter().all(|r| r.order_date.month() == Some(1)));
    }

    #[test]
    fn test_conjunction() {
        let dataset = ledger();
        let view = RowFilter::new()
            .month(1)
            .year(2020)
            .vendor("Acme")
            .product("Chair")
            .apply(&dataset)
            .unwrap();
        assert_eq!(view.len(), 1);
        assert_eq!(view.rows()[0].sales, Some(100.0));
    }

    #[test]
    fn test_vendor_match_is_exact() {
        let dataset = ledger();
        let view = RowFilter::new().vendor("acme").apply(&dataset).unwrap();
        assert!(view.is_empty());
    }

    #[test]
    fn test_order_independent_and_idempotent() {
        let dataset = ledger();
        let by_year = RowFilter::new().year(2020).apply(&dataset).unwrap();
        let year_then_vendor = RowFilter::new().vendor("Acme").apply_to(&by_year).unwrap();

        let by_vendor = RowFilter::new().vendor("Acme").apply(&dataset).unwrap();
        let vendor_then_year = RowFilter::new().year(2020).apply_to(&by_vendor).unwrap();
        assert!(year_then_vendor.same_rows(&vendor_then_year));

        let filter = RowFilter::new().month(1).vendor("Beta");
        let once = filter.apply(&dataset).unwrap();
        let twice = filter.apply_to(&once).unwrap();
        assert!(once.same_rows(&twice));
    }

    #[test]
    fn test_missing_columns() {
        let dataset =
            Dataset::from_csv_str("Sales,Customer Name\n1,Acme\n", &AnalyticsConfig::default())
                .unwrap();

        match RowFilter::new().month(3).apply(&dataset) {
            Err(AnalyticsError::MissingColumn(name)) => assert_eq!(name, "Order Date"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
        match RowFilter::new().product("Chair").apply(&dataset) {
            Err(AnalyticsError::MissingColumn(name)) => assert_eq!(name, "Product Name"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
        assert_eq!(RowFilter::new().vendor("Acme").apply(&dataset).unwrap().len(), 1);
    }
}
