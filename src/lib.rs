//! # Sales Analytics
//!
//! A query engine over a single sales ledger: headline KPIs, grouped
//! aggregates by any column, and per-vendor sales trends by month or day.
//!
//! ## Core Concepts
//!
//! - **Dataset**: an immutable ledger loaded once per query (see [`Dataset::from_csv_reader`])
//! - **View**: a filtered, read-only subset of a dataset's rows
//! - **Sentinel**: `"Todos"` (or `"All"`) as a vendor/product parameter means "no filter"
//! - **Dense series**: trend values cover every period in range, zero-filled
//!
//! Every query runs in the same order: the month name (if any) is resolved,
//! the ledger is filtered, then exactly one aggregator reduces the view.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sales_analytics::*;
//!
//! let config = AnalyticsConfig::default();
//! let dataset = Dataset::from_csv_path("stores_sales_forecasting.csv", &config)?;
//!
//! let kpis = kpis(&dataset, Some("enero"), "Todos", "Todos")?;
//! println!("January sales: {:.2} over {} orders", kpis.total_sales, kpis.sale_count);
//!
//! let trend = trend(&dataset, 2020, None, "Todos")?;
//! assert_eq!(trend.labels.len(), 12);
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod grouping;
pub mod ingestion;
pub mod kpi;
pub mod months;
pub mod schema;
pub mod trend;
pub mod utils;

pub use config::AnalyticsConfig;
pub use dataset::{Dataset, OrderDate, SalesRecord, View};
pub use error::{AnalyticsError, Result};
pub use filter::RowFilter;
pub use grouping::aggregate_grouped;
pub use kpi::aggregate_kpis;
pub use months::resolve_month;
pub use schema::*;
pub use trend::{build_trend, Granularity};

use log::info;
use schema::month_param;

#[derive(Debug, Clone, Default)]
pub struct SalesAnalytics {
    config: AnalyticsConfig,
}

impl SalesAnalytics {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn resolve_month(&self, name: &str) -> Result<u32> {
        resolve_month(name)
    }

    pub fn kpis(&self, dataset: &Dataset, query: &KpiQuery) -> Result<KpiResult> {
        info!(
            "KPI query: month={:?}, vendor={}, product={}",
            query.month, query.vendor, query.product
        );

        let filter = self.build_filter(
            dataset,
            month_param(&query.month),
            &query.vendor,
            Some(&query.product),
        )?;
        let view = filter.apply(dataset)?;

        aggregate_kpis(&view)
    }

    pub fn grouped(&self, dataset: &Dataset, query: &GroupedQuery) -> Result<GroupedResponse> {
        info!(
            "Grouped query: field={}, month={:?}, vendor={}, product={}",
            query.field, query.month, query.vendor, query.product
        );

        let filter = self.build_filter(
            dataset,
            month_param(&query.month),
            &query.vendor,
            Some(&query.product),
        )?;
        let view = filter.apply(dataset)?;

        let data = aggregate_grouped(&view, &query.field)?;
        Ok(GroupedResponse { data })
    }

    pub fn trend(&self, dataset: &Dataset, query: &TrendQuery) -> Result<TrendResult> {
        info!(
            "Trend query: year={}, month={:?}, vendor={}",
            query.year, query.month, query.vendor
        );

        let month = month_param(&query.month);
        let filter = self
            .build_filter(dataset, month, &query.vendor, None)?
            .year(query.year);
        let view = filter.apply(dataset)?;

        let granularity = match (filter.month, month) {
            (Some(number), Some(label)) => Granularity::Daily {
                month: number,
                label,
            },
            _ => Granularity::Monthly,
        };

        build_trend(&view, query.year, granularity)
    }

    /// Resolves query parameters into a filter, failing in a fixed order:
    /// missing `Order Date`, then an unknown month name.
    fn build_filter(
        &self,
        dataset: &Dataset,
        month: Option<&str>,
        vendor: &str,
        product: Option<&str>,
    ) -> Result<RowFilter> {
        dataset.require_column(ORDER_DATE)?;

        let mut filter = RowFilter::new();
        if let Some(name) = month {
            filter = filter.month(resolve_month(name)?);
        }
        if let Some(vendor) = self.config.selection(vendor) {
            filter = filter.vendor(vendor);
        }
        if let Some(product) = product.and_then(|p| self.config.selection(p)) {
            filter = filter.product(product);
        }

        Ok(filter)
    }
}

/// KPIs for the ledger, optionally narrowed to a month, vendor and product.
pub fn kpis(
    dataset: &Dataset,
    month: Option<&str>,
    vendor: &str,
    product: &str,
) -> Result<KpiResult> {
    let query = KpiQuery {
        month: month.map(str::to_string),
        vendor: vendor.to_string(),
        product: product.to_string(),
    };
    SalesAnalytics::default().kpis(dataset, &query)
}

/// Per-group totals for `field`, sorted by total sales descending.
pub fn grouped(
    dataset: &Dataset,
    field: &str,
    month: Option<&str>,
    vendor: &str,
    product: &str,
) -> Result<Vec<GroupedRow>> {
    let query = GroupedQuery {
        field: field.to_string(),
        month: month.map(str::to_string),
        vendor: vendor.to_string(),
        product: product.to_string(),
    };
    SalesAnalytics::default()
        .grouped(dataset, &query)
        .map(|response| response.data)
}

/// Per-vendor sales for `year`, daily when `month` is given, monthly otherwise.
pub fn trend(
    dataset: &Dataset,
    year: i32,
    month: Option<&str>,
    vendor: &str,
) -> Result<TrendResult> {
    let query = TrendQuery {
        year,
        month: month.map(str::to_string),
        vendor: vendor.to_string(),
    };
    SalesAnalytics::default().trend(dataset, &query)
}
