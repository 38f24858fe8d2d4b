use crate::dataset::View;
use crate::error::Result;
use crate::schema::{TrendResult, VendorSeries, CUSTOMER_NAME, SALES};
use crate::utils::{day_label, days_in_month, month_label};
use log::debug;
use std::collections::BTreeMap;

/// Period size of a trend series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity<'a> {
    /// One point per calendar month of the year.
    Monthly,
    /// One point per day of `month`. `label` prefixes each day label and is
    /// the month text as the caller supplied it.
    Daily { month: u32, label: &'a str },
}

/// Builds a dense per-vendor sales series from an already filtered view.
///
/// The caller normally scopes the view to `year` (and to the month in daily
/// mode); rows outside that period are skipped here as well. Every series
/// has exactly one value per label, zero where a vendor sold nothing. A
/// vendor with no row inside the period gets no series. Vendors come from the data, in name order; rows without a
/// `Customer Name` belong to no series.
pub fn build_trend(view: &View<'_>, year: i32, granularity: Granularity<'_>) -> Result<TrendResult> {
    view.require_columns(&[CUSTOMER_NAME, SALES])?;

    let labels: Vec<String> = match granularity {
        Granularity::Monthly => (1..=12).map(|m| month_label(year, m)).collect(),
        Granularity::Daily { month, label } => {
            let days = days_in_month(year, month)?;
            (1..=days).map(|d| day_label(label, d)).collect()
        }
    };

    let mut series: BTreeMap<&str, Vec<f64>> = BTreeMap::new();

    for record in view.iter() {
        let Some(vendor) = record.customer_name.as_deref() else {
            continue;
        };

        if record.order_date.year() != Some(year) {
            continue;
        }
        let period = match granularity {
            Granularity::Monthly => record.order_date.month(),
            Granularity::Daily { month, .. } => record
                .order_date
                .month()
                .filter(|m| *m == month)
                .and_then(|_| record.order_date.day()),
        };
        let Some(slot) = period.map(|p| p as usize - 1).filter(|i| *i < labels.len()) else {
            continue;
        };

        let values = series
            .entry(vendor)
            .or_insert_with(|| vec![0.0; labels.len()]);
        values[slot] += record.sales.unwrap_or(0.0);
    }

    debug!(
        "Trend for {} ({:?}) built {} vendor series over {} periods",
        year,
        granularity,
        series.len(),
        labels.len()
    );

    Ok(TrendResult {
        labels,
        datasets: series
            .into_iter()
            .map(|(vendor, values)| VendorSeries {
                vendor: vendor.to_string(),
                values,
            })
            .collect(),
    })
}
