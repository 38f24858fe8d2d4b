use crate::dataset::View;
use crate::error::Result;
use crate::schema::{KpiResult, PROFIT, SALES};
use log::debug;

/// Reduces a view to its four headline metrics.
///
/// `avg_profit_pct` is the mean of the per-row `Profit / Sales` ratios, not
/// the ratio of the totals. Rows whose `Sales` is zero or missing, or whose
/// `Profit` is missing, have no ratio and are left out of that mean. An
/// empty view yields all zeros.
pub fn aggregate_kpis(view: &View<'_>) -> Result<KpiResult> {
    view.require_columns(&[SALES, PROFIT])?;

    let sale_count = view.len();
    let mut total_sales = 0.0;
    let mut present_sales = 0usize;
    let mut ratio_sum = 0.0;
    let mut ratio_count = 0usize;

    for record in view.iter() {
        if let Some(sales) = record.sales {
            total_sales += sales;
            present_sales += 1;

            if let Some(profit) = record.profit {
                if sales != 0.0 {
                    ratio_sum += profit / sales;
                    ratio_count += 1;
                }
            }
        }
    }

    let avg_sales = if present_sales > 0 {
        total_sales / present_sales as f64
    } else {
        0.0
    };

    let avg_profit_pct = if total_sales != 0.0 && ratio_count > 0 {
        ratio_sum / ratio_count as f64
    } else {
        0.0
    };

    debug!(
        "KPIs over {} rows: total_sales={}, avg_profit_pct={}",
        sale_count, total_sales, avg_profit_pct
    );

    Ok(KpiResult {
        total_sales,
        avg_profit_pct,
        sale_count,
        avg_sales,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyticsConfig;
    use crate::dataset::Dataset;
    use crate::error::AnalyticsError;

    fn load(csv: &str) -> Dataset {
        Dataset::from_csv_str(csv, &AnalyticsConfig::default()).unwrap()
    }

    #[test]
    fn test_basic_metrics() {
        let dataset = load(
            "Order Date,Sales,Profit\n\
             2020-01-01,100,20\n\
             2020-01-02,200,40\n\
             2020-02-01,50,-10\n",
        );
        let kpis = aggregate_kpis(&dataset.view()).unwrap();

        assert_eq!(kpis.sale_count, 3);
        assert!((kpis.total_sales - 350.0).abs() < 1e-9);
        assert!((kpis.avg_sales - 350.0 / 3.0).abs() < 1e-9);
        // (0.2 + 0.2 - 0.2) / 3
        assert!((kpis.avg_profit_pct - 0.2 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_mean_of_ratios_differs_from_ratio_of_totals() {
        let dataset = load("Order Date,Sales,Profit\n2020-01-01,100,50\n2020-01-02,900,0\n");
        let kpis = aggregate_kpis(&dataset.view()).unwrap();

        assert!((kpis.avg_profit_pct - 0.25).abs() < 1e-9);
        assert!((kpis.avg_profit_pct - 50.0 / 1000.0).abs() > 0.1);
    }

    #[test]
    fn test_zero_sales_rows_are_skipped_in_ratio() {
        let dataset = load(
            "Order Date,Sales,Profit\n\
             2020-01-01,0,-5\n\
             2020-01-02,100,10\n",
        );
        let kpis = aggregate_kpis(&dataset.view()).unwrap();

        assert_eq!(kpis.sale_count, 2);
        assert!(kpis.avg_profit_pct.is_finite());
        assert!((kpis.avg_profit_pct - 0.1).abs() < 1e-9);
        assert!((kpis.avg_sales - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_total_sales_gives_zero_ratio() {
        let dataset = load("Order Date,Sales,Profit\n2020-01-01,100,10\n2020-01-02,-100,5\n");
        let kpis = aggregate_kpis(&dataset.view()).unwrap();
        assert_eq!(kpis.total_sales, 0.0);
        assert_eq!(kpis.avg_profit_pct, 0.0);
    }

    #[test]
    fn test_infinite_cells_do_not_reach_totals() {
        let dataset = load("Order Date,Sales,Profit\n2020-01-01,inf,1\n2020-01-02,40,4\n");
        let kpis = aggregate_kpis(&dataset.view()).unwrap();
        assert_eq!(kpis.sale_count, 2);
        assert!((kpis.total_sales - 40.0).abs() < 1e-9);
        assert!((kpis.avg_sales - 40.0).abs() < 1e-9);
        assert!((kpis.avg_profit_pct - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_empty_view() {
        let dataset = load("Order Date,Sales,Profit\n");
        let kpis = aggregate_kpis(&dataset.view()).unwrap();
        assert_eq!(
            kpis,
            KpiResult {
                total_sales: 0.0,
                avg_profit_pct: 0.0,
                sale_count: 0,
                avg_sales: 0.0,
            }
        );
    }

    #[test]
    fn test_missing_profit_column() {
        let dataset = load("Order Date,Sales\n2020-01-01,100\n");
        match aggregate_kpis(&dataset.view()) {
            Err(AnalyticsError::MissingColumn(name)) => assert_eq!(name, "Profit"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }
}
