use crate::dataset::View;
use crate::error::{AnalyticsError, Result};
use crate::schema::{GroupedRow, DISCOUNT, PROFIT, QUANTITY, SALES};
use log::debug;
use std::collections::HashMap;

#[derive(Default)]
struct GroupTotals {
    sales: f64,
    quantity: f64,
    discount_sum: f64,
    discount_count: usize,
    profit: f64,
}

impl GroupTotals {
    fn into_row(self, group: Option<String>) -> GroupedRow {
        let avg_discount = if self.discount_count > 0 {
            self.discount_sum / self.discount_count as f64
        } else {
            0.0
        };

        GroupedRow {
            group,
            total_sales: self.sales,
            total_quantity: self.quantity,
            avg_discount,
            total_profit: self.profit,
        }
    }
}

/// Partitions a view by the exact text of `field` and totals each partition.
///
/// Rows with an empty `field` cell form their own `None` group. The output
/// is sorted by `total_sales` descending; the sort is stable, so ties keep
/// the order in which their groups were first seen.
pub fn aggregate_grouped(view: &View<'_>, field: &str) -> Result<Vec<GroupedRow>> {
    let dataset = view.dataset();
    let field_index = dataset
        .column_index(field)
        .ok_or_else(|| AnalyticsError::UnknownField(field.to_string()))?;

    view.require_columns(&[SALES, QUANTITY, DISCOUNT, PROFIT])?;

    let mut order: Vec<Option<String>> = Vec::new();
    let mut totals: HashMap<Option<String>, GroupTotals> = HashMap::new();

    for record in view.iter() {
        let key = record.cell(field_index).map(str::to_string);
        let entry = totals.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            GroupTotals::default()
        });

        entry.sales += record.sales.unwrap_or(0.0);
        entry.quantity += record.quantity.unwrap_or(0.0);
        entry.profit += record.profit.unwrap_or(0.0);
        if let Some(discount) = record.discount {
            entry.discount_sum += discount;
            entry.discount_count += 1;
        }
    }

    let mut rows: Vec<GroupedRow> = order
        .into_iter()
        .filter_map(|key| totals.remove(&key).map(|t| t.into_row(key)))
        .collect();

    rows.sort_by(|a, b| b.total_sales.total_cmp(&a.total_sales));

    debug!(
        "Grouped {} rows by '{}' into {} groups",
        view.len(),
        field,
        rows.len()
    );

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyticsConfig;
    use crate::dataset::Dataset;
    use crate::kpi::aggregate_kpis;

    const HEADER: &str = "Order Date,Customer Name,Region,Sales,Quantity,Discount,Profit\n";

    fn load(body: &str) -> Dataset {
        let csv = format!("{}{}", HEADER, body);
        Dataset::from_csv_str(&csv, &AnalyticsConfig::default()).unwrap()
    }

    #[test]
    fn test_groups_sorted_by_sales() {
        let dataset = load(
            "2020-01-01,Acme,West,100,2,0.1,20\n\
             2020-02-01,Acme,East,50,1,0.3,-10\n\
             2020-01-15,Beta,West,200,4,0.0,40\n",
        );
        let rows = aggregate_grouped(&dataset.view(), "Customer Name").unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].group.as_deref(), Some("Beta"));
        assert!((rows[0].total_sales - 200.0).abs() < 1e-9);
        assert_eq!(rows[1].group.as_deref(), Some("Acme"));
        assert!((rows[1].total_sales - 150.0).abs() < 1e-9);
        assert!((rows[1].total_quantity - 3.0).abs() < 1e-9);
        assert!((rows[1].avg_discount - 0.2).abs() < 1e-9);
        assert!((rows[1].total_profit - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_values_form_their_own_group() {
        let dataset = load(
            "2020-01-01,Acme,,30,1,0.5,3\n\
             2020-01-02,Acme,West,10,1,,1\n\
             2020-01-03,Beta,,5,1,0.1,1\n",
        );
        let rows = aggregate_grouped(&dataset.view(), "Region").unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].group, None);
        assert!((rows[0].total_sales - 35.0).abs() < 1e-9);
        assert!((rows[0].avg_discount - 0.3).abs() < 1e-9);
        assert_eq!(rows[1].group.as_deref(), Some("West"));
        assert_eq!(rows[1].avg_discount, 0.0);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let dataset = load(
            "2020-01-01,Zeta,West,10,1,0,1\n\
             2020-01-02,Alpha,West,10,1,0,1\n\
             2020-01-03,Mid,West,20,1,0,1\n",
        );
        let rows = aggregate_grouped(&dataset.view(), "Customer Name").unwrap();
        let groups: Vec<_> = rows.iter().map(|r| r.group.as_deref()).collect();
        assert_eq!(groups, vec![Some("Mid"), Some("Zeta"), Some("Alpha")]);
    }

    #[test]
    fn test_group_totals_match_kpi_total() {
        let dataset = load(
            "2020-01-01,Acme,West,100.5,2,0.1,20\n\
             2020-02-01,Acme,East,49.25,1,0.3,-10\n\
             2020-01-15,Beta,,200,4,0.0,40\n\
             2020-03-15,Gamma,East,0,1,0.0,0\n",
        );
        let view = dataset.view();
        let grouped_total: f64 = aggregate_grouped(&view, "Region")
            .unwrap()
            .iter()
            .map(|r| r.total_sales)
            .sum();
        let kpis = aggregate_kpis(&view).unwrap();
        assert!((grouped_total - kpis.total_sales).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_field() {
        let dataset = load("2020-01-01,Acme,West,1,1,0,1\n");
        match aggregate_grouped(&dataset.view(), "Segment") {
            Err(AnalyticsError::UnknownField(name)) => assert_eq!(name, "Segment"),
            other => panic!("expected UnknownField, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_numeric_column() {
        let csv = "Order Date,Region,Sales,Quantity,Profit\n2020-01-01,West,1,1,1\n";
        let dataset = Dataset::from_csv_str(csv, &AnalyticsConfig::default()).unwrap();
        match aggregate_grouped(&dataset.view(), "Region") {
            Err(AnalyticsError::MissingColumn(name)) => assert_eq!(name, "Discount"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_view_yields_no_groups() {
        let dataset = load("");
        let rows = aggregate_grouped(&dataset.view(), "Region").unwrap();
        assert!(rows.is_empty());
    }
}
