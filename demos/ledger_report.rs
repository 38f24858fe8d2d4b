use sales_analytics::*;

const LEDGER: &str = "\
Order Date,Customer Name,Product Name,Region,Sales,Quantity,Discount,Profit
1/4/2020,Acme,Chair,West,120.5,2,0.1,18.2
1/17/2020,Beta,Desk,East,410,1,0,96.3
2/3/2020,Acme,Desk,West,399.99,1,0.2,-12.4
2/29/2020,Gamma,Lamp,Central,35.2,4,0,9.9
3/11/2020,Beta,Chair,East,240,4,0.15,31
";

fn main() -> Result<()> {
    let dataset = Dataset::from_csv_str(LEDGER, &AnalyticsConfig::default())?;

    let january = kpis(&dataset, Some("enero"), "Todos", "Todos")?;
    println!(
        "January: {:.2} in sales over {} orders (avg {:.2}, margin {:.1}%)",
        january.total_sales,
        january.sale_count,
        january.avg_sales,
        january.avg_profit_pct * 100.0
    );

    println!("Sales by region:");
    for row in grouped(&dataset, "Region", None, "Todos", "Todos")? {
        println!(
            " - {:<10} sales {:>8.2}  qty {:>3}  discount {:.2}  profit {:>7.2}",
            row.group.as_deref().unwrap_or("(none)"),
            row.total_sales,
            row.total_quantity,
            row.avg_discount,
            row.total_profit
        );
    }

    let monthly = trend(&dataset, 2020, None, "Todos")?;
    println!("Monthly trend ({} periods):", monthly.labels.len());
    for series in &monthly.datasets {
        println!(" - {}: {:?}", series.vendor, &series.values[..3]);
    }

    let february = trend(&dataset, 2020, Some("febrero"), "Todos")?;
    println!(
        "February has {} daily points, last label {}",
        february.labels.len(),
        february.labels.last().map(String::as_str).unwrap_or("-")
    );

    Ok(())
}
