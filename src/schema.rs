use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const ORDER_DATE: &str = "Order Date";
pub const SALES: &str = "Sales";
pub const PROFIT: &str = "Profit";
pub const QUANTITY: &str = "Quantity";
pub const DISCOUNT: &str = "Discount";
pub const CUSTOMER_NAME: &str = "Customer Name";
pub const PRODUCT_NAME: &str = "Product Name";

pub const ALL: &str = "Todos";

fn all_marker() -> String {
    ALL.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KpiQuery {
    #[schemars(description = "Month name in Spanish (e.g. 'febrero'). Omit for the whole ledger.")]
    #[serde(default)]
    pub month: Option<String>,

    #[schemars(description = "Exact 'Customer Name' to filter on, or 'Todos' for every vendor.")]
    #[serde(default = "all_marker")]
    pub vendor: String,

    #[schemars(description = "Exact 'Product Name' to filter on, or 'Todos' for every product.")]
    #[serde(default = "all_marker")]
    pub product: String,
}

impl Default for KpiQuery {
    fn default() -> Self {
        Self {
            month: None,
            vendor: all_marker(),
            product: all_marker(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GroupedQuery {
    #[schemars(description = "Column used to partition the rows (e.g. 'Region', 'Category').")]
    pub field: String,

    #[schemars(description = "Month name in Spanish (e.g. 'marzo'). Omit for the whole ledger.")]
    #[serde(default)]
    pub month: Option<String>,

    #[serde(default = "all_marker")]
    pub vendor: String,

    #[serde(default = "all_marker")]
    pub product: String,
}

impl GroupedQuery {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            month: None,
            vendor: all_marker(),
            product: all_marker(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TrendQuery {
    #[schemars(description = "Calendar year (e.g. 2020)")]
    pub year: i32,

    #[schemars(
        description = "Month name in Spanish (e.g. 'abril'). When present the trend is daily, otherwise monthly."
    )]
    #[serde(default)]
    pub month: Option<String>,

    #[serde(default = "all_marker")]
    pub vendor: String,
}

impl TrendQuery {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            month: None,
            vendor: all_marker(),
        }
    }
}

/// Treats a blank month parameter the same as an absent one.
pub(crate) fn month_param(month: &Option<String>) -> Option<&str> {
    month.as_deref().filter(|m| !m.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct KpiResult {
    pub total_sales: f64,
    pub avg_profit_pct: f64,
    pub sale_count: usize,
    pub avg_sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GroupedRow {
    /// `None` is the group of rows whose grouping cell is empty.
    pub group: Option<String>,
    pub total_sales: f64,
    pub total_quantity: f64,
    pub avg_discount: f64,
    pub total_profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GroupedResponse {
    pub data: Vec<GroupedRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VendorSeries {
    pub vendor: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TrendResult {
    pub labels: Vec<String>,
    pub datasets: Vec<VendorSeries>,
}

impl TrendResult {
    pub fn series(&self, vendor: &str) -> Option<&VendorSeries> {
        self.datasets.iter().find(|s| s.vendor == vendor)
    }
}

#[derive(JsonSchema)]
#[allow(dead_code)]
struct QuerySchemas {
    kpi_query: KpiQuery,
    kpi_result: KpiResult,
    grouped_query: GroupedQuery,
    grouped_response: GroupedResponse,
    trend_query: TrendQuery,
    trend_result: TrendResult,
}

pub fn generate_json_schema() -> schemars::schema::RootSchema {
    schemars::schema_for!(QuerySchemas)
}

pub fn query_schemas_as_json() -> Result<String, serde_json::Error> {
    let schema = generate_json_schema();
    serde_json::to_string_pretty(&schema)
}
