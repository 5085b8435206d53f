use backoffice_domain::Product;
use serde::Serialize;
use ts_rs::TS;

/// API representation of a catalog product with its derived metrics.
///
/// Monetary and month values are decimal strings with two fractional digits.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/product-response.ts"
)]
pub struct ProductResponse {
    #[ts(type = "number")]
    pub id: i64,
    pub name: String,
    pub category: String,
    #[ts(type = "\"1_week\" | \"1_month\" | \"3_months\" | \"6_months\" | \"12_months\"")]
    pub duration: String,
    pub duration_months: String,
    pub stock: u32,
    pub alert_threshold: u32,
    #[ts(type = "\"out\" | \"low\" | \"high\"")]
    pub stock_status: String,
    pub purchase_cost: String,
    pub margin_percent: String,
    pub sale_price: String,
    pub created_at: String,
}

impl From<Product> for ProductResponse {
    fn from(value: Product) -> Self {
        Self {
            duration: value.duration.as_str().to_owned(),
            duration_months: format!("{:.2}", value.duration_months()),
            stock_status: value.stock_status().as_str().to_owned(),
            purchase_cost: format!("{:.2}", value.purchase_cost),
            margin_percent: format!("{:.2}", value.margin_percent),
            sale_price: format!("{:.2}", value.sale_price()),
            created_at: value.created_at.to_rfc3339(),
            id: value.id,
            name: value.name,
            category: value.category,
            stock: value.stock,
            alert_threshold: value.alert_threshold,
        }
    }
}
