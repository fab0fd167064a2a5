use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Row of the tenant `products` table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub product_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub net_price: Option<f64>,
    pub sale_price: Option<f64>,
    pub quantity: i32,
    pub consignee_id: Option<i32>,
    pub date_added: Option<NaiveDate>,
    pub status: String,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewProduct {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    pub description: Option<String>,

    #[validate(length(max = 50))]
    pub category: Option<String>,

    #[validate(range(min = 0.0))]
    pub net_price: Option<f64>,

    #[validate(range(min = 0.0))]
    pub sale_price: Option<f64>,

    #[serde(default = "default_quantity")]
    #[validate(range(min = 0))]
    pub quantity: i32,

    pub consignee_id: Option<i32>,

    pub date_added: Option<NaiveDate>,

    #[validate(length(min = 1, max = 20))]
    pub status: Option<String>,

    #[validate(length(max = 50))]
    pub brand: Option<String>,

    #[validate(length(max = 20))]
    pub size: Option<String>,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    pub description: Option<String>,

    #[validate(length(max = 50))]
    pub category: Option<String>,

    #[validate(range(min = 0.0))]
    pub net_price: Option<f64>,

    #[validate(range(min = 0.0))]
    pub sale_price: Option<f64>,

    #[validate(range(min = 0))]
    pub quantity: Option<i32>,

    pub consignee_id: Option<i32>,

    pub date_added: Option<NaiveDate>,

    #[validate(length(min = 1, max = 20))]
    pub status: Option<String>,

    #[validate(length(max = 50))]
    pub brand: Option<String>,

    #[validate(length(max = 20))]
    pub size: Option<String>,
}
