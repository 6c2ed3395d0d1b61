//! Resource records exchanged with the backend.
//!
//! Field names follow the backend's camelCase JSON. Response records are
//! lenient about number encoding; request bodies and query structs skip
//! unset optional fields so the backend applies its own defaults.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::flex;

// =============================================================================
// USERS & AUTH
// =============================================================================

/// Role of an authenticated staff member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Salesperson,
}

/// Profile of the authenticated staff member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "flex::i64")]
    pub id: i64,
    pub username: String,
    #[serde(default, deserialize_with = "flex::null_as_empty")]
    pub real_name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl User {
    /// Whether this user holds the `ADMIN` role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Name to show in UI chrome: real name, else username.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.real_name.is_empty() { &self.username } else { &self.real_name }
    }
}

/// Body of `POST /auth/login`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Payload of `POST /auth/login` and `GET /auth/info`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_info: User,
}

// =============================================================================
// PAGING
// =============================================================================

/// One page of a list endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T> {
    #[serde(default = "Vec::new")]
    pub records: Vec<T>,
    #[serde(deserialize_with = "flex::i64")]
    pub total: i64,
    #[serde(deserialize_with = "flex::i64")]
    pub size: i64,
    #[serde(deserialize_with = "flex::i64")]
    pub current: i64,
    #[serde(default, deserialize_with = "flex::i64")]
    pub pages: i64,
}

// =============================================================================
// CARS
// =============================================================================

/// Inventory status of a car.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum CarStatus {
    InStock,
    Locked,
    Sold,
}

impl CarStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::InStock => "in stock",
            Self::Locked => "locked",
            Self::Sold => "sold",
        }
    }
}

impl TryFrom<i64> for CarStatus {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::InStock),
            1 => Ok(Self::Locked),
            2 => Ok(Self::Sold),
            other => Err(format!("invalid car status: {other}")),
        }
    }
}

impl From<CarStatus> for i64 {
    fn from(status: CarStatus) -> Self {
        match status {
            CarStatus::InStock => 0,
            CarStatus::Locked => 1,
            CarStatus::Sold => 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    #[serde(deserialize_with = "flex::i64")]
    pub id: i64,
    pub vin: String,
    pub brand: String,
    pub model: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(deserialize_with = "flex::f64")]
    pub price: f64,
    pub status: CarStatus,
    #[serde(default)]
    pub purchase_date: Option<String>,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub update_time: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarCreateRequest {
    pub vin: String,
    pub brand: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<String>,
}

/// Partial update; unset fields are left unchanged by the backend.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarQuery {
    pub page_num: u32,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CarStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
}

impl Default for CarQuery {
    fn default() -> Self {
        Self { page_num: 1, page_size: 10, brand: None, status: None, min_price: None, max_price: None }
    }
}

// =============================================================================
// CUSTOMERS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(deserialize_with = "flex::i64")]
    pub id: i64,
    pub name: String,
    pub phone: String,
    #[serde(default, deserialize_with = "flex::null_as_empty")]
    pub id_card: String,
    /// `"M"` or `"F"` when known.
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub update_time: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCreateRequest {
    pub name: String,
    pub phone: String,
    pub id_card: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_card: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerQuery {
    pub page_num: u32,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Default for CustomerQuery {
    fn default() -> Self {
        Self { page_num: 1, page_size: 10, name: None, phone: None }
    }
}

// =============================================================================
// ORDERS
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum OrderStatus {
    Completed,
    Cancelled,
}

impl OrderStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl TryFrom<i64> for OrderStatus {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Completed),
            2 => Ok(Self::Cancelled),
            other => Err(format!("invalid order status: {other}")),
        }
    }
}

impl From<OrderStatus> for i64 {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Completed => 1,
            OrderStatus::Cancelled => 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(deserialize_with = "flex::i64")]
    pub id: i64,
    pub order_no: String,
    #[serde(deserialize_with = "flex::i64")]
    pub sales_user_id: i64,
    #[serde(deserialize_with = "flex::i64")]
    pub customer_id: i64,
    #[serde(deserialize_with = "flex::i64")]
    pub car_id: i64,
    #[serde(deserialize_with = "flex::f64")]
    pub original_price: f64,
    #[serde(deserialize_with = "flex::f64")]
    pub actual_price: f64,
    #[serde(deserialize_with = "flex::f64")]
    pub discount_amount: f64,
    pub order_date: String,
    pub status: OrderStatus,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub update_time: Option<String>,
}

/// Order joined with its salesperson, customer and car.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(deserialize_with = "flex::i64")]
    pub id: i64,
    pub order_no: String,
    #[serde(deserialize_with = "flex::f64")]
    pub original_price: f64,
    #[serde(deserialize_with = "flex::f64")]
    pub actual_price: f64,
    #[serde(deserialize_with = "flex::f64")]
    pub discount_amount: f64,
    pub order_date: String,
    pub status: OrderStatus,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub update_time: Option<String>,
    #[serde(deserialize_with = "flex::i64")]
    pub sales_user_id: i64,
    #[serde(default, deserialize_with = "flex::null_as_empty")]
    pub sales_user_name: String,
    #[serde(default)]
    pub sales_user_phone: Option<String>,
    #[serde(deserialize_with = "flex::i64")]
    pub customer_id: i64,
    #[serde(default, deserialize_with = "flex::null_as_empty")]
    pub customer_name: String,
    #[serde(default, deserialize_with = "flex::null_as_empty")]
    pub customer_phone: String,
    #[serde(default)]
    pub customer_id_card: Option<String>,
    #[serde(deserialize_with = "flex::i64")]
    pub car_id: i64,
    #[serde(default, deserialize_with = "flex::null_as_empty")]
    pub car_vin: String,
    #[serde(default, deserialize_with = "flex::null_as_empty")]
    pub car_brand: String,
    #[serde(default, deserialize_with = "flex::null_as_empty")]
    pub car_model: String,
    #[serde(default)]
    pub car_color: Option<String>,
    #[serde(default)]
    pub car_year: Option<i32>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreateRequest {
    pub customer_id: i64,
    pub car_id: i64,
    pub original_price: f64,
    pub discount_amount: f64,
    pub actual_price: f64,
    /// `YYYY-MM-DD`.
    pub order_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuery {
    pub page_num: u32,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales_user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
}

impl Default for OrderQuery {
    fn default() -> Self {
        Self { page_num: 1, page_size: 10, start_date: None, end_date: None, sales_user_id: None, status: None }
    }
}

// =============================================================================
// STATISTICS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandCount {
    pub brand: String,
    #[serde(deserialize_with = "flex::i64")]
    pub count: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPoint {
    pub month: String,
    #[serde(deserialize_with = "flex::i64")]
    pub sales: i64,
}

/// Payload of `GET /statistics/dashboard`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    #[serde(deserialize_with = "flex::i64")]
    pub total_cars: i64,
    #[serde(deserialize_with = "flex::i64")]
    pub available_cars: i64,
    #[serde(deserialize_with = "flex::i64")]
    pub sold_cars: i64,
    #[serde(deserialize_with = "flex::i64")]
    pub total_orders: i64,
    #[serde(default)]
    pub total_revenue: Option<f64>,
    #[serde(default)]
    pub brand_distribution: Vec<BrandCount>,
    #[serde(default)]
    pub monthly_trend: Vec<MonthlyPoint>,
}

/// Row of `GET /statistics/sales`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesStatistics {
    pub brand: String,
    pub model: String,
    #[serde(deserialize_with = "flex::i64")]
    pub sales_count: i64,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub avg_price: Option<f64>,
    #[serde(default)]
    pub first_sale_date: Option<String>,
    #[serde(default)]
    pub last_sale_date: Option<String>,
    #[serde(default, deserialize_with = "flex::opt_i64")]
    pub salesperson_id: Option<i64>,
    #[serde(default)]
    pub salesperson_name: Option<String>,
}

/// Row of `GET /statistics/trend`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySalesTrend {
    pub month: String,
    #[serde(deserialize_with = "flex::i64")]
    pub sales_count: i64,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub avg_price: Option<f64>,
    #[serde(default, deserialize_with = "flex::opt_i64")]
    pub active_salesperson_count: Option<i64>,
}

#[cfg(test)]
#[path = "records_test.rs"]
mod tests;
