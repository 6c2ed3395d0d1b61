use envelope::{Order, OrderCreateRequest, OrderDetail, OrderQuery, PageResult};

use crate::pipeline::{ApiError, ApiRequest, Pipeline};

/// # Errors
///
/// Propagates the pipeline failure.
pub async fn list(pipeline: &Pipeline, query: &OrderQuery) -> Result<PageResult<Order>, ApiError> {
    pipeline.call(ApiRequest::get("/orders").query(query)).await
}

/// Order joined with customer, car and salesperson.
///
/// # Errors
///
/// Propagates the pipeline failure.
pub async fn get(pipeline: &Pipeline, id: i64) -> Result<OrderDetail, ApiError> {
    pipeline.call(ApiRequest::get(format!("/orders/{id}"))).await
}

/// Creating an order also marks the car as sold on the backend.
///
/// # Errors
///
/// Propagates the pipeline failure; a car that is not in stock arrives as an
/// application error.
pub async fn create(pipeline: &Pipeline, request: &OrderCreateRequest) -> Result<OrderDetail, ApiError> {
    pipeline.call(ApiRequest::post("/orders").json(request)).await
}
