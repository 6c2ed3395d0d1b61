use envelope::{Customer, CustomerCreateRequest, CustomerQuery, CustomerUpdateRequest, PageResult};

use crate::pipeline::{ApiError, ApiRequest, Pipeline};

/// # Errors
///
/// Propagates the pipeline failure.
pub async fn list(pipeline: &Pipeline, query: &CustomerQuery) -> Result<PageResult<Customer>, ApiError> {
    pipeline.call(ApiRequest::get("/customers").query(query)).await
}

/// # Errors
///
/// Propagates the pipeline failure.
pub async fn get(pipeline: &Pipeline, id: i64) -> Result<Customer, ApiError> {
    pipeline.call(ApiRequest::get(format!("/customers/{id}"))).await
}

/// # Errors
///
/// Propagates the pipeline failure.
pub async fn create(pipeline: &Pipeline, request: &CustomerCreateRequest) -> Result<Customer, ApiError> {
    pipeline.call(ApiRequest::post("/customers").json(request)).await
}

/// # Errors
///
/// Propagates the pipeline failure.
pub async fn update(pipeline: &Pipeline, id: i64, request: &CustomerUpdateRequest) -> Result<Customer, ApiError> {
    pipeline.call(ApiRequest::put(format!("/customers/{id}")).json(request)).await
}

/// # Errors
///
/// Propagates the pipeline failure; customers with orders cannot be deleted.
pub async fn delete(pipeline: &Pipeline, id: i64) -> Result<(), ApiError> {
    pipeline.send(ApiRequest::delete(format!("/customers/{id}"))).await.map(drop)
}
