use envelope::{Car, CarCreateRequest, CarQuery, CarUpdateRequest, PageResult};

use crate::pipeline::{ApiError, ApiRequest, Pipeline, RawResponse};

/// # Errors
///
/// Propagates the pipeline failure.
pub async fn list(pipeline: &Pipeline, query: &CarQuery) -> Result<PageResult<Car>, ApiError> {
    pipeline.call(ApiRequest::get("/cars").query(query)).await
}

/// # Errors
///
/// Propagates the pipeline failure.
pub async fn get(pipeline: &Pipeline, id: i64) -> Result<Car, ApiError> {
    pipeline.call(ApiRequest::get(format!("/cars/{id}"))).await
}

/// # Errors
///
/// Propagates the pipeline failure; a duplicate VIN arrives as an
/// application error.
pub async fn create(pipeline: &Pipeline, request: &CarCreateRequest) -> Result<Car, ApiError> {
    pipeline.call(ApiRequest::post("/cars").json(request)).await
}

/// # Errors
///
/// Propagates the pipeline failure.
pub async fn update(pipeline: &Pipeline, id: i64, request: &CarUpdateRequest) -> Result<Car, ApiError> {
    pipeline.call(ApiRequest::put(format!("/cars/{id}")).json(request)).await
}

/// # Errors
///
/// Propagates the pipeline failure.
pub async fn delete(pipeline: &Pipeline, id: i64) -> Result<(), ApiError> {
    pipeline.send(ApiRequest::delete(format!("/cars/{id}"))).await.map(drop)
}

/// `GET /cars/export`: the inventory spreadsheet, filtered like [`list`].
///
/// # Errors
///
/// Propagates the pipeline failure.
pub async fn export(pipeline: &Pipeline, query: &CarQuery) -> Result<RawResponse, ApiError> {
    pipeline.download(ApiRequest::get("/cars/export").query(query)).await
}
