use envelope::{DashboardData, MonthlySalesTrend, SalesStatistics};

use crate::pipeline::{ApiError, ApiRequest, Pipeline};

/// # Errors
///
/// Propagates the pipeline failure.
pub async fn dashboard(pipeline: &Pipeline) -> Result<DashboardData, ApiError> {
    pipeline.call(ApiRequest::get("/statistics/dashboard")).await
}

/// Sales grouped by brand and model, optionally for one brand.
///
/// # Errors
///
/// Propagates the pipeline failure.
pub async fn sales(pipeline: &Pipeline, brand: Option<&str>) -> Result<Vec<SalesStatistics>, ApiError> {
    let mut request = ApiRequest::get("/statistics/sales");
    if let Some(brand) = brand {
        request = request.param("brand", brand);
    }
    pipeline.call(request).await
}

/// Monthly totals between two `YYYY-MM` months, inclusive.
///
/// # Errors
///
/// Propagates the pipeline failure.
pub async fn trend(
    pipeline: &Pipeline,
    start_month: Option<&str>,
    end_month: Option<&str>,
) -> Result<Vec<MonthlySalesTrend>, ApiError> {
    let mut request = ApiRequest::get("/statistics/trend");
    if let Some(start) = start_month {
        request = request.param("startMonth", start);
    }
    if let Some(end) = end_month {
        request = request.param("endMonth", end);
    }
    pipeline.call(request).await
}
