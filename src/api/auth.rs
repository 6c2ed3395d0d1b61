use envelope::{LoginRequest, LoginResponse, User};

use crate::pipeline::{ApiError, ApiRequest, Pipeline};

/// `POST /auth/login`. Does not touch the session; see
/// [`DealerClient::login`](crate::client::DealerClient::login).
///
/// # Errors
///
/// Propagates the pipeline failure; bad credentials arrive as code 1001.
pub async fn login(pipeline: &Pipeline, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
    pipeline.call(ApiRequest::post("/auth/login").json(request)).await
}

/// `POST /auth/logout?username=`. Informational only; the backend keeps no
/// session state.
///
/// # Errors
///
/// Propagates the pipeline failure.
pub async fn logout(pipeline: &Pipeline, username: Option<&str>) -> Result<(), ApiError> {
    let mut request = ApiRequest::post("/auth/logout");
    if let Some(username) = username {
        request = request.param("username", username);
    }
    pipeline.send(request).await.map(drop)
}

/// `GET /auth/info`: the profile behind the current token.
///
/// # Errors
///
/// Propagates the pipeline failure.
pub async fn user_info(pipeline: &Pipeline) -> Result<LoginResponse, ApiError> {
    pipeline.call(ApiRequest::get("/auth/info")).await
}

/// `GET /auth/salespersons`.
///
/// # Errors
///
/// Propagates the pipeline failure.
pub async fn salespersons(pipeline: &Pipeline) -> Result<Vec<User>, ApiError> {
    pipeline.call(ApiRequest::get("/auth/salespersons")).await
}
