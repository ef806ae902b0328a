//! Body and query extractors whose rejections use the JSON error body.
//!
//! Thin wrappers over axum's `Json`, `Form` and `Query`. A malformed
//! request is answered with `{"detail", "status"}` like every other error
//! instead of axum's plain-text rejection.

use axum::extract::rejection::{FormRejection, JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::{Form, Json};

use crate::error::HttpError;

/// JSON request body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// URL-encoded form body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiForm<T>(pub T);

impl<S, T> FromRequest<S> for ApiForm<T>
where
    Form<T>: FromRequest<S, Rejection = FormRejection>,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Query string.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    Query<T>: FromRequestParts<S, Rejection = QueryRejection>,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{self, StatusCode, header};
    use axum::response::IntoResponse;
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use serde_json::Value;

    #[derive(Debug, Deserialize)]
    struct Strength {
        lut_strength: f64,
    }

    async fn detail(err: HttpError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn query_rejection_is_json() {
        let (mut parts, ()) = http::Request::builder()
            .uri("/x?lut_strength=bright")
            .body(())
            .unwrap()
            .into_parts();
        let err = ApiQuery::<Strength>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        let (status, body) = detail(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);
        assert!(body["detail"].as_str().unwrap().contains("query string"));
    }

    #[tokio::test]
    async fn json_shape_mismatch_is_unprocessable() {
        let req = http::Request::builder()
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("[1, 2]"))
            .unwrap();
        let err = ApiJson::<Strength>::from_request(req, &()).await.unwrap_err();
        let (status, body) = detail(err).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn valid_query_passes_through() {
        let (mut parts, ()) = http::Request::builder()
            .uri("/x?lut_strength=0.5")
            .body(())
            .unwrap()
            .into_parts();
        let ApiQuery(query) = ApiQuery::<Strength>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!((query.lut_strength - 0.5).abs() < f64::EPSILON);
    }
}
