//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{CartError, CheckoutError, DomainError};
use serde_json::json;
use stock_store::StockStoreError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),

    /// Domain logic error.
    Domain(DomainError),

    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::Domain(err) => domain_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg }))
            }
        };

        metrics::counter!("api_errors_total", "status" => status.as_u16().to_string()).increment(1);
        (status, axum::Json(body)).into_response()
    }
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, serde_json::Value) {
    let status = match &err {
        DomainError::Cart(cart_err) => match cart_err {
            CartError::NoKitSelected => StatusCode::BAD_REQUEST,
            CartError::ItemNotFound { .. } => StatusCode::NOT_FOUND,
            CartError::OutOfStock { .. }
            | CartError::ItemStockLimitReached { .. }
            | CartError::KitLimitReached { .. } => StatusCode::CONFLICT,
        },
        DomainError::Checkout(checkout_err) => match checkout_err {
            CheckoutError::KitIncomplete { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            CheckoutError::UnknownKit { .. } => StatusCode::NOT_FOUND,
            CheckoutError::MissingCustomerName
            | CheckoutError::MissingAddress
            | CheckoutError::MissingPickupTime
            | CheckoutError::MissingCep
            | CheckoutError::InvalidCep { .. }
            | CheckoutError::UnknownNeighborhood { .. } => StatusCode::BAD_REQUEST,
        },
        DomainError::StockStore(store_err) => match store_err {
            StockStoreError::InsufficientStock {
                item_id,
                available,
                requested,
            } => {
                return (
                    StatusCode::CONFLICT,
                    json!({
                        "error": err.to_string(),
                        "item_id": item_id,
                        "available": available,
                        "requested": requested,
                    }),
                );
            }
            StockStoreError::InvalidQuantity { .. } => StatusCode::BAD_REQUEST,
            _ => {
                tracing::error!(error = %err, "internal server error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        },
    };

    (status, json!({ "error": err.to_string() }))
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<StockStoreError> for ApiError {
    fn from(err: StockStoreError) -> Self {
        ApiError::Domain(DomainError::StockStore(err))
    }
}

impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        ApiError::Domain(DomainError::Cart(err))
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        ApiError::Domain(DomainError::Checkout(err))
    }
}
