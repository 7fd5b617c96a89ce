use axum::{
	response::{IntoResponse, Response},
	Json
};
use http::StatusCode;
use shared_data::ErrorBody;
use thiserror::Error;

use crate::{config::ConfigError, payment_intent::CORS_HEADERS, stripe::ProviderError};

/// Every way a donation can fail on our end. All of them are reported to the browser the same
/// way: a 400 with `{ "error": "<message>" }`.
#[derive(Debug, Error)]
pub enum DonationError {
	#[error(transparent)]
	Config(#[from] ConfigError),
	#[error("Invalid request body: {0}")]
	Body(String),
	#[error("Invalid amount. Minimum donation is $0.50")]
	InvalidAmount(Option<i64>),
	#[error(transparent)]
	Provider(#[from] ProviderError)
}

impl IntoResponse for DonationError {
	fn into_response(self) -> Response {
		match &self {
			Self::Provider(_) | Self::Config(_) => tracing::error!("Payment intent creation failed: {self}"),
			Self::InvalidAmount(amount) => tracing::warn!(?amount, "Rejected donation: {self}"),
			Self::Body(_) => tracing::warn!("Rejected donation: {self}")
		}

		(
			StatusCode::BAD_REQUEST,
			CORS_HEADERS,
			Json(ErrorBody { error: self.to_string() })
		).into_response()
	}
}
