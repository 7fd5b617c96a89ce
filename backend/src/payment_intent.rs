use std::sync::Arc;

use axum::{
	body::Bytes,
	extract::State,
	response::IntoResponse,
	Json
};
use http::{header, HeaderName, StatusCode};
use shared_data::{PaymentIntentCreated, PaymentIntentRequest, MIN_AMOUNT_SUBUNITS};

use crate::{
	config::ConfigError,
	error::DonationError,
	stripe::{IntentParams, PaymentProvider}
};

pub const PAYMENT_INTENT_PATH: &str = "/api/create-payment-intent";

/// Sent with every response from the endpoint, since the form may well be served from a
/// different origin than this
pub const CORS_HEADERS: [(HeaderName, &str); 3] = [
	(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
	(header::ACCESS_CONTROL_ALLOW_HEADERS, "authorization, x-client-info, apikey, content-type"),
	(header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
];

pub struct AppState<P> {
	// `None` if we started up without a secret key
	pub provider: Option<Arc<P>>,
	pub organization: String
}

// can't derive this 'cause derive would want `P: Clone` too
impl<P> Clone for AppState<P> {
	fn clone(&self) -> Self {
		Self {
			provider: self.provider.clone(),
			organization: self.organization.clone()
		}
	}
}

impl<P: PaymentProvider> AppState<P> {
	pub fn new(provider: Option<P>, organization: impl Into<String>) -> Self {
		Self {
			provider: provider.map(Arc::new),
			organization: organization.into()
		}
	}
}

/// Browsers send this before the real POST when the form lives on another origin. Nothing to
/// check here, just tell them it's fine.
pub async fn preflight() -> impl IntoResponse {
	(StatusCode::OK, CORS_HEADERS)
}

pub async fn create_payment_intent<P: PaymentProvider>(
	State(state): State<AppState<P>>,
	body: Bytes
) -> Result<impl IntoResponse, DonationError> {
	let provider = state.provider
		.as_deref()
		.ok_or(ConfigError::MissingSecretKey)?;

	// Not `Json<_>`, since that insists on `Content-Type: application/json` and a cross-origin
	// simple request will come in as `text/plain`
	let req = serde_json::from_slice::<PaymentIntentRequest>(&body)
		.map_err(|e| DonationError::Body(e.to_string()))?;

	let amount = match req.amount {
		Some(amount) if amount >= MIN_AMOUNT_SUBUNITS => amount,
		other => return Err(DonationError::InvalidAmount(other))
	};

	let params = IntentParams {
		amount,
		currency: req.currency,
		donation_type: req.donation_type,
		organization: state.organization.clone(),
		donor_email: req.donor_email,
		donor_name: req.donor_name
	};

	let intent = provider.create_payment_intent(&params).await?;

	Ok((
		StatusCode::OK,
		CORS_HEADERS,
		Json(PaymentIntentCreated {
			client_secret: intent.client_secret,
			payment_intent_id: intent.id
		})
	))
}
