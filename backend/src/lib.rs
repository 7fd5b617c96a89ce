use std::path::Path;

use axum::{routing::post, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};

pub mod config;
pub mod error;
pub mod payment_intent;
pub mod stripe;

pub use payment_intent::{AppState, PAYMENT_INTENT_PATH};
use stripe::PaymentProvider;

/// Just the donation API, with nothing else mounted
pub fn api_router<P: PaymentProvider>(state: AppState<P>) -> Router {
	Router::new()
		.route(
			PAYMENT_INTENT_PATH,
			post(payment_intent::create_payment_intent::<P>)
				.options(payment_intent::preflight)
		)
		.with_state(state)
}

/// The whole site: the API plus (if we've been told where it is) the built frontend, served for
/// every path the API doesn't claim
pub fn app<P: PaymentProvider>(state: AppState<P>, frontend_dir: Option<&Path>) -> Router {
	let router = api_router(state);

	let router = match frontend_dir {
		Some(dir) => router.fallback_service(ServeDir::new(dir)),
		None => router
	};

	router.layer(TraceLayer::new_for_http())
}
