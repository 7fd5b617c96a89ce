use std::future::Future;

use serde::Deserialize;
use thiserror::Error;

use crate::config::SecretKey;

#[derive(Debug, Error)]
pub enum ProviderError {
	/// Stripe answered, but not with a 2xx. Holds whatever body it sent back.
	#[error("Stripe API error: {0}")]
	Api(String),
	#[error("Couldn't reach Stripe: {0}")]
	Transport(#[from] reqwest::Error),
	/// Stripe said yes, but the body wasn't a payment intent we could read
	#[error("Couldn't decode Stripe's response: {0}")]
	Decode(serde_json::Error),
	#[error("Stripe created payment intent {0} but didn't return a client secret")]
	MissingClientSecret(String)
}

/// Everything that goes into a single "create payment intent" call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentParams {
	pub amount: i64,
	pub currency: String,
	pub donation_type: String,
	pub organization: String,
	pub donor_email: Option<String>,
	pub donor_name: Option<String>
}

impl IntentParams {
	/// The form-encoded body Stripe expects. Donor details that are missing (or empty, which is
	/// what the form sends when they're left blank) are left out of the metadata entirely.
	#[must_use]
	pub fn form_fields(&self) -> Vec<(&'static str, String)> {
		let mut fields = vec![
			("amount", self.amount.to_string()),
			("currency", self.currency.clone()),
			("automatic_payment_methods[enabled]", "true".into()),
			("metadata[donation_type]", self.donation_type.clone()),
			("metadata[church]", self.organization.clone()),
		];

		let present = |v: &Option<String>| v.as_ref().filter(|v| !v.is_empty()).cloned();

		if let Some(email) = present(&self.donor_email) {
			fields.push(("metadata[donor_email]", email));
		}
		if let Some(name) = present(&self.donor_name) {
			fields.push(("metadata[donor_name]", name));
		}

		fields
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIntent {
	pub id: String,
	pub client_secret: String
}

/// Something that can turn [`IntentParams`] into a payment intent. In production that's
/// [`StripeClient`]; the tests swap in something that doesn't need the network.
pub trait PaymentProvider: Send + Sync + 'static {
	fn create_payment_intent(
		&self,
		params: &IntentParams
	) -> impl Future<Output = Result<CreatedIntent, ProviderError>> + Send;
}

// The bits of Stripe's PaymentIntent object we care about
#[derive(Deserialize)]
struct StripePaymentIntent {
	id: String,
	client_secret: Option<String>
}

#[derive(Debug, Clone)]
pub struct StripeClient {
	http: reqwest::Client,
	secret_key: SecretKey,
	api_base: String
}

impl StripeClient {
	pub fn new(secret_key: SecretKey, api_base: impl Into<String>) -> Self {
		Self {
			http: reqwest::Client::new(),
			secret_key,
			api_base: api_base.into()
		}
	}

	fn payment_intents_url(&self) -> String {
		format!("{}/v1/payment_intents", self.api_base)
	}
}

impl PaymentProvider for StripeClient {
	async fn create_payment_intent(&self, params: &IntentParams) -> Result<CreatedIntent, ProviderError> {
		tracing::debug!(
			amount = params.amount,
			currency = %params.currency,
			donation_type = %params.donation_type,
			"Creating payment intent"
		);

		let res = self.http
			.post(self.payment_intents_url())
			.bearer_auth(self.secret_key.expose())
			.form(&params.form_fields())
			.send()
			.await?;

		let status = res.status();
		if !status.is_success() {
			let body = res.text().await?;
			tracing::warn!(%status, "Stripe refused to create payment intent");
			return Err(ProviderError::Api(body));
		}

		let body = res.bytes().await?;
		let intent = serde_json::from_slice::<StripePaymentIntent>(&body)
			.map_err(ProviderError::Decode)?;
		let client_secret = intent.client_secret
			.ok_or_else(|| ProviderError::MissingClientSecret(intent.id.clone()))?;

		tracing::info!(payment_intent_id = %intent.id, "Created payment intent");

		Ok(CreatedIntent { id: intent.id, client_secret })
	}
}
