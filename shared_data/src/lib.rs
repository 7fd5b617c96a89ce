use serde::{Deserialize, Serialize};

mod donation_form;
pub use donation_form::{
	read_intent_response,
	DonationForm,
	DonorField,
	DonorInfo,
	SubmissionState,
	SubmitError,
	UnknownAmount
};

/// The amounts (in whole currency units) offered as one-click buttons on the form
pub const PREDEFINED_AMOUNTS: [u32; 6] = [25, 50, 100, 250, 500, 1000];

/// Smallest donation we'll accept, in currency units. Stripe won't create an intent for
/// anything under 50 cents anyways
pub const MIN_AMOUNT: f64 = 0.5;
pub const MIN_AMOUNT_SUBUNITS: i64 = 50;

pub const DEFAULT_CURRENCY: &str = "usd";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DonationType {
	#[default]
	General,
	Building,
	Missions,
	Special
}

impl DonationType {
	pub const ALL: [Self; 4] = [Self::General, Self::Building, Self::Missions, Self::Special];

	/// What gets sent over the wire and stored in the payment intent's metadata
	#[must_use]
	pub fn id(self) -> &'static str {
		match self {
			Self::General => "general",
			Self::Building => "building",
			Self::Missions => "missions",
			Self::Special => "special"
		}
	}

	#[must_use]
	pub fn title(self) -> &'static str {
		match self {
			Self::General => "General Fund",
			Self::Building => "Building Fund",
			Self::Missions => "Missions & Outreach",
			Self::Special => "Special Offering"
		}
	}

	#[must_use]
	pub fn description(self) -> &'static str {
		match self {
			Self::General => "Support our church operations and ministries",
			Self::Building => "Help us expand and maintain our facilities",
			Self::Missions => "Support our evangelistic and community programs",
			Self::Special => "Contribute to special events and needs"
		}
	}
}

fn default_currency() -> String {
	DEFAULT_CURRENCY.into()
}

fn default_donation_type() -> String {
	DonationType::General.id().into()
}

/// The body of `POST /api/create-payment-intent`.
///
/// The frontend always fills in every field, but the endpoint has to put up with whatever a
/// browser (or curl) decides to send it, so everything but the amount has a default and the
/// amount itself is checked by the handler instead of by serde.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PaymentIntentRequest {
	/// In subunits (cents)
	#[serde(default)]
	pub amount: Option<i64>,
	#[serde(default = "default_currency")]
	pub currency: String,
	#[serde(default = "default_donation_type")]
	pub donation_type: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub donor_email: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub donor_name: Option<String>
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PaymentIntentCreated {
	pub client_secret: String,
	pub payment_intent_id: String
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ErrorBody {
	pub error: String
}

/// Rounds to the nearest cent, which is what the payment provider wants to see
#[must_use]
pub fn to_subunits(amount: f64) -> i64 {
	// `as` saturates on overflow, and nobody is donating 2^63 cents
	(amount * 100.0).round() as i64
}

#[must_use]
pub fn format_amount(amount: f64) -> String {
	format!("${amount:.2}")
}

pub static BASE_STYLE: &str = r#"
* {
	--body-background: #eef2fb;
	--main-text: #1f2937;
	--secondary-text: #4b5563;
	--main-background: #ffffff;
	--accent: #1d4ed8;
	--accent-soft: #dbeafe;
	--border-color: #d1d5db;
	--success-background: #f0fdf4;
	--success-text: #166534;
	--error-background: #fef2f2;
	--error-text: #991b1b;
	font-family: Arial, sans-serif;
	color: var(--main-text);
}
body {
	background-color: var(--body-background);
}
input {
	background-color: var(--main-background);
	border: 1px solid var(--border-color);
	border-radius: 8px;
	padding: 10px 14px;
	font-size: 16px;
}
button {
	background-color: var(--main-background);
	border: 1px solid var(--border-color);
	border-radius: 8px;
	padding: 10px 14px;
	font-size: 16px;
	cursor: pointer;
}
button:disabled {
	cursor: not-allowed;
	opacity: 0.6;
}
"#;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn subunits_round_to_nearest_cent() {
		assert_eq!(to_subunits(25.0), 2500);
		assert_eq!(to_subunits(0.5), 50);
		assert_eq!(to_subunits(10.999), 1100);
		assert_eq!(to_subunits(19.994), 1999);
		assert_eq!(to_subunits(0.0), 0);
	}

	#[test]
	fn amounts_format_with_two_decimals() {
		assert_eq!(format_amount(25.0), "$25.00");
		assert_eq!(format_amount(0.5), "$0.50");
		assert_eq!(format_amount(1234.567), "$1234.57");
	}

	#[test]
	fn donation_type_ids_match_serde() {
		for kind in DonationType::ALL {
			let json = serde_json::to_string(&kind).unwrap();
			assert_eq!(json, format!("\"{}\"", kind.id()));
		}
	}

	#[test]
	fn request_fills_in_defaults() {
		let req: PaymentIntentRequest = serde_json::from_str(r#"{"amount": 2500}"#).unwrap();

		assert_eq!(req.amount, Some(2500));
		assert_eq!(req.currency, "usd");
		assert_eq!(req.donation_type, "general");
		assert_eq!(req.donor_email, None);
		assert_eq!(req.donor_name, None);
	}

	#[test]
	fn request_without_amount_still_parses() {
		// the handler is the one that gets to complain about this, not serde
		let req: PaymentIntentRequest = serde_json::from_str(r#"{"donation_type": "missions"}"#).unwrap();
		assert_eq!(req.amount, None);
		assert_eq!(req.donation_type, "missions");
	}
}
