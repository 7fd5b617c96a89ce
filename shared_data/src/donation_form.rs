use crate::{
	DonationType,
	ErrorBody,
	PaymentIntentCreated,
	PaymentIntentRequest,
	DEFAULT_CURRENCY,
	MIN_AMOUNT,
	PREDEFINED_AMOUNTS,
	format_amount,
	to_subunits
};

pub const AMOUNT_TOO_LOW_MSG: &str = "Please enter a valid donation amount (minimum $0.50)";
pub const MISSING_EMAIL_MSG: &str = "Please provide your email address";
pub const REJECTED_FALLBACK_MSG: &str = "Failed to create payment intent";
pub const TRANSPORT_FAILURE_MSG: &str = "There was an error processing your donation. Please try again.";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SubmissionState {
	#[default]
	Idle,
	Submitting,
	Succeeded(String),
	Failed(String)
}

impl SubmissionState {
	/// The text of the banner to show above the form, if any
	#[must_use]
	pub fn message(&self) -> Option<&str> {
		match self {
			Self::Succeeded(msg) | Self::Failed(msg) => Some(msg),
			Self::Idle | Self::Submitting => None
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DonorField {
	Name,
	Email
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DonorInfo {
	pub name: String,
	pub email: String
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownAmount(pub u32);

/// Why a request to the payment intent endpoint didn't come back with a client secret
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitError {
	/// We never got a usable response (couldn't connect, couldn't decode, etc). The string is
	/// only for logging; the donor gets a generic message.
	Transport(String),
	/// The endpoint answered with a non-2xx status and (maybe) an `{ error }` body
	Rejected(Option<String>)
}

/// Turns whatever the endpoint sent back into the outcome the form cares about. A non-2xx whose
/// body isn't `{ error }` still counts as a rejection, the form just falls back to a generic
/// message for it.
pub fn read_intent_response(status: u16, body: &[u8]) -> Result<PaymentIntentCreated, SubmitError> {
	if (200..300).contains(&status) {
		serde_json::from_slice(body)
			.map_err(|e| SubmitError::Transport(format!("There was an error while decoding: {e}")))
	} else {
		let error = serde_json::from_slice::<ErrorBody>(body)
			.ok()
			.map(|body| body.error);
		Err(SubmitError::Rejected(error))
	}
}

/// Everything the donation form needs to remember between renders.
///
/// Only one of `selected` and `custom` is ever meaningful at a time: picking a button clears the
/// text box and typing in the text box unselects the button.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DonationForm {
	selected: Option<u32>,
	custom: String,
	donation_type: DonationType,
	donor: DonorInfo,
	state: SubmissionState,
	// the amount of the request currently in flight, so the thank-you message still has it if
	// the donor keeps typing while we wait
	in_flight: Option<f64>
}

impl DonationForm {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn selected_amount(&self) -> Option<u32> {
		self.selected
	}

	#[must_use]
	pub fn custom_amount(&self) -> &str {
		&self.custom
	}

	#[must_use]
	pub fn donation_type(&self) -> DonationType {
		self.donation_type
	}

	#[must_use]
	pub fn donor(&self) -> &DonorInfo {
		&self.donor
	}

	#[must_use]
	pub fn state(&self) -> &SubmissionState {
		&self.state
	}

	#[must_use]
	pub fn is_submitting(&self) -> bool {
		self.state == SubmissionState::Submitting
	}

	// edits only ever clear a finished banner, never an in-flight submission
	fn clear_message(&mut self) {
		if matches!(self.state, SubmissionState::Succeeded(_) | SubmissionState::Failed(_)) {
			self.state = SubmissionState::Idle;
		}
	}

	pub fn dismiss_message(&mut self) {
		self.clear_message();
	}

	pub fn select_predefined_amount(&mut self, amount: u32) -> Result<(), UnknownAmount> {
		if !PREDEFINED_AMOUNTS.contains(&amount) {
			return Err(UnknownAmount(amount));
		}

		self.selected = Some(amount);
		self.custom.clear();
		self.clear_message();
		Ok(())
	}

	pub fn set_custom_amount(&mut self, text: impl Into<String>) {
		self.custom = text.into();
		self.selected = None;
		self.clear_message();
	}

	pub fn set_donation_type(&mut self, donation_type: DonationType) {
		self.donation_type = donation_type;
		self.clear_message();
	}

	pub fn set_donor_info(&mut self, field: DonorField, value: impl Into<String>) {
		let value = value.into();
		match field {
			DonorField::Name => self.donor.name = value,
			DonorField::Email => self.donor.email = value
		}
		self.clear_message();
	}

	/// The amount (in currency units) that would be donated if the donor hit submit right now
	#[must_use]
	pub fn effective_amount(&self) -> f64 {
		match self.selected {
			Some(amount) => f64::from(amount),
			None => self.custom
				.trim()
				.parse::<f64>()
				.ok()
				.filter(|a| a.is_finite())
				.unwrap_or(0.0)
		}
	}

	fn email_provided(&self) -> bool {
		!self.donor.email.trim().is_empty()
	}

	/// Whether the donate button should be clickable
	#[must_use]
	pub fn can_submit(&self) -> bool {
		!self.is_submitting() && self.effective_amount() >= MIN_AMOUNT && self.email_provided()
	}

	/// Validates the form and, if it's good to go, moves into [`SubmissionState::Submitting`] and
	/// hands back the request that should be sent to the endpoint. If this returns `None`, no
	/// request should be sent; the reason (if there is one) is in [`Self::state`].
	pub fn begin_submit(&mut self) -> Option<PaymentIntentRequest> {
		if self.is_submitting() {
			return None;
		}

		let amount = self.effective_amount();
		if amount < MIN_AMOUNT {
			self.state = SubmissionState::Failed(AMOUNT_TOO_LOW_MSG.into());
			return None;
		}

		if !self.email_provided() {
			self.state = SubmissionState::Failed(MISSING_EMAIL_MSG.into());
			return None;
		}

		self.state = SubmissionState::Submitting;
		self.in_flight = Some(amount);

		Some(PaymentIntentRequest {
			amount: Some(to_subunits(amount)),
			currency: DEFAULT_CURRENCY.into(),
			donation_type: self.donation_type.id().into(),
			donor_email: Some(self.donor.email.clone()),
			donor_name: Some(self.donor.name.clone())
		})
	}

	/// Applies the endpoint's answer to the submission started by [`Self::begin_submit`]. Does
	/// nothing if no submission is in flight.
	pub fn complete_submit(&mut self, outcome: Result<PaymentIntentCreated, SubmitError>) {
		if !self.is_submitting() {
			return;
		}

		let amount = self.in_flight.take().unwrap_or_else(|| self.effective_amount());

		self.state = match outcome {
			Ok(_) => {
				self.selected = None;
				self.custom.clear();
				self.donor = DonorInfo::default();

				SubmissionState::Succeeded(format!(
					"Thank you for your donation of {}! Your generosity helps our ministry.",
					format_amount(amount)
				))
			},
			Err(SubmitError::Rejected(Some(msg))) if !msg.trim().is_empty() => SubmissionState::Failed(msg),
			Err(SubmitError::Rejected(_)) => SubmissionState::Failed(REJECTED_FALLBACK_MSG.into()),
			Err(SubmitError::Transport(_)) => SubmissionState::Failed(TRANSPORT_FAILURE_MSG.into())
		};
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn successful_responses_carry_the_client_secret() {
		let body = br#"{"client_secret":"pi_123_secret_456","payment_intent_id":"pi_123"}"#;
		assert_eq!(read_intent_response(200, body), Ok(created()));
	}

	#[test]
	fn rejections_keep_the_endpoints_error_text() {
		let body = br#"{"error":"Invalid amount. Minimum donation is $0.50"}"#;
		assert_eq!(
			read_intent_response(400, body),
			Err(SubmitError::Rejected(Some("Invalid amount. Minimum donation is $0.50".into())))
		);
	}

	#[test]
	fn rejections_without_an_error_body_have_no_text() {
		assert_eq!(read_intent_response(502, b"<html>Bad Gateway</html>"), Err(SubmitError::Rejected(None)));
		assert_eq!(read_intent_response(500, b""), Err(SubmitError::Rejected(None)));
	}

	#[test]
	fn undecodable_success_bodies_count_as_transport_failures() {
		assert!(matches!(read_intent_response(200, b"not json"), Err(SubmitError::Transport(_))));
		// a 2xx that's actually an error body is still not a payment intent
		assert!(matches!(
			read_intent_response(200, br#"{"error":"nope"}"#),
			Err(SubmitError::Transport(_))
		));
	}

	#[test]
	fn undecodable_responses_end_in_the_generic_failure_banner() {
		let mut form = filled_form("10");
		form.begin_submit().unwrap();
		form.complete_submit(read_intent_response(200, b"not json"));
		assert_eq!(form.state().message(), Some(TRANSPORT_FAILURE_MSG));

		let mut form = filled_form("10");
		form.begin_submit().unwrap();
		form.complete_submit(read_intent_response(503, b""));
		assert_eq!(form.state().message(), Some(REJECTED_FALLBACK_MSG));
	}

	fn created() -> PaymentIntentCreated {
		PaymentIntentCreated {
			client_secret: "pi_123_secret_456".into(),
			payment_intent_id: "pi_123".into()
		}
	}

	fn filled_form(amount: &str) -> DonationForm {
		let mut form = DonationForm::new();
		form.set_custom_amount(amount);
		form.set_donor_info(DonorField::Email, "a@b.com");
		form
	}

	#[test]
	fn amounts_below_minimum_never_produce_a_request() {
		for text in ["", "0", "0.49", "0.499", "-5", "abc", "NaN", "inf", "  "] {
			let mut form = filled_form(text);
			assert_eq!(form.begin_submit(), None, "{text:?} produced a request");
			assert_eq!(*form.state(), SubmissionState::Failed(AMOUNT_TOO_LOW_MSG.into()));
		}
	}

	#[test]
	fn missing_email_never_produces_a_request() {
		for amount in PREDEFINED_AMOUNTS {
			let mut form = DonationForm::new();
			form.select_predefined_amount(amount).unwrap();
			form.set_donor_info(DonorField::Name, "Someone");

			assert_eq!(form.begin_submit(), None);
			assert_eq!(*form.state(), SubmissionState::Failed(MISSING_EMAIL_MSG.into()));
		}

		let mut form = filled_form("10");
		form.set_donor_info(DonorField::Email, "   ");
		assert_eq!(form.begin_submit(), None);
		assert!(matches!(form.state(), SubmissionState::Failed(_)));
	}

	#[test]
	fn predefined_and_custom_amounts_replace_each_other() {
		let mut form = DonationForm::new();

		form.set_custom_amount("42.5");
		assert_eq!(form.effective_amount(), 42.5);

		form.select_predefined_amount(100).unwrap();
		assert_eq!(form.custom_amount(), "");
		assert_eq!(form.selected_amount(), Some(100));
		assert_eq!(form.effective_amount(), 100.0);

		form.set_custom_amount("7");
		assert_eq!(form.selected_amount(), None);
		assert_eq!(form.effective_amount(), 7.0);
	}

	#[test]
	fn only_listed_amounts_can_be_selected() {
		let mut form = DonationForm::new();
		form.set_custom_amount("12");

		assert_eq!(form.select_predefined_amount(30), Err(UnknownAmount(30)));
		assert_eq!(form.custom_amount(), "12");
		assert_eq!(form.selected_amount(), None);
	}

	#[test]
	fn request_is_built_in_subunits() {
		let mut form = filled_form("25.00");
		form.set_donation_type(DonationType::Building);
		form.set_donor_info(DonorField::Name, "Jane Doe");

		let req = form.begin_submit().unwrap();

		assert_eq!(req, PaymentIntentRequest {
			amount: Some(2500),
			currency: "usd".into(),
			donation_type: "building".into(),
			donor_email: Some("a@b.com".into()),
			donor_name: Some("Jane Doe".into())
		});
		assert!(form.is_submitting());
		assert!(!form.can_submit());
	}

	#[test]
	fn fractional_amounts_round_to_the_nearest_cent() {
		let mut form = filled_form("10.556");
		assert_eq!(form.begin_submit().unwrap().amount, Some(1056));

		let mut form = filled_form("0.50");
		assert_eq!(form.begin_submit().unwrap().amount, Some(50));
	}

	#[test]
	fn second_submit_while_in_flight_is_ignored() {
		let mut form = filled_form("5");
		assert!(form.begin_submit().is_some());
		assert_eq!(form.begin_submit(), None);
		assert!(form.is_submitting());
	}

	#[test]
	fn success_resets_the_form() {
		let mut form = DonationForm::new();
		form.select_predefined_amount(50).unwrap();
		form.set_donation_type(DonationType::Missions);
		form.set_donor_info(DonorField::Name, "Jane");
		form.set_donor_info(DonorField::Email, "jane@example.com");

		form.begin_submit().unwrap();
		form.complete_submit(Ok(created()));

		assert_eq!(
			*form.state(),
			SubmissionState::Succeeded("Thank you for your donation of $50.00! Your generosity helps our ministry.".into())
		);
		assert_eq!(form.selected_amount(), None);
		assert_eq!(form.custom_amount(), "");
		assert_eq!(*form.donor(), DonorInfo::default());
		assert_eq!(form.effective_amount(), 0.0);
		// the category isn't part of what gets reset
		assert_eq!(form.donation_type(), DonationType::Missions);
	}

	#[test]
	fn thank_you_uses_the_submitted_amount() {
		let mut form = filled_form("12.5");
		form.begin_submit().unwrap();

		// edits are still allowed while we wait
		form.set_custom_amount("99");
		form.complete_submit(Ok(created()));

		assert_eq!(
			form.state().message(),
			Some("Thank you for your donation of $12.50! Your generosity helps our ministry.")
		);
	}

	#[test]
	fn failures_surface_the_right_message() {
		let cases = [
			(SubmitError::Rejected(Some("Stripe API error: card declined".into())), "Stripe API error: card declined"),
			(SubmitError::Rejected(Some(String::new())), REJECTED_FALLBACK_MSG),
			(SubmitError::Rejected(None), REJECTED_FALLBACK_MSG),
			(SubmitError::Transport("connection refused".into()), TRANSPORT_FAILURE_MSG),
		];

		for (err, expected) in cases {
			let mut form = filled_form("30");
			form.begin_submit().unwrap();
			form.complete_submit(Err(err));

			assert_eq!(*form.state(), SubmissionState::Failed(expected.into()));
			// nothing gets reset on failure so they can just try again
			assert_eq!(form.donor().email, "a@b.com");
			assert_eq!(form.effective_amount(), 30.0);
			assert!(form.can_submit());
		}
	}

	#[test]
	fn completion_without_submission_is_ignored() {
		let mut form = filled_form("30");
		form.complete_submit(Ok(created()));

		assert_eq!(*form.state(), SubmissionState::Idle);
		assert_eq!(form.custom_amount(), "30");
	}

	#[test]
	fn banners_clear_on_the_next_edit() {
		let mut form = DonationForm::new();
		assert_eq!(form.begin_submit(), None);
		assert!(form.state().message().is_some());

		form.set_donor_info(DonorField::Email, "a@b.com");
		assert_eq!(*form.state(), SubmissionState::Idle);

		assert_eq!(form.begin_submit(), None);
		form.set_donation_type(DonationType::Special);
		assert_eq!(*form.state(), SubmissionState::Idle);

		assert_eq!(form.begin_submit(), None);
		form.dismiss_message();
		assert_eq!(*form.state(), SubmissionState::Idle);
	}

	#[test]
	fn edits_dont_cancel_an_in_flight_submission() {
		let mut form = filled_form("20");
		form.begin_submit().unwrap();

		form.select_predefined_amount(25).unwrap();
		form.set_donor_info(DonorField::Name, "changed my mind");
		form.dismiss_message();

		assert!(form.is_submitting());
	}
}
