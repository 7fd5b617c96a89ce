use std::rc::Rc;

use gloo_console::log;
use shared_data::{
	format_amount,
	DonationForm,
	DonationType,
	DonorField,
	PaymentIntentCreated,
	SubmissionState,
	SubmitError,
	UnknownAmount,
	PREDEFINED_AMOUNTS
};
use wasm_bindgen::JsCast;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Clone, PartialEq, Default)]
pub struct FormState(DonationForm);

pub enum FormMsg {
	SelectAmount(u32),
	CustomAmount(String),
	DonationType(DonationType),
	Donor(DonorField, String),
	Dismiss,
	// carries its own dispatcher so the request it kicks off can report back
	Submit(UseReducerDispatcher<FormState>),
	Completed(Result<PaymentIntentCreated, SubmitError>)
}

impl Reducible for FormState {
	type Action = FormMsg;

	fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
		let mut form = self.0.clone();

		match action {
			FormMsg::SelectAmount(amount) => if let Err(UnknownAmount(amount)) = form.select_predefined_amount(amount) {
				log!(format!("{amount} isn't one of the predefined amounts, ignoring"));
				return self;
			},
			FormMsg::CustomAmount(text) => form.set_custom_amount(text),
			FormMsg::DonationType(kind) => form.set_donation_type(kind),
			FormMsg::Donor(field, value) => form.set_donor_info(field, value),
			FormMsg::Dismiss => form.dismiss_message(),
			FormMsg::Submit(dispatcher) => {
				// If this is None, the form has already put the reason in its state (or there's
				// already a request in flight), so there's nothing to send
				let Some(req) = form.begin_submit() else {
					return Self(form).into();
				};

				wasm_bindgen_futures::spawn_local(async move {
					let outcome = crate::create_payment_intent(&req).await;

					if let Err(SubmitError::Transport(ref err)) = outcome {
						log!(format!("Couldn't reach the donation endpoint: {err}"));
					}

					dispatcher.dispatch(FormMsg::Completed(outcome));
				});
			},
			FormMsg::Completed(outcome) => form.complete_submit(outcome)
		}

		Self(form).into()
	}
}

const STYLE: &str = r#"
#donations {
	max-width: 720px;
	margin: 40px auto;
	padding: 32px;
	background-color: var(--main-background);
	border-radius: 16px;
	box-shadow: 0 10px 30px rgba(0, 0, 0, 0.08);
}
#donations h4 {
	margin: 24px 0 12px 0;
}
.banner {
	padding: 14px 16px;
	border-radius: 8px;
	display: flex;
	justify-content: space-between;
	align-items: center;
}
.banner.success {
	background-color: var(--success-background);
	color: var(--success-text);
}
.banner.error {
	background-color: var(--error-background);
	color: var(--error-text);
}
.banner > button {
	border: none;
	background: none;
}
#donor-info, #donation-types {
	display: grid;
	grid-template-columns: 1fr 1fr;
	gap: 12px;
}
#donor-info label {
	display: block;
	font-size: 14px;
	margin-bottom: 6px;
}
#donor-info input, #custom-amount {
	width: 100%;
	box-sizing: border-box;
}
.donation-type {
	padding: 14px;
	border: 2px solid var(--border-color);
	border-radius: 8px;
	cursor: pointer;
}
.donation-type.selected {
	border-color: var(--accent);
	background-color: var(--accent-soft);
}
.donation-type p {
	margin: 4px 0 0 0;
	font-size: 14px;
	color: var(--secondary-text);
}
#amounts {
	display: grid;
	grid-template-columns: repeat(3, 1fr);
	gap: 10px;
	margin-bottom: 12px;
}
#amounts > button.selected {
	background-color: var(--accent);
	color: var(--main-background);
}
#summary {
	margin: 24px 0;
	padding: 16px;
	border-radius: 8px;
	background-color: var(--body-background);
}
#summary > div {
	display: flex;
	justify-content: space-between;
}
#donate-button {
	width: 100%;
	padding: 16px;
	font-weight: bold;
	background-color: var(--accent);
	color: var(--main-background);
}
"#;

#[function_component(Donations)]
pub fn donations() -> Html {
	let form = use_reducer(FormState::default);
	let current = &form.0;

	macro_rules! input_callback{
		($msg:expr) => {{
			let form = form.clone();
			Callback::from(move |e: InputEvent| if let Some(input) = e.target()
				.and_then(|t| t.dyn_into::<HtmlInputElement>().ok()) {
					form.dispatch(($msg)(input.value()));
				}
			)
		}}
	}

	let name_input = input_callback!(|v| FormMsg::Donor(DonorField::Name, v));
	let email_input = input_callback!(|v| FormMsg::Donor(DonorField::Email, v));
	let custom_input = input_callback!(FormMsg::CustomAmount);

	let dismiss_form = form.clone();
	let dismiss = Callback::from(move |_: MouseEvent| dismiss_form.dispatch(FormMsg::Dismiss));

	let submit_form = form.clone();
	let submit_click = Callback::from(move |_: MouseEvent| {
		submit_form.dispatch(FormMsg::Submit(submit_form.dispatcher()));
	});

	let banner_class = match current.state() {
		SubmissionState::Succeeded(_) => "success",
		_ => "error"
	};
	let banner = current.state().message().map_or_else(
		|| html! {},
		|msg| html! {
			<div class={ classes!("banner", banner_class) }>
				<p>{ msg }</p>
				<button onclick={ dismiss }>{ "×" }</button>
			</div>
		}
	);

	let type_cards = DonationType::ALL.into_iter().map(|kind| {
		let form = form.clone();
		let onclick = Callback::from(move |_: MouseEvent| form.dispatch(FormMsg::DonationType(kind)));
		let selected = (current.donation_type() == kind).then_some("selected");

		html! {
			<div class={ classes!("donation-type", selected) } { onclick }>
				<h5>{ kind.title() }</h5>
				<p>{ kind.description() }</p>
			</div>
		}
	}).collect::<Html>();

	let amount_buttons = PREDEFINED_AMOUNTS.into_iter().map(|amount| {
		let form = form.clone();
		let onclick = Callback::from(move |_: MouseEvent| form.dispatch(FormMsg::SelectAmount(amount)));
		let selected = (current.selected_amount() == Some(amount)).then_some("selected");

		html! {
			<button class={ classes!(selected) } { onclick }>{ format!("${amount}") }</button>
		}
	}).collect::<Html>();

	let amount = format_amount(current.effective_amount());
	let button_text = if current.is_submitting() {
		"Processing...".to_string()
	} else {
		format!("Donate {amount}")
	};

	html! {
		<>
			<style>{ STYLE }</style>
			<section id="donations">
				<h3>{ "Make a Donation" }</h3>
				{ banner }

				<h4>{ "Your Information" }</h4>
				<div id="donor-info">
					<div>
						<label for="donor-name">{ "Full Name (Optional)" }</label>
						<input
							type="text"
							id="donor-name"
							placeholder="Enter your full name"
							value={ current.donor().name.clone() }
							oninput={ name_input }
						/>
					</div>
					<div>
						<label for="donor-email">{ "Email Address *" }</label>
						<input
							type="email"
							id="donor-email"
							placeholder="Enter your email"
							required=true
							value={ current.donor().email.clone() }
							oninput={ email_input }
						/>
					</div>
				</div>

				<h4>{ "Choose Donation Type" }</h4>
				<div id="donation-types">{ type_cards }</div>

				<h4>{ "Select Amount (USD)" }</h4>
				<div id="amounts">{ amount_buttons }</div>
				<input
					type="number"
					id="custom-amount"
					placeholder="Enter custom amount"
					min="0.5"
					step="0.01"
					value={ current.custom_amount().to_string() }
					oninput={ custom_input }
				/>

				<div id="summary">
					<div>
						<span>{ "Donation Type:" }</span>
						<strong>{ current.donation_type().title() }</strong>
					</div>
					<div>
						<span>{ "Amount:" }</span>
						<strong>{ amount }</strong>
					</div>
				</div>

				<button id="donate-button" disabled={ !current.can_submit() } onclick={ submit_click }>
					{ button_text }
				</button>
				<p>{ "Secure payment powered by Stripe. Your donation is processed safely and securely." }</p>
			</section>
		</>
	}
}
