use gloo_net::http::Request;
use shared_data::{read_intent_response, PaymentIntentCreated, PaymentIntentRequest, SubmitError};
use yew::prelude::*;
use donations::Donations;

mod donations;

// Both of these are baked in at build time. The key is only needed when the endpoint lives
// behind something (like a functions host) that wants its own bearer token.
const DONATION_ENDPOINT: &str = match option_env!("DONATION_ENDPOINT") {
	Some(endpoint) => endpoint,
	None => "/api/create-payment-intent"
};
const DONATION_ENDPOINT_KEY: Option<&str> = option_env!("DONATION_ENDPOINT_KEY");

pub async fn create_payment_intent(req: &PaymentIntentRequest) -> Result<PaymentIntentCreated, SubmitError> {
	let mut builder = Request::post(DONATION_ENDPOINT);

	if let Some(key) = DONATION_ENDPOINT_KEY {
		builder = builder.header("Authorization", &format!("Bearer {key}"));
	}

	let request = builder.json(req)
		.map_err(|e| SubmitError::Transport(format!("donation couldn't be serialized: {e:?}")))?;

	let res = request.send()
		.await
		.map_err(|e| SubmitError::Transport(format!("gloo_net error: {e:?}")))?;

	// an unreadable body on a rejection just means there's no `{ error }` to show
	let body = match res.binary().await {
		Ok(body) => body,
		Err(e) if res.ok() => return Err(SubmitError::Transport(format!("couldn't read response body: {e:?}"))),
		Err(_) => Vec::new()
	};

	read_intent_response(res.status(), &body)
}

#[function_component(Frontend)]
pub fn frontend() -> Html {
	html! {
		<>
			<style>{ shared_data::BASE_STYLE }</style>
			<Donations />
		</>
	}
}

fn main() {
	yew::Renderer::<Frontend>::new().render();
}
