use std::{
	fmt,
	net::{IpAddr, Ipv4Addr, SocketAddr},
	path::PathBuf
};

use thiserror::Error;

use crate::stripe::StripeClient;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";
pub const DEFAULT_ORGANIZATION: &str = "The Redeemed of the Lord Evangelistic Church";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
	#[error("Stripe secret key not configured")]
	MissingSecretKey,
	#[error("{key} must be a valid {expected}, got '{value}'")]
	Invalid {
		key: &'static str,
		expected: &'static str,
		value: String
	}
}

/// A Stripe secret key. Kept out of `Debug` output so it can't end up in the logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(String);

impl SecretKey {
	pub fn new(key: impl Into<String>) -> Self {
		Self(key.into())
	}

	#[must_use]
	pub fn expose(&self) -> &str {
		&self.0
	}
}

impl fmt::Debug for SecretKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("SecretKey(<redacted>)")
	}
}

#[derive(Debug, Clone)]
pub struct Config {
	pub host: IpAddr,
	pub port: u16,
	pub stripe_secret_key: Option<SecretKey>,
	pub stripe_api_base: String,
	pub organization: String,
	pub frontend_dir: Option<PathBuf>
}

impl Config {
	/// Reads everything out of the process environment (and `.env`, if there is one)
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| dotenv::var(key).ok())
	}

	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
		// empty vars are treated the same as unset ones, since that's what you get from a
		// `KEY=` line in a .env file
		let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

		macro_rules! parsed_var{
			($key:expr, $default:expr, $expected:expr) => {
				match var($key) {
					None => $default,
					Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
						key: $key,
						expected: $expected,
						value
					})?
				}
			}
		}

		let port = parsed_var!("BACKEND_PORT", DEFAULT_PORT, "port number");
		let host = parsed_var!("BACKEND_HOST", IpAddr::V4(Ipv4Addr::LOCALHOST), "ip address");

		Ok(Self {
			host,
			port,
			stripe_secret_key: var("STRIPE_SECRET_KEY").map(|key| SecretKey::new(key.trim())),
			stripe_api_base: var("STRIPE_API_BASE")
				.map_or_else(|| DEFAULT_STRIPE_API_BASE.into(), |b| b.trim_end_matches('/').to_string()),
			organization: var("ORGANIZATION_NAME").unwrap_or_else(|| DEFAULT_ORGANIZATION.into()),
			frontend_dir: var("FRONTEND_DIR").map(PathBuf::from)
		})
	}

	#[must_use]
	pub fn addr(&self) -> SocketAddr {
		SocketAddr::new(self.host, self.port)
	}

	/// The client payment intents get created with. Fails if there's no secret key, which we
	/// don't treat as fatal at startup: the endpoint just answers every donation with this error
	/// until it's configured.
	pub fn stripe_client(&self) -> Result<StripeClient, ConfigError> {
		self.stripe_secret_key
			.clone()
			.map(|key| StripeClient::new(key, self.stripe_api_base.clone()))
			.ok_or(ConfigError::MissingSecretKey)
	}
}
