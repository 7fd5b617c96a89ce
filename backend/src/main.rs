use backend::{app, config::Config, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	match dotenv::dotenv() {
		Ok(path) => tracing::info!(path = %path.display(), "Read .env..."),
		Err(e) => tracing::warn!("Couldn't read .env, going with the process environment: {e}")
	}

	let config = Config::from_env()?;

	// We still want to serve the site without a key (and tell people donations are broken)
	// rather than refusing to start
	let stripe = match config.stripe_client() {
		Ok(client) => Some(client),
		Err(e) => {
			tracing::warn!("{e}; every donation will be rejected until STRIPE_SECRET_KEY is set");
			None
		}
	};

	if let Some(dir) = &config.frontend_dir {
		if !dir.is_dir() {
			tracing::warn!("FRONTEND_DIR ({}) is not a directory; the site itself will 404", dir.display());
		} else {
			tracing::info!("Serving frontend from {}", dir.display());
		}
	}

	let state = AppState::new(stripe, config.organization.clone());
	let router = app(state, config.frontend_dir.as_deref());

	let addr = config.addr();
	let listener = tokio::net::TcpListener::bind(addr).await?;

	tracing::info!("Serving axum on {addr}...");

	axum::serve(listener, router)
		.with_graceful_shutdown(async {
			if let Err(e) = tokio::signal::ctrl_c().await {
				tracing::error!("Couldn't listen for ctrl-c: {e}");
				// don't want to shut down just because we can't hear the signal
				std::future::pending::<()>().await;
			}
		})
		.await?;

	Ok(())
}
