/// Tracing setup
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{AppError, Result};

/// Filter used when neither `RUST_LOG` nor the configuration sets one
pub const DEFAULT_FILTER: &str = "walkup=info";

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over `filter`. Fails if a subscriber is already installed
/// or the filter does not parse.
pub fn init_tracing(filter: Option<&str>) -> Result<()> {
    let env_filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(env_filter) => env_filter,
        Err(_) => tracing_subscriber::EnvFilter::try_new(filter.unwrap_or(DEFAULT_FILTER))
            .map_err(|e| AppError::Logging(e.to_string()))?,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_is_rejected() {
        init_tracing(Some("walkup=debug")).unwrap();
        assert!(matches!(init_tracing(None), Err(AppError::Logging(_))));
    }
}
