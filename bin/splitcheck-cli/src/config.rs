use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use splitcheck_core::SessionConfig;
use std::path::Path;

/// Environment variable prefix; nested keys use `__`, e.g. `SPLITCHECK_SESSION__LABEL_PREFIX`
const ENV_PREFIX: &str = "SPLITCHECK";

/// Host configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Fallback log filter when `RUST_LOG` is unset
    pub log_level: String,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub processor: ProcessorConfig,
}

/// Settings for the simulated payment terminal
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessorConfig {
    /// Charges strictly above this amount are declined
    pub decline_above: Option<Decimal>,
}

impl CliConfig {
    /// Layers defaults, an optional config file and `SPLITCHECK_*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv::dotenv().ok();

        let defaults = SessionConfig::default();
        let mut builder = ::config::Config::builder()
            .set_default("log_level", "info")?
            .set_default("session.label_prefix", defaults.label_prefix)?
            .set_default("session.currency", defaults.currency)?;

        builder = match path {
            Some(path) => builder.add_source(::config::File::from(path)),
            None => builder.add_source(::config::File::with_name("splitcheck").required(false)),
        };

        let settings = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("failed to assemble configuration")?;

        let config: CliConfig = settings
            .try_deserialize()
            .context("invalid configuration")?;
        config.session.validate()?;

        Ok(config)
    }
}
