use config::{Config, ConfigBuilder, FileFormat, builder::DefaultState};
use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub agenda: AgendaConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgendaConfig {
    pub path: String,
}

/// First column of a rendered week. Only affects presentation; occurrence
/// math always uses ISO weekdays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStart {
    Monday,
    Saturday,
    Sunday,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    pub time_format: String,
    pub week_start: WeekStart,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and an optional `config.toml`.
    /// Environment variables use the `KALENDS_` prefix and `__` between sections,
    /// e.g. `KALENDS_LOGGING__LEVEL=trace`.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> CoreResult<Self> {
        let settings = Self::defaults()?
            .add_source(
                config::Environment::with_prefix("KALENDS")
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .add_source(config::File::with_name("config.toml").required(false))
            .build()?
            .try_deserialize::<Self>()?;
        settings.validate()?;
        Ok(settings)
    }

    /// ## Summary
    /// Builds settings from TOML text layered over the defaults.
    ///
    /// ## Errors
    /// Returns an error if the text is not valid TOML or does not deserialize.
    pub fn from_toml_str(text: &str) -> CoreResult<Self> {
        let settings = Self::defaults()?
            .add_source(config::File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize::<Self>()?;
        settings.validate()?;
        Ok(settings)
    }

    fn defaults() -> CoreResult<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("logging.level", "info")?
            .set_default("agenda.path", "agenda.json")?
            .set_default("display.time_format", "%H:%M")?
            .set_default("display.week_start", "monday")?)
    }

    fn validate(&self) -> CoreResult<()> {
        if self.agenda.path.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "agenda.path must not be empty".to_string(),
            ));
        }
        if self.display.time_format.is_empty() {
            return Err(CoreError::ValidationError(
                "display.time_format must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> CoreResult<Settings> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    tracing::debug!(level = %settings.logging.level, agenda = %settings.agenda.path, "Configuration loaded");
    Ok(settings)
}
