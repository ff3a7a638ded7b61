use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Path to the SQLite file, created on first connect
    pub path: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_connections: u32,
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_default("application.host", "0.0.0.0")?
        .set_default("application.port", 5000)?
        .set_default("database.path", "trivia.db")?
        .set_default("database.max_connections", 5)
}

/// Reads `.env`, then an optional `configuration` file (or the one named by
/// `TRIVIA_CONFIG`), then `TRIVIA__SECTION__KEY` environment variables.
pub fn get_settings() -> Result<Settings, ConfigError> {
    dotenv::dotenv().ok();
    let config_file =
        dotenv::var("TRIVIA_CONFIG").unwrap_or_else(|_| "configuration".to_owned());

    with_defaults(Config::builder())?
        .add_source(File::with_name(&config_file).required(false))
        .add_source(
            Environment::with_prefix("TRIVIA")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn defaults_are_complete() {
        let settings: Settings = with_defaults(Config::builder())
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.application.address(), "0.0.0.0:5000");
        assert_eq!(settings.database.path, "trivia.db");
        assert_eq!(settings.database.max_connections, 5);
    }

    #[test]
    fn numbers_may_be_given_as_strings() {
        let settings: Settings = with_defaults(Config::builder())
            .unwrap()
            .add_source(File::from_str(
                "[application]\nport = \"8080\"\n[database]\nmax_connections = \"2\"\n",
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.application.port, 8080);
        assert_eq!(settings.database.max_connections, 2);
    }
}
