use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::PathBuf;

pub mod models;
pub use models::*;

/// Loads the application configuration.
///
/// Sources, later entries overriding earlier ones:
/// 1. `config/default` (yaml/toml/json, optional)
/// 2. `config/{RUN_ENV}` (optional, `RUN_ENV` defaults to "debug")
/// 3. Environment variables with the `INK` prefix and `__` separator,
///    e.g. `INK_SERVER__PORT=8086`.
///
/// Secrets (Stripe keys, SMTP password) are never part of the file config;
/// the crates that need them read their env vars directly.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env::var("PREFIX").unwrap_or_else(|_| "INK".to_string());

    let config_root = config_root_dir();
    let default_path = config_root.join("config/default");
    let env_path = config_root.join(format!("config/{}", run_env));

    let builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(Environment::with_prefix(&prefix).separator("__"));

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    Ok(raw_config)
}

/// Directory the `config/` folder is resolved against: the workspace root
/// during development, the process working directory otherwise.
fn config_root_dir() -> PathBuf {
    if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
        let manifest_dir = PathBuf::from(manifest_dir);
        if let Some(root) = manifest_dir.ancestors().nth(2) {
            return root.to_path_buf();
        }
    }
    env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// Loads the file named by `DOTENV_OVERRIDE` if set, otherwise `.env`.
/// Only ever runs once per process.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path = env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_duration_floor_is_applied() {
        let studio = StudioConfig {
            min_duration_minutes: 10,
            ..StudioConfig::default()
        };
        assert_eq!(studio.effective_min_duration_minutes(), 30);
    }

    #[test]
    fn min_duration_above_floor_passes_through() {
        let studio = StudioConfig::default();
        assert_eq!(studio.effective_min_duration_minutes(), 120);
    }

    #[test]
    fn studio_defaults_match_the_published_hours() {
        let studio = StudioConfig::default();
        assert_eq!(studio.open_hour, 12);
        assert_eq!(studio.close_hour, 20);
        assert_eq!(studio.closed_weekday, 6);
        assert_eq!(studio.booking_lead_days, 1);
        assert_eq!(studio.booking_horizon_days, 90);
    }
}
