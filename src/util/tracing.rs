use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs::File;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::Layer;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::layer::SubscriberExt;

// default name (fixed)
const APP_SERVICE_NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub app_name: Option<String>,
    pub level: Option<String>,
    pub file_name: Option<String>,
    pub file_dir: Option<String>,
    #[serde(default)]
    pub use_json: bool,
    #[serde(default = "default_use_stdout")]
    pub use_stdout: bool,
}

fn default_use_stdout() -> bool {
    true
}

impl LoggingConfig {
    pub fn new() -> Self {
        Self {
            app_name: None,
            level: None,
            file_name: None,
            file_dir: None,
            use_json: false,
            use_stdout: true,
        }
    }

    pub fn app_name(&self) -> &str {
        self.app_name.as_deref().unwrap_or(APP_SERVICE_NAME)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub fn load_tracing_config_from_env() -> Result<LoggingConfig> {
    envy::prefixed("LOG_")
        .from_env::<LoggingConfig>()
        .context("cannot read logging config from env:")
}

pub fn tracing_init(conf: LoggingConfig) -> Result<()> {
    let subscriber = setup_layer_from_logging_config(&conf)?;
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;
    tracing::debug!("Logging initialized for {}", conf.app_name());
    Ok(())
}

pub fn tracing_init_from_env() -> Result<()> {
    match load_tracing_config_from_env() {
        Ok(conf) => tracing_init(conf),
        Err(e) => {
            eprintln!("failed to load logging config from env: {e:?}");
            Err(e)
        }
    }
}

pub fn setup_layer_from_logging_config(
    conf: &LoggingConfig,
) -> Result<Box<dyn Subscriber + Send + Sync + 'static>> {
    let lv = tracing::Level::from_str(conf.level.as_deref().unwrap_or("INFO"))
        .unwrap_or(tracing::Level::INFO);
    // RUST_LOG wins over the configured level
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(lv.as_str()));

    let file = match conf.file_name.as_deref() {
        Some(file_name) => {
            let dir = match conf.file_dir.as_deref() {
                Some(d) => PathBuf::from_str(d).context("Invalid log file directory")?,
                None => env::current_dir().context("cannot resolve current directory")?,
            };
            std::fs::create_dir_all(&dir).context("create log file directory:")?;
            let path = dir.join(file_name);
            let file = File::create(&path).with_context(|| format!("create log file to {path:?}:"))?;
            Some(Arc::new(file))
        }
        None => None,
    };
    let (json_file, plain_file) = match file {
        Some(f) if conf.use_json => (Some(f), None),
        Some(f) => (None, Some(f)),
        None => (None, None),
    };

    let subscriber = Box::new(
        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_file.map(|f| {
                Layer::new()
                    .with_writer(f.with_max_level(lv))
                    .with_ansi(false)
                    .json()
            }))
            .with(plain_file.map(|f| {
                Layer::new()
                    .with_writer(f.with_max_level(lv))
                    .with_ansi(false)
            }))
            .with(if !conf.use_json && conf.use_stdout {
                Some(tracing_subscriber::fmt::layer().pretty())
            } else {
                None
            })
            .with(if conf.use_json && conf.use_stdout {
                Some(tracing_subscriber::fmt::layer().json())
            } else {
                None
            }),
    );
    Ok(subscriber)
}

// for simple stdout logging
pub fn tracing_init_test(level: tracing::Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_from_env_iter() {
        let conf: LoggingConfig = envy::from_iter(vec![
            ("LEVEL".to_string(), "debug".to_string()),
            ("USE_JSON".to_string(), "true".to_string()),
        ])
        .unwrap();
        assert_eq!(conf.level.as_deref(), Some("debug"));
        assert!(conf.use_json);
        assert!(conf.use_stdout);
        assert_eq!(conf.app_name(), APP_SERVICE_NAME);
    }

    #[test]
    fn test_setup_layer_without_file() {
        let conf = LoggingConfig {
            level: Some("warn".to_string()),
            use_stdout: false,
            ..LoggingConfig::new()
        };
        assert!(setup_layer_from_logging_config(&conf).is_ok());
    }

    #[test]
    fn test_setup_layer_with_file() {
        let dir = env::temp_dir().join(format!("{APP_SERVICE_NAME}-log-test"));
        let conf = LoggingConfig {
            file_name: Some("chunking.log".to_string()),
            file_dir: Some(dir.to_string_lossy().into_owned()),
            use_json: true,
            use_stdout: false,
            ..LoggingConfig::new()
        };
        assert!(setup_layer_from_logging_config(&conf).is_ok());
        assert!(dir.join("chunking.log").exists());
    }
}
