mod app_config;

pub use app_config::{
    AppConfig, FixturesConfig, LogFormat, LoggingConfig, PrimaryKeys, ServerConfig,
    StorageSettings, TableNames,
};
