use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::EntityKind;
use crate::infrastructure::observability::MetricsConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub fixtures: FixturesConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Backend selection and table layout
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Serve from DynamoDB tables instead of JSON fixtures
    pub use_dynamodb: bool,
    pub region: String,
    /// Custom endpoint, e.g. DynamoDB Local
    pub endpoint_url: Option<String>,
    pub tables: TableNames,
    pub primary_keys: PrimaryKeys,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TableNames {
    pub users: String,
    pub threads: String,
    pub posts: String,
}

/// Per-collection primary key overrides
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PrimaryKeys {
    pub users: Option<String>,
    pub threads: Option<String>,
    pub posts: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FixturesConfig {
    /// Root holding `<collection>/db.json` files
    pub dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            use_dynamodb: false,
            region: "us-east-1".to_string(),
            endpoint_url: None,
            tables: TableNames::default(),
            primary_keys: PrimaryKeys::default(),
        }
    }
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            users: "forum-microservices-users-dev".to_string(),
            threads: "forum-microservices-threads-dev".to_string(),
            posts: "forum-microservices-posts-dev".to_string(),
        }
    }
}

impl Default for FixturesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

impl TableNames {
    pub fn get(&self, kind: EntityKind) -> &str {
        match kind {
            EntityKind::Users => &self.users,
            EntityKind::Threads => &self.threads,
            EntityKind::Posts => &self.posts,
        }
    }
}

impl StorageSettings {
    /// Primary key for `kind`: the configured override, else `<entity>Id`
    /// against tables and `id` against fixtures
    pub fn primary_key(&self, kind: EntityKind) -> String {
        let configured = match kind {
            EntityKind::Users => &self.primary_keys.users,
            EntityKind::Threads => &self.primary_keys.threads,
            EntityKind::Posts => &self.primary_keys.posts,
        };

        match configured {
            Some(key) => key.clone(),
            None if self.use_dynamodb => kind.table_key().to_string(),
            None => "id".to_string(),
        }
    }
}

/// Plain environment variables honoured on top of `APP__*`
const LEGACY_OVERRIDES: [(&str, &str); 8] = [
    ("PORT", "server.port"),
    ("USE_DYNAMODB", "storage.use_dynamodb"),
    ("AWS_REGION", "storage.region"),
    ("DYNAMODB_ENDPOINT", "storage.endpoint_url"),
    ("DYNAMODB_USERS_TABLE", "storage.tables.users"),
    ("DYNAMODB_THREADS_TABLE", "storage.tables.threads"),
    ("DYNAMODB_POSTS_TABLE", "storage.tables.posts"),
    ("FIXTURES_DIR", "fixtures.dir"),
];

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with(|name| std::env::var(name).ok())
    }

    /// Loads configuration, resolving legacy variables through `lookup`
    pub fn load_with<F>(lookup: F) -> Result<Self, config::ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            );

        for (variable, key) in LEGACY_OVERRIDES {
            let value = lookup(variable).filter(|v| !v.is_empty());

            builder = match (variable, value) {
                ("USE_DYNAMODB", Some(v)) => builder.set_override(key, v == "true")?,
                ("PORT", Some(v)) => {
                    let port: u16 = v.parse().map_err(|_| {
                        config::ConfigError::Message(format!("PORT '{}' is not a valid port", v))
                    })?;
                    builder.set_override(key, i64::from(port))?
                }
                (_, Some(v)) => builder.set_override(key, v)?,
                (_, None) => builder,
            };
        }

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        AppConfig::load_with(|name| vars.get(name).cloned()).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]);

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(!config.storage.use_dynamodb);
        assert_eq!(config.storage.region, "us-east-1");
        assert_eq!(
            config.storage.tables.get(EntityKind::Threads),
            "forum-microservices-threads-dev"
        );
        assert_eq!(config.fixtures.dir, PathBuf::from("."));
        assert!(config.metrics.enabled);
    }

    #[test]
    fn test_legacy_overrides() {
        let config = load(&[
            ("PORT", "3003"),
            ("USE_DYNAMODB", "true"),
            ("AWS_REGION", "eu-west-1"),
            ("DYNAMODB_ENDPOINT", "http://localhost:8000"),
            ("DYNAMODB_POSTS_TABLE", "posts-prod"),
            ("FIXTURES_DIR", "/srv/forum"),
        ]);

        assert_eq!(config.server.port, 3003);
        assert!(config.storage.use_dynamodb);
        assert_eq!(config.storage.region, "eu-west-1");
        assert_eq!(
            config.storage.endpoint_url.as_deref(),
            Some("http://localhost:8000")
        );
        assert_eq!(config.storage.tables.posts, "posts-prod");
        assert_eq!(config.storage.tables.users, "forum-microservices-users-dev");
        assert_eq!(config.fixtures.dir, PathBuf::from("/srv/forum"));
    }

    #[test]
    fn test_use_dynamodb_requires_literal_true() {
        assert!(!load(&[("USE_DYNAMODB", "yes")]).storage.use_dynamodb);
        assert!(!load(&[("USE_DYNAMODB", "TRUE")]).storage.use_dynamodb);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let result = AppConfig::load_with(|name| (name == "PORT").then(|| "abc".to_string()));

        assert!(result.is_err());
    }

    #[test]
    fn test_primary_key_defaults_per_mode() {
        let mut storage = StorageSettings::default();
        assert_eq!(storage.primary_key(EntityKind::Posts), "id");

        storage.use_dynamodb = true;
        assert_eq!(storage.primary_key(EntityKind::Posts), "postId");
        assert_eq!(storage.primary_key(EntityKind::Users), "userId");

        storage.primary_keys.posts = Some("slug".to_string());
        assert_eq!(storage.primary_key(EntityKind::Posts), "slug");
    }

    #[test]
    fn test_log_format_deserialize() {
        let format: LogFormat = serde_json::from_str(r#""json""#).unwrap();
        assert_eq!(format, LogFormat::Json);
    }
}
