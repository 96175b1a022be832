use std::time::Duration;

use serde::Deserialize;

use crate::error::{PgConnError, Result};

/// Environment variable read by [`ConnectionParams::from_env`].
pub const CONNECTION_URI_ENV: &str = "CONNECTION_URI";

const DEFAULT_HOST: &str = "localhost";

/// How to reach the database: a connection string, or individual settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionParams {
    /// A `postgres://` URI or a `key=value` connection string.
    Uri(String),
    Attributes(ConnectionAttributes),
}

impl ConnectionParams {
    /// Reads a connection string from `CONNECTION_URI`.
    pub fn from_env() -> Result<Self> {
        std::env::var(CONNECTION_URI_ENV)
            .map(ConnectionParams::Uri)
            .map_err(|e| PgConnError::Config(format!("{}: {}", CONNECTION_URI_ENV, e)))
    }
}

impl From<&str> for ConnectionParams {
    fn from(uri: &str) -> Self {
        ConnectionParams::Uri(uri.to_string())
    }
}

impl From<String> for ConnectionParams {
    fn from(uri: String) -> Self {
        ConnectionParams::Uri(uri)
    }
}

impl From<ConnectionAttributes> for ConnectionParams {
    fn from(attributes: ConnectionAttributes) -> Self {
        ConnectionParams::Attributes(attributes)
    }
}

/// Structured connection settings. Unset fields use the libpq defaults,
/// except `host`, which defaults to `localhost`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConnectionAttributes {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
    pub application_name: Option<String>,
    pub connect_timeout_secs: Option<u64>,
}

impl ConnectionAttributes {
    /// Builds the native client configuration.
    pub fn to_pg_config(&self) -> tokio_postgres::Config {
        let mut config = tokio_postgres::Config::new();
        config.host(self.host.as_deref().unwrap_or(DEFAULT_HOST));
        if let Some(port) = self.port {
            config.port(port);
        }
        if let Some(ref user) = self.user {
            config.user(user);
        }
        if let Some(ref password) = self.password {
            config.password(password);
        }
        if let Some(ref database) = self.database {
            config.dbname(database);
        }
        if let Some(ref application_name) = self.application_name {
            config.application_name(application_name);
        }
        if let Some(secs) = self.connect_timeout_secs {
            config.connect_timeout(Duration::from_secs(secs));
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_deserialize_partial() {
        let attrs: ConnectionAttributes =
            serde_json::from_str(r#"{"host": "db.internal", "port": 5433, "database": "app"}"#)
                .unwrap();
        assert_eq!(attrs.host.as_deref(), Some("db.internal"));
        assert_eq!(attrs.port, Some(5433));
        assert_eq!(attrs.database.as_deref(), Some("app"));
        assert_eq!(attrs.user, None);
    }

    #[test]
    fn test_to_pg_config() {
        let attrs = ConnectionAttributes {
            port: Some(5433),
            user: Some("app".to_string()),
            database: Some("appdb".to_string()),
            connect_timeout_secs: Some(5),
            ..Default::default()
        };
        let config = attrs.to_pg_config();
        assert_eq!(config.get_hosts().len(), 1);
        assert!(matches!(
            &config.get_hosts()[0],
            tokio_postgres::config::Host::Tcp(host) if host == "localhost"
        ));
        assert_eq!(config.get_ports(), &[5433]);
        assert_eq!(config.get_user(), Some("app"));
        assert_eq!(config.get_dbname(), Some("appdb"));
        assert_eq!(config.get_connect_timeout(), Some(&Duration::from_secs(5)));
    }

    #[test]
    fn test_params_from_str() {
        assert_eq!(
            ConnectionParams::from("postgres://localhost/test"),
            ConnectionParams::Uri("postgres://localhost/test".to_string())
        );
    }
}
