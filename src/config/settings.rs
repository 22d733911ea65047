use serde::Deserialize;

/// Top-level configuration settings for the application.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub hub: HubSettings,
    pub log: LogSettings,
}

/// Configuration settings for the server.
///
/// Defines the address the WebSocket listener binds to and the secret used
/// to verify identity tokens.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
}

/// Configuration settings for the room hub.
#[derive(Debug, Deserialize, Clone)]
pub struct HubSettings {
    pub max_connections: usize,
    /// Display name announced for connections that never authenticated.
    pub anonymous_name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Missing values are filled from `Settings::default()`.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub hub: Option<PartialHubSettings>,
    pub log: Option<PartialLogSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub jwt_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PartialHubSettings {
    pub max_connections: Option<usize>,
    pub anonymous_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLogSettings {
    pub level: Option<String>,
}

impl Default for HubSettings {
    fn default() -> Self {
        Self {
            max_connections: 1000,
            anonymous_name: "anonymous".to_string(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 8080,
                jwt_secret: "change-me".to_string(),
            },
            hub: HubSettings::default(),
            log: LogSettings {
                level: "info".to_string(),
            },
        }
    }
}

impl PartialSettings {
    /// Merges the loaded values onto the defaults.
    pub fn merge_onto(self, default: Settings) -> Settings {
        let server = self.server;
        let hub = self.hub;
        let log = self.log;

        Settings {
            server: ServerSettings {
                host: server
                    .as_ref()
                    .and_then(|s| s.host.clone())
                    .unwrap_or(default.server.host),
                port: server
                    .as_ref()
                    .and_then(|s| s.port)
                    .unwrap_or(default.server.port),
                jwt_secret: server
                    .as_ref()
                    .and_then(|s| s.jwt_secret.clone())
                    .unwrap_or(default.server.jwt_secret),
            },
            hub: HubSettings {
                max_connections: hub
                    .as_ref()
                    .and_then(|h| h.max_connections)
                    .unwrap_or(default.hub.max_connections),
                anonymous_name: hub
                    .as_ref()
                    .and_then(|h| h.anonymous_name.clone())
                    .unwrap_or(default.hub.anonymous_name),
            },
            log: LogSettings {
                level: log
                    .and_then(|l| l.level)
                    .unwrap_or(default.log.level),
            },
        }
    }
}
