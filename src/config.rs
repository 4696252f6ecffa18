use crate::auth::Credentials;
use crate::cli::Cli;

/// Process configuration, resolved once at startup and passed explicitly to
/// the client and server. Nothing reads the environment after this point.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub credentials: Credentials,
    pub host: String,
    pub port: u16,
    pub http: HttpConfig,
}

/// Tuning knobs for the shared outbound client.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Hard ceiling on simultaneous outbound requests; callers past the
    /// ceiling queue until a slot frees up.
    pub max_connections: usize,
    /// Keep-alive connections retained per host between requests.
    pub max_idle_connections: usize,
    /// Idle connections are dropped after this many seconds.
    pub idle_timeout_secs: u64,
    /// Overall per-request timeout (connect + read).
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            max_connections: 20,
            max_idle_connections: 5,
            idle_timeout_secs: 30,
            timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            base_url: cli.base_url.clone(),
            credentials: Credentials::new(cli.username.clone(), cli.password.clone()),
            host: cli.host.clone(),
            port: cli.port,
            http: HttpConfig {
                max_connections: cli.max_connections,
                timeout_secs: cli.timeout_secs,
                ..HttpConfig::default()
            },
        }
    }
}
