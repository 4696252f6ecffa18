use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "bitbridge",
    version,
    about = "Bitbucket pull request tools for AI agents, served over HTTP"
)]
pub struct Cli {
    /// Base URL of the Bitbucket server, e.g. https://git.example.com
    #[arg(long, env = "BITBUCKET_URL")]
    pub base_url: String,

    /// Username for Basic authentication against Bitbucket
    #[arg(long, env = "BITBUCKET_USERNAME")]
    pub username: Option<String>,

    /// Password or HTTP access token for Basic authentication
    #[arg(long, env = "BITBUCKET_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Address to bind the HTTP server to
    #[arg(long, env = "BITBRIDGE_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind the HTTP server to
    #[arg(long, env = "BITBRIDGE_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Overall per-request timeout in seconds for upstream calls
    #[arg(long, env = "BITBRIDGE_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Maximum simultaneous outbound connections to Bitbucket
    #[arg(long, env = "BITBRIDGE_MAX_CONNECTIONS", default_value_t = 20)]
    pub max_connections: usize,
}
