use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Basic-auth credentials, read once at startup and held for the process
/// lifetime. Absent credentials are carried as empty strings — Bitbucket
/// rejects them with a 401 at call time, so nothing fails locally.
#[derive(Debug, Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: Option<String>, password: Option<String>) -> Self {
        Self {
            username: username.unwrap_or_default(),
            password: password.unwrap_or_default(),
        }
    }

    /// `Authorization` header value for these credentials. Pure function of
    /// the pair, recomputed per request.
    pub fn header_value(&self) -> String {
        let raw = format!("{}:{}", self.username, self.password);
        format!("Basic {}", STANDARD.encode(raw))
    }
}
