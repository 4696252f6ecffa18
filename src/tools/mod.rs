pub mod get_file_diff;
pub mod get_pull_requests;
pub mod get_pull_requests_changes;

use serde_json::Value;
use tracing::warn;

use crate::bitbucket::BitbucketClient;
use crate::error::{Error, Result};

/// A tool as advertised to the calling agent runtime.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

pub fn all_definitions() -> Vec<ToolDefinition> {
    vec![
        get_pull_requests::definition(),
        get_pull_requests_changes::definition(),
        get_file_diff::definition(),
    ]
}

pub async fn dispatch(name: &str, input: &Value, client: &BitbucketClient) -> Result<String> {
    match name {
        "get_pull_requests" => get_pull_requests::execute(client, input).await,
        "get_pull_requests_changes" => get_pull_requests_changes::execute(client, input).await,
        "get_file_diff" => get_file_diff::execute(client, input).await,
        _ => Err(Error::Tool(format!("unknown tool: {name}"))),
    }
}

/// Invoke a tool on behalf of an agent. A tool call never surfaces an error
/// to the runtime — failures come back as text in the result.
pub async fn run(name: &str, input: &Value, client: &BitbucketClient) -> String {
    match dispatch(name, input, client).await {
        Ok(text) => text,
        Err(err) => describe_failure(&err),
    }
}

/// Short diagnostic string for a failed operation. Upstream failures carry
/// the status code; transport and processing detail goes to the log only.
pub fn describe_failure(err: &Error) -> String {
    match err {
        Error::Upstream { status } => {
            format!("Error: Bitbucket responded with HTTP status {status}.")
        }
        Error::Transport(msg) => {
            warn!("transport failure: {msg}");
            "Error: could not reach the Bitbucket server.".to_string()
        }
        Error::Tool(msg) => format!("Error: {msg}"),
        other => {
            warn!("unexpected failure: {other}");
            "Error: the Bitbucket response could not be processed.".to_string()
        }
    }
}
