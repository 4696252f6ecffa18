use serde_json::json;

use crate::bitbucket::BitbucketClient;
use crate::error::{Error, Result};
use crate::format;
use crate::tools::ToolDefinition;

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "get_pull_requests_changes".into(),
        description: "List the files changed by a Bitbucket pull request.".into(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "project": {
                    "type": "string",
                    "description": "Project key"
                },
                "repository": {
                    "type": "string",
                    "description": "Repository slug"
                },
                "pull_request_id": {
                    "type": "integer",
                    "description": "Pull request ID"
                }
            },
            "required": ["project", "repository", "pull_request_id"]
        }),
    }
}

pub async fn execute(client: &BitbucketClient, input: &serde_json::Value) -> Result<String> {
    let project = input["project"].as_str().ok_or_else(|| {
        Error::Tool("get_pull_requests_changes: missing 'project' parameter".into())
    })?;
    let repository = input["repository"].as_str().ok_or_else(|| {
        Error::Tool("get_pull_requests_changes: missing 'repository' parameter".into())
    })?;
    let pull_request_id = input["pull_request_id"].as_u64().ok_or_else(|| {
        Error::Tool("get_pull_requests_changes: missing 'pull_request_id' parameter".into())
    })?;

    let changes = client
        .list_changes(project, repository, pull_request_id)
        .await?;
    Ok(format::changes(&changes))
}
