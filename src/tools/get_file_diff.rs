use serde_json::json;

use crate::bitbucket::BitbucketClient;
use crate::error::{Error, Result};
use crate::tools::ToolDefinition;

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "get_file_diff".into(),
        description: "Fetch the diff of one file in a Bitbucket pull request, as plain text."
            .into(),
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
                },
                "path": {
                    "type": "string",
                    "description": "File path within the repository"
                }
            },
            "required": ["project", "repository", "pull_request_id", "path"]
        }),
    }
}

pub async fn execute(client: &BitbucketClient, input: &serde_json::Value) -> Result<String> {
    let project = input["project"]
        .as_str()
        .ok_or_else(|| Error::Tool("get_file_diff: missing 'project' parameter".into()))?;
    let repository = input["repository"]
        .as_str()
        .ok_or_else(|| Error::Tool("get_file_diff: missing 'repository' parameter".into()))?;
    let pull_request_id = input["pull_request_id"]
        .as_u64()
        .ok_or_else(|| Error::Tool("get_file_diff: missing 'pull_request_id' parameter".into()))?;
    let path = input["path"]
        .as_str()
        .ok_or_else(|| Error::Tool("get_file_diff: missing 'path' parameter".into()))?;

    // No formatting — the diff goes back exactly as Bitbucket sent it.
    client
        .file_diff(project, repository, pull_request_id, path)
        .await
}
