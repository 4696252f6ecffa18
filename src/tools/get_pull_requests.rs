use serde_json::json;

use crate::bitbucket::BitbucketClient;
use crate::error::{Error, Result};
use crate::format;
use crate::tools::ToolDefinition;

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "get_pull_requests".into(),
        description: "List the open pull requests in a Bitbucket repository, newest first.".into(),
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
                }
            },
            "required": ["project", "repository"]
        }),
    }
}

pub async fn execute(client: &BitbucketClient, input: &serde_json::Value) -> Result<String> {
    let project = input["project"]
        .as_str()
        .ok_or_else(|| Error::Tool("get_pull_requests: missing 'project' parameter".into()))?;
    let repository = input["repository"]
        .as_str()
        .ok_or_else(|| Error::Tool("get_pull_requests: missing 'repository' parameter".into()))?;

    let prs = client.list_open_pull_requests(project, repository).await?;
    Ok(format::pull_requests(&prs))
}
