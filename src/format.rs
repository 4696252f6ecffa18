use crate::bitbucket::{Change, PullRequest};

pub const NO_PULL_REQUESTS: &str = "No pull requests found.";
pub const NO_CHANGES: &str = "No changes found in the pull request.";

/// Marker substituted for any field the server omitted.
const NULL_FIELD: &str = "None";

fn field<T: std::fmt::Display>(value: Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => NULL_FIELD.to_string(),
    }
}

/// Render pull requests as labeled text blocks, preserving server order and
/// separating blocks with a single blank line.
pub fn pull_requests(prs: &[PullRequest]) -> String {
    if prs.is_empty() {
        return NO_PULL_REQUESTS.to_string();
    }
    let blocks: Vec<String> = prs
        .iter()
        .map(|pr| {
            format!(
                "ID: {}\nTitle: {}\nState: {}\nAuthor: {}\n",
                field(pr.id),
                field(pr.title.as_deref()),
                field(pr.state.as_deref()),
                field(pr.author_name()),
            )
        })
        .collect();
    blocks.join("\n")
}

/// Render a pull request's changed files, same block and separator rules as
/// the pull-request listing.
pub fn changes(changes: &[Change]) -> String {
    if changes.is_empty() {
        return NO_CHANGES.to_string();
    }
    let blocks: Vec<String> = changes
        .iter()
        .map(|change| {
            format!(
                "Path: {}\nType: {}\nAdded: {}\nRemoved: {}\n",
                field(change.path_string()),
                field(change.change_type.as_deref()),
                field(change.lines_added),
                field(change.lines_removed),
            )
        })
        .collect();
    blocks.join("\n")
}
