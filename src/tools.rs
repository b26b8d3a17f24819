use serde_json::{json, Value};
use tracing::debug;

use crate::backend::JobSearchBackend;
use crate::format::format_search_outcome;
use crate::model::ToolOutput;
use crate::validate::validate_query;

pub const SEARCH_TOOL: &str = "search_linkedin_jobs";

pub fn tool_descriptors() -> Vec<Value> {
    vec![json!({
        "name": SEARCH_TOOL,
        "description": "Search for jobs on LinkedIn with advanced filtering options. Returns job listings with position titles, company names, locations, salary information, and application links.",
        "inputSchema": {
            "type": "object",
            "required": ["keyword", "location"],
            "properties": {
                "keyword": {
                    "type": "string",
                    "description": "Job title or keywords to search for (e.g., 'software engineer', 'product manager')"
                },
                "location": {
                    "type": "string",
                    "description": "Location to search in (e.g., 'San Francisco', 'New York', 'remote')"
                },
                "dateSincePosted": {
                    "type": "string",
                    "enum": ["past month", "past week", "24hr", ""],
                    "description": "Filter by posting date"
                },
                "jobType": {
                    "type": "string",
                    "enum": ["full time", "part time", "contract", "temporary", "volunteer", "internship", ""],
                    "description": "Type of employment"
                },
                "remoteFilter": {
                    "type": "string",
                    "enum": ["on site", "remote", "hybrid", ""],
                    "description": "Work location type"
                },
                "salary": {
                    "type": "string",
                    "enum": ["40000", "60000", "80000", "100000", "120000", ""],
                    "description": "Minimum salary filter"
                },
                "experienceLevel": {
                    "type": "string",
                    "enum": ["internship", "entry level", "associate", "senior", "director", "executive", ""],
                    "description": "Required experience level"
                },
                "limit": {
                    "type": "string",
                    "description": "Number of jobs to return (1-100, default: 10)"
                },
                "sortBy": {
                    "type": "string",
                    "enum": ["recent", "relevant", ""],
                    "description": "Sort results by recency or relevance"
                },
                "page": {
                    "type": "string",
                    "description": "Page number for pagination (default: 0)"
                }
            }
        }
    })]
}

/// Dispatch one tool invocation. Every outcome is a `ToolOutput`: a
/// validation failure, a backend failure, and a success all come back as
/// text, so the serving loop never sees an error from here.
pub async fn call_tool(backend: &dyn JobSearchBackend, name: &str, args: &Value) -> ToolOutput {
    if name != SEARCH_TOOL {
        return ToolOutput::error(format!("Unknown tool: {name}"));
    }

    let query = match validate_query(args) {
        Ok(query) => query,
        Err(e) => return ToolOutput::error(e.to_string()),
    };

    // Query echo goes to the diagnostic channel, never to stdout.
    debug!(
        "LinkedIn query: {}",
        serde_json::to_string(&query).unwrap_or_else(|_| "<unserializable>".into())
    );

    let outcome = backend.search(&query).await;
    format_search_outcome(outcome, &query.keyword, &query.location)
}
