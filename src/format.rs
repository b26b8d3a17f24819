use serde_json::{Map, Value};
use tracing::error;

use crate::error::{JobSearchError, Result};
use crate::model::ToolOutput;

/// Turn a backend call outcome into the final text block.
///
/// This is the last defensive boundary: whatever the backend returned,
/// the caller gets text. A failed call, a non-array payload, and a
/// malformed individual listing each degrade separately; only the last
/// leaves the rest of the response intact.
pub fn format_search_outcome(outcome: Result<Value>, keyword: &str, location: &str) -> ToolOutput {
    let payload = match outcome {
        Ok(payload) => payload,
        Err(e) => {
            error!("LinkedIn API call failed: {e}");
            return ToolOutput::error(format!(
                "Error calling LinkedIn API: {e}\n\n\
                 This might be due to:\n\
                 - LinkedIn rate limiting\n\
                 - Network issues\n\
                 - Changes to LinkedIn's website structure\n\n\
                 Try again in a few moments."
            ));
        }
    };

    let Some(jobs) = payload.as_array() else {
        let e = JobSearchError::MalformedResponse(format!("expected an array, got: {payload}"));
        error!("{e}");
        return ToolOutput::error(
            "Received invalid response from LinkedIn API. \
             The API may be experiencing issues or have changed its format.",
        );
    };

    if jobs.is_empty() {
        return ToolOutput::ok(format!(
            "No jobs found for \"{keyword}\" in \"{location}\". \
             Try adjusting your search criteria."
        ));
    }

    let mut text = format!(
        "Found {} job(s) for \"{keyword}\" in \"{location}\":\n\n",
        jobs.len()
    );
    for (index, job) in jobs.iter().enumerate() {
        match render_listing(index, job) {
            Some(block) => text.push_str(&block),
            None => {
                error!("error processing job {index}: {job}");
                text.push_str(&format!(
                    "{}. [Error processing this job listing]\n\n",
                    index + 1
                ));
            }
        }
    }
    ToolOutput::ok(text)
}

/// Render one listing as a numbered block, or `None` when the entry is
/// not even an object. Individual fields are never trusted to be present.
fn render_listing(index: usize, job: &Value) -> Option<String> {
    let job = job.as_object()?;

    let position = text_field(job, "position").unwrap_or("Unknown Position");
    let company = text_field(job, "company").unwrap_or("Unknown Company");
    let location = text_field(job, "location").unwrap_or("Unknown Location");
    let posted = text_field(job, "agoTime")
        .or_else(|| text_field(job, "date"))
        .unwrap_or("Recently");

    let mut block = format!("{}. {position}\n", index + 1);
    block.push_str(&format!("   Company: {company}\n"));
    block.push_str(&format!("   Location: {location}\n"));
    block.push_str(&format!("   Posted: {posted}\n"));
    if let Some(salary) = text_field(job, "salary") {
        block.push_str(&format!("   Salary: {salary}\n"));
    }
    if let Some(job_url) = text_field(job, "jobUrl") {
        block.push_str(&format!("   Apply: {job_url}\n"));
    }
    block.push('\n');
    Some(block)
}

fn text_field<'a>(job: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    job.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JobSearchError;
    use serde_json::json;

    #[test]
    fn empty_results_produce_the_plain_no_jobs_message() {
        let output = format_search_outcome(Ok(json!([])), "rust developer", "Berlin");
        assert!(!output.is_error);
        assert_eq!(
            output.text,
            "No jobs found for \"rust developer\" in \"Berlin\". \
             Try adjusting your search criteria."
        );
    }

    #[test]
    fn full_listing_renders_every_line() {
        let jobs = json!([{
            "position": "Senior Rust Engineer",
            "company": "Ferrous Ltd",
            "location": "Berlin, Germany",
            "agoTime": "2 days ago",
            "salary": "$120,000",
            "jobUrl": "https://www.linkedin.com/jobs/view/123"
        }]);
        let output = format_search_outcome(Ok(jobs), "rust", "Berlin");
        assert!(!output.is_error);
        assert!(output
            .text
            .starts_with("Found 1 job(s) for \"rust\" in \"Berlin\":\n\n"));
        assert!(output.text.contains("1. Senior Rust Engineer\n"));
        assert!(output.text.contains("   Company: Ferrous Ltd\n"));
        assert!(output.text.contains("   Location: Berlin, Germany\n"));
        assert!(output.text.contains("   Posted: 2 days ago\n"));
        assert!(output.text.contains("   Salary: $120,000\n"));
        assert!(output
            .text
            .contains("   Apply: https://www.linkedin.com/jobs/view/123\n"));
    }

    #[test]
    fn missing_optional_fields_omit_their_lines() {
        let jobs = json!([{
            "position": "Backend Engineer",
            "company": "Acme",
            "location": "Remote"
        }]);
        let output = format_search_outcome(Ok(jobs), "backend", "remote");
        assert!(output.text.contains("1. Backend Engineer\n"));
        assert!(output.text.contains("   Posted: Recently\n"));
        assert!(!output.text.contains("Salary:"));
        assert!(!output.text.contains("Apply:"));
    }

    #[test]
    fn absent_core_fields_fall_back_to_placeholders() {
        let output = format_search_outcome(Ok(json!([{}])), "x", "y");
        assert!(output.text.contains("1. Unknown Position\n"));
        assert!(output.text.contains("   Company: Unknown Company\n"));
        assert!(output.text.contains("   Location: Unknown Location\n"));
        assert!(output.text.contains("   Posted: Recently\n"));
    }

    #[test]
    fn date_is_used_when_ago_time_is_absent() {
        let jobs = json!([{ "position": "Dev", "date": "2026-07-30" }]);
        let output = format_search_outcome(Ok(jobs), "dev", "anywhere");
        assert!(output.text.contains("   Posted: 2026-07-30\n"));
    }

    #[test]
    fn malformed_middle_entry_does_not_abort_the_batch() {
        let jobs = json!([
            { "position": "First" },
            42,
            { "position": "Third" }
        ]);
        let output = format_search_outcome(Ok(jobs), "x", "y");
        assert!(!output.is_error);
        assert!(output.text.contains("1. First\n"));
        assert!(output.text.contains("2. [Error processing this job listing]\n\n"));
        assert!(output.text.contains("3. Third\n"));
    }

    #[test]
    fn backend_failure_is_error_flagged_with_the_underlying_message() {
        let outcome = Err(JobSearchError::Backend("connection refused".into()));
        let output = format_search_outcome(outcome, "x", "y");
        assert!(output.is_error);
        assert!(output.text.starts_with("Error calling LinkedIn API:"));
        assert!(output.text.contains("connection refused"));
        assert!(output.text.contains("rate limiting"));
        assert!(output.text.contains("Try again in a few moments."));
    }

    #[test]
    fn non_array_payload_is_a_distinct_error() {
        let output = format_search_outcome(Ok(json!({ "jobs": [] })), "x", "y");
        assert!(output.is_error);
        assert!(output.text.contains("invalid response from LinkedIn API"));
        assert!(!output.text.contains("No jobs found"));

        let null_output = format_search_outcome(Ok(Value::Null), "x", "y");
        assert!(null_output.is_error);
        assert_eq!(null_output.text, output.text);
    }

    #[test]
    fn formatting_is_idempotent() {
        let jobs = json!([
            { "position": "A", "company": "B", "salary": "" },
            "garbage",
            { "location": "C", "agoTime": "1 week ago" }
        ]);
        let first = format_search_outcome(Ok(jobs.clone()), "k", "l");
        let second = format_search_outcome(Ok(jobs), "k", "l");
        assert_eq!(first, second);
    }

    #[test]
    fn empty_string_fields_count_as_absent() {
        let jobs = json!([{ "position": "", "salary": "", "jobUrl": "" }]);
        let output = format_search_outcome(Ok(jobs), "x", "y");
        assert!(output.text.contains("1. Unknown Position\n"));
        assert!(!output.text.contains("Salary:"));
        assert!(!output.text.contains("Apply:"));
    }
}
