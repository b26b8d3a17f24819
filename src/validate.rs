use serde_json::Value;

use crate::error::{JobSearchError, Result};
use crate::model::{
    DateSincePosted, ExperienceLevel, JobType, RemoteFilter, SalaryFloor, SearchQuery, SortBy,
};

/// Validate an arbitrary argument mapping against the tool schema.
///
/// Every violated field is collected before failing, so the caller sees
/// all problems at once. Empty-string filter values count as unset and
/// are dropped from the resulting query.
pub fn validate_query(args: &Value) -> Result<SearchQuery> {
    let mut violations = Vec::new();

    let keyword = required_string(args, "keyword", &mut violations);
    let location = required_string(args, "location", &mut violations);

    let date_since_posted = enum_field(
        args,
        "dateSincePosted",
        DateSincePosted::ALLOWED,
        DateSincePosted::from_wire,
        &mut violations,
    );
    let job_type = enum_field(
        args,
        "jobType",
        JobType::ALLOWED,
        JobType::from_wire,
        &mut violations,
    );
    let remote_filter = enum_field(
        args,
        "remoteFilter",
        RemoteFilter::ALLOWED,
        RemoteFilter::from_wire,
        &mut violations,
    );
    let salary = enum_field(
        args,
        "salary",
        SalaryFloor::ALLOWED,
        SalaryFloor::from_wire,
        &mut violations,
    );
    let experience_level = enum_field(
        args,
        "experienceLevel",
        ExperienceLevel::ALLOWED,
        ExperienceLevel::from_wire,
        &mut violations,
    );

    // sortBy is the one filter whose default is not unset.
    let sort_by = match args.get("sortBy") {
        None => Some(SortBy::Recent),
        Some(value) => match value.as_str() {
            Some("") => None,
            Some(s) => match SortBy::from_wire(s) {
                Some(v) => Some(v),
                None => {
                    violations.push(enum_violation("sortBy", SortBy::ALLOWED));
                    None
                }
            },
            None => {
                violations.push(enum_violation("sortBy", SortBy::ALLOWED));
                None
            }
        },
    };

    let limit = text_field(args, "limit", "10", &mut violations);
    let page = text_field(args, "page", "0", &mut violations);

    if !violations.is_empty() {
        return Err(JobSearchError::Validation(violations));
    }

    Ok(SearchQuery {
        // violations is empty, so both required fields were present
        keyword: keyword.unwrap_or_default(),
        location: location.unwrap_or_default(),
        date_since_posted,
        job_type,
        remote_filter,
        salary,
        experience_level,
        limit,
        sort_by,
        page,
    })
}

fn required_string(args: &Value, field: &str, violations: &mut Vec<String>) -> Option<String> {
    match args.get(field) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            violations.push(format!("{field}: must be a string"));
            None
        }
        None => {
            violations.push(format!("{field}: required"));
            None
        }
    }
}

fn text_field(args: &Value, field: &str, default: &str, violations: &mut Vec<String>) -> String {
    match args.get(field) {
        None => default.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(_) => {
            violations.push(format!("{field}: must be a string"));
            default.to_string()
        }
    }
}

fn enum_field<T>(
    args: &Value,
    field: &str,
    allowed: &[&str],
    parse: impl Fn(&str) -> Option<T>,
    violations: &mut Vec<String>,
) -> Option<T> {
    let value = args.get(field)?;
    let Some(s) = value.as_str() else {
        violations.push(enum_violation(field, allowed));
        return None;
    };
    if s.is_empty() {
        return None;
    }
    match parse(s) {
        Some(v) => Some(v),
        None => {
            violations.push(enum_violation(field, allowed));
            None
        }
    }
}

fn enum_violation(field: &str, allowed: &[&str]) -> String {
    let list = allowed
        .iter()
        .map(|v| format!("\"{v}\""))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{field}: must be one of {list}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_required_fields_are_all_reported() {
        let err = validate_query(&json!({})).unwrap_err();
        let JobSearchError::Validation(violations) = err else {
            panic!("expected a validation error");
        };
        assert_eq!(violations.len(), 2);
        assert!(violations[0].starts_with("keyword:"));
        assert!(violations[1].starts_with("location:"));
    }

    #[test]
    fn missing_location_names_only_location() {
        let err = validate_query(&json!({ "keyword": "rust" })).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("location: required"));
        assert!(!text.contains("keyword"));
    }

    #[test]
    fn non_string_required_field_is_rejected() {
        let err = validate_query(&json!({ "keyword": 42, "location": "Berlin" })).unwrap_err();
        assert!(err.to_string().contains("keyword: must be a string"));
    }

    #[test]
    fn out_of_enumeration_value_names_the_field() {
        let args = json!({
            "keyword": "rust",
            "location": "Berlin",
            "jobType": "freelance"
        });
        let err = validate_query(&args).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("jobType: must be one of"));
        assert!(text.contains("\"full time\""));
    }

    #[test]
    fn defaults_apply_when_fields_are_absent() {
        let query = validate_query(&json!({ "keyword": "rust", "location": "Berlin" })).unwrap();
        assert_eq!(query.limit, "10");
        assert_eq!(query.page, "0");
        assert_eq!(query.sort_by, Some(SortBy::Recent));
        assert_eq!(query.date_since_posted, None);
        assert_eq!(query.job_type, None);
    }

    #[test]
    fn empty_string_filters_normalize_to_unset() {
        let args = json!({
            "keyword": "rust",
            "location": "Berlin",
            "dateSincePosted": "",
            "jobType": "",
            "remoteFilter": "",
            "salary": "",
            "experienceLevel": "",
            "sortBy": ""
        });
        let query = validate_query(&args).unwrap();
        assert_eq!(query.date_since_posted, None);
        assert_eq!(query.job_type, None);
        assert_eq!(query.remote_filter, None);
        assert_eq!(query.salary, None);
        assert_eq!(query.experience_level, None);
        assert_eq!(query.sort_by, None);

        let forwarded = serde_json::to_value(&query).unwrap();
        let keys: Vec<&String> = forwarded.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 4); // keyword, location, limit, page
    }

    #[test]
    fn explicit_filters_survive_normalization() {
        let args = json!({
            "keyword": "rust",
            "location": "remote",
            "remoteFilter": "remote",
            "experienceLevel": "senior",
            "limit": "25"
        });
        let query = validate_query(&args).unwrap();
        assert_eq!(query.remote_filter, Some(RemoteFilter::Remote));
        assert_eq!(query.experience_level, Some(ExperienceLevel::Senior));
        assert_eq!(query.limit, "25");

        let forwarded = serde_json::to_value(&query).unwrap();
        let obj = forwarded.as_object().unwrap();
        assert_eq!(obj["remoteFilter"], "remote");
        assert_eq!(obj["experienceLevel"], "senior");
        assert!(!obj.contains_key("jobType"));
    }

    #[test]
    fn limit_and_page_accept_arbitrary_text() {
        // Documented intent is 1-100, but the contract forwards text as-is.
        let args = json!({
            "keyword": "rust",
            "location": "Berlin",
            "limit": "not-a-number",
            "page": "-3"
        });
        let query = validate_query(&args).unwrap();
        assert_eq!(query.limit, "not-a-number");
        assert_eq!(query.page, "-3");
    }

    #[test]
    fn non_string_limit_is_rejected() {
        let err =
            validate_query(&json!({ "keyword": "rust", "location": "Berlin", "limit": 10 }))
                .unwrap_err();
        assert!(err.to_string().contains("limit: must be a string"));
    }
}
