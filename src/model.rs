use serde::Serialize;
use serde_json::{json, Value};

/// A validated job-search query. Filters left unset are `None` and are
/// never serialized, so the query forwarded to the backend only carries
/// fields the caller actually set.
#[derive(Debug, Clone, Serialize)]
pub struct SearchQuery {
    pub keyword: String,
    pub location: String,
    #[serde(rename = "dateSincePosted", skip_serializing_if = "Option::is_none")]
    pub date_since_posted: Option<DateSincePosted>,
    #[serde(rename = "jobType", skip_serializing_if = "Option::is_none")]
    pub job_type: Option<JobType>,
    #[serde(rename = "remoteFilter", skip_serializing_if = "Option::is_none")]
    pub remote_filter: Option<RemoteFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<SalaryFloor>,
    #[serde(rename = "experienceLevel", skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<ExperienceLevel>,
    /// Forwarded as-is; the backend copes with non-numeric text.
    pub limit: String,
    #[serde(rename = "sortBy", skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortBy>,
    pub page: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DateSincePosted {
    #[serde(rename = "past month")]
    PastMonth,
    #[serde(rename = "past week")]
    PastWeek,
    #[serde(rename = "24hr")]
    Last24Hours,
}

impl DateSincePosted {
    pub const ALLOWED: &'static [&'static str] = &["past month", "past week", "24hr", ""];

    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "past month" => Some(Self::PastMonth),
            "past week" => Some(Self::PastWeek),
            "24hr" => Some(Self::Last24Hours),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JobType {
    #[serde(rename = "full time")]
    FullTime,
    #[serde(rename = "part time")]
    PartTime,
    #[serde(rename = "contract")]
    Contract,
    #[serde(rename = "temporary")]
    Temporary,
    #[serde(rename = "volunteer")]
    Volunteer,
    #[serde(rename = "internship")]
    Internship,
}

impl JobType {
    pub const ALLOWED: &'static [&'static str] = &[
        "full time",
        "part time",
        "contract",
        "temporary",
        "volunteer",
        "internship",
        "",
    ];

    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "full time" => Some(Self::FullTime),
            "part time" => Some(Self::PartTime),
            "contract" => Some(Self::Contract),
            "temporary" => Some(Self::Temporary),
            "volunteer" => Some(Self::Volunteer),
            "internship" => Some(Self::Internship),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RemoteFilter {
    #[serde(rename = "on site")]
    OnSite,
    #[serde(rename = "remote")]
    Remote,
    #[serde(rename = "hybrid")]
    Hybrid,
}

impl RemoteFilter {
    pub const ALLOWED: &'static [&'static str] = &["on site", "remote", "hybrid", ""];

    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "on site" => Some(Self::OnSite),
            "remote" => Some(Self::Remote),
            "hybrid" => Some(Self::Hybrid),
            _ => None,
        }
    }
}

/// Minimum yearly salary, as the fixed buckets the provider understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SalaryFloor {
    #[serde(rename = "40000")]
    Min40k,
    #[serde(rename = "60000")]
    Min60k,
    #[serde(rename = "80000")]
    Min80k,
    #[serde(rename = "100000")]
    Min100k,
    #[serde(rename = "120000")]
    Min120k,
}

impl SalaryFloor {
    pub const ALLOWED: &'static [&'static str] =
        &["40000", "60000", "80000", "100000", "120000", ""];

    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "40000" => Some(Self::Min40k),
            "60000" => Some(Self::Min60k),
            "80000" => Some(Self::Min80k),
            "100000" => Some(Self::Min100k),
            "120000" => Some(Self::Min120k),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExperienceLevel {
    #[serde(rename = "internship")]
    Internship,
    #[serde(rename = "entry level")]
    EntryLevel,
    #[serde(rename = "associate")]
    Associate,
    #[serde(rename = "senior")]
    Senior,
    #[serde(rename = "director")]
    Director,
    #[serde(rename = "executive")]
    Executive,
}

impl ExperienceLevel {
    pub const ALLOWED: &'static [&'static str] = &[
        "internship",
        "entry level",
        "associate",
        "senior",
        "director",
        "executive",
        "",
    ];

    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "internship" => Some(Self::Internship),
            "entry level" => Some(Self::EntryLevel),
            "associate" => Some(Self::Associate),
            "senior" => Some(Self::Senior),
            "director" => Some(Self::Director),
            "executive" => Some(Self::Executive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortBy {
    #[serde(rename = "recent")]
    Recent,
    #[serde(rename = "relevant")]
    Relevant,
}

impl SortBy {
    pub const ALLOWED: &'static [&'static str] = &["recent", "relevant", ""];

    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "recent" => Some(Self::Recent),
            "relevant" => Some(Self::Relevant),
            _ => None,
        }
    }
}

/// Final tool result: one text block plus an error flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }

    /// MCP tool-result wire form; `isError` only appears on failures.
    pub fn into_value(self) -> Value {
        let mut value = json!({
            "content": [
                { "type": "text", "text": self.text }
            ]
        });
        if self.is_error {
            value["isError"] = Value::Bool(true);
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_filters_are_not_serialized() {
        let query = SearchQuery {
            keyword: "rust developer".into(),
            location: "Berlin".into(),
            date_since_posted: None,
            job_type: Some(JobType::FullTime),
            remote_filter: None,
            salary: None,
            experience_level: None,
            limit: "10".into(),
            sort_by: Some(SortBy::Recent),
            page: "0".into(),
        };
        let value = serde_json::to_value(&query).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj["keyword"], "rust developer");
        assert_eq!(obj["jobType"], "full time");
        assert_eq!(obj["sortBy"], "recent");
        assert!(!obj.contains_key("dateSincePosted"));
        assert!(!obj.contains_key("remoteFilter"));
        assert!(!obj.contains_key("salary"));
        assert!(!obj.contains_key("experienceLevel"));
    }

    #[test]
    fn wire_values_round_trip() {
        assert_eq!(
            DateSincePosted::from_wire("past week"),
            Some(DateSincePosted::PastWeek)
        );
        assert_eq!(JobType::from_wire("volunteer"), Some(JobType::Volunteer));
        assert_eq!(RemoteFilter::from_wire("hybrid"), Some(RemoteFilter::Hybrid));
        assert_eq!(SalaryFloor::from_wire("100000"), Some(SalaryFloor::Min100k));
        assert_eq!(
            ExperienceLevel::from_wire("entry level"),
            Some(ExperienceLevel::EntryLevel)
        );
        assert_eq!(SortBy::from_wire("relevant"), Some(SortBy::Relevant));
        assert_eq!(JobType::from_wire("freelance"), None);
    }

    #[test]
    fn tool_output_wire_form() {
        let ok = ToolOutput::ok("fine").into_value();
        assert_eq!(ok["content"][0]["text"], "fine");
        assert!(ok.get("isError").is_none());

        let err = ToolOutput::error("broken").into_value();
        assert_eq!(err["content"][0]["type"], "text");
        assert_eq!(err["isError"], true);
    }
}
