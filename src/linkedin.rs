use futures::future::BoxFuture;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use serde_json::{Map, Value};
use tracing::debug;

use crate::backend::JobSearchBackend;
use crate::config::LinkedInConfig;
use crate::error::{JobSearchError, Result};
use crate::model::{
    DateSincePosted, ExperienceLevel, JobType, RemoteFilter, SalaryFloor, SearchQuery, SortBy,
};

/// Batch size of the guest search endpoint.
const PAGE_SIZE: usize = 25;
const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 100;

/// Job-search client for LinkedIn's guest search endpoint. The endpoint
/// returns an HTML fragment of result cards, which we parse into loose
/// JSON objects; fields that cannot be extracted are simply omitted.
pub struct LinkedInClient {
    client: Client,
    base_url: String,
    selectors: Selectors,
}

impl LinkedInClient {
    pub fn new(config: &LinkedInConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| JobSearchError::Config(format!("http client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            selectors: Selectors::new()?,
        })
    }

    fn build_url(&self, query: &SearchQuery, start: usize) -> String {
        let mut url = format!(
            "{}?keywords={}&location={}&start={}",
            self.base_url,
            urlencoding::encode(&query.keyword),
            urlencoding::encode(&query.location),
            start
        );
        if let Some(d) = query.date_since_posted {
            url.push_str("&f_TPR=");
            url.push_str(tpr_code(d));
        }
        if let Some(t) = query.job_type {
            url.push_str("&f_JT=");
            url.push_str(job_type_code(t));
        }
        if let Some(r) = query.remote_filter {
            url.push_str("&f_WT=");
            url.push_str(remote_code(r));
        }
        if let Some(s) = query.salary {
            url.push_str("&f_SB2=");
            url.push_str(salary_code(s));
        }
        if let Some(e) = query.experience_level {
            url.push_str("&f_E=");
            url.push_str(experience_code(e));
        }
        if let Some(s) = query.sort_by {
            url.push_str("&sortBy=");
            url.push_str(sort_code(s));
        }
        url
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| JobSearchError::Backend(e.to_string()))?;
        if !response.status().is_success() {
            return Err(JobSearchError::Backend(format!(
                "HTTP {} from LinkedIn",
                response.status()
            )));
        }
        response
            .text()
            .await
            .map_err(|e| JobSearchError::Backend(e.to_string()))
    }
}

impl JobSearchBackend for LinkedInClient {
    fn search<'a>(&'a self, query: &'a SearchQuery) -> BoxFuture<'a, Result<Value>> {
        Box::pin(async move {
            let limit = effective_limit(&query.limit);
            let page = effective_page(&query.page);
            let mut start = page * limit;
            let mut jobs: Vec<Value> = Vec::new();

            loop {
                let url = self.build_url(query, start);
                debug!("fetching {url}");
                let html = self.fetch_page(&url).await?;
                let batch = parse_listings(&html, &self.selectors);
                if batch.is_empty() {
                    break;
                }
                let batch_len = batch.len();
                jobs.extend(batch);
                if jobs.len() >= limit || batch_len < PAGE_SIZE {
                    break;
                }
                start += PAGE_SIZE;
            }

            jobs.truncate(limit);
            Ok(Value::Array(jobs))
        })
    }
}

/// The caller may send any text for `limit`; garbage degrades to the
/// documented default rather than failing the call.
fn effective_limit(limit: &str) -> usize {
    limit
        .trim()
        .parse::<usize>()
        .unwrap_or(DEFAULT_LIMIT)
        .clamp(1, MAX_LIMIT)
}

fn effective_page(page: &str) -> usize {
    page.trim().parse::<usize>().unwrap_or(0)
}

fn tpr_code(value: DateSincePosted) -> &'static str {
    match value {
        DateSincePosted::PastMonth => "r2592000",
        DateSincePosted::PastWeek => "r604800",
        DateSincePosted::Last24Hours => "r86400",
    }
}

fn job_type_code(value: JobType) -> &'static str {
    match value {
        JobType::FullTime => "F",
        JobType::PartTime => "P",
        JobType::Contract => "C",
        JobType::Temporary => "T",
        JobType::Volunteer => "V",
        JobType::Internship => "I",
    }
}

fn remote_code(value: RemoteFilter) -> &'static str {
    match value {
        RemoteFilter::OnSite => "1",
        RemoteFilter::Remote => "2",
        RemoteFilter::Hybrid => "3",
    }
}

fn salary_code(value: SalaryFloor) -> &'static str {
    match value {
        SalaryFloor::Min40k => "1",
        SalaryFloor::Min60k => "2",
        SalaryFloor::Min80k => "3",
        SalaryFloor::Min100k => "4",
        SalaryFloor::Min120k => "5",
    }
}

fn experience_code(value: ExperienceLevel) -> &'static str {
    match value {
        ExperienceLevel::Internship => "1",
        ExperienceLevel::EntryLevel => "2",
        ExperienceLevel::Associate => "3",
        ExperienceLevel::Senior => "4",
        ExperienceLevel::Director => "5",
        ExperienceLevel::Executive => "6",
    }
}

fn sort_code(value: SortBy) -> &'static str {
    match value {
        SortBy::Recent => "DD",
        SortBy::Relevant => "R",
    }
}

struct Selectors {
    card: Selector,
    title: Selector,
    company: Selector,
    location: Selector,
    time: Selector,
    salary: Selector,
    link: Selector,
}

impl Selectors {
    fn new() -> Result<Self> {
        Ok(Self {
            card: parse_selector("div.base-search-card")?,
            title: parse_selector("h3.base-search-card__title")?,
            company: parse_selector("h4.base-search-card__subtitle a")?,
            location: parse_selector("span.job-search-card__location")?,
            time: parse_selector("time")?,
            salary: parse_selector("span.job-search-card__salary-info")?,
            link: parse_selector("a.base-card__full-link")?,
        })
    }
}

fn parse_selector(source: &str) -> Result<Selector> {
    Selector::parse(source).map_err(|e| JobSearchError::Config(format!("selector {source}: {e}")))
}

fn parse_listings(html: &str, selectors: &Selectors) -> Vec<Value> {
    let document = Html::parse_document(html);
    document
        .select(&selectors.card)
        .map(|card| card_to_value(card, selectors))
        .collect()
}

fn card_to_value(card: ElementRef<'_>, selectors: &Selectors) -> Value {
    let mut job = Map::new();

    if let Some(title) = select_text(card, &selectors.title) {
        job.insert("position".into(), Value::String(title));
    }
    if let Some(company) = select_text(card, &selectors.company) {
        job.insert("company".into(), Value::String(company));
    }
    if let Some(location) = select_text(card, &selectors.location) {
        job.insert("location".into(), Value::String(location));
    }
    if let Some(time) = card.select(&selectors.time).next() {
        if let Some(datetime) = time.value().attr("datetime") {
            job.insert("date".into(), Value::String(datetime.to_string()));
        }
        let ago = clean_text(&time.text().collect::<Vec<_>>().join(" "));
        if !ago.is_empty() {
            job.insert("agoTime".into(), Value::String(ago));
        }
    }
    if let Some(salary) = select_text(card, &selectors.salary) {
        job.insert("salary".into(), Value::String(salary));
    }
    if let Some(href) = card
        .select(&selectors.link)
        .next()
        .and_then(|a| a.value().attr("href"))
    {
        let url = if href.starts_with("http") {
            href.to_string()
        } else {
            format!("https://www.linkedin.com{href}")
        };
        job.insert("jobUrl".into(), Value::String(url));
    }

    Value::Object(job)
}

fn select_text(card: ElementRef<'_>, selector: &Selector) -> Option<String> {
    let element = card.select(selector).next()?;
    let text = clean_text(&element.text().collect::<Vec<_>>().join(" "));
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
