//! OpenAI-compatible chat-completions status model.
//!
//! The model is asked to answer with exactly `STATUS|CONFIDENCE`. Anything
//! else is a [`ClassificationError`]; no verdict is ever guessed.
//!
//! Labelled profiles loaded with [`parse_examples`] are replayed as
//! user/assistant turns ahead of the real request.

use std::fmt::Write as _;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use scout_config::ClassifierConfig;
use scout_core::entities::ExperienceEntry;
use scout_core::enums::{ConfidenceLabel, ProfileStatus};
use scout_core::signals::is_at_reference_company;
use scout_refresh::{ClassificationError, ClassificationRequest, ModelVerdict, StatusModel};

use crate::http::check_response;

const SYSTEM_PROMPT: &str = "\
You classify the career status of people tracked by a venture scout.

Answer with exactly one line in the form STATUS|CONFIDENCE and nothing else.
STATUS is one of: stealth, building_in_public, recently_quit, currently_employed.
CONFIDENCE is one of: high, medium, low.

stealth: the current role is a founder or builder role at an unnamed or \"Stealth\" company,
or the person left a reference company some months ago and describes themselves vaguely
(\"building\", \"exploring\", \"something new\").
building_in_public: the current role is a founder, co-founder or CEO role at a named company
that is not one of the reference companies, or the headline openly says what they build.
recently_quit: the most recent role ended within roughly the last four months and nothing
new has started, or the headline says \"ex-\" or \"former\".
currently_employed: an ongoing role at an established company with no founder signals.

Use high only when the signals are unambiguous and dated. Use low when dates are missing,
titles are vague, or the headline contradicts the work history. Use medium otherwise.";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// A labelled profile from the examples file, one JSON object per line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusExample {
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub recent_experience: ExampleRole,
    pub assigned_status: ProfileStatus,
    #[serde(default)]
    pub confidence: Option<ConfidenceLabel>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExampleRole {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub date_range: Option<String>,
}

/// Reads labelled examples from JSONL, keeping the first `per_status` of
/// each status in file order. Unreadable lines are skipped with a warning.
#[must_use]
pub fn parse_examples(jsonl: &str, per_status: usize) -> Vec<StatusExample> {
    let mut parsed = Vec::new();
    for (index, line) in jsonl.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<StatusExample>(line) {
            Ok(example) => parsed.push(example),
            Err(error) => {
                tracing::warn!(line = index + 1, %error, "skipping unreadable status example");
            }
        }
    }

    let selected: Vec<StatusExample> = ProfileStatus::ALL
        .into_iter()
        .flat_map(|status| {
            parsed
                .iter()
                .filter(move |example| example.assigned_status == status)
                .take(per_status)
                .cloned()
        })
        .collect();
    tracing::debug!(read = parsed.len(), selected = selected.len(), "loaded status examples");
    selected
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

pub struct OpenAiStatusModel {
    http: reqwest::Client,
    config: ClassifierConfig,
    /// Rendered `(user, assistant)` turns.
    examples: Vec<(String, String)>,
}

impl OpenAiStatusModel {
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent("scout/0.1")
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .expect("reqwest client should build"),
            config,
            examples: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_examples(mut self, examples: &[StatusExample]) -> Self {
        self.examples = examples
            .iter()
            .map(|example| (render_example(example), render_answer(example)))
            .collect();
        self
    }

    fn messages<'a>(&'a self, prompt: &'a str) -> Vec<ChatMessage<'a>> {
        let mut messages = Vec::with_capacity(self.examples.len() * 2 + 2);
        messages.push(ChatMessage {
            role: "system",
            content: SYSTEM_PROMPT,
        });
        for (question, answer) in &self.examples {
            messages.push(ChatMessage {
                role: "user",
                content: question,
            });
            messages.push(ChatMessage {
                role: "assistant",
                content: answer,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });
        messages
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl StatusModel for OpenAiStatusModel {
    #[tracing::instrument(level = "debug", skip_all, fields(profile = %request.profile))]
    async fn classify_request(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ModelVerdict, ClassificationError> {
        let prompt = render_prompt(request);
        let body = ChatRequest {
            model: &self.config.model,
            temperature: self.config.temperature,
            messages: self.messages(&prompt),
        };

        let resp = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ClassificationError::Transport(e.to_string()))?;
        let resp = check_response(resp).await?;
        let text = resp
            .text()
            .await
            .map_err(|e| ClassificationError::Transport(e.to_string()))?;
        let reply = extract_reply(&text)?;
        let verdict = parse_verdict(&reply)?;
        tracing::debug!(reply = reply.as_str(), "model replied");
        Ok(verdict)
    }
}

/// The first choice's message content.
fn extract_reply(body: &str) -> Result<String, ClassificationError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|_| ClassificationError::Malformed {
            reply: body.chars().take(200).collect(),
        })?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(ClassificationError::EmptyResponse)
}

/// Strict `STATUS|CONFIDENCE` parse. Case and surrounding quotes or
/// backticks are tolerated, nothing else.
fn parse_verdict(reply: &str) -> Result<ModelVerdict, ClassificationError> {
    let malformed = || ClassificationError::Malformed {
        reply: reply.to_string(),
    };
    let cleaned = reply.trim().trim_matches(['`', '"', '\'']);
    if cleaned.lines().count() != 1 {
        return Err(malformed());
    }
    let (status, confidence) = cleaned.split_once('|').ok_or_else(malformed)?;
    Ok(ModelVerdict {
        status: ProfileStatus::parse_label(status).ok_or_else(malformed)?,
        confidence: ConfidenceLabel::parse_label(confidence).ok_or_else(malformed)?,
    })
}

fn render_prompt(request: &ClassificationRequest) -> String {
    let mut prompt = String::new();
    let _ = writeln!(prompt, "Today: {}", Utc::now().format("%B %d, %Y"));
    let _ = writeln!(prompt, "Stored status: {}", request.current_status);
    let _ = writeln!(
        prompt,
        "Name: {}",
        request.full_name.as_deref().unwrap_or("(unknown)")
    );
    let _ = writeln!(
        prompt,
        "Headline: {}",
        request.headline.as_deref().unwrap_or("(none)")
    );
    let _ = writeln!(prompt, "Current role: {}", describe(request.current_role.as_ref()));
    let _ = writeln!(prompt, "Prior role: {}", describe(request.prior_role.as_ref()));
    let references: Vec<&str> = request.reference_companies.iter().map(String::as_str).collect();
    let _ = writeln!(prompt, "Reference companies: {}", references.join(", "));
    let _ = writeln!(
        prompt,
        "Current role at a reference company: {}",
        yes_no(
            request
                .current_role
                .as_ref()
                .is_some_and(|role| is_at_reference_company(role, &request.reference_companies))
        )
    );
    let _ = writeln!(
        prompt,
        "Senior operator: {}",
        yes_no(request.signals.is_senior_operator)
    );
    let _ = write!(
        prompt,
        "Repeat founder: {}",
        yes_no(request.signals.is_repeat_founder)
    );
    prompt
}

fn render_example(example: &StatusExample) -> String {
    let role = &example.recent_experience;
    let entry = ExperienceEntry {
        company: role.company.clone().unwrap_or_default(),
        title: role.title.clone().unwrap_or_default(),
        start: None,
        end: None,
        company_linkedin_url: None,
    };
    let period = role
        .date_range
        .as_deref()
        .map(str::trim)
        .filter(|range| !range.is_empty())
        .unwrap_or("dates unknown");
    format!(
        "Headline: {}\nCurrent role: {} ({period})",
        example.headline.as_deref().unwrap_or("(none)"),
        entry.label()
    )
}

fn render_answer(example: &StatusExample) -> String {
    format!(
        "{}|{}",
        example.assigned_status,
        example.confidence.unwrap_or(ConfidenceLabel::High)
    )
}

fn describe(role: Option<&ExperienceEntry>) -> String {
    let Some(role) = role else {
        return "(none)".to_string();
    };
    let month = |d: Option<chrono::NaiveDate>| d.map(|d| d.format("%b %Y").to_string());
    let period = match (month(role.start), month(role.end)) {
        (Some(start), Some(end)) => format!("{start} - {end}"),
        (Some(start), None) => format!("{start} - Present"),
        (None, Some(end)) => format!("until {end}"),
        (None, None) => "dates unknown".to_string(),
    };
    format!("{} ({period})", role.label())
}

const fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}
