use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use crate::{model::ModelClient, transcript::Session};

pub const REPORT_PREAMBLE: &str = "You are a clinical documentation expert who converts raw interview transcripts into \
concise, structured, non-diagnostic reports for a medical professional. \
You only include facts the patient stated and never add diagnostic opinions.";

/// Canonical section headings, in report order
pub const SECTION_HEADINGS: [&str; 3] = [
    "Chief Complaint",
    "History of Present Illness (HPI)",
    "Review of Systems (ROS)",
];

const HEADING_STEMS: [&str; 3] = [
    "Chief Complaint",
    "History of Present Illness",
    "Review of Systems",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    pub heading: String,
    pub content: String,
}

/// Structured intake report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    #[serde(rename = "report_title")]
    pub title: String,
    #[serde(rename = "safety_disclaimer")]
    pub disclaimer: String,
    pub sections: Vec<ReportSection>,
}

#[derive(Error, Debug, Clone)]
pub enum SynthesisError {
    #[error("{0}")]
    Model(String),

    #[error("model output is not valid report JSON: {0}")]
    Parse(String),

    #[error("unexpected report shape: {0}")]
    Shape(String),
}

/// What goes in the report position of a response
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ReportOutcome {
    Ready(Report),
    Failed { error: String },
}

impl From<Result<Report, SynthesisError>> for ReportOutcome {
    fn from(result: Result<Report, SynthesisError>) -> Self {
        match result {
            Ok(report) => ReportOutcome::Ready(report),
            Err(e) => ReportOutcome::Failed {
                error: format!("Failed to generate structured report: {}", e),
            },
        }
    }
}

/// Drop a surrounding ``` fence (first and last line) if the model added one
pub fn strip_code_fence(raw: &str) -> &str {
    let text = raw.trim();
    if !(text.starts_with("```") && text.ends_with("```")) {
        return text;
    }
    match (text.find('\n'), text.rfind('\n')) {
        (Some(first), Some(last)) if first < last => text[first + 1..last].trim(),
        _ => text.trim_matches('`').trim(),
    }
}

/// Parse and shape-check a model reply
pub fn parse_report(raw: &str) -> Result<Report, SynthesisError> {
    let mut report: Report = serde_json::from_str(strip_code_fence(raw))
        .map_err(|e| SynthesisError::Parse(e.to_string()))?;

    if report.sections.len() != SECTION_HEADINGS.len() {
        return Err(SynthesisError::Shape(format!(
            "expected {} sections, got {}",
            SECTION_HEADINGS.len(),
            report.sections.len()
        )));
    }

    for ((section, stem), canonical) in report
        .sections
        .iter_mut()
        .zip(HEADING_STEMS)
        .zip(SECTION_HEADINGS)
    {
        if !section.heading.trim().starts_with(stem) {
            return Err(SynthesisError::Shape(format!(
                "expected section '{}', got '{}'",
                canonical, section.heading
            )));
        }
        section.heading = canonical.to_string();
    }

    Ok(report)
}

fn report_prompt(session: &Session) -> String {
    format!(
        r#"Generate a structured, non-diagnostic symptom report based on the following conversation history.
The report must follow this exact JSON format. Only include information explicitly mentioned in the history.

Conversation History:
---
{history}
---

Return ONLY the valid JSON structure without any other text or markdown:
{{
    "report_title": "Symptom Interview Report for [Initial Symptom]",
    "safety_disclaimer": "This is a non-diagnostic, AI-generated intake report and is not a substitute for professional medical evaluation.",
    "sections": [
        {{
            "heading": "Chief Complaint",
            "content": "Patient reports: [Initial Symptom]"
        }},
        {{
            "heading": "History of Present Illness (HPI)",
            "content": "Organize the patient's answers into a clear narrative covering: Onset, Location/Quality, Severity, Duration, Modifying Factors (what makes it better/worse), and Associated Symptoms."
        }},
        {{
            "heading": "Review of Systems (ROS)",
            "content": "List any other systems/symptoms mentioned by the patient."
        }}
    ]
}}"#,
        history = session.transcript()
    )
}

/// Turns a finished transcript into a [`Report`]
#[derive(Clone)]
pub struct ReportSynthesizer {
    model: Arc<dyn ModelClient>,
}

impl ReportSynthesizer {
    pub fn new(model: Arc<dyn ModelClient>) -> Self {
        Self { model }
    }

    /// Single best-effort attempt, no retry
    pub async fn synthesize(&self, session: &Session) -> Result<Report, SynthesisError> {
        info!(
            interview_id = session.id,
            turns = session.turns().len(),
            model = %self.model.model_id(),
            "Synthesizing structured report"
        );

        let raw = self
            .model
            .complete(REPORT_PREAMBLE, &report_prompt(session))
            .await
            .map_err(|e| {
                error!(interview_id = session.id, error = %e, "Error generating report");
                SynthesisError::Model(e.to_string())
            })?;

        parse_report(&raw).inspect_err(|e| {
            error!(interview_id = session.id, error = %e, "Error generating report");
        })
    }
}
