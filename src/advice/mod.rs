//! Boundary to the hosted model that reads local conditions for a service
//! date. The forecast only consumes the footfall index; the narrative is
//! passed through for display.

pub mod gemini;
pub mod placeholder;
pub mod sections;

use crate::models::{ShiftRecord, ShiftType};
use crate::stats::shift_efficiency;
use async_trait::async_trait;
use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::warn;

pub use gemini::GeminiAdviceProvider;
pub use placeholder::{CannedAdvice, PlaceholderAdviceProvider};
pub use sections::{AdviceSections, SectionScan, SectionScanner, TagVocabulary, parse_sections};

pub const NEUTRAL_FOOTFALL: f64 = 1.0;
pub const MAX_SOURCES: usize = 5;
/// Responses shorter than this carry no usable signal.
pub const MIN_USABLE_RESPONSE: usize = 20;

static FOOTFALL_INDEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[FOOTFALL_INDEX:\s*(\d+\.?\d*)\]").expect("footfall index pattern is valid")
});
static FOOTFALL_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[FOOTFALL_INDEX:.*?\]").expect("footfall tag pattern is valid")
});

#[derive(Debug, Clone)]
pub struct AdviceContext {
    pub history: Vec<ShiftRecord>,
    pub location: String,
    pub target_date: NaiveDate,
    pub bookings: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    pub title: String,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdviceResult {
    pub raw_response: String,
    pub sources: Vec<Source>,
    pub footfall_index: f64,
}

#[derive(Debug, Error)]
pub enum AdviceError {
    #[error("advice service is not configured: set GEMINI_API_KEY")]
    MissingCredential,
    #[error("advice request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("advice service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("advice service returned no text")]
    EmptyResponse,
}

#[async_trait]
pub trait AdviceProvider: Send + Sync {
    async fn advise(&self, context: &AdviceContext) -> Result<AdviceResult, AdviceError>;

    /// Whether the provider has what it needs to reach its backend.
    fn is_configured(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Consultation {
    pub result: AdviceResult,
    pub sections: AdviceSections,
    pub placeholder_used: bool,
    pub warning: Option<String>,
}

/// Asks `primary` for advice and substitutes placeholder advice when the
/// call fails or returns too little text. Never fails.
pub async fn consult(
    primary: &dyn AdviceProvider,
    placeholder: &PlaceholderAdviceProvider,
    context: &AdviceContext,
    vocabulary: TagVocabulary,
) -> Consultation {
    let (result, placeholder_used, warning) = match primary.advise(context).await {
        Ok(result) if result.raw_response.trim().chars().count() >= MIN_USABLE_RESPONSE => {
            (result, false, None)
        }
        Ok(_) => {
            warn!(location = %context.location, "advice response too short, using placeholder");
            (
                placeholder.pick(),
                true,
                Some("The advice service returned no usable report; showing placeholder guidance.".to_string()),
            )
        }
        Err(err) => {
            warn!(location = %context.location, "advice request failed: {err}");
            (placeholder.pick(), true, Some(err.to_string()))
        }
    };

    Consultation {
        sections: parse_sections(&result.raw_response, vocabulary),
        result,
        placeholder_used,
        warning,
    }
}

/// Pulls the `[FOOTFALL_INDEX: x]` trailer out of model text. Returns the
/// text without any index tags and the index, `1.0` when absent.
pub fn extract_footfall_index(text: &str) -> (String, f64) {
    let index = FOOTFALL_INDEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|value| value.as_str().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(NEUTRAL_FOOTFALL);
    let stripped = FOOTFALL_TAG.replace_all(text, "").trim().to_string();
    (stripped, index)
}

pub fn build_prompt(context: &AdviceContext, vocabulary: TagVocabulary) -> String {
    let day_name = context.target_date.format("%A");
    let mut prompt = format!(
        "Role: Senior Hospitality Operations Consultant.\n\
         Context: Analyze staffing needs for a restaurant in \"{location}\" for {date} ({day_name}).\n\
         Confirmed Bookings: {bookings} guests.\n",
        location = context.location,
        date = context.target_date,
        bookings = context.bookings,
    );

    if !context.history.is_empty() {
        prompt.push_str(&format!("History: {} logged services.", context.history.len()));
        for shift in ShiftType::ALL {
            let efficiency = shift_efficiency(&context.history, shift);
            prompt.push_str(&format!(
                " {shift}: {:.1} covers per staff, {:.2} spend per head.",
                efficiency.covers_per_staff, efficiency.asph
            ));
        }
        prompt.push('\n');
    }

    prompt.push_str(&format!(
        "\nTasks:\n\
         1. Search for local events (concerts, games), weather forecast, and transport issues near {location}.\n\
         2. Evaluate how these factors will impact walk-in traffic.\n\
         3. Provide a clear FOH (front of house) staffing strategy.\n\n\
         MANDATORY: You must conclude your report with a footfall index multiplier in this format: [FOOTFALL_INDEX: X.X]\n\
         - 1.0 = Baseline\n\
         - < 1.0 = Reduced traffic expected\n\
         - > 1.0 = Surge expected\n\n\
         Sections:\n",
        location = context.location,
    ));
    for (tag, brief) in vocabulary.tags().iter().zip(vocabulary.briefs()) {
        prompt.push_str(&format!("[{tag}] {brief}\n"));
    }
    prompt.push_str("\nTone: Sharp, data-driven, executive summary style.\n");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Scripted {
        reply: Result<String, ()>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AdviceProvider for Scripted {
        async fn advise(&self, _context: &AdviceContext) -> Result<AdviceResult, AdviceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(text) => {
                    let (raw_response, footfall_index) = extract_footfall_index(text);
                    Ok(AdviceResult {
                        raw_response,
                        sources: vec![Source {
                            title: "Met Office".into(),
                            uri: "https://example.org/forecast".into(),
                        }],
                        footfall_index,
                    })
                }
                Err(()) => Err(AdviceError::MissingCredential),
            }
        }
    }

    fn scripted(reply: Result<&str, ()>) -> Scripted {
        Scripted {
            reply: reply.map(str::to_string),
            calls: AtomicUsize::new(0),
        }
    }

    fn context() -> AdviceContext {
        AdviceContext {
            history: Vec::new(),
            location: "London Brixton".into(),
            target_date: NaiveDate::from_ymd_opt(2025, 2, 14).unwrap(),
            bookings: 67,
        }
    }

    fn fallback() -> PlaceholderAdviceProvider {
        PlaceholderAdviceProvider::from_variants(
            vec![CannedAdvice::new("calm", "normal", "none", "hold the roster")],
            TagVocabulary::Tactical,
        )
    }

    #[test]
    fn footfall_index_is_extracted_and_stripped() {
        let (text, index) = extract_footfall_index("[ADVICE] add a runner\n[FOOTFALL_INDEX: 1.2]");
        assert_eq!(text, "[ADVICE] add a runner");
        assert!((index - 1.2).abs() < 1e-9);

        let (text, index) = extract_footfall_index("nothing to see");
        assert_eq!(text, "nothing to see");
        assert_eq!(index, 1.0);
    }

    #[test]
    fn prompt_names_date_and_sections() {
        let prompt = build_prompt(&context(), TagVocabulary::Tactical);
        assert!(prompt.contains("2025-02-14 (Friday)"));
        assert!(prompt.contains("Confirmed Bookings: 67 guests."));
        assert!(prompt.contains("[TACTICAL_ADVICE]"));
        assert!(prompt.contains("[FOOTFALL_INDEX: X.X]"));
    }

    #[tokio::test]
    async fn successful_advice_is_passed_through() {
        let primary = scripted(Ok(
            "[ENVIRONMENT] Heavy rain from 5pm\n[LOGISTICS] Buses diverted\n[OPPORTUNITIES] None\n[TACTICAL_ADVICE] Keep dinner at 3\n[FOOTFALL_INDEX: 0.8]",
        ));
        let consultation = consult(&primary, &fallback(), &context(), TagVocabulary::Tactical).await;

        assert!(!consultation.placeholder_used);
        assert!(consultation.warning.is_none());
        assert!((consultation.result.footfall_index - 0.8).abs() < 1e-9);
        assert_eq!(consultation.sections.environment, "Heavy rain from 5pm");
        assert_eq!(consultation.sections.tactical, "Keep dinner at 3");
        assert_eq!(consultation.result.sources.len(), 1);
    }

    #[tokio::test]
    async fn failure_substitutes_placeholder_with_warning() {
        let primary = scripted(Err(()));
        let consultation = consult(&primary, &fallback(), &context(), TagVocabulary::Tactical).await;

        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
        assert!(consultation.placeholder_used);
        assert_eq!(consultation.result.footfall_index, 1.0);
        assert!(consultation.warning.unwrap().contains("GEMINI_API_KEY"));
        assert_eq!(consultation.sections.tactical, "hold the roster");
    }

    #[tokio::test]
    async fn short_response_substitutes_placeholder() {
        let primary = scripted(Ok("ok [FOOTFALL_INDEX: 1.5]"));
        let consultation = consult(&primary, &fallback(), &context(), TagVocabulary::Tactical).await;

        assert!(consultation.placeholder_used);
        assert!(consultation.warning.is_some());
        assert_eq!(consultation.result.footfall_index, 1.0);
    }
}
