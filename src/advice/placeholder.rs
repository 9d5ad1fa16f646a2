use super::sections::TagVocabulary;
use super::{AdviceContext, AdviceError, AdviceProvider, AdviceResult, NEUTRAL_FOOTFALL};
use async_trait::async_trait;
use rand::seq::SliceRandom;

/// A pre-written report, one paragraph per section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CannedAdvice {
    pub environment: String,
    pub logistics: String,
    pub opportunities: String,
    pub tactical: String,
}

impl CannedAdvice {
    pub fn new(environment: &str, logistics: &str, opportunities: &str, tactical: &str) -> Self {
        Self {
            environment: environment.to_string(),
            logistics: logistics.to_string(),
            opportunities: opportunities.to_string(),
            tactical: tactical.to_string(),
        }
    }

    fn render(&self, vocabulary: TagVocabulary) -> String {
        let bodies = [
            &self.environment,
            &self.logistics,
            &self.opportunities,
            &self.tactical,
        ];
        vocabulary
            .tags()
            .iter()
            .zip(bodies)
            .map(|(tag, body)| format!("[{tag}]\n{body}\n\n"))
            .collect::<String>()
            .trim_end()
            .to_string()
    }
}

fn builtin_variants() -> Vec<CannedAdvice> {
    vec![
        CannedAdvice::new(
            "Footfall is strong around commute and early evening. Peak demand compresses into short windows, so queue risk rises fast if handoffs lag.",
            "Friction appears at pass to runner and at table turns. Small pre-peak resets reduce drag during peak.",
            "Start 1 FOH 30-45 mins earlier Tue-Thu, add a 2-hour runner micro-shift, pilot 2 add-on scripts.",
            "Run a 7-day test: tighter pre-peak checklist, dedicated runner for the busiest 90 mins, track ticket time.",
        ),
        CannedAdvice::new(
            "Weekdays show lunch intent spikes; weekends skew to groups. Clear bundles speed decisions.",
            "Bottlenecks come in bursts. Micro-shifts outperform adding full headcount.",
            "Peak-only support role, pre-batch top sellers, 10-second upsell line.",
            "Keep labour flat: reallocate into the top 2 windows, monitor SPLH and wait time.",
        ),
    ]
}

/// Offline stand-in for the hosted advice model. Picks one canned report at
/// random and never moves the forecast (footfall index 1.0).
#[derive(Debug, Clone)]
pub struct PlaceholderAdviceProvider {
    variants: Vec<CannedAdvice>,
    vocabulary: TagVocabulary,
}

impl PlaceholderAdviceProvider {
    pub fn new(vocabulary: TagVocabulary) -> Self {
        Self::from_variants(builtin_variants(), vocabulary)
    }

    pub fn from_variants(variants: Vec<CannedAdvice>, vocabulary: TagVocabulary) -> Self {
        let variants = if variants.is_empty() {
            builtin_variants()
        } else {
            variants
        };
        Self {
            variants,
            vocabulary,
        }
    }

    pub fn pick(&self) -> AdviceResult {
        let raw_response = self
            .variants
            .choose(&mut rand::thread_rng())
            .map(|advice| advice.render(self.vocabulary))
            .unwrap_or_default();
        AdviceResult {
            raw_response,
            sources: Vec::new(),
            footfall_index: NEUTRAL_FOOTFALL,
        }
    }
}

#[async_trait]
impl AdviceProvider for PlaceholderAdviceProvider {
    async fn advise(&self, _context: &AdviceContext) -> Result<AdviceResult, AdviceError> {
        Ok(self.pick())
    }
}
