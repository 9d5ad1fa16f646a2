use regex::Regex;
use serde::Serialize;
use tracing::warn;

/// Which bracketed headings the advice text is expected to use. Both sets
/// map positionally onto [`AdviceSections`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagVocabulary {
    #[default]
    Tactical,
    Classic,
}

impl TagVocabulary {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "tactical" => Some(TagVocabulary::Tactical),
            "classic" => Some(TagVocabulary::Classic),
            _ => None,
        }
    }

    pub fn tags(self) -> [&'static str; 4] {
        match self {
            TagVocabulary::Tactical => ["ENVIRONMENT", "LOGISTICS", "OPPORTUNITIES", "TACTICAL_ADVICE"],
            TagVocabulary::Classic => ["WEATHER", "TRANSPORT", "EVENTS", "ADVICE"],
        }
    }

    /// One-line brief per section, used when asking the model for a report.
    pub fn briefs(self) -> [&'static str; 4] {
        match self {
            TagVocabulary::Tactical => [
                "Weather & vibes.",
                "Transport & accessibility.",
                "Events or holidays that could drive sales.",
                "Staffing and service prep recommendations.",
            ],
            TagVocabulary::Classic => [
                "Forecast for the service window.",
                "Disruptions affecting guests or staff.",
                "Local events nearby.",
                "FOH staffing recommendation.",
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AdviceSections {
    pub environment: String,
    pub logistics: String,
    pub opportunities: String,
    pub tactical: String,
}

/// Result of scanning free text for section markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionScan {
    /// One entry per configured tag, in tag order. Absent tags are empty.
    Tagged(Vec<String>),
    /// No marker was present; the whole cleaned text.
    Untagged(String),
}

impl SectionScan {
    /// Spreads the scan over `slots` positions. Untagged text lands in the
    /// last slot.
    pub fn into_slots(self, slots: usize) -> Vec<String> {
        let mut out = vec![String::new(); slots];
        match self {
            SectionScan::Tagged(sections) => {
                for (slot, section) in out.iter_mut().zip(sections) {
                    *slot = section;
                }
            }
            SectionScan::Untagged(text) => {
                if let Some(last) = out.last_mut() {
                    *last = text;
                }
            }
        }
        out
    }
}

impl From<SectionScan> for AdviceSections {
    fn from(scan: SectionScan) -> Self {
        let mut slots = scan.into_slots(4).into_iter();
        Self {
            environment: slots.next().unwrap_or_default(),
            logistics: slots.next().unwrap_or_default(),
            opportunities: slots.next().unwrap_or_default(),
            tactical: slots.next().unwrap_or_default(),
        }
    }
}

struct Marker {
    bracketed: String,
    heading: Regex,
}

/// Tolerant splitter for `[TAG]`-delimited model output.
///
/// A section runs from its marker to the earliest later marker (or the end
/// of the text). `TAG:` headings are accepted and rewritten to `[TAG]`.
pub struct SectionScanner {
    markers: Vec<Marker>,
}

impl SectionScanner {
    pub fn new<I, S>(tags: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let markers = tags
            .into_iter()
            .map(|tag| {
                let tag = tag.as_ref();
                Ok(Marker {
                    bracketed: format!("[{tag}]"),
                    heading: Regex::new(&format!(r"(?i)\b{}\b\s*:", regex::escape(tag)))?,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { markers })
    }

    pub fn for_vocabulary(vocabulary: TagVocabulary) -> Result<Self, regex::Error> {
        Self::new(vocabulary.tags())
    }

    pub fn scan(&self, raw: &str) -> SectionScan {
        let mut text = clean_text(raw);
        for marker in &self.markers {
            text = marker
                .heading
                .replace_all(&text, marker.bracketed.as_str())
                .into_owned();
        }

        let mut found_any = false;
        let mut sections = Vec::with_capacity(self.markers.len());
        for (index, marker) in self.markers.iter().enumerate() {
            let Some(start) = text.find(&marker.bracketed) else {
                sections.push(String::new());
                continue;
            };
            found_any = true;
            let from = start + marker.bracketed.len();
            let rest = &text[from..];
            let end = self.markers[index + 1..]
                .iter()
                .filter_map(|later| rest.find(&later.bracketed))
                .min()
                .unwrap_or(rest.len());
            sections.push(rest[..end].trim().to_string());
        }

        if found_any {
            SectionScan::Tagged(sections)
        } else {
            SectionScan::Untagged(text)
        }
    }
}

/// Drops carriage returns and markdown emphasis; lone asterisks become
/// bullet glyphs.
pub fn clean_text(raw: &str) -> String {
    raw.replace('\r', "")
        .replace("**", "")
        .replace('*', "•")
        .trim()
        .to_string()
}

pub fn parse_sections(raw: &str, vocabulary: TagVocabulary) -> AdviceSections {
    let scan = match SectionScanner::for_vocabulary(vocabulary) {
        Ok(scanner) => scanner.scan(raw),
        Err(err) => {
            warn!("section scanner unavailable: {err}");
            SectionScan::Untagged(clean_text(raw))
        }
    };
    AdviceSections::from(scan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untagged_text_lands_in_last_section() {
        let sections = parse_sections("no tags here", TagVocabulary::Tactical);
        assert_eq!(sections.environment, "");
        assert_eq!(sections.logistics, "");
        assert_eq!(sections.opportunities, "");
        assert_eq!(sections.tactical, "no tags here");
    }

    #[test]
    fn splits_on_tags() {
        let sections = parse_sections(
            "[ENVIRONMENT]A[LOGISTICS]B[OPPORTUNITIES]C[TACTICAL_ADVICE]D",
            TagVocabulary::Tactical,
        );
        assert_eq!(
            sections,
            AdviceSections {
                environment: "A".into(),
                logistics: "B".into(),
                opportunities: "C".into(),
                tactical: "D".into(),
            }
        );
    }

    #[test]
    fn missing_tag_leaves_section_empty_and_skips_ahead() {
        let sections = parse_sections(
            "[ENVIRONMENT]\nRain after 6pm\n[OPPORTUNITIES]\nDerby at 7:45",
            TagVocabulary::Tactical,
        );
        assert_eq!(sections.environment, "Rain after 6pm");
        assert_eq!(sections.logistics, "");
        assert_eq!(sections.opportunities, "Derby at 7:45");
        assert_eq!(sections.tactical, "");
    }

    #[test]
    fn headings_with_colons_are_normalized() {
        let sections = parse_sections(
            "Environment: Dry and mild.\nLogistics: Tube strike on the Victoria line.",
            TagVocabulary::Tactical,
        );
        assert_eq!(sections.environment, "Dry and mild.");
        assert_eq!(sections.logistics, "Tube strike on the Victoria line.");
    }

    #[test]
    fn emphasis_is_stripped_and_bullets_normalized() {
        let sections = parse_sections("**Bold** move\r\n* add a runner", TagVocabulary::Tactical);
        assert_eq!(sections.tactical, "Bold move\n• add a runner");
    }

    #[test]
    fn classic_vocabulary_maps_positionally() {
        let sections = parse_sections(
            "[WEATHER] Sunny [TRANSPORT] Normal [EVENTS] Concert [ADVICE] Add one server",
            TagVocabulary::Classic,
        );
        assert_eq!(sections.environment, "Sunny");
        assert_eq!(sections.logistics, "Normal");
        assert_eq!(sections.opportunities, "Concert");
        assert_eq!(sections.tactical, "Add one server");
    }

    #[test]
    fn custom_scanner_reports_untagged() {
        let scanner = SectionScanner::new(["ONE", "TWO"]).unwrap();
        assert_eq!(scanner.scan("  plain  "), SectionScan::Untagged("plain".into()));
        assert_eq!(
            scanner.scan("[TWO] b [ONE] a"),
            SectionScan::Tagged(vec!["a".into(), "b [ONE] a".into()])
        );
    }

    #[test]
    fn vocabulary_names_parse() {
        assert_eq!(TagVocabulary::from_name("Classic"), Some(TagVocabulary::Classic));
        assert_eq!(TagVocabulary::from_name(" tactical "), Some(TagVocabulary::Tactical));
        assert_eq!(TagVocabulary::from_name("other"), None);
    }
}
