//! Canned demo summaries
//!
//! Picks one of seven fixed paragraphs for an article by keyword, so a demo
//! can show summaries without calling the summarization endpoint. Rules are
//! checked in order and the first match wins; the order matters because
//! keywords overlap (e.g. "ai" hits many unrelated words).

/// Topic bucket with a canned paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryTopic {
    /// Special case for the Wicked sequel coverage
    Wicked,
    Technology,
    Business,
    Sports,
    Health,
    Entertainment,
    Science,
}

impl SummaryTopic {
    /// Fixed summary paragraph for this topic
    pub fn paragraph(&self) -> &'static str {
        match self {
            SummaryTopic::Wicked => {
                "Cynthia Erivo and Ariana Grande returned to CinemaCon to debut the first trailer for the highly anticipated 'Wicked: For Good' sequel. The footage showcases the continuing story of the witches of Oz, featuring stunning visual effects and musical performances. The actors discussed their chemistry and the film's faithful adaptation of the source material. Industry analysts predict major box office success based on audience recognition and positive early reception."
            }
            SummaryTopic::Technology => {
                "Artificial intelligence has revolutionized multiple industries with applications ranging from medical diagnostics to financial trading algorithms. Computer vision systems can now identify objects and emotions with high precision, while self-driving vehicles integrate multiple AI technologies. These advances raise significant ethical concerns including privacy issues, job displacement risks, and algorithmic bias. Companies face increasing pressure to develop transparent AI systems that respect user privacy and adhere to evolving regulatory frameworks."
            }
            SummaryTopic::Business => {
                "Global markets demonstrate resilience despite economic and geopolitical challenges. The financial sector is undergoing digital transformation with traditional institutions competing against fintech startups. Mergers and acquisitions have accelerated as companies seek strategic advantages, while supply chain disruptions remain problematic across industries. Remote work has become a permanent feature for many organizations, and sustainability considerations increasingly influence business decisions and investment strategies."
            }
            SummaryTopic::Sports => {
                "The sports world has witnessed remarkable performances with underdog teams challenging traditional powerhouses. New talent is reshaping team dynamics across basketball, tennis, and cricket. Olympic athletes are breaking records during qualification events, while sports technology evolves with advanced analytics improving training methods. The business aspect of sports is transforming with streaming services competing for broadcast rights and new approaches to fan engagement being developed."
            }
            SummaryTopic::Health => {
                "Medical researchers report promising clinical trial results for chronic condition treatments. Genomic medicine advances enable more personalized healthcare approaches. Public health systems are strengthening disease monitoring capabilities while nutrition science provides new insights into diet-health relationships. Mental health awareness has increased substantially, and telemedicine has expanded healthcare access for underserved communities. Healthcare systems globally are addressing challenges related to aging populations."
            }
            SummaryTopic::Entertainment => {
                "The entertainment industry continues evolving with streaming platforms producing unprecedented volumes of original content. Filmmakers experiment with innovative storytelling techniques while musicians challenge genre conventions through social media promotion. Gaming experiences have become increasingly immersive through advanced graphics and narrative complexity. Celebrity culture transforms as stars directly engage with fans, and production companies implement more sustainable and inclusive practices behind the scenes."
            }
            SummaryTopic::Science => {
                "Scientific breakthroughs span multiple disciplines, from astronomy identifying potentially habitable exoplanets to particle physics research advancing our understanding of fundamental forces. Neuroscience research yields insights into brain function and potential treatments, while climate scientists refine environmental prediction models. Material scientists create compounds with novel industrial applications, and international collaboration accelerates the pace of discovery across scientific fields."
            }
        }
    }
}

/// Text rules, checked against lowercased `"<title> <description>"`
const TEXT_RULES: &[(SummaryTopic, &[&str])] = &[
    (SummaryTopic::Wicked, &["wicked", "ariana grande", "cynthia erivo"]),
    (SummaryTopic::Technology, &["tech", "ai", "software", "digital"]),
    (SummaryTopic::Business, &["business", "market", "economy", "finance"]),
    (SummaryTopic::Sports, &["sport", "football", "basketball", "tennis"]),
    (SummaryTopic::Health, &["health", "medical", "disease", "doctor"]),
    (
        SummaryTopic::Entertainment,
        &["movie", "film", "cinema", "music", "celebrity", "entertainment"],
    ),
    (SummaryTopic::Science, &["science", "research", "study", "discover"]),
];

/// URL hints checked verbatim (case-sensitive) when no text rule matched
const URL_HINTS: &[&str] = &["entertainment", "movie", "hollywood", "cinema", "film"];

/// Classify an article into a topic, or `None` if nothing matches.
pub fn classify(title: &str, description: Option<&str>, url: &str) -> Option<SummaryTopic> {
    let text = format!("{} {}", title, description.unwrap_or("")).to_lowercase();

    TEXT_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(*k)))
        .map(|(topic, _)| *topic)
        .or_else(|| {
            URL_HINTS
                .iter()
                .any(|hint| url.contains(*hint))
                .then_some(SummaryTopic::Entertainment)
        })
}

/// Demo summary for an article.
///
/// Falls back to `"This article discusses <lowercased title>. <description>"`
/// when no rule matches.
pub fn demo_summary(title: &str, description: Option<&str>, url: &str) -> String {
    match classify(title, description, url) {
        Some(topic) => topic.paragraph().to_string(),
        None => format!(
            "This article discusses {}. {}",
            title.to_lowercase(),
            description.unwrap_or("")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPORTS: &str = "The sports world has witnessed remarkable performances with underdog teams challenging traditional powerhouses. New talent is reshaping team dynamics across basketball, tennis, and cricket. Olympic athletes are breaking records during qualification events, while sports technology evolves with advanced analytics improving training methods. The business aspect of sports is transforming with streaming services competing for broadcast rights and new approaches to fan engagement being developed.";

    #[test]
    fn test_football_selects_sports_paragraph() {
        let summary = demo_summary("Local football club wins", None, "https://e.com/1");
        assert_eq!(summary, SPORTS);
    }

    #[test]
    fn test_fallback_template() {
        let summary = demo_summary(
            "Quiet Weekend Ahead",
            Some("Nothing else."),
            "https://e.com/1",
        );
        assert_eq!(summary, "This article discusses quiet weekend ahead. Nothing else.");
    }

    #[test]
    fn test_fallback_without_description_keeps_trailing_space() {
        let summary = demo_summary("Quiet Weekend", None, "https://e.com/1");
        assert_eq!(summary, "This article discusses quiet weekend. ");
    }

    #[test]
    fn test_wicked_beats_entertainment() {
        let topic = classify("Wicked sequel trailer lands", Some("New film footage"), "");
        assert_eq!(topic, Some(SummaryTopic::Wicked));
    }

    #[test]
    fn test_first_rule_wins_on_overlap() {
        // "market" (business) and "football" (sports) both present
        let topic = classify("Football transfer market heats up", None, "");
        assert_eq!(topic, Some(SummaryTopic::Business));
    }

    #[test]
    fn test_ai_substring_matches_technology() {
        // "ai" inside "daily" is enough
        assert_eq!(classify("Daily roundup", None, ""), Some(SummaryTopic::Technology));
    }

    #[test]
    fn test_matching_is_case_insensitive_on_text() {
        assert_eq!(classify("DOCTOR shortage", None, ""), Some(SummaryTopic::Health));
    }

    #[test]
    fn test_description_participates() {
        assert_eq!(
            classify("Breakthrough", Some("New research shows"), ""),
            Some(SummaryTopic::Science)
        );
    }

    #[test]
    fn test_url_hint_fallback() {
        let topic = classify("Quiet evening", None, "https://e.com/hollywood/quiet");
        assert_eq!(topic, Some(SummaryTopic::Entertainment));
    }

    #[test]
    fn test_url_hint_is_case_sensitive() {
        assert_eq!(classify("Quiet evening", None, "https://e.com/HOLLYWOOD/x"), None);
    }
}
