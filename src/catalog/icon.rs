use std::sync::LazyLock;

use regex::Regex;

/// Icon shown in front of a feature line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureIcon {
    Person,
    Clock,
    Package,
    Video,
    Gift,
    Award,
    Calendar,
    Flame,
    Check,
}

/// Keyword rules, checked in order; the first hit wins. Keywords must start
/// a word, so "delivered" is not a live stream.
static RULES: LazyLock<Vec<(Regex, FeatureIcon)>> = LazyLock::new(|| {
    [
        (r"pandit|priest", FeatureIcon::Person),
        (r"hour|minute|duration", FeatureIcon::Clock),
        (r"samagri|material|kit", FeatureIcon::Package),
        (r"video|live|stream|online", FeatureIcon::Video),
        (r"prasad", FeatureIcon::Gift),
        (r"certificate", FeatureIcon::Award),
        (r"muhurat|date|calendar", FeatureIcon::Calendar),
        (r"havan|fire|yagya", FeatureIcon::Flame),
    ]
    .into_iter()
    .filter_map(|(words, icon)| {
        Regex::new(&format!(r"(?i)\b({words})"))
            .ok()
            .map(|re| (re, icon))
    })
    .collect()
});

impl FeatureIcon {
    /// Pick the icon for a feature description.
    pub fn classify(feature: &str) -> Self {
        RULES
            .iter()
            .find(|(pattern, _)| pattern.is_match(feature))
            .map_or(Self::Check, |(_, icon)| *icon)
    }

    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Person => "👤",
            Self::Clock => "⏱",
            Self::Package => "📦",
            Self::Video => "📹",
            Self::Gift => "🎁",
            Self::Award => "🏅",
            Self::Calendar => "📅",
            Self::Flame => "🔥",
            Self::Check => "✓",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_pick_icons() {
        assert_eq!(FeatureIcon::classify("2 Experienced Pandits"), FeatureIcon::Person);
        assert_eq!(FeatureIcon::classify("Duration: 3 hours"), FeatureIcon::Clock);
        assert_eq!(FeatureIcon::classify("Complete samagri kit"), FeatureIcon::Package);
        assert_eq!(FeatureIcon::classify("Live streaming for family"), FeatureIcon::Video);
        assert_eq!(FeatureIcon::classify("Prasad delivered home"), FeatureIcon::Gift);
        assert_eq!(FeatureIcon::classify("Puja certificate"), FeatureIcon::Award);
        assert_eq!(FeatureIcon::classify("Shubh muhurat consultation"), FeatureIcon::Calendar);
        assert_eq!(FeatureIcon::classify("Navagraha havan"), FeatureIcon::Flame);
    }

    #[test]
    fn test_keywords_only_match_at_word_start() {
        assert_eq!(FeatureIcon::classify("Livestream on YouTube"), FeatureIcon::Video);
        assert_eq!(FeatureIcon::classify("Free update"), FeatureIcon::Check);
        assert_eq!(FeatureIcon::classify("Candidate horoscope"), FeatureIcon::Check);
        assert_eq!(FeatureIcon::classify("Children's skit"), FeatureIcon::Check);
        assert_eq!(FeatureIcon::classify("Ghee lamp kit"), FeatureIcon::Package);
    }

    #[test]
    fn test_unknown_feature_falls_back_to_check() {
        assert_eq!(FeatureIcon::classify("Sankalp in your name"), FeatureIcon::Check);
        assert_eq!(FeatureIcon::classify(""), FeatureIcon::Check);
    }

    #[test]
    fn test_first_rule_wins() {
        // Mentions both a pandit and a duration.
        assert_eq!(
            FeatureIcon::classify("Pandit stays for 2 hours"),
            FeatureIcon::Person
        );
    }
}
