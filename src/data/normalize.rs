use std::sync::OnceLock;

use regex::Regex;

fn prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^Subscription\s*[-–]\s*").expect("invalid category prefix regex")
    })
}

/// Strip a leading `Subscription -` / `Subscription –` label from a category.
///
/// Matching is case-sensitive and removes at most one prefix. Strings that do
/// not start with the label come back unchanged.
pub fn normalize_category(raw: &str) -> String {
    prefix_re().replace(raw, "").into_owned()
}

/// Normalise an optional category; absent values stay absent.
pub fn normalize_optional(raw: Option<String>) -> Option<String> {
    raw.map(|s| normalize_category(&s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_hyphen_and_en_dash_prefixes() {
        assert_eq!(normalize_category("Subscription - Streaming"), "Streaming");
        assert_eq!(normalize_category("Subscription – Streaming"), "Streaming");
        assert_eq!(normalize_category("Subscription-Streaming"), "Streaming");
        assert_eq!(normalize_category("Subscription  –   Cloud Storage"), "Cloud Storage");
    }

    #[test]
    fn leaves_non_matching_values_alone() {
        assert_eq!(normalize_category("Streaming"), "Streaming");
        assert_eq!(normalize_category("subscription - Streaming"), "subscription - Streaming");
        assert_eq!(normalize_category("Music Subscription - Extra"), "Music Subscription - Extra");
        assert_eq!(normalize_category(""), "");
    }

    #[test]
    fn idempotent() {
        for raw in [
            "Subscription - Streaming",
            "Subscription – News",
            "Streaming",
            "Subscription - ",
            "Gym",
        ] {
            let once = normalize_category(raw);
            assert_eq!(normalize_category(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn absent_passes_through() {
        assert_eq!(normalize_optional(None), None);
        assert_eq!(
            normalize_optional(Some("Subscription - Music".into())),
            Some("Music".to_string())
        );
    }
}
