//! The three fixed stylization occasions the remote service targets.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occasion {
    Office,
    Party,
    Vacation,
}

impl Occasion {
    /// Fixed display order used everywhere an occasion sequence appears.
    pub const ALL: [Occasion; 3] = [Occasion::Office, Occasion::Party, Occasion::Vacation];

    pub fn label(self) -> &'static str {
        match self {
            Occasion::Office => "Office",
            Occasion::Party => "Party",
            Occasion::Vacation => "Vacation",
        }
    }

    /// Lowercase form used in download filenames and tab slugs.
    pub fn slug(self) -> &'static str {
        match self {
            Occasion::Office => "office",
            Occasion::Party => "party",
            Occasion::Vacation => "vacation",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "office" => Some(Occasion::Office),
            "party" => Some(Occasion::Party),
            "vacation" => Some(Occasion::Vacation),
            _ => None,
        }
    }

    pub fn blurb(self) -> &'static str {
        match self {
            Occasion::Office => {
                "Professional editorial look suitable for workplace environments."
            }
            Occasion::Party => "Glamorous setting with vibrant atmosphere for evening events.",
            Occasion::Vacation => {
                "Relaxed luxury feel perfect for holiday and leisure occasions."
            }
        }
    }
}

/// Filter applied to the stylized results grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterTab {
    #[default]
    All,
    Occasion(Occasion),
}

impl FilterTab {
    pub fn matches(self, occasion: Occasion) -> bool {
        match self {
            FilterTab::All => true,
            FilterTab::Occasion(wanted) => wanted == occasion,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("all") {
            Some(FilterTab::All)
        } else {
            Occasion::parse(value).map(FilterTab::Occasion)
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterTab::All => "All",
            FilterTab::Occasion(occasion) => occasion.label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occasion_parse_is_case_insensitive() {
        assert_eq!(Occasion::parse("Office"), Some(Occasion::Office));
        assert_eq!(Occasion::parse("PARTY"), Some(Occasion::Party));
        assert_eq!(Occasion::parse("vacation"), Some(Occasion::Vacation));
        assert_eq!(Occasion::parse("brunch"), None);
    }

    #[test]
    fn occasion_wire_form_is_capitalized() {
        let json = serde_json::to_string(&Occasion::Vacation).unwrap();
        assert_eq!(json, "\"Vacation\"");
        let back: Occasion = serde_json::from_str("\"Office\"").unwrap();
        assert_eq!(back, Occasion::Office);
    }

    #[test]
    fn all_tab_matches_every_occasion() {
        for occasion in Occasion::ALL {
            assert!(FilterTab::All.matches(occasion));
        }
    }

    #[test]
    fn occasion_tab_matches_only_itself() {
        let tab = FilterTab::parse("office").unwrap();
        assert!(tab.matches(Occasion::Office));
        assert!(!tab.matches(Occasion::Party));
        assert!(!tab.matches(Occasion::Vacation));
    }
}
