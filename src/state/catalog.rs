//! Technology catalog for the dependent technology/version selector

use std::fmt;
use std::str::FromStr;

/// Front-end technologies offered by the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Technology {
    Angular,
    React,
    Vue,
}

impl Technology {
    /// Every technology in display order
    pub const ALL: [Technology; 3] = [Technology::Angular, Technology::React, Technology::Vue];

    /// Wire name, as submitted in the `framework` field
    pub fn as_str(&self) -> &'static str {
        match self {
            Technology::Angular => "angular",
            Technology::React => "react",
            Technology::Vue => "vue",
        }
    }

    /// Versions selectable for this technology, in display order
    pub fn versions(&self) -> &'static [&'static str] {
        match self {
            Technology::Angular => &["1.1.1", "1.2.1", "1.3.3"],
            Technology::React => &["2.1.2", "3.2.4", "4.3.1"],
            Technology::Vue => &["3.3.1", "5.2.1", "5.1.3"],
        }
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Technology {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Technology::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or(())
    }
}

/// Versions for a raw technology value. Absent or unknown values have none.
pub fn versions_for(value: &str) -> &'static [&'static str] {
    value
        .parse::<Technology>()
        .map(|t| t.versions())
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_react_versions() {
        assert_eq!(versions_for("react"), &["2.1.2", "3.2.4", "4.3.1"]);
    }

    #[test]
    fn test_unknown_technology_has_no_versions() {
        assert!(versions_for("svelte").is_empty());
        assert!(versions_for("").is_empty());
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert_eq!("vue".parse::<Technology>(), Ok(Technology::Vue));
        assert!("Vue".parse::<Technology>().is_err());
    }

    #[test]
    fn test_all_round_trips_through_display() {
        for tech in Technology::ALL {
            assert_eq!(tech.to_string().parse::<Technology>(), Ok(tech));
            assert_eq!(tech.versions().len(), 3);
        }
    }
}
