use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One of the six fixed boxes of a Toulmin argument.
///
/// Declaration order is the export order and the `Ord` order used by every
/// `BTreeMap` keyed on boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BoxKey {
    Claim,
    Warrant,
    Rebuttal,
    Backing,
    RebuttalBacking,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Row {
    Claim,
    Reasons,
    Support,
    Grounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Column {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub struct BoxSpec {
    pub key: BoxKey,
    pub name: &'static str,
    pub title: &'static str,
    pub row: Row,
    pub column: Column,
}

const SCHEMA: [BoxSpec; 6] = [
    BoxSpec {
        key: BoxKey::Claim,
        name: "claim",
        title: "Claim",
        row: Row::Claim,
        column: Column::Center,
    },
    BoxSpec {
        key: BoxKey::Warrant,
        name: "warrant",
        title: "Warrant",
        row: Row::Reasons,
        column: Column::Left,
    },
    BoxSpec {
        key: BoxKey::Rebuttal,
        name: "rebuttal",
        title: "Rebuttal",
        row: Row::Reasons,
        column: Column::Right,
    },
    BoxSpec {
        key: BoxKey::Backing,
        name: "backing",
        title: "Backing",
        row: Row::Support,
        column: Column::Left,
    },
    BoxSpec {
        key: BoxKey::RebuttalBacking,
        name: "rebuttalBacking",
        title: "Rebuttal Backing",
        row: Row::Support,
        column: Column::Right,
    },
    BoxSpec {
        key: BoxKey::Data,
        name: "data",
        title: "Data",
        row: Row::Grounds,
        column: Column::Center,
    },
];

impl BoxKey {
    pub const ALL: [BoxKey; 6] = [
        BoxKey::Claim,
        BoxKey::Warrant,
        BoxKey::Rebuttal,
        BoxKey::Backing,
        BoxKey::RebuttalBacking,
        BoxKey::Data,
    ];

    pub fn spec(self) -> &'static BoxSpec {
        &SCHEMA[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn title(self) -> &'static str {
        self.spec().title
    }

    pub fn row(self) -> Row {
        self.spec().row
    }

    pub fn column(self) -> Column {
        self.spec().column
    }

    /// Accepts the camelCase key plus kebab, snake, spaced and upper-case
    /// spellings (`rebuttal-backing`, `REBUTTAL BACKING`).
    pub fn from_token(token: &str) -> Option<Self> {
        let normalized: String = token
            .trim()
            .chars()
            .filter(|ch| !matches!(ch, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "claim" => Some(Self::Claim),
            "warrant" => Some(Self::Warrant),
            "rebuttal" => Some(Self::Rebuttal),
            "backing" => Some(Self::Backing),
            "rebuttalbacking" => Some(Self::RebuttalBacking),
            "data" => Some(Self::Data),
            _ => None,
        }
    }

    /// Exact match on the upper-case section title used by the text format.
    pub fn from_section_title(title: &str) -> Option<Self> {
        let upper = title.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|key| key.title().to_uppercase() == upper)
    }
}

impl fmt::Display for BoxKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Row {
    pub const ALL: [Row; 4] = [Row::Claim, Row::Reasons, Row::Support, Row::Grounds];

    pub fn members(self) -> impl Iterator<Item = BoxKey> {
        BoxKey::ALL.into_iter().filter(move |key| key.row() == self)
    }
}

/// Free-text content per box. Missing keys read as empty, and setting a box
/// to empty drops its entry so equality only sees non-empty text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contents {
    entries: BTreeMap<BoxKey, String>,
}

impl Contents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: BoxKey) -> &str {
        self.entries.get(&key).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, key: BoxKey, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            self.entries.remove(&key);
        } else {
            self.entries.insert(key, text);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (BoxKey, &str)> {
        BoxKey::ALL.into_iter().map(|key| (key, self.get(key)))
    }
}

impl<S: Into<String>> FromIterator<(BoxKey, S)> for Contents {
    fn from_iter<I: IntoIterator<Item = (BoxKey, S)>>(iter: I) -> Self {
        let mut contents = Contents::new();
        for (key, text) in iter {
            contents.set(key, text);
        }
        contents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_table_matches_key_order() {
        for key in BoxKey::ALL {
            assert_eq!(key.spec().key, key);
        }
    }

    #[test]
    fn rows_partition_the_schema() {
        let members: Vec<Vec<BoxKey>> =
            Row::ALL.iter().map(|row| row.members().collect()).collect();
        assert_eq!(members[0], vec![BoxKey::Claim]);
        assert_eq!(members[1], vec![BoxKey::Warrant, BoxKey::Rebuttal]);
        assert_eq!(members[2], vec![BoxKey::Backing, BoxKey::RebuttalBacking]);
        assert_eq!(members[3], vec![BoxKey::Data]);
    }

    #[test]
    fn columns_follow_schema_roles() {
        assert_eq!(BoxKey::Claim.column(), Column::Center);
        assert_eq!(BoxKey::Data.column(), Column::Center);
        assert_eq!(BoxKey::Warrant.column(), Column::Left);
        assert_eq!(BoxKey::Backing.column(), Column::Left);
        assert_eq!(BoxKey::Rebuttal.column(), Column::Right);
        assert_eq!(BoxKey::RebuttalBacking.column(), Column::Right);
    }

    #[test]
    fn from_token_accepts_common_spellings() {
        assert_eq!(BoxKey::from_token("rebuttalBacking"), Some(BoxKey::RebuttalBacking));
        assert_eq!(BoxKey::from_token("rebuttal-backing"), Some(BoxKey::RebuttalBacking));
        assert_eq!(BoxKey::from_token("rebuttal_backing"), Some(BoxKey::RebuttalBacking));
        assert_eq!(BoxKey::from_token(" Claim "), Some(BoxKey::Claim));
        assert_eq!(BoxKey::from_token("qualifier"), None);
    }

    #[test]
    fn section_titles_match_case_insensitively() {
        assert_eq!(BoxKey::from_section_title("REBUTTAL BACKING"), Some(BoxKey::RebuttalBacking));
        assert_eq!(BoxKey::from_section_title("  data "), Some(BoxKey::Data));
        assert_eq!(BoxKey::from_section_title("REBUTTALBACKING"), None);
        assert_eq!(BoxKey::from_section_title("FOOBAR"), None);
    }

    #[test]
    fn contents_default_to_empty() {
        let mut contents = Contents::new();
        assert_eq!(contents.get(BoxKey::Warrant), "");
        contents.set(BoxKey::Warrant, "because");
        assert_eq!(contents.get(BoxKey::Warrant), "because");
        assert_eq!(contents.iter().count(), 6);
    }

    #[test]
    fn empty_text_equals_unset_box() {
        let mut contents: Contents = [(BoxKey::Claim, "c")].into_iter().collect();
        contents.set(BoxKey::Backing, "");
        contents.set(BoxKey::Warrant, "w");
        contents.set(BoxKey::Warrant, "");
        let expected: Contents = [(BoxKey::Claim, "c")].into_iter().collect();
        assert_eq!(contents, expected);
    }
}
