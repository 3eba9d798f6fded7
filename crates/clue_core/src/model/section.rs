//! Curriculum section metadata.
//!
//! # Responsibility
//! - Map the fixed section-type enumeration to display metadata.
//! - Resolve section types at input boundaries (saved documents, content
//!   paths).
//!
//! # Invariants
//! - Every section type has exactly one descriptor; titles and
//!   abbreviations are non-empty and unique.
//! - The table is compiled in and immutable.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static SECTION_CONTENT_PATH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|/)([A-Za-z]+)/content\.json$").expect("valid section path regex")
});

/// Problem section types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionType {
    Introduction,
    InitialChallenge,
    WhatIf,
    NowWhatDoYouKnow,
    DidYouKnow,
    ExtraWorkspace,
    /// Pseudo-section addressing every section at once (e.g. supports).
    All,
}

impl SectionType {
    pub const VALUES: [SectionType; 7] = [
        SectionType::Introduction,
        SectionType::InitialChallenge,
        SectionType::WhatIf,
        SectionType::NowWhatDoYouKnow,
        SectionType::DidYouKnow,
        SectionType::ExtraWorkspace,
        SectionType::All,
    ];

    /// Serialized identifier, e.g. `initialChallenge`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Introduction => "introduction",
            Self::InitialChallenge => "initialChallenge",
            Self::WhatIf => "whatIf",
            Self::NowWhatDoYouKnow => "nowWhatDoYouKnow",
            Self::DidYouKnow => "didYouKnow",
            Self::ExtraWorkspace => "extraWorkspace",
            Self::All => "all",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::VALUES
            .iter()
            .copied()
            .find(|section| section.as_str() == value)
    }
}

impl Display for SectionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display metadata for one section type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionInfo {
    pub title: &'static str,
    pub abbrev: &'static str,
}

const INTRODUCTION: SectionInfo = SectionInfo {
    title: "Introduction",
    abbrev: "IN",
};
const INITIAL_CHALLENGE: SectionInfo = SectionInfo {
    title: "Initial Challenge",
    abbrev: "IC",
};
const WHAT_IF: SectionInfo = SectionInfo {
    title: "What If...?",
    abbrev: "WI",
};
const NOW_WHAT_DO_YOU_KNOW: SectionInfo = SectionInfo {
    title: "Now What Do You Know?",
    abbrev: "NW",
};
const DID_YOU_KNOW: SectionInfo = SectionInfo {
    title: "Did You Know?",
    abbrev: "DY",
};
const EXTRA_WORKSPACE: SectionInfo = SectionInfo {
    title: "Extra Workspace",
    abbrev: "EW",
};
const ALL_SECTIONS: SectionInfo = SectionInfo {
    title: "All",
    abbrev: "ALL",
};

/// Returns the descriptor for `section`.
pub fn describe(section: SectionType) -> &'static SectionInfo {
    match section {
        SectionType::Introduction => &INTRODUCTION,
        SectionType::InitialChallenge => &INITIAL_CHALLENGE,
        SectionType::WhatIf => &WHAT_IF,
        SectionType::NowWhatDoYouKnow => &NOW_WHAT_DO_YOU_KNOW,
        SectionType::DidYouKnow => &DID_YOU_KNOW,
        SectionType::ExtraWorkspace => &EXTRA_WORKSPACE,
        SectionType::All => &ALL_SECTIONS,
    }
}

/// Boundary lookup for section identifiers read from saved data.
///
/// # Errors
/// - `UnknownSectionType` when `value` is not an enumerated identifier.
pub fn describe_str(value: &str) -> Result<&'static SectionInfo, SectionError> {
    SectionType::parse(value)
        .map(describe)
        .ok_or_else(|| SectionError::UnknownSectionType(value.to_string()))
}

/// Extracts the section type from a curriculum content path such as
/// `investigation-1/problem-1/whatIf/content.json`.
pub fn section_type_from_path(path: &str) -> Option<SectionType> {
    let captures = SECTION_CONTENT_PATH_RE.captures(path)?;
    SectionType::parse(captures.get(1)?.as_str())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionError {
    UnknownSectionType(String),
}

impl Display for SectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownSectionType(value) => write!(f, "unknown section type: `{value}`"),
        }
    }
}

impl Error for SectionError {}
