use clue_core::{describe, describe_str, section_type_from_path, SectionError, SectionType};
use std::collections::HashSet;

#[test]
fn titles_and_abbreviations_are_non_empty_and_unique() {
    let mut titles = HashSet::new();
    let mut abbrevs = HashSet::new();

    for section in SectionType::VALUES {
        let info = describe(section);
        assert!(!info.title.is_empty(), "{section} has an empty title");
        assert!(!info.abbrev.is_empty(), "{section} has an empty abbreviation");
        assert!(titles.insert(info.title), "duplicate title {}", info.title);
        assert!(abbrevs.insert(info.abbrev), "duplicate abbreviation {}", info.abbrev);
    }
    assert_eq!(abbrevs.len(), SectionType::VALUES.len());
}

#[test]
fn known_sections_describe_as_curriculum_shows_them() {
    let what_if = describe(SectionType::WhatIf);
    assert_eq!(what_if.title, "What If...?");
    assert_eq!(what_if.abbrev, "WI");

    let info = describe_str("nowWhatDoYouKnow").expect("known section");
    assert_eq!(info.title, "Now What Do You Know?");
    assert_eq!(info.abbrev, "NW");
}

#[test]
fn unknown_section_identifier_is_an_error() {
    assert_eq!(
        describe_str("homework"),
        Err(SectionError::UnknownSectionType("homework".to_string()))
    );
}

#[test]
fn section_identifiers_must_match_exactly() {
    assert_eq!(
        describe_str(" whatIf "),
        Err(SectionError::UnknownSectionType(" whatIf ".to_string()))
    );
    assert!(describe_str("WhatIf").is_err());
    assert_eq!(describe_str("whatIf").unwrap().abbrev, describe(SectionType::WhatIf).abbrev);
}

#[test]
fn section_type_is_read_from_content_paths() {
    assert_eq!(
        section_type_from_path("investigation-1/problem-1/whatIf/content.json"),
        Some(SectionType::WhatIf)
    );
    assert_eq!(
        section_type_from_path("initialChallenge/content.json"),
        Some(SectionType::InitialChallenge)
    );
    assert_eq!(section_type_from_path("investigation-1/problem-1/notes.json"), None);
    assert_eq!(section_type_from_path("problem-1/homework/content.json"), None);
}
