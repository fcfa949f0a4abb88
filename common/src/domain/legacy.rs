//! Projection between the structured tree and the flat content record.
//!
//! Older pages still read `vision`, `mission`, `history` and the contact
//! columns directly. The mapping is one-way lossy: the timeline is flattened
//! into a single `history` string and split back heuristically.

use serde_json::{Value, json};

use crate::domain::{
    content::FlatContent,
    defaults::create_defaults,
    tree::{SiteTree, card_text, is_visible},
};

const VISION_PATH: &str = "aboutPage.vision";
const MISSION_PATH: &str = "aboutPage.mission";
const TIMELINE_PATH: &str = "aboutPage.timeline";
const EMAIL_PATH: &str = "contactPage.email";
const PHONE_PATH: &str = "contactPage.phone";

/// Defaults overlaid with whatever the flat record already carries.
pub fn seed_from_legacy(flat: &FlatContent) -> SiteTree {
    let mut tree = create_defaults();

    let scalars = [
        (VISION_PATH, &flat.vision),
        (MISSION_PATH, &flat.mission),
        (EMAIL_PATH, &flat.contact_email),
        (PHONE_PATH, &flat.contact_phone),
    ];
    for (path, value) in scalars {
        if let Some(value) = value {
            tree.set_path(path, Value::String(value.clone()));
        }
    }

    if let Some(history) = flat.history.as_deref().filter(|h| !h.trim().is_empty()) {
        let timeline = split_history(history)
            .into_iter()
            .enumerate()
            .map(|(position, (year, description))| {
                json!({
                    "id": format!("timeline-{}", position + 1),
                    "year": year,
                    "description": description,
                    "isVisible": true,
                })
            })
            .collect();
        tree.set_path(TIMELINE_PATH, Value::Array(timeline));
    }

    tree
}

/// Copies `existing` and overwrites the mirrored columns from `tree`.
pub fn to_legacy_content(existing: &FlatContent, tree: &SiteTree) -> FlatContent {
    FlatContent {
        vision: non_empty(tree.str_at(VISION_PATH)),
        mission: non_empty(tree.str_at(MISSION_PATH)),
        history: timeline_history(tree),
        contact_email: non_empty(tree.str_at(EMAIL_PATH)),
        contact_phone: non_empty(tree.str_at(PHONE_PATH)),
        ..existing.clone()
    }
}

/// Visible timeline entries joined as `"<year>: <description>"`.
pub fn timeline_history(tree: &SiteTree) -> Option<String> {
    let fragments: Vec<String> = tree
        .cards(TIMELINE_PATH)
        .iter()
        .filter(|card| is_visible(card))
        .filter_map(|card| {
            let year = card_text(card, "year").unwrap_or_default();
            let description = card_text(card, "description").unwrap_or_default();
            let (year, description) = (year.trim(), description.trim());
            match (year.is_empty(), description.is_empty()) {
                (true, true) => None,
                (true, false) => Some(description.to_string()),
                (false, true) => Some(format!("{}:", year)),
                (false, false) => Some(format!("{}: {}", year, description)),
            }
        })
        .collect();

    if fragments.is_empty() {
        None
    } else {
        Some(fragments.join(" "))
    }
}

/// Splits free text into sentence chunks, each optionally led by a year.
fn split_history(history: &str) -> Vec<(String, String)> {
    sentences(history)
        .into_iter()
        .map(|sentence| match leading_year(sentence) {
            Some((year, rest)) => (year.to_string(), rest.to_string()),
            None => (String::new(), sentence.to_string()),
        })
        .collect()
}

fn sentences(text: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let at_boundary = match chars.peek() {
            Some((_, next)) => next.is_whitespace(),
            None => true,
        };
        if at_boundary {
            let end = index + c.len_utf8();
            chunks.push(&text[start..end]);
            start = end;
        }
    }
    chunks.push(&text[start..]);

    chunks
        .into_iter()
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect()
}

/// `"1998: text"`, `"1998 - text"` or `"1998 text"` → `("1998", "text")`
fn leading_year(sentence: &str) -> Option<(&str, &str)> {
    let year = sentence.get(..4)?;
    if !year.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let rest = &sentence[4..];
    match rest.chars().next() {
        None => Some((year, "")),
        Some(c) if c == ':' || c == '-' || c == '–' || c.is_whitespace() => {
            let description =
                rest.trim_start_matches(|c: char| c == ':' || c == '-' || c == '–' || c.is_whitespace());
            Some((year, description))
        }
        Some(_) => None,
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use crate::domain::normalize::{EmptyListPolicy, normalize};

    use super::*;

    fn legacy() -> FlatContent {
        FlatContent {
            vision: Some("Every learner thrives".to_string()),
            mission: Some("Teach with care".to_string()),
            history: Some("1998: The school opens. 2005 - A second campus! Families keep growing.".to_string()),
            contact_email: Some("office@school.example".to_string()),
            contact_phone: Some("+1 555 0199".to_string()),
            ..FlatContent::default()
        }
    }

    #[test]
    fn history_is_split_into_timeline_entries() {
        let tree = seed_from_legacy(&legacy());
        let timeline = tree.cards(TIMELINE_PATH);

        assert_eq!(timeline.len(), 3);
        assert_eq!(timeline[0]["year"], "1998");
        assert_eq!(timeline[0]["description"], "The school opens.");
        assert_eq!(timeline[1]["year"], "2005");
        assert_eq!(timeline[1]["description"], "A second campus!");
        assert_eq!(timeline[2]["year"], "");
        assert_eq!(timeline[2]["id"], "timeline-3");
    }

    #[test]
    fn decimals_do_not_split_sentences() {
        assert_eq!(
            sentences("Founded in 1998 with 2.5 classrooms. Grew fast"),
            vec!["Founded in 1998 with 2.5 classrooms.", "Grew fast"]
        );
    }

    #[test]
    fn year_needs_a_separator() {
        assert_eq!(leading_year("1998: Opened"), Some(("1998", "Opened")));
        assert_eq!(leading_year("2001"), Some(("2001", "")));
        assert_eq!(leading_year("19980 pupils"), None);
        assert_eq!(leading_year("Once upon"), None);
    }

    #[test]
    fn blank_history_keeps_default_timeline() {
        let flat = FlatContent {
            history: Some("   ".to_string()),
            ..FlatContent::default()
        };
        let tree = seed_from_legacy(&flat);
        assert_eq!(tree.cards(TIMELINE_PATH)[0]["year"], "1998");
        assert_eq!(tree.cards(TIMELINE_PATH).len(), 3);
    }

    #[test]
    fn mirror_round_trips_lossless_fields() {
        let flat = legacy();
        let tree = normalize(None, Some(&flat), EmptyListPolicy::Preserve);
        let mirrored = to_legacy_content(&flat, &tree);

        assert_eq!(mirrored.contact_email, flat.contact_email);
        assert_eq!(mirrored.contact_phone, flat.contact_phone);
        assert_eq!(mirrored.vision, flat.vision);
        assert_eq!(mirrored.mission, flat.mission);
    }

    #[test]
    fn mirrored_history_is_lossy() {
        let flat = legacy();
        let tree = normalize(None, Some(&flat), EmptyListPolicy::Preserve);
        let mirrored = to_legacy_content(&flat, &tree);

        // separators are rewritten to "<year>: "
        assert_eq!(
            mirrored.history.as_deref(),
            Some("1998: The school opens. 2005: A second campus! Families keep growing.")
        );
        assert_ne!(mirrored.history, flat.history);
    }

    #[test]
    fn hidden_timeline_entries_are_not_mirrored() {
        let mut tree = create_defaults();
        tree.set_path(
            TIMELINE_PATH,
            json!([
                {"id": "timeline-1", "year": 1998, "description": "Opened"},
                {"id": "timeline-2", "year": "2004", "description": "Hidden", "isVisible": false},
                {"id": "timeline-3", "year": "", "description": "Still growing"}
            ]),
        );
        let mirrored = to_legacy_content(&FlatContent::default(), &tree);
        assert_eq!(mirrored.history.as_deref(), Some("1998: Opened Still growing"));
    }

    #[test]
    fn mirror_keeps_other_columns() {
        let mut existing = legacy();
        existing.row_version = 4;
        existing.extra_content.insert("theme".to_string(), json!("dark"));

        let mut tree = create_defaults();
        tree.set_path(EMAIL_PATH, json!(""));
        let mirrored = to_legacy_content(&existing, &tree);

        assert_eq!(mirrored.row_version, 4);
        assert_eq!(mirrored.extra_content["theme"], "dark");
        assert_eq!(mirrored.contact_email, None);
    }
}
