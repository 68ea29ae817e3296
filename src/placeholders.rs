//! Image marker extraction from generated text.

use crate::models::ImagePlaceholder;
use regex::Regex;
use std::sync::LazyLock;

pub const MARKER_OPENER: &str = "[IMAGE PLACEHOLDER: ";

// Lazy `.*?` so two markers on one line stay separate matches.
static MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[IMAGE PLACEHOLDER: (.*?)\]").expect("Invalid image placeholder regex")
});

/// Return every marker in `text`, in left-to-right order. Duplicates are kept.
pub fn extract(text: &str) -> Vec<ImagePlaceholder> {
    MARKER_REGEX
        .captures_iter(text)
        .enumerate()
        .map(|(index, caps)| ImagePlaceholder {
            raw_marker: caps[0].to_string(),
            description: caps[1].to_string(),
            index,
        })
        .collect()
}

/// Markdown that replaces a resolved marker. `index` is zero-based.
pub fn image_markdown(index: usize, url: &str, description: &str) -> String {
    format!("![Generated Image {}]({})\n*{}*", index + 1, url, description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_empty_when_no_markers() {
        assert!(extract("## Heading\n\nJust words.").is_empty());
        assert!(extract("").is_empty());
    }

    #[test]
    fn test_extract_in_order() {
        let text = "Intro\n[IMAGE PLACEHOLDER: a home office setup]\nBody\n[IMAGE PLACEHOLDER: a team video call]\n";
        let found = extract(text);

        assert_eq!(
            found,
            vec![
                ImagePlaceholder {
                    raw_marker: "[IMAGE PLACEHOLDER: a home office setup]".to_string(),
                    description: "a home office setup".to_string(),
                    index: 0,
                },
                ImagePlaceholder {
                    raw_marker: "[IMAGE PLACEHOLDER: a team video call]".to_string(),
                    description: "a team video call".to_string(),
                    index: 1,
                },
            ]
        );
    }

    #[test]
    fn test_adjacent_markers_on_one_line_are_not_merged() {
        let found = extract("[IMAGE PLACEHOLDER: cat] and [IMAGE PLACEHOLDER: dog]");
        let descriptions: Vec<_> = found.iter().map(|p| p.description.as_str()).collect();
        assert_eq!(descriptions, vec!["cat", "dog"]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let found = extract("[IMAGE PLACEHOLDER: cat] [IMAGE PLACEHOLDER: cat]");
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].index, 1);
    }

    #[test]
    fn test_marker_without_closing_bracket_is_ignored() {
        assert!(extract("[IMAGE PLACEHOLDER: never closed").is_empty());
    }

    #[test]
    fn test_empty_description_matches() {
        let found = extract("[IMAGE PLACEHOLDER: ]");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].description, "");
    }

    #[test]
    fn test_image_markdown_numbering_is_one_based() {
        assert_eq!(
            image_markdown(0, "https://img/1.png", "a desk"),
            "![Generated Image 1](https://img/1.png)\n*a desk*"
        );
    }

    #[test]
    fn test_extract_after_substitution_is_empty() {
        let text = "[IMAGE PLACEHOLDER: a desk]";
        let marker = &extract(text)[0];
        let replaced = text.replace(
            &marker.raw_marker,
            &image_markdown(marker.index, "u", &marker.description),
        );
        assert!(extract(&replaced).is_empty());
    }
}
