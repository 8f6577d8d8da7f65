//! Artifact extraction from model output.
//!
//! Later stages restate and refine code that earlier stages drafted, and all
//! of it ends up in the same aggregated text. The last region for a label is
//! therefore the one that gets kept.

mod scanner;

pub use scanner::{FenceScanner, FencedRegion};

use std::collections::BTreeMap;

/// Extracts the last fenced region for each requested label.
///
/// Labels match case-insensitively. The result is keyed by the label as the
/// caller spelled it, holds the region body trimmed of surrounding
/// whitespace, and contains no label that was not requested. Labels with no
/// matching region are simply absent. Duplicate labels are ignored.
pub fn extract<I, S>(text: &str, labels: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut wanted: Vec<String> = Vec::new();
    for label in labels {
        let label = label.as_ref();
        if label.is_empty() || wanted.iter().any(|w| w.eq_ignore_ascii_case(label)) {
            continue;
        }
        wanted.push(label.to_string());
    }

    let mut found = BTreeMap::new();
    if wanted.is_empty() {
        return found;
    }

    for region in FenceScanner::new(text) {
        if let Some(label) = wanted.iter().find(|w| w.eq_ignore_ascii_case(region.label)) {
            found.insert(label.clone(), region.body.trim().to_string());
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_last_match_wins() {
        let text = "```markup\n<p>old</p>\n```\n...\n```markup\n<p>new</p>\n```";
        let result = extract(text, ["markup"]);

        let mut expected = BTreeMap::new();
        expected.insert("markup".to_string(), "<p>new</p>".to_string());
        assert_eq!(result, expected);
    }

    #[test]
    fn test_only_requested_labels_returned() {
        let text = "```html\na\n```\n```css\nb\n```\n```python\nc\n```";
        let result = extract(text, ["html", "javascript"]);

        assert_eq!(result.keys().collect::<Vec<_>>(), vec!["html"]);
    }

    #[test]
    fn test_case_insensitive_labels() {
        let text = "```HTML\n<main></main>\n```";
        let result = extract(text, ["html"]);
        assert_eq!(result.get("html").map(String::as_str), Some("<main></main>"));

        let result = extract("```css\na {}\n```", ["CSS"]);
        assert_eq!(result.get("CSS").map(String::as_str), Some("a {}"));
    }

    #[test]
    fn test_missing_label_is_absent() {
        let result = extract("no code here", ["html", "css"]);
        assert!(result.is_empty());
    }

    #[test]
    fn test_malformed_fence_omits_label() {
        let text = "```css\np {}\n```\n```javascript\nconsole.log('never closed');\n";
        let result = extract(text, ["css", "javascript"]);

        assert_eq!(result.get("css").map(String::as_str), Some("p {}"));
        assert!(!result.contains_key("javascript"));
    }

    #[test]
    fn test_unterminated_later_region_keeps_earlier_match() {
        let text = "```html\n<p>first</p>\n```\n```html\n<p>broken";
        let result = extract(text, ["html"]);
        assert_eq!(result.get("html").map(String::as_str), Some("<p>first</p>"));
    }

    #[test]
    fn test_body_is_trimmed() {
        let text = "```javascript\n\n   let x = 1;\n\n```";
        let result = extract(text, ["javascript"]);
        assert_eq!(result.get("javascript").map(String::as_str), Some("let x = 1;"));
    }

    #[test]
    fn test_duplicate_and_empty_labels_ignored() {
        let text = "```html\nx\n```";
        let result = extract(text, ["html", "HTML", ""]);
        assert_eq!(result.len(), 1);
        assert!(result.contains_key("html"));
    }

    #[test]
    fn test_unlabelled_fence_never_matches() {
        let text = "```\nbody\n```";
        assert!(extract(text, ["html"]).is_empty());
    }
}
