//! Line-oriented fence scanner.
//!
//! The scanner walks the text once, line by line, and reports every
//! well-formed fenced region. It keeps a single piece of state (the currently
//! open fence), so its cost is linear in the input no matter how the fences
//! are arranged.

/// Three backticks open and close a region.
const FENCE: &str = "```";

/// A fenced region found in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FencedRegion<'a> {
    /// First word of the info string after the opening fence ("" if none).
    pub label: &'a str,
    /// Everything between the opening and closing fence lines.
    pub body: &'a str,
    /// Byte offset of the opening fence line.
    pub start: usize,
    /// Byte offset just past the closing fence line.
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    Open { label: &'a str },
    Close,
    Text,
}

#[derive(Debug, Clone, Copy)]
struct OpenFence<'a> {
    label: &'a str,
    start: usize,
    body_start: usize,
}

/// Iterator over the fenced regions of a text.
#[derive(Debug, Clone)]
pub struct FenceScanner<'a> {
    text: &'a str,
    pos: usize,
    open: Option<OpenFence<'a>>,
}

impl<'a> FenceScanner<'a> {
    /// Creates a scanner over `text`.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            open: None,
        }
    }
}

impl<'a> Iterator for FenceScanner<'a> {
    type Item = FencedRegion<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.text.len() {
            let line_start = self.pos;
            let rest = &self.text[line_start..];
            let (line, line_end) = match rest.find('\n') {
                Some(i) => (&rest[..i], line_start + i + 1),
                None => (rest, self.text.len()),
            };
            self.pos = line_end;

            match (classify(line), self.open) {
                (Line::Open { label }, _) => {
                    // A new opening fence while one is open makes the outer
                    // region malformed; it is dropped and scanning restarts here.
                    self.open = Some(OpenFence {
                        label,
                        start: line_start,
                        body_start: line_end,
                    });
                }
                (Line::Close, Some(open)) => {
                    self.open = None;
                    return Some(FencedRegion {
                        label: open.label,
                        body: &self.text[open.body_start..line_start],
                        start: open.start,
                        end: line_end,
                    });
                }
                (Line::Close, None) => {
                    // A bare fence with nothing open starts an unlabelled region.
                    self.open = Some(OpenFence {
                        label: "",
                        start: line_start,
                        body_start: line_end,
                    });
                }
                (Line::Text, _) => {}
            }
        }
        None
    }
}

fn classify(line: &str) -> Line<'_> {
    let trimmed = line.trim_start();
    if !trimmed.starts_with(FENCE) {
        return Line::Text;
    }

    let after = trimmed.trim_start_matches('`');
    let info = after.trim();
    if info.is_empty() {
        return Line::Close;
    }

    // A backtick in the info string means this is inline code, not a fence.
    if info.contains('`') {
        return Line::Text;
    }

    let label = info.split_whitespace().next().unwrap_or_default();
    Line::Open { label }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regions(text: &str) -> Vec<(&str, &str)> {
        FenceScanner::new(text).map(|r| (r.label, r.body)).collect()
    }

    #[test]
    fn test_single_region() {
        let text = "intro\n```html\n<p>hi</p>\n```\noutro";
        assert_eq!(regions(text), vec![("html", "<p>hi</p>\n")]);
    }

    #[test]
    fn test_region_offsets() {
        let text = "a\n```css\nb\n```\nc";
        let region = FenceScanner::new(text).next().unwrap();
        assert_eq!(region.start, 2);
        assert_eq!(&text[region.start..region.end], "```css\nb\n```\n");
    }

    #[test]
    fn test_info_string_takes_first_word() {
        let text = "```javascript title=\"app.js\"\nrun();\n```";
        assert_eq!(regions(text), vec![("javascript", "run();\n")]);
    }

    #[test]
    fn test_indented_fences() {
        let text = "1. Step\n   ```css\n   p {}\n   ```\n";
        assert_eq!(regions(text), vec![("css", "   p {}\n")]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = "```html\r\n<b>x</b>\r\n```\r\n";
        let found = regions(text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, "html");
        assert_eq!(found[0].1.trim(), "<b>x</b>");
    }

    #[test]
    fn test_unterminated_region_is_dropped() {
        let text = "```html\n<p>never closed</p>\n";
        assert!(regions(text).is_empty());
    }

    #[test]
    fn test_overlapping_open_drops_outer_region() {
        let text = "```html\n<p>outer</p>\n```css\np {}\n```\n";
        assert_eq!(regions(text), vec![("css", "p {}\n")]);
    }

    #[test]
    fn test_unlabelled_region() {
        let text = "```\nplain\n```\n```html\nx\n```";
        assert_eq!(regions(text), vec![("", "plain\n"), ("html", "x\n")]);
    }

    #[test]
    fn test_inline_backticks_are_text() {
        let text = "use ```html``` fences\n```css\na\n```";
        assert_eq!(regions(text), vec![("css", "a\n")]);
    }

    #[test]
    fn test_empty_input() {
        assert!(regions("").is_empty());
    }
}
