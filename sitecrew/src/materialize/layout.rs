//! Mapping from artifact labels to file names.

/// Where each extracted artifact is written inside the project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    entries: Vec<(String, String)>,
}

impl Default for ArtifactLayout {
    fn default() -> Self {
        Self::empty()
            .with_file("html", "index.html")
            .with_file("css", "styles.css")
            .with_file("javascript", "script.js")
    }
}

impl ArtifactLayout {
    /// Creates a layout with no entries.
    #[must_use]
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// Maps `label` to `file_name`, replacing any previous mapping for the label.
    #[must_use]
    pub fn with_file(mut self, label: impl Into<String>, file_name: impl Into<String>) -> Self {
        let label = label.into();
        let file_name = file_name.into();
        match self.entries.iter_mut().find(|(l, _)| l.eq_ignore_ascii_case(&label)) {
            Some(entry) => entry.1 = file_name,
            None => self.entries.push((label, file_name)),
        }
        self
    }

    /// Returns the file name for a label (ASCII case-insensitive).
    #[must_use]
    pub fn file_for(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(l, _)| l.eq_ignore_ascii_case(label))
            .map(|(_, f)| f.as_str())
    }

    /// Returns the labels in layout order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let layout = ArtifactLayout::default();
        assert_eq!(layout.file_for("html"), Some("index.html"));
        assert_eq!(layout.file_for("CSS"), Some("styles.css"));
        assert_eq!(layout.file_for("javascript"), Some("script.js"));
        assert_eq!(layout.file_for("python"), None);
        assert_eq!(layout.labels().collect::<Vec<_>>(), vec!["html", "css", "javascript"]);
    }

    #[test]
    fn test_with_file_replaces_mapping() {
        let layout = ArtifactLayout::default().with_file("HTML", "home.html");
        assert_eq!(layout.file_for("html"), Some("home.html"));
        assert_eq!(layout.labels().count(), 3);
    }
}
