//! Auxiliary project files: documentation, README and package manifest.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// One entry of the team roster printed in the project documentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleSummary {
    /// Short title, e.g. "Project Manager".
    pub title: String,
    /// What the role contributed.
    pub duty: String,
}

impl RoleSummary {
    /// Creates a roster entry.
    #[must_use]
    pub fn new(title: impl Into<String>, duty: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            duty: duty.into(),
        }
    }
}

/// Everything the documentation file needs besides the project name.
#[derive(Debug, Clone, Default)]
pub struct ProjectReport {
    /// The crew roster, in stage order.
    pub roles: Vec<RoleSummary>,
    /// The full aggregated output of the run.
    pub development_log: String,
}

impl ProjectReport {
    /// Creates a report.
    #[must_use]
    pub fn new(roles: Vec<RoleSummary>, development_log: impl Into<String>) -> Self {
        Self {
            roles,
            development_log: development_log.into(),
        }
    }
}

pub(crate) const README: &str = "\
# Professional Website Project

## Overview
This website was built by a multi-stage prompt pipeline with 8 specialized roles.

## Project Structure
```
/
├── index.html               # Main HTML file
├── styles.css               # Stylesheet
├── script.js                # JavaScript functionality
├── project_documentation.md # Complete development process
├── README.md                # This file
└── package.json             # Project dependencies
```

## Technologies Used
- HTML5 (Semantic markup)
- CSS3 (Modern features, Grid, Flexbox)
- Vanilla JavaScript (ES6+)
- Responsive Design
- SEO Optimization
- Accessibility (WCAG 2.1 AA)

## Features
- Mobile-first responsive design
- Cross-browser compatibility
- SEO optimized structure
- Accessibility compliant
- Performance optimized
- Professional code quality

## Getting Started
1. Open `index.html` in your browser
2. For development, use a local server
3. Customize content and styling as needed

## Performance
- Optimized for Core Web Vitals
- Lazy loading implementation
- Minified and compressed assets
- Fast loading times

## Accessibility
- WCAG 2.1 AA compliant
- Screen reader friendly
- Keyboard navigation support
- High contrast support

Generated by the sitecrew website crew
";

/// Turns a project name into a document title: underscores become spaces
/// and every word is capitalized.
///
/// `"professional_website"` becomes `"Professional Website"`.
#[must_use]
pub fn document_title(project_name: &str) -> String {
    let mut title = String::with_capacity(project_name.len());
    let mut previous_alphabetic = false;
    for c in project_name.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphabetic() {
            if previous_alphabetic {
                title.extend(c.to_lowercase());
            } else {
                title.extend(c.to_uppercase());
            }
            previous_alphabetic = true;
        } else {
            title.push(c);
            previous_alphabetic = false;
        }
    }
    title
}

/// Lowercases a project name and joins its alphanumeric runs with dashes,
/// e.g. `"My Site_v2"` becomes `"my-site-v2"`.
#[must_use]
pub fn slugify(project_name: &str) -> String {
    let slug = project_name
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "website".to_string()
    } else {
        slug
    }
}

/// Renders `project_documentation.md`.
#[must_use]
pub fn render_documentation(project_name: &str, report: &ProjectReport) -> String {
    let mut doc = String::new();
    let _ = writeln!(doc, "# {} - Project Documentation\n", document_title(project_name));
    doc.push_str("## Development Process\n\n");
    let _ = writeln!(
        doc,
        "This website was developed using a professional {}-agent development team:\n",
        report.roles.len()
    );
    for (i, role) in report.roles.iter().enumerate() {
        let _ = writeln!(doc, "{}. **{}** - {}", i + 1, role.title, role.duty);
    }
    doc.push_str("\n## Complete Development Log\n\n");
    doc.push_str(&report.development_log);
    doc
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PackageManifest<'a> {
    name: String,
    version: &'a str,
    description: &'a str,
    main: &'a str,
    scripts: BTreeMap<&'a str, &'a str>,
    keywords: [&'a str; 4],
    author: &'a str,
    license: &'a str,
    dev_dependencies: BTreeMap<&'a str, &'a str>,
}

/// Renders `package.json` for the project.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_package_json(project_name: &str) -> Result<String, serde_json::Error> {
    let manifest = PackageManifest {
        name: slugify(project_name),
        version: "1.0.0",
        description: "Professional website built with AI development team",
        main: "index.html",
        scripts: BTreeMap::from([
            ("serve", "python -m http.server 8000"),
            ("build", "echo 'Build process would go here'"),
            ("test", "echo 'Tests would go here'"),
        ]),
        keywords: ["website", "professional", "responsive", "seo"],
        author: "sitecrew",
        license: "MIT",
        dev_dependencies: BTreeMap::from([("live-server", "^1.2.2")]),
    };
    let mut json = serde_json::to_string_pretty(&manifest)?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_title() {
        assert_eq!(document_title("professional_website"), "Professional Website");
        assert_eq!(document_title("ACME corp_site"), "Acme Corp Site");
        assert_eq!(document_title("shop2go"), "Shop2Go");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("professional_website"), "professional-website");
        assert_eq!(slugify("My Site v2"), "my-site-v2");
        assert_eq!(slugify("..__.."), "website");
        assert_eq!(slugify("Caf\u{e9} Bar"), "caf-bar");
    }

    #[test]
    fn test_render_documentation() {
        let report = ProjectReport::new(
            vec![
                RoleSummary::new("Project Manager", "Project planning and coordination"),
                RoleSummary::new("QA Engineer", "Quality assurance and testing"),
            ],
            "LOG",
        );
        let doc = render_documentation("acme_site", &report);

        assert!(doc.starts_with("# Acme Site - Project Documentation\n\n## Development Process\n"));
        assert!(doc.contains("professional 2-agent development team"));
        assert!(doc.contains("1. **Project Manager** - Project planning and coordination\n"));
        assert!(doc.contains("2. **QA Engineer** - Quality assurance and testing\n"));
        assert!(doc.ends_with("## Complete Development Log\n\nLOG"));
    }

    #[test]
    fn test_render_package_json() {
        let json = render_package_json("Acme Site").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["name"], "acme-site");
        assert_eq!(value["main"], "index.html");
        assert_eq!(value["devDependencies"]["live-server"], "^1.2.2");
        assert_eq!(value["scripts"]["serve"], "python -m http.server 8000");
    }
}
