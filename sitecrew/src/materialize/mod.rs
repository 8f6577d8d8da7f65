//! Writing generated projects to disk.
//!
//! A project directory holds one file per extracted artifact plus three
//! auxiliary files that are always written: `project_documentation.md`,
//! `README.md` and `package.json`. Re-running with the same project name
//! overwrites the previous files.

mod documents;
mod layout;

pub use documents::{
    document_title, render_documentation, render_package_json, slugify, ProjectReport, RoleSummary,
};
pub use layout::ArtifactLayout;

use crate::core::ExtractedArtifact;
use crate::errors::SitecrewError;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Project name used when none is given.
pub const DEFAULT_PROJECT_NAME: &str = "professional_website";

/// Output root used when none is configured.
pub const DEFAULT_OUTPUT_DIR: &str = "generated_app";

/// Longest accepted project name, in bytes.
const MAX_PROJECT_NAME_LEN: usize = 128;

/// Documentation file name.
pub const DOCUMENTATION_FILE: &str = "project_documentation.md";
/// README file name.
pub const README_FILE: &str = "README.md";
/// Package manifest file name.
pub const PACKAGE_FILE: &str = "package.json";

/// The files written for one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedProject {
    /// The project directory.
    pub dir: PathBuf,
    /// Every file written, in write order.
    pub files: Vec<PathBuf>,
}

/// Writes extracted artifacts and auxiliary files under an output root.
#[derive(Debug, Clone)]
pub struct Materializer {
    output_root: PathBuf,
    layout: ArtifactLayout,
}

impl Default for Materializer {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_DIR)
    }
}

impl Materializer {
    /// Creates a materializer writing under `output_root` with the default layout.
    #[must_use]
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
            layout: ArtifactLayout::default(),
        }
    }

    /// Sets the artifact layout.
    #[must_use]
    pub fn with_layout(mut self, layout: ArtifactLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Returns the output root.
    #[must_use]
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Returns the artifact layout.
    #[must_use]
    pub fn layout(&self) -> &ArtifactLayout {
        &self.layout
    }

    /// Writes a project.
    ///
    /// The name is validated before anything touches the filesystem.
    /// Artifacts whose label has no layout entry are skipped.
    ///
    /// # Errors
    ///
    /// Returns `InvalidProjectName` for unsafe names and `Io` for any
    /// filesystem failure. Files written before a failure are left in place.
    pub fn materialize(
        &self,
        project_name: &str,
        artifacts: &[ExtractedArtifact],
        report: &ProjectReport,
    ) -> Result<MaterializedProject, SitecrewError> {
        let name = validate_project_name(project_name)?;
        let dir = self.output_root.join(&name);

        fs::create_dir_all(&dir).map_err(|e| SitecrewError::io(&dir, e))?;

        let mut files = Vec::new();
        for artifact in artifacts {
            let Some(file_name) = self.layout.file_for(&artifact.label) else {
                warn!(label = %artifact.label, "No file mapped for artifact label; skipping");
                continue;
            };
            files.push(write_file(&dir, file_name, &artifact.content)?);
        }

        files.push(write_file(&dir, DOCUMENTATION_FILE, &render_documentation(&name, report))?);
        files.push(write_file(&dir, README_FILE, documents::README)?);
        files.push(write_file(&dir, PACKAGE_FILE, &render_package_json(&name)?)?);

        info!(
            project = %name,
            dir = %dir.display(),
            files = files.len(),
            "Project materialized"
        );
        Ok(MaterializedProject { dir, files })
    }
}

fn write_file(dir: &Path, file_name: &str, content: &str) -> Result<PathBuf, SitecrewError> {
    let path = dir.join(file_name);
    fs::write(&path, content).map_err(|e| SitecrewError::io(&path, e))?;
    debug!(path = %path.display(), bytes = content.len(), "Wrote file");
    Ok(path)
}

/// Trims a project name and checks that it is a single safe path segment.
///
/// A blank name yields [`DEFAULT_PROJECT_NAME`].
///
/// # Errors
///
/// Returns `InvalidProjectName` if the name contains path separators,
/// `..`, or characters outside `[A-Za-z0-9 _.-]`.
pub fn validate_project_name(project_name: &str) -> Result<String, SitecrewError> {
    let name = project_name.trim();
    if name.is_empty() {
        return Ok(DEFAULT_PROJECT_NAME.to_string());
    }

    let invalid = |reason: &str| SitecrewError::InvalidProjectName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.len() > MAX_PROJECT_NAME_LEN {
        return Err(invalid("name is too long"));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(invalid("name must not contain path separators"));
    }
    if name.contains("..") || name == "." {
        return Err(invalid("name must not refer to a parent or current directory"));
    }
    if let Some(found) = disallowed_name_chars()?.find(name) {
        return Err(invalid(&format!("character {:?} is not allowed", found.as_str())));
    }

    Ok(name.to_string())
}

fn disallowed_name_chars() -> Result<&'static Regex, SitecrewError> {
    static PATTERN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"[^A-Za-z0-9 _.\-]"))
        .as_ref()
        .map_err(|e| SitecrewError::Config(format!("Invalid project name pattern: {e}")))
}
