use std::path::PathBuf;

/// Rewrites `\` separators to `/`, the form git listings and path prefixes use.
pub fn normalize_separators(raw: &str) -> String {
    raw.replace('\\', "/")
}

/// A repository-relative file path with separators normalized to `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidatePath {
    raw: String,
}

impl CandidatePath {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self {
            raw: normalize_separators(raw.as_ref()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Lower-cased extension without the leading dot, if the file name has one.
    pub fn extension(&self) -> Option<String> {
        let name = self.segments().last()?;
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.raw.split('/').filter(|s| !s.is_empty())
    }

    pub fn class(&self) -> ExtensionClass {
        self.extension()
            .map(|ext| ExtensionClass::of(&ext))
            .unwrap_or(ExtensionClass::Other)
    }
}

impl std::fmt::Display for CandidatePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// How a file is handed to the formatter, decided by its extension alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionClass {
    /// Formatted in place (`.h`, `.cpp`, `.cs`).
    Source,
    /// Unreal manifests, streamed through the formatter as JSON (`.uplugin`, `.uproject`).
    Json,
    Other,
}

impl ExtensionClass {
    pub const SOURCE_EXTENSIONS: &'static [&'static str] = &["h", "cpp", "cs"];
    pub const JSON_EXTENSIONS: &'static [&'static str] = &["uplugin", "uproject"];

    /// `ext` must already be lower-cased.
    pub fn of(ext: &str) -> Self {
        if Self::SOURCE_EXTENSIONS.contains(&ext) {
            ExtensionClass::Source
        } else if Self::JSON_EXTENSIONS.contains(&ext) {
            ExtensionClass::Json
        } else {
            ExtensionClass::Other
        }
    }
}

/// Which projects and plugins contribute first-party source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InclusionRules {
    /// Project root names. An empty name means the root itself is the project.
    pub projects: Vec<String>,
    pub plugin_allowlist: Vec<String>,
    pub source_subpath: String,
}

impl InclusionRules {
    pub const SOURCE_SUBPATH: &'static str = "Source/";

    pub fn new(projects: Vec<String>, plugin_allowlist: Vec<String>) -> Self {
        Self {
            projects,
            plugin_allowlist,
            source_subpath: Self::SOURCE_SUBPATH.to_string(),
        }
    }

    /// Rules for running from inside a single project directory.
    pub fn single_project(plugin_allowlist: Vec<String>) -> Self {
        Self::new(vec![String::new()], plugin_allowlist)
    }

    pub fn project_prefix(project: &str) -> String {
        let project = project.trim_matches('/');
        if project.is_empty() {
            String::new()
        } else {
            format!("{}/", project)
        }
    }
}

impl Default for InclusionRules {
    fn default() -> Self {
        Self::new(
            vec!["Blaster".to_string(), "MenuSystem".to_string()],
            vec!["RuleRanger".to_string(), "MultiplayerSessions".to_string()],
        )
    }
}

/// Output of the file selector. Both lists keep candidate order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Selection {
    pub source_files: Vec<CandidatePath>,
    pub json_files: Vec<CandidatePath>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.source_files.is_empty() && self.json_files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.source_files.len() + self.json_files.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Every tracked file, plus anything staged in the index.
    FullTree,
    /// Only files that differ from the reference revision.
    ChangedSet,
}

/// Settings for a format run after merging the config file and CLI args.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub rules: InclusionRules,
    pub formatter: String,
    pub reference: String,
    /// Sub-project root relative to the git top-level. `None` derives it from the working directory.
    pub root: Option<String>,
    pub check: bool,
    pub verbose: bool,
    pub paths: Vec<PathBuf>,
}
