//! Build configuration loaded from TOML.
//!
//! Embedders that drive builds from a config file rather than code use
//! [`GraphConfig`]: a small TOML surface covering which collections to
//! exclude and how indirect resolution behaves. A missing file yields the
//! defaults, so configuration stays optional.
//!
//! ```toml
//! [build]
//! exclude = ["menus", "menu-items", "drafts"]
//!
//! [indirect]
//! enabled = true
//! max-depth = 2
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use weft_core::{ContentSource, NAV_COLLECTIONS};

use crate::build::{BuildOptions, DEFAULT_INDIRECT_DEPTH};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GraphConfig {
    pub build: BuildSection,
    pub indirect: IndirectSection,
}

/// `[build]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BuildSection {
    /// Collections never included in a build.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
    /// Whether the cache may serve and store builds.
    #[serde(default = "default_true")]
    pub cache: bool,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            exclude: default_exclude(),
            cache: default_true(),
        }
    }
}

/// `[indirect]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct IndirectSection {
    pub enabled: bool,
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
}

impl Default for IndirectSection {
    fn default() -> Self {
        Self {
            enabled: false,
            max_depth: default_max_depth(),
        }
    }
}

fn default_exclude() -> Vec<String> {
    NAV_COLLECTIONS.iter().map(ToString::to_string).collect()
}

fn default_true() -> bool {
    true
}

fn default_max_depth() -> u32 {
    DEFAULT_INDIRECT_DEPTH
}

impl GraphConfig {
    /// Load configuration from a TOML file. A missing file is not an error;
    /// it yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parse config {}", path.display()))
    }

    /// Resolve this configuration against a source into concrete
    /// [`BuildOptions`] with an explicit collection list.
    pub fn to_options(&self, source: &impl ContentSource) -> BuildOptions {
        let collections = source
            .list_collections()
            .into_iter()
            .filter(|name| !self.build.exclude.contains(name))
            .collect();
        BuildOptions {
            collections: Some(collections),
            include_indirect: self.indirect.enabled,
            max_indirect_depth: self.indirect.max_depth,
            cache: self.build.cache,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use weft_core::MemorySource;

    #[test]
    fn defaults_match_build_option_defaults() {
        let config = GraphConfig::default();
        assert_eq!(config.build.exclude, ["menus", "menu-items"]);
        assert!(config.build.cache);
        assert!(!config.indirect.enabled);
        assert_eq!(config.indirect.max_depth, DEFAULT_INDIRECT_DEPTH);
    }

    #[test]
    fn parses_partial_toml_over_defaults() {
        let config: GraphConfig = toml::from_str(
            r#"
            [indirect]
            enabled = true
            max-depth = 2
            "#,
        )
        .unwrap();
        assert!(config.indirect.enabled);
        assert_eq!(config.indirect.max_depth, 2);
        assert_eq!(config.build.exclude, ["menus", "menu-items"]);
    }

    #[test]
    fn load_missing_file_yields_defaults() {
        let config = GraphConfig::load(Path::new("/nonexistent/weft.toml")).unwrap();
        assert_eq!(config, GraphConfig::default());
    }

    #[test]
    fn load_reads_and_parses_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("weft.toml");
        std::fs::write(&path, "[build]\nexclude = [\"drafts\"]\ncache = false\n").unwrap();

        let config = GraphConfig::load(&path).unwrap();
        assert_eq!(config.build.exclude, ["drafts"]);
        assert!(!config.build.cache);
    }

    #[test]
    fn load_rejects_malformed_toml() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("weft.toml");
        std::fs::write(&path, "not [valid toml").unwrap();
        assert!(GraphConfig::load(&path).is_err());
    }

    #[test]
    fn to_options_excludes_configured_collections() {
        let source = MemorySource::new()
            .with_collection("posts", vec![])
            .with_collection("drafts", vec![])
            .with_collection("menus", vec![]);
        let mut config = GraphConfig::default();
        config.build.exclude.push("drafts".to_string());

        let options = config.to_options(&source);
        assert_eq!(options.collections, Some(vec!["posts".to_string()]));
        assert!(!options.include_indirect);
    }
}
