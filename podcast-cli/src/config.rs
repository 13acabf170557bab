use std::{collections::BTreeSet, fs};

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

use crate::shell;

pub const FILE_NAME: &str = "podcast.toml";

// Package selection stays at the top level of the file. It is not a
// flattened struct, since `serde_ignored` cannot see keys under a flatten.
#[derive(Clone, Deserialize, Debug)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub package: Option<String>,
    pub bin: Option<String>,
    pub default_features: bool,
    pub features: Vec<String>,
    pub build: Build,
    pub page: Page,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            package: None,
            bin: None,
            default_features: true,
            features: vec![],
            build: Build::default(),
            page: Page::default(),
        }
    }
}

#[derive(Clone, Deserialize, Debug)]
#[serde(default, rename_all = "kebab-case")]
pub struct Build {
    pub out_dir: Utf8PathBuf,
}

impl Default for Build {
    fn default() -> Self {
        Self {
            out_dir: "dist".into(),
        }
    }
}

/// Settings for the generated `index.html`.
#[derive(Clone, Deserialize, Debug)]
#[serde(default, rename_all = "kebab-case")]
pub struct Page {
    pub title: String,
    pub lang: String,
    pub stylesheets: Vec<String>,
    pub scripts: Vec<String>,
    pub prerender: bool,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            title: "Gerador de Podcast".to_string(),
            lang: "pt-BR".to_string(),
            stylesheets: vec![],
            scripts: vec![],
            prerender: true,
        }
    }
}

impl Config {
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("`{path}` is not a valid config file"))?;

        let (config, unused) =
            Self::parse(&contents).with_context(|| format!("failed to parse `{path}`"))?;
        for key in unused {
            shell().warn(format!("{path}: unused config key: {key}"));
        }
        Ok(config)
    }

    /// Parses a config, returning it along with every key it ignored.
    pub fn parse(contents: &str) -> Result<(Self, BTreeSet<String>)> {
        let mut unused = BTreeSet::new();
        let config: Self = serde_ignored::deserialize(toml::Deserializer::new(contents), |path| {
            unused.insert(path.to_string());
        })?;
        Ok((config, unused))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let (config, unused) = Config::parse("").unwrap();
        assert!(unused.is_empty());
        assert!(config.package.is_none());
        assert!(config.default_features);
        assert_eq!(config.build.out_dir, "dist");
        assert_eq!(config.page.lang, "pt-BR");
        assert!(config.page.prerender);
    }

    #[test]
    fn full_config() {
        let (config, unused) = Config::parse(
            r#"
            package = "podcast-web"
            bin = "podcast-web"
            default-features = false
            features = ["extra"]

            [build]
            out-dir = "public"

            [page]
            title = "Podcasts"
            stylesheets = ["index.css"]
            scripts = ["https://cdn.tailwindcss.com"]
            prerender = false
            "#,
        )
        .unwrap();

        assert!(unused.is_empty());
        assert_eq!(config.package.as_deref(), Some("podcast-web"));
        assert_eq!(config.bin.as_deref(), Some("podcast-web"));
        assert!(!config.default_features);
        assert_eq!(config.features, ["extra"]);
        assert_eq!(config.build.out_dir, "public");
        assert_eq!(config.page.title, "Podcasts");
        assert_eq!(config.page.lang, "pt-BR");
        assert_eq!(config.page.stylesheets, ["index.css"]);
        assert_eq!(config.page.scripts, ["https://cdn.tailwindcss.com"]);
        assert!(!config.page.prerender);
    }

    #[test]
    fn unknown_keys_are_reported() {
        let (_, unused) = Config::parse(
            r#"
            [build]
            minify = true

            [page]
            font = "serif"
            "#,
        )
        .unwrap();

        let unused: Vec<_> = unused.into_iter().collect();
        assert_eq!(unused, ["build.minify", "page.font"]);
    }

    #[test]
    fn misspelled_top_level_keys_are_reported() {
        let (config, unused) = Config::parse("pakage = \"podcast-web\"\nbinn = \"x\"\n").unwrap();

        let unused: Vec<_> = unused.into_iter().collect();
        assert_eq!(unused, ["binn", "pakage"]);
        assert!(config.package.is_none());
        assert!(config.bin.is_none());
    }

    #[test]
    fn invalid_types_fail() {
        assert!(Config::parse("[page]\nprerender = \"yes\"").is_err());
    }

    #[test]
    fn load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[build]\nout-dir = \"www\"").unwrap();

        let path = Utf8Path::from_path(file.path()).unwrap();
        let config = Config::load(path).unwrap();
        assert_eq!(config.build.out_dir, "www");
    }

    #[test]
    fn load_missing_file_fails() {
        let err = Config::load(Utf8Path::new("/nonexistent/podcast.toml")).unwrap_err();
        assert!(err.to_string().contains("is not a valid config file"));
    }
}
