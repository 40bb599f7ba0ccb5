//! Pipeline configuration and the redirect table.
//!
//! The pipeline reads no environment variables; everything it needs arrives
//! through a [`Config`] value, usually loaded from a `larder.yaml` found in
//! the project directory (or any ancestor). Exactly four options are
//! recognized (the two content directories and the two file extensions);
//! unknown keys are rejected.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::Deserialize;

const PROJECT_FILE: &str = "larder.yaml";

/// Where the pipeline finds its content.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory containing dated articles.
    #[serde(default = "default_articles_dir")]
    pub articles_dir: PathBuf,

    /// Directory containing static pages.
    #[serde(default = "default_pages_dir")]
    pub pages_dir: PathBuf,

    /// File extension for articles, including the leading dot.
    #[serde(default = "default_article_ext")]
    pub article_ext: String,

    /// File extension for pages, including the leading dot.
    #[serde(default = "default_page_ext")]
    pub page_ext: String,
}

fn default_articles_dir() -> PathBuf {
    PathBuf::from("_posts")
}

fn default_pages_dir() -> PathBuf {
    PathBuf::from("content/pages")
}

fn default_article_ext() -> String {
    String::from(".md")
}

fn default_page_ext() -> String {
    String::from(".mdx")
}

impl Default for Config {
    fn default() -> Config {
        Config {
            articles_dir: default_articles_dir(),
            pages_dir: default_pages_dir(),
            article_ext: default_article_ext(),
            page_ext: default_page_ext(),
        }
    }
}

impl Config {
    /// Loads configuration from a project file, resolving the content
    /// directories relative to the file's location.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let mut config: Config = serde_yaml::from_reader(open(path, "project")?)
            .map_err(|e| anyhow!("Parsing `{}`: {}", path.display(), e))?;
        if let Some(project_root) = path.parent() {
            config.articles_dir = project_root.join(&config.articles_dir);
            config.pages_dir = project_root.join(&config.pages_dir);
        }
        Ok(config)
    }

    /// Searches `dir` and its ancestors for a `larder.yaml` project file.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            Config::from_project_file(&path)
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent),
                None => Err(anyhow!(
                    "Could not find `{}` in any parent directory",
                    PROJECT_FILE
                )),
            }
        }
    }
}

/// A redirect entry consumed by the site builder. The pipeline carries the
/// table but never interprets it.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Redirect {
    pub source: String,
    pub destination: String,
    #[serde(default)]
    pub permanent: bool,
}

/// Loads the redirect table from a YAML list. A missing file is an empty
/// table, not an error.
pub fn load_redirects(path: &Path) -> Result<Vec<Redirect>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    serde_yaml::from_reader(open(path, "redirects")?)
        .map_err(|e| anyhow!("Parsing `{}`: {}", path.display(), e))
}

fn open(path: &Path, kind: &str) -> Result<File> {
    match File::open(path) {
        Err(e) => Err(anyhow!(
            "Opening {} file `{}`: {}",
            kind,
            path.display(),
            e
        )),
        Ok(file) => Ok(file),
    }
}
