//! Exports the [`build_index`] family of functions which stitch together the
//! high-level steps of a build: enumerating source files
//! ([`crate::source`]), splitting and normalizing front-matter
//! ([`crate::frontmatter`]), assembling articles ([`crate::article`]), and
//! indexing the result ([`crate::index`]).
//!
//! The failure policy lives here. A file that cannot be read or parsed is
//! absorbed as a placeholder article and logged; one bad article
//! never aborts the build. Only two things are fatal: a content directory
//! that cannot be listed, and two files producing the same slug.

use std::fmt;
use std::path::Path;

use crate::article::Article;
use crate::config::Config;
use crate::frontmatter::{self, Frontmatter};
use crate::index::{self, ContentIndex};
use crate::source::{self, SourceFile};

/// Builds the content index from the configured content tree,
/// single-threaded.
pub fn build_index(config: &Config) -> Result<ContentIndex> {
    build_index_with_threads(config, 1)
}

/// Builds the content index, parsing files on one worker per CPU.
pub fn build_index_parallel(config: &Config) -> Result<ContentIndex> {
    build_index_with_threads(config, num_cpus::get())
}

/// Builds the content index with an explicit worker count. The result is
/// identical whatever the count: ordering is established by the index sort
/// after all articles have been collected.
pub fn build_index_with_threads(config: &Config, threads: usize) -> Result<ContentIndex> {
    let articles = load_articles(&config.articles_dir, &config.article_ext, threads)?;
    let pages = load_articles(&config.pages_dir, &config.page_ext, threads)?;
    tracing::info!(
        "Loaded {} articles and {} pages",
        articles.len(),
        pages.len()
    );
    match ContentIndex::build(articles, pages) {
        Ok(index) => Ok(index),
        Err(err) => {
            tracing::error!("{}", err);
            Err(err.into())
        }
    }
}

/// Loads every article under `dir`, absorbing per-file failures into
/// placeholder articles.
pub fn load_articles(dir: &Path, ext: &str, threads: usize) -> Result<Vec<Article>> {
    let files = source::list_files(dir, ext)?;
    if threads < 2 {
        Ok(files.iter().map(load_one).collect())
    } else {
        Ok(load_parallel(files, threads))
    }
}

fn load_one(file: &SourceFile) -> Article {
    match read_and_parse(file) {
        Ok(article) => article,
        Err(err) => {
            tracing::warn!(
                "Failed to load `{}`: {}; emitting placeholder",
                file.path.display(),
                err
            );
            Article::placeholder(&file.slug)
        }
    }
}

fn read_and_parse(file: &SourceFile) -> std::result::Result<Article, LoadError> {
    let text = source::read_file(&file.path)?;
    let (yaml, body) = frontmatter::split(&text)?;
    let frontmatter = match yaml {
        Some(yaml) => frontmatter::parse(yaml)?,
        None => Frontmatter::default(),
    };
    Ok(Article::build(&file.slug, frontmatter, body.to_owned()))
}

/// Fans the per-file stage out over a bounded pool of workers. Collection
/// order is nondeterministic; callers must not rely on it.
fn load_parallel(files: Vec<SourceFile>, threads: usize) -> Vec<Article> {
    use crossbeam_channel::unbounded;
    use std::thread;

    let (tx, rx) = unbounded::<SourceFile>();
    let mut workers = Vec::with_capacity(threads);

    for _ in 0..workers.capacity() {
        let rx = rx.clone();
        workers.push(thread::spawn(move || -> Vec<Article> {
            let mut articles = Vec::new();
            for file in rx {
                articles.push(load_one(&file));
            }
            articles
        }))
    }

    for file in files {
        // Workers outlive the send loop; the channel can't disconnect here.
        tx.send(file).expect("worker pool disconnected");
    }
    drop(tx);

    let mut articles = Vec::new();
    for worker in workers {
        articles.extend(worker.join().expect("worker panicked"));
    }
    articles
}

/// Per-file failure, absorbed into a placeholder by [`load_one`].
#[derive(Debug)]
enum LoadError {
    Io(std::io::Error),
    Frontmatter(frontmatter::Error),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LoadError::Io(err) => err.fmt(f),
            LoadError::Frontmatter(err) => err.fmt(f),
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> LoadError {
        LoadError::Io(err)
    }
}

impl From<frontmatter::Error> for LoadError {
    fn from(err: frontmatter::Error) -> LoadError {
        LoadError::Frontmatter(err)
    }
}

/// Represents the result of a fallible build operation.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for building the content index. Only configuration-level
/// problems land here; per-file failures become placeholders.
#[derive(Debug)]
pub enum Error {
    /// Returned when a content directory cannot be listed.
    Source(source::Error),

    /// Returned when two source files produce the same slug.
    Index(index::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Source(err) => err.fmt(f),
            Error::Index(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Source(err) => Some(err),
            Error::Index(err) => Some(err),
        }
    }
}

impl From<source::Error> for Error {
    /// Converts a [`source::Error`] into an [`Error`]. This allows us to use
    /// the `?` operator for source enumeration.
    fn from(err: source::Error) -> Error {
        Error::Source(err)
    }
}

impl From<index::Error> for Error {
    /// Converts an [`index::Error`] into an [`Error`]. This allows us to use
    /// the `?` operator when building the index.
    fn from(err: index::Error) -> Error {
        Error::Index(err)
    }
}
