//! The read-only query facade consumed by the site builder and templates.
//!
//! Everything returned here has been through the sanitizer and is safe to
//! serialize as JSON. Unknown slugs and tags come back as `None` or an
//! empty list: a query can tell the caller "not found", but it never fails.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::article::Article;
use crate::index::ContentIndex;
use crate::markdown;
use crate::sanitize;

/// The slug grammar. Slugs are file-name-derived and are not URL-encoded;
/// anything outside this alphabet never names an article.
static SLUG_GRAMMAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").unwrap());

/// Options for [`Queries::get_article`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ArticleOptions {
    /// Include the raw Markdown body and its rendered HTML.
    pub with_body: bool,
}

/// A borrowed view over a built [`ContentIndex`].
pub struct Queries<'a> {
    index: &'a ContentIndex,
}

impl<'a> Queries<'a> {
    pub fn new(index: &'a ContentIndex) -> Queries<'a> {
        Queries { index }
    }

    /// Summaries (no bodies) of every article, newest first.
    pub fn list_article_summaries(&self) -> Value {
        let items: Vec<Value> = self
            .index
            .all_articles()
            .iter()
            .map(Article::summarize)
            .collect();
        sanitize::sanitize(&Value::Array(items))
    }

    /// Every article slug, lexicographically sorted.
    pub fn list_slugs(&self) -> Value {
        let slugs: Vec<Value> = self
            .index
            .all_slugs()
            .into_iter()
            .map(|slug| Value::String(slug.to_owned()))
            .collect();
        sanitize::sanitize(&Value::Array(slugs))
    }

    /// A single article by slug; `None` when the slug is unknown or
    /// malformed. With `with_body` the raw body is included along with
    /// `body_html`, the one place the Markdown transformer runs, once per
    /// requested article.
    pub fn get_article(&self, slug: &str, opts: ArticleOptions) -> Option<Value> {
        if !check_slug(slug) {
            return None;
        }
        let article = self.index.article_by_slug(slug)?;
        let mut value = article.to_value(opts.with_body);
        if opts.with_body {
            if let Value::Object(object) = &mut value {
                object.insert(
                    "body_html".to_owned(),
                    Value::String(markdown::to_html(&article.body)),
                );
            }
        }
        Some(sanitize::sanitize(&value))
    }

    /// The tag universe, lexicographically sorted.
    pub fn list_tags(&self) -> Value {
        let tags: Vec<Value> = self
            .index
            .all_tags()
            .into_iter()
            .map(|tag| Value::String(tag.to_owned()))
            .collect();
        sanitize::sanitize(&Value::Array(tags))
    }

    /// Summaries of the articles carrying `tag`, in the global order. Empty
    /// for unknown or empty tags.
    pub fn list_articles_by_tag(&self, tag: &str) -> Value {
        if tag.is_empty() {
            tracing::warn!("Query for empty tag");
            return Value::Array(Vec::new());
        }
        let items: Vec<Value> = self
            .index
            .articles_by_tag(tag)
            .into_iter()
            .map(Article::summarize)
            .collect();
        sanitize::sanitize(&Value::Array(items))
    }

    /// A single page by slug, body included; `None` when the slug is unknown
    /// or malformed. Page bodies are handed over raw; pages go through
    /// their own rendering path downstream.
    pub fn get_page(&self, slug: &str) -> Option<Value> {
        if !check_slug(slug) {
            return None;
        }
        let page = self.index.page_by_slug(slug)?;
        Some(sanitize::sanitize(&page.to_value(true)))
    }
}

fn check_slug(slug: &str) -> bool {
    if SLUG_GRAMMAR.is_match(slug) {
        true
    } else {
        tracing::warn!("Query for invalid slug `{}`", slug);
        false
    }
}
