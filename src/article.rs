//! Defines the [`Article`] type, the central immutable value of the
//! pipeline, and its construction rules: how dates are derived and how a
//! placeholder stands in for an unloadable source. See [`Article::to_value`]
//! and [`Article::summarize`] for details on how articles are converted into
//! template values.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::frontmatter::Frontmatter;
use crate::sanitize::JsonMap;

/// Matches a leading `YYYY-MM-DD` on a slug or date scalar.
static DATE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})").unwrap());

/// A piece of dated content: slug, derived dates, canonical front-matter,
/// and the raw Markdown body. Static pages use the same shape; they are
/// simply never indexed by tag or date. Articles are frozen once built;
/// changes only happen by rebuilding the whole index.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    /// The unique identifier, derived from the source file name with the
    /// extension stripped.
    pub slug: String,

    /// The `YYYY-MM-DD` string used for ordering, or `""` when no parseable
    /// date exists.
    pub raw_date: String,

    /// The display date (`"March 12, 2021"`). Falls back to the raw date
    /// string when the date cannot be formatted, or `""` when there is no
    /// date at all.
    pub date: String,

    /// The normalized front-matter record.
    pub frontmatter: Frontmatter,

    /// The raw post-front-matter Markdown source. May be empty.
    pub body: String,
}

impl Article {
    /// Assembles an article from its slug, normalized front-matter, and raw
    /// body.
    ///
    /// A date embedded in the slug (Jekyll-style `2021-03-12-hello`) wins
    /// over the front-matter `date` field:
    ///
    /// ```
    /// use larder::article::Article;
    /// use larder::frontmatter::Frontmatter;
    ///
    /// let mut fm = Frontmatter::default();
    /// fm.date = Some("2020-01-01".to_owned());
    /// let article = Article::build("2021-03-12-hello", fm, String::new());
    /// assert_eq!(article.raw_date, "2021-03-12");
    /// assert_eq!(article.date, "March 12, 2021");
    /// ```
    pub fn build(slug: &str, frontmatter: Frontmatter, body: String) -> Article {
        let candidate = match DATE_PREFIX.find(slug) {
            Some(m) => Some(m.as_str().to_owned()),
            None => frontmatter
                .date
                .as_ref()
                .and_then(|date| date_prefix(date)),
        };

        let (raw_date, date) = match candidate {
            None => (String::new(), String::new()),
            Some(raw) => match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
                Ok(parsed) => {
                    let display = parsed.format("%B %-d, %Y").to_string();
                    (raw, display)
                }
                // Matched the shape but isn't a real date (`2021-13-45`):
                // unusable for ordering, but still shown verbatim.
                Err(_) => (String::new(), raw),
            },
        };

        Article {
            slug: slug.to_owned(),
            raw_date,
            date,
            frontmatter,
            body,
        }
    }

    /// A minimal article standing in for a source file that could not be
    /// loaded, so that one bad file never sinks the whole build.
    pub fn placeholder(slug: &str) -> Article {
        let mut frontmatter = Frontmatter::default();
        frontmatter.title = format!("Error loading post: {}", slug);
        Article::build(slug, frontmatter, String::new())
    }

    /// Converts the article into the JSON shape handed to templates:
    /// `{slug, frontmatter, body?}`. The display date overwrites the raw
    /// front-matter `date` field, and `tags`/`categories` are always arrays.
    pub fn to_value(&self, with_body: bool) -> Value {
        let mut object = JsonMap::new();
        object.insert("slug".to_owned(), Value::String(self.slug.clone()));
        object.insert(
            "frontmatter".to_owned(),
            Value::Object(self.frontmatter_value()),
        );
        if with_body {
            object.insert("body".to_owned(), Value::String(self.body.clone()));
        }
        Value::Object(object)
    }

    /// The summary shape used by listing pages: everything but the body.
    pub fn summarize(&self) -> Value {
        self.to_value(false)
    }

    fn frontmatter_value(&self) -> JsonMap {
        let fm = &self.frontmatter;
        let mut object = JsonMap::new();
        object.insert("title".to_owned(), Value::String(fm.title.clone()));
        object.insert("date".to_owned(), Value::String(self.date.clone()));
        if let Some(description) = &fm.description {
            object.insert(
                "description".to_owned(),
                Value::String(description.clone()),
            );
        }
        if let Some(image) = &fm.featured_image {
            object.insert("featured_image".to_owned(), Value::String(image.clone()));
        }
        if let Some(alt) = &fm.alt {
            object.insert("alt".to_owned(), Value::String(alt.clone()));
        }
        object.insert("tags".to_owned(), string_array(&fm.tags));
        object.insert("categories".to_owned(), string_array(&fm.categories));
        for (key, value) in &fm.extra {
            object.entry(key.clone()).or_insert_with(|| value.clone());
        }
        object
    }
}

fn date_prefix(value: &str) -> Option<String> {
    DATE_PREFIX
        .find(value.trim())
        .map(|m| m.as_str().to_owned())
}

fn string_array(items: &[String]) -> Value {
    Value::Array(
        items
            .iter()
            .map(|item| Value::String(item.clone()))
            .collect(),
    )
}
