//! The in-memory content index.
//!
//! Holds every article and page for the duration of a build and answers the
//! queries page generation needs. The index is constructed once, after all
//! articles have been collected, and is read-only thereafter; the orderings
//! it hands out are part of its contract:
//!
//! * articles are newest-first by raw date, undated articles last, ties
//!   broken by slug ascending;
//! * per-tag listings share that global order;
//! * tag and slug listings are lexicographic.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::article::Article;

/// The immutable store of all articles and pages.
pub struct ContentIndex {
    articles: Vec<Article>,
    by_slug: HashMap<String, usize>,
    by_tag: BTreeMap<String, Vec<usize>>,
    pages: HashMap<String, Article>,
}

impl ContentIndex {
    /// Sorts the articles, checks slug uniqueness, and precomputes the
    /// per-tag lists. Pages keep their own namespace and are never indexed
    /// by tag or date.
    pub fn build(mut articles: Vec<Article>, pages: Vec<Article>) -> Result<ContentIndex> {
        // Descending raw-date comparison; the empty string is the smallest
        // value, so undated articles land at the end.
        articles.sort_by(|a, b| {
            b.raw_date
                .cmp(&a.raw_date)
                .then_with(|| a.slug.cmp(&b.slug))
        });

        let mut by_slug = HashMap::with_capacity(articles.len());
        for (i, article) in articles.iter().enumerate() {
            if by_slug.insert(article.slug.clone(), i).is_some() {
                return Err(Error::DuplicateSlug(article.slug.clone()));
            }
        }

        let mut by_tag: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (i, article) in articles.iter().enumerate() {
            for tag in &article.frontmatter.tags {
                by_tag.entry(tag.clone()).or_default().push(i);
            }
        }

        let mut page_map = HashMap::with_capacity(pages.len());
        for page in pages {
            let slug = page.slug.clone();
            if page_map.insert(slug.clone(), page).is_some() {
                return Err(Error::DuplicateSlug(slug));
            }
        }

        Ok(ContentIndex {
            articles,
            by_slug,
            by_tag,
            pages: page_map,
        })
    }

    /// All articles, newest first.
    pub fn all_articles(&self) -> &[Article] {
        &self.articles
    }

    /// Exact-match lookup by slug.
    pub fn article_by_slug(&self, slug: &str) -> Option<&Article> {
        self.by_slug.get(slug).map(|&i| &self.articles[i])
    }

    /// The articles carrying `tag`, in the global order. Matching is exact
    /// and case-sensitive; unknown tags yield an empty list.
    pub fn articles_by_tag(&self, tag: &str) -> Vec<&Article> {
        match self.by_tag.get(tag) {
            Some(indices) => indices.iter().map(|&i| &self.articles[i]).collect(),
            None => Vec::new(),
        }
    }

    /// The tag universe: every tag on every article, lexicographically
    /// sorted and deduplicated.
    pub fn all_tags(&self) -> Vec<&str> {
        self.by_tag.keys().map(String::as_str).collect()
    }

    /// Every article slug, lexicographically sorted.
    pub fn all_slugs(&self) -> Vec<&str> {
        let mut slugs: Vec<&str> = self
            .articles
            .iter()
            .map(|article| article.slug.as_str())
            .collect();
        slugs.sort_unstable();
        slugs
    }

    /// Exact-match page lookup by slug.
    pub fn page_by_slug(&self, slug: &str) -> Option<&Article> {
        self.pages.get(slug)
    }
}

/// Represents the result of building a [`ContentIndex`].
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a fatal indexing error.
#[derive(Debug)]
pub enum Error {
    /// Returned when two source files produce the same slug.
    DuplicateSlug(String),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::DuplicateSlug(slug) => write!(f, "Duplicate slug `{}`", slug),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::frontmatter::Frontmatter;

    fn article(slug: &str, tags: &[&str]) -> Article {
        let mut fm = Frontmatter::default();
        fm.tags = tags.iter().map(|t| t.to_string()).collect();
        Article::build(slug, fm, String::new())
    }

    fn dated(slug: &str, date: &str, tags: &[&str]) -> Article {
        let mut fm = Frontmatter::default();
        fm.date = Some(date.to_owned());
        fm.tags = tags.iter().map(|t| t.to_string()).collect();
        Article::build(slug, fm, String::new())
    }

    #[test]
    fn test_ordering_newest_first_undated_last() {
        let index = ContentIndex::build(
            vec![
                dated("b", "2022-05-01", &[]),
                dated("a", "2022-05-01", &[]),
                article("c", &[]),
            ],
            Vec::new(),
        )
        .unwrap();

        let slugs: Vec<&str> = index.all_articles().iter().map(|a| a.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_ordering_invariant_pairwise() {
        let index = ContentIndex::build(
            vec![
                dated("kale-salad", "2020-01-05", &[]),
                dated("granola", "2021-11-20", &[]),
                article("about-me", &[]),
                dated("soup", "2020-01-05", &[]),
            ],
            Vec::new(),
        )
        .unwrap();

        let articles = index.all_articles();
        for window in articles.windows(2) {
            let (a, b) = (&window[0], &window[1]);
            assert!(
                a.raw_date > b.raw_date || (a.raw_date == b.raw_date && a.slug < b.slug),
                "{} must precede {}",
                a.slug,
                b.slug
            );
        }
    }

    #[test]
    fn test_duplicate_slug_fatal() {
        let result = ContentIndex::build(
            vec![article("granola", &[]), article("granola", &[])],
            Vec::new(),
        );
        match result {
            Err(Error::DuplicateSlug(slug)) => assert_eq!(slug, "granola"),
            _ => panic!("expected DuplicateSlug"),
        }
    }

    #[test]
    fn test_duplicate_page_slug_fatal() {
        let result = ContentIndex::build(
            Vec::new(),
            vec![article("about", &[]), article("about", &[])],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_article_by_slug_round_trip() {
        let index = ContentIndex::build(
            vec![
                dated("granola", "2021-01-01", &["paleo"]),
                dated("soup", "2020-01-01", &[]),
            ],
            Vec::new(),
        )
        .unwrap();

        for article in index.all_articles() {
            assert_eq!(index.article_by_slug(&article.slug), Some(article));
        }
        assert!(index.article_by_slug("missing").is_none());
    }

    #[test]
    fn test_tag_universe() {
        let index = ContentIndex::build(
            vec![
                dated("one", "2021-01-03", &["paleo", "desserts"]),
                dated("two", "2021-01-02", &["paleo"]),
                dated("three", "2021-01-01", &[]),
            ],
            Vec::new(),
        )
        .unwrap();

        assert_eq!(index.all_tags(), vec!["desserts", "paleo"]);

        // Every listed article carries the tag, and every carrier is listed.
        for tag in index.all_tags() {
            for article in index.articles_by_tag(tag) {
                assert!(article.frontmatter.tags.iter().any(|t| t == tag));
            }
        }
        for article in index.all_articles() {
            for tag in &article.frontmatter.tags {
                assert!(index
                    .articles_by_tag(tag)
                    .iter()
                    .any(|a| a.slug == article.slug));
            }
        }
    }

    #[test]
    fn test_articles_by_tag_global_order() {
        let index = ContentIndex::build(
            vec![
                dated("old", "2019-01-01", &["paleo"]),
                dated("new", "2021-01-01", &["paleo"]),
                dated("mid", "2020-01-01", &["paleo"]),
            ],
            Vec::new(),
        )
        .unwrap();

        let slugs: Vec<&str> = index
            .articles_by_tag("paleo")
            .iter()
            .map(|a| a.slug.as_str())
            .collect();
        assert_eq!(slugs, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_tag_matching_case_sensitive() {
        let index = ContentIndex::build(
            vec![dated("one", "2021-01-01", &["Paleo"])],
            Vec::new(),
        )
        .unwrap();
        assert!(index.articles_by_tag("paleo").is_empty());
        assert_eq!(index.articles_by_tag("Paleo").len(), 1);
    }

    #[test]
    fn test_all_slugs_lexicographic() {
        let index = ContentIndex::build(
            vec![
                dated("zucchini", "2021-01-01", &[]),
                dated("apple-pie", "2019-01-01", &[]),
                article("granola", &[]),
            ],
            Vec::new(),
        )
        .unwrap();
        assert_eq!(index.all_slugs(), vec!["apple-pie", "granola", "zucchini"]);
    }

    #[test]
    fn test_pages_separate_namespace() {
        let index = ContentIndex::build(
            vec![dated("about", "2021-01-01", &["paleo"])],
            vec![article("about", &["paleo"])],
        )
        .unwrap();

        // An article and a page may share a slug without conflict.
        assert!(index.page_by_slug("about").is_some());
        assert!(index.article_by_slug("about").is_some());
        // Pages never join the tag index.
        assert_eq!(index.articles_by_tag("paleo").len(), 1);
    }
}
