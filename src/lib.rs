//! The library code for the `larder` content pipeline. The architecture can
//! be generally broken down into two distinct steps:
//!
//! 1. Loading articles and pages from source files on disk ([`crate::build`])
//! 2. Answering the queries that drive page generation ([`crate::query`])
//!
//! Of the two, the first is the more involved. It is itself composed of four
//! distinct sub-steps:
//!
//! 1. Enumerating source files ([`crate::source`])
//! 2. Splitting each file into front-matter and body, and normalizing the
//!    heterogeneous front-matter into one canonical shape
//!    ([`crate::frontmatter`])
//! 3. Assembling immutable [`crate::article::Article`] values, deriving the
//!    display date from the slug or the front-matter ([`crate::article`])
//! 4. Indexing the collected articles ([`crate::index`])
//!
//! The pipeline is deliberately hard to kill: a single unreadable or
//! malformed article becomes a placeholder and the build carries on. Only a
//! missing content directory or a duplicate slug stops it.
//!
//! The second step is a thin facade ([`crate::query::Queries`]) over the
//! built index. Everything it returns has been through the sanitizer
//! ([`crate::sanitize`]) and is safe to hand across a template boundary as
//! JSON. Article bodies stay raw Markdown until a caller asks for one, at
//! which point [`crate::markdown`] renders it.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod article;
pub mod build;
pub mod config;
pub mod frontmatter;
pub mod index;
pub mod markdown;
pub mod query;
pub mod sanitize;
pub mod source;
