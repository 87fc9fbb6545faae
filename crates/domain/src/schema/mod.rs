//! Schema machinery shared by every campaign entity
//!
//! A schema turns an untyped JSON value into a fully-defaulted typed value.
//! Parsing never stops at the first problem: each entity reads its fields
//! through a [`SchemaContext`], which remembers where in the document it is
//! and collects one [`Issue`] per violated constraint. Composite entities
//! call their parts' `parse` with the same context, so a single pass over a
//! campaign yields every issue with its full path.

mod choice;
mod fields;

pub use choice::Choice;
pub use fields::{Bounds, Fields};
pub(crate) use fields::whole_number;

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Number of issues shown before the remainder is summarized.
pub const DEFAULT_REPORT_LIMIT: usize = 10;

/// A single violated constraint, addressed by its location in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Dotted path such as `survivors[2].courage`; empty for the root.
    pub path: String,
    /// Human-readable message naming the offending field.
    pub message: String,
}

impl Issue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// A non-empty list of issues produced by a failed parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", summarize(.0))]
pub struct Issues(Vec<Issue>);

fn summarize(issues: &[Issue]) -> String {
    match issues {
        [] => "no issues".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (and {} more)", rest.len()),
    }
}

impl Issues {
    /// Wraps a list of issues; returns `None` when the list is empty.
    pub fn from_vec(issues: Vec<Issue>) -> Option<Self> {
        if issues.is_empty() {
            None
        } else {
            Some(Self(issues))
        }
    }

    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self(vec![Issue::new(path, message)])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<Issue> {
        self.0
    }

    /// Whether any issue sits at `path` or below it.
    pub fn touches(&self, path: &str) -> bool {
        self.0.iter().any(|issue| {
            issue.path == path
                || issue
                    .path
                    .strip_prefix(path)
                    .is_some_and(|rest| rest.starts_with('.') || rest.starts_with('['))
        })
    }

    /// Renders at most `limit` issues as `path: message` lines, followed by
    /// an `...and N more` line when some were left out.
    pub fn report(&self, limit: usize) -> Vec<String> {
        let mut lines: Vec<String> = self.0.iter().take(limit).map(Issue::to_string).collect();
        if self.0.len() > limit {
            lines.push(format!("...and {} more", self.0.len() - limit));
        }
        lines
    }
}

impl IntoIterator for Issues {
    type Item = Issue;
    type IntoIter = std::vec::IntoIter<Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// One step of a document path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Tracks the current document path and the issues found so far.
#[derive(Debug, Default)]
pub struct SchemaContext {
    path: Vec<Segment>,
    issues: Vec<Issue>,
}

impl SchemaContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` with `segment` appended to the current path.
    pub fn at<R>(&mut self, segment: impl Into<Segment>, f: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push(segment.into());
        let result = f(self);
        self.path.pop();
        result
    }

    /// Records an issue at the current path.
    pub fn report(&mut self, message: impl Into<String>) {
        let path = self.current_path();
        self.issues.push(Issue::new(path, message));
    }

    /// Records an issue at a child key of the current path.
    pub fn report_at(&mut self, key: &str, message: impl Into<String>) {
        self.at(key, |cx| cx.report(message));
    }

    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    pub fn current_path(&self) -> String {
        let mut rendered = String::new();
        for segment in &self.path {
            match segment {
                Segment::Key(key) => {
                    if !rendered.is_empty() {
                        rendered.push('.');
                    }
                    rendered.push_str(key);
                }
                Segment::Index(index) => {
                    rendered.push('[');
                    rendered.push_str(&index.to_string());
                    rendered.push(']');
                }
            }
        }
        rendered
    }

    /// Returns `value` if nothing was reported, otherwise every issue.
    pub fn finish<T>(self, value: T) -> Result<T, Issues> {
        match Issues::from_vec(self.issues) {
            None => Ok(value),
            Some(issues) => Err(issues),
        }
    }
}

/// A campaign entity that can be parsed from an untyped JSON value.
///
/// `parse` always produces a value, substituting defaults where a field is
/// missing or invalid; whether the result is usable is decided by the
/// issues left in the context.
pub trait Schema: Sized {
    fn parse(value: &Value, cx: &mut SchemaContext) -> Self;

    /// Parses a standalone value, failing with every issue found.
    fn safe_parse(value: &Value) -> Result<Self, Issues> {
        let mut cx = SchemaContext::new();
        let parsed = Self::parse(value, &mut cx);
        cx.finish(parsed)
    }
}
