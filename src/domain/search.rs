//! Case-insensitive substring search, with the visibility rules of the
//! generated document.

use std::ops::Range;

use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::domain::{GovernanceModel, PrincipleNode, RequirementNode};

/// The result of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome<'a> {
    /// The query was empty: everything is visible and nothing highlighted.
    ShowAll,
    /// Nothing matched: the user is notified and everything stays visible.
    NoResults,
    /// The visible principles, in model order.
    Filtered(Vec<PrincipleHit<'a>>),
}

/// A principle that stays visible for a query.
///
/// A visible principle always has its body expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrincipleHit<'a> {
    /// The principle.
    pub principle: &'a PrincipleNode,
    /// Whether the principle's own name matched.
    pub matched: bool,
    /// The requirements that stay visible.
    pub requirements: Vec<RequirementHit<'a>>,
}

/// A requirement that stays visible for a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequirementHit<'a> {
    /// The requirement.
    pub requirement: &'a RequirementNode,
    /// Whether the requirement's name or guidelines matched. Matched
    /// requirements have their body expanded.
    pub matched: bool,
}

/// Searches the model.
///
/// A principle matches on its name; a requirement on its name or
/// guidelines. A matching requirement is shown with its parent principle;
/// a matching principle is shown with all of its requirements. Everything
/// else is hidden.
#[must_use]
pub fn search<'a>(model: &'a GovernanceModel, query: &str) -> SearchOutcome<'a> {
    if query.is_empty() {
        return SearchOutcome::ShowAll;
    }

    let needle = query.to_lowercase();
    let contains = |text: &str| text.to_lowercase().contains(&needle);

    let hits: Vec<_> = model
        .principles()
        .iter()
        .filter_map(|principle| {
            let matched = contains(principle.name());

            let requirements: Vec<_> = principle
                .requirements()
                .iter()
                .filter_map(|requirement| {
                    let requirement_matched =
                        contains(requirement.name()) || contains(requirement.guidelines());
                    (matched || requirement_matched).then_some(RequirementHit {
                        requirement,
                        matched: requirement_matched,
                    })
                })
                .collect();

            let any_requirement = requirements.iter().any(|hit| hit.matched);
            (matched || any_requirement).then_some(PrincipleHit {
                principle,
                matched,
                requirements,
            })
        })
        .collect();

    tracing::debug!(query, hits = hits.len(), "searched model");

    if hits.is_empty() {
        SearchOutcome::NoResults
    } else {
        SearchOutcome::Filtered(hits)
    }
}

/// Locates every case-insensitive occurrence of a query in a text.
///
/// The returned byte ranges index into `text`, for highlighting.
#[derive(Debug, Clone)]
pub struct Highlighter {
    pattern: Option<Regex>,
}

impl Highlighter {
    /// Creates a highlighter for the query. An empty query highlights
    /// nothing.
    #[must_use]
    pub fn new(query: &str) -> Self {
        let pattern = (!query.is_empty()).then(|| {
            RegexBuilder::new(&regex::escape(query))
                .case_insensitive(true)
                .build()
                .expect("escaped patterns are always valid")
        });
        Self { pattern }
    }

    /// The ranges of `text` matching the query.
    #[must_use]
    pub fn ranges(&self, text: &str) -> Vec<Range<usize>> {
        self.pattern.as_ref().map_or_else(Vec::new, |pattern| {
            pattern.find_iter(text).map(|m| m.range()).collect()
        })
    }
}
