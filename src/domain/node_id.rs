use std::{collections::HashSet, fmt, ops::Deref, str::FromStr, sync::LazyLock};

use non_empty_string::NonEmptyString;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Matches a legacy short code such as `P1` or `R12` anywhere in a cell.
static SHORT_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[PR][0-9]+").expect("this must never fail"));

/// The identifier of a principle or requirement node.
///
/// Identifiers are non-empty and contain only lowercase ASCII letters, digits
/// and underscores (for example `p_p1`, `r_data_quality`). They are used as
/// lookup keys in the generated document, so they must be unique within
/// their namespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NodeId(NonEmptyString);

impl NodeId {
    /// Creates a new `NodeId` from a string.
    ///
    /// # Errors
    ///
    /// Returns `InvalidNodeIdError` if the string is empty or contains
    /// characters other than lowercase ASCII letters, digits and `_`.
    pub fn new(s: String) -> Result<Self, InvalidNodeIdError> {
        if !s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(InvalidNodeIdError(s));
        }

        NonEmptyString::new(s).map(Self).map_err(InvalidNodeIdError)
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The namespace this identifier belongs to, judged by its prefix.
    #[must_use]
    pub fn namespace(&self) -> Option<Namespace> {
        [Namespace::Principle, Namespace::Requirement]
            .into_iter()
            .find(|namespace| {
                self.as_str()
                    .strip_prefix(namespace.prefix())
                    .is_some_and(|rest| rest.starts_with('_'))
            })
    }
}

impl Deref for NodeId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NodeId {
    type Err = InvalidNodeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<&str> for NodeId {
    type Error = InvalidNodeIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl Serialize for NodeId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Error returned when a string is not a valid node identifier.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error(
    "Invalid node id '{0}': must be non-empty and contain only lowercase letters, digits and '_'"
)]
pub struct InvalidNodeIdError(String);

/// The two identifier namespaces of a governance model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    /// Principle identifiers, prefixed `p`.
    Principle,
    /// Requirement identifiers, prefixed `r`.
    Requirement,
}

impl Namespace {
    /// The identifier prefix of this namespace.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Principle => "p",
            Self::Requirement => "r",
        }
    }
}

/// The character that ends the "short name" part of a cell when an
/// identifier is derived from its leading words.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    /// `Name. Explanation`
    #[default]
    Period,
    /// `Name: Explanation`
    Colon,
}

impl Delimiter {
    /// The delimiter character.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Period => '.',
            Self::Colon => ':',
        }
    }
}

/// How node identifiers are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Derive identifiers from an embedded short code or the leading words
    /// of the cell text.
    #[default]
    Derived,
    /// Number nodes in source order (`p_1`, `p_2`, `r_1`, ...).
    Sequential,
}

/// Derives an identifier from the text of a cell.
///
/// - Empty text yields `{prefix}_unknown`.
/// - Text containing a short code (`P3`, `R12`) yields `{prefix}_{code}` with
///   the code lowercased, wherever the code appears.
/// - Otherwise the part before the first `delimiter` is stripped of anything
///   but ASCII letters, digits and whitespace, lowercased, and its first two
///   words are joined: `{prefix}_{word1}_{word2}`.
///
/// Text with no usable words yields the bare `{prefix}_`; [`IdAllocator`]
/// replaces that with an ordinal.
///
/// # Examples
///
/// ```
/// use govex::domain::node_id::{Delimiter, Namespace, derive_id};
///
/// assert_eq!(derive_id("P3 Openness", Namespace::Principle, Delimiter::Period), "p_p3");
/// assert_eq!(
///     derive_id("Data quality matters. Always", Namespace::Principle, Delimiter::Period),
///     "p_data_quality"
/// );
/// ```
#[must_use]
pub fn derive_id(text: &str, namespace: Namespace, delimiter: Delimiter) -> String {
    let prefix = namespace.prefix();
    let text = text.trim();

    if text.is_empty() {
        return format!("{prefix}_unknown");
    }

    if let Some(code) = SHORT_CODE.find(text) {
        return format!("{prefix}_{}", code.as_str().to_ascii_lowercase());
    }

    let head = text
        .split(delimiter.as_char())
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();

    let words = head.split_whitespace().take(2).collect::<Vec<_>>();
    format!("{prefix}_{}", words.join("_"))
}

/// Issues unique identifiers within one namespace.
///
/// Identifiers that would be empty get the node's ordinal instead, and
/// identifiers that were already issued get a `_2`, `_3`, ... suffix, so the
/// result depends only on the sequence of texts seen.
#[derive(Debug)]
pub struct IdAllocator {
    namespace: Namespace,
    strategy: IdStrategy,
    delimiter: Delimiter,
    issued: HashSet<String>,
    count: usize,
}

impl IdAllocator {
    /// Creates an allocator for the given namespace.
    #[must_use]
    pub fn new(namespace: Namespace, strategy: IdStrategy, delimiter: Delimiter) -> Self {
        Self {
            namespace,
            strategy,
            delimiter,
            issued: HashSet::new(),
            count: 0,
        }
    }

    /// Issues the identifier for the next node with the given text.
    pub fn allocate(&mut self, text: &str) -> NodeId {
        self.count += 1;
        let prefix = self.namespace.prefix();

        let base = match self.strategy {
            IdStrategy::Sequential => format!("{prefix}_{}", self.count),
            IdStrategy::Derived => {
                let derived = derive_id(text, self.namespace, self.delimiter);
                if derived.len() == prefix.len() + 1 {
                    format!("{prefix}_{}", self.count)
                } else {
                    derived
                }
            }
        };

        let mut candidate = base.clone();
        let mut n = 1;
        while !self.issued.insert(candidate.clone()) {
            n += 1;
            candidate = format!("{base}_{n}");
        }

        if n > 1 {
            tracing::warn!(id = %base, renamed = %candidate, "duplicate node id");
        }

        NodeId::new(candidate).expect("derived ids contain only [a-z0-9_]")
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("P3", "p_p3"; "bare code")]
    #[test_case("P3 Openness", "p_p3"; "leading code")]
    #[test_case("Openness (P3)", "p_p3"; "trailing code")]
    #[test_case("Principle P12: Accountability", "p_p12"; "multi digit code")]
    #[test_case("Only R4 here", "p_r4"; "requirement code in principle text")]
    #[test_case("Data quality matters. Always.", "p_data_quality"; "first two words")]
    #[test_case("Transparency. Everything is open", "p_transparency"; "single word")]
    #[test_case("Open-source, by default!", "p_opensource_by"; "punctuation stripped")]
    #[test_case("", "p_unknown"; "empty")]
    #[test_case("   ", "p_unknown"; "whitespace")]
    #[test_case("!!!", "p_"; "no words")]
    fn principle_ids(text: &str, expected: &str) {
        assert_eq!(
            derive_id(text, Namespace::Principle, Delimiter::Period),
            expected
        );
    }

    #[test]
    fn requirement_code_uses_requirement_prefix() {
        assert_eq!(
            derive_id("R2: Must log", Namespace::Requirement, Delimiter::Colon),
            "r_r2"
        );
    }

    #[test]
    fn lowercase_code_is_not_a_code() {
        assert_eq!(
            derive_id("p3 openness", Namespace::Principle, Delimiter::Period),
            "p_p3_openness"
        );
    }

    #[test]
    fn delimiter_selects_prefix_portion() {
        let text = "Versioning policy: every release. Tagged";
        assert_eq!(
            derive_id(text, Namespace::Requirement, Delimiter::Colon),
            "r_versioning_policy"
        );
        assert_eq!(
            derive_id(
                "Versioning: every release. Tagged",
                Namespace::Requirement,
                Delimiter::Period
            ),
            "r_versioning_every"
        );
    }

    #[test]
    fn derivation_is_deterministic() {
        let text = "Stewardship and ownership. Somebody owns it";
        let first = derive_id(text, Namespace::Principle, Delimiter::Period);
        let second = derive_id(text, Namespace::Principle, Delimiter::Period);
        assert_eq!(first, second);
    }

    #[test]
    fn allocator_disambiguates_duplicates() {
        let mut ids =
            IdAllocator::new(Namespace::Requirement, IdStrategy::Derived, Delimiter::Colon);

        assert_eq!(ids.allocate("Must validate input").as_str(), "r_must_validate");
        assert_eq!(ids.allocate("Must validate output").as_str(), "r_must_validate_2");
        assert_eq!(ids.allocate("Must validate twice").as_str(), "r_must_validate_3");
    }

    #[test]
    fn allocator_skips_literal_collisions() {
        let mut ids =
            IdAllocator::new(Namespace::Principle, IdStrategy::Derived, Delimiter::Period);

        assert_eq!(ids.allocate("!!!").as_str(), "p_1");
        assert_eq!(ids.allocate("1").as_str(), "p_1_2");
        assert_eq!(ids.allocate("1").as_str(), "p_1_3");
    }

    #[test]
    fn allocator_replaces_empty_ids_with_ordinal() {
        let mut ids =
            IdAllocator::new(Namespace::Principle, IdStrategy::Derived, Delimiter::Period);

        assert_eq!(ids.allocate("First thing").as_str(), "p_first_thing");
        assert_eq!(ids.allocate("¿¡!").as_str(), "p_2");
    }

    #[test]
    fn sequential_strategy_counts() {
        let mut ids =
            IdAllocator::new(Namespace::Requirement, IdStrategy::Sequential, Delimiter::Period);

        assert_eq!(ids.allocate("R9 anything").as_str(), "r_1");
        assert_eq!(ids.allocate("R9 anything").as_str(), "r_2");
    }

    #[test_case("p_p1"; "principle")]
    #[test_case("r_data_quality_2"; "requirement")]
    fn node_id_accepts_valid(s: &str) {
        assert_eq!(NodeId::from_str(s).unwrap().as_str(), s);
    }

    #[test_case(""; "empty")]
    #[test_case("P_P1"; "uppercase")]
    #[test_case("p-p1"; "dash")]
    #[test_case("p p1"; "space")]
    fn node_id_rejects_invalid(s: &str) {
        assert!(NodeId::from_str(s).is_err());
    }

    #[test]
    fn node_id_namespace() {
        assert_eq!(
            NodeId::try_from("p_p1").unwrap().namespace(),
            Some(Namespace::Principle)
        );
        assert_eq!(
            NodeId::try_from("r_2").unwrap().namespace(),
            Some(Namespace::Requirement)
        );
        assert_eq!(NodeId::try_from("pr_1").unwrap().namespace(), None);
    }
}
