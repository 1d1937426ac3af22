use borsh::BorshSerialize;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::domain::NodeId;

/// One record of the tabular source.
///
/// Each field is optional; a row may open a new principle, add a requirement
/// to the current principle, do both, or neither.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRow {
    /// The `Principle` cell.
    pub principle: Option<String>,
    /// The `Requirement` cell.
    pub requirement: Option<String>,
    /// The `Guidelines` cell.
    pub guidelines: Option<String>,
}

impl SourceRow {
    /// Creates a row from borrowed cell values.
    #[must_use]
    pub fn new(
        principle: Option<&str>,
        requirement: Option<&str>,
        guidelines: Option<&str>,
    ) -> Self {
        Self {
            principle: principle.map(ToString::to_string),
            requirement: requirement.map(ToString::to_string),
            guidelines: guidelines.map(ToString::to_string),
        }
    }

    /// The principle text, if the cell holds anything but whitespace.
    #[must_use]
    pub fn principle(&self) -> Option<&str> {
        non_blank(self.principle.as_deref())
    }

    /// The requirement text, if the cell holds anything but whitespace.
    #[must_use]
    pub fn requirement(&self) -> Option<&str> {
        non_blank(self.requirement.as_deref())
    }

    /// The guidelines text, or an empty string.
    #[must_use]
    pub fn guidelines(&self) -> &str {
        non_blank(self.guidelines.as_deref()).unwrap_or_default()
    }
}

fn non_blank(cell: Option<&str>) -> Option<&str> {
    cell.map(str::trim).filter(|s| !s.is_empty())
}

/// A top-level governance statement and the requirements it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrincipleNode {
    id: NodeId,
    name: String,
    requirements: Vec<RequirementNode>,
}

impl PrincipleNode {
    pub(crate) const fn new(id: NodeId, name: String) -> Self {
        Self {
            id,
            name,
            requirements: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, requirement: RequirementNode) {
        self.requirements.push(requirement);
    }

    /// The principle's identifier.
    #[must_use]
    pub const fn id(&self) -> &NodeId {
        &self.id
    }

    /// The display name, as written in the source.
    ///
    /// By convention this may read `Name. Explanation`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The requirements of this principle, in source order.
    #[must_use]
    pub fn requirements(&self) -> &[RequirementNode] {
        &self.requirements
    }
}

/// A concrete obligation under a principle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequirementNode {
    id: NodeId,
    name: String,
    guidelines: String,
}

impl RequirementNode {
    pub(crate) const fn new(id: NodeId, name: String, guidelines: String) -> Self {
        Self {
            id,
            name,
            guidelines,
        }
    }

    /// The requirement's identifier.
    #[must_use]
    pub const fn id(&self) -> &NodeId {
        &self.id
    }

    /// The display name, as written in the source.
    ///
    /// By convention this may read `Name: Explanation`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-text guidance. Line breaks are preserved.
    #[must_use]
    pub fn guidelines(&self) -> &str {
        &self.guidelines
    }
}

/// The full governance framework: principles in source order.
///
/// The model is immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GovernanceModel {
    principles: Vec<PrincipleNode>,
}

/// Node counts of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Number of principles.
    pub principles: usize,
    /// Number of requirements across all principles.
    pub requirements: usize,
}

impl GovernanceModel {
    pub(crate) const fn new(principles: Vec<PrincipleNode>) -> Self {
        Self { principles }
    }

    /// The principles, in source order.
    #[must_use]
    pub fn principles(&self) -> &[PrincipleNode] {
        &self.principles
    }

    /// Iterates over every requirement together with its principle.
    pub fn requirements(&self) -> impl Iterator<Item = (&PrincipleNode, &RequirementNode)> {
        self.principles.iter().flat_map(|principle| {
            principle
                .requirements
                .iter()
                .map(move |requirement| (principle, requirement))
        })
    }

    /// Finds a principle by identifier.
    #[must_use]
    pub fn principle(&self, id: &NodeId) -> Option<&PrincipleNode> {
        self.principles.iter().find(|principle| &principle.id == id)
    }

    /// Finds a requirement, and the principle that owns it, by identifier.
    #[must_use]
    pub fn requirement(&self, id: &NodeId) -> Option<(&PrincipleNode, &RequirementNode)> {
        self.requirements()
            .find(|(_, requirement)| &requirement.id == id)
    }

    /// Returns `true` if the model has no principles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.principles.is_empty()
    }

    /// Counts the nodes of the model.
    #[must_use]
    pub fn stats(&self) -> Stats {
        Stats {
            principles: self.principles.len(),
            requirements: self.principles.iter().map(|p| p.requirements.len()).sum(),
        }
    }

    /// Calculate the fingerprint of this model.
    ///
    /// The fingerprint is a SHA256 hash of the Borsh-serialized identifiers,
    /// names and guidelines, in order. Two documents generated from the same
    /// source content share a fingerprint.
    ///
    /// # Panics
    ///
    /// Panics if borsh serialization fails (which should never happen for this
    /// data structure).
    #[must_use]
    pub fn fingerprint(&self) -> String {
        #[derive(BorshSerialize)]
        struct RequirementData<'a> {
            id: &'a str,
            name: &'a str,
            guidelines: &'a str,
        }

        #[derive(BorshSerialize)]
        struct PrincipleData<'a> {
            id: &'a str,
            name: &'a str,
            requirements: Vec<RequirementData<'a>>,
        }

        let data: Vec<PrincipleData<'_>> = self
            .principles
            .iter()
            .map(|principle| PrincipleData {
                id: principle.id.as_str(),
                name: &principle.name,
                requirements: principle
                    .requirements
                    .iter()
                    .map(|requirement| RequirementData {
                        id: requirement.id.as_str(),
                        name: &requirement.name,
                        guidelines: &requirement.guidelines,
                    })
                    .collect(),
            })
            .collect();

        // encode using [borsh](https://borsh.io/)
        let encoded = borsh::to_vec(&data).expect("this should never fail");

        let hash = Sha256::digest(encoded);

        format!("{hash:x}")
    }
}

impl<'a> IntoIterator for &'a GovernanceModel {
    type Item = &'a PrincipleNode;
    type IntoIter = std::slice::Iter<'a, PrincipleNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.principles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::build;

    fn sample() -> GovernanceModel {
        build(vec![
            SourceRow::new(Some("P1 Quality"), Some("R1: Validate"), Some("On ingest")),
            SourceRow::new(None, Some("R2: Log"), None),
            SourceRow::new(Some("P2 Openness"), Some("R3: Publish"), Some("Weekly")),
        ])
    }

    #[test]
    fn blank_cells_are_absent() {
        let row = SourceRow::new(Some("  "), Some("\t\n"), None);
        assert_eq!(row.principle(), None);
        assert_eq!(row.requirement(), None);
        assert_eq!(row.guidelines(), "");
    }

    #[test]
    fn cells_are_trimmed() {
        let row = SourceRow::new(Some(" P1 Quality "), None, Some("\nline one\nline two\n"));
        assert_eq!(row.principle(), Some("P1 Quality"));
        assert_eq!(row.guidelines(), "line one\nline two");
    }

    #[test]
    fn lookup_by_id() {
        let model = sample();

        let principle = model.principle(&"p_p2".parse().unwrap()).unwrap();
        assert_eq!(principle.name(), "P2 Openness");

        let (owner, requirement) = model.requirement(&"r_r2".parse().unwrap()).unwrap();
        assert_eq!(owner.id().as_str(), "p_p1");
        assert_eq!(requirement.guidelines(), "");

        assert!(model.requirement(&"r_r9".parse().unwrap()).is_none());
    }

    #[test]
    fn stats_count_nodes() {
        let stats = sample().stats();
        assert_eq!(stats.principles, 2);
        assert_eq!(stats.requirements, 3);
    }

    #[test]
    fn serializes_nested_structure() {
        let json = serde_json::to_value(sample()).unwrap();

        assert_eq!(json[0]["id"], "p_p1");
        assert_eq!(json[0]["name"], "P1 Quality");
        assert_eq!(json[0]["requirements"][1]["id"], "r_r2");
        assert_eq!(json[1]["requirements"][0]["guidelines"], "Weekly");
    }

    #[test]
    fn fingerprint_is_stable() {
        assert_eq!(sample().fingerprint(), sample().fingerprint());
        assert_eq!(sample().fingerprint().len(), 64);
    }

    #[test]
    fn fingerprint_tracks_content() {
        let changed = build(vec![
            SourceRow::new(Some("P1 Quality"), Some("R1: Validate"), Some("On export")),
            SourceRow::new(None, Some("R2: Log"), None),
            SourceRow::new(Some("P2 Openness"), Some("R3: Publish"), Some("Weekly")),
        ]);

        assert_ne!(sample().fingerprint(), changed.fingerprint());
    }
}
