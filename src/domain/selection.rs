//! The checkbox state of a browsing session.
//!
//! Mirrors the behaviour of the generated document: checking a principle
//! checks every requirement under it, and after any change each principle's
//! own checkbox is recomputed from its requirements. A principle is checked
//! exactly when all of its requirements are (and it has at least one).

use std::collections::BTreeSet;

use crate::domain::{
    GovernanceModel, NodeId, PrincipleNode, RequirementNode, node_id::Namespace,
};

/// The status of a principle derived from its checked requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrincipleStatus {
    /// No requirement is checked (or the principle has none).
    Unfulfilled,
    /// Some, but not all, requirements are checked.
    PartiallyFulfilled,
    /// Every requirement is checked.
    Fulfilled,
}

impl PrincipleStatus {
    fn of(checked: usize, total: usize) -> Self {
        if total > 0 && checked == total {
            Self::Fulfilled
        } else if checked > 0 {
            Self::PartiallyFulfilled
        } else {
            Self::Unfulfilled
        }
    }
}

/// The set of checked principles and requirements over one model.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    model: &'a GovernanceModel,
    principles: BTreeSet<NodeId>,
    requirements: BTreeSet<NodeId>,
}

/// Error returned when a selection refers to a node the model doesn't have.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("no principle or requirement with id '{0}'")]
pub struct SelectionError(pub NodeId);

impl<'a> Selection<'a> {
    /// An empty selection.
    #[must_use]
    pub const fn new(model: &'a GovernanceModel) -> Self {
        Self {
            model,
            principles: BTreeSet::new(),
            requirements: BTreeSet::new(),
        }
    }

    /// A selection with every requirement checked.
    #[must_use]
    pub fn all(model: &'a GovernanceModel) -> Self {
        let mut selection = Self::new(model);
        selection.requirements = model
            .requirements()
            .map(|(_, requirement)| requirement.id().clone())
            .collect();
        selection.refresh();
        selection
    }

    /// The model this selection applies to.
    #[must_use]
    pub const fn model(&self) -> &'a GovernanceModel {
        self.model
    }

    /// Checks or unchecks a principle, and with it all of its requirements.
    ///
    /// # Errors
    ///
    /// Returns an error if the model has no principle with this id.
    pub fn set_principle(&mut self, id: &NodeId, checked: bool) -> Result<(), SelectionError> {
        let principle = self
            .model
            .principle(id)
            .ok_or_else(|| SelectionError(id.clone()))?;

        for requirement in principle.requirements() {
            if checked {
                self.requirements.insert(requirement.id().clone());
            } else {
                self.requirements.remove(requirement.id());
            }
        }

        self.refresh();
        Ok(())
    }

    /// Checks or unchecks a single requirement.
    ///
    /// # Errors
    ///
    /// Returns an error if the model has no requirement with this id.
    pub fn set_requirement(&mut self, id: &NodeId, checked: bool) -> Result<(), SelectionError> {
        let (_, requirement) = self
            .model
            .requirement(id)
            .ok_or_else(|| SelectionError(id.clone()))?;

        if checked {
            self.requirements.insert(requirement.id().clone());
        } else {
            self.requirements.remove(requirement.id());
        }

        self.refresh();
        Ok(())
    }

    /// Checks the principle or requirement with this id.
    ///
    /// # Errors
    ///
    /// Returns an error if the model has no node with this id.
    pub fn select(&mut self, id: &NodeId) -> Result<(), SelectionError> {
        match id.namespace() {
            Some(Namespace::Principle) if self.model.principle(id).is_some() => {
                self.set_principle(id, true)
            }
            Some(Namespace::Requirement) if self.model.requirement(id).is_some() => {
                self.set_requirement(id, true)
            }
            _ => Err(SelectionError(id.clone())),
        }
    }

    /// Whether the principle's checkbox is checked.
    #[must_use]
    pub fn is_principle_selected(&self, principle: &PrincipleNode) -> bool {
        self.principles.contains(principle.id())
    }

    /// Whether the requirement's checkbox is checked.
    #[must_use]
    pub fn is_requirement_selected(&self, requirement: &RequirementNode) -> bool {
        self.requirements.contains(requirement.id())
    }

    /// The derived status of a principle.
    #[must_use]
    pub fn status(&self, principle: &PrincipleNode) -> PrincipleStatus {
        let total = principle.requirements().len();
        let checked = principle
            .requirements()
            .iter()
            .filter(|requirement| self.is_requirement_selected(requirement))
            .count();
        PrincipleStatus::of(checked, total)
    }

    /// Returns `true` if nothing is checked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.principles.is_empty() && self.requirements.is_empty()
    }

    /// The principles that appear in an export, each with its checked
    /// requirements, in model order.
    ///
    /// A principle is included when it is checked itself or has at least one
    /// checked requirement.
    pub fn included(
        &self,
    ) -> impl Iterator<Item = (&'a PrincipleNode, Vec<&'a RequirementNode>)> + '_ {
        self.model.principles().iter().filter_map(move |principle| {
            let requirements: Vec<_> = principle
                .requirements()
                .iter()
                .filter(|requirement| self.is_requirement_selected(requirement))
                .collect();

            (self.is_principle_selected(principle) || !requirements.is_empty())
                .then_some((principle, requirements))
        })
    }

    fn refresh(&mut self) {
        self.principles = self
            .model
            .principles()
            .iter()
            .filter(|principle| self.status(principle) == PrincipleStatus::Fulfilled)
            .map(|principle| principle.id().clone())
            .collect();
    }
}
