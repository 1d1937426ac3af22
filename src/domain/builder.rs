//! Folds a flat sequence of [`SourceRow`]s into a [`GovernanceModel`].
//!
//! In the source spreadsheet a principle is written once and implicitly
//! repeats over the requirement rows below it. The builder threads a single
//! "current principle" through the rows, closing it whenever the next
//! principle starts and once more at the end of the input.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::{
    GovernanceModel, PrincipleNode, RequirementNode, SourceRow,
    node_id::{Delimiter, IdAllocator, IdStrategy, Namespace},
};

/// How node identifiers are produced while building.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdOptions {
    /// Derived or sequential identifiers.
    pub strategy: IdStrategy,
    /// The delimiter ending the short name when deriving from leading words.
    pub delimiter: Delimiter,
}

/// Builds governance models from source rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelBuilder {
    options: IdOptions,
}

impl ModelBuilder {
    /// Creates a builder with the given identifier options.
    #[must_use]
    pub const fn new(options: IdOptions) -> Self {
        Self { options }
    }

    /// Builds the model.
    ///
    /// Rows are processed in order:
    /// - a non-empty principle cell closes the current principle (if any) and
    ///   opens a new one;
    /// - a non-empty requirement cell adds a requirement to the current
    ///   principle. With no current principle the requirement is dropped.
    ///
    /// A row with both cells populated opens the principle first, so the
    /// requirement attaches to it.
    #[instrument(level = "debug", skip_all)]
    pub fn build<I>(&self, rows: I) -> GovernanceModel
    where
        I: IntoIterator<Item = SourceRow>,
    {
        let fold = rows
            .into_iter()
            .enumerate()
            .fold(Fold::new(self.options), |fold, (index, row)| {
                fold.push(index + 1, &row)
            });

        let model = fold.finish();
        let stats = model.stats();
        tracing::info!(
            principles = stats.principles,
            requirements = stats.requirements,
            "built governance model"
        );
        model
    }
}

/// Builds a model with the default identifier options.
#[must_use]
pub fn build<I>(rows: I) -> GovernanceModel
where
    I: IntoIterator<Item = SourceRow>,
{
    ModelBuilder::default().build(rows)
}

/// The state threaded through the rows.
#[derive(Debug)]
struct Fold {
    current: Option<PrincipleNode>,
    finished: Vec<PrincipleNode>,
    principle_ids: IdAllocator,
    requirement_ids: IdAllocator,
}

impl Fold {
    fn new(options: IdOptions) -> Self {
        Self {
            current: None,
            finished: Vec::new(),
            principle_ids: IdAllocator::new(
                Namespace::Principle,
                options.strategy,
                options.delimiter,
            ),
            requirement_ids: IdAllocator::new(
                Namespace::Requirement,
                options.strategy,
                options.delimiter,
            ),
        }
    }

    fn push(mut self, row_number: usize, row: &SourceRow) -> Self {
        if let Some(text) = row.principle() {
            self.close_current();
            let id = self.principle_ids.allocate(text);
            tracing::trace!(row = row_number, %id, "opened principle");
            self.current = Some(PrincipleNode::new(id, text.to_string()));
        }

        if let Some(text) = row.requirement() {
            if let Some(principle) = self.current.as_mut() {
                let id = self.requirement_ids.allocate(text);
                principle.push(RequirementNode::new(
                    id,
                    text.to_string(),
                    row.guidelines().to_string(),
                ));
            } else {
                tracing::warn!(
                    row = row_number,
                    requirement = text,
                    "requirement has no preceding principle; skipping"
                );
            }
        }

        self
    }

    fn close_current(&mut self) {
        if let Some(principle) = self.current.take() {
            tracing::debug!(
                id = %principle.id(),
                requirements = principle.requirements().len(),
                "closed principle"
            );
            self.finished.push(principle);
        }
    }

    fn finish(mut self) -> GovernanceModel {
        self.close_current();
        GovernanceModel::new(self.finished)
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn row(
        principle: Option<&str>,
        requirement: Option<&str>,
        guidelines: Option<&str>,
    ) -> SourceRow {
        SourceRow::new(principle, requirement, guidelines)
    }

    fn ids(model: &GovernanceModel) -> Vec<(String, Vec<String>)> {
        model
            .principles()
            .iter()
            .map(|p| {
                (
                    p.id().to_string(),
                    p.requirements().iter().map(|r| r.id().to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn principle_with_continuation_rows() {
        let model = build(vec![
            row(
                Some("P1: Quality.Ensures correctness"),
                Some("R1: Must validate"),
                Some("Validate on ingest"),
            ),
            row(None, Some("R2: Must log"), Some("Log every change")),
        ]);

        assert_eq!(model.principles().len(), 1);
        let principle = &model.principles()[0];
        assert_eq!(principle.id().as_str(), "p_p1");
        assert_eq!(principle.name(), "P1: Quality.Ensures correctness");

        let requirements = principle.requirements();
        assert_eq!(requirements.len(), 2);
        assert_eq!(requirements[0].id().as_str(), "r_r1");
        assert_eq!(requirements[0].guidelines(), "Validate on ingest");
        assert_eq!(requirements[1].id().as_str(), "r_r2");
        assert_eq!(requirements[1].guidelines(), "Log every change");
    }

    #[test]
    fn empty_input_yields_empty_model() {
        assert!(build(Vec::new()).is_empty());
    }

    #[test]
    fn last_principle_is_kept() {
        let model = build(vec![
            row(Some("P1 One"), Some("R1 a"), None),
            row(Some("P2 Two"), None, None),
        ]);

        assert_eq!(
            ids(&model),
            vec![
                ("p_p1".to_string(), vec!["r_r1".to_string()]),
                ("p_p2".to_string(), vec![]),
            ]
        );
    }

    #[test]
    fn leading_requirements_are_dropped() {
        let model = build(vec![
            row(None, Some("R1 orphan"), Some("nobody owns this")),
            row(None, Some("R2 orphan"), None),
            row(Some("P1 One"), None, None),
            row(None, Some("R3 kept"), None),
        ]);

        assert_eq!(
            ids(&model),
            vec![("p_p1".to_string(), vec!["r_r3".to_string()])]
        );
    }

    #[test]
    fn blank_rows_are_tolerated() {
        let model = build(vec![
            row(Some("P1 One"), None, None),
            row(None, None, None),
            row(Some(" "), Some(""), Some("stray guidance")),
            row(None, Some("R1 a"), None),
        ]);

        assert_eq!(
            ids(&model),
            vec![("p_p1".to_string(), vec!["r_r1".to_string()])]
        );
    }

    #[test]
    fn requirements_attach_to_the_immediately_preceding_principle() {
        let model = build(vec![
            row(Some("P1 One"), Some("R1 a"), None),
            row(None, Some("R2 b"), None),
            row(Some("P2 Two"), None, None),
            row(None, Some("R3 c"), None),
            row(Some("P3 Three"), Some("R4 d"), None),
            row(None, Some("R5 e"), None),
        ]);

        assert_eq!(
            ids(&model),
            vec![
                ("p_p1".to_string(), vec!["r_r1".to_string(), "r_r2".to_string()]),
                ("p_p2".to_string(), vec!["r_r3".to_string()]),
                ("p_p3".to_string(), vec!["r_r4".to_string(), "r_r5".to_string()]),
            ]
        );
    }

    #[test_case(&[true, false, true, true, false], 3; "mixed")]
    #[test_case(&[false, false], 0; "no principles")]
    #[test_case(&[true, true, true], 3; "principle rows only")]
    fn one_node_per_principle_row(has_principle: &[bool], expected: usize) {
        let rows = has_principle.iter().enumerate().map(|(i, &p)| {
            SourceRow {
                principle: p.then(|| format!("Principle number {i}")),
                requirement: Some(format!("Requirement number {i}")),
                guidelines: None,
            }
        });

        assert_eq!(build(rows).principles().len(), expected);
    }

    #[test]
    fn order_is_source_order() {
        let model = build(vec![
            row(Some("Zeta principle"), Some("Zulu requirement"), None),
            row(None, Some("Alpha requirement"), None),
            row(Some("Alpha principle"), None, None),
        ]);

        assert_eq!(
            ids(&model),
            vec![
                (
                    "p_zeta_principle".to_string(),
                    vec!["r_zulu_requirement".to_string(), "r_alpha_requirement".to_string()]
                ),
                ("p_alpha_principle".to_string(), vec![]),
            ]
        );
    }

    #[test]
    fn duplicate_ids_are_made_unique_across_principles() {
        let model = build(vec![
            row(Some("Openness first"), Some("Publish data"), None),
            row(Some("Openness again"), Some("Publish data weekly"), None),
        ]);

        assert_eq!(
            ids(&model),
            vec![
                ("p_openness_first".to_string(), vec!["r_publish_data".to_string()]),
                ("p_openness_again".to_string(), vec!["r_publish_data_2".to_string()]),
            ]
        );
    }

    #[test]
    fn sequential_ids() {
        let builder = ModelBuilder::new(IdOptions {
            strategy: IdStrategy::Sequential,
            delimiter: Delimiter::Period,
        });
        let model = builder.build(vec![
            row(Some("P7 One"), Some("R7 a"), None),
            row(Some("P8 Two"), Some("R8 b"), None),
        ]);

        assert_eq!(
            ids(&model),
            vec![
                ("p_1".to_string(), vec!["r_1".to_string()]),
                ("p_2".to_string(), vec!["r_2".to_string()]),
            ]
        );
    }

    #[test]
    fn colon_delimiter_for_requirement_names() {
        let builder = ModelBuilder::new(IdOptions {
            strategy: IdStrategy::Derived,
            delimiter: Delimiter::Colon,
        });
        let model = builder.build(vec![row(
            Some("Accountability. Someone answers"),
            Some("Named owner: each dataset has one. Always"),
            None,
        )]);

        let principle = &model.principles()[0];
        assert_eq!(principle.id().as_str(), "p_accountability_someone");
        assert_eq!(principle.requirements()[0].id().as_str(), "r_named_owner");
    }

    #[test]
    fn guidelines_keep_line_breaks() {
        let model = build(vec![row(
            Some("P1 One"),
            Some("R1 a"),
            Some("First paragraph.\n\nSecond paragraph."),
        )]);

        assert_eq!(
            model.principles()[0].requirements()[0].guidelines(),
            "First paragraph.\n\nSecond paragraph."
        );
    }
}
