//! Choice sets presented when a story location triggers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use wanderlore_core::error::DomainError;

use super::location::StageId;

/// Which vital a choice spends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vital {
    /// Physical health.
    Health,
    /// Mental sanity.
    Sanity,
}

/// One option the player can pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Identifier unique within its stage.
    pub id: String,
    /// Button text.
    pub text: String,
    /// The vital this choice spends.
    pub affects: Vital,
    /// Points removed from the vital before modifiers; negative values restore.
    pub cost: i32,
    /// Narrative shown after the choice resolves.
    pub outcome: String,
}

/// Choices for one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageChoiceSet {
    /// The stage these choices belong to.
    pub stage: StageId,
    /// The options, in display order.
    pub choices: Vec<Choice>,
}

/// Configured choice sets keyed by stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageChoices {
    by_stage: BTreeMap<StageId, Vec<Choice>>,
}

impl StageChoices {
    /// Builds the table from per-stage sets.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a stage appears twice or a stage
    /// repeats a choice id.
    pub fn new(sets: Vec<StageChoiceSet>) -> Result<Self, DomainError> {
        let mut by_stage = BTreeMap::new();
        for set in sets {
            let mut seen = std::collections::HashSet::new();
            for choice in &set.choices {
                if !seen.insert(choice.id.as_str()) {
                    return Err(DomainError::Validation(format!(
                        "stage {} repeats choice id {}",
                        set.stage, choice.id
                    )));
                }
            }
            if by_stage.insert(set.stage, set.choices).is_some() {
                return Err(DomainError::Validation(format!(
                    "stage {} has more than one choice set",
                    set.stage
                )));
            }
        }
        Ok(Self { by_stage })
    }

    /// The choices for `stage`; empty when none are configured.
    #[must_use]
    pub fn for_stage(&self, stage: StageId) -> &[Choice] {
        self.by_stage.get(&stage).map(Vec::as_slice).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice(id: &str) -> Choice {
        Choice {
            id: id.to_owned(),
            text: "Study the map".to_owned(),
            affects: Vital::Sanity,
            cost: 10,
            outcome: "The lines shift.".to_owned(),
        }
    }

    #[test]
    fn test_for_stage_returns_configured_choices() {
        let table = StageChoices::new(vec![StageChoiceSet {
            stage: StageId::One,
            choices: vec![choice("study"), choice("burn")],
        }])
        .unwrap();

        assert_eq!(table.for_stage(StageId::One).len(), 2);
        assert!(table.for_stage(StageId::Two).is_empty());
    }

    #[test]
    fn test_rejects_duplicate_stage_and_choice_ids() {
        let duplicate_stage = StageChoices::new(vec![
            StageChoiceSet {
                stage: StageId::One,
                choices: vec![choice("a")],
            },
            StageChoiceSet {
                stage: StageId::One,
                choices: vec![choice("b")],
            },
        ]);
        assert!(duplicate_stage.is_err());

        let duplicate_choice = StageChoices::new(vec![StageChoiceSet {
            stage: StageId::Two,
            choices: vec![choice("a"), choice("a")],
        }]);
        assert!(duplicate_choice.is_err());
    }
}
