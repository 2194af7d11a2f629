//! Savings distribution: how each contribution is split across named goals.

use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};

/// Percentage total a distribution must reach before it can be saved.
pub const FULL_ALLOCATION: u32 = 100;

/// One named savings goal and its share of every contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionEntry {
    pub goal_name: String,
    pub percentage: u8,
}

impl DistributionEntry {
    pub fn new(goal_name: impl Into<String>, percentage: u8) -> Self {
        Self {
            goal_name: goal_name.into(),
            percentage,
        }
    }
}

/// Seed split used on first run: 50 / 30 / 20.
pub fn default_distribution() -> Vec<DistributionEntry> {
    vec![
        DistributionEntry::new("Fondo de Emergencia", 50),
        DistributionEntry::new("Retiro", 30),
        DistributionEntry::new("Viajes/Gustos", 20),
    ]
}

/// An edited, not yet validated, set of distribution entries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SavingsDistribution {
    entries: Vec<DistributionEntry>,
}

impl SavingsDistribution {
    pub fn new(entries: Vec<DistributionEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[DistributionEntry] {
        &self.entries
    }

    pub fn total_percentage(&self) -> u32 {
        self.entries.iter().map(|entry| entry.percentage as u32).sum()
    }

    /// Changes the share of `goal_name`, returning `false` when no such goal exists.
    pub fn set_percentage(&mut self, goal_name: &str, percentage: u8) -> bool {
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.goal_name == goal_name)
        {
            Some(entry) => {
                entry.percentage = percentage;
                true
            }
            None => false,
        }
    }

    /// Checks names and percentages; only a validated distribution can be persisted.
    /// Goal names are stored trimmed.
    pub fn validate(mut self) -> Result<ValidatedDistribution, DistributionError> {
        let mut seen = HashSet::new();
        for entry in &mut self.entries {
            entry.goal_name = entry.goal_name.trim().to_string();
            let name = entry.goal_name.as_str();
            if name.is_empty() {
                return Err(DistributionError::EmptyGoalName);
            }
            if !seen.insert(name.to_string()) {
                return Err(DistributionError::DuplicateGoal(name.to_string()));
            }
            if entry.percentage as u32 > FULL_ALLOCATION {
                return Err(DistributionError::PercentageOutOfRange {
                    goal_name: name.to_string(),
                    percentage: entry.percentage,
                });
            }
        }
        let actual = self.total_percentage();
        if actual != FULL_ALLOCATION {
            return Err(DistributionError::TotalNot100 { actual });
        }
        Ok(ValidatedDistribution {
            entries: self.entries,
        })
    }
}

impl From<Vec<DistributionEntry>> for SavingsDistribution {
    fn from(entries: Vec<DistributionEntry>) -> Self {
        Self::new(entries)
    }
}

/// A distribution whose percentages are known to total exactly 100.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedDistribution {
    entries: Vec<DistributionEntry>,
}

impl ValidatedDistribution {
    pub fn entries(&self) -> &[DistributionEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<DistributionEntry> {
        self.entries
    }
}

impl Default for ValidatedDistribution {
    fn default() -> Self {
        Self {
            entries: default_distribution(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistributionError {
    EmptyGoalName,
    DuplicateGoal(String),
    PercentageOutOfRange { goal_name: String, percentage: u8 },
    TotalNot100 { actual: u32 },
}

impl fmt::Display for DistributionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistributionError::EmptyGoalName => f.write_str("savings goal name cannot be empty"),
            DistributionError::DuplicateGoal(name) => {
                write!(f, "savings goal `{name}` appears more than once")
            }
            DistributionError::PercentageOutOfRange {
                goal_name,
                percentage,
            } => write!(
                f,
                "savings goal `{goal_name}` has {percentage}%, shares must be between 0 and 100"
            ),
            DistributionError::TotalNot100 { actual } => write!(
                f,
                "percentages must total {FULL_ALLOCATION}%, currently {actual}%"
            ),
        }
    }
}

impl std::error::Error for DistributionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_distribution_is_valid() {
        let validated = SavingsDistribution::new(default_distribution())
            .validate()
            .expect("default split totals 100");
        assert_eq!(validated.entries().len(), 3);
        assert_eq!(validated, ValidatedDistribution::default());
    }

    #[test]
    fn reports_actual_total_when_off_by_one() {
        let under = SavingsDistribution::new(vec![
            DistributionEntry::new("Emergency", 50),
            DistributionEntry::new("Retirement", 49),
        ]);
        assert_eq!(
            under.validate().unwrap_err(),
            DistributionError::TotalNot100 { actual: 99 }
        );

        let over = SavingsDistribution::new(vec![
            DistributionEntry::new("Emergency", 51),
            DistributionEntry::new("Retirement", 50),
        ]);
        let err = over.validate().unwrap_err();
        assert!(err.to_string().contains("101%"));
    }

    #[test]
    fn validated_names_are_trimmed() {
        let validated = SavingsDistribution::new(vec![
            DistributionEntry::new(" Retiro", 60),
            DistributionEntry::new("Casa  ", 40),
        ])
        .validate()
        .unwrap();
        let names: Vec<&str> = validated
            .entries()
            .iter()
            .map(|entry| entry.goal_name.as_str())
            .collect();
        assert_eq!(names, vec!["Retiro", "Casa"]);

        let clash = SavingsDistribution::new(vec![
            DistributionEntry::new("Retiro", 50),
            DistributionEntry::new(" Retiro ", 50),
        ]);
        assert_eq!(
            clash.validate().unwrap_err(),
            DistributionError::DuplicateGoal("Retiro".into())
        );
    }

    #[test]
    fn rejects_duplicate_and_blank_names() {
        let duplicate = SavingsDistribution::new(vec![
            DistributionEntry::new("Travel", 50),
            DistributionEntry::new("Travel", 50),
        ]);
        assert_eq!(
            duplicate.validate().unwrap_err(),
            DistributionError::DuplicateGoal("Travel".into())
        );
        let blank = SavingsDistribution::new(vec![DistributionEntry::new(" ", 100)]);
        assert_eq!(blank.validate().unwrap_err(), DistributionError::EmptyGoalName);
    }

    #[test]
    fn rejects_single_share_above_100() {
        let dist = SavingsDistribution::new(vec![DistributionEntry::new("All", 200)]);
        assert!(matches!(
            dist.validate(),
            Err(DistributionError::PercentageOutOfRange { percentage: 200, .. })
        ));
    }

    #[test]
    fn set_percentage_updates_known_goals_only() {
        let mut dist = SavingsDistribution::new(default_distribution());
        assert!(dist.set_percentage("Retiro", 40));
        assert!(!dist.set_percentage("Casa", 10));
        assert_eq!(dist.total_percentage(), 110);
    }
}
