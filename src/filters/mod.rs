//! # Drug design filters
//!
//! Property-window filters over [`Descriptors`]. Each rule accepts a molecule
//! only when every one of its windows holds.
//!
//! | filter      | windows                                                             |
//! |-------------|---------------------------------------------------------------------|
//! | Lipinski    | MW ≤ 500, logP ≤ 5, HBD ≤ 5, HBA ≤ 10                               |
//! | Ghose       | 160 ≤ MW ≤ 480, −0.4 ≤ logP ≤ 5.6, 40 ≤ MR ≤ 130, 20 ≤ atoms ≤ 70   |
//! | Veber       | rotatable bonds ≤ 10, TPSA ≤ 140                                    |
//! | Rule of 3   | MW ≤ 300, logP ≤ 3, HBD ≤ 3, HBA ≤ 3, rotatable bonds ≤ 3           |
//! | REOS        | 200 ≤ MW ≤ 500, −5 ≤ logP ≤ 5, HBD ≤ 5, HBA ≤ 10, \|charge\| ≤ 2,   |
//! |             | rotatable bonds ≤ 8, 15 ≤ heavy atoms ≤ 50                          |
//! | drug-like   | MW < 400, rings ≥ 1, rotatable bonds < 5, HBD ≤ 5, HBA ≤ 10,        |
//! |             | logP < 5                                                            |

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::analysis::SkippedIdentifier;
use crate::chem::{parse_smiles, Descriptors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrugFilter {
    Lipinski,
    Ghose,
    Veber,
    RuleOfThree,
    Reos,
    DrugLike,
}

impl DrugFilter {
    pub const ALL: [DrugFilter; 6] = [
        DrugFilter::Lipinski,
        DrugFilter::Ghose,
        DrugFilter::Veber,
        DrugFilter::RuleOfThree,
        DrugFilter::Reos,
        DrugFilter::DrugLike,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DrugFilter::Lipinski => "Lipinski rule of 5",
            DrugFilter::Ghose => "Ghose",
            DrugFilter::Veber => "Veber",
            DrugFilter::RuleOfThree => "rule of 3",
            DrugFilter::Reos => "REOS",
            DrugFilter::DrugLike => "drug-like",
        }
    }

    pub fn accepts(&self, d: &Descriptors) -> bool {
        match self {
            DrugFilter::Lipinski => {
                d.molecular_weight <= 500.0
                    && d.log_p <= 5.0
                    && d.h_bond_donors <= 5
                    && d.h_bond_acceptors <= 10
            }
            DrugFilter::Ghose => {
                (160.0..=480.0).contains(&d.molecular_weight)
                    && (-0.4..=5.6).contains(&d.log_p)
                    && (40.0..=130.0).contains(&d.molar_refractivity)
                    && (20..=70).contains(&d.total_atoms)
            }
            DrugFilter::Veber => d.rotatable_bonds <= 10 && d.tpsa <= 140.0,
            DrugFilter::RuleOfThree => {
                d.molecular_weight <= 300.0
                    && d.log_p <= 3.0
                    && d.h_bond_donors <= 3
                    && d.h_bond_acceptors <= 3
                    && d.rotatable_bonds <= 3
            }
            DrugFilter::Reos => {
                (200.0..=500.0).contains(&d.molecular_weight)
                    && (-5.0..=5.0).contains(&d.log_p)
                    && d.h_bond_donors <= 5
                    && d.h_bond_acceptors <= 10
                    && (-2..=2).contains(&d.formal_charge)
                    && d.rotatable_bonds <= 8
                    && (15..=50).contains(&d.heavy_atoms)
            }
            DrugFilter::DrugLike => {
                d.molecular_weight < 400.0
                    && d.ring_count >= 1
                    && d.rotatable_bonds < 5
                    && d.h_bond_donors <= 5
                    && d.h_bond_acceptors <= 10
                    && d.log_p < 5.0
            }
        }
    }
}

/// Which filters to apply and how to combine them.
///
/// With `pass_all_filters` a molecule must satisfy every selected filter,
/// otherwise one accepting filter is enough. Selecting nothing applies all
/// filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub lipinski_rule_of_5: bool,
    pub ghose: bool,
    pub veber: bool,
    pub rule_of_3: bool,
    pub reos: bool,
    pub drug_like: bool,
    pub pass_all_filters: bool,
}

impl FilterCriteria {
    pub fn with(mut self, filter: DrugFilter) -> Self {
        match filter {
            DrugFilter::Lipinski => self.lipinski_rule_of_5 = true,
            DrugFilter::Ghose => self.ghose = true,
            DrugFilter::Veber => self.veber = true,
            DrugFilter::RuleOfThree => self.rule_of_3 = true,
            DrugFilter::Reos => self.reos = true,
            DrugFilter::DrugLike => self.drug_like = true,
        }
        self
    }

    pub fn pass_all(mut self, pass_all_filters: bool) -> Self {
        self.pass_all_filters = pass_all_filters;
        self
    }

    pub fn selected(&self) -> Vec<DrugFilter> {
        let flags = [
            self.lipinski_rule_of_5,
            self.ghose,
            self.veber,
            self.rule_of_3,
            self.reos,
            self.drug_like,
        ];
        let selected: Vec<DrugFilter> = DrugFilter::ALL
            .into_iter()
            .zip(flags)
            .filter_map(|(filter, on)| on.then_some(filter))
            .collect();
        if selected.is_empty() {
            DrugFilter::ALL.to_vec()
        } else {
            selected
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOutcome {
    /// Accepted SMILES in input order.
    pub passed: Vec<String>,
    pub skipped: Vec<SkippedIdentifier>,
}

#[derive(Debug, Clone, Default)]
pub struct DrugDesignFilters {
    criteria: FilterCriteria,
}

impl DrugDesignFilters {
    pub fn new(criteria: FilterCriteria) -> Self {
        DrugDesignFilters { criteria }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn evaluate(&self, descriptors: &Descriptors) -> bool {
        let selected = self.criteria.selected();
        if self.criteria.pass_all_filters {
            selected.iter().all(|f| f.accepts(descriptors))
        } else {
            selected.iter().any(|f| f.accepts(descriptors))
        }
    }

    pub fn filter<S: AsRef<str>>(&self, smiles_list: &[S]) -> FilterOutcome {
        let mut outcome = FilterOutcome::default();

        for (index, smiles) in smiles_list.iter().enumerate() {
            let smiles = smiles.as_ref();
            match parse_smiles(smiles) {
                Ok(molecule) => {
                    if self.evaluate(&Descriptors::compute(&molecule)) {
                        outcome.passed.push(smiles.to_string());
                    }
                }
                Err(error) => {
                    warn!("skipping identifier {} '{}': {}", index, smiles, error);
                    outcome.skipped.push(SkippedIdentifier {
                        index,
                        identifier: smiles.to_string(),
                        error,
                    });
                }
            }
        }

        debug!(
            "{} of {} molecules passed {:?}",
            outcome.passed.len(),
            smiles_list.len(),
            self.criteria.selected()
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASPIRIN: &str = "CC(=O)Oc1ccccc1C(=O)O";

    fn long_alkane() -> String {
        "C".repeat(40)
    }

    #[test]
    fn test_lipinski() {
        let filters = DrugDesignFilters::new(FilterCriteria::default().with(DrugFilter::Lipinski));
        let alkane = long_alkane();
        let outcome = filters.filter(&["CCO", alkane.as_str(), "C1CC", ASPIRIN]);

        assert_eq!(outcome.passed, vec!["CCO".to_string(), ASPIRIN.to_string()]);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].index, 2);
    }

    #[test]
    fn test_pass_all_versus_any() {
        let criteria = FilterCriteria::default()
            .with(DrugFilter::Lipinski)
            .with(DrugFilter::RuleOfThree);

        let any = DrugDesignFilters::new(criteria.clone()).filter(&["CCO", ASPIRIN]);
        assert_eq!(any.passed.len(), 2);

        // aspirin has four acceptors
        let all = DrugDesignFilters::new(criteria.pass_all(true)).filter(&["CCO", ASPIRIN]);
        assert_eq!(all.passed, vec!["CCO".to_string()]);
    }

    #[test]
    fn test_empty_selection_uses_every_filter() {
        assert_eq!(FilterCriteria::default().selected(), DrugFilter::ALL.to_vec());

        let any = DrugDesignFilters::default();
        let alkane = long_alkane();
        assert_eq!(any.filter(&["CCO", alkane.as_str()]).passed, vec!["CCO".to_string()]);

        // ethanol is far below the REOS weight window
        let all = DrugDesignFilters::new(FilterCriteria::default().pass_all(true));
        assert!(all.filter(&["CCO"]).passed.is_empty());
    }

    #[test]
    fn test_individual_windows() {
        let ethanol = Descriptors::compute(&parse_smiles("CCO").unwrap());
        assert!(DrugFilter::Lipinski.accepts(&ethanol));
        assert!(DrugFilter::Veber.accepts(&ethanol));
        assert!(DrugFilter::RuleOfThree.accepts(&ethanol));
        assert!(!DrugFilter::Ghose.accepts(&ethanol));
        assert!(!DrugFilter::Reos.accepts(&ethanol));

        let aspirin = Descriptors::compute(&parse_smiles(ASPIRIN).unwrap());
        assert!(DrugFilter::Veber.accepts(&aspirin));
        assert!(!DrugFilter::RuleOfThree.accepts(&aspirin));
    }

    #[test]
    fn test_drug_like() {
        let filters = DrugDesignFilters::new(FilterCriteria::default().with(DrugFilter::DrugLike));
        let alkane = long_alkane();
        let outcome = filters.filter(&["CCO", ASPIRIN, "c1ccccc1", alkane.as_str()]);
        // ethanol has no ring
        assert_eq!(outcome.passed, vec![ASPIRIN.to_string(), "c1ccccc1".to_string()]);

        let aspirin = Descriptors::compute(&parse_smiles(ASPIRIN).unwrap());
        assert!(DrugFilter::DrugLike.accepts(&aspirin));

        // five rotatable bonds on a ring
        let flexible = Descriptors::compute(&parse_smiles("c1ccccc1CCCCCC").unwrap());
        assert_eq!(flexible.rotatable_bonds, 5);
        assert!(!DrugFilter::DrugLike.accepts(&flexible));

        let heavy = Descriptors {
            molecular_weight: 400.0,
            ..aspirin.clone()
        };
        assert!(!DrugFilter::DrugLike.accepts(&heavy));
        let greasy = Descriptors {
            log_p: 5.0,
            ..aspirin
        };
        assert!(!DrugFilter::DrugLike.accepts(&greasy));
    }

    #[test]
    fn test_criteria_from_json() {
        let criteria: FilterCriteria =
            serde_json::from_str(r#"{"veber": true, "drug_like": true, "pass_all_filters": true}"#)
                .unwrap();
        assert_eq!(criteria.selected(), vec![DrugFilter::Veber, DrugFilter::DrugLike]);
        assert!(criteria.pass_all_filters);
    }
}
