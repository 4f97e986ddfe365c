//! Whole-molecule descriptors used by the drug design filters.
//!
//! Weight, hydrogen bond counts, rotatable bonds and rings come from
//! `cyanea_chem::compute_properties`. Polar surface area is the Ertl sum and
//! logP / molar refractivity are Wildman–Crippen atom contributions.

use cyanea_chem::{compute_properties, tpsa, wildman_crippen_logp};
use serde::Serialize;

use super::{fragment_count, Molecule};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Descriptors {
    pub formula: String,
    pub molecular_weight: f64,
    pub heavy_atoms: usize,
    /// Heavy atoms plus hydrogens.
    pub total_atoms: usize,
    pub h_bond_donors: usize,
    pub h_bond_acceptors: usize,
    pub rotatable_bonds: usize,
    pub ring_count: usize,
    pub aromatic_rings: usize,
    /// Disconnected parts, e.g. 2 for a salt written as `A.B`.
    pub fragments: usize,
    pub formal_charge: i32,
    pub tpsa: f64,
    pub log_p: f64,
    pub molar_refractivity: f64,
}

impl Descriptors {
    pub fn compute(molecule: &Molecule) -> Self {
        let properties = compute_properties(molecule);
        let (log_p, molar_refractivity) = wildman_crippen_logp(molecule);

        let total_atoms = molecule
            .atoms
            .iter()
            .map(|atom| 1 + usize::from(atom.implicit_hydrogens))
            .sum();
        let formal_charge = molecule
            .atoms
            .iter()
            .map(|atom| i32::from(atom.formal_charge))
            .sum();

        Descriptors {
            formula: properties.formula,
            molecular_weight: properties.molecular_weight,
            heavy_atoms: properties.heavy_atom_count,
            total_atoms,
            h_bond_donors: properties.hydrogen_bond_donors,
            h_bond_acceptors: properties.hydrogen_bond_acceptors,
            rotatable_bonds: properties.rotatable_bonds,
            ring_count: properties.ring_count,
            aromatic_rings: properties.aromatic_ring_count,
            fragments: fragment_count(molecule),
            formal_charge,
            tpsa: tpsa(molecule),
            log_p,
            molar_refractivity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chem::parse_smiles;
    use approx::assert_abs_diff_eq;

    fn descriptors(smiles: &str) -> Descriptors {
        Descriptors::compute(&parse_smiles(smiles).unwrap())
    }

    #[test]
    fn test_aspirin() {
        let aspirin = descriptors("CC(=O)Oc1ccccc1C(=O)O");
        assert_eq!(aspirin.formula, "C9H8O4");
        assert_abs_diff_eq!(aspirin.molecular_weight, 180.16, epsilon = 0.1);
        assert_eq!(aspirin.heavy_atoms, 13);
        assert_eq!(aspirin.total_atoms, 21);
        assert_eq!(aspirin.h_bond_donors, 1);
        assert_eq!(aspirin.h_bond_acceptors, 4);
        assert_eq!(aspirin.rotatable_bonds, 3);
        assert_eq!(aspirin.ring_count, 1);
        assert_eq!(aspirin.aromatic_rings, 1);
        assert_eq!(aspirin.fragments, 1);
        assert!(aspirin.tpsa > 30.0 && aspirin.tpsa < 100.0);
        assert!(aspirin.log_p > -2.0 && aspirin.log_p < 5.0);
    }

    #[test]
    fn test_rotatable_bonds() {
        assert_eq!(descriptors("CCCC").rotatable_bonds, 1);
        assert_eq!(descriptors("CC").rotatable_bonds, 0);
        assert_eq!(descriptors("C1CCCCC1").rotatable_bonds, 0);
    }

    #[test]
    fn test_ethanol_counts() {
        let ethanol = descriptors("CCO");
        assert_eq!(ethanol.h_bond_donors, 1);
        assert_eq!(ethanol.h_bond_acceptors, 1);
        assert_eq!(ethanol.ring_count, 0);
        assert_eq!(ethanol.total_atoms, 9);
        assert_abs_diff_eq!(ethanol.molecular_weight, 46.07, epsilon = 0.1);
    }

    #[test]
    fn test_formal_charge() {
        assert_eq!(descriptors("CC(=O)[O-]").formal_charge, -1);
        let salt = descriptors("[Na+].[Cl-]");
        assert_eq!(salt.formal_charge, 0);
        assert_eq!(salt.fragments, 2);
        assert_eq!(descriptors("[NH4+]").formal_charge, 1);
    }
}
