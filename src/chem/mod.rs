//! # Molecules
//!
//! SMILES parsing and the molecular graph come from `cyanea_chem`. Input is
//! screened for bracket atoms whose isotope or charge does not fit the
//! parser's integer fields before it is handed over, and parser failures are
//! reported as [`SmilesError`].

use petgraph::graph::{NodeIndex, UnGraph};

use crate::error::SmilesError;

pub mod descriptors;

pub use cyanea_chem::Molecule;
pub use descriptors::Descriptors;

/// Longest isotope prefix accepted inside a bracket atom.
const MAX_ISOTOPE_DIGITS: usize = 3;

pub fn parse_smiles(smiles: &str) -> Result<Molecule, SmilesError> {
    if smiles.trim().is_empty() {
        return Err(SmilesError::Empty);
    }
    check_bracket_atoms(smiles)?;
    Ok(cyanea_chem::parse_smiles(smiles)?)
}

/// Number of disconnected fragments, counted with `petgraph`.
pub fn fragment_count(molecule: &Molecule) -> usize {
    let mut graph = UnGraph::<(), ()>::with_capacity(molecule.atom_count(), molecule.bond_count());
    for _ in 0..molecule.atom_count() {
        graph.add_node(());
    }
    for bond in &molecule.bonds {
        graph.add_edge(NodeIndex::new(bond.atom1), NodeIndex::new(bond.atom2), ());
    }
    petgraph::algo::connected_components(&graph)
}

fn check_bracket_atoms(smiles: &str) -> Result<(), SmilesError> {
    let bytes = smiles.as_bytes();
    let mut cursor = 0;

    while let Some(offset) = bytes[cursor..].iter().position(|&b| b == b'[') {
        let position = cursor + offset;
        let Some(length) = bytes[position..].iter().position(|&b| b == b']') else {
            return Err(SmilesError::UnclosedBracket { position });
        };
        let body = &bytes[position + 1..position + length];

        if body.iter().take_while(|b| b.is_ascii_digit()).count() > MAX_ISOTOPE_DIGITS {
            return Err(SmilesError::InvalidBracketAtom {
                position,
                detail: "isotope out of range".to_string(),
            });
        }

        // `+++` style charges: the run length is the magnitude
        let mut run = 0usize;
        let mut sign = None;
        for &b in body {
            if b == b'+' || b == b'-' {
                run = if sign == Some(b) { run + 1 } else { 1 };
                sign = Some(b);
                if run > i8::MAX as usize {
                    return Err(SmilesError::InvalidBracketAtom {
                        position,
                        detail: "charge out of range".to_string(),
                    });
                }
            } else {
                run = 0;
                sign = None;
            }
        }

        cursor = position + length + 1;
    }
    Ok(())
}
