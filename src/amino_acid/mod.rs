//! Conversion between one-letter peptide sequences and linear peptide SMILES.
//!
//! Every residue contributes a fixed backbone fragment `N[C@@H](R)C(=O)`
//! (glycine and proline have their own), and the chain ends with the
//! terminal hydroxyl `O` of the C-terminus. Reading SMILES back only
//! understands strings written in this form.

use log::debug;

use crate::error::{Error, Result};

const TERMINAL: &str = "O";

/// `(one-letter code, three-letter code, backbone fragment)`
const RESIDUES: [(char, &str, &str); 20] = [
    ('A', "Ala", "N[C@@H](C)C(=O)"),
    ('R', "Arg", "N[C@@H](CCCNC(=N)N)C(=O)"),
    ('N', "Asn", "N[C@@H](CC(=O)N)C(=O)"),
    ('D', "Asp", "N[C@@H](CC(=O)O)C(=O)"),
    ('C', "Cys", "N[C@@H](CS)C(=O)"),
    ('E', "Glu", "N[C@@H](CCC(=O)O)C(=O)"),
    ('Q', "Gln", "N[C@@H](CCC(=O)N)C(=O)"),
    ('G', "Gly", "NCC(=O)"),
    ('H', "His", "N[C@@H](CC1=CNC=N1)C(=O)"),
    ('I', "Ile", "N[C@@H](C(C)CC)C(=O)"),
    ('L', "Leu", "N[C@@H](CC(C)C)C(=O)"),
    ('K', "Lys", "N[C@@H](CCCCN)C(=O)"),
    ('M', "Met", "N[C@@H](CCSC)C(=O)"),
    ('F', "Phe", "N[C@@H](Cc1ccccc1)C(=O)"),
    ('P', "Pro", "N1[C@@H](CCC1)C(=O)"),
    ('S', "Ser", "N[C@@H](CO)C(=O)"),
    ('T', "Thr", "N[C@@H](C(C)O)C(=O)"),
    ('W', "Trp", "N[C@@H](Cc1c[nH]c2ccccc12)C(=O)"),
    ('Y', "Tyr", "N[C@@H](Cc1ccc(O)cc1)C(=O)"),
    ('V', "Val", "N[C@@H](C(C)C)C(=O)"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct AminoAcidConverter;

impl AminoAcidConverter {
    pub fn new() -> Self {
        AminoAcidConverter
    }

    pub fn residue_fragment(code: char) -> Option<&'static str> {
        let code = code.to_ascii_uppercase();
        RESIDUES
            .iter()
            .find(|(c, _, _)| *c == code)
            .map(|(_, _, fragment)| *fragment)
    }

    pub fn three_letter_code(code: char) -> Option<&'static str> {
        let code = code.to_ascii_uppercase();
        RESIDUES
            .iter()
            .find(|(c, _, _)| *c == code)
            .map(|(_, name, _)| *name)
    }

    pub fn sequence_to_smiles(&self, sequence: &str) -> Result<String> {
        let sequence = sequence.trim();
        if sequence.is_empty() {
            return Err(Error::configuration("sequence", "empty amino acid sequence"));
        }

        let mut smiles = String::new();
        for code in sequence.chars() {
            let fragment = Self::residue_fragment(code)
                .ok_or_else(|| Error::UnknownResidue(code.to_string()))?;
            smiles.push_str(fragment);
        }
        smiles.push_str(TERMINAL);

        debug!("{} residues -> {}", sequence.len(), smiles);
        Ok(smiles)
    }

    /// Splits a peptide SMILES into residues, always taking the longest
    /// fragment that matches at the current position.
    pub fn smiles_to_sequence(&self, smiles: &str) -> Result<String> {
        let smiles = smiles.trim();
        let mut rest = smiles;
        let mut sequence = String::new();

        while !rest.is_empty() && rest != TERMINAL {
            let (code, fragment) = RESIDUES
                .iter()
                .filter(|(_, _, fragment)| rest.starts_with(fragment))
                .max_by_key(|(_, _, fragment)| fragment.len())
                .map(|(code, _, fragment)| (*code, *fragment))
                .ok_or_else(|| Error::UnknownResidue(rest.to_string()))?;
            sequence.push(code);
            rest = &rest[fragment.len()..];
        }

        if sequence.is_empty() {
            return Err(Error::UnknownResidue(smiles.to_string()));
        }
        Ok(sequence)
    }

    /// One result per input sequence.
    pub fn sequences_to_smiles<S: AsRef<str>>(&self, sequences: &[S]) -> Vec<Result<String>> {
        sequences
            .iter()
            .map(|s| self.sequence_to_smiles(s.as_ref()))
            .collect()
    }

    /// One result per input SMILES.
    pub fn smiles_to_sequences<S: AsRef<str>>(&self, smiles_list: &[S]) -> Vec<Result<String>> {
        smiles_list
            .iter()
            .map(|s| self.smiles_to_sequence(s.as_ref()))
            .collect()
    }
}
