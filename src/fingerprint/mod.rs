//! # Molecular fingerprints
//!
//! Fixed-length bit vectors describing the circular atom environments of a
//! molecule, and the [`FingerprintEncoder`] seam through which the analysis
//! pipeline obtains them.
//!
//! [`MorganEncoder`] delegates to `cyanea_chem::morgan_fingerprint`, an
//! ECFP-style scheme with a fixed hash, so fingerprints are identical across
//! runs and platforms.

use cyanea_chem::morgan_fingerprint;
use ndarray::Array2;

use crate::chem::{parse_smiles, Molecule};
use crate::error::{Error, SmilesError};

/// A fixed-length bit vector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    n_bits: usize,
    words: Vec<u64>,
}

impl Fingerprint {
    pub fn new(n_bits: usize) -> Self {
        Fingerprint {
            n_bits,
            words: vec![0; n_bits.div_ceil(64)],
        }
    }

    pub fn len(&self) -> usize {
        self.n_bits
    }

    pub fn is_empty(&self) -> bool {
        self.n_bits == 0
    }

    /// Bits past the end are ignored.
    pub fn set(&mut self, bit: usize) {
        if bit < self.n_bits {
            self.words[bit / 64] |= 1 << (bit % 64);
        }
    }

    pub fn get(&self, bit: usize) -> bool {
        bit < self.n_bits && self.words[bit / 64] & (1 << (bit % 64)) != 0
    }

    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Indices of the set bits in ascending order.
    pub fn on_bits(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.n_bits).filter(move |&bit| self.get(bit))
    }
}

impl From<&cyanea_chem::Fingerprint> for Fingerprint {
    fn from(source: &cyanea_chem::Fingerprint) -> Self {
        let mut fingerprint = Fingerprint::new(source.nbits());
        for bit in (0..source.nbits()).filter(|&bit| source.get_bit(bit)) {
            fingerprint.set(bit);
        }
        fingerprint
    }
}

/// Stacks fingerprints of equal length into a `samples × bits` matrix of
/// zeros and ones.
pub fn to_matrix(fingerprints: &[&Fingerprint]) -> Array2<f64> {
    let n_bits = fingerprints.first().map_or(0, |fp| fp.len());
    Array2::from_shape_fn((fingerprints.len(), n_bits), |(row, bit)| {
        if fingerprints[row].get(bit) {
            1.0
        } else {
            0.0
        }
    })
}

/// Turns molecule identifiers into fingerprints.
///
/// `encode_all` keeps the input order and length; an `Err` entry marks an
/// identifier that could not be parsed.
pub trait FingerprintEncoder {
    fn encode(&self, smiles: &str) -> Result<Fingerprint, SmilesError>;

    fn n_bits(&self) -> usize;

    fn encode_all<S: AsRef<str>>(&self, identifiers: &[S]) -> Vec<Result<Fingerprint, SmilesError>>
    where
        Self: Sized,
    {
        identifiers
            .iter()
            .map(|smiles| self.encode(smiles.as_ref()))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MorganEncoder {
    radius: usize,
    n_bits: usize,
}

impl MorganEncoder {
    pub fn new(radius: usize, n_bits: usize) -> crate::error::Result<Self> {
        if n_bits == 0 {
            return Err(Error::configuration(
                "n_bits",
                "fingerprints need at least one bit",
            ));
        }
        Ok(MorganEncoder { radius, n_bits })
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn fingerprint(&self, molecule: &Molecule) -> Fingerprint {
        Fingerprint::from(&morgan_fingerprint(molecule, self.radius, self.n_bits))
    }
}

impl Default for MorganEncoder {
    fn default() -> Self {
        MorganEncoder {
            radius: 1,
            n_bits: 512,
        }
    }
}

impl FingerprintEncoder for MorganEncoder {
    fn encode(&self, smiles: &str) -> Result<Fingerprint, SmilesError> {
        let molecule = parse_smiles(smiles)?;
        Ok(self.fingerprint(&molecule))
    }

    fn n_bits(&self) -> usize {
        self.n_bits
    }
}
