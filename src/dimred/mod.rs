//! # Dimensionality Reduction
//!
//! Projects fingerprint matrices into a low-dimensional space before
//! clustering and plotting.
//!
//! ## Currently Available
//! - **PCA** ([`pca`]): Principal Component Analysis with either an exact
//!   component count or a variance-retention threshold

pub mod pca;

pub use pca::{ComponentSelection, PCABuilder, Pca};
