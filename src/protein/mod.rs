//! Protein data management and processing
//!
//! This module provides functionality for fetching, parsing, and managing
//! protein structures and the compound records associated with their ligands

pub mod compound;
pub mod fetch;
pub mod structure;

pub use compound::CompoundSummary;
pub use fetch::{FetchCache, FetchResult, FileFormat, RemoteClient};
pub use structure::{Atom, ProteinData, ProteinStore, Residue, Structure};
