//! Analysis tools for protein structures

pub mod dihedrals;
pub mod export;
pub mod hydrogen_bonds;
pub mod ramachandran;
