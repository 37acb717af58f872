//! Candidate catalytic residues
//!
//! A polymer residue is a candidate when its name is in
//! [`CATALYTIC_RESIDUES`]. There is no distance or contact check, so every
//! histidine, aspartate and so on is reported wherever it sits in the fold.

use serde::{Deserialize, Serialize};

use crate::protein::{Residue, Structure};

/// Residue names commonly found in enzyme active sites
pub const CATALYTIC_RESIDUES: [&str; 8] = ["HIS", "ASP", "GLU", "SER", "CYS", "LYS", "TYR", "ARG"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSiteCandidate {
    pub resname: String,
    pub chain: String,
    pub resnum: isize,
}

impl ActiveSiteCandidate {
    fn from_residue(residue: &Residue) -> Self {
        Self {
            resname: residue.name.clone(),
            chain: residue.chain_id.clone(),
            resnum: residue.serial_number,
        }
    }
}

pub fn is_catalytic_residue_name(residue_name: &str) -> bool {
    CATALYTIC_RESIDUES.contains(&residue_name)
}

/// Polymer residues named in the catalytic vocabulary, in structure order
pub fn predict_active_sites(structure: &Structure) -> Vec<ActiveSiteCandidate> {
    structure
        .residues()
        .filter(|residue| !residue.hetero && is_catalytic_residue_name(&residue.name))
        .map(ActiveSiteCandidate::from_residue)
        .collect()
}
