//! Ligand classification and active-site residue extraction
//!
//! Both passes are pure, single traversals over an already parsed
//! [`Structure`]; they never fail and never touch I/O.

pub mod active_sites;
pub mod ligands;

pub use active_sites::{predict_active_sites, ActiveSiteCandidate, CATALYTIC_RESIDUES};
pub use ligands::{
    classify_ligand, extract_ligands, LigandClassification, LigandGroups, LigandRecord,
    POLYDENTATE_PROBE_ATOMS,
};

use crate::protein::Structure;

/// Both annotation passes over one structure
#[derive(Debug, Clone, PartialEq)]
pub struct StructureAnnotation {
    pub ligands: LigandGroups,
    pub active_sites: Vec<ActiveSiteCandidate>,
}

pub fn annotate_structure(structure: &Structure) -> StructureAnnotation {
    StructureAnnotation {
        ligands: extract_ligands(structure),
        active_sites: predict_active_sites(structure),
    }
}
