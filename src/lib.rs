//! Ligand and active-site annotation of protein structures
//!
//! Structures are fetched from RCSB or read from disk, parsed with pdbtbx,
//! annotated, and exposed to the command line and to Lua scripts.

pub mod analysis;
pub mod annotation;
pub mod config;
pub mod error;
pub mod lua_api;
pub mod protein;

pub use annotation::{
    annotate_structure, extract_ligands, predict_active_sites, ActiveSiteCandidate,
    LigandClassification, LigandGroups, LigandRecord, StructureAnnotation,
};
pub use config::MosaicConfig;
pub use error::{MosaicError, MosaicResult};
pub use protein::{ProteinData, ProteinStore, Residue, Structure};
