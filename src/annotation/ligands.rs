//! Ligand classification of hetero residues
//!
//! Classification is a naming heuristic: one- and two-letter residue codes are
//! elemental ions, and the presence of any atom named in
//! [`POLYDENTATE_PROBE_ATOMS`] stands in for multi-point metal coordination.
//! No bond graph or geometry is consulted.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::protein::{Residue, Structure};

/// Atom names whose presence marks a ligand as polydentate
pub const POLYDENTATE_PROBE_ATOMS: [&str; 3] = ["OXT", "ND1", "NE2"];

/// Residue codes up to this many characters are treated as ions
const MAX_ION_NAME_LENGTH: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LigandClassification {
    Ion,
    Monodentate,
    Polydentate,
}

impl LigandClassification {
    /// All labels in the order reports and charts list them
    pub const ALL: [LigandClassification; 3] = [
        LigandClassification::Ion,
        LigandClassification::Monodentate,
        LigandClassification::Polydentate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LigandClassification::Ion => "ion",
            LigandClassification::Monodentate => "monodentate",
            LigandClassification::Polydentate => "polydentate",
        }
    }
}

impl fmt::Display for LigandClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// An individually addressable (non-ion) ligand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LigandRecord {
    pub resname: String,
    pub chain: String,
    pub resnum: isize,
    #[serde(rename = "type")]
    pub classification: LigandClassification,
}

/// Hetero residues grouped by classification
///
/// Ions are kept as bare residue names since they are only ever counted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LigandGroups {
    pub ion: Vec<String>,
    pub monodentate: Vec<LigandRecord>,
    pub polydentate: Vec<LigandRecord>,
}

impl LigandGroups {
    pub fn count(&self, classification: LigandClassification) -> usize {
        match classification {
            LigandClassification::Ion => self.ion.len(),
            LigandClassification::Monodentate => self.monodentate.len(),
            LigandClassification::Polydentate => self.polydentate.len(),
        }
    }

    /// (label, count) pairs in [`LigandClassification::ALL`] order
    pub fn counts(&self) -> [(LigandClassification, usize); 3] {
        LigandClassification::ALL.map(|classification| (classification, self.count(classification)))
    }

    pub fn total(&self) -> usize {
        self.ion.len() + self.monodentate.len() + self.polydentate.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Classifies a hetero residue; callers filter out polymer residues first
pub fn classify_ligand(residue: &Residue) -> LigandClassification {
    if residue.name.trim().chars().count() <= MAX_ION_NAME_LENGTH {
        LigandClassification::Ion
    } else if has_polydentate_probe_atom(residue) {
        LigandClassification::Polydentate
    } else {
        LigandClassification::Monodentate
    }
}

fn has_polydentate_probe_atom(residue: &Residue) -> bool {
    residue
        .atom_names()
        .any(|atom_name| POLYDENTATE_PROBE_ATOMS.contains(&atom_name))
}

/// Groups every hetero residue of `structure` by classification, in structure order
pub fn extract_ligands(structure: &Structure) -> LigandGroups {
    let mut ligand_groups = LigandGroups::default();

    for residue in structure.residues().filter(|residue| residue.hetero) {
        let classification = classify_ligand(residue);
        let record = || LigandRecord {
            resname: residue.name.clone(),
            chain: residue.chain_id.clone(),
            resnum: residue.serial_number,
            classification,
        };
        match classification {
            LigandClassification::Ion => ligand_groups.ion.push(residue.name.clone()),
            LigandClassification::Monodentate => ligand_groups.monodentate.push(record()),
            LigandClassification::Polydentate => ligand_groups.polydentate.push(record()),
        }
    }

    log::debug!(
        "{}: {} ions, {} monodentate, {} polydentate",
        structure.name,
        ligand_groups.ion.len(),
        ligand_groups.monodentate.len(),
        ligand_groups.polydentate.len()
    );
    ligand_groups
}
