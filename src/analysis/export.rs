//! Export of protein annotation data to JSON and CSV formats

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::hydrogen_bonds::detect_hydrogen_bonds;
use super::ramachandran::RamachandranPoint;
use crate::annotation::{annotate_structure, ActiveSiteCandidate, LigandGroups};
use crate::config::HydrogenBondCriteria;
use crate::error::MosaicResult;
use crate::protein::ProteinData;

/// A structured report of protein properties and annotation results
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnnotationReport {
    pub protein_name: String,
    pub total_atom_count: usize,
    pub total_residue_count: usize,
    pub chain_identifiers: Vec<String>,
    pub center_of_mass_coordinates: [f32; 3],
    pub ligand_counts: BTreeMap<String, usize>,
    pub ligands: LigandGroups,
    pub active_sites: Vec<ActiveSiteCandidate>,
    pub hydrogen_bond_count: usize,
}

impl AnnotationReport {
    pub fn build(protein_data: &ProteinData, hydrogen_bond_criteria: &HydrogenBondCriteria) -> Self {
        let structure = &protein_data.structure;
        let annotation = annotate_structure(structure);
        let center_of_mass = structure.center_of_mass();

        Self {
            protein_name: protein_data.name.clone(),
            total_atom_count: structure.atom_count(),
            total_residue_count: structure.residue_count(),
            chain_identifiers: structure.chain_ids(),
            center_of_mass_coordinates: center_of_mass.to_array(),
            ligand_counts: annotation
                .ligands
                .counts()
                .iter()
                .map(|(classification, count)| (classification.label().to_string(), *count))
                .collect(),
            ligands: annotation.ligands,
            active_sites: annotation.active_sites,
            hydrogen_bond_count: detect_hydrogen_bonds(structure, hydrogen_bond_criteria).len(),
        }
    }
}

/// Writes the report as pretty-printed JSON
pub fn write_report_json(report: &AnnotationReport, writer: impl Write) -> MosaicResult<()> {
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

/// Exports an annotation report to a JSON file
pub fn export_report_to_json(report: &AnnotationReport, file_system_path: impl AsRef<Path>) -> MosaicResult<()> {
    let mut output_file_handle = BufWriter::new(File::create(file_system_path)?);
    write_report_json(report, &mut output_file_handle)?;
    output_file_handle.flush()?;
    Ok(())
}

/// Writes ligand counts as `LigandType,Count` rows, one per classification
pub fn write_ligand_counts_csv(ligands: &LigandGroups, mut writer: impl Write) -> MosaicResult<()> {
    writeln!(writer, "LigandType,Count")?;
    for (classification, count) in ligands.counts() {
        writeln!(writer, "{},{}", classification, count)?;
    }
    Ok(())
}

pub fn export_ligand_counts_to_csv(ligands: &LigandGroups, file_system_path: impl AsRef<Path>) -> MosaicResult<()> {
    let mut output_file_handle = BufWriter::new(File::create(file_system_path)?);
    write_ligand_counts_csv(ligands, &mut output_file_handle)?;
    output_file_handle.flush()?;
    Ok(())
}

/// Writes Ramachandran points as CSV with two-decimal angles
pub fn write_ramachandran_csv(points: &[RamachandranPoint], mut writer: impl Write) -> MosaicResult<()> {
    writeln!(writer, "Chain,ResidueNumber,ResidueName,Phi,Psi")?;
    for point in points {
        writeln!(
            writer,
            "{},{},{},{:.2},{:.2}",
            point.chain_identifier, point.residue_number, point.residue_name, point.phi_angle, point.psi_angle
        )?;
    }
    Ok(())
}

pub fn export_ramachandran_to_csv(points: &[RamachandranPoint], file_system_path: impl AsRef<Path>) -> MosaicResult<()> {
    let mut output_file_handle = BufWriter::new(File::create(file_system_path)?);
    write_ramachandran_csv(points, &mut output_file_handle)?;
    output_file_handle.flush()?;
    Ok(())
}
