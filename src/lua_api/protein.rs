//! Lua interface for protein data
//!
//! This module implements `mlua::UserData` for `LuaProtein`, allowing Lua scripts
//! to inspect loaded structures and run the annotation and analysis passes on them

use mlua::{LuaSerdeExt, UserData};
use std::sync::Arc;

use crate::analysis::export::{export_report_to_json, AnnotationReport};
use crate::analysis::hydrogen_bonds::detect_hydrogen_bonds;
use crate::analysis::ramachandran::calculate_ramachandran_angles;
use crate::annotation::{extract_ligands, predict_active_sites};
use crate::config::HydrogenBondCriteria;
use crate::protein::ProteinData;

/// A Lua-exposed handle to a shared, immutable protein
#[derive(Clone)]
pub struct LuaProtein {
    inner: Arc<ProteinData>,
    hydrogen_bond_criteria: HydrogenBondCriteria,
}

impl LuaProtein {
    pub fn new(inner: Arc<ProteinData>, hydrogen_bond_criteria: HydrogenBondCriteria) -> Self {
        Self {
            inner,
            hydrogen_bond_criteria,
        }
    }
}

impl UserData for LuaProtein {
    fn add_methods<'lua, M: mlua::UserDataMethods<'lua, Self>>(methods: &mut M) {
        // p:name() returns the name/ID of the protein
        methods.add_method("name", |_, this, ()| Ok(this.inner.name.clone()));

        methods.add_method("atom_count", |_, this, ()| Ok(this.inner.atom_count()));

        methods.add_method("residue_count", |_, this, ()| {
            Ok(this.inner.structure.residue_count())
        });

        // p:chains() returns a list of all chain identifiers in the protein
        methods.add_method("chains", |lua_context, this, ()| {
            lua_context.create_sequence_from(this.inner.chain_ids())
        });

        // p:info() returns a summary string with protein information
        methods.add_method("info", |_, this, ()| {
            let structure = &this.inner.structure;
            let bounding_box_dimensions = structure
                .bounding_box()
                .map(|(minimum_coordinate_bound, maximum_coordinate_bound)| {
                    maximum_coordinate_bound - minimum_coordinate_bound
                })
                .unwrap_or_default();
            Ok(format!(
                "Protein: {}\n  Atoms: {}\n  Chains: {:?}\n  Residues: {}\n  Size: {:.1} x {:.1} x {:.1} A",
                this.inner.name,
                structure.atom_count(),
                structure.chain_ids(),
                structure.residue_count(),
                bounding_box_dimensions.x,
                bounding_box_dimensions.y,
                bounding_box_dimensions.z
            ))
        });

        // p:residues(chain_id) returns residue tables, optionally filtered by chain
        methods.add_method(
            "residues",
            |lua_context, this, chain_identifier_filter: Option<String>| {
                let lua_residues_collection_table = lua_context.create_table()?;

                let matching_residues = this.inner.structure.residues().filter(|residue| {
                    chain_identifier_filter
                        .as_deref()
                        .map_or(true, |filter_string| residue.chain_id == filter_string)
                });
                for (residue_index, residue) in matching_residues.enumerate() {
                    let lua_residue_data_table = lua_context.create_table()?;
                    lua_residue_data_table.set("name", residue.name.as_str())?;
                    lua_residue_data_table.set("chain", residue.chain_id.as_str())?;
                    lua_residue_data_table.set("number", residue.serial_number)?;
                    lua_residue_data_table.set("hetero", residue.hetero)?;
                    lua_residue_data_table.set("atom_count", residue.atoms().len())?;
                    lua_residues_collection_table.set(residue_index + 1, lua_residue_data_table)?;
                }

                Ok(lua_residues_collection_table)
            },
        );

        // p:ligands() returns {ion = {names}, monodentate = {records}, polydentate = {records}}
        methods.add_method("ligands", |lua_context, this, ()| {
            lua_context.to_value(&extract_ligands(&this.inner.structure))
        });

        // p:ligand_counts() returns {ion = n, monodentate = n, polydentate = n}
        methods.add_method("ligand_counts", |lua_context, this, ()| {
            let ligand_counts_table = lua_context.create_table()?;
            for (classification, count) in extract_ligands(&this.inner.structure).counts() {
                ligand_counts_table.set(classification.label(), count)?;
            }
            Ok(ligand_counts_table)
        });

        // p:active_sites() returns a list of {resname, chain, resnum}
        methods.add_method("active_sites", |lua_context, this, ()| {
            lua_context.to_value(&predict_active_sites(&this.inner.structure))
        });

        // p:hbonds() returns the number of detected hydrogen bonds
        methods.add_method("hbonds", |_, this, ()| {
            Ok(detect_hydrogen_bonds(&this.inner.structure, &this.hydrogen_bond_criteria).len())
        });

        // p:ramachandran() returns a list of phi/psi points
        methods.add_method("ramachandran", |lua_context, this, ()| {
            lua_context.to_value(&calculate_ramachandran_angles(&this.inner.structure))
        });

        // p:export_json(path) writes the full annotation report
        methods.add_method("export_json", |_, this, output_path: String| {
            let report = AnnotationReport::build(&this.inner, &this.hydrogen_bond_criteria);
            export_report_to_json(&report, &output_path).map_err(mlua::Error::external)
        });
    }
}
