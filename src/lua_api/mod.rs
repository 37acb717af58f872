//! Lua scripting engine for protein annotation
//!
//! This module provides the `ScriptEngine` which embeds a Lua interpreter
//! and exposes an API for fetching, loading, and annotating protein structures

mod protein;
mod reload;

use mlua::{Lua, LuaSerdeExt, Result};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::HydrogenBondCriteria;
use crate::protein::ProteinStore;

pub use protein::LuaProtein;
pub use reload::{is_script_path, ScriptReloader};

/// The Lua script engine
pub struct ScriptEngine {
    lua: Lua,
}

fn write_store(store: &RwLock<ProteinStore>) -> Result<RwLockWriteGuard<'_, ProteinStore>> {
    store
        .write()
        .map_err(|_| mlua::Error::RuntimeError("protein store lock poisoned".to_string()))
}

fn read_store(store: &RwLock<ProteinStore>) -> Result<RwLockReadGuard<'_, ProteinStore>> {
    store
        .read()
        .map_err(|_| mlua::Error::RuntimeError("protein store lock poisoned".to_string()))
}

impl ScriptEngine {
    /// Creates a new `ScriptEngine` and initializes the `pdb` global API table
    pub fn new(
        protein_data_store: Arc<RwLock<ProteinStore>>,
        hydrogen_bond_criteria: HydrogenBondCriteria,
    ) -> Result<Self> {
        let lua_runtime_instance = Lua::new();

        let pdb_api_table = lua_runtime_instance.create_table()?;

        // pdb.fetch(code) fetches a protein from RCSB by its PDB identifier
        let cloned_protein_store_reference = protein_data_store.clone();
        pdb_api_table.set(
            "fetch",
            lua_runtime_instance.create_function(move |_lua, requested_pdb_code: String| {
                log::info!("Fetching PDB: {}...", requested_pdb_code);
                let shared_protein_handle = write_store(&cloned_protein_store_reference)?
                    .fetch(&requested_pdb_code)
                    .map_err(mlua::Error::external)?;
                Ok(LuaProtein::new(shared_protein_handle, hydrogen_bond_criteria))
            })?,
        )?;

        // pdb.load(path) loads a protein from a local file (PDB or mmCIF)
        let cloned_protein_store_reference = protein_data_store.clone();
        pdb_api_table.set(
            "load",
            lua_runtime_instance.create_function(move |_lua, requested_file_path: String| {
                log::info!("Loading file: {}...", requested_file_path);
                let shared_protein_handle = write_store(&cloned_protein_store_reference)?
                    .load(&requested_file_path)
                    .map_err(mlua::Error::external)?;
                Ok(LuaProtein::new(shared_protein_handle, hydrogen_bond_criteria))
            })?,
        )?;

        // pdb.list() returns a table of names for all currently loaded protein identifiers
        let cloned_protein_store_reference = protein_data_store.clone();
        pdb_api_table.set(
            "list",
            lua_runtime_instance.create_function(move |lua_context, ()| {
                let available_protein_names = read_store(&cloned_protein_store_reference)?.list();
                lua_context.create_sequence_from(available_protein_names)
            })?,
        )?;

        // pdb.entry(code) returns the RCSB entry metadata as a nested table
        let cloned_protein_store_reference = protein_data_store.clone();
        pdb_api_table.set(
            "entry",
            lua_runtime_instance.create_function(move |lua_context, requested_pdb_code: String| {
                let entry_document = write_store(&cloned_protein_store_reference)?
                    .client_mut()
                    .fetch_entry(&requested_pdb_code)
                    .map_err(mlua::Error::external)?;
                lua_context.to_value(&entry_document)
            })?,
        )?;

        // pdb.compound(id) returns {cid, molecular_formula, molecular_weight, smiles}
        let cloned_protein_store_reference = protein_data_store;
        pdb_api_table.set(
            "compound",
            lua_runtime_instance.create_function(move |lua_context, compound_identifier: String| {
                let compound_summary = write_store(&cloned_protein_store_reference)?
                    .client_mut()
                    .fetch_compound(&compound_identifier)
                    .map_err(mlua::Error::external)?;
                lua_context.to_value(&compound_summary)
            })?,
        )?;

        lua_runtime_instance.globals().set("pdb", pdb_api_table)?;

        // Simple print override for cleaner output
        lua_runtime_instance.globals().set(
            "print",
            lua_runtime_instance.create_function(|_, variadic_print_arguments: mlua::Variadic<mlua::Value>| {
                let formatted_output_strings: Vec<String> = variadic_print_arguments
                    .iter()
                    .map(|argument_value| match argument_value {
                        mlua::Value::Nil => "nil".to_string(),
                        mlua::Value::Boolean(boolean_value) => boolean_value.to_string(),
                        mlua::Value::Integer(integer_value) => integer_value.to_string(),
                        mlua::Value::Number(numeric_value) => format!("{:.4}", numeric_value),
                        mlua::Value::String(string_value) => string_value.to_str().unwrap_or("").to_string(),
                        _ => format!("{:?}", argument_value),
                    })
                    .collect();
                println!("[Lua] {}", formatted_output_strings.join("\t"));
                Ok(())
            })?,
        )?;

        Ok(Self { lua: lua_runtime_instance })
    }

    /// Executes a string as Lua code
    pub fn run_script(&self, lua_code_string: &str) -> Result<()> {
        self.lua.load(lua_code_string).exec()
    }

    /// Reads a file and executes its content as Lua code
    pub fn run_file(&self, lua_file_path: &str) -> Result<()> {
        match std::fs::read_to_string(lua_file_path) {
            Ok(loaded_lua_code_string) => self.run_script(&loaded_lua_code_string),
            Err(file_read_error_message) => Err(mlua::Error::RuntimeError(format!(
                "Failed to read {}: {}",
                lua_file_path, file_read_error_message
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FetchConfig, ParseOptions};
    use crate::protein::fetch::Endpoint;
    use crate::protein::{FileFormat, RemoteClient};

    const ZINC_SITE_PDB: &str = "\
ATOM      1  N   HIS A   1      11.104   6.134  -6.504  1.00  0.00           N
ATOM      2  CA  HIS A   1      11.639   6.071  -5.147  1.00  0.00           C
ATOM      3  ND1 HIS A   1      13.155   3.788  -5.370  1.00  0.00           N
HETATM    4 ZN    ZN A 101      14.500   2.500  -5.000  1.00  0.00          ZN
HETATM    5  O   HOH A 201      10.000   1.000   1.000  1.00  0.00           O
END
";

    const ASPIRIN_PUG_JSON: &str = r#"{
        "PC_Compounds": [{
            "id": {"id": {"cid": 2244}},
            "props": [
                {"urn": {"label": "Molecular Formula"}, "value": {"sval": "C9H8O4"}},
                {"urn": {"label": "SMILES", "name": "Absolute"}, "value": {"sval": "CC(=O)OC1=CC=CC=C1C(=O)O"}}
            ]
        }]
    }"#;

    fn seeded_engine() -> ScriptEngine {
        let fetch_config = FetchConfig {
            disk_cache: false,
            ..FetchConfig::default()
        };
        let mut client = RemoteClient::new(&fetch_config).unwrap();
        client.cache_mut().insert(
            Endpoint::RcsbStructure(FileFormat::Pdb),
            "1ZNC",
            ZINC_SITE_PDB.to_string(),
        );
        client.cache_mut().insert(
            Endpoint::RcsbEntry,
            "1ZNC",
            r#"{"rcsb_id": "1ZNC", "struct": {"title": "ZINC SITE"}}"#.to_string(),
        );
        client
            .cache_mut()
            .insert(Endpoint::PubChemCompound, "2244", ASPIRIN_PUG_JSON.to_string());

        let store = Arc::new(RwLock::new(ProteinStore::new(client, ParseOptions::default())));
        ScriptEngine::new(store, HydrogenBondCriteria::default()).unwrap()
    }

    #[test]
    fn fetched_protein_exposes_basic_properties() {
        seeded_engine()
            .run_script(
                r#"
                local p = pdb.fetch("1znc")
                assert(p:name() == "1ZNC")
                assert(p:atom_count() == 5)
                assert(p:residue_count() == 3)
                assert(p:chains()[1] == "A")
                assert(#pdb.list() == 1 and pdb.list()[1] == "1ZNC")
                assert(string.find(p:info(), "Atoms: 5", 1, true))
                "#,
            )
            .unwrap();
    }

    #[test]
    fn residues_can_be_filtered_by_chain() {
        seeded_engine()
            .run_script(
                r#"
                local p = pdb.fetch("1ZNC")
                local all = p:residues()
                assert(#all == 3)
                assert(all[2].name == "ZN" and all[2].hetero == true and all[2].number == 101)
                assert(#p:residues("A") == 3)
                assert(#p:residues("B") == 0)
                "#,
            )
            .unwrap();
    }

    #[test]
    fn annotation_results_are_lua_tables() {
        seeded_engine()
            .run_script(
                r#"
                local p = pdb.fetch("1ZNC")
                local ligands = p:ligands()
                assert(#ligands.ion == 1 and ligands.ion[1] == "ZN")
                assert(#ligands.monodentate == 0)
                assert(#ligands.polydentate == 0)

                local counts = p:ligand_counts()
                assert(counts.ion == 1 and counts.monodentate == 0 and counts.polydentate == 0)

                local sites = p:active_sites()
                assert(#sites == 1)
                assert(sites[1].resname == "HIS" and sites[1].chain == "A" and sites[1].resnum == 1)

                assert(p:hbonds() == 0)
                assert(#p:ramachandran() == 0)
                "#,
            )
            .unwrap();
    }

    #[test]
    fn entry_and_compound_lookups_return_tables() {
        seeded_engine()
            .run_script(
                r#"
                local entry = pdb.entry("1znc")
                assert(entry.struct.title == "ZINC SITE")

                local aspirin = pdb.compound("2244")
                assert(aspirin.cid == 2244)
                assert(aspirin.molecular_formula == "C9H8O4")
                assert(aspirin.smiles == "CC(=O)OC1=CC=CC=C1C(=O)O")
                "#,
            )
            .unwrap();
    }

    #[test]
    fn invalid_identifiers_raise_lua_errors() {
        seeded_engine()
            .run_script(
                r#"
                local ok, err = pcall(pdb.fetch, "not-an-id")
                assert(not ok)
                assert(string.find(tostring(err), "Invalid identifier", 1, true))
                "#,
            )
            .unwrap();
    }

    #[test]
    fn export_json_writes_report() {
        let directory = tempfile::tempdir().unwrap();
        let report_path = directory.path().join("1znc.json");
        let script = format!(
            r#"pdb.fetch("1ZNC"):export_json("{}")"#,
            report_path.display().to_string().replace('\\', "\\\\")
        );

        seeded_engine().run_script(&script).unwrap();

        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
        assert_eq!(report["protein_name"], "1ZNC");
        assert_eq!(report["ligands"]["ion"][0], "ZN");
    }

    #[test]
    fn missing_script_file_is_an_error() {
        let engine = seeded_engine();
        assert!(engine.run_file("does/not/exist.lua").is_err());
    }
}
