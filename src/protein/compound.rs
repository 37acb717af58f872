//! Summary of a PubChem compound record
//!
//! PUG-REST returns compounds as `PC_Compounds[]`, each carrying a flat list of
//! properties tagged by URN label. Only the handful shown to users is kept.

use serde::{Deserialize, Serialize};

use crate::error::{MosaicError, MosaicResult};

/// Formula, weight and SMILES of a single compound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundSummary {
    pub cid: Option<u64>,
    pub molecular_formula: Option<String>,
    pub molecular_weight: Option<f64>,
    pub smiles: Option<String>,
}

#[derive(Deserialize)]
struct PugCompoundResponse {
    #[serde(rename = "PC_Compounds", default)]
    compounds: Vec<PugCompound>,
}

#[derive(Deserialize)]
struct PugCompound {
    #[serde(default)]
    id: Option<PugCompoundId>,
    #[serde(default)]
    props: Vec<PugProperty>,
}

#[derive(Deserialize)]
struct PugCompoundId {
    id: PugCid,
}

#[derive(Deserialize)]
struct PugCid {
    cid: u64,
}

#[derive(Deserialize)]
struct PugProperty {
    urn: PugUrn,
    value: PugValue,
}

#[derive(Deserialize)]
struct PugUrn {
    label: String,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct PugValue {
    sval: Option<String>,
    fval: Option<f64>,
}

// Newer records label the stereo-aware form "Absolute", older ones "Isomeric".
const SMILES_PREFERENCE: [&str; 3] = ["Absolute", "Isomeric", "Canonical"];

impl CompoundSummary {
    /// Parses the first compound out of a PUG-REST JSON document
    pub fn from_pug_json(json_text: &str) -> MosaicResult<Self> {
        let response: PugCompoundResponse = serde_json::from_str(json_text)?;
        let compound = response
            .compounds
            .into_iter()
            .next()
            .ok_or_else(|| MosaicError::missing_field("PC_Compounds"))?;

        let property_value = |label: &str| {
            compound
                .props
                .iter()
                .find(|property| property.urn.label == label)
                .map(|property| &property.value)
        };

        let molecular_weight = property_value("Molecular Weight").and_then(|value| {
            value
                .fval
                .or_else(|| value.sval.as_deref().and_then(|text| text.parse().ok()))
        });

        let smiles_properties: Vec<&PugProperty> = compound
            .props
            .iter()
            .filter(|property| property.urn.label == "SMILES")
            .collect();
        let smiles = SMILES_PREFERENCE
            .iter()
            .find_map(|preferred_name| {
                smiles_properties
                    .iter()
                    .find(|property| property.urn.name.as_deref() == Some(*preferred_name))
            })
            .or_else(|| smiles_properties.first())
            .and_then(|property| property.value.sval.clone());

        Ok(Self {
            cid: compound.id.as_ref().map(|compound_id| compound_id.id.cid),
            molecular_formula: property_value("Molecular Formula")
                .and_then(|value| value.sval.clone()),
            molecular_weight,
            smiles,
        })
    }
}
