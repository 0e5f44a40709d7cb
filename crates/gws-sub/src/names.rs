//! Output file names for one submodel extraction run.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SubError};

/// The file names a submodel's rewritten files are emitted under, one per
/// dependent file type. Loadable from JSON so a host application can hand
/// the whole map over in one piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmodelNames {
    pub manifest_file: String,
    pub node_file: String,
    pub aquifer_file: String,
    pub boundary_file: String,
    pub drain_file: String,
    pub pumping_file: String,
    pub lake_file: String,
}

impl SubmodelNames {
    /// Conventional names derived from one base name, e.g. `sub` gives
    /// `sub_sim.in`, `sub_nodes.dat`, and so on.
    pub fn with_base(base: &str) -> Self {
        Self {
            manifest_file: format!("{base}_sim.in"),
            node_file: format!("{base}_nodes.dat"),
            aquifer_file: format!("{base}_gw.dat"),
            boundary_file: format!("{base}_bc.dat"),
            drain_file: format!("{base}_drains.dat"),
            pumping_file: format!("{base}_pumping.dat"),
            lake_file: format!("{base}_lakes.dat"),
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| SubError::io(path, e))?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_expands_to_one_name_per_file_type() {
        let names = SubmodelNames::with_base("butte");
        assert_eq!(names.manifest_file, "butte_sim.in");
        assert_eq!(names.drain_file, "butte_drains.dat");
    }

    #[test]
    fn round_trips_through_json() {
        let names = SubmodelNames::with_base("sub");
        let json = serde_json::to_string(&names).expect("serialize");
        let back: SubmodelNames = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(names, back);
    }

    #[test]
    fn loads_from_a_json_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("names.json");
        let names = SubmodelNames::with_base("sub");
        std::fs::write(&path, serde_json::to_string(&names).expect("serialize"))
            .expect("write json");
        let loaded = SubmodelNames::from_json_file(&path).expect("load");
        assert_eq!(loaded, names);
    }
}
