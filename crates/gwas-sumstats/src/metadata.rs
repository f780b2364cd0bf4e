//! Read-only access to the metadata YAML sidecar.
//!
//! A sumstats file may ship with a `<filename>-meta.yaml` companion
//! produced elsewhere. The validator only ever consults it to infer
//! validation options: studies whose metadata names an analysis
//! software are permitted p-values of exactly zero.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, SumstatsError};

/// The subset of study metadata the validator cares about.
///
/// Parsed permissively: unknown keys are ignored and every field is
/// optional, so sidecars written by older tooling still load. Keys are
/// accepted in both snake_case and camelCase.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SumStatsMetadata {
    #[serde(alias = "gwasId")]
    pub gwas_id: Option<String>,
    #[serde(alias = "dataFileName")]
    pub data_file_name: Option<String>,
    #[serde(alias = "fileType")]
    pub file_type: Option<String>,
    #[serde(alias = "genomeAssembly")]
    pub genome_assembly: Option<String>,
    #[serde(alias = "coordinateSystem")]
    pub coordinate_system: Option<String>,
    pub sex: Option<String>,
    #[serde(alias = "analysisSoftware")]
    pub analysis_software: Option<String>,
    #[serde(alias = "pvalueIsNegLog10")]
    pub pvalue_is_neg_log10: Option<bool>,
    #[serde(alias = "isHarmonised")]
    pub is_harmonised: Option<bool>,
    #[serde(alias = "isSorted")]
    pub is_sorted: Option<bool>,
    #[serde(alias = "dateMetadataLastModified")]
    pub date_metadata_last_modified: Option<String>,
}

impl SumStatsMetadata {
    /// Whether the metadata implies zero p-values are acceptable.
    ///
    /// Some analysis tools emit a hard zero for results below their
    /// numeric floor, so a named analysis software relaxes the check.
    pub fn pval_zero_inferred(&self) -> bool {
        self.analysis_software.is_some()
    }
}

/// The sidecar path for a data file: `<filename>-meta.yaml`.
pub fn sidecar_path(data_file: &Path) -> PathBuf {
    let mut name = data_file.as_os_str().to_os_string();
    name.push("-meta.yaml");
    PathBuf::from(name)
}

/// Load a metadata file.
pub fn from_file(path: &Path) -> Result<SumStatsMetadata> {
    let file = File::open(path).map_err(|e| SumstatsError::io(path, e))?;
    Ok(serde_yaml::from_reader(file)?)
}

/// Load the sidecar for a data file, or `None` (with a warning) when it
/// is missing or unreadable. Absence is not an error — inference is
/// simply skipped.
pub fn for_data_file(data_file: &Path) -> Option<SumStatsMetadata> {
    let path = sidecar_path(data_file);
    match from_file(&path) {
        Ok(metadata) => Some(metadata),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "metadata sidecar not loaded");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_sidecar_path() {
        assert_eq!(
            sidecar_path(Path::new("/data/GCST1.tsv")),
            PathBuf::from("/data/GCST1.tsv-meta.yaml")
        );
    }

    #[test]
    fn test_parse_snake_case_sidecar() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("GCST1.tsv");
        let meta_path = sidecar_path(&data);
        let mut file = File::create(&meta_path).unwrap();
        file.write_all(
            b"gwas_id: GCST90000123\n\
              genome_assembly: GRCh37\n\
              analysis_software: BOLT-LMM\n\
              is_harmonised: false\n\
              trait_description:\n  - breast carcinoma\n",
        )
        .unwrap();

        let meta = for_data_file(&data).unwrap();
        assert_eq!(meta.gwas_id.as_deref(), Some("GCST90000123"));
        assert!(meta.pval_zero_inferred());
    }

    #[test]
    fn test_parse_camel_case_sidecar() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("GCST2.tsv");
        let mut file = File::create(sidecar_path(&data)).unwrap();
        file.write_all(b"analysisSoftware: regenie\npvalueIsNegLog10: true\n")
            .unwrap();

        let meta = for_data_file(&data).unwrap();
        assert!(meta.pval_zero_inferred());
        assert_eq!(meta.pvalue_is_neg_log10, Some(true));
    }

    #[test]
    fn test_missing_sidecar_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(for_data_file(&dir.path().join("GCST3.tsv")).is_none());
    }

    #[test]
    fn test_no_software_means_no_inference() {
        let meta = SumStatsMetadata::default();
        assert!(!meta.pval_zero_inferred());
    }
}
