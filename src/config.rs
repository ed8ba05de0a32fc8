//! Immutable pipeline configuration.
//!
//! One [`PipelineConfig`] value is built up front and passed by reference into
//! every stage; there is no ambient/global configuration state.

use std::path::{Path, PathBuf};

/// Configuration for one consolidation run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory scanned for input files and used for all output artifacts.
    pub directory: PathBuf,
    /// Filename glob pattern selecting candidate files inside `directory`.
    pub pattern: String,
    /// Columns whose values must always be represented as text, regardless of
    /// apparent numeric content (identifier-like data).
    pub force_text_columns: Vec<String>,
    /// Maximum number of rows per fallback CSV chunk.
    pub chunk_size: usize,
    /// File name of the primary columnar artifact inside `directory`.
    pub artifact_name: String,
}

impl PipelineConfig {
    /// Configuration for `directory` with the standard pattern, force-text
    /// columns, chunk size, and artifact name.
    pub fn for_directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }

    /// Path of the primary columnar artifact.
    pub fn artifact_path(&self) -> PathBuf {
        self.directory.join(&self.artifact_name)
    }

    /// Path of the 1-based fallback chunk `n`.
    pub fn fallback_chunk_path(&self, n: usize) -> PathBuf {
        self.directory.join(format!("fallback_parte_{n}.csv"))
    }

    /// True when `column` must be coerced to text.
    pub fn is_force_text(&self, column: &str) -> bool {
        self.force_text_columns.iter().any(|c| c == column)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            pattern: "Boletim_Diario_dos_Atendimentos_*".to_string(),
            force_text_columns: vec!["Nr. Registro".to_string(), "CNS".to_string()],
            chunk_size: 500_000,
            artifact_name: "consolidado.parquet".to_string(),
        }
    }
}

/// Base name of a path as UTF-8 (lossy), used for `arquivo_origem` tagging.
pub fn file_base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_standard_layout() {
        let cfg = PipelineConfig::for_directory("/dados");
        assert_eq!(cfg.pattern, "Boletim_Diario_dos_Atendimentos_*");
        assert_eq!(cfg.chunk_size, 500_000);
        assert_eq!(cfg.artifact_path(), PathBuf::from("/dados/consolidado.parquet"));
        assert_eq!(
            cfg.fallback_chunk_path(3),
            PathBuf::from("/dados/fallback_parte_3.csv")
        );
        assert!(cfg.is_force_text("CNS"));
        assert!(cfg.is_force_text("Nr. Registro"));
        assert!(!cfg.is_force_text("Nome"));
    }

    #[test]
    fn base_name_drops_parent_directories() {
        assert_eq!(file_base_name(Path::new("/a/b/c.xlsx")), "c.xlsx");
    }
}
