//! Archetype catalog loading.

use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use demo_catalog::{ArchetypeCatalog, CatalogError};
use thiserror::Error;
use tracing::info;

/// Errors returned while loading the archetype catalog.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    /// Catalog file could not be read.
    #[error("failed to read catalog at {path}: {source}")]
    Read {
        /// Path to the catalog file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Catalog contents failed validation.
    #[error("invalid archetype catalog: {0}")]
    Invalid(#[from] CatalogError),
}

/// Load the catalog from `path`, or the bundled catalog when `None`.
///
/// # Examples
///
/// ```
/// use demo_provisioner::provisioning::load_catalog;
///
/// let catalog = load_catalog(None).expect("bundled catalog is valid");
/// assert_eq!(catalog.clients().len(), 25);
/// ```
pub fn load_catalog(path: Option<&Path>) -> Result<ArchetypeCatalog, CatalogLoadError> {
    let Some(path) = path else {
        return Ok(ArchetypeCatalog::bundled()?);
    };
    let contents = read_catalog_file(path)?;
    let catalog = ArchetypeCatalog::from_json(&contents)?;
    info!(
        path = %path.display(),
        clients = catalog.clients().len(),
        staff = catalog.staff().len(),
        "archetype catalog loaded"
    );
    Ok(catalog)
}

fn read_error(path: &Path, source: std::io::Error) -> CatalogLoadError {
    CatalogLoadError::Read {
        path: path.to_path_buf(),
        source,
    }
}

fn read_catalog_file(path: &Path) -> Result<String, CatalogLoadError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        read_error(
            path,
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "catalog path must be a file",
            ),
        )
    })?;
    let dir =
        Dir::open_ambient_dir(parent, ambient_authority()).map_err(|err| read_error(path, err))?;
    dir.read_to_string(Path::new(file_name))
        .map_err(|err| read_error(path, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use rstest::rstest;
    use tempfile::NamedTempFile;

    const SMALL_CATALOG: &str = r#"{
        "version": 1,
        "clients": [{
            "displayName": "Ada Park",
            "baseIdentity": "ada.park@example.com",
            "organization": "Northwind",
            "personalityType": "D",
            "scoreVector": {"D": 55, "I": 15, "S": 10, "C": 20}
        }],
        "staff": [{
            "displayName": "Ben Cole",
            "baseIdentity": "ben.cole@example.com",
            "role": "Coach",
            "personalityType": "S",
            "scoreVector": {"D": 10, "I": 20, "S": 50, "C": 20}
        }]
    }"#;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write catalog");
        file
    }

    #[rstest]
    fn bundled_catalog_is_used_without_a_path() {
        let catalog = load_catalog(None).expect("bundled catalog");

        assert_eq!(catalog.clients().len(), 25);
        assert_eq!(catalog.staff().len(), 25);
    }

    #[rstest]
    fn replacement_file_is_loaded() {
        let file = write_temp(SMALL_CATALOG);

        let catalog = load_catalog(Some(file.path())).expect("file catalog");

        assert_eq!(catalog.clients().len(), 1);
        assert_eq!(catalog.staff()[0].role(), Some("Coach"));
    }

    #[rstest]
    fn missing_file_reports_its_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("absent.json");

        let err = load_catalog(Some(&path)).expect_err("missing file");

        assert!(matches!(err, CatalogLoadError::Read { .. }));
        assert!(err.to_string().contains("absent.json"));
    }

    #[rstest]
    fn invalid_contents_are_rejected() {
        let file = write_temp(r#"{"version": 1, "clients": [], "staff": []}"#);

        let err = load_catalog(Some(file.path())).expect_err("empty lists");

        assert!(matches!(err, CatalogLoadError::Invalid(_)));
    }
}
