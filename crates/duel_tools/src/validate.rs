//! Data validation utilities.

use std::path::Path;

use duel_core::catalog::SkillCatalog;
use duel_core::error::Result;

/// Load and validate a skill catalog RON file.
///
/// Returns the number of skills defined.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or fails validation.
pub fn validate_catalog_file(path: &Path) -> Result<usize> {
    let catalog = SkillCatalog::load(path)?;
    Ok(catalog.skills.len())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use duel_core::error::BattleError;

    use super::*;

    #[test]
    fn test_bundled_catalog_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/data/skills.ron");
        assert_eq!(validate_catalog_file(&path).unwrap(), 2);
    }

    #[test]
    fn test_broken_catalog_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "SkillCatalog(skills: [(id: \"x\", kind: Magic, damage: 5)])").unwrap();

        let err = validate_catalog_file(file.path()).unwrap_err();
        assert!(matches!(err, BattleError::DataParse { .. }));
        assert!(err.to_string().contains("must cost mana"));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = validate_catalog_file(Path::new("does/not/exist.ron")).unwrap_err();
        assert!(matches!(err, BattleError::DataParse { .. }));
    }
}
