//! Descriptor lists as TOML manifests.
//!
//! A manifest is a sequence of `[[patch]]` tables:
//!
//! ```toml
//! [[patch]]
//! description = "ScopeHelper getRootPointer return type fix"
//! file = "vendor/slevomat/coding-standard/SlevomatCodingStandard/Helpers/ScopeHelper.php"
//! search = "int $pointer): int"
//! replace = "int $pointer): ?int"
//! check = "int $pointer): ?int"
//! kind = "literal"   # or "pattern"
//! ```

use crate::error::{PatchError, Result};
use crate::matcher::compile_pattern;
use crate::types::{PatchDescriptor, PatchKind};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

const BUILTIN_MANIFEST: &str = include_str!("../manifests/slevomat.toml");

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    #[serde(rename = "patch", default)]
    patches: Vec<PatchDescriptor>,
}

pub fn load_from_str(content: &str) -> Result<Vec<PatchDescriptor>> {
    let manifest: Manifest = toml::from_str(content)?;
    validate(&manifest.patches)?;
    debug!("Loaded {} descriptor(s)", manifest.patches.len());
    Ok(manifest.patches)
}

pub fn load_from_path(path: &Path) -> Result<Vec<PatchDescriptor>> {
    let content = std::fs::read_to_string(path).map_err(|source| PatchError::ManifestIo {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&content)
}

/// The SlevomatCodingStandard null-safety fixes shipped with the tool.
pub fn builtin() -> Result<Vec<PatchDescriptor>> {
    load_from_str(BUILTIN_MANIFEST)
}

pub fn validate(descriptors: &[PatchDescriptor]) -> Result<()> {
    for (i, d) in descriptors.iter().enumerate() {
        let invalid = |reason: &str| PatchError::InvalidDescriptor {
            index: i + 1,
            description: d.description.clone(),
            reason: reason.to_string(),
        };

        if d.matcher.is_empty() {
            return Err(invalid("'search' is empty"));
        }
        if d.marker.is_empty() {
            return Err(invalid("'check' is empty"));
        }

        match d.kind {
            PatchKind::Literal => {
                if !d.replacement.contains(&d.marker) {
                    return Err(invalid("'replace' does not contain the 'check' marker"));
                }
            }
            PatchKind::Pattern => {
                compile_pattern(d)?;
                if !d.replacement.contains(&d.marker) {
                    // The marker may still come out of a captured group.
                    warn!(
                        "Template of '{}' does not contain its marker literally",
                        d.description
                    );
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_manifest_loads() {
        let patches = builtin().unwrap();
        assert_eq!(patches.len(), 5);
        assert_eq!(
            patches.iter().filter(|p| p.kind == PatchKind::Pattern).count(),
            1
        );
        assert!(patches
            .iter()
            .all(|p| p.target.starts_with("vendor/slevomat/coding-standard")));
        assert_eq!(
            patches[0].matcher,
            "$tokens[$attributeStartPointer]['attribute_closer']"
        );
    }

    #[test]
    fn test_kind_defaults_to_literal() {
        let patches = load_from_str(
            r#"
            [[patch]]
            description = "d"
            file = "a.php"
            search = "a"
            replace = "ab"
            check = "ab"
            "#,
        )
        .unwrap();
        assert_eq!(patches[0].kind, PatchKind::Literal);
    }

    #[test]
    fn test_empty_manifest_is_valid() {
        assert!(load_from_str("").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_literal_without_marker_in_replacement() {
        let err = load_from_str(
            r#"
            [[patch]]
            description = "never idempotent"
            file = "a.php"
            search = "a"
            replace = "b"
            check = "c"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, PatchError::InvalidDescriptor { index: 1, .. }));
    }

    #[test]
    fn test_rejects_invalid_regex() {
        let err = load_from_str(
            r#"
            [[patch]]
            description = "bad regex"
            file = "a.php"
            kind = "pattern"
            search = "new Foo("
            replace = "x"
            check = "x"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, PatchError::InvalidPattern { .. }));
    }

    #[test]
    fn test_rejects_misspelled_keys() {
        let err = load_from_str(
            r#"
            [[patch]]
            description = "typo"
            file = "a.php"
            knd = "pattern"
            search = "a"
            replace = "ab"
            check = "ab"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, PatchError::Manifest(_)));

        let err = load_from_str("[[patches]]\ndescription = \"d\"\n").unwrap_err();
        assert!(matches!(err, PatchError::Manifest(_)));
    }

    #[test]
    fn test_rejects_missing_fields() {
        let err = load_from_str("[[patch]]\ndescription = \"d\"\n").unwrap_err();
        assert!(matches!(err, PatchError::Manifest(_)));
    }
}
