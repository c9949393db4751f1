//! Post-bundle verification.
//!
//! The inliner and patcher never re-check each other's work; this stage is
//! the single place that confirms the final bundle carries no residual
//! reference to the excluded inputs before it can be delivered downstream.

use crate::error::{Result, WrapError};
use crate::project::ArtifactSet;
use camino::Utf8Path;

/// Scans the bundle for references that should have been inlined away:
/// the payload filename, the path-resolution import, and the on-disk read.
///
/// # Errors
///
/// Returns [`WrapError::ResidualReference`] for the first reference found.
pub fn verify_bundle(artefacts: &ArtifactSet, bundle: &Utf8Path) -> Result<()> {
    let text = std::fs::read_to_string(bundle.as_std_path())?;
    let references = [
        artefacts.payload.as_str(),
        "require('path')",
        "readFileSync",
    ];
    for reference in references {
        if text.contains(reference) {
            return Err(WrapError::ResidualReference {
                reference: reference.to_owned(),
                bundle: bundle.to_owned(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ProjectName;
    use camino::Utf8PathBuf;
    use rstest::rstest;

    fn write_bundle(contents: &str) -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
        let bundle = root.join("wasm.js");
        std::fs::write(&bundle, contents).expect("write bundle");
        (dir, bundle)
    }

    fn artefacts() -> ArtifactSet {
        ArtifactSet::for_project(&ProjectName::new("foo-bar").expect("valid name"))
    }

    #[test]
    fn a_clean_bundle_passes() {
        let (_guard, bundle) = write_bundle("var wasm = (() => { return 1; })();\n");
        verify_bundle(&artefacts(), &bundle).expect("clean bundle");
    }

    #[rstest]
    #[case::payload_filename("var x = fetch('foo_bar_bg.wasm');", "foo_bar_bg.wasm")]
    #[case::path_import("const p = require('path');", "require('path')")]
    #[case::disk_read("fs.readFileSync(p);", "readFileSync")]
    fn residual_references_are_rejected(#[case] contents: &str, #[case] leaked: &str) {
        let (_guard, bundle) = write_bundle(contents);
        let err = verify_bundle(&artefacts(), &bundle).expect_err("residual reference");
        assert!(matches!(
            err,
            WrapError::ResidualReference { reference, .. } if reference == leaked
        ));
    }
}
