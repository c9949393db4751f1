//! Inlining of the wasm payload into its loader glue.
//!
//! The loader script the compiler generates reads the payload from disk via
//! a path-resolution import. This stage embeds the payload as a base64
//! literal instead and replaces the on-disk load with a decode that picks an
//! environment-appropriate decoder at the glue code's own run time. The
//! rewritten script has no residual dependency on the payload file or on
//! path resolution.

use crate::error::Result;
use crate::patcher::{self, PatchRule};
use crate::project::ArtifactSet;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use camino::Utf8Path;
use log::debug;

/// Outcome of inlining, reported for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineReport {
    /// Byte length of the original payload.
    pub payload_len: usize,
}

/// Rewrites the loader script from `wasm_dir` into `staging_dir`, embedding
/// the payload's bytes as base64 text.
///
/// # Errors
///
/// Fails when the payload cannot be read, when either textual marker is
/// absent from the loader (`PatchMissed`), or on I/O errors.
pub fn inline_payload(
    artefacts: &ArtifactSet,
    wasm_dir: &Utf8Path,
    staging_dir: &Utf8Path,
) -> Result<InlineReport> {
    let payload_path = wasm_dir.join(&artefacts.payload);
    let bytes = std::fs::read(payload_path.as_std_path())?;
    let encoded = STANDARD.encode(&bytes);
    debug!(
        "inlining {} ({} bytes, {} base64 characters)",
        artefacts.payload,
        bytes.len(),
        encoded.len()
    );

    let rules = loader_rules(&artefacts.payload, &encoded, bytes.len())?;
    let source = wasm_dir.join(&artefacts.loader_script);
    let dest = staging_dir.join(&artefacts.loader_script);
    patcher::patch_file(&source, &dest, &rules)?;

    Ok(InlineReport {
        payload_len: bytes.len(),
    })
}

/// The two mandatory loader rewrites: drop the path-resolution import and
/// replace the on-disk byte load with the embedded decode.
fn loader_rules(payload_name: &str, encoded: &str, len: usize) -> Result<[PatchRule; 2]> {
    let path_line = format!(
        r"const path = require\('path'\)\.join\(__dirname, '{}'\);\r?\n?",
        regex::escape(payload_name)
    );
    Ok([
        PatchRule::mandatory("drop-path-import", &path_line, "")?,
        PatchRule::mandatory(
            "embed-payload",
            r"const bytes = require\('fs'\)\.readFileSync\(path\);",
            decode_snippet(encoded, len),
        )?,
    ])
}

/// Generated replacement for the on-disk load. The decoder is selected when
/// the glue itself runs: browser-like environments expose `atob`, Node
/// exposes `Buffer`. The decoded bytes fill a fixed-size array matching the
/// payload's exact length.
fn decode_snippet(encoded: &str, len: usize) -> String {
    let mut snippet = String::with_capacity(encoded.len() + 512);
    snippet.push_str("const wasmBase64 = '");
    snippet.push_str(encoded);
    snippet.push_str("';\n");
    snippet.push_str(&format!("const wasmLength = {len};\n"));
    snippet.push_str("const wasmBinary = typeof atob === 'function'\n");
    snippet.push_str("    ? atob(wasmBase64)\n");
    snippet.push_str("    : Buffer.from(wasmBase64, 'base64').toString('binary');\n");
    snippet.push_str("const bytes = new Uint8Array(wasmLength);\n");
    snippet.push_str("for (let i = 0; i < wasmLength; i++) {\n");
    snippet.push_str("    bytes[i] = wasmBinary.charCodeAt(i);\n");
    snippet.push_str("}");
    snippet
}
