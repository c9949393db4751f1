//! Pattern-substitution rules for glue-code compatibility rewrites.
//!
//! Rules apply in a fixed order and report how often they matched. A
//! mandatory rule that matches nothing fails the stage rather than shipping
//! an unpatched artefact; optional rules pass the text through unchanged.

use crate::error::{Result, WrapError};
use camino::Utf8Path;
use log::trace;
use regex::{NoExpand, Regex};
use std::fs;

/// One ordered rewrite applied to glue-code text.
#[derive(Debug, Clone)]
pub struct PatchRule {
    name: String,
    pattern: Regex,
    replacement: String,
    mandatory: bool,
}

impl PatchRule {
    /// Creates a rule that must match at least once when applied.
    ///
    /// # Errors
    ///
    /// Returns [`WrapError::InvalidRule`] when the pattern does not compile.
    pub fn mandatory(
        name: impl Into<String>,
        pattern: &str,
        replacement: impl Into<String>,
    ) -> Result<Self> {
        Self::compile(name, pattern, replacement, true)
    }

    /// Creates a rule whose absence of matches is a silent pass-through.
    ///
    /// # Errors
    ///
    /// Returns [`WrapError::InvalidRule`] when the pattern does not compile.
    pub fn optional(
        name: impl Into<String>,
        pattern: &str,
        replacement: impl Into<String>,
    ) -> Result<Self> {
        Self::compile(name, pattern, replacement, false)
    }

    fn compile(
        name: impl Into<String>,
        pattern: &str,
        replacement: impl Into<String>,
        mandatory: bool,
    ) -> Result<Self> {
        let name = name.into();
        let pattern = Regex::new(pattern).map_err(|e| WrapError::InvalidRule {
            rule: name.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            name,
            pattern,
            replacement: replacement.into(),
            mandatory,
        })
    }

    /// The rule's name, used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// How often one rule matched during an application pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    /// Name of the applied rule.
    pub rule: String,
    /// Number of matches the rule replaced.
    pub matches: usize,
}

/// Applies the rules to `text` in order.
///
/// Replacement strings are taken literally; they are generated content and
/// must not be re-interpreted as capture templates.
///
/// # Errors
///
/// Returns [`WrapError::PatchMissed`] when a mandatory rule matches nothing
/// in the text as rewritten by the preceding rules. `file` only labels the
/// error.
pub fn apply_rules(
    text: &str,
    rules: &[PatchRule],
    file: &Utf8Path,
) -> Result<(String, Vec<RuleOutcome>)> {
    let mut current = text.to_owned();
    let mut outcomes = Vec::with_capacity(rules.len());

    for rule in rules {
        let matches = rule.pattern.find_iter(&current).count();
        trace!("rule `{}` matched {matches} time(s) in {file}", rule.name);
        if matches == 0 && rule.mandatory {
            return Err(WrapError::PatchMissed {
                rule: rule.name.clone(),
                file: file.to_owned(),
            });
        }
        if matches > 0 {
            current = rule
                .pattern
                .replace_all(&current, NoExpand(&rule.replacement))
                .into_owned();
        }
        outcomes.push(RuleOutcome {
            rule: rule.name.clone(),
            matches,
        });
    }

    Ok((current, outcomes))
}

/// Applies the rules to `source` and writes the result to `dest`, creating
/// parent directories as needed.
///
/// # Errors
///
/// Propagates I/O errors and [`WrapError::PatchMissed`] from [`apply_rules`].
pub fn patch_file(
    source: &Utf8Path,
    dest: &Utf8Path,
    rules: &[PatchRule],
) -> Result<Vec<RuleOutcome>> {
    let text = fs::read_to_string(source.as_std_path())?;
    let (patched, outcomes) = apply_rules(&text, rules, source)?;
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent.as_std_path())?;
    }
    fs::write(dest.as_std_path(), patched)?;
    Ok(outcomes)
}

/// The built-in main-glue rule: route text decoding through the
/// `text-encoding` polyfill so the script also runs in environments without
/// a built-in decoder.
///
/// # Errors
///
/// Never fails in practice; the pattern is static.
pub fn text_decoder_rule() -> Result<PatchRule> {
    PatchRule::mandatory(
        "text-decoder-polyfill",
        r"new TextDecoder\(",
        "new (require('text-encoding').TextDecoder)(",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    fn label() -> Utf8PathBuf {
        Utf8PathBuf::from("glue.js")
    }

    #[test]
    fn mandatory_rule_with_no_match_fails() {
        let rule = PatchRule::mandatory("drop-import", r"require\('path'\)", "").expect("rule");
        let err = apply_rules("nothing to see", &[rule], &label()).expect_err("no match");
        assert!(matches!(
            err,
            WrapError::PatchMissed { rule, .. } if rule == "drop-import"
        ));
    }

    #[test]
    fn optional_rule_with_no_match_passes_through() {
        let rule = PatchRule::optional("drop-import", r"require\('path'\)", "").expect("rule");
        let (patched, outcomes) =
            apply_rules("nothing to see", &[rule], &label()).expect("pass-through");
        assert_eq!(patched, "nothing to see");
        assert_eq!(outcomes, vec![RuleOutcome { rule: "drop-import".to_owned(), matches: 0 }]);
    }

    #[test]
    fn rules_apply_in_order_and_report_counts() {
        let first = PatchRule::mandatory("a-to-b", "a", "b").expect("rule");
        let second = PatchRule::mandatory("b-to-c", "b", "c").expect("rule");
        let (patched, outcomes) = apply_rules("aba", &[first, second], &label()).expect("rules");
        assert_eq!(patched, "ccc");
        assert_eq!(outcomes[0].matches, 2);
        assert_eq!(outcomes[1].matches, 3);
    }

    #[test]
    fn replacements_are_literal_not_capture_templates() {
        let rule = PatchRule::mandatory("literal", "X", "pays $0 dollars").expect("rule");
        let (patched, _) = apply_rules("X", &[rule], &label()).expect("rules");
        assert_eq!(patched, "pays $0 dollars");
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let err = PatchRule::mandatory("broken", "(unclosed", "").expect_err("bad regex");
        assert!(matches!(
            err,
            WrapError::InvalidRule { rule, .. } if rule == "broken"
        ));
    }

    #[test]
    fn text_decoder_rule_routes_through_the_polyfill() {
        let glue = "let cachedTextDecoder = new TextDecoder('utf-8', { ignoreBOM: true, fatal: true });\n";
        let rule = text_decoder_rule().expect("built-in rule");
        let (patched, _) = apply_rules(glue, &[rule], &label()).expect("rule applies");
        assert!(patched.contains("new (require('text-encoding').TextDecoder)('utf-8'"));
        assert!(!patched.contains("new TextDecoder("));
    }

    #[test]
    fn text_decoder_rule_does_not_match_already_patched_text() {
        let patched = "new (require('text-encoding').TextDecoder)('utf-8');\n";
        let rule = text_decoder_rule().expect("built-in rule");
        // Re-application would be a zero-match failure; the pipeline applies
        // each rule exactly once per run.
        let err = apply_rules(patched, &[rule], &label()).expect_err("no second match");
        assert!(matches!(err, WrapError::PatchMissed { .. }));
    }

    #[test]
    fn patch_file_writes_into_the_staging_tree() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
        let source = root.join("in.js");
        let dest = root.join("staging/out.js");
        std::fs::write(&source, "value = 1;").expect("write");

        let rule = PatchRule::mandatory("bump", "1", "2").expect("rule");
        let outcomes = patch_file(&source, &dest, &[rule]).expect("patching succeeds");
        assert_eq!(outcomes[0].matches, 1);
        assert_eq!(std::fs::read_to_string(&dest).expect("read"), "value = 2;");
    }
}
