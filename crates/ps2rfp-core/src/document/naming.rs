//! Output file naming.
//!
//! `250826 PS-USA-2444 EGLINTON PJT-A.xlsm` becomes
//! `250826 RFP-USA-2444 EGLINTON PJT-A.xlsm`. A dated name without the
//! source token gets the target token inserted after the date, and anything
//! else gets a `_RFP` suffix.

use std::path::{Path, PathBuf};

use regex::{Regex, RegexBuilder};

use crate::error::{Ps2RfpError, Result};
use crate::rules::Rules;

fn case_insensitive(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| Ps2RfpError::Config(format!("bad filename rule: {}", e)))
}

/// Derive the output file name stem from the input stem.
fn output_stem(stem: &str, rules: &Rules) -> Result<String> {
    let from = regex::escape(&rules.name_from);
    let to = &rules.name_to;

    let dated_token = case_insensitive(&format!(r"^(\d{{6}})\s{}-(.*)$", from))?;
    if let Some(caps) = dated_token.captures(stem) {
        return Ok(format!("{} {}-{}", &caps[1], to, &caps[2]));
    }

    let already_tagged = case_insensitive(&format!("{}-", regex::escape(to)))?;
    let dated = case_insensitive(r"^(\d{6})\s?(.*)$")?;
    if !already_tagged.is_match(stem)
        && let Some(caps) = dated.captures(stem)
    {
        return Ok(format!("{} {}-{}", &caps[1], to, &caps[2]));
    }

    Ok(format!("{}_{}", stem, to))
}

/// Path of the sanitized copy: same directory and extension, renamed stem.
pub fn output_path(src: &Path, rules: &Rules) -> Result<PathBuf> {
    let stem = src
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Ps2RfpError::InvalidInput(format!("Bad file name: {}", src.display())))?;
    let mut name = output_stem(stem, rules)?;
    if let Some(ext) = src.extension().and_then(|e| e.to_str()) {
        name.push('.');
        name.push_str(ext);
    }
    Ok(src.with_file_name(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renamed(name: &str) -> String {
        output_path(Path::new(name), &Rules::default())
            .unwrap()
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn test_dated_ps_name_becomes_rfp() {
        assert_eq!(
            renamed("250826 PS-USA-2444 EGLINTON PJT-A.xlsm"),
            "250826 RFP-USA-2444 EGLINTON PJT-A.xlsm"
        );
        assert_eq!(renamed("250826 ps-Quote.xlsx"), "250826 RFP-Quote.xlsx");
    }

    #[test]
    fn test_dated_name_gets_token_after_date() {
        assert_eq!(renamed("250826 QUOTE.xlsx"), "250826 RFP-QUOTE.xlsx");
        assert_eq!(renamed("250826QUOTE.xlsx"), "250826 RFP-QUOTE.xlsx");
    }

    #[test]
    fn test_fallback_suffix() {
        assert_eq!(renamed("Quote.xlsx"), "Quote_RFP.xlsx");
        assert_eq!(renamed("250826 RFP-Quote.xlsx"), "250826 RFP-Quote_RFP.xlsx");
    }

    #[test]
    fn test_keeps_directory() {
        let out = output_path(Path::new("jobs/2444/250826 PS-A.xlsx"), &Rules::default()).unwrap();
        assert_eq!(out, Path::new("jobs/2444/250826 RFP-A.xlsx"));
    }

    #[test]
    fn test_custom_tokens() {
        let rules = Rules {
            name_from: "PS".to_string(),
            name_to: "RFQ".to_string(),
            ..Rules::default()
        };
        let out = output_path(Path::new("250826 PS-A.xlsx"), &rules).unwrap();
        assert_eq!(out, Path::new("250826 RFQ-A.xlsx"));
    }
}
