/*
 * directive.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Scanner for `//@append` and `//@prepend` comment directives.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// `//@append`, `// @prepros-prepend`, `//@codekit-append`, ...
static DIRECTIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"//\s*@(?:prepros-|codekit-)?(append|prepend)")
        .expect("directive pattern is valid")
});

/// `//# sourceMappingURL=` and the older `//@ sourceMappingURL=`
static MAP_REFERENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"//\s*[@#]\s*sourceMappingURL=").expect("map reference pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    Append,
    Prepend,
}

/// One include target named by a directive line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub kind: DirectiveKind,
    /// The include spec as written, minus quotes and semicolons
    pub target: String,
    /// 1-based line of the directive
    pub line: usize,
}

/// Scan source text for directives.
///
/// A line naming several targets yields one directive per target, left to
/// right. Lines are visited top to bottom.
pub fn scan_directives(code: &str) -> Vec<Directive> {
    let mut directives = Vec::new();
    for (index, line) in code.split('\n').enumerate() {
        let Some(captures) = DIRECTIVE_RE.captures(line) else {
            continue;
        };
        let Some(keyword) = captures.get(1) else {
            continue;
        };
        let kind = match keyword.as_str() {
            "append" => DirectiveKind::Append,
            _ => DirectiveKind::Prepend,
        };
        directives.extend(parse_targets(&line[keyword.end()..]).into_iter().map(|target| Directive {
            kind,
            target,
            line: index + 1,
        }));
    }
    directives
}

/// Whether the line carries a directive and must be left out of the output
pub fn is_directive_line(line: &str) -> bool {
    DIRECTIVE_RE.is_match(line)
}

/// Whether the line is a source map reference comment
pub fn is_map_reference_line(line: &str) -> bool {
    MAP_REFERENCE_RE.is_match(line)
}

fn parse_targets(remainder: &str) -> Vec<String> {
    let cleaned: String = remainder
        .chars()
        .filter(|c| !matches!(c, '\'' | '"' | ';'))
        .collect();

    cleaned
        .split(',')
        .map(|entry| strip_quiet(entry.trim()).to_string())
        .filter(|entry| !entry.is_empty())
        .collect()
}

// CodeKit allows `quiet` next to a target to silence its own warnings
fn strip_quiet(entry: &str) -> &str {
    if entry == "quiet" {
        return "";
    }
    let entry = entry.strip_prefix("quiet ").unwrap_or(entry);
    entry.strip_suffix(" quiet").unwrap_or(entry).trim()
}
