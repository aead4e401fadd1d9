//! Syntax-pattern scoring to decide which interpreter gets a buffer.

use once_cell::sync::Lazy;
use regex::Regex;

use super::Language;

static JS_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"function\s+\w+\s*\(",
        r"const\s+\w+\s*=",
        r"let\s+\w+\s*=",
        r"var\s+\w+\s*=",
        r"console\.log\s*\(",
        r"=>\s*[\{\w]",
        r"class\s+\w+\s*\{",
        r"\.\w+\s*\(",
        r"document\.",
        r"window\.",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static PYTHON_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"def\s+\w+\s*\(",
        r"import\s+\w+",
        r"from\s+\w+\s+import",
        r#"if\s+__name__\s*==\s*["']__main__["']"#,
        r"print\s*\(",
        r"class\s+\w+\s*:",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

fn score(code: &str, patterns: &[Regex]) -> usize {
    patterns.iter().filter(|p| p.is_match(code)).count()
}

/// Guess the language of `code` by counting distinctive syntax patterns on
/// each side. JavaScript wins only on a strictly higher positive score;
/// everything else, including ambiguous or empty input, defaults to Python.
pub fn detect_language(code: &str) -> Language {
    let js = score(code, &JS_PATTERNS);
    let py = score(code, &PYTHON_PATTERNS);
    if js > py && js > 0 {
        Language::JavaScript
    } else {
        Language::Python
    }
}
