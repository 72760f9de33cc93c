//! Content classification for stored snippets.
//!
//! Detects whether copied text is a link or looks like source code so the
//! shell can pick a rendering. Code detection is a scoring heuristic: a pile
//! of weak signals (keywords, operators, indentation, special-character
//! density) summed against a threshold. Short prose scores near zero; even a
//! few lines of real code clear the bar easily.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::interface::ContentKind;

/// Minimum score for text to classify as code.
const CODE_SCORE_THRESHOLD: u32 = 6;

/// Anything shorter than this is never code.
const MIN_CODE_LEN: usize = 10;

/// Weak code signals, one point each.
static CODE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Language keywords common across mainstream languages
        r"\b(function|class|const|let|var|if|else|for|while|return|import|export|require|def|public|private|static|void|int|string|boolean|true|false|null|undefined)\b",
        // Function syntax: arrows, anonymous functions, Python defs
        r"\([^)]*\)\s*=>",
        r"function\s*\(",
        r"def\s+\w+\s*\(",
        // Object / array literals
        r"\{[^}]*\}",
        r"\[[^\]]*\]",
        // Comparison and compound-assignment operators
        r"[=!<>]==",
        r"[+\-*/%]=",
        // Quoted string literals
        r#"["'`][^"'`]*["'`]"#,
        // Line and block comments
        r"(?m)//.*$",
        r"(?s)/\*.*?\*/",
        r"(?m)#.*$",
        // Markup tags
        r"<[^>]+>",
        // CSS-style selectors
        r"[.#][a-zA-Z][a-zA-Z0-9_-]*",
        // Module import/export forms
        r"import\s+.*\s+from",
        r"export\s+(default|\{)",
        r#"from\s+['"`]"#,
        // Console, DOM, collection and string method calls
        r"console\.(log|warn|error|info)",
        r"\.(getElementById|querySelector|addEventListener|setAttribute)",
        r"\.(map|filter|reduce|forEach|find|some|every)",
        r"\.(split|join|replace|substring|toLowerCase|toUpperCase)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static code pattern must compile"))
    .collect()
});

/// Source-file extensions appearing in paths.
static SOURCE_FILE_EXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.(js|ts|jsx|tsx|html|css|scss|less|py|java|cpp|c|php|rb|go|rs|swift|kt|dart)\b")
        .expect("static extension pattern must compile")
});

static OPERATOR_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[+\-*/%=<>!&|]").expect("static operator pattern must compile"));

static SPECIAL_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[{}()\[\];=<>+\-*/%&|!:]").expect("static special pattern must compile"));

/// Score `text` against the code signals and compare to the threshold.
pub fn looks_like_code(text: &str) -> bool {
    if text.len() < MIN_CODE_LEN {
        return false;
    }

    let mut score = CODE_PATTERNS.iter().filter(|p| p.is_match(text)).count() as u32;

    // Structural signals
    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() > 1 {
        score += 2;
    }
    if lines
        .iter()
        .any(|line| line.starts_with("    ") || line.starts_with('\t'))
    {
        score += 3;
    }
    if text.contains('{') && text.contains('}') {
        score += 2;
    }
    if text.contains('(') && text.contains(')') {
        score += 1;
    }
    if text.contains(';') {
        score += 2;
    }
    if OPERATOR_CHARS.is_match(text) {
        score += 1;
    }
    if text.contains(':') {
        score += 1;
    }
    if text.contains('=') {
        score += 1;
    }

    // Code carries a much higher density of punctuation than prose.
    let special = SPECIAL_CHARS.find_iter(text).count();
    if special as f64 / text.len() as f64 > 0.05 {
        score += 3;
    }

    // Strong constructs
    if text.contains("if (") || text.contains("if(") {
        score += 2;
    }
    if text.contains("for (") || text.contains("for(") {
        score += 2;
    }
    if text.contains("while (") || text.contains("while(") {
        score += 2;
    }
    if text.contains("function ") || text.contains("def ") {
        score += 3;
    }
    if text.contains("class ") {
        score += 3;
    }
    if text.contains("return ") {
        score += 2;
    }
    if SOURCE_FILE_EXT.is_match(text) {
        score += 2;
    }

    score >= CODE_SCORE_THRESHOLD
}

/// Check if a string is a single-line URL.
pub fn is_url(text: &str) -> bool {
    let trimmed = text.trim();

    if trimmed.len() > 2000 || trimmed.contains('\n') {
        return false;
    }

    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return url::Url::parse(trimmed).is_ok();
    }

    if trimmed.starts_with("www.") {
        return url::Url::parse(&format!("https://{}", trimmed)).is_ok();
    }

    false
}

/// Classify clipboard text. Links win over code so a long URL full of
/// punctuation is not misfiled.
pub fn detect_kind(text: &str) -> ContentKind {
    if is_url(text) {
        return ContentKind::Link;
    }
    if looks_like_code(text) {
        return ContentKind::Code;
    }
    ContentKind::Text
}
