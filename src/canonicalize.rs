//! Canonicalization of noisy ledger descriptions.
//!
//! Free-text descriptions ("Pagto NF.1234- Acme Ltda - ME 03/2021") are
//! rewritten into a canonical form ("PAGTO - ACME LTDA") by a fixed, ordered
//! list of [`CanonicalizationRule`]s. Each rule sees the whole string as left
//! by the previous one.
//!
//! | # | Rule | Example |
//! |---|------|---------|
//! | 1 | `uppercase` | `acme` → `ACME` |
//! | 2 | `line-breaks` | `A<br>B` → `A B` |
//! | 3 | `whitespace` | `A \t B` → `A B` |
//! | 4 | `numeric-suffix` | `ACME 12345678901`, `ACME 03/2021` → `ACME` |
//! | 5 | `edge-slashes` | ` /ACME`, `ACME/ ` → `ACME` |
//! | 6 | `inline-separators` | `GOOGLE,LLC`, `ACME S/A` → `GOOGLE LLC`, `ACME S A` |
//! | 7 | `hyphens` | `ENTER-NAME` → `ENTER - NAME` |
//! | 8 | `reference-codes` | `NF.1234 ACME`, `RPS: 12 ACME` → `ACME` |
//! | 9 | `legal:*` | `LTDA.-ME`, `B.V.`, `Z O.O.`, `S/A` → `LTDA`, `B.V`, `Z.O.O`, `S.A` |
//! | 10 | `small-entity-qualifiers` | `ACME - EPP`, `ACME - SMALLCO2` → `ACME` |
//! | 11 | `trim` | collapse whitespace, trim ends |
//!
//! Separator rules (5, 6) must run before the legal abbreviations: `S/A` only
//! becomes `S.A` once the slash has been turned into a space.
//!
//! The list is applied repeatedly until the text stops changing, which makes
//! [`canonicalize`] idempotent: `canonicalize(canonicalize(s)) == canonicalize(s)`.
//!
//! ```
//! use orgtract::canonicalize;
//!
//! assert_eq!(canonicalize("acme ltd- smallco"), "ACME LTD");
//! assert_eq!(canonicalize("Google,LLC"), "GOOGLE LLC");
//! assert_eq!(canonicalize(""), "");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

/// Upper bound on full pipeline passes before giving up on a fixed point.
const MAX_PASSES: usize = 32;

/// Qualifiers marking micro and small businesses.
const SMALL_ENTITY: &str = "ME|EM|EPP|MEI|SMALLCO|MICROCO";

// Static regex patterns - compiled once, reused forever
static LINE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<BR\s*/?>").expect("valid regex"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

// Trailing CPF/CNPJ-like runs (bare or formatted) and month/year dates,
// however many are chained at the very end.
static NUMERIC_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:\s*\b(?:\d{11,}|\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2}|\d{3}\.\d{3}\.\d{3}-\d{2}|\d{1,2}[/\\]\d{2,4}))+\s*$",
    )
    .expect("valid regex")
});

// GOOGLE,LLC -> GOOGLE LLC
static INLINE_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([\w.])[/\\,;]+").expect("valid regex"));

static REFERENCE_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:NF\.?\s?\d+-?|NF\.|RPS:?\s?\d+-?|INVOICE\s?(?:NO\.?\s?|#\s?)?\d+-?|VOUCHER\s?#?\s?\d+-?)",
    )
    .expect("valid regex")
});

static LTDA_GLUED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bLTDA(?:ME|EM|EPP|MEI)\b").expect("valid regex"));

static LIMITED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b(LTDA|LTD)\b\.?(?:\s?[.\-|]?\s*(?:{})\d*\b)?",
        SMALL_ENTITY
    ))
    .expect("valid regex")
});

static ZOO: Lazy<Regex> = Lazy::new(|| three_letter("Z", "O", "O"));
static SPA: Lazy<Regex> = Lazy::new(|| three_letter("S", "P", "A"));
static SRO: Lazy<Regex> = Lazy::new(|| three_letter("S", "R", "O"));
static SAC: Lazy<Regex> = Lazy::new(|| three_letter("S", "A", "C"));
static SAS: Lazy<Regex> = Lazy::new(|| three_letter("S", "A", "S"));
static SAU: Lazy<Regex> = Lazy::new(|| three_letter("S", "A", "U"));
static SRL: Lazy<Regex> = Lazy::new(|| three_letter("S", "R", "L"));

static BV: Lazy<Regex> = Lazy::new(|| two_letter("B", "V"));
static UA: Lazy<Regex> = Lazy::new(|| two_letter("U", "A"));
static AS: Lazy<Regex> = Lazy::new(|| two_letter("A", "S"));
static NV: Lazy<Regex> = Lazy::new(|| two_letter("N", "V"));

// S.A / S/A / S A / SA / S.A.C. ; the whitespace bounds are checked by hand.
static SA_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"S\.?[/\\]?\s?A\.?(?:C\.)?").expect("valid regex"));

static SMALL_ENTITY_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?:\s*-\s*(?:{})(?:\s*\d+)*)+\s*$",
        SMALL_ENTITY
    ))
    .expect("valid regex")
});

fn three_letter(a: &str, b: &str, c: &str) -> Regex {
    Regex::new(&format!(r"\b{}[.\s]+{}[.\s]+{}\.?[/\\]?(\s|$)", a, b, c)).expect("valid regex")
}

fn two_letter(a: &str, b: &str) -> Regex {
    Regex::new(&format!(r"\b{}\.{}\.?(\s|$)", a, b)).expect("valid regex")
}

/// How a rule rewrites text.
#[derive(Clone, Copy)]
enum Rewrite {
    /// `replace_all` with a static pattern.
    Pattern(&'static Lazy<Regex>, &'static str),
    /// Arbitrary pure function.
    Func(fn(&str) -> String),
}

/// One step of the canonicalization pipeline.
#[derive(Clone, Copy)]
pub struct CanonicalizationRule {
    name: &'static str,
    rewrite: Rewrite,
}

impl CanonicalizationRule {
    fn pattern(name: &'static str, re: &'static Lazy<Regex>, with: &'static str) -> Self {
        Self {
            name,
            rewrite: Rewrite::Pattern(re, with),
        }
    }

    fn func(name: &'static str, f: fn(&str) -> String) -> Self {
        Self {
            name,
            rewrite: Rewrite::Func(f),
        }
    }

    /// Rule identifier, e.g. `legal:S.A`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Apply this rule to the whole string.
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        match self.rewrite {
            Rewrite::Pattern(re, with) => re.replace_all(text, with).into_owned(),
            Rewrite::Func(f) => f(text),
        }
    }
}

impl std::fmt::Debug for CanonicalizationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CanonicalizationRule").field(&self.name).finish()
    }
}

fn default_rules() -> Vec<CanonicalizationRule> {
    vec![
        CanonicalizationRule::func("uppercase", uppercase),
        CanonicalizationRule::pattern("line-breaks", &LINE_BREAK, " "),
        CanonicalizationRule::pattern("whitespace", &WHITESPACE, " "),
        CanonicalizationRule::pattern("numeric-suffix", &NUMERIC_SUFFIX, ""),
        CanonicalizationRule::func("edge-slashes", edge_slashes),
        CanonicalizationRule::pattern("inline-separators", &INLINE_SEPARATOR, "$1 "),
        CanonicalizationRule::func("hyphens", space_hyphens),
        CanonicalizationRule::pattern("reference-codes", &REFERENCE_CODE, ""),
        CanonicalizationRule::pattern("legal:LTDA-glued", &LTDA_GLUED, "LTDA"),
        CanonicalizationRule::pattern("legal:LTDA", &LIMITED, "$1 "),
        CanonicalizationRule::pattern("legal:Z.O.O", &ZOO, "Z.O.O$1"),
        CanonicalizationRule::pattern("legal:S.P.A", &SPA, "S.P.A$1"),
        CanonicalizationRule::pattern("legal:S.R.O", &SRO, "S.R.O$1"),
        CanonicalizationRule::pattern("legal:S.A.C", &SAC, "S.A.C$1"),
        CanonicalizationRule::pattern("legal:S.A.S", &SAS, "S.A.S$1"),
        CanonicalizationRule::pattern("legal:S.A.U", &SAU, "S.A.U$1"),
        CanonicalizationRule::pattern("legal:S.R.L", &SRL, "S.R.L$1"),
        CanonicalizationRule::pattern("legal:B.V", &BV, "B.V$1"),
        CanonicalizationRule::pattern("legal:U.A", &UA, "U.A$1"),
        CanonicalizationRule::pattern("legal:A.S", &AS, "A.S$1"),
        CanonicalizationRule::pattern("legal:N.V", &NV, "N.V$1"),
        CanonicalizationRule::func("legal:S.A", normalize_sa),
        CanonicalizationRule::pattern("small-entity-qualifiers", &SMALL_ENTITY_SUFFIX, ""),
        CanonicalizationRule::func("trim", collapse_and_trim),
    ]
}

/// Canonical legal-entity abbreviations produced by the pipeline.
pub const LEGAL_ABBREVIATIONS: &[&str] = &[
    "LTDA", "LTD", "Z.O.O", "S.P.A", "S.R.O", "S.A.C", "S.A.S", "S.A.U", "S.R.L", "B.V", "U.A",
    "A.S", "N.V", "S.A",
];

/// Ordered rewrite pipeline turning free text into its canonical form.
#[derive(Debug, Clone)]
pub struct TextCanonicalizer {
    rules: Vec<CanonicalizationRule>,
}

impl Default for TextCanonicalizer {
    fn default() -> Self {
        Self {
            rules: default_rules(),
        }
    }
}

impl TextCanonicalizer {
    /// Create the default pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules in application order.
    #[must_use]
    pub fn rules(&self) -> &[CanonicalizationRule] {
        &self.rules
    }

    /// Apply every rule once, left to right.
    #[must_use]
    pub fn apply_once(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, rule| rule.apply(&acc))
    }

    /// Canonicalize `text`, re-applying the pipeline until it is stable.
    #[must_use]
    pub fn canonicalize(&self, text: &str) -> String {
        let mut current = self.apply_once(text);
        for _ in 1..MAX_PASSES {
            let next = self.apply_once(&current);
            if next == current {
                return current;
            }
            current = next;
        }
        log::warn!("Canonical form of '{}' did not settle in {} passes", text, MAX_PASSES);
        current
    }

    /// Canonicalize possibly absent text; absent yields an empty string.
    #[must_use]
    pub fn canonicalize_opt(&self, text: Option<&str>) -> String {
        text.map(|t| self.canonicalize(t)).unwrap_or_default()
    }
}

static DEFAULT: Lazy<TextCanonicalizer> = Lazy::new(TextCanonicalizer::new);

/// Canonicalize `text` with the default pipeline.
#[must_use]
pub fn canonicalize(text: &str) -> String {
    DEFAULT.canonicalize(text)
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

// Characters that may sit next to a separator being normalized.
fn is_joinable(c: char) -> bool {
    is_word(c) || c.is_whitespace() || c == '.' || c == ','
}

fn uppercase(text: &str) -> String {
    text.to_uppercase()
}

/// ` /NAME` and `NAME/ `: a slash touching whitespace (or a string edge) on
/// one side and name text on the other becomes a space.
fn edge_slashes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == '/' || c == '\\' {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let opens = prev.map_or(true, char::is_whitespace) && next.is_some_and(is_joinable);
            let closes = prev.is_some_and(is_joinable) && next.map_or(true, char::is_whitespace);
            if opens || closes {
                out.push(' ');
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// `ENTER-NAME` → `ENTER - NAME`, only when both neighbours are name text.
fn space_hyphens(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);
    for (i, &c) in chars.iter().enumerate() {
        if c == '-' {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            if prev.is_some_and(is_joinable) && next.is_some_and(is_joinable) {
                out.push_str(" - ");
                continue;
            }
        }
        out.push(c);
    }
    WHITESPACE.replace_all(&out, " ").into_owned()
}

fn normalize_sa(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in SA_TOKEN.find_iter(text) {
        let before = text[..m.start()].chars().next_back();
        let after = text[m.end()..].chars().next();
        if before.is_some_and(char::is_whitespace) && after.map_or(true, char::is_whitespace) {
            out.push_str(&text[last..m.start()]);
            out.push_str("S.A");
            last = m.end();
        }
    }
    out.push_str(&text[last..]);
    out
}

fn collapse_and_trim(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
