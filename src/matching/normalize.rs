// src/matching/normalize.rs - Name canonicalization shared by indexing and ranking
use once_cell::sync::Lazy;
use regex::Regex;

/// Whitespace, hyphens, middle dots, periods, commas, parentheses and brackets,
/// in both half-width and full-width forms.
static SEPARATOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\s\-－・･·．.。｡、､,，（）()「」｢｣【】\[\]［］]+")
        .expect("separator pattern is a valid regex")
});

/// Legal-entity-form tokens removed wherever they occur. Longer forms come first so
/// alternation prefers them over their abbreviations.
static LEGAL_FORM_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        "(株式会社|有限会社|合同会社|合資会社|合名会社|",
        "incorporated|corporation|limited|coltd|ltd|inc|llc|",
        "㈱|㈲|株|有)"
    ))
    .expect("legal form pattern is a valid regex")
});

static STORE_LEGAL_FORM_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(株\)|株式会社|（株）|有限会社|\(有\)|（有）")
        .expect("store legal form pattern is a valid regex")
});

static STORE_NOISE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s\-\d]+").expect("store noise pattern is a valid regex"));

/// Store and branch markers, checked in this order. The name is cut at the first one found.
const STORE_KEYWORDS: [&str; 9] = [
    "店",
    "支店",
    "営業所",
    "センター",
    "パーキング",
    "駐車場",
    "ショップ",
    "マート",
    "ストア",
];

/// Full-width Latin letters and digits to their half-width forms.
fn fold_full_width(c: char) -> char {
    match c {
        'Ａ'..='Ｚ' | 'ａ'..='ｚ' | '０'..='９' => {
            char::from_u32(c as u32 - 0xFEE0).unwrap_or(c)
        }
        _ => c,
    }
}

/// Canonicalize a raw name for comparison. Total and idempotent; empty input yields "".
pub fn normalize(text: &str) -> String {
    let folded: String = text.chars().map(fold_full_width).collect();
    let lowered = folded.to_lowercase();
    let mut normalized = SEPARATOR_REGEX.replace_all(&lowered, "").into_owned();

    // Removing a token can join neighbours into a new token ("i株nc"), so strip to a fixed point.
    while LEGAL_FORM_REGEX.is_match(&normalized) {
        normalized = LEGAL_FORM_REGEX.replace_all(&normalized, "").into_owned();
    }
    normalized
}

/// Derive a short lookup key from a store or branch name, e.g. "トイザラス熊本店" -> "トイザラス熊本".
/// Used as a fallback key by table-driven name resolution.
pub fn clean_search_name(text: &str) -> String {
    let without_legal = STORE_LEGAL_FORM_REGEX.replace_all(text, "");
    let mut name = STORE_NOISE_REGEX
        .replace_all(&without_legal, "")
        .into_owned();

    for keyword in STORE_KEYWORDS {
        if let Some(pos) = name.find(keyword) {
            name.truncate(pos);
            break;
        }
    }
    name.trim().to_string()
}
