use crate::types::Script;

/// Romaji spellings folded onto one representative per syllable. Entries that
/// map to themselves make the left-to-right scan consume `sh`/`ch`/`ts`
/// syllables whole, so `shu` is never rewritten through its `hu` suffix.
const ROMAJI_SYLLABLES: &[(&str, &str)] = &[
    ("sya", "sha"),
    ("syu", "shu"),
    ("syo", "sho"),
    ("tya", "cha"),
    ("tyu", "chu"),
    ("tyo", "cho"),
    ("zya", "ja"),
    ("zyu", "ju"),
    ("zyo", "jo"),
    ("jya", "ja"),
    ("jyu", "ju"),
    ("jyo", "jo"),
    ("shi", "shi"),
    ("sha", "sha"),
    ("shu", "shu"),
    ("sho", "sho"),
    ("chi", "chi"),
    ("cha", "cha"),
    ("chu", "chu"),
    ("cho", "cho"),
    ("tsu", "tsu"),
    ("si", "shi"),
    ("ti", "chi"),
    ("tu", "tsu"),
    ("hu", "fu"),
    ("zi", "ji"),
    ("di", "ji"),
    ("du", "zu"),
];

const PROLONGED_SOUND_MARK: char = '\u{30FC}';

/// Canonical comparison form of `raw`: width-folded, lowercased, punctuation
/// replaced by single spaces, plus script rules for `script`.
pub fn normalize_text(raw: &str, script: Script) -> String {
    let mut folded = String::with_capacity(raw.len());
    for c in raw.chars() {
        let c = fold_width(c);
        if c == '\'' || c == '\u{2019}' {
            continue;
        }
        if script == Script::Japanese {
            if c == PROLONGED_SOUND_MARK {
                continue;
            }
            folded.push(katakana_to_hiragana(c));
        } else {
            folded.push(c);
        }
    }

    let mut words: Vec<String> = Vec::new();
    let mut cur = String::new();
    for c in folded.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            cur.push(c);
        } else if !cur.is_empty() {
            words.push(std::mem::take(&mut cur));
        }
    }
    if !cur.is_empty() {
        words.push(cur);
    }

    if script == Script::Japanese {
        for word in &mut words {
            if word.bytes().all(|b| b.is_ascii_lowercase()) {
                *word = canonical_romaji(word);
            }
        }
    }

    words.join(" ")
}

/// Splits normalized text into comparison units: whitespace-separated words,
/// with every East Asian character standing as a unit of its own.
pub fn segment(normalized: &str) -> Vec<String> {
    let mut units = Vec::new();
    for word in normalized.split_whitespace() {
        let mut latin = String::new();
        for c in word.chars() {
            if is_east_asian_char(c) {
                if !latin.is_empty() {
                    units.push(std::mem::take(&mut latin));
                }
                units.push(c.to_string());
            } else {
                latin.push(c);
            }
        }
        if !latin.is_empty() {
            units.push(latin);
        }
    }
    units
}

pub fn normalize_units(raw: &str, script: Script) -> Vec<String> {
    segment(&normalize_text(raw, script))
}

fn fold_width(c: char) -> char {
    match c {
        '\u{3000}' => ' ',
        '\u{FF01}'..='\u{FF5E}' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
        _ => c,
    }
}

fn katakana_to_hiragana(c: char) -> char {
    match c {
        '\u{30A1}'..='\u{30F6}' => char::from_u32(c as u32 - 0x60).unwrap_or(c),
        _ => c,
    }
}

fn canonical_romaji(word: &str) -> String {
    let mut out = String::with_capacity(word.len() + 2);
    let mut rest = word;
    'scan: while !rest.is_empty() {
        for (from, to) in ROMAJI_SYLLABLES {
            if let Some(tail) = rest.strip_prefix(from) {
                out.push_str(to);
                rest = tail;
                continue 'scan;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }
    collapse_long_vowels(&out)
}

/// `ou`/`oo` fold to `o`, `uu` to `u`.
fn collapse_long_vowels(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut prev: Option<char> = None;
    for c in word.chars() {
        let long = matches!((prev, c), (Some('o'), 'u') | (Some('o'), 'o') | (Some('u'), 'u'));
        if long {
            // Consumed into the previous vowel; a third vowel starts fresh.
            prev = None;
            continue;
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

pub(crate) fn is_east_asian_char(ch: char) -> bool {
    let code = ch as u32;
    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        || (0x20000..=0x2A6DF).contains(&code)
        || (0xF900..=0xFAFF).contains(&code)
        || (0x3040..=0x309F).contains(&code) // Hiragana
        || (0x30A0..=0x30FF).contains(&code) // Katakana
        || (0xAC00..=0xD7AF).contains(&code) // Hangul syllables
        || (0x1100..=0x11FF).contains(&code) // Hangul Jamo
        || (0x3130..=0x318F).contains(&code) // Hangul Compatibility Jamo
}
