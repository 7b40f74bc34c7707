/// A tracked clan: display name plus its external tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClanRef {
    pub name: String,
    pub tag: String,
}

impl ClanRef {
    pub fn new(name: impl Into<String>, tag: &str) -> Self {
        Self {
            name: name.into(),
            tag: normalize_tag(tag),
        }
    }
}

/// Canonical form of a clan or war tag: trimmed, upper-case, `#`-prefixed,
/// with the letter `O` folded into the digit `0` (the game never issues `O`).
pub fn normalize_tag(raw: &str) -> String {
    let trimmed = raw.trim();
    let body = trimmed.strip_prefix('#').unwrap_or(trimmed);
    let mut tag = String::with_capacity(body.len() + 1);
    tag.push('#');
    for ch in body.chars() {
        match ch.to_ascii_uppercase() {
            'O' => tag.push('0'),
            other => tag.push(other),
        }
    }
    tag
}

/// Whether two tags name the same clan once normalized.
pub fn same_tag(a: &str, b: &str) -> bool {
    normalize_tag(a) == normalize_tag(b)
}
