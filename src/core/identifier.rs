use serde::{Deserialize, Serialize};

/// Shape the raw identifier was recognized as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
    /// National Drug Code, canonicalized to 5-4-2
    Ndc,
    /// 14-digit GTIN with an embedded NDC
    Gtin,
    /// Neither shape recognized; raw text preserved, treated as low confidence
    Unknown,
}

/// A product identifier normalized for comparison.
///
/// Two shapes are recognized: a 14-digit GTIN and a hyphenated or 11-digit
/// NDC. Everything else is `Unknown` and compared by cleaned text only.
///
/// GTIN conversion is positional: the leading indicator digit and trailing
/// check digit are dropped, then the GS1 zero pad, and the remaining 11
/// digits are re-segmented as 5-4-2. Check digits are not validated and
/// labeler-code length variability (4-5-2, 3-4-5) is not modeled; this is a
/// known approximation inherited from the upstream extraction pipeline, kept
/// rather than replaced with stricter validation that could reject
/// legitimate codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalIdentifier {
    /// Original input, unchanged
    pub raw: String,

    pub kind: IdentifierKind,

    /// Canonical 11-digit NDC in 5-4-2 form, when recognized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ndc: Option<String>,
}

impl CanonicalIdentifier {
    /// Normalize a raw identifier. Pure, never fails: unrecognized input
    /// comes back as `Unknown` with the raw text preserved.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();

        // Hyphenated NDC groupings first: 5-4-2, 5-3-2, 4-4-2
        if let Some(ndc) = parse_hyphenated_ndc(trimmed) {
            return Self {
                raw: raw.to_string(),
                kind: IdentifierKind::Ndc,
                ndc: Some(ndc),
            };
        }

        let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
        let has_other = trimmed
            .chars()
            .any(|c| !c.is_ascii_digit() && !c.is_ascii_whitespace() && !is_punctuation(c));

        if !has_other {
            if digits.len() == 14 {
                if let Some(ndc) = ndc_from_gtin(&digits) {
                    return Self {
                        raw: raw.to_string(),
                        kind: IdentifierKind::Gtin,
                        ndc: Some(ndc),
                    };
                }
            }
            if digits.len() == 11 {
                return Self {
                    raw: raw.to_string(),
                    kind: IdentifierKind::Ndc,
                    ndc: Some(segment_ndc(&digits)),
                };
            }
            // A bare 10-digit string is ambiguous (4-4-2 vs 5-3-2 vs 5-4-1)
            // and falls through to Unknown rather than guessing a grouping.
        }

        Self {
            raw: raw.to_string(),
            kind: IdentifierKind::Unknown,
            ndc: None,
        }
    }

    /// Unparseable identifiers carry only a degraded comparison signal
    #[must_use]
    pub fn is_low_confidence(&self) -> bool {
        self.ndc.is_none()
    }

    /// The text form used for comparison and round-tripping: the canonical
    /// NDC when recognized, the raw text unchanged otherwise.
    #[must_use]
    pub fn canonical_text(&self) -> &str {
        self.ndc.as_deref().unwrap_or(&self.raw)
    }

    /// Whether two identifiers denote the same product after normalization.
    ///
    /// Recognized identifiers compare by canonical NDC, so a GTIN matches
    /// the NDC it embeds. Unknown identifiers compare by cleaned text,
    /// which lets internal SKUs still line up when both documents carry the
    /// same string.
    #[must_use]
    pub fn same_product(&self, other: &Self) -> bool {
        match (&self.ndc, &other.ndc) {
            (Some(a), Some(b)) => a == b,
            (None, None) => {
                let a = cleaned(&self.raw);
                let b = cleaned(&other.raw);
                !a.is_empty() && a == b
            }
            _ => false,
        }
    }
}

impl std::fmt::Display for CanonicalIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical_text())
    }
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
}

fn cleaned(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Parse a hyphen-grouped NDC (5-4-2, 5-3-2, or 4-4-2), zero-padding each
/// segment to the canonical 5-4-2.
fn parse_hyphenated_ndc(s: &str) -> Option<String> {
    let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    let groups: Vec<&str> = compact.split('-').collect();
    if groups.len() != 3 {
        return None;
    }
    if !groups.iter().all(|g| !g.is_empty() && g.chars().all(|c| c.is_ascii_digit())) {
        return None;
    }

    let (labeler, product, package) = (groups[0], groups[1], groups[2]);
    let shape = (labeler.len(), product.len(), package.len());
    if !matches!(shape, (5, 4, 2) | (5, 3, 2) | (4, 4, 2)) {
        return None;
    }

    Some(format!(
        "{:0>5}-{:0>4}-{:0>2}",
        labeler, product, package
    ))
}

/// Positional GTIN-14 to NDC conversion: drop the indicator digit and the
/// check digit, drop the GS1 zero pad, segment the remaining 11 as 5-4-2.
fn ndc_from_gtin(digits: &str) -> Option<String> {
    debug_assert_eq!(digits.len(), 14);
    let inner = &digits[1..13];
    let eleven = inner.strip_prefix('0')?;
    Some(segment_ndc(eleven))
}

fn segment_ndc(digits: &str) -> String {
    debug_assert_eq!(digits.len(), 11);
    format!("{}-{}-{}", &digits[..5], &digits[5..9], &digits[9..])
}
