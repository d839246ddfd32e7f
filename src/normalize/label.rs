//! Canonical economic-variable labels and the classifier that maps messy
//! Polish/English free-text labels onto them.

/// The closed vocabulary the normalizer maps onto. Anything that cannot be
/// classified is dropped, not mapped to an "unknown" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CanonicalLabel {
    Gdp,
    Unemployment,
    Inflation,
    InterestRate,
    Deficit,
    PublicDebt,
    Fx,
    Wages,
}

impl CanonicalLabel {
    pub const ALL: [CanonicalLabel; 8] = [
        CanonicalLabel::Gdp,
        CanonicalLabel::Unemployment,
        CanonicalLabel::Inflation,
        CanonicalLabel::InterestRate,
        CanonicalLabel::Deficit,
        CanonicalLabel::PublicDebt,
        CanonicalLabel::Fx,
        CanonicalLabel::Wages,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalLabel::Gdp => "gdp",
            CanonicalLabel::Unemployment => "unemployment",
            CanonicalLabel::Inflation => "inflation",
            CanonicalLabel::InterestRate => "interest_rate",
            CanonicalLabel::Deficit => "deficit",
            CanonicalLabel::PublicDebt => "public_debt",
            CanonicalLabel::Fx => "fx",
            CanonicalLabel::Wages => "wages",
        }
    }

    /// Exact match against the canonical names themselves.
    pub fn from_canonical(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|l| l.as_str() == s)
    }
}

/// Ordered rule table, evaluated top-to-bottom with first-match-wins.
/// Ordering is load-bearing: several rules share substrings (e.g. "stopa"
/// appears in both unemployment and interest-rate phrasings), so this must
/// stay a sequence, not a map.
const RULES: &[(fn(&str) -> bool, CanonicalLabel)] = &[
    (
        |v: &str| v.contains("pkb") || v.contains("gdp"),
        CanonicalLabel::Gdp,
    ),
    (
        |v: &str| v.contains("bezroboc") || v.contains("unemployment"),
        CanonicalLabel::Unemployment,
    ),
    (
        |v: &str| v.contains("inflac") || v.contains("hicp"),
        CanonicalLabel::Inflation,
    ),
    // binds as (stopa AND procent) OR interest
    (
        |v: &str| (v.contains("stopa") && v.contains("procent")) || v.contains("interest"),
        CanonicalLabel::InterestRate,
    ),
    (
        |v: &str| {
            v.contains("deficyt") || v.contains("budget balance") || v.contains("deficit")
        },
        CanonicalLabel::Deficit,
    ),
    (
        |v: &str| {
            v.contains("dług")
                || v.contains("public debt")
                || (v.contains("debt") && v.contains("public"))
        },
        CanonicalLabel::PublicDebt,
    ),
    (
        |v: &str| v.contains("kurs") || v.contains("fx") || v.contains("exchange rate"),
        CanonicalLabel::Fx,
    ),
    (
        |v: &str| v.contains("płac") || v.contains("wyna") || v.contains("wages"),
        CanonicalLabel::Wages,
    ),
];

/// Map a messy variable label to a canonical one, or `None` to drop it.
///
/// Matching is case-insensitive and substring-based over the trimmed input.
/// An already-canonical name always maps to itself, so cleaning is
/// idempotent ("inflation" matches no substring rule and would otherwise be
/// dropped on a second pass).
pub fn normalize_label(raw: &str) -> Option<CanonicalLabel> {
    let v = raw.trim().to_lowercase();
    if v.is_empty() {
        return None;
    }
    if let Some(label) = CanonicalLabel::from_canonical(&v) {
        return Some(label);
    }
    RULES
        .iter()
        .find(|(matches, _)| matches(&v))
        .map(|&(_, label)| label)
}
