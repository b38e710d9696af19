//! Route identifier normalization and borough classification.
//!
//! Raw route codes arrive decorated with agency prefixes, inconsistent casing
//! and zero padding. [`normalize_route_id`] turns them into the canonical id
//! used as a grouping key; [`classify_route`] and [`classify_agency`] map a
//! vehicle onto a borough or service category with a display colour.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::LazyLock;

/// Letter prefix followed by a run of zeros and at least one more digit.
static LEADING_ZEROS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]+)0+(\d)").expect("static regex"));

/// Canonicalizes a raw route code.
///
/// Rules run in a fixed order; later rules assume the earlier ones ran:
///
/// 1. keep only the text after the last `_` (drops `MTA NYCT_` and friends)
/// 2. a value equal to the `route_id` header is rejected
/// 3. a trailing `+` becomes `-SBS`
/// 4. an uppercase `BX` prefix becomes `Bx`
/// 5. zeros between the letter prefix and the number are collapsed
///
/// Returns `None` when nothing usable is left.
pub fn normalize_route_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let stripped = match trimmed.rfind('_') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    };

    if stripped.is_empty() || stripped == "route_id" {
        return None;
    }

    let mut route = match stripped.strip_suffix('+') {
        Some(base) => format!("{base}-SBS"),
        None => stripped.to_string(),
    };

    if let Some(rest) = route.strip_prefix("BX") {
        route = format!("Bx{rest}");
    }

    Some(LEADING_ZEROS.replace(&route, "${1}${2}").into_owned())
}

/// Borough or service category a bus is shown under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Borough {
    Manhattan,
    Bronx,
    Queens,
    Brooklyn,
    #[serde(rename = "Staten Island")]
    StatenIsland,
    Express,
    Unknown,
}

impl Borough {
    pub fn name(self) -> &'static str {
        match self {
            Borough::Manhattan => "Manhattan",
            Borough::Bronx => "Bronx",
            Borough::Queens => "Queens",
            Borough::Brooklyn => "Brooklyn",
            Borough::StatenIsland => "Staten Island",
            Borough::Express => "Express",
            Borough::Unknown => "Unknown",
        }
    }

    /// Display colour: a blue gradient across boroughs, purple for express.
    pub fn color(self) -> &'static str {
        match self {
            Borough::Manhattan => "#1e40af",
            Borough::Bronx => "#2563eb",
            Borough::Queens => "#3b82f6",
            Borough::Brooklyn => "#60a5fa",
            Borough::StatenIsland => "#93c5fd",
            Borough::Express => "#8b5cf6",
            Borough::Unknown => "#6b7280",
        }
    }
}

impl std::fmt::Display for Borough {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Express prefixes, checked in order before any borough prefix.
static EXPRESS_PREFIXES: &[&str] = &["BXM", "QM", "BM", "SIM", "X"];

/// Single-letter local route prefixes.
static LOCAL_PREFIXES: &[(char, Borough)] = &[
    ('M', Borough::Manhattan),
    ('B', Borough::Brooklyn),
    ('Q', Borough::Queens),
    ('S', Borough::StatenIsland),
];

/// Agency codes found before the first `_` of a vehicle reference.
static AGENCY_BOROUGHS: &[(&str, Borough)] = &[
    ("MTA NYCT", Borough::Manhattan),
    ("MTABC", Borough::Bronx),
    ("MTA QVC", Borough::Queens),
    ("MTA BRKLM", Borough::Brooklyn),
    ("MTA SI", Borough::StatenIsland),
];

/// Classifies a published route code. Total: every input yields a borough.
///
/// Express markers win over `BX`, and `BX` wins over the single-letter table
/// so `Bx12` is not read as Brooklyn.
pub fn classify_route(route: &str) -> Borough {
    if route.is_empty() {
        return Borough::Unknown;
    }

    let upper = route.to_uppercase();

    if EXPRESS_PREFIXES.iter().any(|p| upper.starts_with(p)) {
        return Borough::Express;
    }

    if upper.starts_with("BX") {
        return Borough::Bronx;
    }

    upper
        .chars()
        .next()
        .and_then(|first| {
            LOCAL_PREFIXES
                .iter()
                .find(|(prefix, _)| *prefix == first)
                .map(|(_, borough)| *borough)
        })
        .unwrap_or(Borough::Unknown)
}

/// Classifies a vehicle by the operating agency encoded in its reference,
/// e.g. `MTABC_6032` is Bronx. Unrecognised or missing agencies are `Unknown`.
///
/// This disagrees with [`classify_route`] for express buses and for any
/// depot that runs routes outside its home borough.
pub fn classify_agency(vehicle_ref: &str) -> Borough {
    let agency = vehicle_ref.split('_').next().unwrap_or_default();
    AGENCY_BOROUGHS
        .iter()
        .find(|(code, _)| *code == agency)
        .map(|(_, borough)| *borough)
        .unwrap_or(Borough::Unknown)
}

/// Which classification strategy the live feed applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classifier {
    /// Classify by the published line name.
    #[default]
    Route,
    /// Classify by the agency prefix of the vehicle reference.
    Agency,
}

impl Classifier {
    pub fn classify(self, route: &str, vehicle_ref: &str) -> Borough {
        match self {
            Classifier::Route => classify_route(route),
            Classifier::Agency => classify_agency(vehicle_ref),
        }
    }
}

impl FromStr for Classifier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "route" => Ok(Classifier::Route),
            "agency" => Ok(Classifier::Agency),
            other => Err(format!("unknown classifier '{other}', expected 'route' or 'agency'")),
        }
    }
}
