//! Specification records and the resolver that overlays a variant onto its
//! system's base record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::catalog::MetricKey;

/// Image shown when neither the variant nor the system has one.
pub const PLACEHOLDER_IMAGE: &str = "/images/system-placeholder.png";

/// A raw specification value as stored by the data layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpecValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Null,
}

impl SpecValue {
    /// JavaScript-style `Number(v)` coercion. `None` stands for `NaN`.
    pub fn to_number(&self) -> Option<f64> {
        let n = match self {
            SpecValue::Number(n) => *n,
            SpecValue::Bool(b) => f64::from(u8::from(*b)),
            SpecValue::Null => 0.0,
            SpecValue::Text(s) => parse_numeric_text(s)?,
        };
        (!n.is_nan()).then_some(n)
    }

    /// `true` for the boolean `true` and the string `"true"` only.
    pub fn is_truthy_flag(&self) -> bool {
        match self {
            SpecValue::Bool(b) => *b,
            SpecValue::Text(s) => s == "true",
            _ => false,
        }
    }
}

impl std::fmt::Display for SpecValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpecValue::Bool(b) => write!(f, "{b}"),
            SpecValue::Number(n) => write!(f, "{n}"),
            SpecValue::Text(s) => f.write_str(s),
            SpecValue::Null => f.write_str("null"),
        }
    }
}

impl From<f64> for SpecValue {
    fn from(n: f64) -> Self {
        SpecValue::Number(n)
    }
}

impl From<i64> for SpecValue {
    fn from(n: i64) -> Self {
        SpecValue::Number(n as f64)
    }
}

impl From<bool> for SpecValue {
    fn from(b: bool) -> Self {
        SpecValue::Bool(b)
    }
}

impl From<&str> for SpecValue {
    fn from(s: &str) -> Self {
        SpecValue::Text(s.to_string())
    }
}

/// Numeric text as `Number()` reads it: blank is zero, `Infinity` with an
/// optional sign, unsigned `0x`/`0b`/`0o` integers, or a decimal literal.
fn parse_numeric_text(s: &str) -> Option<f64> {
    let text = s.trim();
    if text.is_empty() {
        return Some(0.0);
    }

    let (sign, unsigned) = match text.as_bytes()[0] {
        b'-' => (-1.0, &text[1..]),
        b'+' => (1.0, &text[1..]),
        _ => (1.0, text),
    };
    if unsigned == "Infinity" {
        return Some(sign * f64::INFINITY);
    }

    let radix = match text.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0b" | "0B") => Some(2),
        Some("0o" | "0O") => Some(8),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &text[2..];
        if digits.is_empty() {
            return None;
        }
        return digits.chars().try_fold(0.0, |acc: f64, c| {
            c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
        });
    }

    // Rejects "inf", "nan" and friends that `f64::from_str` would accept.
    let decimal_only = unsigned
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !decimal_only || !unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    text.parse::<f64>().ok()
}

/// Whether a raw value counts as data: not missing, not null, not `""`.
pub fn is_present(value: Option<&SpecValue>) -> bool {
    match value {
        None | Some(SpecValue::Null) => false,
        Some(SpecValue::Text(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Open map from metric key to raw value.
///
/// Deserializes from any JSON object; keys outside the catalog are dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, SpecValue>")]
pub struct SpecificationRecord(BTreeMap<MetricKey, SpecValue>);

impl From<BTreeMap<String, SpecValue>> for SpecificationRecord {
    fn from(raw: BTreeMap<String, SpecValue>) -> Self {
        let mut fields = BTreeMap::new();
        for (name, value) in raw {
            match name.parse::<MetricKey>() {
                Ok(key) => {
                    fields.insert(key, value);
                }
                Err(_) => debug!(key = %name, "Ignoring specification field outside the catalog"),
            }
        }
        Self(fields)
    }
}

impl FromIterator<(MetricKey, SpecValue)> for SpecificationRecord {
    fn from_iter<I: IntoIterator<Item = (MetricKey, SpecValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl SpecificationRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: MetricKey) -> Option<&SpecValue> {
        self.0.get(&key)
    }

    pub fn insert(&mut self, key: MetricKey, value: impl Into<SpecValue>) {
        self.0.insert(key, value.into());
    }

    /// Builder-style insert.
    pub fn with(mut self, key: MetricKey, value: impl Into<SpecValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetricKey, &SpecValue)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The merged record used for display and comparison.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EffectiveSpecification(SpecificationRecord);

impl EffectiveSpecification {
    pub fn get(&self, key: MetricKey) -> Option<&SpecValue> {
        self.0.get(key)
    }

    pub fn record(&self) -> &SpecificationRecord {
        &self.0
    }
}

impl From<SpecificationRecord> for EffectiveSpecification {
    fn from(record: SpecificationRecord) -> Self {
        Self(record)
    }
}

/// Overlay `variant` onto `base`, key by key.
///
/// A variant value replaces the base value only when it is present; a
/// missing, null or empty variant field keeps whatever the base holds.
pub fn resolve(
    base: Option<&SpecificationRecord>,
    variant: Option<&SpecificationRecord>,
) -> EffectiveSpecification {
    let mut merged = base.cloned().unwrap_or_default();
    if let Some(overrides) = variant {
        for (key, value) in overrides.iter() {
            if is_present(Some(value)) {
                merged.insert(key, value.clone());
            }
        }
    }
    EffectiveSpecification(merged)
}

/// A revision or SKU of a system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantRecord {
    pub id: String,
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_year: Option<u16>,
    #[serde(default)]
    pub spec: SpecificationRecord,
    #[serde(default)]
    pub is_default: bool,
}

/// A hardware product line with its base record and variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemRecord {
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_year: Option<u16>,
    #[serde(default)]
    pub base_spec: SpecificationRecord,
    #[serde(default)]
    pub variants: Vec<VariantRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_variant_id: Option<String>,
}

impl SystemRecord {
    /// Find a variant by slug, falling back to its id.
    pub fn find_variant(&self, slug_or_id: &str) -> Option<&VariantRecord> {
        self.variants
            .iter()
            .find(|v| v.slug == slug_or_id)
            .or_else(|| self.variants.iter().find(|v| v.id == slug_or_id))
    }

    /// The variant flagged as default, either on the system or on the variant.
    pub fn default_variant(&self) -> Option<&VariantRecord> {
        self.default_variant_id
            .as_deref()
            .and_then(|id| self.variants.iter().find(|v| v.id == id))
            .or_else(|| self.variants.iter().find(|v| v.is_default))
    }

    /// Pick the active variant: the requested one, else the default, else
    /// the first listed. `None` for a base-only system.
    pub fn active_variant(&self, requested: Option<&str>) -> Option<&VariantRecord> {
        requested
            .and_then(|slug| self.find_variant(slug))
            .or_else(|| self.default_variant())
            .or_else(|| self.variants.first())
    }

    /// Effective specification for the given variant (or base-only).
    pub fn effective_spec(&self, variant: Option<&VariantRecord>) -> EffectiveSpecification {
        resolve(Some(&self.base_spec), variant.map(|v| &v.spec))
    }
}

/// Image and release year resolved for header chrome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedMedia {
    pub image: String,
    pub release_year: Option<u16>,
}

/// Prefer the variant's image and year, fall back to the system's, then to
/// the placeholder.
pub fn resolve_media(system: &SystemRecord, variant: Option<&VariantRecord>) -> ResolvedMedia {
    let image = variant
        .and_then(|v| v.image_url.as_deref())
        .filter(|url| !url.is_empty())
        .or_else(|| system.image_url.as_deref().filter(|url| !url.is_empty()))
        .unwrap_or(PLACEHOLDER_IMAGE)
        .to_string();
    let release_year = variant
        .and_then(|v| v.release_year)
        .or(system.release_year);
    ResolvedMedia {
        image,
        release_year,
    }
}
