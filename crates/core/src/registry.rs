//! The domain registry.
//!
//! Maps each registered hostname to its branding ([`BrandConfig`]) and its
//! landing page ([`DomainRoute`]). The registry is built once at startup and
//! never mutated afterwards; changing brands requires a restart.
//!
//! Brand and route live together in a single [`RegistryEntry`], so a domain key
//! can never have one without the other.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The domain that unmatched hosts fall back to.
pub const DEFAULT_DOMAIN: &str = "edgpt.ai";

/// Errors raised while building a [`DomainRegistry`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No entries were supplied.
    #[error("domain registry must contain at least one entry")]
    Empty,
    /// An entry had a blank domain key.
    #[error("domain key cannot be empty")]
    EmptyKey,
    /// Two entries normalise to the same domain key.
    #[error("duplicate domain key: {0}")]
    DuplicateKey(String),
    /// The designated default key is not registered.
    #[error("default domain {0} is not registered")]
    MissingDefault(String),
}

/// Landing page template for a vertical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandingTemplate {
    EdGpt,
    GptSites,
    LawFirmGpt,
    CpaFirm,
    TaxPrepGpt,
    BusinessBrokerGpt,
}

impl LandingTemplate {
    /// Template identifier used in logs and route listings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EdGpt => "edgpt_landing",
            Self::GptSites => "gptsites_landing",
            Self::LawFirmGpt => "lawfirmgpt_landing",
            Self::CpaFirm => "cpafirm_landing",
            Self::TaxPrepGpt => "taxprepgpt_landing",
            Self::BusinessBrokerGpt => "businessbrokergpt_landing",
        }
    }
}

impl fmt::Display for LandingTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Branding for one vertical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandConfig {
    /// Registered domain key, e.g. `lawfirmgpt.ai`.
    pub key: String,
    /// Display name, e.g. `LawFirmGPT`.
    pub name: String,
    /// Industry label, e.g. `Legal`.
    pub industry: String,
    /// Accent color as a hex string.
    pub color: String,
    /// Icon glyph.
    pub icon: String,
    /// Marketing headline.
    pub title: String,
    /// Marketing description.
    pub description: String,
}

impl BrandConfig {
    /// Lowercased display name, used for element IDs.
    #[must_use]
    pub fn name_lower(&self) -> String {
        self.name.to_lowercase()
    }

    /// Lowercased industry label, used in prose.
    #[must_use]
    pub fn industry_lower(&self) -> String {
        self.industry.to_lowercase()
    }
}

/// Landing page routing for one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainRoute {
    pub key: String,
    pub template: LandingTemplate,
}

/// A registered domain: its brand and its landing route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    brand: BrandConfig,
    route: DomainRoute,
}

impl RegistryEntry {
    /// Domain key shared by brand and route.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.route.key
    }

    #[must_use]
    pub const fn brand(&self) -> &BrandConfig {
        &self.brand
    }

    #[must_use]
    pub const fn route(&self) -> &DomainRoute {
        &self.route
    }

    #[must_use]
    pub const fn template(&self) -> LandingTemplate {
        self.route.template
    }
}

/// Immutable registry of branded domains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRegistry {
    entries: Vec<RegistryEntry>,
    index: HashMap<String, usize>,
    default_index: usize,
}

impl DomainRegistry {
    /// Build a registry from `(brand, template)` pairs.
    ///
    /// Keys are normalised (trimmed, lowercased, trailing dot removed) and
    /// registration order is preserved.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistryError`] if the list is empty, a key is blank or
    /// duplicated, or `default_key` is not among the entries.
    pub fn new(
        brands: Vec<(BrandConfig, LandingTemplate)>,
        default_key: &str,
    ) -> Result<Self, RegistryError> {
        if brands.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut entries = Vec::with_capacity(brands.len());
        let mut index = HashMap::with_capacity(brands.len());

        for (mut brand, template) in brands {
            let key = normalize_key(&brand.key);
            if key.is_empty() {
                return Err(RegistryError::EmptyKey);
            }
            if index.contains_key(&key) {
                return Err(RegistryError::DuplicateKey(key));
            }
            index.insert(key.clone(), entries.len());
            brand.key.clone_from(&key);
            entries.push(RegistryEntry {
                brand,
                route: DomainRoute { key, template },
            });
        }

        let default_key = normalize_key(default_key);
        let default_index = *index
            .get(&default_key)
            .ok_or(RegistryError::MissingDefault(default_key))?;

        Ok(Self {
            entries,
            index,
            default_index,
        })
    }

    /// The six production verticals, with `edgpt.ai` as the default.
    #[must_use]
    pub fn builtin() -> Self {
        let entries: Vec<RegistryEntry> = builtin_brands()
            .into_iter()
            .map(|(brand, template)| RegistryEntry {
                route: DomainRoute {
                    key: brand.key.clone(),
                    template,
                },
                brand,
            })
            .collect();
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.key().to_owned(), i))
            .collect();

        // edgpt.ai is registered first
        Self {
            entries,
            index,
            default_index: 0,
        }
    }

    /// Look up an entry by exact domain key.
    #[must_use]
    pub fn entry(&self, key: &str) -> Option<&RegistryEntry> {
        self.index.get(key).and_then(|&i| self.entries.get(i))
    }

    /// Look up a brand by exact domain key.
    #[must_use]
    pub fn brand(&self, key: &str) -> Option<&BrandConfig> {
        self.entry(key).map(RegistryEntry::brand)
    }

    /// Look up a route by exact domain key.
    #[must_use]
    pub fn route(&self, key: &str) -> Option<&DomainRoute> {
        self.entry(key).map(RegistryEntry::route)
    }

    /// The fallback entry.
    #[must_use]
    #[allow(clippy::indexing_slicing)] // default_index is validated at construction
    pub fn default_entry(&self) -> &RegistryEntry {
        &self.entries[self.default_index]
    }

    /// The fallback brand.
    #[must_use]
    pub fn default_brand(&self) -> &BrandConfig {
        self.default_entry().brand()
    }

    /// Brand for an explicit domain key, or the default brand when the key is
    /// not registered.
    #[must_use]
    pub fn brand_or_default(&self, key: &str) -> &BrandConfig {
        self.entry(&normalize_key(key))
            .unwrap_or_else(|| self.default_entry())
            .brand()
    }

    /// Registered domain keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(RegistryEntry::key)
    }

    /// All entries in registration order.
    #[must_use]
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DomainRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().trim_end_matches('.').to_lowercase()
}

fn brand(
    key: &str,
    name: &str,
    industry: &str,
    color: &str,
    icon: &str,
    title: &str,
    description: &str,
) -> BrandConfig {
    BrandConfig {
        key: key.to_owned(),
        name: name.to_owned(),
        industry: industry.to_owned(),
        color: color.to_owned(),
        icon: icon.to_owned(),
        title: title.to_owned(),
        description: description.to_owned(),
    }
}

fn builtin_brands() -> Vec<(BrandConfig, LandingTemplate)> {
    vec![
        (
            brand(
                "edgpt.ai",
                "EdGPT",
                "Education",
                "#3B82F6",
                "🎓",
                "Transform Your School Website Into an Intelligent EdGPT",
                "Convert your school website into an AI assistant that provides instant answers to parents, students, and staff 24/7.",
            ),
            LandingTemplate::EdGpt,
        ),
        (
            brand(
                "gptsites.ai",
                "GPTSites",
                "Business",
                "#3B82F6",
                "💼",
                "Transform Your Business Website Into an Intelligent GPTsite",
                "Convert your business website into an AI assistant that provides instant answers to customers 24/7.",
            ),
            LandingTemplate::GptSites,
        ),
        (
            brand(
                "lawfirmgpt.ai",
                "LawFirmGPT",
                "Legal",
                "#1E40AF",
                "⚖️",
                "Transform Your Law Firm Website Into an Intelligent GPTsite",
                "Convert your law firm website into an AI assistant that provides instant answers to clients 24/7.",
            ),
            LandingTemplate::LawFirmGpt,
        ),
        (
            brand(
                "cpafirm.ai",
                "CPAFirm",
                "Accounting",
                "#059669",
                "🧮",
                "Transform Your Accounting Firm Website Into an Intelligent GPTsite",
                "Convert your accounting firm website into an AI assistant that provides instant answers to clients 24/7.",
            ),
            LandingTemplate::CpaFirm,
        ),
        (
            brand(
                "taxprepgpt.ai",
                "TaxPrepGPT",
                "Tax Preparation",
                "#059669",
                "💰",
                "Transform Your Tax Preparation Website Into an Intelligent GPTsite",
                "Convert your tax preparation website into an AI assistant that provides instant answers to taxpayers 24/7.",
            ),
            LandingTemplate::TaxPrepGpt,
        ),
        (
            brand(
                "businessbrokergpt.ai",
                "BusinessBrokerGPT",
                "Business Brokerage",
                "#7C3AED",
                "🏢",
                "Transform Your Business Brokerage Website Into an Intelligent GPTsite",
                "Convert your business brokerage website into an AI assistant that provides instant answers to buyers and sellers 24/7.",
            ),
            LandingTemplate::BusinessBrokerGpt,
        ),
    ]
}
