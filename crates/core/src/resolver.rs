//! Host header resolution.
//!
//! Every inbound request is mapped to a [`RegistryEntry`] from its `Host`:
//!
//! 1. The port (and IPv6 brackets) are stripped and the host is lowercased.
//! 2. An exact match on a registered domain key wins.
//! 3. Otherwise the longest registered key the host ends with wins, so
//!    `www.lawfirmgpt.ai` resolves to `lawfirmgpt.ai`. Keys of equal length
//!    are tried in registration order.
//! 4. Otherwise the default entry is returned.
//!
//! Resolution never fails.

use crate::registry::{BrandConfig, DomainRegistry, RegistryEntry};

/// Normalise a raw `Host` value for lookup.
///
/// ```
/// use edgpt_core::normalize_host;
///
/// assert_eq!(normalize_host("WWW.EdGPT.ai:8080"), "www.edgpt.ai");
/// assert_eq!(normalize_host("[::1]:3000"), "::1");
/// assert_eq!(normalize_host("cpafirm.ai."), "cpafirm.ai");
/// ```
#[must_use]
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();

    let without_port = if let Some(rest) = host.strip_prefix('[') {
        rest.split_once(']').map_or(rest, |(addr, _)| addr)
    } else {
        host.split_once(':').map_or(host, |(name, _)| name)
    };

    without_port.trim_end_matches('.').to_lowercase()
}

impl DomainRegistry {
    /// Resolve a request host to its registry entry.
    ///
    /// An exact key match wins; otherwise the longest key the host ends with.
    /// The suffix test is plain string matching, so `mylawfirmgpt.ai` matches
    /// `lawfirmgpt.ai`.
    #[must_use]
    pub fn resolve_entry(&self, host: &str) -> &RegistryEntry {
        let host = normalize_host(host);

        if let Some(entry) = self.entry(&host) {
            return entry;
        }

        self.entries()
            .iter()
            .filter(|entry| host.ends_with(entry.key()))
            .reduce(|best, candidate| {
                if candidate.key().len() > best.key().len() {
                    candidate
                } else {
                    best
                }
            })
            .unwrap_or_else(|| self.default_entry())
    }

    /// Resolve a request host to its brand.
    #[must_use]
    pub fn resolve(&self, host: &str) -> &BrandConfig {
        self.resolve_entry(host).brand()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::registry::{DEFAULT_DOMAIN, LandingTemplate};

    fn brand(key: &str) -> BrandConfig {
        BrandConfig {
            key: key.to_owned(),
            name: key.to_owned(),
            industry: "Test".to_owned(),
            color: "#000000".to_owned(),
            icon: "*".to_owned(),
            title: String::new(),
            description: String::new(),
        }
    }

    #[test]
    fn test_exact_match_for_every_key() {
        let registry = DomainRegistry::builtin();
        for key in registry.keys() {
            assert_eq!(registry.resolve(key).key, key);
        }
    }

    #[test]
    fn test_port_is_stripped() {
        let registry = DomainRegistry::builtin();
        for key in registry.keys() {
            assert_eq!(
                registry.resolve(&format!("{key}:8080")),
                registry.resolve(key)
            );
        }
    }

    #[test]
    fn test_www_subdomain_resolves_to_parent() {
        let registry = DomainRegistry::builtin();
        for key in registry.keys() {
            assert_eq!(registry.resolve(&format!("www.{key}")).key, key);
            assert_eq!(registry.resolve(&format!("www.{key}:443")).key, key);
        }
    }

    #[test]
    fn test_unknown_host_falls_back_to_default() {
        let registry = DomainRegistry::builtin();
        for host in ["localhost:8082", "example.com", "", "127.0.0.1", "[::1]:8082"] {
            assert_eq!(registry.resolve(host).key, DEFAULT_DOMAIN, "host {host:?}");
        }
    }

    #[test]
    fn test_case_insensitive() {
        let registry = DomainRegistry::builtin();
        assert_eq!(registry.resolve("TaxPrepGPT.AI").name, "TaxPrepGPT");
    }

    #[test]
    fn test_resolve_entry_carries_template() {
        let registry = DomainRegistry::builtin();
        let entry = registry.resolve_entry("app.businessbrokergpt.ai:80");
        assert_eq!(entry.template(), LandingTemplate::BusinessBrokerGpt);
    }

    #[test]
    fn test_longest_suffix_wins_regardless_of_order() {
        let brands = vec![
            (brand("example.com"), LandingTemplate::EdGpt),
            (brand("shop.example.com"), LandingTemplate::GptSites),
        ];
        let registry = DomainRegistry::new(brands, "example.com").unwrap();
        assert_eq!(registry.resolve("www.shop.example.com").key, "shop.example.com");
        assert_eq!(registry.resolve("www.example.com").key, "example.com");

        let reversed = vec![
            (brand("shop.example.com"), LandingTemplate::GptSites),
            (brand("example.com"), LandingTemplate::EdGpt),
        ];
        let registry = DomainRegistry::new(reversed, "example.com").unwrap();
        assert_eq!(registry.resolve("www.shop.example.com").key, "shop.example.com");
    }

    #[test]
    fn test_suffix_match_has_no_label_boundary() {
        let registry = DomainRegistry::builtin();
        assert_eq!(registry.resolve("mylawfirmgpt.ai").key, "lawfirmgpt.ai");
        assert_eq!(registry.resolve("notedgpt.ai:8080").key, "edgpt.ai");
    }

    #[test]
    fn test_normalize_host() {
        assert_eq!(normalize_host("edgpt.ai"), "edgpt.ai");
        assert_eq!(normalize_host(" edgpt.ai:8082 "), "edgpt.ai");
        assert_eq!(normalize_host("[2001:db8::1]"), "2001:db8::1");
        assert_eq!(normalize_host(""), "");
    }
}
