//! Service tiers, their purchasable options and the current selection.

mod icon;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use icon::FeatureIcon;

/// One concrete purchasable configuration of a tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierOption {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub duration: String,
    pub pandits: u8,
    pub price: u32,
    #[serde(default)]
    pub features: Vec<String>,
}

/// A named pricing bracket grouping several options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTier {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: u32,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub options: Vec<TierOption>,
}

impl TierOption {
    /// "1 pandit", "3 pandits".
    pub fn pandit_label(&self) -> String {
        match self.pandits {
            1 => "1 pandit".to_string(),
            n => format!("{n} pandits"),
        }
    }
}

impl ServiceTier {
    pub fn option(&self, id: &str) -> Option<&TierOption> {
        self.options.iter().find(|o| o.id == id)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Tier at position {0} has an empty key")]
    EmptyKey(usize),
    #[error("Duplicate tier key: {0}")]
    DuplicateTier(String),
    #[error("Duplicate option id {option} in tier {tier}")]
    DuplicateOption { tier: String, option: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("No tier selected")]
    NoTier,
    #[error("Unknown tier: {0}")]
    UnknownTier(String),
    #[error("Option {option} does not belong to tier {tier}")]
    ForeignOption { tier: String, option: String },
}

/// Ordered tiers keyed by their `key`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    tiers: Vec<ServiceTier>,
}

impl Catalog {
    #[cfg(test)]
    pub fn new(tiers: Vec<ServiceTier>) -> Result<Self, CatalogError> {
        let catalog = Self { tiers };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut keys = HashSet::new();
        for (position, tier) in self.tiers.iter().enumerate() {
            if tier.key.is_empty() {
                return Err(CatalogError::EmptyKey(position));
            }
            if !keys.insert(tier.key.as_str()) {
                return Err(CatalogError::DuplicateTier(tier.key.clone()));
            }
            let mut ids = HashSet::new();
            for option in &tier.options {
                if !ids.insert(option.id.as_str()) {
                    return Err(CatalogError::DuplicateOption {
                        tier: tier.key.clone(),
                        option: option.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn tiers(&self) -> &[ServiceTier] {
        &self.tiers
    }

    pub fn tier(&self, key: &str) -> Option<&ServiceTier> {
        self.tiers.iter().find(|t| t.key == key)
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Price shown on a tier panel for the given selection.
    ///
    /// The selected option's price when `tier_key` is the selected tier and
    /// an option is chosen, otherwise the tier's base price.
    pub fn displayed_price(&self, tier_key: &str, selection: &Selection) -> Option<u32> {
        let tier = self.tier(tier_key)?;
        let chosen = selection
            .option_id()
            .filter(|_| selection.tier_key() == Some(tier_key))
            .and_then(|id| tier.option(id));
        Some(chosen.map_or(tier.price, |o| o.price))
    }
}

/// The tier and option a visitor picked. Owned by the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    tier: Option<String>,
    option: Option<String>,
}

impl Selection {
    pub fn tier_key(&self) -> Option<&str> {
        self.tier.as_deref()
    }

    pub fn option_id(&self) -> Option<&str> {
        self.option.as_deref()
    }

    /// Switch tiers. The option is dropped when the tier actually changes.
    pub fn set_tier(&mut self, catalog: &Catalog, key: &str) -> Result<(), SelectionError> {
        if catalog.tier(key).is_none() {
            return Err(SelectionError::UnknownTier(key.to_string()));
        }
        if self.tier.as_deref() != Some(key) {
            self.tier = Some(key.to_string());
            self.option = None;
        }
        Ok(())
    }

    /// Choose an option of the currently selected tier.
    pub fn set_option(&mut self, catalog: &Catalog, id: &str) -> Result<(), SelectionError> {
        let tier_key = self.tier.as_deref().ok_or(SelectionError::NoTier)?;
        let tier = catalog
            .tier(tier_key)
            .ok_or_else(|| SelectionError::UnknownTier(tier_key.to_string()))?;
        if tier.option(id).is_none() {
            return Err(SelectionError::ForeignOption {
                tier: tier_key.to_string(),
                option: id.to_string(),
            });
        }
        self.option = Some(id.to_string());
        Ok(())
    }

    /// The option currently chosen, resolved against the catalog.
    pub fn resolve<'a>(
        &self,
        catalog: &'a Catalog,
    ) -> Option<(&'a ServiceTier, Option<&'a TierOption>)> {
        let tier = catalog.tier(self.tier.as_deref()?)?;
        let option = self.option.as_deref().and_then(|id| tier.option(id));
        Some((tier, option))
    }
}

/// Format whole rupees with Indian digit grouping, e.g. `₹1,25,000`.
pub fn format_price(rupees: u32) -> String {
    let digits = rupees.to_string();
    if digits.len() <= 3 {
        return format!("₹{digits}");
    }

    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("₹{},{last_three}", groups.join(","))
}


#[cfg(test)]
mod tests {
    use super::fixtures::catalog;
    use super::*;

    #[test]
    fn test_format_price_indian_grouping() {
        assert_eq!(format_price(0), "₹0");
        assert_eq!(format_price(501), "₹501");
        assert_eq!(format_price(1_100), "₹1,100");
        assert_eq!(format_price(21_000), "₹21,000");
        assert_eq!(format_price(125_000), "₹1,25,000");
        assert_eq!(format_price(10_000_000), "₹1,00,00,000");
    }

    #[test]
    fn test_duplicate_tier_rejected() {
        let mut tiers = catalog().tiers().to_vec();
        tiers.push(tiers[0].clone());
        assert_eq!(
            Catalog::new(tiers),
            Err(CatalogError::DuplicateTier("basic".to_string()))
        );
    }

    #[test]
    fn test_duplicate_option_rejected() {
        let mut tiers = catalog().tiers().to_vec();
        let copy = tiers[1].options[0].clone();
        tiers[1].options.push(copy);
        assert_eq!(
            Catalog::new(tiers),
            Err(CatalogError::DuplicateOption {
                tier: "premium".to_string(),
                option: "p1".to_string()
            })
        );
    }

    #[test]
    fn test_option_must_belong_to_selected_tier() {
        let catalog = catalog();
        let mut selection = Selection::default();
        selection.set_tier(&catalog, "basic").unwrap();

        let err = selection.set_option(&catalog, "p1").unwrap_err();
        assert!(matches!(err, SelectionError::ForeignOption { .. }));
        assert_eq!(selection.option_id(), None);

        selection.set_option(&catalog, "b2").unwrap();
        assert_eq!(selection.option_id(), Some("b2"));
    }

    #[test]
    fn test_changing_tier_clears_option() {
        let catalog = catalog();
        let mut selection = Selection::default();
        selection.set_tier(&catalog, "basic").unwrap();
        selection.set_option(&catalog, "b1").unwrap();

        selection.set_tier(&catalog, "basic").unwrap();
        assert_eq!(selection.option_id(), Some("b1"));

        selection.set_tier(&catalog, "premium").unwrap();
        assert_eq!(selection.tier_key(), Some("premium"));
        assert_eq!(selection.option_id(), None);
    }

    #[test]
    fn test_unknown_tier_rejected() {
        let mut selection = Selection::default();
        assert_eq!(
            selection.set_tier(&catalog(), "deluxe"),
            Err(SelectionError::UnknownTier("deluxe".to_string()))
        );
    }

    #[test]
    fn test_displayed_price_follows_selection() {
        let catalog = catalog();
        let mut selection = Selection::default();
        assert_eq!(catalog.displayed_price("basic", &selection), Some(1_100));

        selection.set_tier(&catalog, "basic").unwrap();
        selection.set_option(&catalog, "b2").unwrap();
        assert_eq!(catalog.displayed_price("basic", &selection), Some(2_100));
        assert_eq!(catalog.displayed_price("premium", &selection), Some(5_100));
        assert_eq!(catalog.displayed_price("deluxe", &selection), None);
    }

    #[test]
    fn test_pandit_label() {
        let mut option = catalog().tiers()[0].options[0].clone();
        assert_eq!(option.pandit_label(), "1 pandit");
        option.pandits = 3;
        assert_eq!(option.pandit_label(), "3 pandits");
    }
}
