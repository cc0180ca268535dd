//! Product code → strategy registry
//!
//! Built once at startup and shared behind an `Arc`. Lookups take `&self` only, so
//! concurrent invocations dispatch without locking.

use super::products::default_strategies;
use super::DocumentStrategy;
use crate::domain::{ProductCode, Result, TntError};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Immutable table of document strategies
pub struct StrategyRegistry {
    strategies: BTreeMap<ProductCode, Arc<dyn DocumentStrategy>>,
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("product_codes", &self.product_codes())
            .finish()
    }
}

impl StrategyRegistry {
    /// Builds a registry from `strategies`
    ///
    /// # Errors
    ///
    /// - `TntError::DuplicateStrategy` if two strategies declare the same code
    /// - `TntError::Configuration` if a strategy declares a blank code
    pub fn new(strategies: Vec<Arc<dyn DocumentStrategy>>) -> Result<Self> {
        let mut table = BTreeMap::new();
        for strategy in strategies {
            let code = ProductCode::new(strategy.product_code()).map_err(TntError::Configuration)?;
            if table.contains_key(&code) {
                return Err(TntError::DuplicateStrategy {
                    product_code: code.to_string(),
                });
            }
            table.insert(code, strategy);
        }
        Ok(Self { strategies: table })
    }

    /// Registry holding every built-in strategy
    pub fn with_defaults() -> Result<Self> {
        Self::new(default_strategies())
    }

    /// Registry holding the built-in strategies named in `enabled`
    ///
    /// An empty list enables everything.
    ///
    /// # Errors
    ///
    /// Returns `TntError::Configuration` for codes with no built-in strategy.
    pub fn with_enabled(enabled: &[String]) -> Result<Self> {
        if enabled.is_empty() {
            return Self::with_defaults();
        }

        let all = default_strategies();
        let mut selected = Vec::with_capacity(enabled.len());
        for code in enabled {
            let code = code.trim();
            let strategy = all
                .iter()
                .find(|s| s.product_code() == code)
                .ok_or_else(|| {
                    TntError::Configuration(format!("Unknown product code in strategies.enabled: '{code}'"))
                })?;
            selected.push(Arc::clone(strategy));
        }
        Self::new(selected)
    }

    /// Strategy registered for `product_code`
    ///
    /// # Errors
    ///
    /// Returns `TntError::DispatchNotFound` when no strategy handles the code.
    pub fn dispatch(&self, product_code: &str) -> Result<Arc<dyn DocumentStrategy>> {
        ProductCode::new(product_code)
            .ok()
            .and_then(|code| self.strategies.get(&code))
            .cloned()
            .ok_or_else(|| TntError::DispatchNotFound {
                product_code: product_code.to_string(),
            })
    }

    /// Registered product codes in sorted order
    pub fn product_codes(&self) -> Vec<&str> {
        self.strategies.keys().map(ProductCode::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::super::products::{ExportCollection, ImportLetterOfCredit};
    use super::*;

    #[test]
    fn test_defaults_dispatch() {
        let registry = StrategyRegistry::with_defaults().unwrap();
        assert_eq!(registry.product_codes(), vec!["EXCO", "IMLC", "OWGT"]);

        let strategy = registry.dispatch("IMLC").unwrap();
        assert_eq!(strategy.product_code(), "IMLC");
        assert_eq!(registry.dispatch(" EXCO ").unwrap().product_code(), "EXCO");
    }

    #[test]
    fn test_unknown_code_not_found() {
        let registry = StrategyRegistry::with_defaults().unwrap();
        for code in ["XXXX", "", "imlc"] {
            match registry.dispatch(code) {
                Err(TntError::DispatchNotFound { product_code }) => assert_eq!(product_code, code),
                Err(other) => panic!("expected DispatchNotFound, got {other:?}"),
                Ok(_) => panic!("expected DispatchNotFound for '{code}'"),
            }
        }
    }

    #[test]
    fn test_duplicate_rejected() {
        let result = StrategyRegistry::new(vec![
            Arc::new(ImportLetterOfCredit),
            Arc::new(ExportCollection),
            Arc::new(ImportLetterOfCredit),
        ]);
        assert!(matches!(
            result,
            Err(TntError::DuplicateStrategy { product_code }) if product_code == "IMLC"
        ));
    }

    #[test]
    fn test_with_enabled_subset() {
        let registry = StrategyRegistry::with_enabled(&["OWGT".to_string()]).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.dispatch("IMLC").is_err());

        let err = StrategyRegistry::with_enabled(&["NOPE".to_string()]).unwrap_err();
        assert!(matches!(err, TntError::Configuration(_)));

        assert_eq!(StrategyRegistry::with_enabled(&[]).unwrap().len(), 3);
    }
}
