//! # Engine
//!
//! Owns the read-only state every evaluation shares: the post catalog, the
//! settings and the spacing-table cache. Build one per process and share it
//! by reference; it is `Send + Sync`.
//!
//! ```rust
//! use windcalc_core::calculations::EstimateInput;
//! use windcalc_core::engine::Engine;
//!
//! let engine = Engine::with_defaults();
//! let out = engine.estimate(&EstimateInput::new(110.0, 6.0, 10.0)).unwrap();
//! assert!(!out.line.post_key.is_empty());
//! ```

use crate::calculations::{estimate, project, EstimateInput, EstimateOutput, ProjectInput, ProjectOutput};
use crate::errors::CalcResult;
use crate::posts::{PostCatalog, SpacingTableCache};
use crate::quantities::{compute_segment_quantities, SegmentQuantities, TakeoffInput};
use crate::selection::MemberSelector;
use crate::settings::Settings;

#[derive(Debug)]
pub struct Engine {
    catalog: PostCatalog,
    settings: Settings,
    tables: SpacingTableCache,
}

impl Engine {
    /// Build an engine. Capacity-ordering problems in the catalog are logged,
    /// not fatal.
    pub fn new(catalog: PostCatalog, settings: Settings) -> Self {
        for problem in catalog.verify_capacity_ordering() {
            tracing::warn!(%problem, "post catalog capacity ordering violated");
        }

        let tables = SpacingTableCache::new(settings.spacing_table_dir.clone());
        tracing::debug!(
            posts = catalog.len(),
            table_speeds = ?tables.available_wind_speeds(),
            strict_footing = settings.strict_footing,
            "engine ready"
        );

        Engine {
            catalog,
            settings,
            tables,
        }
    }

    /// Built-in catalog with default settings.
    pub fn with_defaults() -> Self {
        Engine::new(PostCatalog::builtin(), Settings::default())
    }

    pub fn catalog(&self) -> &PostCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tables(&self) -> &SpacingTableCache {
        &self.tables
    }

    pub fn selector(&self) -> MemberSelector<'_> {
        MemberSelector::new(&self.catalog, &self.settings)
    }

    pub fn estimate(&self, input: &EstimateInput) -> CalcResult<EstimateOutput> {
        estimate::calculate(self, input)
    }

    pub fn project(&self, input: &ProjectInput) -> CalcResult<ProjectOutput> {
        project::calculate(self, input)
    }

    pub fn quantities(&self, input: &TakeoffInput) -> CalcResult<SegmentQuantities> {
        compute_segment_quantities(&self.catalog, input)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_engine_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }

    #[test]
    fn test_concurrent_estimates_agree() {
        let engine = Arc::new(Engine::with_defaults());
        let input = EstimateInput::new(120.0, 8.0, 10.0);
        let expected = engine.estimate(&input).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = Arc::clone(&engine);
                let input = input.clone();
                std::thread::spawn(move || engine.estimate(&input).unwrap())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }

    #[test]
    fn test_builtin_catalog_has_no_ordering_problems() {
        let engine = Engine::with_defaults();
        assert!(engine.catalog().verify_capacity_ordering().is_empty());
        assert!(engine.tables().available_wind_speeds().is_empty());
    }
}
