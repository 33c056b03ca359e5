//! # Specdeck Core
//!
//! Core library for Specdeck, a hardware catalog with side-by-side
//! comparison. Provides the metric catalog, specification resolver, value
//! formatter, comparison evaluator, selection state manager, comparison
//! view, shareable link parameters, data sources, and configuration.

pub mod catalog;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod format;
pub mod params;
pub mod selection;
pub mod source;
pub mod spec;
pub mod view;

// Re-export commonly used types at the crate root.
pub use catalog::{Category, MetricDefinition, MetricKey, ValueType};
pub use config::{SpecdeckConfig, config_exists, load_config};
pub use error::{CatalogError, Result, SelectionError, SpecdeckError};
pub use evaluator::{ComparisonRow, Winner, evaluate};
pub use params::{ParamStore, ShareParams, Side, SideParams};
pub use selection::{LoadOutcome, ReadySide, Selection, SelectionManager, SideState};
pub use source::{HttpSource, InMemorySource, SystemSource, SystemSummary};
pub use spec::{
    EffectiveSpecification, SpecValue, SpecificationRecord, SystemRecord, VariantRecord, resolve,
};
pub use view::{ComparisonMatrix, ComparisonOutcome, MatrixEntry, SideHeader, ViewOptions};
