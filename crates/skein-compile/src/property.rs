//! `PropertySet` for pass communication.
//!
//! Passes share the target, the configuration and their intermediate results
//! through a [`PropertySet`]. Standard properties are typed fields; anything
//! else a pass wants to publish goes into the type-keyed custom storage.
//!
//! # Examples
//!
//! ```
//! use skein_compile::{CouplingMap, PropertySet};
//!
//! #[derive(Debug, PartialEq)]
//! struct SearchStats {
//!     attempts: usize,
//! }
//!
//! let mut props = PropertySet::new().with_coupling_map(CouplingMap::linear(5));
//! props.insert(SearchStats { attempts: 3 });
//!
//! assert!(props.coupling_map.is_some());
//! assert_eq!(props.get::<SearchStats>().unwrap().attempts, 3);
//! ```

use rustc_hash::FxHashMap;
use std::any::{Any, TypeId};

use skein_ir::{RoutedCircuit, Segment, SwapPlan};

use crate::config::MapperConfig;
use crate::coupling::CouplingMap;
use crate::error::{CompileError, CompileResult};

/// Properties shared between passes.
#[derive(Debug, Default)]
pub struct PropertySet {
    /// Target coupling map. Required by every routing pass.
    pub coupling_map: Option<CouplingMap>,

    /// Search budgets and tie-break order.
    pub config: MapperConfig,

    /// Segments found by the segmentation pass. Layouts are partial until the
    /// swap planning pass resolves them.
    pub segments: Option<Vec<Segment>>,

    /// Swaps between consecutive segments, set by the swap planning pass.
    pub swap_plans: Option<Vec<SwapPlan>>,

    /// Custom properties storage (type-erased).
    custom: FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl PropertySet {
    /// Create a new empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target coupling map.
    #[must_use]
    pub fn with_coupling_map(mut self, coupling_map: CouplingMap) -> Self {
        self.coupling_map = Some(coupling_map);
        self
    }

    /// Set the mapper configuration.
    #[must_use]
    pub fn with_config(mut self, config: MapperConfig) -> Self {
        self.config = config;
        self
    }

    /// The coupling map, or [`CompileError::MissingCouplingMap`].
    pub fn require_coupling_map(&self) -> CompileResult<&CouplingMap> {
        self.coupling_map
            .as_ref()
            .ok_or(CompileError::MissingCouplingMap)
    }

    /// Move the routing results out into a [`RoutedCircuit`].
    ///
    /// Fails if segmentation has not run. Missing swap plans are only
    /// accepted for circuits with at most one segment.
    pub fn take_routed(&mut self) -> CompileResult<RoutedCircuit> {
        let num_physical = self.require_coupling_map()?.num_qubits();
        let segments = self.segments.take().ok_or(CompileError::MissingSegments)?;
        let swap_plans = self.swap_plans.take().unwrap_or_default();
        if segments.len() > 1 && swap_plans.len() + 1 != segments.len() {
            return Err(CompileError::VerificationFailed(format!(
                "{} segments but {} swap plans",
                segments.len(),
                swap_plans.len()
            )));
        }

        Ok(RoutedCircuit {
            segments,
            swap_plans,
            num_physical,
        })
    }

    /// Insert a custom property.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.custom.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Get a custom property.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.custom
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Get a mutable custom property.
    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.custom
            .get_mut(&TypeId::of::<T>())
            .and_then(|v| v.downcast_mut())
    }

    /// Remove a custom property.
    pub fn remove<T: Any>(&mut self) -> Option<T> {
        self.custom
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|v| *v)
    }
}
