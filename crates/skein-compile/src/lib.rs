//! Skein qubit mapping and routing.
//!
//! This crate maps the logical qubits of a circuit onto the physical qubits
//! of a device whose two-qubit interactions are restricted by a coupling map.
//! Instead of routing gate by gate, it cuts the circuit into segments that can
//! each run under one fixed layout, found by subgraph-isomorphism search, and
//! plans swap sequences between consecutive layouts.
//!
//! # Architecture
//!
//! ```text
//! DependencyGraph ─┐
//!                  ▼
//!            ┌─────────────┐
//!            │ PassManager │ ◄── PropertySet (coupling map, config)
//!            └─────────────┘
//!                  │
//!                  ├── Segmentation        (SegmentMapper per attempt)
//!                  ├── SwapPlanning        (SwapPlanner per transition)
//!                  └── MappingVerification
//!                  │
//!                  ▼
//!            RoutedCircuit (segments, layouts, swap plans)
//! ```
//!
//! # Example
//!
//! ```rust
//! use skein_compile::{CouplingMap, PassManagerBuilder, VerificationResult};
//! use skein_ir::{DependencyGraph, GateRecord, QubitId};
//!
//! let graph = DependencyGraph::from_records(
//!     4,
//!     vec![
//!         GateRecord::single("h", QubitId(0)),
//!         GateRecord::cx(0, 1),
//!         GateRecord::cx(1, 2),
//!         GateRecord::cx(2, 3),
//!     ],
//! )
//! .unwrap();
//!
//! let (pm, mut props) = PassManagerBuilder::new()
//!     .with_coupling_map(CouplingMap::linear(4))
//!     .build();
//!
//! let routed = pm.route(&graph, &mut props).unwrap();
//! assert_eq!(routed.num_mappings(), 1);
//! assert_eq!(routed.total_swaps(), 0);
//! assert!(props.get::<VerificationResult>().unwrap().passed);
//! ```
//!
//! # Custom Passes
//!
//! Implement the [`Pass`] trait to add analyses to the pipeline:
//!
//! ```rust
//! use skein_compile::{CompileResult, Pass, PassKind, PropertySet};
//! use skein_ir::DependencyGraph;
//!
//! struct CountTwoQubitGates;
//!
//! impl Pass for CountTwoQubitGates {
//!     fn name(&self) -> &str { "count_two_qubit_gates" }
//!     fn kind(&self) -> PassKind { PassKind::Analysis }
//!
//!     fn run(&self, graph: &DependencyGraph, props: &mut PropertySet) -> CompileResult<()> {
//!         props.insert(graph.num_two_qubit_gates());
//!         Ok(())
//!     }
//! }
//! ```

pub mod config;
pub mod coupling;
pub mod error;
pub mod manager;
pub mod mapper;
pub mod pass;
pub mod passes;
pub mod property;
pub mod swap;

pub use config::{ConfigError, IslandOrder, Latency, MapperConfig, SearchLimits};
pub use coupling::CouplingMap;
pub use error::{CompileError, CompileResult};
pub use manager::{PassManager, PassManagerBuilder, route};
pub use mapper::{ConflictReport, FailureHeuristic, MappingOutcome, SegmentMapper};
pub use pass::{Pass, PassKind};
pub use passes::{
    ConstructiveFallbacks, MappingVerification, Segmentation, SwapPlanning, VerificationResult,
};
pub use property::PropertySet;
pub use swap::{PlanStrategy, SwapPlanner, Transition};
