//! Skein circuit intermediate representation
//!
//! The data model shared by the Skein qubit router: gate records, the
//! per-qubit dependency graph built from them, the live-range index of
//! interacting qubit pairs, logical-to-physical layouts and the routed
//! result (segments plus swap plans).
//!
//! # Core Components
//!
//! - [`GateRecord`]: one gate with an optional control and a target
//! - [`DependencyGraph`]: arena of [`GateNode`]s linked per operand wire
//! - [`LiveRanges`]: ascending gate positions for every interacting pair
//! - [`Layout`]: partial injective logical-to-physical map
//! - [`RoutedCircuit`]: [`Segment`]s and the [`SwapPlan`]s between them
//!
//! # Example
//!
//! ```rust
//! use skein_ir::{DependencyGraph, GateRecord, QubitId};
//!
//! let graph = DependencyGraph::from_records(
//!     3,
//!     [GateRecord::cx(0, 1), GateRecord::cx(1, 2), GateRecord::cx(0, 1)],
//! )
//! .unwrap();
//!
//! let ranges = graph.live_ranges();
//! assert_eq!(ranges.positions(QubitId(1), QubitId(0)), &[0, 2]);
//! assert_eq!(ranges.latest_within(QubitId(0), QubitId(1), 0..=1), Some(0));
//! ```

pub mod dag;
pub mod error;
pub mod gate;
pub mod layout;
pub mod live_range;
pub mod qubit;
pub mod routed;

pub use dag::{DependencyGraph, GateIndex, GateNode};
pub use error::{IrError, IrResult};
pub use gate::GateRecord;
pub use layout::Layout;
pub use live_range::LiveRanges;
pub use qubit::QubitId;
pub use routed::{RoutedCircuit, Segment, SwapPlan};
