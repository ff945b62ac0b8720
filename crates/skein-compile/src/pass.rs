//! Pass trait and types for routing passes.

use skein_ir::DependencyGraph;

use crate::error::CompileResult;
use crate::property::PropertySet;

/// The kind of routing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Reads the dependency graph and publishes results to the `PropertySet`.
    Analysis,
    /// Checks results already in the `PropertySet` without changing them.
    Verification,
}

/// A pass over a dependency graph.
///
/// The graph is never modified: routing only produces segments, layouts and
/// swap plans, which passes hand to each other through the `PropertySet`.
pub trait Pass: Send + Sync {
    /// Get the name of this pass.
    fn name(&self) -> &str;

    /// Get the kind of this pass.
    fn kind(&self) -> PassKind;

    /// Run the pass.
    fn run(&self, graph: &DependencyGraph, properties: &mut PropertySet) -> CompileResult<()>;

    /// Check if this pass should run based on current state.
    fn should_run(&self, _graph: &DependencyGraph, _properties: &PropertySet) -> bool {
        true
    }
}
