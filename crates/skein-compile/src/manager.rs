//! Pass manager for orchestrating routing.

use tracing::{debug, info, instrument};

use skein_ir::{DependencyGraph, RoutedCircuit};

use crate::config::MapperConfig;
use crate::coupling::CouplingMap;
use crate::error::CompileResult;
use crate::pass::Pass;
use crate::passes::{MappingVerification, Segmentation, SwapPlanning};
use crate::property::PropertySet;

/// Manages and executes a sequence of routing passes.
pub struct PassManager {
    /// The passes to execute, in order.
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Create a new empty pass manager.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Add a pass to the manager.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Run all passes on the given graph.
    #[instrument(skip(self, graph, properties))]
    pub fn run(&self, graph: &DependencyGraph, properties: &mut PropertySet) -> CompileResult<()> {
        info!(
            "Running pass manager with {} passes on {} gates over {} qubits",
            self.passes.len(),
            graph.len(),
            graph.num_qubits()
        );

        for pass in &self.passes {
            if pass.should_run(graph, properties) {
                debug!("Running pass: {} ({:?})", pass.name(), pass.kind());
                pass.run(graph, properties)?;
            } else {
                debug!("Skipping pass: {}", pass.name());
            }
        }

        info!(
            "Pass manager completed: {} segments, {} swaps",
            properties.segments.as_ref().map_or(0, Vec::len),
            properties
                .swap_plans
                .as_ref()
                .map_or(0, |plans| plans.iter().map(|p| p.len()).sum::<usize>())
        );

        Ok(())
    }

    /// Run all passes and collect the routed circuit.
    pub fn route(
        &self,
        graph: &DependencyGraph,
        properties: &mut PropertySet,
    ) -> CompileResult<RoutedCircuit> {
        self.run(graph, properties)?;
        properties.take_routed()
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the manager has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for the standard routing pipeline.
pub struct PassManagerBuilder {
    /// Whether to append [`MappingVerification`].
    verify: bool,
    /// Target and configuration.
    properties: PropertySet,
}

impl PassManagerBuilder {
    /// Create a new builder with verification enabled.
    pub fn new() -> Self {
        Self {
            verify: true,
            properties: PropertySet::new(),
        }
    }

    /// Set the target coupling map.
    #[must_use]
    pub fn with_coupling_map(mut self, coupling_map: CouplingMap) -> Self {
        self.properties.coupling_map = Some(coupling_map);
        self
    }

    /// Set the mapper configuration.
    #[must_use]
    pub fn with_config(mut self, config: MapperConfig) -> Self {
        self.properties.config = config;
        self
    }

    /// Enable or disable the verification pass.
    #[must_use]
    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Set the properties wholesale.
    #[must_use]
    pub fn with_properties(mut self, properties: PropertySet) -> Self {
        self.properties = properties;
        self
    }

    /// Build the pass manager and return it with the properties.
    pub fn build(self) -> (PassManager, PropertySet) {
        let mut pm = PassManager::new();
        pm.add_pass(Segmentation);
        pm.add_pass(SwapPlanning);
        if self.verify {
            pm.add_pass(MappingVerification);
        }
        (pm, self.properties)
    }
}

impl Default for PassManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Route `graph` onto `coupling_map` with the standard pipeline.
///
/// ```
/// use skein_compile::{CouplingMap, MapperConfig, route};
/// use skein_ir::{DependencyGraph, GateRecord};
///
/// let graph = DependencyGraph::from_records(
///     3,
///     vec![GateRecord::cx(0, 1), GateRecord::cx(1, 2), GateRecord::cx(0, 2)],
/// )
/// .unwrap();
///
/// let routed = route(&graph, CouplingMap::linear(3), MapperConfig::default()).unwrap();
/// assert_eq!(routed.num_mappings(), 2);
/// assert_eq!(routed.total_swaps(), 1);
/// ```
pub fn route(
    graph: &DependencyGraph,
    coupling_map: CouplingMap,
    config: MapperConfig,
) -> CompileResult<RoutedCircuit> {
    let (pm, mut properties) = PassManagerBuilder::new()
        .with_coupling_map(coupling_map)
        .with_config(config)
        .build();
    pm.route(graph, &mut properties)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompileError;
    use crate::passes::VerificationResult;
    use skein_ir::GateRecord;

    #[test]
    fn test_empty_pass_manager() {
        let pm = PassManager::new();
        assert!(pm.is_empty());
        assert_eq!(pm.len(), 0);

        let graph = DependencyGraph::new(2);
        let mut props = PropertySet::new();
        pm.run(&graph, &mut props).unwrap();
        assert!(props.segments.is_none());
    }

    #[test]
    fn test_pass_manager_builder() {
        let (pm, props) = PassManagerBuilder::new()
            .with_coupling_map(CouplingMap::linear(5))
            .build();
        assert_eq!(pm.len(), 3);
        assert!(props.coupling_map.is_some());

        let (pm, _) = PassManagerBuilder::new().with_verification(false).build();
        assert_eq!(pm.len(), 2);
    }

    #[test]
    fn test_pipeline_records_verification() {
        let graph = DependencyGraph::from_records(
            4,
            vec![GateRecord::cx(0, 3), GateRecord::cx(1, 2), GateRecord::cx(0, 2)],
        )
        .unwrap();
        let (pm, mut props) = PassManagerBuilder::new()
            .with_coupling_map(CouplingMap::star(4))
            .build();

        pm.run(&graph, &mut props).unwrap();
        assert!(props.get::<VerificationResult>().is_some_and(|r| r.passed));

        let routed = props.take_routed().unwrap();
        assert_eq!(routed.num_physical, 4);
        assert_eq!(routed.swap_plans.len() + 1, routed.segments.len());
    }

    #[test]
    fn test_route_without_coupling_map() {
        let graph = DependencyGraph::from_records(2, vec![GateRecord::cx(0, 1)]).unwrap();
        let (pm, mut props) = PassManagerBuilder::new().build();
        assert!(matches!(
            pm.route(&graph, &mut props),
            Err(CompileError::MissingCouplingMap)
        ));
    }
}
