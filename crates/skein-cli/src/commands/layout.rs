//! Layout command implementation.

use anyhow::{Context, Result};

use skein_compile::{MapperConfig, MappingOutcome, SegmentMapper};
use skein_ir::Layout;

use super::common::{check_capacity, load_circuit, load_coupling};

/// Execute the layout command.
///
/// Searches one initial mapping for the whole circuit. Qubits the circuit
/// never couples are placed on the lowest free physical qubits.
pub fn execute(circuit_path: &str, coupling_source: &str) -> Result<()> {
    let circuit = load_circuit(circuit_path)?;
    let graph = circuit
        .dependency_graph()
        .with_context(|| format!("Invalid circuit: {circuit_path}"))?;
    let coupling = load_coupling(coupling_source)?;
    check_capacity(&graph, &coupling)?;

    let config = MapperConfig::load(None).context("Failed to load mapper configuration")?;

    let layout = if graph.is_empty() {
        Some(Layout::new(graph.num_qubits()))
    } else {
        let mapper = SegmentMapper::new(&coupling, &config);
        match mapper.map(&graph, 0..=graph.len() - 1)? {
            MappingOutcome::Mapped(layout) => Some(layout),
            MappingOutcome::Conflicted(report) => {
                tracing::info!(
                    "No whole-circuit mapping: {} conflicts at depth {}",
                    report.conflicts.len(),
                    report.depth
                );
                None
            }
        }
    };

    match layout {
        Some(mut layout) => {
            layout
                .fill_unmapped(coupling.num_qubits())
                .context("Failed to complete the initial mapping")?;
            println!("Initial mapping exists");
            for (logical, physical) in layout.iter() {
                println!("{} {}", logical.0, physical);
            }
        }
        None => println!("No complete initial mapping exists"),
    }

    Ok(())
}
