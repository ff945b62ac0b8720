//! Route command implementation.

use std::fs;

use anyhow::{Context, Result};
use console::style;

use skein_compile::{ConstructiveFallbacks, PassManagerBuilder, VerificationResult};
use skein_qasm::emit_routed;

use super::common::{check_capacity, load_circuit, load_config, load_coupling};

/// Execute the route command.
///
/// Status lines go to stderr so the routed circuit can be piped from stdout.
pub fn execute(
    circuit_path: &str,
    coupling_source: &str,
    output: Option<&str>,
    latency: Option<&[u32]>,
    config_file: Option<&str>,
    verify: bool,
) -> Result<()> {
    eprintln!(
        "{} Routing {} onto {}",
        style("→").cyan().bold(),
        style(circuit_path).green(),
        style(coupling_source).yellow()
    );

    let circuit = load_circuit(circuit_path)?;
    let graph = circuit
        .dependency_graph()
        .with_context(|| format!("Invalid circuit: {circuit_path}"))?;
    eprintln!(
        "  Loaded: {} gates on {} qubits, depth {}",
        graph.len(),
        graph.num_qubits(),
        graph.depth()
    );

    let coupling = load_coupling(coupling_source)?;
    eprintln!(
        "  Target: {} physical qubits, {} edges",
        coupling.num_qubits(),
        coupling.edges().len()
    );
    check_capacity(&graph, &coupling)?;

    let config = load_config(config_file, latency)?;
    let (pm, mut props) = PassManagerBuilder::new()
        .with_coupling_map(coupling)
        .with_config(config)
        .with_verification(verify)
        .build();

    let routed = pm.route(&graph, &mut props)?;

    if let Some(result) = props.get::<VerificationResult>() {
        eprintln!(
            "  Verified: {} segments, {} gates, {} swaps",
            result.segments_checked, result.gates_checked, result.swaps_checked
        );
    }
    if let Some(ConstructiveFallbacks(n)) = props.get::<ConstructiveFallbacks>() {
        if *n > 0 {
            eprintln!(
                "  {} {n} transitions used the constructive swap router",
                style("!").yellow().bold()
            );
        }
    }

    let emitted = emit_routed(&circuit, &routed).context("Failed to emit routed circuit")?;

    eprintln!("{} Routing complete", style("✓").green().bold());
    eprintln!(
        "  Result: {} mappings, {} swaps, depth {}, {} gates",
        emitted.summary.mappings, emitted.summary.swaps, emitted.summary.depth, emitted.summary.gates
    );

    match output {
        Some(path) => {
            fs::write(path, &emitted.text)
                .with_context(|| format!("Failed to write file: {path}"))?;
            eprintln!("  Output: {}", style(path).green());
        }
        None => print!("{}", emitted.text),
    }

    Ok(())
}
