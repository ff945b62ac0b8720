//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use skein_compile::{CompileError, CouplingMap, Latency, MapperConfig};
use skein_ir::DependencyGraph;
use skein_qasm::{ParsedCircuit, parse};

/// Load a circuit from an `OpenQASM` 2.0 file.
pub fn load_circuit(path: &str) -> Result<ParsedCircuit> {
    if !Path::new(path).exists() {
        anyhow::bail!("File not found: {path}");
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;

    parse(&source).with_context(|| format!("Failed to parse circuit: {path}"))
}

/// Load a coupling map from a file or a preset name.
///
/// Existing files ending in `.json` are read as serialized coupling maps,
/// other files in the `num_physical num_edges a b ...` text format. Anything
/// else is tried as a preset (`linear:5`, `grid:3x3`, ...).
pub fn load_coupling(source: &str) -> Result<CouplingMap> {
    let path = Path::new(source);

    if path.is_file() {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read coupling map: {source}"))?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let coupling = if is_json {
            CouplingMap::from_json(&text)
        } else {
            CouplingMap::parse(&text)
        };
        return coupling.with_context(|| format!("Invalid coupling map: {source}"));
    }

    if source.contains(':') {
        return CouplingMap::from_preset(source)
            .with_context(|| format!("Invalid coupling preset: {source}"));
    }

    anyhow::bail!(
        "Coupling map not found: '{source}'. Pass a file or a preset (linear:N, ring:N, star:N, full:N, grid:RxC)"
    )
}

/// Load the mapper configuration, applying a latency override if given.
pub fn load_config(config_file: Option<&str>, latency: Option<&[u32]>) -> Result<MapperConfig> {
    let mut config = MapperConfig::load(config_file.map(Path::new))
        .context("Failed to load mapper configuration")?;

    if let Some(values) = latency {
        let [single, two, swap] = values else {
            anyhow::bail!("--latency takes exactly three values, got {}", values.len());
        };
        config.latency = Latency {
            single: *single,
            two: *two,
            swap: *swap,
        };
        config.validate().context("Invalid latency override")?;
    }

    Ok(config)
}

/// Fail early if the circuit uses more qubits than the target provides.
pub fn check_capacity(graph: &DependencyGraph, coupling: &CouplingMap) -> Result<()> {
    if graph.num_qubits() > coupling.num_qubits() {
        return Err(CompileError::CircuitTooLarge {
            required: graph.num_qubits(),
            available: coupling.num_qubits(),
        }
        .into());
    }
    Ok(())
}
