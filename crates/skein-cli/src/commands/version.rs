//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - segment-based qubit mapping and routing",
        style("Skein").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  skein-ir       Dependency graph, live ranges and layouts");
    println!("  skein-qasm     OpenQASM 2.0 reader and routed-circuit emitter");
    println!("  skein-compile  Segment mapping and swap routing passes");
    println!("  skein-cli      Command-line interface");
    println!();
    println!(
        "Repository: {}",
        style("https://github.com/skein-quantum/skein").underlined()
    );
    println!("License:    {}", style("Apache-2.0").dim());
}
