//! CLI command parsing and end-to-end tests.
//!
//! Tests cover argument parsing (via clap `try_parse_from`), the loaders the
//! commands share, and runs of the built `skein` binary on scratch files.

// ============================================================================
// Coupling map loading
// ============================================================================

mod coupling_loading {
    use skein_compile::CouplingMap;

    #[test]
    fn test_preset_linear() {
        let cm = CouplingMap::from_preset("linear:5").unwrap();
        assert_eq!(cm.num_qubits(), 5);
        assert_eq!(cm.edges().len(), 4);
    }

    #[test]
    fn test_preset_grid() {
        let cm = CouplingMap::from_preset("grid:2x3").unwrap();
        assert_eq!(cm.num_qubits(), 6);
        assert_eq!(cm.edges().len(), 7);
    }

    #[test]
    fn test_unknown_preset() {
        assert!(CouplingMap::from_preset("hexagon:7").is_err());
    }

    #[test]
    fn test_text_format_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("line.txt");
        std::fs::write(&path, "3 2\n0 1\n1 2\n").unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let cm = CouplingMap::parse(&text).unwrap();
        assert!(cm.is_connected(0, 1));
        assert!(cm.is_connected(2, 1));
        assert!(!cm.is_connected(0, 2));
    }

    #[test]
    fn test_json_format_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ring.json");
        let json = serde_json::to_string(&CouplingMap::ring(4)).unwrap();
        std::fs::write(&path, json).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let cm = CouplingMap::from_json(&text).unwrap();
        assert_eq!(cm.num_qubits(), 4);
        assert_eq!(cm.distance(0, 2), Some(2));
    }
}

// ============================================================================
// Circuit loading
// ============================================================================

mod circuit_loading {
    use skein_qasm::parse;

    #[test]
    fn test_parse_valid_qasm() {
        let source = "OPENQASM 2.0;\ninclude \"qelib1.inc\";\nqreg q[2];\nh q[0];\ncx q[0], q[1];\n";
        let circuit = parse(source).unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.gates.len(), 2);
    }

    #[test]
    fn test_parse_invalid_qasm() {
        assert!(parse("OPENQASM 2.0;\nqreg q[2];\ncx q[0] q[1];\n").is_err());
    }

    #[test]
    fn test_parse_rejects_same_qubit_twice() {
        let circuit = parse("OPENQASM 2.0;\nqreg q[2];\ncx q[1], q[1];\n");
        let graph = circuit.and_then(|c| c.dependency_graph());
        assert!(graph.is_err());
    }

    #[test]
    fn test_load_circuit_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bell.qasm");
        std::fs::write(&path, "OPENQASM 2.0;\nqreg q[2];\nh q[0];\ncx q[0], q[1];\n").unwrap();

        let source = std::fs::read_to_string(&path).unwrap();
        let graph = parse(&source).unwrap().dependency_graph().unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.num_two_qubit_gates(), 1);
    }
}

// ============================================================================
// Argument parsing
// ============================================================================

mod clap_parsing {
    use clap::{Parser, Subcommand};

    /// Mirror of the binary's CLI definition.
    #[derive(Parser, Debug)]
    #[command(name = "skein")]
    struct TestCli {
        #[arg(short, long, action = clap::ArgAction::Count, global = true)]
        verbose: u8,

        #[command(subcommand)]
        command: TestCommands,
    }

    #[derive(Subcommand, Debug)]
    enum TestCommands {
        Route {
            circuit: String,
            coupling: String,
            #[arg(short, long)]
            output: Option<String>,
            #[arg(long, num_args = 3, value_names = ["L1", "L2", "LSWAP"])]
            latency: Option<Vec<u32>>,
            #[arg(short, long)]
            config: Option<String>,
            #[arg(long)]
            no_verify: bool,
        },
        Layout {
            circuit: String,
            coupling: String,
        },
        Version,
    }

    fn parse(args: &[&str]) -> Result<TestCli, clap::Error> {
        TestCli::try_parse_from(args)
    }

    #[test]
    fn test_parse_route_minimal() {
        let cli = parse(&["skein", "route", "in.qasm", "linear:5"]).unwrap();
        match cli.command {
            TestCommands::Route {
                circuit,
                coupling,
                output,
                latency,
                config,
                no_verify,
            } => {
                assert_eq!(circuit, "in.qasm");
                assert_eq!(coupling, "linear:5");
                assert!(output.is_none());
                assert!(latency.is_none());
                assert!(config.is_none());
                assert!(!no_verify);
            }
            _ => panic!("expected route"),
        }
    }

    #[test]
    fn test_parse_route_with_all_args() {
        let cli = parse(&[
            "skein",
            "route",
            "in.qasm",
            "device.txt",
            "-o",
            "out.qasm",
            "--latency",
            "1",
            "2",
            "6",
            "--config",
            "mapper.yaml",
            "--no-verify",
        ])
        .unwrap();
        match cli.command {
            TestCommands::Route {
                output,
                latency,
                config,
                no_verify,
                ..
            } => {
                assert_eq!(output.as_deref(), Some("out.qasm"));
                assert_eq!(latency, Some(vec![1, 2, 6]));
                assert_eq!(config.as_deref(), Some("mapper.yaml"));
                assert!(no_verify);
            }
            _ => panic!("expected route"),
        }
    }

    #[test]
    fn test_parse_route_latency_needs_three_values() {
        assert!(parse(&["skein", "route", "in.qasm", "linear:5", "--latency", "1", "2"]).is_err());
    }

    #[test]
    fn test_parse_route_missing_coupling() {
        assert!(parse(&["skein", "route", "in.qasm"]).is_err());
    }

    #[test]
    fn test_parse_layout() {
        let cli = parse(&["skein", "layout", "in.qasm", "grid:3x3"]).unwrap();
        assert!(matches!(cli.command, TestCommands::Layout { .. }));
    }

    #[test]
    fn test_parse_version() {
        let cli = parse(&["skein", "version"]).unwrap();
        assert!(matches!(cli.command, TestCommands::Version));
    }

    #[test]
    fn test_parse_verbose_vv() {
        let cli = parse(&["skein", "-vv", "version"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_no_subcommand() {
        assert!(parse(&["skein"]).is_err());
    }
}

// ============================================================================
// End-to-end runs of the binary
// ============================================================================

mod end_to_end {
    use std::path::Path;
    use std::process::{Command, Output};

    const TRIANGLE: &str = "OPENQASM 2.0;\ninclude \"qelib1.inc\";\nqreg q[3];\ncreg c[3];\n\
                            cx q[0], q[1];\ncx q[1], q[2];\ncx q[0], q[2];\nmeasure q[2] -> c[2];\n";

    fn skein(args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_skein"))
            .args(args)
            .env_remove("SKEIN_MAPPER_CALL_LIMIT")
            .env_remove("SKEIN_SWAP_NODE_LIMIT")
            .env_remove("SKEIN_ISLAND_ORDER")
            .output()
            .unwrap()
    }

    fn write(dir: &Path, name: &str, contents: &str) -> String {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_route_to_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let circuit = write(dir.path(), "triangle.qasm", TRIANGLE);

        let out = skein(&["route", &circuit, "linear:3"]);
        assert!(out.status.success());

        let text = String::from_utf8(out.stdout).unwrap();
        assert!(text.starts_with("//Number of Swaps: "));
        assert!(text.contains("//Number of Mappings: 2"));
        assert!(text.contains("qreg q[3];"));
        assert!(text.contains("creg c[3];"));
        assert!(text.contains("//Inserted 1 Swap Gates"));
        assert_eq!(text.matches("//Location of qubits:").count(), 2);
    }

    #[test]
    fn test_route_to_file_with_text_coupling() {
        let dir = tempfile::tempdir().unwrap();
        let circuit = write(dir.path(), "triangle.qasm", TRIANGLE);
        let coupling = write(dir.path(), "device.txt", "4 3 0 1 1 2 2 3");
        let output = dir.path().join("routed.qasm");
        let output = output.to_string_lossy();

        let out = skein(&[
            "route", &circuit, &coupling, "-o", &output, "--latency", "1", "2", "6",
        ]);
        assert!(out.status.success());
        assert!(out.stdout.is_empty());

        let text = std::fs::read_to_string(output.as_ref()).unwrap();
        assert!(text.contains("qreg q[4];"));
        skein_qasm::parse(&text).unwrap();
    }

    #[test]
    fn test_route_capacity_violation_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let circuit = write(dir.path(), "triangle.qasm", TRIANGLE);
        let output = dir.path().join("routed.qasm");

        let out = skein(&["route", &circuit, "linear:2", "-o", &output.to_string_lossy()]);
        assert_eq!(out.status.code(), Some(1));
        assert!(!output.exists());

        let stderr = String::from_utf8(out.stderr).unwrap();
        assert!(stderr.contains("Error:"));
        assert!(stderr.contains("requires 3 qubits"));
    }

    #[test]
    fn test_route_missing_circuit() {
        let out = skein(&["route", "/nonexistent/circuit.qasm", "linear:3"]);
        assert_eq!(out.status.code(), Some(1));
        assert!(String::from_utf8(out.stderr).unwrap().contains("File not found"));
    }

    #[test]
    fn test_route_rejects_zero_latency() {
        let dir = tempfile::tempdir().unwrap();
        let circuit = write(dir.path(), "triangle.qasm", TRIANGLE);

        let out = skein(&["route", &circuit, "linear:3", "--latency", "1", "0", "3"]);
        assert_eq!(out.status.code(), Some(1));
    }

    #[test]
    fn test_layout_exists_on_path() {
        let dir = tempfile::tempdir().unwrap();
        let circuit = write(
            dir.path(),
            "chain.qasm",
            "OPENQASM 2.0;\nqreg q[3];\ncx q[0], q[1];\ncx q[1], q[2];\n",
        );

        let out = skein(&["layout", &circuit, "linear:4"]);
        assert!(out.status.success());

        let text = String::from_utf8(out.stdout).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Initial mapping exists"));
        assert_eq!(lines.count(), 3);
    }

    #[test]
    fn test_layout_missing_for_triangle_on_path() {
        let dir = tempfile::tempdir().unwrap();
        let circuit = write(dir.path(), "triangle.qasm", TRIANGLE);

        let out = skein(&["layout", &circuit, "linear:3"]);
        assert!(out.status.success());
        assert_eq!(
            String::from_utf8(out.stdout).unwrap().trim(),
            "No complete initial mapping exists"
        );
    }

    #[test]
    fn test_version() {
        let out = skein(&["version"]);
        assert!(out.status.success());
        assert!(String::from_utf8(out.stdout).unwrap().contains("skein-compile"));
    }
}
