//! `OpenQASM` 2.0 reader and routed-circuit emitter for Skein.
//!
//! The reader accepts the subset of QASM 2.0 the router can map: register
//! declarations, includes, and gates with one or two qubit operands
//! (including `measure` and `reset`). Barriers are dropped; gate definitions,
//! conditionals and register-wide operands are rejected with a typed error.
//!
//! The emitter writes a [`RoutedCircuit`](skein_ir::RoutedCircuit) back out on
//! the physical register, with mapping and swap annotations as comments.
//!
//! # Example
//!
//! ```rust
//! use skein_qasm::parse;
//!
//! let source = r#"
//!     OPENQASM 2.0;
//!     include "qelib1.inc";
//!     qreg q[2];
//!     h q[0];
//!     cx q[0], q[1];
//! "#;
//!
//! let circuit = parse(source).unwrap();
//! let graph = circuit.dependency_graph().unwrap();
//! assert_eq!(graph.len(), 2);
//! assert_eq!(graph.depth(), 2);
//! ```

pub mod emitter;
pub mod error;
pub mod lexer;
pub mod parser;

pub use emitter::{EmittedCircuit, RoutingSummary, emit_routed};
pub use error::{ParseError, ParseResult};
pub use parser::{ParsedCircuit, Register, parse};
