//! Verification harness for the handshake adder.
//!
//! Wires an adder [`PipelineStage`](hsim_sim::PipelineStage) into a
//! [`Testbench`], drives it through the canonical scenarios with seeded random
//! operands, and checks every observed result against an independent golden
//! model. [`run_all`] runs the scenarios selected by an `hsim.toml`
//! configuration and reports each outcome to a
//! [`DiagnosticSink`](hsim_diagnostics::DiagnosticSink).

#![warn(missing_docs)]

pub mod error;
pub mod golden;
pub mod runner;
pub mod scenarios;
pub mod testbench;

pub use error::VerifyError;
pub use runner::{run_all, run_scenario, ScenarioResult};
pub use scenarios::{ScenarioOutcome, ScenarioParams};
pub use testbench::{BenchPorts, Port, Testbench};
