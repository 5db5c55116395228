pub mod agent;
pub mod cli;
pub mod commands;
pub mod config;
pub mod eval;
pub mod shared;
pub mod synth;
pub mod triage;
pub mod workflow;
