//! Input/Output operations for lattice simulations
//!
//! This module handles logging setup and structure snapshots.

mod output;

pub use output::{save_snapshot, setup_output, write_snapshot};
