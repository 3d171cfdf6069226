//! Ising lattice command-line interface
//!
//! Runs a Metropolis simulation configured from YAML and command-line flags.

use color_eyre::eyre::Result;
use ising_lattice::app::IsingApplication;

fn main() -> Result<()> {
    color_eyre::install()?;
    IsingApplication::from_cli()?.run()
}
