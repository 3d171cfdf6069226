use super::runner::RunStatistics;
use crate::lattice::Structure;
use crate::observables::{Observables, SpinCounts};
use crate::parameters::SimulationParameters;
use tracing::info;

pub fn report_setup(structure: &Structure, params: &SimulationParameters) {
    let geometry = structure.geometry();
    info!(
        "\nLattice: {} {}x{}x{} (spacing {})",
        geometry.structure_type.label(),
        geometry.dimensions.x,
        geometry.dimensions.y,
        geometry.dimensions.z,
        geometry.spacing
    );
    info!("  Atoms: {}", structure.len());
    info!("  Bonds: {}", structure.bond_count());
    for (degree, count) in structure.degree_histogram() {
        info!("  Degree {:>2}: {} atoms", degree, count);
    }
    info!(
        "Parameters: T = {}, J = {}, B = {}, steps/tick = {}, energy refresh = {:?}",
        params.temperature,
        params.coupling,
        params.field,
        params.steps_per_tick,
        params.energy_refresh
    );
}

pub fn report_observables(tick: u64, observed: &Observables) {
    let SpinCounts { up, down } = observed.spins;
    info!(
        "Tick {:>6}: E = {:>12.4}  E/N = {:>8.4}  up = {:>6}  down = {:>6}  m = {:>+7.4}",
        tick, observed.total_energy, observed.energy_per_site, up, down, observed.magnetization
    );
}

pub fn report_summary(stats: &RunStatistics, params: &SimulationParameters) {
    info!("\nSimulation finished after {} ticks.", stats.ticks());
    info!("  Acceptance ratio:      {:.4}", stats.acceptance_ratio());
    info!("  Mean energy:           {:.6}", stats.mean_energy());
    info!("  Mean |m|:              {:.6}", stats.mean_abs_magnetization());
    info!(
        "  Specific heat / site:  {:.6}",
        stats.specific_heat(params.temperature)
    );
    info!(
        "  Susceptibility / site: {:.6}",
        stats.susceptibility(params.temperature)
    );
}
