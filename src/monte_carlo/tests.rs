use super::*;
use crate::energy::{hamiltonian, total_energy, update_energies, EnergyRefresh};
use crate::lattice::{build, Dimensions, LatticeGeometry, Spin, StructureType};
use approx::*;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Rng whose every draw is the same word, for pinning the acceptance sample
struct FixedRng(u64);

impl RngCore for FixedRng {
    fn next_u32(&mut self) -> u32 {
        self.0 as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.0
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for byte in dest.iter_mut() {
            *byte = self.0 as u8;
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

fn empty_structure() -> Structure {
    Structure::new(
        LatticeGeometry::new(StructureType::Cubic, Dimensions::new(1, 1, 1), 1.0),
        Vec::new(),
    )
}

#[test]
fn test_downhill_moves_always_accepted() {
    for temperature in [0.0, 1e-3, 1.0, 100.0] {
        let mut worst_draw = FixedRng(u64::MAX);
        assert!(metropolis_accept(-1e-9, temperature, &mut worst_draw));
        assert!(metropolis_accept(-8.0, temperature, &mut worst_draw));
    }
}

#[test]
fn test_zero_temperature_rejects_non_improving_moves() {
    let mut best_draw = FixedRng(0);
    assert!(!metropolis_accept(0.0, 0.0, &mut best_draw));
    assert!(!metropolis_accept(4.0, 0.0, &mut best_draw));
}

#[test]
fn test_uphill_acceptance_compares_uniform_draw() {
    // a zero draw is below any Boltzmann factor, a draw near one is above it
    assert!(metropolis_accept(4.0, 1.0, &mut FixedRng(0)));
    assert!(!metropolis_accept(4.0, 1.0, &mut FixedRng(u64::MAX)));
    assert!(metropolis_accept(0.0, 1.0, &mut FixedRng(u64::MAX)));
}

#[test]
fn test_single_atom_flip_always_accepted_above_zero_temperature() {
    let mut structure = build(StructureType::Cubic, 1, 1, 1, 1.0).unwrap();
    let params = SimulationParameters::new(1.0, 1.0, 0.0, 1);
    let mut rng = StdRng::seed_from_u64(1);

    for step in 0..50 {
        let before = structure.atoms()[0].spin();
        let attempt = monte_carlo_step(&mut structure, &params, &mut rng).unwrap();
        assert_eq!(attempt.index, 0);
        assert_eq!(attempt.delta_energy, 0.0);
        assert!(attempt.accepted, "step {}", step);
        assert_eq!(structure.atoms()[0].spin(), before.flipped());
    }
}

#[test]
fn test_single_atom_frozen_at_zero_temperature() {
    let mut structure = build(StructureType::Cubic, 1, 1, 1, 1.0).unwrap();
    let params = SimulationParameters::new(0.0, 1.0, 0.0, 25);
    let mut rng = StdRng::seed_from_u64(2);

    let summary = run_tick(&mut structure, &params, &mut rng).unwrap();
    assert_eq!(summary.attempted, 25);
    assert_eq!(summary.accepted, 0);
    assert_eq!(structure.atoms()[0].spin(), Spin::Up);
}

#[test]
fn test_zero_temperature_pair_relaxes_then_freezes() {
    // two BCC sites bonded to each other, anti-aligned
    let mut structure = build(StructureType::Bcc, 1, 1, 1, 2.0).unwrap();
    structure.set_spin(1, Spin::Down);
    let params = SimulationParameters::new(0.0, 1.0, 0.0, 1);
    update_energies(&mut structure, params.coupling, params.field);
    let mut rng = StdRng::seed_from_u64(9);

    let first = monte_carlo_step(&mut structure, &params, &mut rng).unwrap();
    assert!(first.accepted);
    assert_relative_eq!(first.delta_energy, -2.0);
    assert_eq!(structure.atoms()[0].spin(), structure.atoms()[1].spin());
    assert_relative_eq!(total_energy(&structure), -1.0);

    for _ in 0..20 {
        let attempt = monte_carlo_step(&mut structure, &params, &mut rng).unwrap();
        assert!(!attempt.accepted);
        assert_relative_eq!(attempt.delta_energy, 2.0);
    }
}

#[test]
fn test_empty_structure_is_rejected() {
    let mut structure = empty_structure();
    let params = SimulationParameters::default();
    let mut rng = StdRng::seed_from_u64(0);

    assert_eq!(
        monte_carlo_step(&mut structure, &params, &mut rng),
        Err(IsingError::EmptyStructure)
    );
    assert_eq!(
        run_tick(&mut structure, &params, &mut rng),
        Err(IsingError::EmptyStructure)
    );
}

#[test]
fn test_invalid_parameters_are_rejected() {
    let mut structure = build(StructureType::Cubic, 2, 2, 2, 1.0).unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    let params = SimulationParameters::new(-1.0, 1.0, 0.0, 10);

    assert!(matches!(
        run_tick(&mut structure, &params, &mut rng),
        Err(IsingError::InvalidParameter(_))
    ));
    assert!(matches!(
        monte_carlo_step(&mut structure, &params, &mut rng),
        Err(IsingError::InvalidParameter(_))
    ));
}

#[test]
fn test_single_step_does_not_need_a_batch_size() {
    let mut structure = build(StructureType::Cubic, 2, 2, 2, 1.0).unwrap();
    update_energies(&mut structure, 1.0, 0.0);
    let mut rng = StdRng::seed_from_u64(4);
    let params = SimulationParameters::new(1.0, 1.0, 0.0, 0);

    assert!(monte_carlo_step(&mut structure, &params, &mut rng).is_ok());
    assert!(matches!(
        run_tick(&mut structure, &params, &mut rng),
        Err(IsingError::InvalidParameter(_))
    ));
}

#[test]
fn test_step_keeps_total_energy_once_cache_is_filled() {
    let mut structure = build(StructureType::Fcc, 2, 2, 2, 1.0).unwrap();
    let mut rng = StdRng::seed_from_u64(8);
    structure.init_random_spins(&mut rng);
    update_energies(&mut structure, 1.0, 0.0);
    let params = SimulationParameters::new(3.0, 1.0, 0.0, 1);

    for _ in 0..200 {
        monte_carlo_step(&mut structure, &params, &mut rng).unwrap();
    }
    assert_relative_eq!(
        total_energy(&structure),
        hamiltonian(&structure, 1.0, 0.0),
        epsilon = 1e-9
    );
}

#[test]
fn test_cached_energies_stay_consistent() {
    for policy in [EnergyRefresh::Global, EnergyRefresh::Local] {
        let mut structure = build(StructureType::Hexagonal, 4, 4, 3, 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(21);
        structure.init_random_spins(&mut rng);

        let params = SimulationParameters::new(2.0, 1.0, 0.3, 200).with_energy_refresh(policy);
        update_energies(&mut structure, params.coupling, params.field);
        let start = hamiltonian(&structure, params.coupling, params.field);

        let mut accumulated = 0.0;
        for _ in 0..10 {
            let summary = run_tick(&mut structure, &params, &mut rng).unwrap();
            accumulated += summary.energy_change;
        }

        let mut fresh = structure.clone();
        update_energies(&mut fresh, params.coupling, params.field);
        for (cached, expected) in structure.iter().zip(fresh.iter()) {
            assert_relative_eq!(cached.energy(), expected.energy(), epsilon = 1e-9);
        }

        // a flip's ΔE is exactly the change of the bond Hamiltonian
        let end = hamiltonian(&structure, params.coupling, params.field);
        assert_relative_eq!(end - start, accumulated, epsilon = 1e-9);
    }
}

#[test]
fn test_low_temperature_lowers_energy() {
    let mut structure = build(StructureType::Cubic, 6, 6, 6, 1.0).unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    structure.init_random_spins(&mut rng);

    let params = SimulationParameters::new(0.5, 1.0, 0.0, structure.len());
    update_energies(&mut structure, params.coupling, params.field);
    let initial = total_energy(&structure);

    for _ in 0..200 {
        run_tick(&mut structure, &params, &mut rng).unwrap();
    }
    assert!(total_energy(&structure) < initial);
}

#[test]
fn test_strong_field_aligns_free_spins() {
    let mut structure = build(StructureType::Cubic, 4, 4, 4, 1.0).unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    structure.init_random_spins(&mut rng);

    let params = SimulationParameters::new(0.1, 0.0, 1.0, structure.len());
    update_energies(&mut structure, params.coupling, params.field);
    for _ in 0..50 {
        run_tick(&mut structure, &params, &mut rng).unwrap();
    }
    assert!(structure.spins().all(|s| s == Spin::Up));
}

#[test]
fn test_two_level_detailed_balance() {
    // isolated spin in a field: P(up) / P(down) = exp(2B / T)
    let mut structure = build(StructureType::Cubic, 1, 1, 1, 1.0).unwrap();
    let params = SimulationParameters::new(1.0, 0.0, 1.0, 1);
    let mut rng = StdRng::seed_from_u64(2024);

    let samples = 200_000;
    let mut up = 0usize;
    for _ in 0..samples {
        run_tick(&mut structure, &params, &mut rng).unwrap();
        if structure.atoms()[0].spin() == Spin::Up {
            up += 1;
        }
    }

    let expected = 2f64.exp() / (1.0 + 2f64.exp());
    assert_relative_eq!(up as f64 / samples as f64, expected, epsilon = 0.02);
}

#[test]
fn test_tick_summary_acceptance_ratio() {
    let summary = TickSummary {
        attempted: 8,
        accepted: 2,
        energy_change: -4.0,
    };
    assert_relative_eq!(summary.acceptance_ratio(), 0.25);
    assert_eq!(TickSummary::default().acceptance_ratio(), 0.0);
}
