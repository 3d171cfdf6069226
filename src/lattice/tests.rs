use super::*;
use approx::*;

fn assert_valid_topology(structure: &Structure) {
    let n = structure.len();
    for (i, atom) in structure.iter().enumerate() {
        let mut seen = atom.neighbors().to_vec();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), atom.degree(), "duplicate neighbor on atom {}", i);

        for &j in atom.neighbors() {
            assert!(j < n, "neighbor index {} out of bounds", j);
            assert_ne!(i, j, "atom {} lists itself as neighbor", i);
            assert!(
                structure.atoms()[j].neighbors().contains(&i),
                "bond {} -> {} is not symmetric",
                i,
                j
            );
        }
    }
}

fn index_at(structure: &Structure, position: Vector3<f64>) -> usize {
    structure
        .find_atom(&position, 1e-6)
        .unwrap_or_else(|| panic!("no atom at {:?}", position))
}

#[test]
fn test_cubic_2x2x2_scenario() {
    let structure = build(StructureType::Cubic, 2, 2, 2, 1.0).unwrap();
    assert_eq!(structure.len(), 8);

    let origin = index_at(&structure, Vector3::new(0.0, 0.0, 0.0));
    let mut neighbor_positions: Vec<Vector3<f64>> = structure.atoms()[origin]
        .neighbors()
        .iter()
        .map(|&j| *structure.atoms()[j].position())
        .collect();
    neighbor_positions.sort_by(|a, b| b.x.total_cmp(&a.x).then(b.y.total_cmp(&a.y)));
    assert_eq!(
        neighbor_positions,
        vec![
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ]
    );

    let far_corner = index_at(&structure, Vector3::new(1.0, 1.0, 1.0));
    assert_eq!(structure.atoms()[far_corner].degree(), 3);
    assert_eq!(structure.bond_count(), 12);
}

#[test]
fn test_cubic_flat_index_layout() {
    let structure = build(StructureType::Cubic, 3, 4, 5, 2.0).unwrap();
    assert_eq!(structure.len(), 60);

    // i * y * z + j * z + k with (i, j, k) = (2, 1, 3)
    let atom = &structure.atoms()[2 * 4 * 5 + 5 + 3];
    assert_relative_eq!(atom.position().x, 4.0);
    assert_relative_eq!(atom.position().y, 2.0);
    assert_relative_eq!(atom.position().z, 6.0);
}

#[test]
fn test_bcc_single_cell_scenario() {
    let structure = build(StructureType::Bcc, 1, 1, 1, 2.0).unwrap();
    assert_eq!(structure.len(), 2);

    let corner = index_at(&structure, Vector3::new(0.0, 0.0, 0.0));
    let center = index_at(&structure, Vector3::new(1.0, 1.0, 1.0));
    assert_eq!(structure.atoms()[corner].neighbors(), &[center]);
    assert_eq!(structure.atoms()[center].neighbors(), &[corner]);
}

#[test]
fn test_neighbor_symmetry_all_types() {
    for structure_type in StructureType::ALL {
        for (x, y, z) in [(1, 1, 1), (2, 3, 1), (4, 3, 5)] {
            let structure = build(structure_type, x, y, z, 1.5).unwrap();
            assert_valid_topology(&structure);
        }
    }
}

#[test]
fn test_interior_coordination_cubic() {
    let structure = build(StructureType::Cubic, 3, 3, 3, 1.0).unwrap();
    let center = index_at(&structure, Vector3::new(1.0, 1.0, 1.0));
    assert_eq!(structure.atoms()[center].degree(), 6);
}

#[test]
fn test_interior_coordination_hexagonal() {
    let (x, y, z) = (6, 6, 6);
    let structure = build(StructureType::Hexagonal, x, y, z, 1.0).unwrap();

    // one interior atom on an A layer and one on a B layer
    for layer in [2usize, 3] {
        let index = layer * y * x + 3 * x + 3;
        assert_eq!(structure.atoms()[index].degree(), 12, "layer {}", layer);
    }
}

#[test]
fn test_hexagonal_bonds_have_lattice_constant_length() {
    let a = 2.0;
    let structure = build(StructureType::Hexagonal, 5, 5, 4, a).unwrap();
    for (i, j) in structure.bonds() {
        let length = (structure.atoms()[i].position() - structure.atoms()[j].position()).norm();
        assert_relative_eq!(length, a, epsilon = 1e-9);
    }
}

#[test]
fn test_single_hexagonal_layer_is_triangular() {
    let structure = build(StructureType::Hexagonal, 5, 5, 1, 1.0).unwrap();
    let max_degree = structure.degree_histogram().keys().copied().max().unwrap();
    assert_eq!(max_degree, 6);
}

#[test]
fn test_interior_coordination_fcc() {
    let structure = build(StructureType::Fcc, 4, 4, 4, 1.0).unwrap();
    assert_eq!(structure.len(), 4 * 4 * 4 * 4);

    let corner = index_at(&structure, Vector3::new(2.0, 2.0, 2.0));
    let face = index_at(&structure, Vector3::new(2.5, 2.5, 2.0));
    assert_eq!(structure.atoms()[corner].degree(), 12);
    assert_eq!(structure.atoms()[face].degree(), 12);
}

#[test]
fn test_interior_coordination_bcc() {
    let structure = build(StructureType::Bcc, 4, 4, 4, 1.0).unwrap();
    assert_eq!(structure.len(), 2 * 4 * 4 * 4);

    let corner = index_at(&structure, Vector3::new(2.0, 2.0, 2.0));
    let center = index_at(&structure, Vector3::new(2.5, 2.5, 2.5));
    assert_eq!(structure.atoms()[corner].degree(), 8);
    assert_eq!(structure.atoms()[center].degree(), 8);
}

#[test]
fn test_degree_never_exceeds_coordination_number() {
    for structure_type in StructureType::ALL {
        let structure = build(structure_type, 5, 5, 5, 1.0).unwrap();
        let max_degree = structure.degree_histogram().keys().copied().max().unwrap();
        assert_eq!(max_degree, structure_type.coordination_number(), "{}", structure_type);
    }
}

#[test]
fn test_boundary_atoms_have_fewer_neighbors() {
    let structure = build(StructureType::Fcc, 3, 3, 3, 1.0).unwrap();
    let origin = index_at(&structure, Vector3::new(0.0, 0.0, 0.0));
    assert!(structure.atoms()[origin].degree() < 12);
}

#[test]
fn test_rebuild_is_idempotent() {
    for structure_type in StructureType::ALL {
        let first = build(structure_type, 3, 4, 2, 1.7).unwrap();
        let second = build(structure_type, 3, 4, 2, 1.7).unwrap();
        assert_eq!(first.len(), second.len());
        assert_eq!(first.degree_histogram(), second.degree_histogram());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.position(), b.position());
            assert_eq!(a.neighbors(), b.neighbors());
        }
    }
}

#[test]
fn test_invalid_dimensions_are_rejected() {
    for (x, y, z) in [(0, 1, 1), (1, 0, 1), (1, 1, 0)] {
        assert!(matches!(
            build(StructureType::Cubic, x, y, z, 1.0),
            Err(IsingError::InvalidDimension(_))
        ));
    }
    for distance in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            build(StructureType::Bcc, 2, 2, 2, distance),
            Err(IsingError::InvalidDimension(_))
        ));
    }
}

#[test]
fn test_non_finite_extent_is_rejected() {
    for structure_type in StructureType::ALL {
        assert!(matches!(
            build(structure_type, 3, 1, 1, 1e308),
            Err(IsingError::InvalidDimension(_))
        ));
    }
    // 1e300 * 4 stays finite
    let geometry = LatticeGeometry::new(StructureType::Fcc, Dimensions::new(3, 1, 1), 1e300);
    assert!(geometry.validate().is_ok());
}

#[test]
fn test_oversized_grids_are_rejected() {
    assert_eq!(Dimensions::new(usize::MAX, 2, 1).cell_count(), None);
    assert!(matches!(
        build(StructureType::Cubic, usize::MAX, 2, 1, 1.0),
        Err(IsingError::InvalidDimension(_))
    ));

    // fits in usize but not under the atom limit
    assert!(matches!(
        build(StructureType::Cubic, 1 << 12, 1 << 12, 2, 1.0),
        Err(IsingError::InvalidDimension(_))
    ));
    // the FCC basis multiplies the cell count by four
    let fcc = LatticeGeometry::new(StructureType::Fcc, Dimensions::new(256, 256, 128), 1.0);
    assert_eq!(fcc.atom_capacity(), Some(MAX_ATOMS * 2));
    assert!(fcc.validate().is_err());

    let limit = LatticeGeometry::new(StructureType::Cubic, Dimensions::new(256, 256, 256), 1.0);
    assert_eq!(limit.atom_capacity(), Some(MAX_ATOMS));
    assert!(limit.validate().is_ok());
}

#[test]
fn test_structure_type_parsing() {
    assert_eq!("FCC".parse::<StructureType>().unwrap(), StructureType::Fcc);
    assert_eq!("hcp".parse::<StructureType>().unwrap(), StructureType::Hexagonal);
    assert_eq!(" cubic ".parse::<StructureType>().unwrap(), StructureType::Cubic);
    assert_eq!(
        "diamond".parse::<StructureType>(),
        Err(IsingError::InvalidStructureType("diamond".to_string()))
    );
    for structure_type in StructureType::ALL {
        assert_eq!(structure_type.to_string().parse::<StructureType>().unwrap(), structure_type);
    }
}

#[test]
fn test_random_spins_cover_both_orientations() {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    let mut structure = build(StructureType::Cubic, 6, 6, 6, 1.0).unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    structure.init_random_spins(&mut rng);

    let up = structure.spins().filter(|&s| s == Spin::Up).count();
    let fraction = up as f64 / structure.len() as f64;
    assert!(fraction > 0.35 && fraction < 0.65, "up fraction {}", fraction);

    structure.align_spins(Spin::Down);
    assert!(structure.spins().all(|s| s == Spin::Down));
}

#[test]
fn test_spin_values() {
    assert_eq!(Spin::Up.value(), 1);
    assert_eq!(Spin::Down.value(), -1);
    assert_eq!(Spin::Up.flipped(), Spin::Down);
    assert_eq!(Spin::Down.flipped().flipped(), Spin::Down);
}
