//! Tests for the model lifecycle: reset, stepping, limits, recording and cancellation

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tiledwfc::WfcError;
    use tiledwfc::algorithm::heuristics::Heuristic;
    use tiledwfc::algorithm::model::{Model, ModelConfig, RunStatus};
    use tiledwfc::analysis::distribution::AdjusterKind;
    use tiledwfc::spatial::direction::Direction;
    use tiledwfc::spatial::symmetry::SymmetryClass;
    use tiledwfc::spatial::tiles::{NeighborRule, TileCatalog, TileDefinition, TileRef, TileSet};

    /// Two tiles that must alternate in both axes
    fn checkerboard() -> Arc<TileSet> {
        let mut catalog = TileCatalog::new();
        catalog
            .add_tile(TileDefinition::new("black", SymmetryClass::X, 1.0))
            .add_tile(TileDefinition::new("white", SymmetryClass::X, 1.0))
            .add_rule(NeighborRule::new(TileRef::new("black", 0), TileRef::new("white", 0)))
            .add_rule(NeighborRule::new(TileRef::new("white", 0), TileRef::new("black", 0)));
        Arc::new(catalog.build().expect("catalog builds"))
    }

    fn model(width: usize, height: usize, periodic: bool) -> Model {
        let config = ModelConfig {
            periodic,
            ..ModelConfig::with_size(width, height)
        };
        Model::new(checkerboard(), &config).expect("valid model")
    }

    // Tests invalid configurations are rejected at construction
    // Verified by skipping validation in Model::new
    #[test]
    fn test_invalid_config() {
        assert!(Model::new(checkerboard(), &ModelConfig::with_size(0, 4)).is_err());

        let duplicated = ModelConfig {
            adjusters: vec![AdjusterKind::Coherence, AdjusterKind::Coherence],
            ..ModelConfig::default()
        };
        assert!(matches!(
            Model::new(checkerboard(), &duplicated),
            Err(WfcError::InvalidParameter { .. })
        ));
    }

    // Tests stepping before the first reset fails
    // Verified by treating Uninitialized as Running
    #[test]
    fn test_step_requires_reset() {
        let mut model = model(3, 3, false);
        assert_eq!(model.status(), RunStatus::Uninitialized);
        assert!(matches!(model.step(), Err(WfcError::NotStarted)));
    }

    // Tests a bounded checkerboard solves with alternating colours
    // Verified by propagating in the wrong direction
    #[test]
    fn test_checkerboard_solves() {
        let mut model = model(5, 4, false);
        let status = model.run(9, None).expect("run completes");
        assert_eq!(status, RunStatus::Solved);
        assert!(model.is_fully_observed());
        assert_eq!(model.steps(), 1);

        let grid = *model.grid();
        for cell in 0..grid.cell_count() {
            for (_, neighbor) in grid.neighbors(cell) {
                assert_ne!(model.observed(cell), model.observed(neighbor));
            }
        }
    }

    // Tests an odd periodic checkerboard contradicts for every seed
    // Verified by ignoring emptied domains during propagation
    #[test]
    fn test_odd_periodic_contradicts() {
        let mut model = model(3, 3, true);
        for seed in 0..10 {
            assert_eq!(model.run(seed, None).ok(), Some(RunStatus::Contradicted));
            assert!(model.step().is_ok_and(|status| status == RunStatus::Contradicted));
        }
    }

    // Tests the step limit leaves an undecided grid running with nothing committed
    // Verified by committing every cell when the limit is hit
    #[test]
    fn test_step_limit() {
        let mut model = model(4, 4, false);
        assert_eq!(model.run(1, Some(0)).ok(), Some(RunStatus::Running));
        assert_eq!(model.steps(), 0);
        assert!(model.observed_tiles().iter().all(Option::is_none));
        assert_eq!(model.step().ok(), Some(RunStatus::Running));
    }

    // Tests a grid decided exactly at the step limit reports solved
    // Verified by returning the running status whenever the limit is hit
    #[test]
    fn test_step_limit_on_decided_grid() {
        let mut model = model(4, 4, false);
        assert_eq!(model.run(1, Some(1)).ok(), Some(RunStatus::Solved));
        assert_eq!(model.status(), RunStatus::Solved);
        assert_eq!(model.steps(), 1);
        assert!(model.is_fully_observed());
        assert_eq!(model.step().ok(), Some(RunStatus::Solved));
        assert_eq!(model.steps(), 1);
    }

    // Tests the recorder captures the state committed at the step limit
    // Verified by skipping the recorder when the limit is hit
    #[test]
    fn test_step_limit_records_final_state() {
        let mut model = model(3, 3, false);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        model.set_step_recorder(
            move |model, index| {
                if let Ok(mut entries) = log.lock() {
                    entries.push((index, model.status(), model.is_fully_observed()));
                }
            },
            None,
        );

        model.run(8, Some(1)).expect("run completes");
        let recorded = seen.lock().map(|entries| entries.clone()).unwrap_or_default();
        assert_eq!(
            recorded,
            vec![
                (0, RunStatus::Running, false),
                (1, RunStatus::Running, false),
                (2, RunStatus::Solved, true),
            ]
        );

        if let Ok(mut entries) = seen.lock() {
            entries.clear();
        }
        model.run(8, Some(0)).expect("run completes");
        let recorded = seen.lock().map(|entries| entries.clone()).unwrap_or_default();
        assert_eq!(
            recorded,
            vec![(0, RunStatus::Running, false), (1, RunStatus::Running, false)]
        );
    }

    // Tests cancellation is honoured between steps
    // Verified by ignoring the cancel flag
    #[test]
    fn test_cancellation() {
        let mut model = model(4, 4, false);
        let cancel = AtomicBool::new(true);
        let status = model.run_until(3, None, &cancel).expect("run stops");
        assert_eq!(status, RunStatus::Running);
        assert_eq!(model.steps(), 0);
        assert!(model.domain(0).is_some_and(|domain| domain.is_full()));
    }

    // Tests the recorder fires after reset and every step, up to its limit
    // Verified by recording before the limit check
    #[test]
    fn test_step_recorder_limit() {
        let mut model = model(4, 4, false);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        model.set_step_recorder(
            move |_, _| {
                counter.fetch_add(1, Ordering::Relaxed);
            },
            None,
        );
        model.run(5, None).expect("run completes");
        assert_eq!(calls.load(Ordering::Relaxed), 3);

        let limited = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&limited);
        model.set_step_recorder(
            move |_, _| {
                counter.fetch_add(1, Ordering::Relaxed);
            },
            Some(2),
        );
        model.run(5, None).expect("run completes");
        assert_eq!(limited.load(Ordering::Relaxed), 2);

        model.clear_step_recorder();
        model.run(5, None).expect("run completes");
        assert_eq!(limited.load(Ordering::Relaxed), 2);
    }

    // Tests the recorder sees the model state and frame index
    // Verified by passing the step count as the index
    #[test]
    fn test_step_recorder_observes_state() {
        let mut model = model(3, 3, false);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        model.set_step_recorder(
            move |model, index| {
                if let Ok(mut entries) = log.lock() {
                    entries.push((index, model.status(), model.steps()));
                }
            },
            None,
        );
        model.run(8, None).expect("run completes");

        let recorded = seen.lock().map(|entries| entries.clone()).unwrap_or_default();
        assert_eq!(
            recorded,
            vec![
                (0, RunStatus::Running, 0),
                (1, RunStatus::Running, 1),
                (2, RunStatus::Solved, 1),
            ]
        );
    }

    // Tests identical seeds reproduce identical grids
    // Verified by seeding the random source from the clock
    #[test]
    fn test_determinism() {
        let tiles = checkerboard();
        let config = ModelConfig {
            heuristic: Heuristic::Mrv,
            ..ModelConfig::with_size(6, 6)
        };
        let mut first = Model::new(Arc::clone(&tiles), &config).expect("valid model");
        let mut second = Model::new(tiles, &config).expect("valid model");
        first.run(77, None).expect("run completes");
        second.run(77, None).expect("run completes");
        assert_eq!(first.observed_tiles(), second.observed_tiles());
    }

    // Tests reset restores a fresh wave and clears usage
    // Verified by keeping usage counters across resets
    #[test]
    fn test_reset_restores_wave() {
        let mut model = model(4, 4, false);
        model.run(2, None).expect("run completes");
        assert_eq!(model.usage().iter().sum::<u32>(), 1);

        model.reset(2);
        assert_eq!(model.status(), RunStatus::Running);
        assert!(model.usage().iter().all(|&count| count == 0));
        assert!(!model.wave().has_pending());
        let propagator = model.tiles().propagator();
        for cell in 0..model.grid().cell_count() {
            assert_eq!(model.wave().remaining(cell), 2);
            assert_eq!(model.observed(cell), None);
            for tile in 0..2 {
                for direction in Direction::ALL {
                    let expected = propagator.support(direction, tile) as i32;
                    assert_eq!(model.wave().compatibility(cell, tile, direction), expected);
                }
            }
        }
    }

    // Tests rendering candidates carry the tile weights
    // Verified by returning banned tiles as candidates
    #[test]
    fn test_cell_candidates() {
        let mut model = model(2, 2, false);
        model.reset(0);
        assert_eq!(model.cell_candidates(0), vec![(0, 1.0), (1, 1.0)]);
        model.run(0, None).expect("run completes");
        assert_eq!(model.cell_candidates(0).len(), 1);
        assert_eq!(model.heuristic(), Heuristic::Entropy);
        assert_eq!(
            model.pipeline().kinds(),
            vec![AdjusterKind::Contextual, AdjusterKind::Coherence]
        );
    }
}
