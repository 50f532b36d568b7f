//! Tests for restart orchestration

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tiledwfc::WfcError;
    use tiledwfc::algorithm::model::{ModelConfig, RunStatus};
    use tiledwfc::io::configuration::EXTRA_FRAMES;
    use tiledwfc::io::generator::{Generator, GeneratorConfig};
    use tiledwfc::spatial::symmetry::SymmetryClass;
    use tiledwfc::spatial::tiles::{NeighborRule, TileCatalog, TileDefinition, TileRef, TileSet};

    fn checkerboard() -> Arc<TileSet> {
        let mut catalog = TileCatalog::new();
        catalog
            .add_tile(TileDefinition::new("black", SymmetryClass::X, 1.0))
            .add_tile(TileDefinition::new("white", SymmetryClass::X, 1.0))
            .add_rule(NeighborRule::new(TileRef::new("black", 0), TileRef::new("white", 0)))
            .add_rule(NeighborRule::new(TileRef::new("white", 0), TileRef::new("black", 0)));
        Arc::new(catalog.build().expect("catalog builds"))
    }

    fn odd_periodic() -> ModelConfig {
        ModelConfig {
            periodic: true,
            ..ModelConfig::with_size(3, 3)
        }
    }

    // Tests a solvable grid is accepted on the first attempt
    // Verified by rejecting solved attempts
    #[test]
    fn test_first_attempt_accepted() {
        let config = GeneratorConfig {
            seed: 11,
            ..GeneratorConfig::default()
        };
        let generator = Generator::new(checkerboard(), ModelConfig::with_size(4, 4), config)
            .expect("valid generator");
        let generation = generator.generate().expect("solved");

        assert_eq!(generation.attempts, 1);
        assert_eq!(generation.seed, 11);
        assert_eq!(generation.status(), RunStatus::Solved);
        assert!(generation.frames.is_empty());
    }

    // Tests every attempt contradicting exhausts the budget
    // Verified by accepting contradicted attempts
    #[test]
    fn test_exhausted_attempts() {
        let config = GeneratorConfig {
            seed: 40,
            restarts: 3,
            ..GeneratorConfig::default()
        };
        let generator =
            Generator::new(checkerboard(), odd_periodic(), config).expect("valid generator");

        match generator.generate() {
            Err(WfcError::ExhaustedAttempts {
                attempts,
                last_seed,
            }) => {
                assert_eq!(attempts, 3);
                assert_eq!(last_seed, 42);
            }
            Err(error) => unreachable!("unexpected error: {error}"),
            Ok(_) => unreachable!("odd periodic checkerboard cannot be solved"),
        }
    }

    // Tests batched attempts exhaust the same way
    // Verified by stopping after the first batch
    #[test]
    fn test_batched_exhaustion() {
        let config = GeneratorConfig {
            restarts: 5,
            parallel_batch: Some(2),
            ..GeneratorConfig::default()
        };
        let generator =
            Generator::new(checkerboard(), odd_periodic(), config).expect("valid generator");
        assert!(matches!(
            generator.generate(),
            Err(WfcError::ExhaustedAttempts { attempts: 5, .. })
        ));
    }

    // Tests parallel batches pick the same attempt as sequential runs
    // Verified by taking the last success of a batch
    #[test]
    fn test_parallel_matches_sequential() {
        let tiles = checkerboard();
        let model = ModelConfig::with_size(6, 5);
        let sequential_config = GeneratorConfig::default();
        let sequential = Generator::new(Arc::clone(&tiles), model.clone(), sequential_config)
            .expect("valid generator")
            .generate()
            .expect("solved");
        let parallel_config = GeneratorConfig {
            parallel_batch: Some(4),
            ..GeneratorConfig::default()
        };
        let parallel = Generator::new(tiles, model, parallel_config)
            .expect("valid generator")
            .generate()
            .expect("solved");

        assert_eq!(sequential.seed, parallel.seed);
        assert_eq!(sequential.attempts, parallel.attempts);
        assert_eq!(sequential.model.observed_tiles(), parallel.model.observed_tiles());
    }

    // Tests a step-limited attempt is returned unfinished
    // Verified by restarting attempts that hit the limit
    #[test]
    fn test_step_limit_accepted() {
        let config = GeneratorConfig {
            limit: Some(0),
            ..GeneratorConfig::default()
        };
        let generation = Generator::new(checkerboard(), ModelConfig::with_size(4, 4), config)
            .expect("valid generator")
            .generate()
            .expect("accepted");
        assert_eq!(generation.attempts, 1);
        assert_eq!(generation.status(), RunStatus::Running);
        assert!(generation.model.observed_tiles().iter().all(Option::is_none));
    }

    // Tests frames of the winning attempt are kept within the cap
    // Verified by ignoring the frame limit
    #[test]
    fn test_frame_capture() {
        let config = GeneratorConfig {
            capture_frames: true,
            ..GeneratorConfig::default()
        };
        let generator = Generator::new(checkerboard(), ModelConfig::with_size(4, 4), config)
            .expect("valid generator");
        assert_eq!(generator.frame_limit(), 16 + EXTRA_FRAMES);
        let generation = generator.generate().expect("solved");
        assert!(!generation.frames.is_empty());
        assert!(generation.frames.len() <= generator.frame_limit());

        let capped = GeneratorConfig {
            capture_frames: true,
            frame_limit: Some(1),
            ..GeneratorConfig::default()
        };
        let generation = Generator::new(checkerboard(), ModelConfig::with_size(4, 4), capped)
            .expect("valid generator")
            .generate()
            .expect("solved");
        assert_eq!(generation.frames.len(), 1);
    }

    // Tests attempt seeds count up from the base seed
    // Verified by reusing the base seed
    #[test]
    fn test_attempt_seeds() {
        let config = GeneratorConfig {
            seed: u64::MAX,
            ..GeneratorConfig::default()
        };
        let generator = Generator::new(checkerboard(), ModelConfig::with_size(2, 2), config)
            .expect("valid generator");
        assert_eq!(generator.attempt_seed(0), u64::MAX);
        assert_eq!(generator.attempt_seed(1), 0);
        assert_eq!(generator.config().seed, u64::MAX);
    }

    // Tests invalid restart settings are rejected
    // Verified by allowing zero attempts
    #[test]
    fn test_invalid_config() {
        let no_restarts = GeneratorConfig {
            restarts: 0,
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            Generator::new(checkerboard(), ModelConfig::with_size(2, 2), no_restarts),
            Err(WfcError::InvalidParameter { .. })
        ));

        let empty_batch = GeneratorConfig {
            parallel_batch: Some(0),
            ..GeneratorConfig::default()
        };
        assert!(Generator::new(checkerboard(), ModelConfig::with_size(2, 2), empty_batch).is_err());
        assert!(
            Generator::new(checkerboard(), ModelConfig::with_size(0, 2), GeneratorConfig::default())
                .is_err()
        );
    }
}
