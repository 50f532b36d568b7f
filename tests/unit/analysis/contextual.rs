//! Tests for neighbour-aware weighting

#[cfg(test)]
mod tests {
    use tiledwfc::algorithm::wave::WaveState;
    use tiledwfc::analysis::contextual::{ContextualAdjuster, ContextualOptions};
    use tiledwfc::analysis::distribution::Distribution;
    use tiledwfc::spatial::GridLayout;
    use tiledwfc::spatial::symmetry::SymmetryClass;
    use tiledwfc::spatial::tiles::{NeighborRule, TileCatalog, TileDefinition, TileRef, TileSet};

    fn checkerboard() -> TileSet {
        let mut catalog = TileCatalog::new();
        catalog
            .add_tile(TileDefinition::new("black", SymmetryClass::X, 1.0))
            .add_tile(TileDefinition::new("white", SymmetryClass::X, 1.0))
            .add_rule(NeighborRule::new(TileRef::new("black", 0), TileRef::new("white", 0)))
            .add_rule(NeighborRule::new(TileRef::new("white", 0), TileRef::new("black", 0)));
        catalog.build().expect("catalog builds")
    }

    // Tests supported tiles are boosted and unsupported ones penalised
    // Verified by swapping bias and penalty
    #[test]
    fn test_boost_and_penalty() {
        let tiles = checkerboard();
        let grid = GridLayout::new(2, 1, false).expect("valid grid");
        let mut wave = WaveState::new(grid.cell_count(), tiles.weights(), tiles.propagator());
        wave.ban(1, 1);

        let adjuster = ContextualAdjuster::new(&tiles, ContextualOptions::default());
        let mut distribution = Distribution::from_weights(vec![1.0, 1.0]);
        adjuster.adjust(0, &wave, &grid, &mut distribution);

        assert!((distribution.get(0) - 0.2).abs() < 1e-12);
        assert!((distribution.get(1) - 2.0).abs() < 1e-12);
    }

    // Tests full and empty neighbour domains are ignored
    // Verified by scoring against full domains
    #[test]
    fn test_uninformative_neighbors() {
        let tiles = checkerboard();
        let grid = GridLayout::new(3, 1, false).expect("valid grid");
        let mut wave = WaveState::new(grid.cell_count(), tiles.weights(), tiles.propagator());
        wave.ban(0, 0);
        wave.ban(0, 1);

        let adjuster = ContextualAdjuster::new(&tiles, ContextualOptions::default());
        let mut distribution = Distribution::from_weights(vec![1.0, 1.0]);
        adjuster.adjust(1, &wave, &grid, &mut distribution);
        assert_eq!(distribution.weights(), &[1.0, 1.0]);
    }

    // Tests the bias scales the boost
    // Verified by ignoring the bias option
    #[test]
    fn test_bias_option() {
        let tiles = checkerboard();
        let grid = GridLayout::new(1, 2, false).expect("valid grid");
        let mut wave = WaveState::new(grid.cell_count(), tiles.weights(), tiles.propagator());
        wave.ban(0, 0);

        let options = ContextualOptions {
            bias: 3.0,
            penalty: 0.5,
        };
        let adjuster = ContextualAdjuster::new(&tiles, options);
        let mut distribution = Distribution::from_weights(vec![2.0, 0.0]);
        adjuster.adjust(1, &wave, &grid, &mut distribution);
        assert!((distribution.get(0) - 8.0).abs() < 1e-12);
        assert!(distribution.get(1).abs() < f64::EPSILON);
    }

    // Tests option validation
    // Verified by accepting a zero penalty
    #[test]
    fn test_validate() {
        assert!(ContextualOptions::default().validate().is_ok());
        let zero_penalty = ContextualOptions {
            penalty: 0.0,
            ..ContextualOptions::default()
        };
        assert!(zero_penalty.validate().is_err());
        let negative_bias = ContextualOptions {
            bias: -1.0,
            ..ContextualOptions::default()
        };
        assert!(negative_bias.validate().is_err());
    }
}
