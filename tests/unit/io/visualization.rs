//! Tests for frame capture and GIF export

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tiledwfc::WfcError;
    use tiledwfc::algorithm::model::{Model, ModelConfig, RunStatus};
    use tiledwfc::io::visualization::FrameCapture;
    use tiledwfc::spatial::symmetry::SymmetryClass;
    use tiledwfc::spatial::tiles::{NeighborRule, TileCatalog, TileDefinition, TileRef};

    fn checkerboard_model(width: usize, height: usize) -> Model {
        let mut catalog = TileCatalog::new();
        catalog
            .add_tile(TileDefinition::new("black", SymmetryClass::X, 1.0))
            .add_tile(TileDefinition::new("white", SymmetryClass::X, 1.0))
            .add_rule(NeighborRule::new(TileRef::new("black", 0), TileRef::new("white", 0)))
            .add_rule(NeighborRule::new(TileRef::new("white", 0), TileRef::new("black", 0)));
        let tiles = Arc::new(catalog.build().expect("catalog builds"));
        Model::new(tiles, &ModelConfig::with_size(width, height)).expect("valid model")
    }

    // Tests one frame per reset and step is collected
    // Verified by not recording after reset
    #[test]
    fn test_attach_collects_frames() {
        let mut model = checkerboard_model(3, 3);
        let mut capture = FrameCapture::new(100);
        capture.attach(&mut model);
        model.run(5, None).expect("run");

        let frames = capture.collect();
        assert_eq!(frames.len(), model.steps() + 2);
        let first = frames.first().expect("reset frame");
        assert_eq!(first.index, 0);
        assert_eq!(first.step, 0);
        assert!(first.snapshot.observed.iter().all(Option::is_none));
        let last = frames.last().expect("final frame");
        assert!(last.snapshot.observed.iter().all(Option::is_some));
        assert_eq!(last.image.dimensions(), (12, 12));
    }

    // Tests the frame limit caps recording
    // Verified by ignoring the limit
    #[test]
    fn test_frame_limit() {
        let mut model = checkerboard_model(4, 4);
        let mut capture = FrameCapture::new(2);
        assert_eq!(capture.limit(), 2);
        capture.attach(&mut model);
        model.run(1, None).expect("run");
        assert_eq!(capture.collect().len(), 2);

        capture.clear();
        assert!(capture.collect().is_empty());
    }

    // Tests frames survive consuming the capture
    // Verified by dropping pending frames
    #[test]
    fn test_into_frames() {
        let mut model = checkerboard_model(2, 2);
        let capture = FrameCapture::new(10);
        capture.attach(&mut model);
        model.run(9, None).expect("run");
        model.clear_step_recorder();

        let frames = capture.into_frames();
        assert!(!frames.is_empty());
        assert!(frames.iter().enumerate().all(|(i, frame)| frame.index == i));
    }

    // Tests a model keeps running after its capture is dropped
    // Verified by unwrapping the frame send
    #[test]
    fn test_dropped_capture() {
        let mut model = checkerboard_model(3, 3);
        let capture = FrameCapture::new(10);
        capture.attach(&mut model);
        drop(capture);

        assert_eq!(model.run(4, None).ok(), Some(RunStatus::Solved));
        assert!(model.is_fully_observed());
    }

    // Tests GIF export writes a file
    // Verified by skipping the encoder
    #[test]
    fn test_export_gif() {
        let mut model = checkerboard_model(3, 3);
        let capture = FrameCapture::new(50);
        capture.attach(&mut model);
        model.run(2, None).expect("run");
        let frames = capture.into_frames();

        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("anim").join("run.gif");
        FrameCapture::export_gif(&frames, &path, 20).expect("export succeeds");
        let size = std::fs::metadata(&path).expect("gif exists").len();
        assert!(size > 0);
    }

    // Tests exporting without frames is rejected
    // Verified by writing an empty GIF
    #[test]
    fn test_export_gif_without_frames() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = FrameCapture::export_gif(&[], &dir.path().join("empty.gif"), 20);
        assert!(matches!(result, Err(WfcError::InvalidParameter { .. })));
    }
}
