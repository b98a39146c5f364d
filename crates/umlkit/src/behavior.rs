//! Modeling behaviors layered on the host's gestures.

use umlkit_core::geometry::Size;

use crate::{host::ResizePolicy, model::Element};

/// Minimum size of a label while it is resized.
pub const LABEL_MIN_DIMENSIONS: Size = Size::new(10.0, 10.0);

/// Lets labels shrink below the host's minimum resize dimensions.
#[derive(Debug, Default, Clone, Copy)]
pub struct UmlResizeBehavior;

impl ResizePolicy for UmlResizeBehavior {
    fn min_dimensions(&self, shape: &Element) -> Option<Size> {
        shape.kind().is_label().then_some(LABEL_MIN_DIMENSIONS)
    }
}
