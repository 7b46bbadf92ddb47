use std::sync::Arc;

use glam::{IVec2, UVec2};
use parking_lot::{Mutex, MutexGuard};

use crate::{
    canvas::Canvas, font::FontdueMetrics, metrics::FontMetrics, Anchor, Font, TextLayout,
    TextStyle,
};

/// A thread-safe handle to a [`Font`].
///
/// The font is locked for the whole of each layout or draw call.
/// `SharedFont` can be cloned to create a new handle.
/// It internally uses an `Arc`.
pub struct SharedFont<M = FontdueMetrics>(Arc<Mutex<Font<M>>>);

impl<M> Clone for SharedFont<M> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<M: FontMetrics> From<Font<M>> for SharedFont<M> {
    fn from(font: Font<M>) -> Self {
        Self::new(font)
    }
}

impl<M: FontMetrics> SharedFont<M> {
    pub fn new(font: Font<M>) -> Self {
        Self(Arc::new(Mutex::new(font)))
    }

    /// Locks the font for a sequence of calls.
    pub fn lock(&self) -> MutexGuard<'_, Font<M>> {
        self.0.lock()
    }

    pub fn measure(&self, text: &str, pixel_height: u32) -> UVec2 {
        self.lock().measure(text, pixel_height)
    }

    pub fn layout(&self, text: &str, pixel_height: u32) -> TextLayout {
        self.lock().layout(text, pixel_height)
    }

    pub fn write<C>(&self, canvas: &mut C, text: &str, style: &TextStyle, pos: IVec2) -> IVec2
    where
        C: Canvas + ?Sized,
    {
        self.lock().write(canvas, text, style, pos)
    }

    pub fn write_anchored<C>(
        &self,
        canvas: &mut C,
        text: &str,
        style: &TextStyle,
        anchor_point: IVec2,
        anchor: Anchor,
    ) where
        C: Canvas + ?Sized,
    {
        self.lock()
            .write_anchored(canvas, text, style, anchor_point, anchor);
    }
}
