/// A lightweight, serializable snapshot of a [`crate::PagerState`].
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PagerSnapshot {
    pub position: f32,
    pub page_count: usize,
    pub page_size: f32,
    pub page_spacing: f32,
}

impl PagerSnapshot {
    /// The page index the snapshot rests closest to.
    pub fn nearest_page(&self) -> usize {
        let stride = self.page_size + self.page_spacing;
        if self.page_count == 0 || !stride.is_finite() || stride <= 0.0 || !self.position.is_finite() {
            return 0;
        }
        ((self.position / stride).round().max(0.0) as usize).min(self.page_count - 1)
    }
}
