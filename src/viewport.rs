//! Viewports: the regions effects render into
//!
//! A [`Viewport`] is the analogue of a host-page container element: a named
//! rectangular region of the window that owns a logical size, a device pixel
//! ratio and a count of attached renderer outputs. Effects resolve viewports
//! by name through the [`ViewportRegistry`]; resolving an unknown name is the
//! caller's missing-container case and yields `None` without an error.

/// Device pixel ratios above this are clamped to avoid oversampling
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Fractional placement of a viewport within the window, all in 0..=1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for Region {
    /// The full window
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
        }
    }
}

/// A named render region with a logical size and pixel-ratio scaling
#[derive(Debug, Clone)]
pub struct Viewport {
    name: String,
    width: u32,
    height: u32,
    scale_factor: f32,
    region: Region,
    attachments: usize,
}

impl Viewport {
    /// Creates a viewport with the given logical size and a pixel ratio of 1
    pub fn new(name: &str, width: u32, height: u32) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
            scale_factor: 1.0,
            region: Region::default(),
            attachments: 0,
        }
    }

    /// Sets the device pixel ratio reported by the windowing system
    pub fn with_scale_factor(mut self, scale_factor: f32) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Places the viewport at a fractional region of the window
    pub fn with_region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// Logical size in window coordinates
    pub fn logical_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Aspect ratio of the viewport
    ///
    /// Deliberately unguarded: a zero-height viewport yields a non-finite
    /// ratio, matching the behaviour the effects are specified against.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Size in physical pixels with the pixel ratio capped at [`MAX_PIXEL_RATIO`]
    pub fn pixel_size(&self) -> (u32, u32) {
        let ratio = self.scale_factor.min(MAX_PIXEL_RATIO);
        (
            (self.width as f32 * ratio).round() as u32,
            (self.height as f32 * ratio).round() as u32,
        )
    }

    /// Recomputes the logical size from a new window size
    pub fn resize_from_window(&mut self, window_width: u32, window_height: u32, scale_factor: f32) {
        self.width = (window_width as f32 * self.region.width).round() as u32;
        self.height = (window_height as f32 * self.region.height).round() as u32;
        self.scale_factor = scale_factor;
    }

    pub(crate) fn attach(&mut self) {
        self.attachments += 1;
    }

    pub(crate) fn detach(&mut self) {
        self.attachments = self.attachments.saturating_sub(1);
    }

    /// Number of renderer outputs currently attached to this viewport
    pub fn attachment_count(&self) -> usize {
        self.attachments
    }
}

/// Registry of named viewports owned by the host
#[derive(Default)]
pub struct ViewportRegistry {
    viewports: Vec<Viewport>,
}

impl ViewportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a viewport, replacing any existing one with the same name
    pub fn register(&mut self, viewport: Viewport) {
        self.viewports.retain(|v| v.name != viewport.name);
        self.viewports.push(viewport);
    }

    /// Resolves a viewport by name
    pub fn resolve(&self, name: &str) -> Option<&Viewport> {
        self.viewports.iter().find(|v| v.name == name)
    }

    /// Resolves a viewport by name for mutation
    pub fn resolve_mut(&mut self, name: &str) -> Option<&mut Viewport> {
        self.viewports.iter_mut().find(|v| v.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Viewport> {
        self.viewports.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Viewport> {
        self.viewports.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.viewports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.viewports.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_ratio_is_capped() {
        let viewport = Viewport::new("hero", 400, 300).with_scale_factor(3.0);
        assert_eq!(viewport.pixel_size(), (800, 600));
    }

    #[test]
    fn test_uncapped_ratio_passes_through() {
        let viewport = Viewport::new("hero", 400, 300).with_scale_factor(1.5);
        assert_eq!(viewport.pixel_size(), (600, 450));
    }

    #[test]
    fn test_resolve_unknown_name_is_none() {
        let mut registry = ViewportRegistry::new();
        registry.register(Viewport::new("hero", 800, 600));
        assert!(registry.resolve("sidebar").is_none());
        assert!(registry.resolve("hero").is_some());
    }

    #[test]
    fn test_resize_from_window_respects_region() {
        let mut viewport = Viewport::new("half", 0, 0).with_region(Region {
            x: 0.0,
            y: 0.0,
            width: 0.5,
            height: 1.0,
        });
        viewport.resize_from_window(1200, 800, 1.0);
        assert_eq!(viewport.logical_size(), (600, 800));
    }

    #[test]
    fn test_zero_height_aspect_is_not_finite() {
        // The division is intentionally unguarded; this pins the edge case.
        let viewport = Viewport::new("collapsed", 100, 0);
        assert!(!viewport.aspect().is_finite());
    }

    #[test]
    fn test_attach_detach_counting() {
        let mut viewport = Viewport::new("hero", 800, 600);
        viewport.attach();
        viewport.attach();
        assert_eq!(viewport.attachment_count(), 2);
        viewport.detach();
        assert_eq!(viewport.attachment_count(), 1);
    }
}
