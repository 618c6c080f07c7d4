//! Off-screen raster surface of a series.
//!
//! The surface owns a [`Framebuffer`] sized to the plot area and the handle of
//! the scene image that displays it. Both are created on the first pass and
//! reused afterwards; every pass starts from a transparent buffer.

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::output::PngEncoder;
use crate::scene::{GroupId, ImageHandle, Scene};
use tracing::trace;

/// Off-screen buffer plus the scene image it is published to.
#[derive(Debug, Default)]
pub struct RasterSurface {
    buffer: Option<Framebuffer>,
    image: Option<ImageHandle>,
    publishes: usize,
}

impl RasterSurface {
    /// Create a surface with no buffer yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare a blank `width` x `height` buffer for a new pass.
    ///
    /// An existing buffer is cleared and resized in place and its image
    /// element resized to match. Otherwise a buffer is allocated and an image
    /// element created in `group`. Calling this twice with the same size
    /// leaves the same state as calling it once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] for a zero-sized area and
    /// [`Error::DetachedSurface`] if `group` is not part of `scene`.
    pub fn acquire(
        &mut self,
        scene: &mut Scene,
        group: GroupId,
        width: u32,
        height: u32,
    ) -> Result<&mut Framebuffer> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }

        // An image whose element was cleared out of the scene is recreated.
        let image = match self.image {
            Some(handle) if scene.set_image_size(handle, width, height) => handle,
            _ => scene
                .add_image(group, width, height)
                .ok_or(Error::DetachedSurface)?,
        };
        self.image = Some(image);

        let buffer = match self.buffer.take() {
            Some(mut fb) => {
                if fb.width() == width && fb.height() == height {
                    fb.clear(Rgba::TRANSPARENT);
                } else {
                    fb.resize(width, height)?;
                }
                fb
            }
            None => Framebuffer::new(width, height)?,
        };

        Ok(self.buffer.insert(buffer))
    }

    /// Copy the buffer into the scene image as a PNG data URI.
    ///
    /// Returns `false` if the surface was never acquired.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails or the image element is gone.
    pub fn publish(&mut self, scene: &mut Scene) -> Result<bool> {
        let (Some(fb), Some(image)) = (&self.buffer, self.image) else {
            return Ok(false);
        };

        let uri = PngEncoder::to_data_uri(fb)?;
        trace!(bytes = uri.len(), "publishing raster surface");
        if !scene.set_image_href(image, uri) {
            return Err(Error::DetachedSurface);
        }

        self.publishes += 1;
        Ok(true)
    }

    /// Hide whatever was published last.
    ///
    /// The image element keeps its handle but loses its source and shrinks to
    /// nothing; the buffer is cleared. Both are reused by the next `acquire`.
    /// Returns `false` if nothing was ever acquired.
    pub fn blank(&mut self, scene: &mut Scene) -> bool {
        if let Some(fb) = self.buffer.as_mut() {
            fb.clear(Rgba::TRANSPARENT);
        }
        let Some(image) = self.image else {
            return false;
        };

        trace!("blanking raster surface");
        scene.set_image_href(image, String::new()) && scene.set_image_size(image, 0, 0)
    }

    /// The buffer, once acquired.
    #[must_use]
    pub fn buffer(&self) -> Option<&Framebuffer> {
        self.buffer.as_ref()
    }

    /// Mutable buffer, once acquired.
    pub fn buffer_mut(&mut self) -> Option<&mut Framebuffer> {
        self.buffer.as_mut()
    }

    /// Scene image displaying the buffer, once acquired.
    #[must_use]
    pub const fn image(&self) -> Option<ImageHandle> {
        self.image
    }

    /// Publishes over the surface's lifetime.
    #[must_use]
    pub const fn publishes(&self) -> usize {
        self.publishes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_with_group() -> (Scene, GroupId) {
        let mut scene = Scene::new(100, 100);
        let group = scene.add_group("series", (0.0, 0.0));
        (scene, group)
    }

    #[test]
    fn test_acquire_allocates_once() {
        let (mut scene, group) = scene_with_group();
        let mut surface = RasterSurface::new();

        surface.acquire(&mut scene, group, 40, 30).unwrap();
        let image = surface.image().unwrap();
        surface.acquire(&mut scene, group, 40, 30).unwrap();

        assert_eq!(surface.image(), Some(image));
        assert_eq!(scene.group(group).unwrap().elements().len(), 1);
    }

    #[test]
    fn test_acquire_clears_and_resizes() {
        let (mut scene, group) = scene_with_group();
        let mut surface = RasterSurface::new();

        let fb = surface.acquire(&mut scene, group, 10, 10).unwrap();
        fb.set_pixel(1, 1, Rgba::RED);

        let fb = surface.acquire(&mut scene, group, 10, 10).unwrap();
        assert!(fb.is_blank());

        let fb = surface.acquire(&mut scene, group, 20, 5).unwrap();
        assert_eq!((fb.width(), fb.height()), (20, 5));
        let image = surface.image().unwrap();
        assert_eq!(scene.image_size(image), Some((20.0, 5.0)));
    }

    #[test]
    fn test_acquire_zero_size_fails() {
        let (mut scene, group) = scene_with_group();
        let mut surface = RasterSurface::new();

        assert!(matches!(
            surface.acquire(&mut scene, group, 0, 10),
            Err(Error::InvalidDimensions { width: 0, height: 10 })
        ));
        assert!(surface.buffer().is_none());
    }

    #[test]
    fn test_acquire_recreates_cleared_image() {
        let (mut scene, group) = scene_with_group();
        let mut surface = RasterSurface::new();

        surface.acquire(&mut scene, group, 10, 10).unwrap();
        scene.clear_group(group);
        surface.acquire(&mut scene, group, 10, 10).unwrap();

        let image = surface.image().unwrap();
        assert_eq!(scene.image_size(image), Some((10.0, 10.0)));
    }

    #[test]
    fn test_publish_sets_data_uri() {
        let (mut scene, group) = scene_with_group();
        let mut surface = RasterSurface::new();

        assert!(!surface.publish(&mut scene).unwrap());

        surface.acquire(&mut scene, group, 8, 8).unwrap();
        assert!(surface.publish(&mut scene).unwrap());

        let href = scene.image_href(surface.image().unwrap()).unwrap();
        assert!(href.starts_with("data:image/png;base64,"));
        assert_eq!(surface.publishes(), 1);
    }

    #[test]
    fn test_blank_hides_published_image() {
        let (mut scene, group) = scene_with_group();
        let mut surface = RasterSurface::new();
        assert!(!surface.blank(&mut scene));

        surface.acquire(&mut scene, group, 8, 8).unwrap().set_pixel(2, 2, Rgba::RED);
        surface.publish(&mut scene).unwrap();
        assert!(surface.blank(&mut scene));

        let image = surface.image().unwrap();
        assert_eq!(scene.image_href(image), Some(""));
        assert_eq!(scene.image_size(image), Some((0.0, 0.0)));
        assert!(surface.buffer().unwrap().is_blank());

        surface.acquire(&mut scene, group, 8, 8).unwrap();
        assert_eq!(surface.image(), Some(image));
        assert_eq!(scene.image_size(image), Some((8.0, 8.0)));
    }
}
