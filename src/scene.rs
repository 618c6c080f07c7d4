//! Minimal scene graph: named groups of SVG elements.
//!
//! Series render into their own group. A raster series owns one image element
//! whose source is swapped on every publish; the element is created once and
//! addressed through an [`ImageHandle`] afterwards.

use crate::color::Rgba;
use crate::output::{element_to_svg, SvgElement};
use std::fmt::Write as FmtWrite;

/// Identifies a group inside a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(usize);

/// Identifies an image element inside a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle {
    group: GroupId,
    slot: usize,
}

impl ImageHandle {
    /// Group the image belongs to.
    #[must_use]
    pub const fn group(&self) -> GroupId {
        self.group
    }
}

/// A group of elements translated to a common origin.
#[derive(Debug, Clone)]
pub struct Group {
    name: String,
    translate: (f32, f32),
    elements: Vec<SvgElement>,
}

impl Group {
    /// Group name (rendered as the `class` attribute).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Elements in paint order.
    #[must_use]
    pub fn elements(&self) -> &[SvgElement] {
        &self.elements
    }
}

/// Scene graph the chart renders into.
#[derive(Debug, Clone)]
pub struct Scene {
    width: u32,
    height: u32,
    background: Option<Rgba>,
    groups: Vec<Group>,
}

impl Scene {
    /// Create an empty scene with a white background.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: Some(Rgba::WHITE),
            groups: Vec::new(),
        }
    }

    /// Set background color (None for transparent).
    #[must_use]
    pub fn background(mut self, color: Option<Rgba>) -> Self {
        self.background = color;
        self
    }

    /// Change the scene's outer dimensions.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Scene width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Scene height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Add a group whose elements are offset by `translate`.
    pub fn add_group(&mut self, name: impl Into<String>, translate: (f32, f32)) -> GroupId {
        self.groups.push(Group {
            name: name.into(),
            translate,
            elements: Vec::new(),
        });
        GroupId(self.groups.len() - 1)
    }

    /// Look up a group.
    #[must_use]
    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id.0)
    }

    /// Append an element to a group. Unknown groups are ignored.
    pub fn push(&mut self, id: GroupId, element: SvgElement) {
        if let Some(group) = self.groups.get_mut(id.0) {
            group.elements.push(element);
        }
    }

    /// Remove all elements of a group.
    ///
    /// Image handles into the group become dangling and resolve to nothing.
    pub fn clear_group(&mut self, id: GroupId) {
        if let Some(group) = self.groups.get_mut(id.0) {
            group.elements.clear();
        }
    }

    /// Add an empty image element of the given size to a group.
    ///
    /// Returns `None` if the group does not exist.
    pub fn add_image(&mut self, id: GroupId, width: u32, height: u32) -> Option<ImageHandle> {
        let group = self.groups.get_mut(id.0)?;
        group.elements.push(SvgElement::Image {
            x: 0.0,
            y: 0.0,
            width: width as f32,
            height: height as f32,
            href: String::new(),
        });
        Some(ImageHandle {
            group: id,
            slot: group.elements.len() - 1,
        })
    }

    /// Replace an image's source. Returns `false` for a dangling handle.
    pub fn set_image_href(&mut self, handle: ImageHandle, new_href: String) -> bool {
        match self.image_mut(handle) {
            Some(SvgElement::Image { href, .. }) => {
                *href = new_href;
                true
            }
            _ => false,
        }
    }

    /// Resize an image element. Returns `false` for a dangling handle.
    pub fn set_image_size(&mut self, handle: ImageHandle, new_width: u32, new_height: u32) -> bool {
        match self.image_mut(handle) {
            Some(SvgElement::Image { width, height, .. }) => {
                *width = new_width as f32;
                *height = new_height as f32;
                true
            }
            _ => false,
        }
    }

    /// Current source of an image element.
    #[must_use]
    pub fn image_href(&self, handle: ImageHandle) -> Option<&str> {
        match self.group(handle.group)?.elements.get(handle.slot)? {
            SvgElement::Image { href, .. } => Some(href),
            _ => None,
        }
    }

    /// Current size of an image element.
    #[must_use]
    pub fn image_size(&self, handle: ImageHandle) -> Option<(f32, f32)> {
        match self.group(handle.group)?.elements.get(handle.slot)? {
            SvgElement::Image { width, height, .. } => Some((*width, *height)),
            _ => None,
        }
    }

    fn image_mut(&mut self, handle: ImageHandle) -> Option<&mut SvgElement> {
        self.groups
            .get_mut(handle.group.0)?
            .elements
            .get_mut(handle.slot)
    }

    /// Render to SVG string. Images that were never given a source are left out.
    #[must_use]
    pub fn render(&self) -> String {
        let mut svg = String::with_capacity(4096);

        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.width, self.height, self.width, self.height
        );

        if let Some(bg) = self.background {
            let _ = writeln!(
                svg,
                r#"  <rect width="100%" height="100%" fill="{}"/>"#,
                bg.to_css()
            );
        }

        for group in &self.groups {
            let (tx, ty) = group.translate;
            let _ = writeln!(
                svg,
                r#"  <g class="{}" transform="translate({tx},{ty})">"#,
                escape_attr(&group.name)
            );
            for element in &group.elements {
                // An image without a source has nothing to show.
                if matches!(element, SvgElement::Image { href, .. } if href.is_empty()) {
                    continue;
                }
                let _ = writeln!(svg, "    {}", element_to_svg(element));
            }
            svg.push_str("  </g>\n");
        }

        svg.push_str("</svg>\n");
        svg
    }
}

fn escape_attr(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_handle_lifecycle() {
        let mut scene = Scene::new(200, 100);
        let group = scene.add_group("series-0", (10.0, 5.0));
        let image = scene.add_image(group, 180, 90).unwrap();

        assert_eq!(scene.image_href(image), Some(""));
        assert!(scene.set_image_href(image, "data:image/png;base64,AA".to_string()));
        assert!(scene.set_image_size(image, 50, 40));

        assert_eq!(scene.image_href(image), Some("data:image/png;base64,AA"));
        assert_eq!(scene.image_size(image), Some((50.0, 40.0)));
    }

    #[test]
    fn test_dangling_handle_after_clear() {
        let mut scene = Scene::new(10, 10);
        let group = scene.add_group("g", (0.0, 0.0));
        let image = scene.add_image(group, 10, 10).unwrap();

        scene.clear_group(group);
        assert!(!scene.set_image_href(image, "x".to_string()));
        assert!(scene.image_href(image).is_none());
    }

    #[test]
    fn test_render_groups() {
        let mut scene = Scene::new(100, 50).background(None);
        let group = scene.add_group("a<b", (3.0, 4.0));
        scene.push(
            group,
            SvgElement::Circle {
                cx: 1.0,
                cy: 2.0,
                r: 1.0,
                fill: Rgba::RED,
            },
        );

        let svg = scene.render();
        assert!(svg.contains("width=\"100\""));
        assert!(svg.contains(r#"class="a&lt;b""#));
        assert!(svg.contains("translate(3,4)"));
        assert!(svg.contains("<circle"));
        assert!(!svg.contains("<rect"));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn test_render_skips_images_without_source() {
        let mut scene = Scene::new(10, 10);
        let group = scene.add_group("g", (0.0, 0.0));
        let image = scene.add_image(group, 10, 10).unwrap();
        assert!(!scene.render().contains("<image"));

        scene.set_image_href(image, "data:image/png;base64,AA".to_string());
        assert!(scene.render().contains("<image"));
    }

    #[test]
    fn test_unknown_group_is_ignored() {
        let mut scene = Scene::new(10, 10);
        let mut other = Scene::new(10, 10);
        let foreign = other.add_group("x", (0.0, 0.0));

        assert!(scene.add_image(foreign, 1, 1).is_none());
        scene.push(
            foreign,
            SvgElement::Circle {
                cx: 0.0,
                cy: 0.0,
                r: 1.0,
                fill: Rgba::RED,
            },
        );
        assert!(scene.group(foreign).is_none());
    }
}
