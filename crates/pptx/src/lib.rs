//! PPTX deck renderer.
//!
//! A stateless pass from the immutable page outline to a complete
//! OOXML presentation package: one slide per page, fixed master,
//! layout, and theme parts, media parts for branding and the chart.
//! Nothing here feeds back into the bookkeeping that produced the
//! pages.

pub mod shapes;
pub mod slide;
pub mod templates;
pub mod units;
pub mod writer;

use std::path::Path;

pub use writer::render_deck;

/// Static branding images embedded into every deck.
///
/// Both images are optional; slides simply render without them when a
/// file is absent.
#[derive(Debug, Clone, Default)]
pub struct Branding {
    /// Small logo placed on every slide.
    pub icon_png: Option<Vec<u8>>,

    /// Large artwork for the cover and closing slides.
    pub banner_png: Option<Vec<u8>>,
}

impl Branding {
    /// No branding at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Load `icon.png` and `banner.png` from a directory. Missing
    /// files are not an error; they leave the corresponding image out.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            icon_png: std::fs::read(dir.join("icon.png")).ok(),
            banner_png: std::fs::read(dir.join("banner.png")).ok(),
        }
    }
}
