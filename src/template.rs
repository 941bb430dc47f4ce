//! Physical media descriptions: papers, vendors, categories and label
//! templates.
//!
//! A template describes one product: the page it prints on and the die-cut
//! frames on that page. Frames carry layout grids (how the label repeats
//! across the page). All dimensions are page points.

use serde::{Deserialize, Serialize};

/// Comparison tolerance for physical dimensions, in points.
const EPSILON: f64 = 0.5;

fn dim_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPSILON
}

/// A known paper size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    /// Stable id, e.g. "A4" or "US-Letter".
    pub id: String,
    /// Display name.
    pub name: String,
    pub width: f64,
    pub height: f64,
}

/// A template search category, e.g. "round-label".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// A label vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub name: String,
    pub url: String,
}

/// A grid of label positions on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Count across.
    pub nx: u32,
    /// Count down.
    pub ny: u32,
    /// Origin of the first label.
    pub x0: f64,
    pub y0: f64,
    /// Pitch between labels.
    pub dx: f64,
    pub dy: f64,
}

impl Layout {
    /// Number of labels this grid places.
    pub fn count(&self) -> u32 {
        self.nx * self.ny
    }

    fn matches(&self, other: &Layout) -> bool {
        self.nx == other.nx
            && self.ny == other.ny
            && dim_eq(self.x0, other.x0)
            && dim_eq(self.y0, other.y0)
            && dim_eq(self.dx, other.dx)
            && dim_eq(self.dy, other.dy)
    }
}

/// The die-cut shape of a single label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FrameShape {
    /// Rectangle with corner radius `r`.
    Rect { w: f64, h: f64, r: f64 },
    /// Circle of radius `r`.
    Round { r: f64 },
    /// CD/DVD shape: outer radius, hole radius, optional clip size (0 = no
    /// clipping).
    Cd { r1: f64, r2: f64, w: f64, h: f64 },
}

impl FrameShape {
    fn matches(&self, other: &FrameShape) -> bool {
        match (self, other) {
            (FrameShape::Rect { w, h, r }, FrameShape::Rect { w: w2, h: h2, r: r2 }) => {
                dim_eq(*w, *w2) && dim_eq(*h, *h2) && dim_eq(*r, *r2)
            }
            (FrameShape::Round { r }, FrameShape::Round { r: r2 }) => dim_eq(*r, *r2),
            (
                FrameShape::Cd { r1, r2, w, h },
                FrameShape::Cd {
                    r1: o_r1,
                    r2: o_r2,
                    w: o_w,
                    h: o_h,
                },
            ) => dim_eq(*r1, *o_r1) && dim_eq(*r2, *o_r2) && dim_eq(*w, *o_w) && dim_eq(*h, *o_h),
            _ => false,
        }
    }
}

/// One die-cut frame of a template, with its layout grids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub shape: FrameShape,
    pub layouts: Vec<Layout>,
}

impl Frame {
    /// Effective label width.
    pub fn w(&self) -> f64 {
        match &self.shape {
            FrameShape::Rect { w, .. } => *w,
            FrameShape::Round { r } => 2.0 * r,
            FrameShape::Cd { r1, w, .. } => {
                if *w > 0.0 {
                    *w
                } else {
                    2.0 * r1
                }
            }
        }
    }

    /// Effective label height.
    pub fn h(&self) -> f64 {
        match &self.shape {
            FrameShape::Rect { h, .. } => *h,
            FrameShape::Round { r } => 2.0 * r,
            FrameShape::Cd { r1, h, .. } => {
                if *h > 0.0 {
                    *h
                } else {
                    2.0 * r1
                }
            }
        }
    }

    /// Total number of labels across all layout grids.
    pub fn label_count(&self) -> u32 {
        self.layouts.iter().map(Layout::count).sum()
    }

    fn matches(&self, other: &Frame) -> bool {
        self.shape.matches(&other.shape)
            && self.layouts.len() == other.layouts.len()
            && self
                .layouts
                .iter()
                .zip(&other.layouts)
                .all(|(a, b)| a.matches(b))
    }
}

/// A label product template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub brand: String,
    /// Vendor part number, e.g. "5160".
    pub part: String,
    pub description: String,
    pub paper_id: String,
    pub page_width: f64,
    pub page_height: f64,
    pub frames: Vec<Frame>,
}

impl Template {
    /// Full display name, "Brand Part".
    pub fn name(&self) -> String {
        format!("{} {}", self.brand, self.part)
    }

    /// The sizing frame. Multi-frame templates size by their first frame.
    pub fn frame(&self) -> Option<&Frame> {
        self.frames.first()
    }

    /// Whether `other` describes physically equivalent media: same paper,
    /// page size, frame geometry and layouts. Branding is ignored.
    pub fn is_similar_to(&self, other: &Template) -> bool {
        if self.paper_id != other.paper_id
            || !dim_eq(self.page_width, other.page_width)
            || !dim_eq(self.page_height, other.page_height)
        {
            return false;
        }
        match (self.frame(), other.frame()) {
            (Some(a), Some(b)) => a.matches(b),
            (None, None) => true,
            _ => false,
        }
    }
}
