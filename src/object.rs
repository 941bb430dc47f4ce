//! Label objects: the positionable items making up a label design.
//!
//! An object has a position and raw size in page points, a linear transform
//! (rotation, axis flips) anchored at its local origin, a transient selected
//! flag and a variant-specific property set (`ObjectKind`). Property setters
//! are uniform across variants: a setter for a property the variant does not
//! carry is silently ignored, so callers may apply them selection-wide and
//! consult the capability queries only to decide what to offer in the UI.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::color::ColorNode;
use crate::geometry::{Region, Transform};
use crate::merge::MergeRecord;

static OBJECT_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a label object.
///
/// Identities are never reused within a process. Loading or restoring a
/// document assigns fresh ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Allocate the next unused id.
    pub fn next() -> ObjectId {
        ObjectId(OBJECT_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::next()
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

/// Vertical text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

/// Font weight. Only the two weights label designs actually use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontWeight {
    Normal,
    Bold,
}

/// A string that is either literal data or a merge field reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextNode {
    /// When true, `data` names the merge field supplying the value.
    pub field_flag: bool,
    /// Literal value, or the field key when `field_flag` is set.
    pub data: String,
}

impl TextNode {
    /// A literal text node.
    pub fn from_text(data: impl Into<String>) -> Self {
        Self {
            field_flag: false,
            data: data.into(),
        }
    }

    /// A node drawing its value from the given merge field.
    pub fn from_key(key: impl Into<String>) -> Self {
        Self {
            field_flag: true,
            data: key.into(),
        }
    }

    /// Resolve against an optional merge record. Field nodes yield "" when
    /// no record is given or the key is absent.
    pub fn resolve(&self, record: Option<&MergeRecord>) -> String {
        if !self.field_flag {
            return self.data.clone();
        }
        record
            .map(|r| r.value(&self.data).to_owned())
            .unwrap_or_default()
    }
}

impl Default for TextNode {
    fn default() -> Self {
        Self::from_text("")
    }
}

/// Properties of a text object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextProps {
    /// Raw text; `${key}` references are substituted at render time.
    pub text: String,
    pub font_family: String,
    /// Font size in points.
    pub font_size: f64,
    pub font_weight: FontWeight,
    pub font_italic: bool,
    pub halign: HAlign,
    pub valign: VAlign,
    /// Line spacing factor, 1.0 = single spaced.
    pub line_spacing: f64,
    pub color: ColorNode,
}

impl Default for TextProps {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_family: "Sans".to_owned(),
            font_size: 10.0,
            font_weight: FontWeight::Normal,
            font_italic: false,
            halign: HAlign::Left,
            valign: VAlign::Top,
            line_spacing: 1.0,
            color: ColorNode::default(),
        }
    }
}

/// Properties shared by box and ellipse objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeProps {
    /// Outline width in points.
    pub line_width: f64,
    pub line_color: ColorNode,
    pub fill_color: ColorNode,
}

impl Default for ShapeProps {
    fn default() -> Self {
        Self {
            line_width: 1.0,
            line_color: ColorNode::default(),
            fill_color: ColorNode::from_color(crate::color::Color::rgb(255, 255, 255)),
        }
    }
}

/// Properties of a line object. The object's w/h are the endpoint delta and
/// may be negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineProps {
    pub line_width: f64,
    pub line_color: ColorNode,
}

impl Default for LineProps {
    fn default() -> Self {
        Self {
            line_width: 1.0,
            line_color: ColorNode::default(),
        }
    }
}

/// Properties of an image object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageProps {
    /// Image file name, literal or merge field.
    pub source: TextNode,
}

/// Properties of a barcode object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarcodeProps {
    /// Encoded data, literal or merge field.
    pub data: TextNode,
    /// Barcode style name, e.g. "code39".
    pub style: String,
    /// Whether to render the data as text below the bars.
    pub show_text: bool,
    /// Whether to append a checksum digit.
    pub checksum: bool,
    pub color: ColorNode,
}

impl Default for BarcodeProps {
    fn default() -> Self {
        Self {
            data: TextNode::default(),
            style: "code39".to_owned(),
            show_text: true,
            checksum: true,
            color: ColorNode::default(),
        }
    }
}

/// The closed set of object variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectKind {
    Text(TextProps),
    Box(ShapeProps),
    Ellipse(ShapeProps),
    Line(LineProps),
    Image(ImageProps),
    Barcode(BarcodeProps),
}

impl ObjectKind {
    /// Whether the variant carries editable text properties.
    pub fn can_text(&self) -> bool {
        matches!(self, ObjectKind::Text(_))
    }

    /// Whether the variant carries a fill color.
    pub fn can_fill(&self) -> bool {
        matches!(self, ObjectKind::Box(_) | ObjectKind::Ellipse(_))
    }

    /// Whether the variant carries an outline color.
    pub fn can_line_color(&self) -> bool {
        matches!(
            self,
            ObjectKind::Box(_) | ObjectKind::Ellipse(_) | ObjectKind::Line(_)
        )
    }

    /// Whether the variant carries an outline width.
    pub fn can_line_width(&self) -> bool {
        self.can_line_color()
    }
}

/// One object on the label canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelObject {
    #[serde(skip)]
    id: ObjectId,
    x0: f64,
    y0: f64,
    w: f64,
    h: f64,
    transform: Transform,
    #[serde(skip)]
    selected: bool,
    kind: ObjectKind,
}

impl LabelObject {
    /// Create an object of the given kind at (x0, y0) with raw size (w, h).
    pub fn new(x0: f64, y0: f64, w: f64, h: f64, kind: ObjectKind) -> Self {
        Self {
            id: ObjectId::next(),
            x0,
            y0,
            w,
            h,
            transform: Transform::identity(),
            selected: false,
            kind,
        }
    }

    /// A text object with default typography.
    pub fn new_text(x0: f64, y0: f64, w: f64, h: f64, text: impl Into<String>) -> Self {
        let props = TextProps {
            text: text.into(),
            ..TextProps::default()
        };
        Self::new(x0, y0, w, h, ObjectKind::Text(props))
    }

    /// A box object with default outline and fill.
    pub fn new_box(x0: f64, y0: f64, w: f64, h: f64) -> Self {
        Self::new(x0, y0, w, h, ObjectKind::Box(ShapeProps::default()))
    }

    /// An ellipse object with default outline and fill.
    pub fn new_ellipse(x0: f64, y0: f64, w: f64, h: f64) -> Self {
        Self::new(x0, y0, w, h, ObjectKind::Ellipse(ShapeProps::default()))
    }

    /// A line object from (x0, y0) to (x0 + dx, y0 + dy).
    pub fn new_line(x0: f64, y0: f64, dx: f64, dy: f64) -> Self {
        Self::new(x0, y0, dx, dy, ObjectKind::Line(LineProps::default()))
    }

    /// An image object showing `source`.
    pub fn new_image(x0: f64, y0: f64, w: f64, h: f64, source: TextNode) -> Self {
        Self::new(x0, y0, w, h, ObjectKind::Image(ImageProps { source }))
    }

    /// A barcode object encoding `data` in the default style.
    pub fn new_barcode(x0: f64, y0: f64, w: f64, h: f64, data: TextNode) -> Self {
        let props = BarcodeProps {
            data,
            ..BarcodeProps::default()
        };
        Self::new(x0, y0, w, h, ObjectKind::Barcode(props))
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    // Restored and loaded objects get fresh identities.
    pub(crate) fn refresh_id(&mut self) {
        self.id = ObjectId::next();
    }

    pub fn x0(&self) -> f64 {
        self.x0
    }

    pub fn y0(&self) -> f64 {
        self.y0
    }

    /// Raw width: for lines this is the endpoint delta and may be negative.
    pub fn w(&self) -> f64 {
        self.w
    }

    /// Raw height, same convention as `w`.
    pub fn h(&self) -> f64 {
        self.h
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn select(&mut self) {
        self.selected = true;
    }

    pub(crate) fn unselect(&mut self) {
        self.selected = false;
    }

    /// Move to an absolute position.
    pub fn set_position(&mut self, x0: f64, y0: f64) {
        self.x0 = x0;
        self.y0 = y0;
    }

    /// Move by a relative offset.
    pub fn set_position_relative(&mut self, dx: f64, dy: f64) {
        self.x0 += dx;
        self.y0 += dy;
    }

    /// Set the raw size.
    pub fn set_size(&mut self, w: f64, h: f64) {
        self.w = w;
        self.h = h;
    }

    /// Rotate in place by `theta_degrees` (positive = clockwise).
    pub fn rotate(&mut self, theta_degrees: f64) {
        self.transform.rotate(theta_degrees);
    }

    /// Mirror about the vertical axis.
    pub fn flip_horiz(&mut self) {
        self.transform.flip_horiz();
    }

    /// Mirror about the horizontal axis.
    pub fn flip_vert(&mut self) {
        self.transform.flip_vert();
    }

    /// The axis-aligned bounding box in page coordinates: the four local
    /// corners mapped through the transform, offset by the position.
    pub fn extent(&self) -> Region {
        let corners = [(0.0, 0.0), (self.w, 0.0), (self.w, self.h), (0.0, self.h)];
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for (cx, cy) in corners {
            let (x, y) = self.transform.map(cx, cy);
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        Region::new(
            min_x + self.x0,
            min_y + self.y0,
            max_x + self.x0,
            max_y + self.y0,
        )
    }

    pub fn can_text(&self) -> bool {
        self.kind.can_text()
    }

    pub fn can_fill(&self) -> bool {
        self.kind.can_fill()
    }

    pub fn can_line_color(&self) -> bool {
        self.kind.can_line_color()
    }

    pub fn can_line_width(&self) -> bool {
        self.kind.can_line_width()
    }

    // ───── Uniform property setters; non-carrying variants ignore them ─────

    pub fn set_font_family(&mut self, font_family: &str) {
        if let ObjectKind::Text(props) = &mut self.kind {
            props.font_family = font_family.to_owned();
        }
    }

    pub fn set_font_size(&mut self, font_size: f64) {
        if let ObjectKind::Text(props) = &mut self.kind {
            props.font_size = font_size;
        }
    }

    pub fn set_font_weight(&mut self, font_weight: FontWeight) {
        if let ObjectKind::Text(props) = &mut self.kind {
            props.font_weight = font_weight;
        }
    }

    pub fn set_font_italic_flag(&mut self, italic: bool) {
        if let ObjectKind::Text(props) = &mut self.kind {
            props.font_italic = italic;
        }
    }

    pub fn set_text_halign(&mut self, halign: HAlign) {
        if let ObjectKind::Text(props) = &mut self.kind {
            props.halign = halign;
        }
    }

    pub fn set_text_valign(&mut self, valign: VAlign) {
        if let ObjectKind::Text(props) = &mut self.kind {
            props.valign = valign;
        }
    }

    pub fn set_text_line_spacing(&mut self, line_spacing: f64) {
        if let ObjectKind::Text(props) = &mut self.kind {
            props.line_spacing = line_spacing;
        }
    }

    pub fn set_text_color_node(&mut self, node: ColorNode) {
        if let ObjectKind::Text(props) = &mut self.kind {
            props.color = node;
        }
    }

    pub fn set_line_width(&mut self, line_width: f64) {
        match &mut self.kind {
            ObjectKind::Box(props) | ObjectKind::Ellipse(props) => props.line_width = line_width,
            ObjectKind::Line(props) => props.line_width = line_width,
            _ => {}
        }
    }

    pub fn set_line_color_node(&mut self, node: ColorNode) {
        match &mut self.kind {
            ObjectKind::Box(props) | ObjectKind::Ellipse(props) => props.line_color = node,
            ObjectKind::Line(props) => props.line_color = node,
            _ => {}
        }
    }

    pub fn set_fill_color_node(&mut self, node: ColorNode) {
        match &mut self.kind {
            ObjectKind::Box(props) | ObjectKind::Ellipse(props) => props.fill_color = node,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn test_ids_are_unique() {
        let a = LabelObject::new_box(0.0, 0.0, 10.0, 10.0);
        let b = LabelObject::new_box(0.0, 0.0, 10.0, 10.0);
        let c = a.clone();
        assert_ne!(a.id(), b.id());
        // Clones share identity; only new objects get fresh ids.
        assert_eq!(a.id(), c.id());
    }

    #[test]
    fn test_capability_matrix() {
        let text = LabelObject::new_text(0.0, 0.0, 10.0, 10.0, "hi");
        let boxx = LabelObject::new_box(0.0, 0.0, 10.0, 10.0);
        let ellipse = LabelObject::new_ellipse(0.0, 0.0, 10.0, 10.0);
        let line = LabelObject::new_line(0.0, 0.0, 10.0, 10.0);
        let image = LabelObject::new_image(0.0, 0.0, 10.0, 10.0, TextNode::default());
        let barcode = LabelObject::new_barcode(0.0, 0.0, 10.0, 10.0, TextNode::from_text("X"));

        assert!(text.can_text());
        assert!(!text.can_fill() && !text.can_line_color() && !text.can_line_width());

        for shape in [&boxx, &ellipse] {
            assert!(!shape.can_text());
            assert!(shape.can_fill());
            assert!(shape.can_line_color());
            assert!(shape.can_line_width());
        }

        assert!(!line.can_text() && !line.can_fill());
        assert!(line.can_line_color() && line.can_line_width());

        for plain in [&image, &barcode] {
            assert!(!plain.can_text());
            assert!(!plain.can_fill());
            assert!(!plain.can_line_color());
            assert!(!plain.can_line_width());
        }
    }

    #[test]
    fn test_extent_untransformed() {
        let obj = LabelObject::new_box(10.0, 20.0, 30.0, 40.0);
        let r = obj.extent();
        assert_eq!((r.x1, r.y1, r.x2, r.y2), (10.0, 20.0, 40.0, 60.0));
    }

    #[test]
    fn test_extent_negative_line_delta() {
        let obj = LabelObject::new_line(100.0, 50.0, -30.0, -20.0);
        let r = obj.extent();
        assert_eq!((r.x1, r.y1, r.x2, r.y2), (70.0, 30.0, 100.0, 50.0));
    }

    #[test]
    fn test_extent_after_quarter_turn() {
        let mut obj = LabelObject::new_box(10.0, 10.0, 30.0, 20.0);
        obj.rotate(90.0);
        let r = obj.extent();
        // Corners swing clockwise about the origin anchor.
        assert!((r.x1 - -10.0).abs() < 1e-9);
        assert!((r.y1 - 10.0).abs() < 1e-9);
        assert!((r.x2 - 10.0).abs() < 1e-9);
        assert!((r.y2 - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_relative_moves_accumulate() {
        let mut obj = LabelObject::new_box(5.0, 5.0, 10.0, 10.0);
        obj.set_position_relative(3.0, -2.0);
        obj.set_position_relative(3.0, -2.0);
        assert_eq!((obj.x0(), obj.y0()), (11.0, 1.0));
        obj.set_position(0.0, 0.0);
        assert_eq!((obj.x0(), obj.y0()), (0.0, 0.0));
    }

    #[test]
    fn test_setters_ignore_unsupported_variants() {
        let mut boxx = LabelObject::new_box(0.0, 0.0, 10.0, 10.0);
        boxx.set_font_family("Serif");
        boxx.set_font_size(24.0);
        match boxx.kind() {
            ObjectKind::Box(props) => assert_eq!(props.line_width, 1.0),
            other => panic!("unexpected kind {:?}", other),
        }

        let mut text = LabelObject::new_text(0.0, 0.0, 10.0, 10.0, "hi");
        text.set_line_width(4.0);
        text.set_fill_color_node(ColorNode::from_color(Color::rgb(1, 2, 3)));
        match text.kind() {
            ObjectKind::Text(props) => {
                assert_eq!(props.font_family, "Sans");
                assert_eq!(props.text, "hi");
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_text_setters_apply() {
        let mut text = LabelObject::new_text(0.0, 0.0, 10.0, 10.0, "hi");
        text.set_font_family("Mono");
        text.set_font_size(14.0);
        text.set_font_weight(FontWeight::Bold);
        text.set_font_italic_flag(true);
        text.set_text_halign(HAlign::Center);
        text.set_text_valign(VAlign::Bottom);
        text.set_text_line_spacing(1.5);
        text.set_text_color_node(ColorNode::from_key("accent"));
        match text.kind() {
            ObjectKind::Text(props) => {
                assert_eq!(props.font_family, "Mono");
                assert_eq!(props.font_size, 14.0);
                assert_eq!(props.font_weight, FontWeight::Bold);
                assert!(props.font_italic);
                assert_eq!(props.halign, HAlign::Center);
                assert_eq!(props.valign, VAlign::Bottom);
                assert_eq!(props.line_spacing, 1.5);
                assert!(props.color.field_flag);
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_shape_setters_apply_to_line() {
        let mut line = LabelObject::new_line(0.0, 0.0, 10.0, 0.0);
        line.set_line_width(2.5);
        line.set_line_color_node(ColorNode::from_color(Color::rgb(255, 0, 0)));
        line.set_fill_color_node(ColorNode::from_color(Color::rgb(0, 255, 0)));
        match line.kind() {
            ObjectKind::Line(props) => {
                assert_eq!(props.line_width, 2.5);
                assert_eq!(props.line_color.color, Color::rgb(255, 0, 0));
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_text_node_resolution() {
        let mut record = MergeRecord::new();
        record.insert("name", "Ada");
        assert_eq!(TextNode::from_text("fixed").resolve(Some(&record)), "fixed");
        assert_eq!(TextNode::from_key("name").resolve(Some(&record)), "Ada");
        assert_eq!(TextNode::from_key("name").resolve(None), "");
        assert_eq!(TextNode::from_key("missing").resolve(Some(&record)), "");
    }
}
