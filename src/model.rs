//! The label document model.
//!
//! `LabelModel` owns the ordered list of objects on a label (insertion order
//! is stacking order, front = last), the selection state, the attached page
//! template and the active merge source. Every editing operation lives here;
//! observers registered on the model receive synchronous notifications from
//! within the mutating call.
//!
//! # Usage
//!
//! ```rust,ignore
//! use labelsmith::model::LabelModel;
//! use labelsmith::object::LabelObject;
//!
//! let mut model = LabelModel::new(template);
//! let id = model.add_object(LabelObject::new_box(10.0, 10.0, 30.0, 20.0));
//! model.select_object(id);
//! model.move_selection(5.0, 0.0);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use anyhow::Result;
use camino::Utf8Path;

use crate::color::ColorNode;
use crate::geometry::Region;
use crate::merge::Merge;
use crate::object::{FontWeight, HAlign, LabelObject, ObjectId, VAlign};
use crate::observer::{ModelObserver, ObserverId};
use crate::project::LabelDoc;
use crate::template::Template;

/// Which per-object event a selection-wide operation reports.
#[derive(Clone, Copy)]
enum SelectionEvent {
    Moved,
    Changed,
}

/// An editable label document.
pub struct LabelModel {
    objects: Vec<LabelObject>,
    template: Template,
    rotate: bool,
    merge: Merge,
    modified: bool,
    observers: Vec<(ObserverId, Rc<RefCell<dyn ModelObserver>>)>,
    next_observer: u64,
}

impl LabelModel {
    /// Create an empty document on the given template.
    ///
    /// A fresh model reports itself modified; loading a saved document
    /// clears the flag.
    pub fn new(template: Template) -> Self {
        Self {
            objects: Vec::new(),
            template,
            rotate: false,
            merge: Merge::none(),
            modified: true,
            observers: Vec::new(),
            next_observer: 0,
        }
    }

    /// Rebuild a model from a saved document. The loaded model starts
    /// unmodified and with fresh object identities.
    pub fn from_doc(doc: &LabelDoc) -> Self {
        let mut model = Self::new(doc.template.clone());
        model.restore_from_doc(doc);
        model.modified = false;
        model
    }

    /// Replace the whole document content from `doc`: objects (with fresh
    /// identities), template, rotate flag and merge attachment. The merge
    /// source file, when recorded, is re-read; a failed read logs a warning
    /// and leaves an empty source of the saved kind. Clears the selection.
    pub fn restore_from_doc(&mut self, doc: &LabelDoc) {
        self.template = doc.template.clone();
        self.rotate = doc.rotate;
        self.objects = doc
            .objects
            .iter()
            .cloned()
            .map(|mut object| {
                object.refresh_id();
                object.unselect();
                object
            })
            .collect();
        let mut merge = Merge::new(doc.merge_kind);
        if let Some(path) = &doc.merge_source {
            if let Err(err) = merge.set_source(path.as_str()) {
                tracing::warn!("Failed to re-read merge source {}: {:#}", path, err);
            }
        }
        self.merge = merge;
        self.modified = true;
        self.notify(|o| o.changed());
        self.notify(|o| o.selection_changed());
    }

    // ───── Observers ─────

    /// Register an observer; events are delivered in registration order.
    pub fn add_observer(&mut self, observer: Rc<RefCell<dyn ModelObserver>>) -> ObserverId {
        let id = ObserverId::from_raw(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, observer));
        id
    }

    /// Unregister a previously added observer.
    pub fn remove_observer(&mut self, id: ObserverId) {
        self.observers.retain(|(oid, _)| *oid != id);
    }

    fn notify(&self, event: impl Fn(&mut dyn ModelObserver)) {
        for (_, observer) in &self.observers {
            event(&mut *observer.borrow_mut());
        }
    }

    // ───── Object access ─────

    /// All objects in stacking order, bottom first.
    pub fn objects(&self) -> &[LabelObject] {
        &self.objects
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// The object with the given id, if it is a current member.
    pub fn object(&self, id: ObjectId) -> Option<&LabelObject> {
        self.objects.iter().find(|o| o.id() == id)
    }

    fn object_index(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id() == id)
    }

    // ───── Template, orientation, merge ─────

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Attach a different template.
    pub fn set_template(&mut self, template: Template) {
        self.template = template;
        self.modified = true;
        self.notify(|o| o.changed());
    }

    /// Whether the design is rotated on the label (width/height swapped).
    pub fn rotate(&self) -> bool {
        self.rotate
    }

    pub fn set_rotate(&mut self, rotate: bool) {
        self.rotate = rotate;
        self.modified = true;
        self.notify(|o| o.changed());
    }

    /// Effective label width: the sizing frame's width, swapped when the
    /// rotate flag is set. 0 when the template has no frame.
    pub fn width(&self) -> f64 {
        match self.template.frame() {
            Some(frame) => {
                if self.rotate {
                    frame.h()
                } else {
                    frame.w()
                }
            }
            None => 0.0,
        }
    }

    /// Effective label height, same convention as `width`.
    pub fn height(&self) -> f64 {
        match self.template.frame() {
            Some(frame) => {
                if self.rotate {
                    frame.w()
                } else {
                    frame.h()
                }
            }
            None => 0.0,
        }
    }

    /// The active merge source.
    pub fn merge(&self) -> &Merge {
        &self.merge
    }

    /// Replace the merge attachment wholesale.
    pub fn set_merge(&mut self, merge: Merge) {
        self.merge = merge;
        self.modified = true;
        self.notify(|o| o.changed());
    }

    /// Re-point the active merge source at a new location.
    pub fn set_merge_source(&mut self, path: impl AsRef<Utf8Path>) -> Result<()> {
        self.merge.set_source(path)?;
        self.modified = true;
        self.notify(|o| o.changed());
        Ok(())
    }

    // Primary key and record selection are session state, not document
    // content: no modified flag, no events.

    pub fn set_merge_primary_key(&mut self, key: &str) {
        self.merge.set_primary_key(key);
    }

    pub fn set_merge_record_selected(&mut self, index: usize, selected: bool) {
        self.merge.set_record_selected(index, selected);
    }

    pub fn select_all_merge_records(&mut self) {
        self.merge.select_all_records();
    }

    pub fn unselect_all_merge_records(&mut self) {
        self.merge.unselect_all_records();
    }

    // ───── Modified flag ─────

    /// Whether the document differs from its last saved state.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn clear_modified(&mut self) {
        self.modified = false;
    }

    // ───── Add / delete ─────

    /// Append an object at the top of the stacking order.
    pub fn add_object(&mut self, object: LabelObject) -> ObjectId {
        let id = object.id();
        self.objects.push(object);
        self.modified = true;
        self.notify(|o| o.object_added(id));
        self.notify(|o| o.changed());
        id
    }

    /// Remove an object. An id that is not a current member is a quiet
    /// no-op returning false.
    pub fn delete_object(&mut self, id: ObjectId) -> bool {
        match self.object_index(id) {
            Some(index) => {
                self.objects.remove(index);
                self.modified = true;
                self.notify(|o| o.object_deleted(id));
                self.notify(|o| o.changed());
                true
            }
            None => false,
        }
    }

    /// Delete every selected object.
    pub fn delete_selection(&mut self) {
        for id in self.selection() {
            self.delete_object(id);
        }
        self.modified = true;
        self.notify(|o| o.changed());
        self.notify(|o| o.selection_changed());
    }

    // ───── Selection ─────

    pub fn select_object(&mut self, id: ObjectId) {
        if let Some(index) = self.object_index(id) {
            self.objects[index].select();
            self.notify(|o| o.selection_changed());
        }
    }

    pub fn unselect_object(&mut self, id: ObjectId) {
        if let Some(index) = self.object_index(id) {
            self.objects[index].unselect();
            self.notify(|o| o.selection_changed());
        }
    }

    pub fn select_all(&mut self) {
        for object in &mut self.objects {
            object.select();
        }
        self.notify(|o| o.selection_changed());
    }

    pub fn unselect_all(&mut self) {
        for object in &mut self.objects {
            object.unselect();
        }
        self.notify(|o| o.selection_changed());
    }

    /// Add every object whose extent lies fully inside `region` to the
    /// selection. Corner order of the region does not matter; objects merely
    /// overlapping the region stay as they are.
    pub fn select_region(&mut self, region: Region) {
        for object in &mut self.objects {
            if region.contains(&object.extent()) {
                object.select();
            }
        }
        self.notify(|o| o.selection_changed());
    }

    pub fn is_selection_empty(&self) -> bool {
        !self.objects.iter().any(LabelObject::is_selected)
    }

    /// True when exactly one object is selected.
    pub fn is_selection_atomic(&self) -> bool {
        self.objects.iter().filter(|o| o.is_selected()).count() == 1
    }

    /// Ids of the selected objects, in stacking order. Empty when nothing
    /// is selected.
    pub fn selection(&self) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|o| o.is_selected())
            .map(LabelObject::id)
            .collect()
    }

    /// The bottom-most selected object, if any.
    pub fn first_selected(&self) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|o| o.is_selected())
            .map(LabelObject::id)
    }

    /// The selected objects themselves, in stacking order.
    pub fn selected_objects(&self) -> impl Iterator<Item = &LabelObject> {
        self.objects.iter().filter(|o| o.is_selected())
    }

    // ───── Capability queries: true iff ANY selected object qualifies ─────

    pub fn can_selection_text(&self) -> bool {
        self.selected_objects().any(|o| o.can_text())
    }

    pub fn can_selection_fill(&self) -> bool {
        self.selected_objects().any(|o| o.can_fill())
    }

    pub fn can_selection_line_color(&self) -> bool {
        self.selected_objects().any(|o| o.can_line_color())
    }

    pub fn can_selection_line_width(&self) -> bool {
        self.selected_objects().any(|o| o.can_line_width())
    }

    // ───── Stacking order ─────

    /// Move the selected objects to the top of the stacking order, keeping
    /// their relative order.
    pub fn raise_selection_to_top(&mut self) {
        let (raised, kept): (Vec<_>, Vec<_>) =
            self.objects.drain(..).partition(LabelObject::is_selected);
        let ids: Vec<ObjectId> = raised.iter().map(LabelObject::id).collect();
        self.objects = kept;
        self.objects.extend(raised);
        self.modified = true;
        for id in ids {
            self.notify(|o| o.object_to_top(id));
        }
        self.notify(|o| o.changed());
    }

    /// Move the selected objects to the bottom of the stacking order,
    /// keeping their relative order.
    pub fn lower_selection_to_bottom(&mut self) {
        let (mut lowered, kept): (Vec<_>, Vec<_>) =
            self.objects.drain(..).partition(LabelObject::is_selected);
        let ids: Vec<ObjectId> = lowered.iter().map(LabelObject::id).collect();
        lowered.extend(kept);
        self.objects = lowered;
        self.modified = true;
        for id in ids {
            self.notify(|o| o.object_to_bottom(id));
        }
        self.notify(|o| o.changed());
    }

    // ───── Transforms ─────

    /// Rotate every selected object in place (positive = clockwise).
    pub fn rotate_selection(&mut self, theta_degrees: f64) {
        self.apply_to_selection(SelectionEvent::Changed, |object| {
            object.rotate(theta_degrees);
        });
    }

    pub fn rotate_selection_left(&mut self) {
        self.rotate_selection(-90.0);
    }

    pub fn rotate_selection_right(&mut self) {
        self.rotate_selection(90.0);
    }

    /// Mirror every selected object about its own vertical axis.
    pub fn flip_selection_horiz(&mut self) {
        self.apply_to_selection(SelectionEvent::Changed, LabelObject::flip_horiz);
    }

    /// Mirror every selected object about its own horizontal axis.
    pub fn flip_selection_vert(&mut self) {
        self.apply_to_selection(SelectionEvent::Changed, LabelObject::flip_vert);
    }

    // ───── Alignment ─────
    //
    // Alignment needs at least two selected objects. Extents are read fresh
    // per object; since every object moves only by its own delta, iteration
    // order does not matter.

    /// Align the selection along its left-most edge.
    pub fn align_selection_left(&mut self) {
        if self.is_selection_empty() || self.is_selection_atomic() {
            return;
        }
        let x1_min = self
            .selected_objects()
            .map(|o| o.extent().x1)
            .fold(f64::INFINITY, f64::min);
        self.apply_to_selection(SelectionEvent::Moved, |object| {
            let dx = x1_min - object.extent().x1;
            object.set_position_relative(dx, 0.0);
        });
    }

    /// Align the selection with its right-most object.
    pub fn align_selection_right(&mut self) {
        if self.is_selection_empty() || self.is_selection_atomic() {
            return;
        }
        let x1_max = self
            .selected_objects()
            .map(|o| o.extent().x1)
            .fold(f64::NEG_INFINITY, f64::max);
        self.apply_to_selection(SelectionEvent::Moved, |object| {
            let dx = x1_max - object.extent().x1;
            object.set_position_relative(dx, 0.0);
        });
    }

    /// Align the selection along its top-most edge.
    pub fn align_selection_top(&mut self) {
        if self.is_selection_empty() || self.is_selection_atomic() {
            return;
        }
        let y1_min = self
            .selected_objects()
            .map(|o| o.extent().y1)
            .fold(f64::INFINITY, f64::min);
        self.apply_to_selection(SelectionEvent::Moved, |object| {
            let dy = y1_min - object.extent().y1;
            object.set_position_relative(0.0, dy);
        });
    }

    /// Align the selection with its bottom-most object.
    pub fn align_selection_bottom(&mut self) {
        if self.is_selection_empty() || self.is_selection_atomic() {
            return;
        }
        let y1_max = self
            .selected_objects()
            .map(|o| o.extent().y1)
            .fold(f64::NEG_INFINITY, f64::max);
        self.apply_to_selection(SelectionEvent::Moved, |object| {
            let dy = y1_max - object.extent().y1;
            object.set_position_relative(0.0, dy);
        });
    }

    /// Align the selected objects' horizontal centers to the selected
    /// object whose center is closest to their mean center. Anchoring on a
    /// real object avoids inventing a position nothing sits at.
    pub fn align_selection_hcenter(&mut self) {
        if self.is_selection_empty() || self.is_selection_atomic() {
            return;
        }
        let centers: Vec<f64> = self
            .selected_objects()
            .map(|o| {
                let r = o.extent();
                (r.x1 + r.x2) / 2.0
            })
            .collect();
        let anchor = nearest_to_mean(&centers);
        self.apply_to_selection(SelectionEvent::Moved, |object| {
            let r = object.extent();
            let dx = anchor - (r.x1 + r.x2) / 2.0;
            object.set_position_relative(dx, 0.0);
        });
    }

    /// Vertical counterpart of `align_selection_hcenter`.
    pub fn align_selection_vcenter(&mut self) {
        if self.is_selection_empty() || self.is_selection_atomic() {
            return;
        }
        let centers: Vec<f64> = self
            .selected_objects()
            .map(|o| {
                let r = o.extent();
                (r.y1 + r.y2) / 2.0
            })
            .collect();
        let anchor = nearest_to_mean(&centers);
        self.apply_to_selection(SelectionEvent::Moved, |object| {
            let r = object.extent();
            let dy = anchor - (r.y1 + r.y2) / 2.0;
            object.set_position_relative(0.0, dy);
        });
    }

    /// Center every selected object horizontally on the label.
    pub fn center_selection_horiz(&mut self) {
        let x_center = self.width() / 2.0;
        self.apply_to_selection(SelectionEvent::Moved, |object| {
            let r = object.extent();
            let dx = x_center - (r.x1 + r.x2) / 2.0;
            object.set_position_relative(dx, 0.0);
        });
    }

    /// Center every selected object vertically on the label.
    pub fn center_selection_vert(&mut self) {
        let y_center = self.height() / 2.0;
        self.apply_to_selection(SelectionEvent::Moved, |object| {
            let r = object.extent();
            let dy = y_center - (r.y1 + r.y2) / 2.0;
            object.set_position_relative(0.0, dy);
        });
    }

    /// Translate every selected object by (dx, dy).
    pub fn move_selection(&mut self, dx: f64, dy: f64) {
        self.apply_to_selection(SelectionEvent::Moved, |object| {
            object.set_position_relative(dx, dy);
        });
    }

    // ───── Selection-wide property setters ─────
    //
    // Applied to every selected object; variants not carrying the property
    // ignore the call. Callers consult the capability queries to decide
    // what to offer, not to filter application.

    pub fn set_selection_font_family(&mut self, font_family: &str) {
        self.apply_to_selection(SelectionEvent::Changed, |object| {
            object.set_font_family(font_family);
        });
    }

    pub fn set_selection_font_size(&mut self, font_size: f64) {
        self.apply_to_selection(SelectionEvent::Changed, |object| {
            object.set_font_size(font_size);
        });
    }

    pub fn set_selection_font_weight(&mut self, font_weight: FontWeight) {
        self.apply_to_selection(SelectionEvent::Changed, |object| {
            object.set_font_weight(font_weight);
        });
    }

    pub fn set_selection_font_italic_flag(&mut self, italic: bool) {
        self.apply_to_selection(SelectionEvent::Changed, |object| {
            object.set_font_italic_flag(italic);
        });
    }

    pub fn set_selection_text_halign(&mut self, halign: HAlign) {
        self.apply_to_selection(SelectionEvent::Changed, |object| {
            object.set_text_halign(halign);
        });
    }

    pub fn set_selection_text_valign(&mut self, valign: VAlign) {
        self.apply_to_selection(SelectionEvent::Changed, |object| {
            object.set_text_valign(valign);
        });
    }

    pub fn set_selection_text_line_spacing(&mut self, line_spacing: f64) {
        self.apply_to_selection(SelectionEvent::Changed, |object| {
            object.set_text_line_spacing(line_spacing);
        });
    }

    pub fn set_selection_text_color_node(&mut self, node: ColorNode) {
        self.apply_to_selection(SelectionEvent::Changed, |object| {
            object.set_text_color_node(node.clone());
        });
    }

    pub fn set_selection_line_width(&mut self, line_width: f64) {
        self.apply_to_selection(SelectionEvent::Changed, |object| {
            object.set_line_width(line_width);
        });
    }

    pub fn set_selection_line_color_node(&mut self, node: ColorNode) {
        self.apply_to_selection(SelectionEvent::Changed, |object| {
            object.set_line_color_node(node.clone());
        });
    }

    pub fn set_selection_fill_color_node(&mut self, node: ColorNode) {
        self.apply_to_selection(SelectionEvent::Changed, |object| {
            object.set_fill_color_node(node.clone());
        });
    }

    // Runs `apply` on each selected object, then reports one per-object
    // event per touched object and a final catch-all. Marks modified even
    // when nothing is selected.
    fn apply_to_selection(
        &mut self,
        event: SelectionEvent,
        mut apply: impl FnMut(&mut LabelObject),
    ) {
        let mut touched = Vec::new();
        for object in &mut self.objects {
            if object.is_selected() {
                apply(object);
                touched.push(object.id());
            }
        }
        self.modified = true;
        for id in touched {
            match event {
                SelectionEvent::Moved => self.notify(|o| o.object_moved(id)),
                SelectionEvent::Changed => self.notify(|o| o.object_changed(id)),
            }
        }
        self.notify(|o| o.changed());
    }
}

impl fmt::Debug for LabelModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelModel")
            .field("objects", &self.objects)
            .field("template", &self.template.name())
            .field("rotate", &self.rotate)
            .field("modified", &self.modified)
            .finish_non_exhaustive()
    }
}

// The anchor for center alignment: the value closest to the mean, first
// one winning ties.
fn nearest_to_mean(centers: &[f64]) -> f64 {
    let mean = centers.iter().sum::<f64>() / centers.len() as f64;
    let mut anchor = centers[0];
    let mut best = (mean - anchor).abs();
    for &center in &centers[1..] {
        let distance = (mean - center).abs();
        if distance < best {
            best = distance;
            anchor = center;
        }
    }
    anchor
}
