//! Undo/redo history for a label document.
//!
//! History entries are whole-document checkpoints: before mutating the
//! model, callers record a [`LabelDoc`] snapshot together with a short
//! description of the operation about to run. Undo swaps the current state
//! against the top checkpoint; redo swaps back. Storing full snapshots
//! keeps every model operation oblivious to history, at the cost of state
//! proportional to document size.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut history = UndoRedoModel::new(100);
//! history.checkpoint("Move objects", &model);
//! model.move_selection(10.0, 0.0);
//! history.undo(&mut model); // reverts the move
//! history.redo(&mut model); // re-applies it
//! ```

use crate::model::LabelModel;
use crate::project::LabelDoc;

#[derive(Debug, Clone)]
struct Checkpoint {
    description: String,
    doc: LabelDoc,
}

/// Bounded undo/redo stacks of document checkpoints.
#[derive(Debug, Clone)]
pub struct UndoRedoModel {
    undo_stack: Vec<Checkpoint>,
    redo_stack: Vec<Checkpoint>,
    max_size: usize,
}

impl UndoRedoModel {
    /// Create a new history with the given maximum undo depth.
    pub fn new(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size,
        }
    }

    /// Record the model's current state under `description` and clear the
    /// redo stack. Call this before applying the described operation.
    pub fn checkpoint(&mut self, description: impl Into<String>, model: &LabelModel) {
        self.undo_stack.push(Checkpoint {
            description: description.into(),
            doc: LabelDoc::from_model(model),
        });
        self.redo_stack.clear();
        if self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
    }

    /// Undo the last checkpointed operation, returning true if an undo was
    /// performed.
    pub fn undo(&mut self, model: &mut LabelModel) -> bool {
        if let Some(checkpoint) = self.undo_stack.pop() {
            let current = Checkpoint {
                description: checkpoint.description.clone(),
                doc: LabelDoc::from_model(model),
            };
            model.restore_from_doc(&checkpoint.doc);
            self.redo_stack.push(current);
            true
        } else {
            false
        }
    }

    /// Redo the last undone operation, returning true if a redo was
    /// performed.
    pub fn redo(&mut self, model: &mut LabelModel) -> bool {
        if let Some(checkpoint) = self.redo_stack.pop() {
            let current = Checkpoint {
                description: checkpoint.description.clone(),
                doc: LabelDoc::from_model(model),
            };
            model.restore_from_doc(&checkpoint.doc);
            self.undo_stack.push(current);
            true
        } else {
            false
        }
    }

    /// Returns true if there are operations to undo.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are operations to redo.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Description of the operation `undo` would revert.
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|c| c.description.as_str())
    }

    /// Description of the operation `redo` would re-apply.
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|c| c.description.as_str())
    }

    /// Clear all history.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::LabelObject;
    use crate::template::{Frame, FrameShape, Layout, Template};

    fn test_template() -> Template {
        Template {
            brand: "Avery".to_owned(),
            part: "5160".to_owned(),
            description: "Address labels".to_owned(),
            paper_id: "US-Letter".to_owned(),
            page_width: 612.0,
            page_height: 792.0,
            frames: vec![Frame {
                shape: FrameShape::Rect {
                    w: 200.0,
                    h: 100.0,
                    r: 0.0,
                },
                layouts: vec![Layout {
                    nx: 1,
                    ny: 1,
                    x0: 0.0,
                    y0: 0.0,
                    dx: 200.0,
                    dy: 100.0,
                }],
            }],
        }
    }

    #[test]
    fn test_undo_redo_roundtrip() {
        let mut model = LabelModel::new(test_template());
        let mut history = UndoRedoModel::new(100);
        let id = model.add_object(LabelObject::new_box(10.0, 10.0, 30.0, 20.0));
        model.select_object(id);

        history.checkpoint("Move objects", &model);
        model.move_selection(25.0, 0.0);
        assert_eq!(model.objects()[0].x0(), 35.0);

        assert!(history.undo(&mut model));
        assert_eq!(model.objects()[0].x0(), 10.0);
        assert!(history.can_redo());

        assert!(history.redo(&mut model));
        assert_eq!(model.objects()[0].x0(), 35.0);
        assert!(history.can_undo());
    }

    #[test]
    fn test_undo_on_empty_history() {
        let mut model = LabelModel::new(test_template());
        let mut history = UndoRedoModel::new(10);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(!history.undo(&mut model));
        assert!(!history.redo(&mut model));
    }

    #[test]
    fn test_checkpoint_clears_redo() {
        let mut model = LabelModel::new(test_template());
        let mut history = UndoRedoModel::new(10);
        let id = model.add_object(LabelObject::new_box(0.0, 0.0, 10.0, 10.0));
        model.select_object(id);

        history.checkpoint("Move objects", &model);
        model.move_selection(5.0, 0.0);
        history.undo(&mut model);
        assert!(history.can_redo());

        history.checkpoint("Rotate objects", &model);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_descriptions() {
        let mut model = LabelModel::new(test_template());
        let mut history = UndoRedoModel::new(10);

        history.checkpoint("Add object", &model);
        model.add_object(LabelObject::new_box(0.0, 0.0, 10.0, 10.0));
        assert_eq!(history.undo_description(), Some("Add object"));
        assert_eq!(history.redo_description(), None);

        history.undo(&mut model);
        assert_eq!(history.undo_description(), None);
        assert_eq!(history.redo_description(), Some("Add object"));
    }

    #[test]
    fn test_max_depth_evicts_oldest() {
        let mut model = LabelModel::new(test_template());
        let mut history = UndoRedoModel::new(3);

        for i in 0..5 {
            history.checkpoint(format!("Step {}", i), &model);
            model.add_object(LabelObject::new_box(i as f64, 0.0, 10.0, 10.0));
        }

        // Only the three newest checkpoints survive.
        assert_eq!(history.undo_description(), Some("Step 4"));
        assert!(history.undo(&mut model));
        assert!(history.undo(&mut model));
        assert!(history.undo(&mut model));
        assert!(!history.undo(&mut model));
        // The surviving floor is the state before step 2.
        assert_eq!(model.object_count(), 2);
    }

    #[test]
    fn test_restore_assigns_fresh_identities() {
        let mut model = LabelModel::new(test_template());
        let mut history = UndoRedoModel::new(10);
        let id = model.add_object(LabelObject::new_box(0.0, 0.0, 10.0, 10.0));

        history.checkpoint("Move objects", &model);
        model.select_object(id);
        model.move_selection(5.0, 0.0);
        history.undo(&mut model);

        // Old handles do not resolve against the restored content.
        assert!(model.object(id).is_none());
        assert_eq!(model.object_count(), 1);
        assert!(model.is_selection_empty());
    }

    #[test]
    fn test_clear() {
        let mut model = LabelModel::new(test_template());
        let mut history = UndoRedoModel::new(10);
        history.checkpoint("Add object", &model);
        model.add_object(LabelObject::new_box(0.0, 0.0, 10.0, 10.0));

        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(!history.undo(&mut model));
    }

    #[test]
    fn test_undo_restores_template_and_rotate() {
        let mut model = LabelModel::new(test_template());
        let mut history = UndoRedoModel::new(10);

        history.checkpoint("Rotate label", &model);
        model.set_rotate(true);
        assert_eq!(model.width(), 100.0);

        history.undo(&mut model);
        assert!(!model.rotate());
        assert_eq!(model.width(), 200.0);
    }
}
