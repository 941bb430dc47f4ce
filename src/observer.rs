//! Change notification for the document model.
//!
//! Observers register with a `LabelModel` and receive synchronous callbacks,
//! in registration order, from within the mutating call itself. The model is
//! single-threaded; an observer must not mutate the model it is observing
//! from inside a callback.

use crate::object::ObjectId;

/// Receiver for model events. Every method has a no-op default so observers
/// implement only the channels they care about.
pub trait ModelObserver {
    /// An object was appended to the top of the stacking order.
    fn object_added(&mut self, _id: ObjectId) {}
    /// An object was removed from the document.
    fn object_deleted(&mut self, _id: ObjectId) {}
    /// An object's properties or transform changed.
    fn object_changed(&mut self, _id: ObjectId) {}
    /// An object's position changed.
    fn object_moved(&mut self, _id: ObjectId) {}
    /// An object was restacked to the top.
    fn object_to_top(&mut self, _id: ObjectId) {}
    /// An object was restacked to the bottom.
    fn object_to_bottom(&mut self, _id: ObjectId) {}
    /// The set of selected objects changed.
    fn selection_changed(&mut self) {}
    /// Catch-all fired once at the end of every successful content mutation.
    fn changed(&mut self) {}
}

/// Handle identifying a registered observer, for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

impl ObserverId {
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}
