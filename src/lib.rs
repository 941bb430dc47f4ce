//! Label document model and mail-merge engine.
//!
//! This crate provides [`model::LabelModel`], an observable document model
//! for designing die-cut label sheets: typed design objects, selection-based
//! editing, template and paper registries, and delimited-text merge sources.
//!
//! The binary `labelsmith` prints saved documents and merge sources as JSON.

pub mod color;
pub mod db;
pub mod geometry;
pub mod merge;
pub mod model;
pub mod object;
pub mod observer;
pub mod project;
pub mod template;
pub mod undo;
