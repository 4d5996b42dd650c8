//! Traits for the external collaborators of the intake pipeline

mod language_model;

pub use language_model::*;
