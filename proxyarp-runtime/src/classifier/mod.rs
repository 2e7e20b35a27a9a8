//! # What are they for?
//!
//! Classifiers look at something by reference and say which group it belongs to, without modifying it. The
//! proxy uses them to decide whether a port may receive frames it synthesizes: ports in the middle of the
//! fabric must never see proxy output, ports at the edge may.
mod port;
pub use self::port::*;

/// Determines the kind of thing we have. `Classifier::Class` is then consumed by the caller to pick the path
/// the subject takes.
pub trait Classifier {
    type Subject;
    type Class: Sized;

    fn classify(&self, subject: &Self::Subject) -> Self::Class;
}
