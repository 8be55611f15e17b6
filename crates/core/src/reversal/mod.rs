//! Reversal engine.
//!
//! Corrections to posted entries never touch their lines; a new entry with
//! mirrored lines cancels the original fully (void) or proportionally
//! (refund) and points back to it through `reversal_of`.

pub mod engine;
pub mod mirror;

#[cfg(test)]
mod mirror_props;

pub use engine::ReversalEngine;
pub use mirror::{ReversalPolicy, mirror_lines};
