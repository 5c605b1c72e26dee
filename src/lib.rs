//! Driver-agnostic SQL access layer.
//!
//! Builders are immutable values normalized against an explicit [`Driver`], the resulting statement
//! runs through an [`Executor`]. Backends live in their own crates (`strata-sqlite`,
//! `strata-postgres`, `strata-mysql`) and expose a `connect(url)` returning a [`Connection`].
pub use strata_core::*;
