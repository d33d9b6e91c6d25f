//! # GeoMoves Core
//!
//! Shared, I/O-free logic for GeoMoves: the family-tree data model, the
//! database collaborator trait, coordinate and date normalization, the
//! generation walker, mark extraction and aggregation, and the timed
//! animation state machine that reveals one generation of migrations per
//! tick.
//!
//! This crate contains no tokio, filesystem I/O, or rendering code. The
//! application crate supplies a [`tree::FamilyTree`] backend, a
//! [`surface::MapSurface`] and an [`animation::Timer`].
//!
//! ## Data flow
//!
//! ```text
//! root person ─▶ walker ─▶ (person, level) ─▶ extract ─▶ marks
//!                                                          │
//!            surface ◀── animation tick ◀── aggregate ◀────┘
//! ```

pub mod aggregate;
pub mod animation;
pub mod color;
pub mod coords;
pub mod date;
pub mod extract;
pub mod models;
pub mod names;
pub mod surface;
pub mod tree;
pub mod walker;

#[cfg(test)]
mod testing;
