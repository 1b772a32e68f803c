//! # tagscope core
//!
//! Analyses over a loaded Go package:
//!
//! * [`resolver`] unwraps named and pointer types down to a struct shape.
//! * [`structs`] lists every struct-shaped declaration.
//! * [`tags`] walks one struct and collects dotted paths of tag values.
//! * [`loader`] turns a directory of Go sources into the package model.

pub mod loader;
pub mod resolver;
pub mod structs;
pub mod tags;
