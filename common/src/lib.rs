//! # tagscope common
//!
//! Shared vocabulary of the workspace: the read-only package model the
//! analyses walk, struct-tag lookup, configuration values and error types.

pub mod config;
pub mod error;
pub mod model;
