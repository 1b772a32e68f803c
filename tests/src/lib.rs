//! End-to-end tests: Go fixture packages loaded from disk and analysed.

#[cfg(test)]
mod common;
mod loading;
mod structs;
mod tags;
