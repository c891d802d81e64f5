//! Streaming sources backed by files.

pub mod csv;
