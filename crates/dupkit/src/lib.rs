//! dupkit — a duplicate/similar-file result browser.
//!
//! The pipeline core (entry conversion, group assembly, filtering, sorting,
//! selection, virtualized windowing) is plain library code; the binary
//! wires it to a scanning backend task and a ratatui front end.

pub mod backend;
pub mod logging;
pub mod model;
pub mod settings;
pub mod tools;
pub mod ui;
