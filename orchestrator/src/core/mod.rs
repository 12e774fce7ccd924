//! Core business logic for ranking runs

pub mod controller;
pub mod export;
pub mod ranking;

pub use controller::{CompletedRun, ControllerConfig, RunController};
pub use export::{DEFAULT_TOP_N, export_filename, render_csv};
pub use ranking::{RankAssignment, assign_ranks, rank_companies};
