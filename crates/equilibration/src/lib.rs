//! Equilibration structure selection.
//!
//! Before production epochs start, each input structure is run through a
//! short equilibration batch. This crate turns the resulting trajectories
//! into new starting structures.
//!
//! # Modes
//!
//! - **Last snapshot**: the final snapshot of every trajectory, one per
//!   trajectory.
//! - **Scored**: all snapshots of all trajectories are pooled and scored by
//!   normalized energy plus the population of their structural neighbourhood.
//!   A single winner is returned no matter how many trajectories were pooled.
//!
//! The asymmetry between the two modes (many results vs. one) is long-standing
//! behaviour that downstream tooling relies on.
//!
//! # Scoring
//!
//! ```text
//!  reports ──► CandidateTable (energy, similarity) + per-trajectory offsets
//!                 │
//!                 ├─ energy: shift so max = 0, divide by min  ──► [0, 1]
//!                 ├─ similarity: 10-bin histogram, replace by
//!                 │  frequency of nearest bin center         ──► [0, 1]
//!                 ▼
//!           score = energy + similarity, argmax (first wins)
//!                 │
//!                 ▼
//!           offsets ──► (trajectory, snapshot)
//! ```

mod candidates;
mod error;
mod histogram;
mod mode;
mod scoring;
mod selector;

pub use candidates::{Candidate, CandidateTable};
pub use error::SelectionError;
pub use histogram::{Histogram, DEFAULT_BINS};
pub use mode::{EquilibrationMode, ParseModeError, SelectionStrategy};
pub use scoring::{normalize_energies, select_best, similarity_weights};
pub use selector::{EquilibrationRun, EquilibrationSelector};
