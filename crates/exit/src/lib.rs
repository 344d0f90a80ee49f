//! Exit conditions for the adaptive sampling loop.
//!
//! After every epoch the outer loop asks its exit condition whether to stop.
//! Three conditions exist:
//!
//! - [`ClusterPlateau`] - stop when an epoch discovers few new clusters
//! - [`SingleMetric`] - stop when any cluster's metric crosses a threshold
//! - [`MultiTrajectoryMetric`] - stop once enough trajectories have crossed
//!   a threshold, reading the epoch's reports directly
//!
//! These are stateful objects, not pure predicates: the plateau remembers the
//! previous cluster count and the multi-trajectory condition keeps a running
//! tally. Evaluate each instance once per epoch, in epoch order.

mod builder;
mod condition;
mod config;
mod error;
mod metric;
mod multi;
mod plateau;

pub use builder::ExitConditionBuilder;
pub use condition::{ExitCondition, ExitConditionKind};
pub use config::{ExitConditionBlock, ExitConditionParams};
pub use error::{ExitConditionError, ExitConfigError};
pub use metric::SingleMetric;
pub use multi::MultiTrajectoryMetric;
pub use plateau::ClusterPlateau;
