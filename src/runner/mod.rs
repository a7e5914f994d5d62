//! Bootstrap sequencing and reporting.

pub mod report;
pub mod sequence;

pub use report::{BootstrapReport, CheckReport, CheckStatus};
pub use sequence::{RunOptions, Sequencer};
