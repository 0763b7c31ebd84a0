//! # Fence Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Output` - Results (JSON-serializable)
//! - `calculate(engine, input) -> CalcResult<*Output>` - evaluation against
//!   the engine's catalog, settings and spacing tables
//!
//! ## Available Calculations
//!
//! - [`estimate`] - One bay: design pressure, line and terminal post blocks,
//!   risk status, optional run quantities
//! - [`project`] - Multiple segments sharing wind parameters

pub mod estimate;
pub mod project;

use serde::{Deserialize, Serialize};

pub use estimate::{BlockResult, EstimateInput, EstimateOutput, LegacyView, SharedResult, SpacingSource};
pub use project::{ProjectInput, ProjectOutput, SegmentInput, SegmentOutput};

/// Tiered verdict. Ordered so that the worst status is the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    #[default]
    Green,
    Yellow,
    Red,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Green => "GREEN",
            Status::Yellow => "YELLOW",
            Status::Red => "RED",
        }
    }

    /// Worse of two statuses
    pub fn worst(self, other: Status) -> Status {
        self.max(other)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural role of a post in the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostRole {
    /// Intermediate post restrained by rail and fabric; bending is advisory
    Line,
    /// End post acting as a free cantilever; bending drives status
    Terminal,
}

impl PostRole {
    pub fn name(self) -> &'static str {
        match self {
            PostRole::Line => "Line",
            PostRole::Terminal => "Terminal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_ordering() {
        assert_eq!(Status::Green.worst(Status::Yellow), Status::Yellow);
        assert_eq!(Status::Red.worst(Status::Yellow), Status::Red);
        assert_eq!(Status::Green.worst(Status::Green), Status::Green);
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_string(&Status::Yellow).unwrap(), "\"YELLOW\"");
        let s: Status = serde_json::from_str("\"RED\"").unwrap();
        assert_eq!(s, Status::Red);
    }
}
