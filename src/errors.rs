// src/errors.rs
use std::fmt;

/// Pipeline stage an error surfaced from inside `find_nearby`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    BoundingBox,
    Fetch,
    Distance,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::BoundingBox => "bounding-box computation",
            Stage::Fetch => "fetch",
            Stage::Distance => "distance computation",
        };
        f.write_str(label)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HubFinderError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{field} must be between {min} and {max} degrees, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("search service request failed")]
    FetchFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("operation cancelled")]
    Cancelled,

    #[error("{stage} stage failed")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<HubFinderError>,
    },
}

impl HubFinderError {
    pub fn fetch_failed(source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        HubFinderError::FetchFailed {
            source: source.into(),
        }
    }

    pub fn at_stage(self, stage: Stage) -> Self {
        HubFinderError::Stage {
            stage,
            source: Box::new(self),
        }
    }

    /// Innermost error once stage labels are peeled off.
    pub fn root(&self) -> &HubFinderError {
        match self {
            HubFinderError::Stage { source, .. } => source.root(),
            other => other,
        }
    }

    /// Outermost stage label, if the error was raised inside the pipeline.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            HubFinderError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.root(), HubFinderError::Cancelled)
    }
}
