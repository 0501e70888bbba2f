use std::fmt::{Display, Formatter, Result as FmtResult};
use thumbnailer_core::{FilterDecision, PipelineError, ProcessingOutcome};

/// Pipeline step interrupted by cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Read,
    Derive,
    Write,
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Stage::Read => write!(f, "read"),
            Stage::Derive => write!(f, "derive"),
            Stage::Write => write!(f, "write"),
        }
    }
}

/// How a single invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Filtered out before any I/O; nothing reported.
    Discarded(FilterDecision),
    /// Object key yields no asset identity; nothing reported.
    Rejected(PipelineError),
    /// Outcome accepted by the metadata service.
    Reported(ProcessingOutcome),
    /// Outcome computed but the status update failed.
    ReportFailed {
        outcome: ProcessingOutcome,
        error: PipelineError,
    },
    /// Signal fired mid-flight; nothing reported, redelivery expected.
    Cancelled { stage: Stage },
}

impl Disposition {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Disposition::Cancelled { .. })
    }

    pub fn outcome(&self) -> Option<&ProcessingOutcome> {
        match self {
            Disposition::Reported(outcome) | Disposition::ReportFailed { outcome, .. } => {
                Some(outcome)
            }
            _ => None,
        }
    }

    /// Short label for acknowledgements and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Disposition::Discarded(decision) => decision.as_str(),
            Disposition::Rejected(_) => "rejected",
            Disposition::Reported(_) => "reported",
            Disposition::ReportFailed { .. } => "report_failed",
            Disposition::Cancelled { .. } => "cancelled",
        }
    }
}
