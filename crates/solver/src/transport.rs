//! Request/reply seam between the viewer and the solver service.

use crate::wire::{GenerateRequest, NetworkSnapshot, ResolveRequest};
use crate::SolverError;

/// Monotonic request tag; replies carry the ticket of the request they answer.
pub type Ticket = u64;

/// A unit of work for the service.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverJob {
    Generate(GenerateRequest),
    Resolve(ResolveRequest),
}

impl SolverJob {
    pub fn kind(&self) -> JobKind {
        match self {
            SolverJob::Generate(_) => JobKind::Generate,
            SolverJob::Resolve(_) => JobKind::Resolve,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Generate,
    Resolve,
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobKind::Generate => write!(f, "generate"),
            JobKind::Resolve => write!(f, "resolve"),
        }
    }
}

/// Outcome of one job.
#[derive(Debug)]
pub struct SolverReply {
    pub ticket: Ticket,
    pub kind: JobKind,
    pub result: Result<NetworkSnapshot, SolverError>,
}

/// Fire-and-forget job submission with replies drained later on the caller's thread.
pub trait SolverTransport {
    /// Queue a job. Never blocks on the network.
    fn submit(&mut self, ticket: Ticket, job: SolverJob);

    /// Replies that arrived since the last call, in arrival order.
    fn poll(&mut self) -> Vec<SolverReply>;
}
