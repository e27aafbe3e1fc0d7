//! HTTP transport: a worker thread performs blocking requests and posts replies back.

use crate::transport::{SolverJob, SolverReply, SolverTransport, Ticket};
use crate::wire::{decode_reply, GenerateRequest, NetworkSnapshot, ResolveRequest};
use crate::SolverError;
use std::sync::mpsc;
use std::time::Duration;

/// Path of the generation endpoint relative to the base URL.
pub const GENERATE_PATH: &str = "generator.json";
/// Path of the resolve endpoint relative to the base URL.
pub const RESOLVE_PATH: &str = "resolve";

/// Solver service reached over HTTP.
///
/// Jobs are queued to one background thread; replies are collected by
/// [`SolverTransport::poll`] on the render thread.
pub struct HttpSolver {
    jobs: mpsc::Sender<(Ticket, SolverJob)>,
    replies: mpsc::Receiver<SolverReply>,
    worker_alive: bool,
}

impl HttpSolver {
    pub fn spawn(base_url: &str, timeout: Duration) -> Result<Self, SolverError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        let base = base_url.trim_end_matches('/').to_string();

        let (job_tx, job_rx) = mpsc::channel::<(Ticket, SolverJob)>();
        let (reply_tx, reply_rx) = mpsc::channel();

        std::thread::Builder::new()
            .name("solver-http".into())
            .spawn(move || {
                for (ticket, job) in job_rx {
                    let kind = job.kind();
                    let result = execute(&client, &base, &job);
                    if reply_tx.send(SolverReply { ticket, kind, result }).is_err() {
                        break;
                    }
                }
                log::debug!("Solver worker exiting");
            })?;

        log::info!("Solver client ready for {}", base_url);
        Ok(Self {
            jobs: job_tx,
            replies: reply_rx,
            worker_alive: true,
        })
    }
}

impl SolverTransport for HttpSolver {
    fn submit(&mut self, ticket: Ticket, job: SolverJob) {
        let kind = job.kind();
        if self.jobs.send((ticket, job)).is_err() {
            log::error!("Cannot send {} request #{}: {}", kind, ticket, SolverError::WorkerGone);
            self.worker_alive = false;
        }
    }

    fn poll(&mut self) -> Vec<SolverReply> {
        let mut out = Vec::new();
        loop {
            match self.replies.try_recv() {
                Ok(reply) => out.push(reply),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    if self.worker_alive {
                        log::warn!("Solver worker disconnected");
                        self.worker_alive = false;
                    }
                    break;
                }
            }
        }
        out
    }
}

fn execute(
    client: &reqwest::blocking::Client,
    base: &str,
    job: &SolverJob,
) -> Result<NetworkSnapshot, SolverError> {
    match job {
        SolverJob::Generate(request) => generate(client, base, request),
        SolverJob::Resolve(request) => resolve(client, base, request),
    }
}

fn generate(
    client: &reqwest::blocking::Client,
    base: &str,
    request: &GenerateRequest,
) -> Result<NetworkSnapshot, SolverError> {
    let response = client
        .get(format!("{}/{}", base, GENERATE_PATH))
        .query(&request.query_pairs())
        .send()?;
    decode_reply(&read_body(response)?)
}

fn resolve(
    client: &reqwest::blocking::Client,
    base: &str,
    request: &ResolveRequest,
) -> Result<NetworkSnapshot, SolverError> {
    let response = client
        .post(format!("{}/{}", base, RESOLVE_PATH))
        .json(request)
        .send()?;
    decode_reply(&read_body(response)?)
}

fn read_body(response: reqwest::blocking::Response) -> Result<String, SolverError> {
    let status = response.status();
    if !status.is_success() {
        return Err(SolverError::Status(status.as_u16()));
    }
    Ok(response.text()?)
}
