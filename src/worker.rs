use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::board::Board;
use crate::oracle::{CombatOracle, OracleClient, SimError, SimulationOutcome};

/// Extra slack on top of the simulator timeout before the pool gives up
/// waiting for a report.
const WAIT_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct SimRequest {
    pub board: Board,
    pub reference_player: String,
    pub trials: usize,
    pub worker_count: usize,
}

pub type SimReport = Result<SimulationOutcome, SimError>;

struct SequencedRequest {
    seq: u64,
    request: SimRequest,
}

struct SequencedReport {
    seq: u64,
    report: SimReport,
}

/// Background executor for oracle calls, keeping them off the search thread.
///
/// Exactly one simulation is in flight at a time: the search loop calls
/// [`submit`](Self::submit) then blocks in [`wait`](Self::wait) before
/// submitting again. Reports therefore arrive in strict submission order.
/// The worker thread only ever writes into the report channel; it never
/// touches search state.
pub struct SimulationPool {
    requests: Option<Sender<SequencedRequest>>,
    reports: Receiver<SequencedReport>,
    handle: Option<JoinHandle<()>>,
    sim_timeout: Duration,
    next_seq: u64,
    awaited_seq: u64,
}

impl SimulationPool {
    pub fn new(oracle: Arc<dyn CombatOracle>, sim_timeout: Duration) -> Self {
        let (request_tx, request_rx) = mpsc::channel::<SequencedRequest>();
        let (report_tx, report_rx) = mpsc::channel::<SequencedReport>();

        let handle = std::thread::spawn(move || {
            let client = OracleClient::new(oracle);
            while let Ok(SequencedRequest { seq, request }) = request_rx.recv() {
                debug!(seq, "simulation worker picked up request");
                let report = client.evaluate(
                    &request.board,
                    &request.reference_player,
                    request.trials,
                    request.worker_count,
                    sim_timeout,
                );
                if report_tx.send(SequencedReport { seq, report }).is_err() {
                    break;
                }
            }
        });

        Self {
            requests: Some(request_tx),
            reports: report_rx,
            handle: Some(handle),
            sim_timeout,
            next_seq: 0,
            awaited_seq: 0,
        }
    }

    /// Hands a board to the worker thread. Call [`wait`](Self::wait) before
    /// submitting the next one.
    pub fn submit(&mut self, request: SimRequest) -> Result<(), SimError> {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.awaited_seq = seq;
        self.requests
            .as_ref()
            .and_then(|tx| tx.send(SequencedRequest { seq, request }).ok())
            .ok_or_else(|| SimError::Fault("simulation worker has shut down".into()))
    }

    /// Blocks until the in-flight simulation reports, bounded by the
    /// simulator timeout plus grace.
    ///
    /// If an earlier wait already timed out, the wedged call's late report
    /// may still be sitting in the channel; stale sequence numbers are
    /// discarded so reports stay paired with their submissions.
    pub fn wait(&mut self) -> SimReport {
        let deadline = Instant::now() + self.sim_timeout + WAIT_GRACE;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.reports.recv_timeout(remaining) {
                Ok(SequencedReport { seq, report }) if seq == self.awaited_seq => return report,
                Ok(SequencedReport { seq, .. }) => {
                    debug!(seq, awaited = self.awaited_seq, "discarding stale report");
                }
                Err(RecvTimeoutError::Timeout) => return Err(SimError::Timeout),
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(SimError::Fault("simulation worker has shut down".into()))
                }
            }
        }
    }
}

impl Drop for SimulationPool {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop.
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
