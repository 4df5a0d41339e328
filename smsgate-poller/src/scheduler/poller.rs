//! Job poller
//!
//! Polls the queue for one pending job per tick and dispatches it.
//! Cycles run back to back on a single polling task, so two cycles can
//! never overlap: a cycle that outruns the interval delays the next tick
//! instead of racing it. A failed cycle surfaces on the status board and
//! the loop carries on at the next tick.

use anyhow::Result;
use smsgate_core::domain::job::{DispatchStatus, Job};
use smsgate_core::domain::poller::PollerState;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::repository::JobQueue;
use crate::service::{SmsSender, StatusService};

/// Outcome of a single poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CycleOutcome {
    /// The queue had no pending job
    Empty,

    /// One job was sent and acknowledged
    Dispatched,
}

/// Job poller that repeatedly fetches, sends, and acknowledges jobs
///
/// An owned scheduler object, not a process-wide timer: `start` spawns
/// the polling task, `stop` shuts it down at the next safe point, and
/// independent instances never interfere.
pub struct JobPoller {
    queue: Arc<dyn JobQueue>,
    sender: Arc<dyn SmsSender>,
    status: Arc<dyn StatusService>,
    worker: Option<PollWorker>,
}

/// Handle to the spawned polling task
struct PollWorker {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl JobPoller {
    /// Creates a new job poller
    pub fn new(
        queue: Arc<dyn JobQueue>,
        sender: Arc<dyn SmsSender>,
        status: Arc<dyn StatusService>,
    ) -> Self {
        Self {
            queue,
            sender,
            status,
            worker: None,
        }
    }

    /// Starts the polling loop if not already running
    ///
    /// Calling while running is a no-op. The interval must be positive;
    /// the configuration layer validates this before handing it over.
    pub fn start(&mut self, interval: Duration) {
        if self.worker.is_some() {
            debug!("Poller already running, ignoring start");
            return;
        }

        info!("Starting job poller (interval: {:?})", interval);

        let (stop_tx, stop_rx) = watch::channel(false);
        let cycle = PollCycle {
            queue: Arc::clone(&self.queue),
            sender: Arc::clone(&self.sender),
            status: Arc::clone(&self.status),
        };
        let handle = tokio::spawn(cycle.run(interval, stop_rx));

        self.worker = Some(PollWorker { stop_tx, handle });
    }

    /// Stops the polling loop
    ///
    /// Takes effect after the in-flight cycle (if any) completes; future
    /// ticks do not fire. Calling while stopped is a no-op.
    pub async fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            debug!("Poller not running, ignoring stop");
            return;
        };

        info!("Stopping job poller");

        let _ = worker.stop_tx.send(true);
        if let Err(e) = worker.handle.await {
            warn!("Polling task panicked: {}", e);
        }
    }

    /// Whether the polling loop is currently running
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }
}

/// Task-owned half of the poller: the loop and the per-tick work
struct PollCycle {
    queue: Arc<dyn JobQueue>,
    sender: Arc<dyn SmsSender>,
    status: Arc<dyn StatusService>,
}

impl PollCycle {
    /// Runs the polling loop until stopped
    async fn run(self, interval: Duration, mut stop_rx: watch::Receiver<bool>) {
        let mut ticker = time::interval(interval);
        // A cycle that overruns the interval delays the next tick; ticks
        // are never replayed in a burst and never run concurrently.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            // Shutdown is observed between cycles only, never mid-cycle.
            tokio::select! {
                _ = stop_rx.changed() => break,
                _ = ticker.tick() => {}
            }
            if *stop_rx.borrow() {
                break;
            }

            match self.run_cycle().await {
                Ok(CycleOutcome::Dispatched) => {
                    debug!("Processed 1 job this cycle");
                }
                Ok(CycleOutcome::Empty) => {
                    debug!("No job available");
                }
                Err(e) => {
                    error!("Error during poll cycle: {:#}", e);
                    self.status.record(PollerState::Error, format!("{:#}", e));
                }
            }
        }

        debug!("Polling loop exited");
    }

    /// Performs one fetch→send→acknowledge cycle
    async fn run_cycle(&self) -> Result<CycleOutcome> {
        self.status
            .record(PollerState::Checking, "checking queue".to_string());

        let Some(job) = self.queue.fetch_next().await? else {
            self.status
                .record(PollerState::Idle, "no pending job".to_string());
            return Ok(CycleOutcome::Empty);
        };

        info!("Fetched job {} for {}", job.id, job.phone);
        self.dispatch(job).await?;

        Ok(CycleOutcome::Dispatched)
    }

    /// Sends one job and acknowledges the attempt
    ///
    /// The send capability offers no delivery receipt; the acknowledgment
    /// carries attempt-level status only. A capability error is still
    /// acknowledged, as "failed", so the queue can settle the claim.
    async fn dispatch(&self, job: Job) -> Result<()> {
        self.status
            .record(PollerState::Sending, format!("sending to {}", job.phone));

        let outcome = match self.sender.send(&job.phone, &job.message).await {
            Ok(()) => DispatchStatus::Sent,
            Err(e) => {
                warn!("Send capability failed for job {}: {:#}", job.id, e);
                DispatchStatus::Failed
            }
        };

        self.status.record(
            PollerState::Acknowledging,
            format!("acknowledging job {}", job.id),
        );

        self.queue.acknowledge(&job.id, outcome).await?;

        match outcome {
            DispatchStatus::Sent => {
                info!("Job {} sent to {}", job.id, job.phone);
                self.status
                    .record(PollerState::Idle, format!("last sent to {}", job.phone));
            }
            DispatchStatus::Failed => {
                self.status.record(
                    PollerState::Error,
                    format!("send failed for job {}", job.id),
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::InMemoryStatusBoard;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// One observable call made by a cycle, in order
    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Fetch,
        Send(String, String),
        Ack(String, DispatchStatus),
    }

    #[derive(Clone, Default)]
    struct EventLog(Arc<Mutex<Vec<Event>>>);

    impl EventLog {
        fn push(&self, event: Event) {
            self.0.lock().unwrap().push(event);
        }

        fn events(&self) -> Vec<Event> {
            self.0.lock().unwrap().clone()
        }

        fn fetch_count(&self) -> usize {
            self.events().iter().filter(|e| **e == Event::Fetch).count()
        }
    }

    /// Scripted response for one fetch call
    enum FetchScript {
        Job(Job),
        Empty,
        Fail(&'static str),
        /// Sleeps before returning the job, to span interval boundaries
        Slow(Duration, Job),
    }

    struct ScriptedQueue {
        log: EventLog,
        script: Mutex<VecDeque<FetchScript>>,
        fail_ack: bool,
    }

    impl ScriptedQueue {
        fn new(log: EventLog, script: Vec<FetchScript>) -> Self {
            Self {
                log,
                script: Mutex::new(script.into()),
                fail_ack: false,
            }
        }
    }

    #[async_trait]
    impl JobQueue for ScriptedQueue {
        async fn fetch_next(&self) -> Result<Option<Job>> {
            self.log.push(Event::Fetch);
            let step = self.script.lock().unwrap().pop_front();
            match step {
                Some(FetchScript::Job(job)) => Ok(Some(job)),
                Some(FetchScript::Empty) | None => Ok(None),
                Some(FetchScript::Fail(message)) => Err(anyhow::anyhow!(message)),
                Some(FetchScript::Slow(delay, job)) => {
                    time::sleep(delay).await;
                    Ok(Some(job))
                }
            }
        }

        async fn acknowledge(&self, job_id: &str, status: DispatchStatus) -> Result<()> {
            self.log.push(Event::Ack(job_id.to_string(), status));
            if self.fail_ack {
                anyhow::bail!("acknowledge rejected");
            }
            Ok(())
        }
    }

    struct RecordingSender {
        log: EventLog,
        fail: bool,
    }

    #[async_trait]
    impl SmsSender for RecordingSender {
        async fn send(&self, phone: &str, message: &str) -> Result<()> {
            self.log
                .push(Event::Send(phone.to_string(), message.to_string()));
            if self.fail {
                anyhow::bail!("modem rejected message");
            }
            Ok(())
        }
    }

    fn job(id: &str) -> Job {
        Job {
            id: id.to_string(),
            phone: "+923001234567".to_string(),
            message: "Fee due".to_string(),
        }
    }

    struct Harness {
        log: EventLog,
        board: InMemoryStatusBoard,
        queue: Arc<ScriptedQueue>,
        sender: Arc<RecordingSender>,
    }

    fn harness(script: Vec<FetchScript>) -> Harness {
        let log = EventLog::default();
        Harness {
            queue: Arc::new(ScriptedQueue::new(log.clone(), script)),
            sender: Arc::new(RecordingSender {
                log: log.clone(),
                fail: false,
            }),
            board: InMemoryStatusBoard::new(),
            log,
        }
    }

    impl Harness {
        fn cycle(&self) -> PollCycle {
            PollCycle {
                queue: Arc::clone(&self.queue) as Arc<dyn JobQueue>,
                sender: Arc::clone(&self.sender) as Arc<dyn SmsSender>,
                status: Arc::new(self.board.clone()),
            }
        }

        fn poller(&self) -> JobPoller {
            JobPoller::new(
                Arc::clone(&self.queue) as Arc<dyn JobQueue>,
                Arc::clone(&self.sender) as Arc<dyn SmsSender>,
                Arc::new(self.board.clone()),
            )
        }
    }

    #[tokio::test]
    async fn test_cycle_sends_then_acknowledges() {
        let h = harness(vec![FetchScript::Job(job("42"))]);

        let outcome = h.cycle().run_cycle().await.unwrap();

        assert_eq!(outcome, CycleOutcome::Dispatched);
        assert_eq!(
            h.log.events(),
            vec![
                Event::Fetch,
                Event::Send("+923001234567".to_string(), "Fee due".to_string()),
                Event::Ack("42".to_string(), DispatchStatus::Sent),
            ]
        );

        let snap = h.board.snapshot();
        assert_eq!(snap.state, PollerState::Idle);
        assert_eq!(snap.message, "last sent to +923001234567");
    }

    #[tokio::test]
    async fn test_empty_queue_skips_send_and_ack() {
        let h = harness(vec![FetchScript::Empty]);

        let outcome = h.cycle().run_cycle().await.unwrap();

        assert_eq!(outcome, CycleOutcome::Empty);
        assert_eq!(h.log.events(), vec![Event::Fetch]);

        let snap = h.board.snapshot();
        assert_eq!(snap.state, PollerState::Idle);
        assert_eq!(snap.message, "no pending job");
    }

    #[tokio::test]
    async fn test_send_failure_is_acknowledged_as_failed() {
        let mut h = harness(vec![FetchScript::Job(job("7"))]);
        h.sender = Arc::new(RecordingSender {
            log: h.log.clone(),
            fail: true,
        });

        h.cycle().run_cycle().await.unwrap();

        assert_eq!(
            h.log.events().last(),
            Some(&Event::Ack("7".to_string(), DispatchStatus::Failed))
        );
        assert_eq!(h.board.snapshot().state, PollerState::Error);
    }

    #[tokio::test]
    async fn test_ack_failure_surfaces_as_cycle_error() {
        let log = EventLog::default();
        let mut queue = ScriptedQueue::new(log.clone(), vec![FetchScript::Job(job("9"))]);
        queue.fail_ack = true;

        let cycle = PollCycle {
            queue: Arc::new(queue),
            sender: Arc::new(RecordingSender {
                log: log.clone(),
                fail: false,
            }),
            status: Arc::new(InMemoryStatusBoard::new()),
        };

        assert!(cycle.run_cycle().await.is_err());
        // send happened exactly once before the failed acknowledgment
        assert_eq!(
            log.events(),
            vec![
                Event::Fetch,
                Event::Send("+923001234567".to_string(), "Fee due".to_string()),
                Event::Ack("9".to_string(), DispatchStatus::Sent),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_error_does_not_stop_the_loop() {
        let h = harness(vec![FetchScript::Fail("connection timed out")]);
        let mut poller = h.poller();

        poller.start(Duration::from_millis(5000));

        // first tick fires immediately and fails
        time::sleep(Duration::from_millis(100)).await;
        let snap = h.board.snapshot();
        assert_eq!(snap.state, PollerState::Error);
        assert!(snap.message.contains("connection timed out"));
        assert_eq!(h.log.fetch_count(), 1);

        // next tick still fires at the configured interval
        time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(h.log.fetch_count(), 2);
        assert_eq!(h.board.snapshot().message, "no pending job");

        poller.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_cycle_never_overlaps_the_next() {
        // the first fetch spans two whole intervals
        let h = harness(vec![FetchScript::Slow(
            Duration::from_millis(12_000),
            job("1"),
        )]);
        let mut poller = h.poller();

        poller.start(Duration::from_millis(5000));
        time::sleep(Duration::from_millis(20_000)).await;
        poller.stop().await;

        // the second fetch is only issued after the first cycle's ack
        let events = h.log.events();
        assert_eq!(
            events[..4],
            [
                Event::Fetch,
                Event::Send("+923001234567".to_string(), "Fee due".to_string()),
                Event::Ack("1".to_string(), DispatchStatus::Sent),
                Event::Fetch,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_while_running_is_a_noop() {
        let h = harness(vec![]);
        let mut poller = h.poller();

        poller.start(Duration::from_millis(5000));
        poller.start(Duration::from_millis(5000));
        assert!(poller.is_running());

        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(h.log.fetch_count(), 1);

        time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(h.log.fetch_count(), 2);

        poller.stop().await;
        assert!(!poller.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_future_ticks() {
        let h = harness(vec![]);
        let mut poller = h.poller();

        poller.start(Duration::from_millis(5000));
        time::sleep(Duration::from_millis(100)).await;
        poller.stop().await;

        let fetched = h.log.fetch_count();
        time::sleep(Duration::from_millis(20_000)).await;
        assert_eq!(h.log.fetch_count(), fetched);
    }

    #[tokio::test]
    async fn test_stop_while_stopped_is_a_noop() {
        let h = harness(vec![]);
        let mut poller = h.poller();

        poller.stop().await;
        assert!(!poller.is_running());
        assert_eq!(h.log.fetch_count(), 0);
    }
}
