//! Background fish producer
//!
//! A dedicated thread creates a fish every `cadence` and offers it to the
//! simulation through a bounded handoff queue. The producer never blocks
//! on a full queue; the new fish is dropped instead. It never touches the
//! live population.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, TrySendError};
use rand::Rng;
use rand_pcg::Pcg32;

use super::population::FishFactory;
use super::state::{Fish, FishId};

/// Longest single sleep between stop-signal checks
const STOP_POLL: Duration = Duration::from_millis(20);

/// Bounded producer -> simulation queue
pub fn handoff_queue(capacity: usize) -> (Sender<Fish>, Receiver<Fish>) {
    crossbeam_channel::bounded(capacity)
}

/// Cooperative cancellation flag shared with the producer thread
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    stopped: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

/// Result of one production cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Produced {
    Queued(FishId),
    /// Queue was full; the fish was discarded
    Dropped(FishId),
    /// The simulation side has gone away
    Closed,
}

/// Create one fish and offer it to the queue without blocking
pub fn produce_once<R: Rng + ?Sized>(
    factory: &FishFactory,
    tx: &Sender<Fish>,
    rng: &mut R,
) -> Produced {
    let fish = factory.create(rng);
    let id = fish.id;
    match tx.try_send(fish) {
        Ok(()) => Produced::Queued(id),
        Err(TrySendError::Full(_)) => Produced::Dropped(id),
        Err(TrySendError::Disconnected(_)) => Produced::Closed,
    }
}

/// Handle to the running producer thread. Stops and joins on drop.
#[derive(Debug)]
pub struct Spawner {
    stop: StopSignal,
    thread: Option<JoinHandle<()>>,
}

impl Spawner {
    /// Start producing fish on a named background thread
    pub fn start(
        factory: FishFactory,
        tx: Sender<Fish>,
        cadence: Duration,
        rng: Pcg32,
    ) -> std::io::Result<Self> {
        let stop = StopSignal::new();
        let thread_stop = stop.clone();

        let thread = std::thread::Builder::new()
            .name("fish-producer".into())
            .spawn(move || run(factory, tx, cadence, rng, thread_stop))?;

        Ok(Self {
            stop,
            thread: Some(thread),
        })
    }

    /// Ask the producer to finish after its current cycle
    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(|t| t.is_finished())
    }

    /// Stop and wait for the thread to exit
    pub fn join(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.stop();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::warn!("Fish producer thread panicked");
            }
        }
    }
}

impl Drop for Spawner {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run(factory: FishFactory, tx: Sender<Fish>, cadence: Duration, mut rng: Pcg32, stop: StopSignal) {
    log::info!("Fish producer started (cadence {:?})", cadence);

    while !stop.is_stopped() {
        match produce_once(&factory, &tx, &mut rng) {
            Produced::Queued(id) => log::debug!("Fish {} queued", id),
            Produced::Dropped(id) => log::debug!("Queue full, dropping fish {}", id),
            Produced::Closed => {
                log::debug!("Queue closed");
                break;
            }
        }
        sleep_until_stopped(cadence, &stop);
    }

    log::info!("Fish producer stopped");
}

/// Sleep for `duration`, waking early if the stop signal is raised
fn sleep_until_stopped(duration: Duration, stop: &StopSignal) {
    let deadline = Instant::now() + duration;
    while !stop.is_stopped() {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        std::thread::sleep((deadline - now).min(STOP_POLL));
    }
}
