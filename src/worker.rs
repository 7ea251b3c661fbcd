// src/worker.rs

//! Background polling of an SCD30.
//!
//! [`PollingWorker`] moves the driver onto its own thread. Once per interval
//! that thread reads a measurement, publishes it if plausible, and sends any
//! pending calibration. Consumers never touch the driver. They go through a
//! [`WorkerHandle`]:
//!
//! * the latest sample is published as a whole value under a mutex, so a
//!   reader sees either the old sample or the new one, never a mix;
//! * a calibration request is a single atomic slot. The last write wins, and
//!   the loop takes and clears it in one step.
//!
//! The interval wait listens on a stop channel, so [`PollingWorker::stop`]
//! returns as soon as the current iteration finishes instead of waiting out
//! the interval.

use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{info, trace, warn};

use crate::common::{
    error::Scd30Error,
    hal_traits::{Transport, WallClock},
    sample::Sample,
    timing::{interval_seconds, DEFAULT_POLL_INTERVAL, MEASUREMENT_INTERVAL_RANGE},
};
use crate::driver::Scd30;

/// Stack size requested for the polling thread.
pub const DEFAULT_STACK_SIZE: usize = 2048;

/// Hosted threads need more than an MCU task; requests are raised to this.
const MIN_STACK_SIZE: usize = 64 * 1024;

/// Construction-time settings of a [`PollingWorker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Time between two polls. Also sent to the sensor, in whole seconds.
    pub interval: Duration,
    /// Name of the polling thread.
    pub thread_name: String,
    /// Requested stack size of the polling thread in bytes.
    pub stack_size: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        WorkerConfig {
            interval: DEFAULT_POLL_INTERVAL,
            thread_name: String::from("SensorWorker"),
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

impl WorkerConfig {
    pub fn with_interval_ms(interval_ms: u32) -> Self {
        WorkerConfig {
            interval: Duration::from_millis(u64::from(interval_ms)),
            ..Default::default()
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("polling interval must be greater than zero")]
    ZeroInterval,

    #[error("worker is already running")]
    AlreadyRunning,

    #[error("worker is not running")]
    NotRunning,

    #[error("failed to spawn polling thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// The polling thread panicked; its driver is gone with it.
    #[error("polling thread panicked")]
    Panicked,

    /// An earlier spawn failure or panic consumed the driver.
    #[error("sensor driver is no longer available")]
    DriverLost,
}

#[derive(Debug, Default)]
struct Published {
    sample: Sample,
    has_unread: bool,
}

#[derive(Debug, Default)]
struct Shared {
    published: Mutex<Published>,
    pending_calibration: AtomicU16,
    running: AtomicBool,
}

/// Consumer side of a [`PollingWorker`]. Cheap to clone and usable from any thread.
#[derive(Debug, Clone)]
pub struct WorkerHandle {
    shared: Arc<Shared>,
}

impl WorkerHandle {
    pub(crate) fn new() -> Self {
        WorkerHandle {
            shared: Arc::new(Shared::default()),
        }
    }

    /// Asks the worker to recalibrate the sensor to `reference_ppm` on its next
    /// iteration. Replaces any request not yet sent. Zero cancels.
    pub fn request_calibration(&self, reference_ppm: u16) {
        info!("SCD30 calibration to {} ppm requested", reference_ppm);
        self.shared
            .pending_calibration
            .store(reference_ppm, Ordering::Release);
    }

    /// Calibration value waiting to be sent, if any.
    pub fn pending_calibration(&self) -> Option<u16> {
        match self.shared.pending_calibration.load(Ordering::Acquire) {
            0 => None,
            ppm => Some(ppm),
        }
    }

    /// True once the worker has published a sample.
    ///
    /// Reading the sample does not reset this; use
    /// [`FreshSamples`](crate::consumer::FreshSamples) to act on each sample once.
    pub fn has_unread_sample(&self) -> bool {
        self.published().has_unread
    }

    /// The latest published sample, or the invalid placeholder before the first one.
    pub fn take_sample(&self) -> Sample {
        self.published().sample
    }

    /// The latest sample if one has been published, read under a single lock.
    pub fn latest(&self) -> Option<Sample> {
        let published = self.published();
        published.has_unread.then_some(published.sample)
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    pub(crate) fn publish(&self, sample: Sample) {
        *self.published() = Published {
            sample,
            has_unread: true,
        };
    }

    fn published(&self) -> MutexGuard<'_, Published> {
        // Every write replaces the whole value, so a poisoned guard still holds a complete one.
        self.shared
            .published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

struct Runner<T, C> {
    thread: JoinHandle<Scd30<T, C>>,
    stop: Sender<()>,
}

/// Owns an [`Scd30`] and polls it on a dedicated thread while running.
///
/// Stopped on creation. Dropping a running worker stops it.
pub struct PollingWorker<T, C> {
    config: WorkerConfig,
    handle: WorkerHandle,
    driver: Option<Scd30<T, C>>,
    runner: Option<Runner<T, C>>,
}

impl<T, C> PollingWorker<T, C>
where
    T: Transport + Send + 'static,
    C: WallClock + Send + 'static,
{
    pub fn new(driver: Scd30<T, C>, config: WorkerConfig) -> Result<Self, WorkerError> {
        if config.interval.is_zero() {
            return Err(WorkerError::ZeroInterval);
        }
        Ok(PollingWorker {
            config,
            handle: WorkerHandle::new(),
            driver: Some(driver),
            runner: None,
        })
    }

    /// Spawns the polling thread.
    ///
    /// The thread starts measurement and sets the sensor interval before its
    /// first read.
    pub fn start(&mut self) -> Result<(), WorkerError> {
        if self.runner.is_some() {
            return Err(WorkerError::AlreadyRunning);
        }
        let driver = self.driver.take().ok_or(WorkerError::DriverLost)?;

        let (stop_tx, stop_rx) = mpsc::channel();
        let handle = self.handle.clone();
        let interval = self.config.interval;

        self.handle.shared.running.store(true, Ordering::Release);
        let spawned = thread::Builder::new()
            .name(self.config.thread_name.clone())
            .stack_size(self.config.stack_size.max(MIN_STACK_SIZE))
            .spawn(move || poll_loop(driver, &handle, interval, stop_rx));

        match spawned {
            Ok(thread) => {
                self.runner = Some(Runner {
                    thread,
                    stop: stop_tx,
                });
                info!(
                    "SCD30 worker started, polling every {} ms",
                    interval.as_millis()
                );
                Ok(())
            }
            Err(e) => {
                self.handle.shared.running.store(false, Ordering::Release);
                Err(WorkerError::Spawn(e))
            }
        }
    }
}

impl<T, C> PollingWorker<T, C> {
    /// Signals the polling thread and waits for it to exit.
    ///
    /// An iteration in progress, including a calibration command, runs to
    /// completion first. Nothing is published after this returns.
    pub fn stop(&mut self) -> Result<(), WorkerError> {
        let runner = self.runner.take().ok_or(WorkerError::NotRunning)?;
        self.handle.shared.running.store(false, Ordering::Release);
        // Fails only if the thread is already gone, which join reports below.
        let _ = runner.stop.send(());

        match runner.thread.join() {
            Ok(driver) => {
                self.driver = Some(driver);
                info!("SCD30 worker stopped");
                Ok(())
            }
            Err(_) => Err(WorkerError::Panicked),
        }
    }

    pub fn is_running(&self) -> bool {
        self.runner.is_some()
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// A handle for consumers on other threads.
    pub fn handle(&self) -> WorkerHandle {
        self.handle.clone()
    }

    pub fn request_calibration(&self, reference_ppm: u16) {
        self.handle.request_calibration(reference_ppm)
    }

    pub fn has_unread_sample(&self) -> bool {
        self.handle.has_unread_sample()
    }

    pub fn take_sample(&self) -> Sample {
        self.handle.take_sample()
    }

    /// Stops the worker if needed and hands the driver back.
    pub fn into_driver(mut self) -> Result<Scd30<T, C>, WorkerError> {
        if self.runner.is_some() {
            self.stop()?;
        }
        self.driver.take().ok_or(WorkerError::DriverLost)
    }
}

impl<T, C> Drop for PollingWorker<T, C> {
    fn drop(&mut self) {
        if self.runner.is_some() {
            if let Err(e) = self.stop() {
                warn!("SCD30 worker did not stop cleanly: {}", e);
            }
        }
    }
}

fn poll_loop<T, C>(
    mut driver: Scd30<T, C>,
    handle: &WorkerHandle,
    interval: Duration,
    stop: Receiver<()>,
) -> Scd30<T, C>
where
    T: Transport,
    C: WallClock,
{
    configure(&mut driver, interval);

    while handle.is_running() {
        poll_once(&mut driver, handle);

        match stop.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    driver
}

fn configure<T: Transport, C: WallClock>(driver: &mut Scd30<T, C>, interval: Duration) {
    if let Err(e) = driver.start_measurement() {
        warn!("SCD30 start measurement failed: {}", e);
    }

    let seconds = interval_seconds(interval);
    if !MEASUREMENT_INTERVAL_RANGE.contains(&seconds) {
        warn!(
            "SCD30 measurement interval {}s is outside {:?}",
            seconds, MEASUREMENT_INTERVAL_RANGE
        );
    }
    if let Err(e) = driver.set_interval(seconds) {
        warn!("SCD30 set interval failed: {}", e);
    }
}

fn poll_once<T: Transport, C: WallClock>(driver: &mut Scd30<T, C>, handle: &WorkerHandle) {
    match driver.read_measurements().and_then(Sample::into_plausible) {
        Ok(sample) => handle.publish(sample),
        Err(Scd30Error::InvalidReading { co2_ppm }) => {
            trace!("SCD30 reading of {} ppm discarded", co2_ppm)
        }
        Err(e) => warn!("SCD30 read failed: {}", e),
    }

    let pending = handle.shared.pending_calibration.swap(0, Ordering::AcqRel);
    if pending != 0 {
        match driver.calibrate(pending) {
            Ok(()) => info!("SCD30 calibrated to {} ppm", pending),
            Err(e) => warn!("SCD30 calibration to {} ppm failed: {}", pending, e),
        }
    }
}
