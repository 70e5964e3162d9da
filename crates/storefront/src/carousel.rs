//! Hero carousel: slide rotation state and its auto-advance timer.
//!
//! [`Carousel`] is the pure index arithmetic the home page renders from.
//! [`CarouselController`] pairs it with an [`AutoAdvance`] handle for
//! callers that drive the rotation in-process: manual navigation restarts
//! the timer, pointer entry stops it and pointer exit restarts it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Zero-based position within a fixed number of slides.
///
/// Navigation wraps in both directions. With no slides the index stays at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    len: usize,
    index: usize,
}

impl Carousel {
    /// A carousel showing its first slide.
    #[must_use]
    pub const fn new(len: usize) -> Self {
        Self { len, index: 0 }
    }

    /// A carousel positioned at `index`, wrapped into range.
    #[must_use]
    pub const fn at(len: usize, index: usize) -> Self {
        let mut carousel = Self::new(len);
        carousel.go_to(index);
        carousel
    }

    /// Current slide.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Number of slides.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index that `next` would move to.
    #[must_use]
    pub const fn next_index(&self) -> usize {
        if self.len == 0 {
            0
        } else {
            (self.index + 1) % self.len
        }
    }

    /// Index that `prev` would move to.
    #[must_use]
    pub const fn prev_index(&self) -> usize {
        if self.len == 0 {
            0
        } else {
            (self.index + self.len - 1) % self.len
        }
    }

    pub const fn next(&mut self) {
        self.index = self.next_index();
    }

    pub const fn prev(&mut self) {
        self.index = self.prev_index();
    }

    /// Jump to a slide (indicator control).
    pub const fn go_to(&mut self, index: usize) {
        if self.len != 0 {
            self.index = index % self.len;
        }
    }
}

/// Cancellable repeating timer.
///
/// At most one task runs at a time; `start` aborts the previous task before
/// spawning, and dropping the handle aborts it too.
#[derive(Debug)]
pub struct AutoAdvance {
    interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl AutoAdvance {
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            task: None,
        }
    }

    /// Run `tick` every interval, first firing one full interval from now.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F>(&mut self, mut tick: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.stop();

        let interval = self.interval;
        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                tick();
            }
        }));
    }

    /// Cancel the running task, if any.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

impl Drop for AutoAdvance {
    fn drop(&mut self) {
        self.stop();
    }
}

/// A carousel driven by an auto-advance timer.
#[derive(Debug)]
pub struct CarouselController {
    carousel: Arc<Mutex<Carousel>>,
    timer: AutoAdvance,
}

impl CarouselController {
    /// A stopped controller at slide 0.
    #[must_use]
    pub fn new(len: usize, interval: Duration) -> Self {
        Self {
            carousel: Arc::new(Mutex::new(Carousel::new(len))),
            timer: AutoAdvance::new(interval),
        }
    }

    /// Current slide.
    #[must_use]
    pub fn index(&self) -> usize {
        lock(&self.carousel).index()
    }

    /// Begin auto-advancing.
    pub fn start(&mut self) {
        let carousel = Arc::clone(&self.carousel);
        self.timer.start(move || lock(&carousel).next());
    }

    pub fn stop(&mut self) {
        self.timer.stop();
    }

    /// Restart the interval from now.
    pub fn restart(&mut self) {
        self.start();
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn next(&mut self) {
        lock(&self.carousel).next();
        self.restart();
    }

    pub fn prev(&mut self) {
        lock(&self.carousel).prev();
        self.restart();
    }

    pub fn go_to(&mut self, index: usize) {
        lock(&self.carousel).go_to(index);
        self.restart();
    }

    /// Pointer entered the carousel region: suspend auto-advance.
    pub fn pointer_enter(&mut self) {
        self.stop();
    }

    /// Pointer left the carousel region: resume auto-advance.
    pub fn pointer_leave(&mut self) {
        self.restart();
    }
}

fn lock(carousel: &Mutex<Carousel>) -> MutexGuard<'_, Carousel> {
    carousel.lock().unwrap_or_else(PoisonError::into_inner)
}
