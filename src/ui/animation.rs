use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use rand::Rng;

use crate::ai;
use crate::game::types::Choice;

/// Runs an action once after a delay, on the UI thread.
pub trait Scheduler {
    fn once(&self, delay: Duration, action: Box<dyn FnOnce()>);
}

/// Scheduler backed by the GLib main loop.
pub struct GlibScheduler;

impl Scheduler for GlibScheduler {
    fn once(&self, delay: Duration, action: Box<dyn FnOnce()>) {
        glib::timeout_add_local_once(delay, action);
    }
}

/// What the "computer is choosing" sequence shows next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStep {
    /// A throwaway pick to flash on screen.
    Flicker(Choice),
    Done,
}

/// Countdown of flicker frames before the real pick is revealed.
#[derive(Debug, Clone)]
pub struct Reveal {
    remaining: u32,
    interval: Duration,
}

impl Reveal {
    pub fn new(steps: u32, interval: Duration) -> Self {
        Self {
            remaining: steps,
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> RevealStep {
        if self.remaining == 0 {
            return RevealStep::Done;
        }
        self.remaining -= 1;
        RevealStep::Flicker(ai::computer_choice(rng))
    }
}

/// Drive `reveal` to completion: the first frame shows immediately, each
/// later one `interval` after the previous, then `on_done` runs once.
pub fn run_reveal(
    scheduler: Rc<dyn Scheduler>,
    reveal: Reveal,
    on_flicker: impl Fn(Choice) + 'static,
    on_done: impl FnOnce() + 'static,
) {
    let frames = Rc::new(Frames {
        reveal: RefCell::new(reveal),
        on_flicker: Box::new(on_flicker),
        on_done: RefCell::new(Some(Box::new(on_done))),
    });
    Frames::tick(frames, scheduler);
}

struct Frames {
    reveal: RefCell<Reveal>,
    on_flicker: Box<dyn Fn(Choice)>,
    on_done: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl Frames {
    fn tick(this: Rc<Self>, scheduler: Rc<dyn Scheduler>) {
        let step = this.reveal.borrow_mut().step(&mut rand::thread_rng());
        match step {
            RevealStep::Flicker(choice) => {
                (this.on_flicker)(choice);
                let delay = this.reveal.borrow().interval();
                let next = scheduler.clone();
                scheduler.once(delay, Box::new(move || Frames::tick(this, next)));
            }
            RevealStep::Done => {
                let done = this.on_done.borrow_mut().take();
                if let Some(done) = done {
                    done();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::VecDeque;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    /// Queues actions and runs them on demand, recording the delays.
    #[derive(Default)]
    struct ManualScheduler {
        queue: RefCell<VecDeque<(Duration, Box<dyn FnOnce()>)>>,
        delays: RefCell<Vec<Duration>>,
    }

    impl ManualScheduler {
        fn run_all(&self) {
            loop {
                let next = self.queue.borrow_mut().pop_front();
                match next {
                    Some((delay, action)) => {
                        self.delays.borrow_mut().push(delay);
                        action();
                    }
                    None => break,
                }
            }
        }
    }

    impl Scheduler for ManualScheduler {
        fn once(&self, delay: Duration, action: Box<dyn FnOnce()>) {
            self.queue.borrow_mut().push_back((delay, action));
        }
    }

    #[test]
    fn reveal_counts_down_then_stays_done() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut reveal = Reveal::new(3, Duration::from_millis(10));
        for _ in 0..3 {
            assert!(matches!(reveal.step(&mut rng), RevealStep::Flicker(_)));
        }
        assert_eq!(reveal.step(&mut rng), RevealStep::Done);
        assert_eq!(reveal.step(&mut rng), RevealStep::Done);
    }

    #[test]
    fn run_reveal_flickers_each_frame_then_finishes_once() {
        let scheduler = Rc::new(ManualScheduler::default());
        let flickers = Rc::new(Cell::new(0));
        let done = Rc::new(Cell::new(0));
        {
            let flickers = flickers.clone();
            let done = done.clone();
            run_reveal(
                scheduler.clone(),
                Reveal::new(15, Duration::from_millis(75)),
                move |_| flickers.set(flickers.get() + 1),
                move || done.set(done.get() + 1),
            );
        }
        // First frame is shown synchronously.
        assert_eq!(flickers.get(), 1);
        assert_eq!(done.get(), 0);

        scheduler.run_all();
        assert_eq!(flickers.get(), 15);
        assert_eq!(done.get(), 1);
        let delays = scheduler.delays.borrow();
        assert_eq!(delays.len(), 15);
        assert!(delays.iter().all(|d| *d == Duration::from_millis(75)));
    }

    #[test]
    fn zero_steps_finishes_immediately() {
        let scheduler = Rc::new(ManualScheduler::default());
        let done = Rc::new(Cell::new(false));
        {
            let done = done.clone();
            run_reveal(
                scheduler.clone(),
                Reveal::new(0, Duration::from_millis(75)),
                |_| panic!("no frames expected"),
                move || done.set(true),
            );
        }
        assert!(done.get());
        assert!(scheduler.queue.borrow().is_empty());
    }
}
