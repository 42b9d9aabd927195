//! Frame scheduling: fixed-rate gating, self-rescheduling and cancellation.
//!
//! The host owns the clock and the frame callback (an animation frame, a
//! sleeping loop, a test). It hands every due frame to [`Runner::on_frame`],
//! which runs at most one simulation tick and asks the [`Scheduler`] for the
//! next frame before returning.

use std::time::Duration;

use crate::game::Game;
use crate::input::{Action, InputQueue, InputSender, KeyMap};
use crate::render::Renderer;
use crate::types::Event;

/// Identifies one requested frame
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

impl TickHandle {
    pub fn new(id: u64) -> Self {
        TickHandle(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Host frame scheduling
pub trait Scheduler {
    /// Request one more frame
    fn schedule_tick(&mut self) -> TickHandle;

    /// Drop a requested frame. Unknown or already delivered handles are ignored.
    fn cancel_tick(&mut self, handle: TickHandle);
}

/// Scheduler for hosts that poll: the requested frame waits until taken
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: Option<TickHandle>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the frame that is due, if any
    pub fn take_due(&mut self) -> Option<TickHandle> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<TickHandle> {
        self.pending
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_tick(&mut self) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }

    fn cancel_tick(&mut self, handle: TickHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}

/// Elapsed-time gate for a fixed tick rate.
///
/// After a tick the leftover time beyond whole intervals is carried over, so
/// late frames never push the schedule back by more than one interval.
#[derive(Debug, Clone)]
pub struct FrameGate {
    interval: Duration,
    then: Option<Duration>,
}

impl FrameGate {
    pub fn new(tick_hz: u16) -> Self {
        FrameGate {
            interval: Duration::from_nanos(1_000_000_000 / u64::from(tick_hz.max(1))),
            then: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Should a tick run at `now`? The first frame only starts the clock.
    pub fn ready(&mut self, now: Duration) -> bool {
        let Some(then) = self.then else {
            self.then = Some(now);
            return false;
        };

        let elapsed = now.saturating_sub(then);
        if elapsed <= self.interval {
            return false;
        }

        let carry = elapsed.as_nanos() % self.interval.as_nanos();
        self.then = Some(now - Duration::from_nanos(carry as u64));
        true
    }

    /// Forget the clock; the next frame starts it again
    pub fn reset(&mut self) {
        self.then = None;
    }
}

/// Drives a game from host frames
pub struct Runner<S: Scheduler> {
    game: Game,
    scheduler: S,
    gate: FrameGate,
    pending: Option<TickHandle>,
    keymap: KeyMap,
    inputs: InputQueue,
    sender: InputSender,
}

impl<S: Scheduler> Runner<S> {
    pub fn new(game: Game, scheduler: S) -> Self {
        let (sender, inputs) = InputQueue::channel();

        Runner {
            gate: FrameGate::new(game.config.tick_hz),
            game,
            scheduler,
            pending: None,
            keymap: KeyMap::default(),
            inputs,
            sender,
        }
    }

    pub fn with_keymap(mut self, keymap: KeyMap) -> Self {
        self.keymap = keymap;
        self
    }

    /// Handle for queuing key events, from this thread or another
    pub fn input_sender(&self) -> InputSender {
        self.sender.clone()
    }

    /// Request the first frame. Does nothing while a frame is pending.
    pub fn start(&mut self) {
        if self.pending.is_none() {
            self.pending = Some(self.scheduler.schedule_tick());
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    /// Handle a delivered frame: tick if an interval has elapsed, then
    /// request the next frame. Stale or cancelled handles are ignored.
    pub fn on_frame<R: Renderer + ?Sized>(
        &mut self,
        handle: TickHandle,
        now: Duration,
        renderer: &mut R,
    ) -> Vec<Event> {
        if self.pending != Some(handle) {
            log::trace!("Ignoring stale frame {}", handle.id());
            return Vec::new();
        }
        self.pending = None;

        let events = if self.gate.ready(now) {
            self.tick(renderer)
        } else {
            Vec::new()
        };

        self.pending = Some(self.scheduler.schedule_tick());
        events
    }

    /// Run one tick. A failing step is rolled back so the loop keeps going.
    fn tick<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Vec<Event> {
        renderer.clear_frame();
        let mut events = self.apply_inputs();

        // Only hits can fail a step, and there are none while waiting for a serve
        let backup = self.game.running.then(|| self.game.clone());
        match self.game.step() {
            Ok(step_events) => events.extend(step_events),
            Err(err) => {
                log::warn!("Tick {} skipped : {err}", self.game.tick);
                if let Some(backup) = backup {
                    self.game = backup;
                }
            }
        }

        self.game.draw(renderer);
        events
    }

    fn apply_inputs(&mut self) -> Vec<Event> {
        let actions: Vec<Action> = self
            .inputs
            .drain()
            .filter_map(|event| self.keymap.action(event))
            .collect();

        let mut events = Vec::new();
        for action in actions {
            match self.game.apply(action) {
                Ok(Some(event)) => events.push(event),
                Ok(None) => {}
                Err(err) => log::warn!("Ignoring {action:?} : {err}"),
            }
        }
        events
    }

    /// Cancel the pending frame and stop everything on the table. Safe to call repeatedly.
    pub fn clear_animation(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_tick(handle);
        }
        self.gate.reset();
        self.game.halt();
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    /// Swap in a fresh match, keeping the schedule and the input queue
    pub fn replace_game(&mut self, game: Game) {
        self.gate = FrameGate::new(game.config.tick_hz);
        self.game = game;
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputEvent, Key};
    use crate::render::{DisplayList, DrawCommand};
    use crate::types::{Config, Position, Side};

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn runner() -> Runner<ManualScheduler> {
        Runner::new(Game::new(Config::default()).unwrap(), ManualScheduler::new())
    }

    /// Deliver the pending frame at `now`
    fn frame(runner: &mut Runner<ManualScheduler>, now: Duration, list: &mut DisplayList) -> Vec<Event> {
        let handle = runner.scheduler_mut().take_due().expect("a frame should be pending");
        runner.on_frame(handle, now, list)
    }

    #[test]
    fn test_gate_interval() {
        let mut gate = FrameGate::new(100);
        assert_eq!(gate.interval(), ms(10));

        assert!(!gate.ready(ms(0)));
        assert!(!gate.ready(ms(10)));
        assert!(gate.ready(ms(11)));
        // Carried 1ms: next tick once more than 10ms past 10
        assert!(!gate.ready(ms(20)));
        assert!(gate.ready(ms(21)));
    }

    #[test]
    fn test_gate_late_frame_does_not_accumulate() {
        let mut gate = FrameGate::new(100);
        gate.ready(ms(0));

        // A frame 35ms late ticks once and keeps only the 5ms remainder
        assert!(gate.ready(ms(35)));
        assert!(!gate.ready(ms(40)));
        assert!(gate.ready(ms(41)));
    }

    #[test]
    fn test_manual_scheduler() {
        let mut scheduler = ManualScheduler::new();
        let first = scheduler.schedule_tick();
        let second = scheduler.schedule_tick();
        assert_ne!(first, second);

        scheduler.cancel_tick(first);
        assert_eq!(scheduler.pending(), Some(second));

        scheduler.cancel_tick(second);
        assert_eq!(scheduler.take_due(), None);
    }

    #[test]
    fn test_self_rescheduling() {
        let mut runner = runner();
        let mut list = DisplayList::new();
        runner.start();
        runner.start();

        frame(&mut runner, ms(0), &mut list);
        assert!(runner.is_scheduled());
        assert_eq!(runner.game().tick, 0);
        assert!(list.commands().is_empty());

        frame(&mut runner, ms(11), &mut list);
        assert_eq!(runner.game().tick, 1);
        assert_eq!(list.commands()[0], DrawCommand::Clear);
        assert_eq!(list.commands().len(), 4);
        assert!(runner.scheduler().pending().is_some());
    }

    #[test]
    fn test_stale_handle_ignored() {
        let mut runner = runner();
        let mut list = DisplayList::new();
        runner.start();
        let handle = runner.scheduler_mut().take_due().unwrap();

        runner.clear_animation();
        let events = runner.on_frame(handle, ms(100), &mut list);

        assert!(events.is_empty());
        assert!(!runner.is_scheduled());
        assert!(runner.scheduler().pending().is_none());
    }

    #[test]
    fn test_clear_animation_twice() {
        let mut runner = runner();
        let sender = runner.input_sender();
        let mut list = DisplayList::new();
        runner.start();
        frame(&mut runner, ms(0), &mut list);

        sender.send(InputEvent::KeyDown(Key::ArrowUp));
        sender.send(InputEvent::KeyDown(Key::ArrowRight));
        frame(&mut runner, ms(11), &mut list);
        assert!(runner.game().running);

        runner.clear_animation();
        runner.clear_animation();

        assert!(!runner.is_scheduled());
        assert_eq!(runner.scheduler().pending(), None);
        assert_eq!(runner.game().ball.body().velocity(), (0.0, 0.0));
        assert_eq!(runner.game().paddle_one.body().velocity(), (0.0, 0.0));
    }

    #[test]
    fn test_inputs_applied_on_tick() {
        let mut runner = runner();
        let sender = runner.input_sender();
        let mut list = DisplayList::new();
        runner.start();
        frame(&mut runner, ms(0), &mut list);

        sender.send(InputEvent::KeyDown(Key::ArrowUp));
        // Not yet an interval: the serve waits in the queue
        frame(&mut runner, ms(5), &mut list);
        assert!(!runner.game().running);

        let events = frame(&mut runner, ms(11), &mut list);
        assert_eq!(events, vec![Event::Served { side: Side::One }]);
        assert!(runner.game().running);
    }

    #[test]
    fn test_rejected_move_keeps_ticking() {
        let config = Config {
            push_magnitude: 10.0,
            ..Config::default()
        };
        let mut runner = Runner::new(Game::new(config).unwrap(), ManualScheduler::new());
        let sender = runner.input_sender();
        let mut list = DisplayList::new();
        runner.start();
        frame(&mut runner, ms(0), &mut list);

        sender.send(InputEvent::KeyDown(Key::ArrowLeft));
        frame(&mut runner, ms(11), &mut list);

        assert_eq!(runner.game().tick, 1);
        assert_eq!(runner.game().paddle_one.body().velocity(), (0.0, 0.0));
        assert!(runner.is_scheduled());
    }

    #[test]
    fn test_failed_tick_leaves_match_unchanged() {
        let config = Config {
            hit_magnitude: 0.0,
            ..Config::default()
        };
        let mut runner = Runner::new(Game::new(config).unwrap(), ManualScheduler::new());
        let mut list = DisplayList::new();

        runner.game_mut().serve(Side::One).unwrap();
        // Ball touching paddle two's face: the hit impulse moves nothing
        runner
            .game_mut()
            .ball
            .body_mut()
            .set_position(Position::new(300.0, 45.0));
        let before = runner.game().clone();

        runner.start();
        frame(&mut runner, ms(0), &mut list);
        let events = frame(&mut runner, ms(11), &mut list);

        assert!(events.is_empty());
        assert_eq!(runner.game(), &before);
        assert!(runner.is_scheduled());
        // Still drawn
        assert_eq!(list.commands().len(), 4);
    }
}
