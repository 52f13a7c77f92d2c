use std::{
    sync::mpsc,
    thread::{self, JoinHandle},
    time::{Duration, SystemTime},
};

use tracing::{debug, info};

use crate::{life, Pos, World};

const MIN_TICK_INTERVAL: Duration = Duration::from_millis(25);
const MAX_TICK_INTERVAL: Duration = Duration::from_millis(1600);

/// Simulation state: the alive-set plus the driver flags around it.
///
/// All mutation goes through this type on the simulation thread, so edits are
/// never concurrent with a generation step.
#[derive(Debug)]
pub struct State<W>
where
    W: World,
{
    world: W,
    running: bool,
    generation: u64,
    interval: Duration,
}

impl<W> State<W>
where
    W: World,
{
    pub fn new(actives: impl IntoIterator<Item = Pos>, interval: Duration) -> Self {
        let mut world = W::default();
        for active in actives.into_iter() {
            world.set(active, true);
        }
        Self {
            world,
            running: false,
            generation: 0,
            interval: interval.clamp(MIN_TICK_INTERVAL, MAX_TICK_INTERVAL),
        }
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Edits only apply while paused; a running simulation ignores them.
    pub fn toggle(&mut self, pos: Pos) {
        if !self.running {
            self.world.toggle(pos);
        }
    }

    pub fn toggle_running(&mut self) {
        self.running = !self.running;
    }

    pub fn clear(&mut self) {
        self.world.clear();
    }

    pub fn accelerate(&mut self) {
        self.interval = (self.interval / 2).max(MIN_TICK_INTERVAL);
    }

    pub fn decelerate(&mut self) {
        self.interval = (self.interval * 2).min(MAX_TICK_INTERVAL);
    }

    /// Advances one generation. Returns true when the grid went inactive;
    /// the simulation pauses itself then, since without edits every further
    /// generation stays empty.
    pub fn advance(&mut self) -> bool {
        self.world = life::step(&self.world);
        self.generation += 1;
        if self.world.is_empty() {
            self.running = false;
            true
        } else {
            false
        }
    }

    pub fn frame(&self) -> Frame<W> {
        Frame {
            world: self.world.clone(),
            running: self.running,
            generation: self.generation,
            interval: self.interval,
        }
    }
}

/// What the view sees of the simulation: a cloned world and the flags to
/// label it with.
#[derive(Debug, Clone)]
pub struct Frame<W>
where
    W: World,
{
    pub world: W,
    pub running: bool,
    pub generation: u64,
    pub interval: Duration,
}

pub enum SimCmd<W>
where
    W: World,
{
    Snapshot(mpsc::Sender<Frame<W>>),
    Toggle(Pos),
    ToggleRunning,
    Reset,
    Accelerate,
    Decelerate,
}

pub struct SimHandle<W>
where
    W: World,
{
    sender: mpsc::Sender<SimCmd<W>>,
}

impl<W> SimHandle<W>
where
    W: World,
{
    pub fn snapshot(&self) -> Frame<W> {
        let (sender, receiver) = mpsc::channel();
        self.sender.send(SimCmd::Snapshot(sender)).unwrap();
        receiver.recv().unwrap()
    }

    pub fn toggle(&self, pos: Pos) {
        self.sender.send(SimCmd::Toggle(pos)).unwrap();
    }

    pub fn toggle_running(&self) {
        self.sender.send(SimCmd::ToggleRunning).unwrap();
    }

    pub fn reset(&self) {
        self.sender.send(SimCmd::Reset).unwrap();
    }

    pub fn accelerate(&self) {
        self.sender.send(SimCmd::Accelerate).unwrap();
    }

    pub fn decelerate(&self) {
        self.sender.send(SimCmd::Decelerate).unwrap();
    }
}

#[derive(Debug)]
pub struct Sim<W>
where
    W: World,
{
    thread: JoinHandle<()>,
    sender: mpsc::Sender<SimCmd<W>>,
}

impl<W> Sim<W>
where
    W: World,
{
    /// Spawns the simulation thread, paused, seeded with `actives`.
    pub fn spawn(actives: impl IntoIterator<Item = Pos>, interval: Duration) -> Self {
        let state: State<W> = State::new(actives, interval);

        let (sender, receiver) = mpsc::channel();
        let thread = thread::spawn(move || sim_loop(receiver, state));

        Self { sender, thread }
    }

    pub fn handle(&self) -> SimHandle<W> {
        let sender = self.sender.clone();
        SimHandle { sender }
    }

    pub fn join(self) {
        self.thread.join().unwrap();
    }
}

const EVT_CHECK_TIMEOUT: Duration = Duration::from_millis(10);

fn sim_loop<W>(receiver: mpsc::Receiver<SimCmd<W>>, state: State<W>)
where
    W: World,
{
    let mut state = state;
    let mut last_update = SystemTime::now();

    loop {
        if let Some(cmd) = receiver.try_recv().ok() {
            match cmd {
                SimCmd::Snapshot(sender) => sender.send(state.frame()).unwrap(),
                SimCmd::Toggle(pos) => state.toggle(pos),
                SimCmd::ToggleRunning => state.toggle_running(),
                SimCmd::Reset => state.clear(),
                SimCmd::Accelerate => state.accelerate(),
                SimCmd::Decelerate => state.decelerate(),
            }
        }

        let elapsed = SystemTime::now().duration_since(last_update).unwrap();
        if state.running() && elapsed > state.interval() {
            if state.advance() {
                info!(generation = state.generation(), "grid went inactive, pausing");
            } else {
                debug!(generation = state.generation(), "advanced");
            }
            last_update = SystemTime::now();
        }

        thread::sleep(EVT_CHECK_TIMEOUT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{pos, SparseWorld};

    fn paused_state(actives: &[Pos]) -> State<SparseWorld> {
        State::new(actives.iter().copied(), Duration::from_millis(200))
    }

    #[test]
    fn starts_paused_at_generation_zero() {
        let state = paused_state(&[pos!(0, 0)]);
        assert!(!state.running());
        assert_eq!(state.generation(), 0);
    }

    #[test]
    fn advance_counts_generations() {
        let mut state = paused_state(&[pos!(0, 0), pos!(1, 0), pos!(0, 1), pos!(1, 1)]);
        state.toggle_running();
        state.advance();
        state.advance();
        assert_eq!(state.generation(), 2);
        assert!(state.running());
    }

    #[test]
    fn pauses_itself_once_the_grid_empties() {
        // a lone cell dies on the first step, leaving nothing to simulate
        let mut state = paused_state(&[pos!(4, 4)]);
        state.toggle_running();
        assert!(state.advance());
        assert!(!state.running());
        assert!(state.frame().world.is_empty());
    }

    #[test]
    fn edits_only_apply_while_paused() {
        let mut state = paused_state(&[]);
        state.toggle(pos!(1, 1));
        assert!(state.frame().world.is_alive(pos!(1, 1)));

        state.toggle_running();
        state.toggle(pos!(2, 2));
        assert!(!state.frame().world.is_alive(pos!(2, 2)));
    }

    #[test]
    fn reset_empties_without_pausing() {
        let mut state = paused_state(&[pos!(0, 0), pos!(1, 0), pos!(0, 1), pos!(1, 1)]);
        state.toggle_running();
        state.clear();
        assert!(state.running());
        // the next tick steps an empty grid and triggers the auto-pause
        assert!(state.advance());
        assert!(!state.running());
    }

    #[test]
    fn interval_clamps_at_both_ends() {
        let mut state = paused_state(&[]);
        for _ in 0..16 {
            state.accelerate();
        }
        assert_eq!(state.interval(), MIN_TICK_INTERVAL);
        for _ in 0..16 {
            state.decelerate();
        }
        assert_eq!(state.interval(), MAX_TICK_INTERVAL);
    }

    #[test]
    fn snapshot_round_trips_through_the_thread() {
        let sim = Sim::spawn(
            [pos!(0, 0), pos!(1, 0)],
            Duration::from_millis(200),
        );
        let handle: SimHandle<SparseWorld> = sim.handle();
        let frame = handle.snapshot();
        assert!(!frame.running);
        assert_eq!(frame.world.len(), 2);

        handle.toggle(pos!(5, 5));
        handle.reset();
        // commands drain one per loop pass; poll until both applied
        let deadline = SystemTime::now() + Duration::from_secs(2);
        loop {
            let frame = handle.snapshot();
            if frame.world.is_empty() {
                break;
            }
            assert!(SystemTime::now() < deadline, "reset never applied");
            thread::sleep(Duration::from_millis(10));
        }
    }
}
