//! The cycle/timer state machine.
//!
//! The engine owns all session bookkeeping: phase transitions, the
//! countdown, cycle advancement, and the double-press shortcut that skips
//! a break. The UI only reads state through accessors and forwards presses.

use std::time::{Duration, Instant};

use crate::config::Config;

// Two presses closer together than this count as one double press.
const DOUBLE_PRESS_WINDOW: Duration = Duration::from_millis(500);
const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Idle,
    Working,
    OnBreak,
}

impl Phase {
    pub fn label(&self) -> &str {
        match self {
            Self::Idle => "⏳ READY",
            Self::Working => "🎯 FOCUS",
            Self::OnBreak => "☕ BREAK",
        }
    }
}

/// The pending tick deadline. Arming a new schedule replaces this value
/// outright, so at most one schedule can ever be live.
#[derive(Clone, Copy)]
struct TickSchedule {
    next_due: Instant,
}

impl TickSchedule {
    fn armed(now: Instant) -> Self {
        Self { next_due: now + TICK_INTERVAL }
    }

    fn rearm(&mut self) {
        self.next_due += TICK_INTERVAL;
    }
}

pub struct Engine {
    work_duration: u32,
    break_duration: u32,
    total_cycles: u32,
    phase: Phase,
    remaining: u32,
    progress: f64,
    current_cycle: u32,
    schedule: Option<TickSchedule>,
    last_press: Option<Instant>,
}

impl Engine {
    /// Expects provider-clamped values; the engine does not re-validate.
    pub fn new(config: &Config) -> Self {
        Self {
            work_duration: config.work_duration,
            break_duration: config.break_duration,
            total_cycles: config.total_cycles,
            phase: Phase::Idle,
            remaining: config.work_duration,
            progress: 0.0,
            current_cycle: 1,
            schedule: None,
            last_press: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn current_cycle(&self) -> u32 {
        self.current_cycle
    }

    pub fn total_cycles(&self) -> u32 {
        self.total_cycles
    }

    pub fn running(&self) -> bool {
        self.schedule.is_some()
    }

    /// Fires every tick that has come due by `now`, re-arming in between.
    /// The event loop calls this once per iteration.
    pub fn poll(&mut self, now: Instant) {
        while let Some(due) = self.schedule.map(|s| s.next_due) {
            if now < due {
                break;
            }
            if let Some(schedule) = self.schedule.as_mut() {
                schedule.rearm();
            }
            self.tick(now);
        }
    }

    /// A single press starts the timer, or pauses it during a break. A
    /// double press during a break abandons the rest of it and goes
    /// straight back to work.
    pub fn handle_press(&mut self, now: Instant) {
        let delta = self.last_press.map(|prev| now.duration_since(prev));
        self.last_press = Some(now);

        if matches!(delta, Some(d) if d < DOUBLE_PRESS_WINDOW) {
            if self.phase == Phase::OnBreak {
                self.stop();
                self.phase = Phase::Working;
                self.remaining = self.work_duration;
                self.start(now);
            }
        } else if !self.running() {
            self.start(now);
        } else if self.phase == Phase::OnBreak {
            // Pauses the break; a later single press resumes it. A press
            // during a running work phase does nothing.
            self.stop();
        }
    }

    pub fn start(&mut self, now: Instant) {
        if self.phase == Phase::Idle {
            self.phase = Phase::Working;
        }
        self.progress = 0.0;
        self.schedule = Some(TickSchedule::armed(now));
    }

    /// Synchronous cancellation: once this returns, no tick can fire.
    pub fn stop(&mut self) {
        self.schedule = None;
    }

    pub fn tick(&mut self, now: Instant) {
        if !self.running() {
            return;
        }
        match self.phase {
            Phase::OnBreak => {
                if self.remaining > 0 {
                    self.remaining -= 1;
                    self.progress = f64::from(self.break_duration - self.remaining)
                        / f64::from(self.break_duration);
                } else {
                    self.end_break(now);
                }
            }
            Phase::Working => {
                if self.remaining > 0 {
                    self.remaining -= 1;
                    self.progress = f64::from(self.work_duration - self.remaining)
                        / f64::from(self.work_duration);
                } else {
                    self.end_work(now);
                }
            }
            Phase::Idle => {}
        }
    }

    fn end_work(&mut self, now: Instant) {
        self.stop();
        if self.current_cycle < self.total_cycles {
            self.phase = Phase::OnBreak;
            self.remaining = self.break_duration;
            self.start(now);
        } else {
            self.complete();
        }
    }

    fn end_break(&mut self, now: Instant) {
        self.stop();
        self.current_cycle += 1;
        if self.current_cycle <= self.total_cycles {
            self.phase = Phase::Working;
            self.remaining = self.work_duration;
            self.start(now);
        } else {
            self.complete();
        }
    }

    // All cycles done: back to a fresh idle session.
    fn complete(&mut self) {
        self.stop();
        self.phase = Phase::Idle;
        self.progress = 0.0;
        self.remaining = self.work_duration;
        self.current_cycle = 1;
    }

    /// New settings only take hold on the next start: the session resets
    /// to idle no matter what was in flight.
    pub fn apply_settings(&mut self, config: &Config) {
        self.stop();
        self.work_duration = config.work_duration;
        self.break_duration = config.break_duration;
        self.total_cycles = config.total_cycles;
        self.phase = Phase::Idle;
        self.remaining = config.work_duration;
        self.progress = 0.0;
        self.current_cycle = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(work: u32, brk: u32, cycles: u32) -> Config {
        Config {
            work_duration: work,
            break_duration: brk,
            total_cycles: cycles,
            theme: "default".into(),
        }
    }

    fn engine(work: u32, brk: u32, cycles: u32) -> Engine {
        Engine::new(&config(work, brk, cycles))
    }

    fn tick_n(engine: &mut Engine, now: &mut Instant, n: u32) {
        for _ in 0..n {
            *now += Duration::from_secs(1);
            engine.tick(*now);
        }
    }

    #[test]
    fn test_new_session_is_idle() {
        let engine = engine(1500, 300, 4);
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.remaining(), 1500);
        assert_eq!(engine.current_cycle(), 1);
        assert!(!engine.running());
        assert_eq!(engine.progress(), 0.0);
    }

    #[test]
    fn test_start_from_idle_enters_working() {
        let mut engine = engine(1500, 300, 4);
        engine.start(Instant::now());
        assert_eq!(engine.phase(), Phase::Working);
        assert!(engine.running());
        assert_eq!(engine.remaining(), 1500);
    }

    #[test]
    fn test_single_cycle_runs_to_idle() {
        let mut engine = engine(1500, 300, 1);
        let mut now = Instant::now();
        engine.start(now);

        tick_n(&mut engine, &mut now, 1500);
        assert_eq!(engine.phase(), Phase::Working);
        assert_eq!(engine.remaining(), 0);
        assert_eq!(engine.progress(), 1.0);

        // The tick after the countdown bottoms out ends the work period;
        // the sole cycle is the last one, so no break follows.
        tick_n(&mut engine, &mut now, 1);
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.remaining(), 1500);
        assert_eq!(engine.current_cycle(), 1);
        assert!(!engine.running());
        assert_eq!(engine.progress(), 0.0);
    }

    #[test]
    fn test_two_cycles_skip_the_final_break() {
        let mut engine = engine(120, 60, 2);
        let mut now = Instant::now();
        engine.start(now);

        tick_n(&mut engine, &mut now, 121);
        assert_eq!(engine.phase(), Phase::OnBreak);
        assert_eq!(engine.remaining(), 60);
        assert_eq!(engine.current_cycle(), 1);
        assert!(engine.running());

        tick_n(&mut engine, &mut now, 61);
        assert_eq!(engine.phase(), Phase::Working);
        assert_eq!(engine.remaining(), 120);
        assert_eq!(engine.current_cycle(), 2);

        // Final cycle's work ends the whole session, no trailing break.
        tick_n(&mut engine, &mut now, 121);
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.remaining(), 120);
        assert_eq!(engine.current_cycle(), 1);
        assert!(!engine.running());
    }

    #[test]
    fn test_progress_monotonic_within_phase_and_resets_on_transition() {
        let mut engine = engine(120, 60, 2);
        let mut now = Instant::now();
        engine.start(now);

        let mut last = engine.progress();
        for _ in 0..120 {
            tick_n(&mut engine, &mut now, 1);
            assert!(engine.progress() >= last);
            last = engine.progress();
        }
        assert_eq!(last, 1.0);

        tick_n(&mut engine, &mut now, 1);
        assert_eq!(engine.phase(), Phase::OnBreak);
        assert_eq!(engine.progress(), 0.0);
    }

    #[test]
    fn test_first_press_starts_the_timer() {
        let mut engine = engine(1500, 300, 4);
        engine.handle_press(Instant::now());
        assert_eq!(engine.phase(), Phase::Working);
        assert!(engine.running());
    }

    #[test]
    fn test_press_during_running_work_is_noop() {
        let mut engine = engine(1500, 300, 4);
        let mut now = Instant::now();
        engine.handle_press(now);
        tick_n(&mut engine, &mut now, 10);

        now += Duration::from_secs(5);
        engine.handle_press(now);
        assert_eq!(engine.phase(), Phase::Working);
        assert!(engine.running());
        assert_eq!(engine.remaining(), 1490);
    }

    #[test]
    fn test_double_press_skips_break() {
        let mut engine = engine(120, 300, 2);
        let mut now = Instant::now();
        engine.start(now);
        tick_n(&mut engine, &mut now, 121);
        assert_eq!(engine.phase(), Phase::OnBreak);
        tick_n(&mut engine, &mut now, 17);

        now += Duration::from_secs(2);
        engine.handle_press(now);
        now += Duration::from_millis(300);
        engine.handle_press(now);

        assert_eq!(engine.phase(), Phase::Working);
        assert_eq!(engine.remaining(), 120);
        assert_eq!(engine.progress(), 0.0);
        assert!(engine.running());
    }

    #[test]
    fn test_double_press_outside_break_does_nothing_extra() {
        let mut engine = engine(1500, 300, 4);
        let mut now = Instant::now();
        engine.start(now);
        tick_n(&mut engine, &mut now, 3);

        now += Duration::from_secs(2);
        engine.handle_press(now);
        now += Duration::from_millis(200);
        engine.handle_press(now);
        assert_eq!(engine.phase(), Phase::Working);
        assert_eq!(engine.remaining(), 1497);
        assert!(engine.running());
    }

    #[test]
    fn test_pause_and_resume_break() {
        let mut engine = engine(120, 60, 2);
        let mut now = Instant::now();
        engine.start(now);
        tick_n(&mut engine, &mut now, 121);
        tick_n(&mut engine, &mut now, 10);
        assert_eq!(engine.phase(), Phase::OnBreak);
        assert_eq!(engine.remaining(), 50);

        now += Duration::from_secs(2);
        engine.handle_press(now);
        assert!(!engine.running());
        assert_eq!(engine.phase(), Phase::OnBreak);
        assert_eq!(engine.remaining(), 50);

        // Resume: progress snaps to zero until the next tick recomputes it.
        now += Duration::from_secs(2);
        engine.handle_press(now);
        assert!(engine.running());
        assert_eq!(engine.phase(), Phase::OnBreak);
        assert_eq!(engine.progress(), 0.0);

        tick_n(&mut engine, &mut now, 1);
        assert_eq!(engine.remaining(), 49);
        assert!((engine.progress() - 11.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_tick_when_stopped_is_noop() {
        let mut engine = engine(1500, 300, 4);
        let now = Instant::now();
        engine.tick(now);
        assert_eq!(engine.remaining(), 1500);
        assert_eq!(engine.phase(), Phase::Idle);

        engine.start(now);
        engine.stop();
        engine.stop();
        engine.tick(now + Duration::from_secs(1));
        assert_eq!(engine.remaining(), 1500);
        assert!(!engine.running());
    }

    #[test]
    fn test_apply_settings_resets_everything() {
        let mut engine = engine(120, 60, 3);
        let mut now = Instant::now();
        engine.start(now);
        tick_n(&mut engine, &mut now, 121);
        tick_n(&mut engine, &mut now, 20);
        assert_eq!(engine.phase(), Phase::OnBreak);

        engine.apply_settings(&config(600, 120, 2));
        assert_eq!(engine.phase(), Phase::Idle);
        assert!(!engine.running());
        assert_eq!(engine.remaining(), 600);
        assert_eq!(engine.current_cycle(), 1);
        assert_eq!(engine.progress(), 0.0);
        assert_eq!(engine.total_cycles(), 2);

        // The adopted durations drive the next session.
        engine.start(now);
        tick_n(&mut engine, &mut now, 601);
        assert_eq!(engine.phase(), Phase::OnBreak);
        assert_eq!(engine.remaining(), 120);
    }

    #[test]
    fn test_poll_fires_on_one_second_cadence() {
        let mut engine = engine(120, 60, 1);
        let t0 = Instant::now();
        engine.start(t0);

        engine.poll(t0 + Duration::from_millis(300));
        assert_eq!(engine.remaining(), 120);

        engine.poll(t0 + Duration::from_secs(1));
        assert_eq!(engine.remaining(), 119);

        // A late poll catches up on every missed tick.
        engine.poll(t0 + Duration::from_millis(3500));
        assert_eq!(engine.remaining(), 117);
    }

    #[test]
    fn test_poll_after_stop_fires_nothing() {
        let mut engine = engine(120, 60, 1);
        let t0 = Instant::now();
        engine.start(t0);
        engine.stop();
        engine.poll(t0 + Duration::from_secs(5));
        assert_eq!(engine.remaining(), 120);
    }

    #[test]
    fn test_restart_replaces_schedule() {
        let mut engine = engine(120, 60, 1);
        let t0 = Instant::now();
        engine.start(t0);
        // Starting again re-arms from the new instant; only one schedule
        // exists, so a poll past both deadlines fires a single tick.
        engine.start(t0 + Duration::from_millis(900));
        engine.poll(t0 + Duration::from_millis(1950));
        assert_eq!(engine.remaining(), 119);
    }
}
