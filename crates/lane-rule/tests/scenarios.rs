// End-to-end judgment scenarios driven through JudgeDispatcher with a manual
// clock and scripted keys.

use std::rc::Rc;

use lane_input::{KeyEvent, ScriptedInput};
use lane_model::{LaneId, NoteSpec};
use lane_rule::{
    HoldOutcome, HoldPhase, JudgeDispatcher, JudgeEvent, JudgeTally, JudgeWindows, NoteId,
    NoteOutcome,
};
use lane_timing::ManualClock;

type Dispatcher = JudgeDispatcher<Rc<ManualClock>, ScriptedInput>;

fn lane(i: u8) -> LaneId {
    LaneId::new(i).unwrap()
}

fn setup(start: f64) -> (Rc<ManualClock>, Dispatcher) {
    let clock = Rc::new(ManualClock::starting_at(start));
    let windows = JudgeWindows::new(0.05, 0.10, 0.20).unwrap();
    let dispatcher = JudgeDispatcher::new(windows, Rc::clone(&clock), ScriptedInput::new());
    (clock, dispatcher)
}

fn tick_at(clock: &ManualClock, d: &mut Dispatcher, time: f64) -> Vec<JudgeEvent> {
    clock.set_time(time);
    d.tick()
}

fn head_phase(d: &Dispatcher, l: LaneId) -> Option<HoldPhase> {
    d.lane(l).long().head().map(|n| n.phase())
}

#[test]
fn instant_note_perfect_then_empty_queue_ignored() {
    let (clock, mut d) = setup(9.0);
    d.register(&NoteSpec::instant(lane(0), 10.0)).unwrap();

    d.input_mut().press(lane(0), 10.03);
    let events = tick_at(&clock, &mut d, 10.03);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].note_outcome(), Some(NoteOutcome::Perfect));
    assert!(d.lane(lane(0)).instant().is_empty());

    d.input_mut().release(lane(0), 10.1);
    d.input_mut().press(lane(0), 10.25);
    assert!(tick_at(&clock, &mut d, 10.25).is_empty());
    assert!(d.is_idle());
}

#[test]
fn long_note_grabbed_mid_flight_then_released_early() {
    let (clock, mut d) = setup(3.0);
    let id = d.register(&NoteSpec::long(lane(2), 5.0, 1.0)).unwrap();

    d.input_mut().press(lane(2), 5.5);
    assert!(tick_at(&clock, &mut d, 5.5).is_empty());
    assert_eq!(head_phase(&d, lane(2)), Some(HoldPhase::Holding));
    assert_eq!(d.lane(lane(2)).holding(), Some(id));

    // Ticks while holding decide nothing.
    assert!(tick_at(&clock, &mut d, 5.7).is_empty());

    d.input_mut().release(lane(2), 5.9);
    let events = tick_at(&clock, &mut d, 5.9);
    assert_eq!(
        events,
        vec![JudgeEvent::Hold {
            id,
            lane: lane(2),
            outcome: HoldOutcome::FailEarly,
            time: 5.9,
        }]
    );
    assert!(d.lane(lane(2)).long().is_empty());
    assert_eq!(d.lane(lane(2)).holding(), None);
}

#[test]
fn long_note_never_grabbed_misses_after_window() {
    let (clock, mut d) = setup(4.0);
    d.register(&NoteSpec::long(lane(2), 5.0, 1.0)).unwrap();

    assert!(tick_at(&clock, &mut d, 5.2).is_empty());
    let events = tick_at(&clock, &mut d, 5.21);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].hold_outcome(), Some(HoldOutcome::MissNeverGrabbed));
    assert!(d.is_idle());
}

#[test]
fn grab_window_edges() {
    let eps = 1e-6;

    // Just inside the opening edge.
    let (clock, mut d) = setup(4.0);
    d.register(&NoteSpec::long(lane(1), 5.0, 1.0)).unwrap();
    d.input_mut().press(lane(1), 4.8 + eps);
    tick_at(&clock, &mut d, 4.8 + eps);
    assert_eq!(head_phase(&d, lane(1)), Some(HoldPhase::Holding));

    // Just before the opening edge.
    let (clock, mut d) = setup(4.0);
    d.register(&NoteSpec::long(lane(1), 5.0, 1.0)).unwrap();
    d.input_mut().press(lane(1), 4.8 - eps);
    tick_at(&clock, &mut d, 4.8 - eps);
    assert_eq!(head_phase(&d, lane(1)), Some(HoldPhase::Pending));

    // Past the closing edge: the tick's sweep reports the miss instead.
    let (clock, mut d) = setup(4.0);
    d.register(&NoteSpec::long(lane(1), 5.0, 1.0)).unwrap();
    d.input_mut().press(lane(1), 6.05 + eps);
    let events = tick_at(&clock, &mut d, 6.05 + eps);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].hold_outcome(), Some(HoldOutcome::MissNeverGrabbed));
}

#[test]
fn late_grab_wins_over_stale_timeout_in_same_tick() {
    // No tick ran between the note's miss deadline and the key-down.
    let (clock, mut d) = setup(4.0);
    d.register(&NoteSpec::long(lane(3), 5.0, 1.0)).unwrap();
    d.input_mut().press(lane(3), 5.4);
    assert!(tick_at(&clock, &mut d, 5.4).is_empty());
    assert_eq!(head_phase(&d, lane(3)), Some(HoldPhase::Holding));

    let events = tick_at(&clock, &mut d, 6.0);
    assert_eq!(events[0].hold_outcome(), Some(HoldOutcome::Success));
}

#[test]
fn full_hold_succeeds_at_end() {
    let (clock, mut d) = setup(4.0);
    d.register(&NoteSpec::long(lane(4), 5.0, 1.0)).unwrap();
    d.input_mut().press(lane(4), 4.98);
    tick_at(&clock, &mut d, 4.98);
    assert!(tick_at(&clock, &mut d, 5.99).is_empty());
    let events = tick_at(&clock, &mut d, 6.0);
    assert_eq!(events[0].hold_outcome(), Some(HoldOutcome::Success));
}

#[test]
fn release_strictly_before_end_never_succeeds() {
    for release in [5.0, 5.5, 5.999] {
        let (clock, mut d) = setup(4.0);
        d.register(&NoteSpec::long(lane(0), 5.0, 1.0)).unwrap();
        d.input_mut().press(lane(0), 5.0);
        tick_at(&clock, &mut d, 5.0);
        d.input_mut().release(lane(0), release);
        let mut events = tick_at(&clock, &mut d, release);
        events.extend(tick_at(&clock, &mut d, 6.5));
        assert_eq!(events.len(), 1, "release at {release}");
        assert_eq!(events[0].hold_outcome(), Some(HoldOutcome::FailEarly));
    }
}

#[test]
fn instant_note_reported_once() {
    let (clock, mut d) = setup(0.0);
    d.register(&NoteSpec::instant(lane(5), 1.0)).unwrap();
    let mut events = Vec::new();

    d.input_mut().press(lane(5), 1.04);
    events.extend(tick_at(&clock, &mut d, 1.04));
    for t in [1.1, 1.2, 1.3, 2.0, 5.0] {
        d.input_mut().release(lane(5), t);
        d.input_mut().press(lane(5), t + 0.01);
        events.extend(tick_at(&clock, &mut d, t + 0.01));
    }
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].note_outcome(), Some(NoteOutcome::Perfect));
}

#[test]
fn unplayed_chart_misses_everything_once() {
    let (clock, mut d) = setup(0.0);
    let mut ids = Vec::new();
    for (i, l) in LaneId::ALL.into_iter().enumerate() {
        let t = 1.0 + i as f64 * 0.25;
        ids.push(d.register(&NoteSpec::instant(l, t)).unwrap());
        ids.push(d.register(&NoteSpec::long(l, t + 1.0, 0.5)).unwrap());
    }

    let mut tally = JudgeTally::new();
    let mut seen: Vec<NoteId> = Vec::new();
    let mut t = 0.0;
    while t < 6.0 {
        let events = tick_at(&clock, &mut d, t);
        tally.record_all(&events);
        seen.extend(events.iter().map(JudgeEvent::id));
        t += 1.0 / 60.0;
    }
    seen.sort();
    assert_eq!(seen, ids);
    assert_eq!(tally.miss, 6);
    assert_eq!(tally.hold_miss, 6);
    assert_eq!(tally.max_combo, 0);
    assert!(d.is_idle());
}

#[test]
fn chords_across_lanes_are_independent() {
    let (clock, mut d) = setup(0.0);
    d.register(&NoteSpec::instant(lane(0), 1.0)).unwrap();
    d.register(&NoteSpec::instant(lane(3), 1.0)).unwrap();
    d.register(&NoteSpec::long(lane(5), 1.0, 0.5)).unwrap();

    d.input_mut().press(lane(0), 0.99);
    d.input_mut().press(lane(3), 1.08);
    d.input_mut().press(lane(5), 1.0);
    let events = tick_at(&clock, &mut d, 1.08);
    let outcomes: Vec<_> = events.iter().filter_map(JudgeEvent::note_outcome).collect();
    assert_eq!(outcomes, vec![NoteOutcome::Perfect, NoteOutcome::Good]);
    assert_eq!(head_phase(&d, lane(5)), Some(HoldPhase::Holding));

    let events = tick_at(&clock, &mut d, 1.5);
    assert_eq!(events[0].hold_outcome(), Some(HoldOutcome::Success));
}

#[test]
fn boundary_resample_without_release_event() {
    // The key state flips without a discrete key-up reaching the dispatcher.
    struct Flaky {
        events: Vec<lane_input::KeyEvent>,
        down: bool,
    }
    impl lane_input::InputSource for Flaky {
        fn poll_events(&mut self) -> Vec<lane_input::KeyEvent> {
            std::mem::take(&mut self.events)
        }
        fn is_down(&self, _lane: LaneId) -> bool {
            self.down
        }
    }

    let clock = Rc::new(ManualClock::starting_at(4.0));
    let input = Flaky {
        events: vec![lane_input::KeyEvent::down(lane(0), 5.0)],
        down: true,
    };
    let mut d = JudgeDispatcher::new(JudgeWindows::default(), Rc::clone(&clock), input);
    d.register(&NoteSpec::long(lane(0), 5.0, 1.0)).unwrap();
    clock.set_time(5.0);
    d.tick();
    d.input_mut().down = false;
    clock.set_time(6.0);
    let events = d.tick();
    assert_eq!(events[0].hold_outcome(), Some(HoldOutcome::FailAtBoundary));
}

fn hold_outcomes_at_frame_rate(fps: u32, keys: &[KeyEvent]) -> Vec<HoldOutcome> {
    let clock = Rc::new(ManualClock::new());
    let mut d = JudgeDispatcher::new(
        JudgeWindows::default(),
        Rc::clone(&clock),
        ScriptedInput::from_events(keys.to_vec()),
    );
    d.register(&NoteSpec::long(lane(0), 2.0, 1.01)).unwrap();
    let step = 1.0 / f64::from(fps);
    let mut outcomes = Vec::new();
    for frame in 0..=5 * fps {
        let now = f64::from(frame) * step;
        clock.set_time(now);
        d.input_mut().advance_to(now);
        outcomes.extend(d.tick().iter().filter_map(JudgeEvent::hold_outcome));
    }
    outcomes
}

#[test]
fn hold_outcome_does_not_depend_on_frame_rate() {
    let late_release = [KeyEvent::down(lane(0), 2.0), KeyEvent::up(lane(0), 3.011)];
    let early_release = [KeyEvent::down(lane(0), 2.0), KeyEvent::up(lane(0), 3.005)];
    for fps in [60, 240, 1000] {
        assert_eq!(
            hold_outcomes_at_frame_rate(fps, &late_release),
            vec![HoldOutcome::Success],
            "{fps} fps"
        );
        assert_eq!(
            hold_outcomes_at_frame_rate(fps, &early_release),
            vec![HoldOutcome::FailEarly],
            "{fps} fps"
        );
    }
}
