use crate::sim::{Event, SimError, SimTime, Simulator, World, tie_break_key};
use std::any::Any;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct DummyWorld {
    ticks: usize,
}

impl World for DummyWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn on_tick(&mut self, _sim: &mut Simulator) {
        self.ticks = self.ticks.saturating_add(1);
    }
}

struct Push {
    id: u32,
    tie: u64,
    log: Arc<Mutex<Vec<u32>>>,
}

impl Push {
    fn new(id: u32, log: &Arc<Mutex<Vec<u32>>>) -> Self {
        Self {
            id,
            tie: 0,
            log: Arc::clone(log),
        }
    }

    fn with_tie(mut self, tie: u64) -> Self {
        self.tie = tie;
        self
    }
}

impl Event for Push {
    fn execute(self: Box<Self>, _sim: &mut Simulator, _world: &mut dyn World) {
        let Push { id, log, .. } = *self;
        log.lock().expect("log lock").push(id);
    }

    fn tie_break(&self, _at: SimTime) -> u64 {
        self.tie
    }

    fn kind(&self) -> &'static str {
        "push"
    }
}

struct PushThenSchedule {
    id: u32,
    next_id: u32,
    next_at: SimTime,
    log: Arc<Mutex<Vec<u32>>>,
}

impl Event for PushThenSchedule {
    fn execute(self: Box<Self>, sim: &mut Simulator, _world: &mut dyn World) {
        let PushThenSchedule {
            id,
            next_id,
            next_at,
            log,
        } = *self;
        log.lock().expect("log lock").push(id);
        sim.schedule(next_at, Push::new(next_id, &log));
    }
}

fn logged(log: &Arc<Mutex<Vec<u32>>>) -> Vec<u32> {
    log.lock().expect("log lock").clone()
}

#[test]
fn scheduled_events_order_by_time_then_seq() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut sim = Simulator::default();
    sim.schedule(SimTime(10), Push::new(1, &log));
    sim.schedule(SimTime(5), Push::new(2, &log));
    sim.schedule(SimTime(10), Push::new(3, &log));

    let mut world = DummyWorld::default();
    let summary = sim.run(&mut world).expect("run");

    assert_eq!(logged(&log), vec![2, 1, 3]);
    assert_eq!(world.ticks, 3);
    assert_eq!(summary.executed, 3);
    assert_eq!(sim.now(), SimTime(10));
}

#[test]
fn tie_break_key_orders_same_time_events_before_seq() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut sim = Simulator::default();
    sim.schedule(SimTime(4), Push::new(1, &log).with_tie(9));
    sim.schedule(SimTime(4), Push::new(2, &log).with_tie(3));
    sim.schedule(SimTime(4), Push::new(3, &log).with_tie(3));
    sim.schedule(SimTime(2), Push::new(4, &log).with_tie(100));

    let mut world = DummyWorld::default();
    sim.run(&mut world).expect("run");

    assert_eq!(logged(&log), vec![4, 2, 3, 1]);
}

#[test]
fn tie_break_key_is_stable_and_field_sensitive() {
    assert_eq!(tie_break_key(&[10, 1, 2]), tie_break_key(&[10, 1, 2]));
    assert_ne!(tie_break_key(&[10, 1, 2]), tie_break_key(&[10, 2, 1]));
    // 十进制拼接："1","12" 与 "11","2" 得到同一串
    assert_eq!(tie_break_key(&[1, 12]), tie_break_key(&[11, 2]));
}

#[test]
fn event_scheduled_at_same_time_inside_event_runs_after_current_event() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut sim = Simulator::default();
    sim.schedule(
        SimTime::ZERO,
        PushThenSchedule {
            id: 1,
            next_id: 2,
            next_at: SimTime::ZERO,
            log: Arc::clone(&log),
        },
    );

    let mut world = DummyWorld::default();
    sim.run(&mut world).expect("run");

    assert_eq!(logged(&log), vec![1, 2]);
    assert_eq!(world.ticks, 2);
    assert_eq!(sim.now(), SimTime::ZERO);
}

#[test]
fn run_until_discards_first_event_after_until() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut sim = Simulator::default();
    sim.schedule(SimTime::ZERO, Push::new(1, &log));
    sim.schedule(SimTime(10), Push::new(2, &log));
    sim.schedule(SimTime(20), Push::new(3, &log));

    let mut world = DummyWorld::default();
    let summary = sim.run_until(SimTime(5), &mut world).expect("run");

    assert_eq!(logged(&log), vec![1]);
    assert_eq!(world.ticks, 1);
    assert_eq!(summary.discarded_at, Some(SimTime(10)));
    // 时间停在最后执行的事件上，不会推进到截止时间
    assert_eq!(sim.now(), SimTime::ZERO);
    assert_eq!(sim.pending(), 1);

    // 被丢弃的事件不会重新入队
    sim.run(&mut world).expect("run");
    assert_eq!(logged(&log), vec![1, 3]);
    assert_eq!(sim.now(), SimTime(20));
}

#[test]
fn run_until_executes_events_scheduled_exactly_at_until() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut sim = Simulator::default();
    sim.schedule(SimTime(5), Push::new(1, &log));

    let mut world = DummyWorld::default();
    let summary = sim.run_until(SimTime(5), &mut world).expect("run");

    assert_eq!(logged(&log), vec![1]);
    assert_eq!(summary.discarded_at, None);
    assert_eq!(sim.now(), SimTime(5));
}

#[test]
fn run_until_with_empty_queue_keeps_time() {
    let mut sim = Simulator::default();
    let mut world = DummyWorld::default();

    let summary = sim.run_until(SimTime(7), &mut world).expect("run");
    assert_eq!(summary.executed, 0);
    assert_eq!(sim.now(), SimTime::ZERO);
    assert_eq!(world.ticks, 0);
}

#[test]
fn event_in_the_past_is_an_ordering_violation() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut sim = Simulator::default();
    sim.schedule(
        SimTime(5),
        PushThenSchedule {
            id: 1,
            next_id: 2,
            next_at: SimTime(3),
            log: Arc::clone(&log),
        },
    );

    let mut world = DummyWorld::default();
    let err = sim.run(&mut world).expect_err("time went backwards");

    assert_eq!(
        err,
        SimError::OrderingViolation {
            now: SimTime(5),
            at: SimTime(3),
        }
    );
    assert_eq!(logged(&log), vec![1]);
}

#[test]
fn journal_records_fired_events_and_drain_empties_queue() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut sim = Simulator::with_journal();
    sim.schedule(SimTime(1), Push::new(1, &log).with_tie(7));
    sim.schedule(SimTime(2), Push::new(2, &log));
    sim.schedule(SimTime(30), Push::new(3, &log));
    sim.schedule(SimTime(40), Push::new(4, &log));

    let mut world = DummyWorld::default();
    sim.run_until(SimTime(2), &mut world).expect("run");

    let fired = sim.journal().expect("journal enabled");
    assert_eq!(fired.len(), 2);
    assert_eq!((fired[0].at, fired[0].tie, fired[0].kind), (SimTime(1), 7, "push"));
    assert_eq!(fired[1].at, SimTime(2));

    let rest = sim.drain();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].at, SimTime(40));
    assert_eq!(sim.pending(), 0);
}
