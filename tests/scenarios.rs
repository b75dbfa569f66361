use tickos::demo;
use tickos::event::{Event, EventSink, LogSink};
use tickos::scheduler::{Scheduler, Step};
use tickos::task::{Priority, TaskConfig, TaskId, TaskState};
use tickos::tick::{Clock, ManualClock, Tick};
use tickos::Error;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Collects events and forwards them to the log.
#[derive(Default)]
struct Recorder {
    events: Vec<Event>,
}

impl EventSink for Recorder {
    fn on_event(&mut self, event: &Event) {
        LogSink.on_event(event);
        self.events.push(*event);
    }
}

impl Recorder {
    fn misses(&self) -> usize {
        self.events.iter().filter(|e| e.is_miss()).count()
    }
}

#[test]
fn three_tasks_due_at_zero_run_in_priority_order() {
    init_logging();

    let (mut low, mut mid, mut high) = (|| {}, || {}, || {});
    let mut sched: Scheduler<'_, ManualClock, Recorder, 4> =
        Scheduler::new(ManualClock::new(), Recorder::default());
    let p1 = sched.register(Priority(1), 200, &mut low).unwrap();
    let p2 = sched.register(Priority(2), 500, &mut mid).unwrap();
    let p3 = sched.register(Priority(3), 1000, &mut high).unwrap();

    assert_eq!(sched.select_ready(Tick(0)), Some(p3));
    assert_eq!(sched.step(), Ok(Step::Dispatched(p3)));

    assert_eq!(sched.select_ready(Tick(0)), Some(p2));
    assert_eq!(sched.step(), Ok(Step::Dispatched(p2)));

    assert_eq!(sched.select_ready(Tick(0)), Some(p1));
    assert_eq!(sched.step(), Ok(Step::Dispatched(p1)));

    assert_eq!(sched.select_ready(Tick(0)), None);
    assert_eq!(sched.select_ready(Tick(199)), None);
    assert_eq!(sched.select_ready(Tick(200)), Some(p1));

    assert_eq!(sched.step(), Ok(Step::Idle { until: Tick(200) }));
    assert_eq!(sched.step(), Ok(Step::Dispatched(p1)));
    assert_eq!(sched.sink().misses(), 0);
}

#[test]
fn overrun_keeps_schedule_and_reports_one_miss() {
    init_logging();

    let clock = ManualClock::new();
    let mut calls = 0u32;
    let mut body = || {
        calls += 1;
        if calls == 1 {
            clock.advance(203);
        }
    };

    {
        let mut sched: Scheduler<'_, &ManualClock, Recorder, 4> =
            Scheduler::new(&clock, Recorder::default());
        let id = sched.register(Priority(1), 200, &mut body).unwrap();

        assert_eq!(sched.step(), Ok(Step::Dispatched(id)));

        let tcb = sched.store().get(id).unwrap();
        assert_eq!(tcb.next_wake(), Tick(200));
        assert_eq!(tcb.stats().missed_deadlines, 1);
        assert_eq!(tcb.state(), TaskState::Ready);
        assert_eq!(sched.stats().missed_deadlines, 1);
        assert_eq!(sched.sink().misses(), 1);
        assert_eq!(
            sched.sink().events[0].as_error(),
            Some(Error::MissedDeadline {
                task: id,
                deadline: Tick(200),
                finished: Tick(203),
            })
        );

        // The overdue release runs straight away and finishes in time.
        assert_eq!(sched.step(), Ok(Step::Dispatched(id)));
        assert_eq!(sched.store().get(id).unwrap().next_wake(), Tick(400));
        assert_eq!(sched.sink().misses(), 1);
    }
    assert_eq!(calls, 2);
}

#[test]
fn demo_task_set_over_one_second() {
    init_logging();

    let mut bodies = demo::TASKS.map(|t| t.body);
    let mut sched: Scheduler<'_, ManualClock, Recorder, 8> =
        Scheduler::new(ManualClock::new(), Recorder::default());
    for (task, body) in demo::TASKS.iter().zip(bodies.iter_mut()) {
        sched.create(task.config(), body).unwrap();
    }

    assert_eq!(sched.run_until(Tick(1000)), Ok(18));
    assert_eq!(sched.now(), Tick(1000));

    let first: Vec<TaskId> = sched.sink().events[..4].iter().map(Event::task).collect();
    assert_eq!(first, [TaskId(3), TaskId(2), TaskId(1), TaskId(0)]);

    let activations: Vec<u32> = sched.store().iter().map(|t| t.stats().activations).collect();
    assert_eq!(activations, [5, 2, 1, 10]);
    assert_eq!(sched.sink().misses(), 0);
}

#[test]
fn staggered_release_offsets() {
    let (mut a, mut b) = (|| {}, || {});
    let mut sched: Scheduler<'_, ManualClock, Recorder, 4> =
        Scheduler::new(ManualClock::new(), Recorder::default());
    let late = sched
        .create(
            TaskConfig::new(Priority(5), 100)
                .named("late")
                .first_release(Tick(30)),
            &mut a,
        )
        .unwrap();
    let early = sched
        .create(TaskConfig::new(Priority(1), 100).named("early"), &mut b)
        .unwrap();

    assert_eq!(sched.step(), Ok(Step::Dispatched(early)));
    assert_eq!(sched.step(), Ok(Step::Idle { until: Tick(30) }));
    assert_eq!(sched.step(), Ok(Step::Dispatched(late)));
    assert_eq!(sched.step(), Ok(Step::Idle { until: Tick(100) }));
}

#[test]
fn schedule_survives_counter_wraparound() {
    let start = Tick(u32::MAX - 150);
    let clock = ManualClock::starting_at(start);
    let mut body = || {};
    let mut sched: Scheduler<'_, &ManualClock, Recorder, 4> =
        Scheduler::new(&clock, Recorder::default());
    let id = sched
        .create(TaskConfig::new(Priority(1), 100).first_release(start), &mut body)
        .unwrap();

    let horizon = start.wrapping_add(400);
    assert_eq!(sched.run_until(horizon), Ok(4));
    assert_eq!(clock.now(), horizon);
    assert_eq!(sched.store().get(id).unwrap().next_wake(), start.wrapping_add(400));
    assert_eq!(sched.sink().misses(), 0);
}

#[test]
fn run_without_tasks_reports_exhaustion() {
    let mut sched: Scheduler<'_, ManualClock, LogSink, 4> =
        Scheduler::new(ManualClock::new(), LogSink);
    assert_eq!(sched.run().unwrap_err(), Error::SchedulerExhausted);
}
