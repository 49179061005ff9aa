//! End-to-end: scheduler + sampling task + serial tasks over a mock link,
//! checked with the host-side decoder.

use core::cell::Cell;

use cadence_core::tasks::{SerialInputTask, SerialOutputTask};
use cadence_core::{AnalogInput, DigitalInput, Scheduler, Task, TaskTiming};
use cadence_hal::mock::{MockClock, MockInputs, MockPlatform, MockStream};
use cadence_protocol::{
    encode_command, encode_handshake, BatchDecoder, MessageKind, SerialManager, Value,
};

const BUTTON_PIN: u8 = 2;
const LEVEL_PIN: u8 = 26;

struct SensorTask<'t, 'a> {
    timing: TaskTiming,
    button: DigitalInput<'t, MockPlatform>,
    level: AnalogInput<'t, MockPlatform>,
    pressed: &'t Cell<u8>,
    level_out: &'t Cell<i16>,
    manager: &'t SerialManager<'a, &'a MockStream>,
}

impl Task for SensorTask<'_, '_> {
    fn tick(&mut self) {
        self.button.update();
        self.level.update();
        self.pressed.set(u8::from(self.button.is_active()));
        self.level_out.set(self.level.value() as i16);
        if self.button.is_pressed() {
            self.manager.add_event("button pressed");
        }
    }

    fn timing(&self) -> &TaskTiming {
        &self.timing
    }

    fn timing_mut(&mut self) -> &mut TaskTiming {
        &mut self.timing
    }
}

#[test]
fn handshake_batch_and_command() {
    let platform = MockPlatform {
        clock: MockClock::with_auto_advance(1),
        inputs: MockInputs::new(),
    };
    let wire = MockStream::new();
    let pressed = Cell::new(0u8);
    let level = Cell::new(0i16);

    let manager = SerialManager::new(&wire);
    assert_eq!(manager.add_byte(&pressed), Some(0));
    assert_eq!(manager.add_int(&level), Some(1));

    let mut sensors = SensorTask {
        timing: TaskTiming::new(),
        button: DigitalInput::new(&platform, BUTTON_PIN, 100),
        level: AnalogInput::new(&platform, LEVEL_PIN, 100),
        pressed: &pressed,
        level_out: &level,
        manager: &manager,
    };
    let mut output = SerialOutputTask::new(&manager);
    let mut input = SerialInputTask::new(&manager);
    sensors.init(50);
    output.init(250);
    input.init(100);

    let mut scheduler = Scheduler::new(&platform);
    scheduler.init(50);
    assert!(scheduler.add_task(&mut sensors));
    assert!(scheduler.add_task(&mut output));
    assert!(scheduler.add_task(&mut input));

    platform.inputs.set_digital(BUTTON_PIN, true);
    platform.inputs.set_analog(LEVEL_PIN, 1023);
    wire.push_rx(&encode_handshake());
    wire.push_rx(&encode_command(1, -300));

    // Pass 2: input task acknowledges the handshake
    // Pass 4: input task applies the command
    // Pass 5: output task sends the first batch
    for _ in 0..5 {
        scheduler.schedule();
    }
    assert!(manager.is_connected());
    assert_eq!(manager.incoming(1), Some(-300));

    let sent = wire.take_tx();
    assert_eq!(sent[0], 0x0A);
    let mut batch = BatchDecoder::new(&sent[1..]).unwrap();
    assert_eq!(batch.announced(), 3);

    let first = batch.next().unwrap().unwrap();
    assert_eq!((first.kind, first.id, first.value), (MessageKind::Var, 0, Value::Byte(1)));
    let second = batch.next().unwrap().unwrap();
    assert_eq!((second.kind, second.id, second.value), (MessageKind::Var, 1, Value::Int(100)));
    let third = batch.next().unwrap().unwrap();
    assert_eq!(third.kind, MessageKind::Event);
    assert_eq!(third.value, Value::Text(b"button pressed"));
    assert!(batch.next().is_none());
    assert_eq!(batch.consumed(), sent.len() - 1);

    // Next batch: event already delivered, variables only
    for _ in 0..5 {
        scheduler.schedule();
    }
    let sent = wire.take_tx();
    let batch = BatchDecoder::new(&sent).unwrap();
    assert_eq!(batch.announced(), 2);
    assert_eq!(scheduler.stats().passes, 10);
}

#[test]
fn closed_link_sends_nothing() {
    let clock = MockClock::with_auto_advance(1);
    let wire = MockStream::new();
    let manager = SerialManager::new(&wire);
    let mut output = SerialOutputTask::new(&manager);
    output.init(50);

    let mut scheduler = Scheduler::new(&clock);
    scheduler.init(50);
    scheduler.add_task(&mut output);

    wire.push_rx(&encode_handshake());
    scheduler.schedule();
    assert_eq!(wire.take_tx().as_slice(), &[0x0A]);

    wire.set_open(false);
    scheduler.schedule();
    scheduler.schedule();
    assert!(wire.take_tx().is_empty());
    assert!(!manager.is_connected());

    wire.set_open(true);
    scheduler.schedule();
    assert_eq!(wire.take_tx().as_slice(), &[0xFF, 0x00, 0]);
}
