//! Command dispatcher scenarios against a scripted transceiver.

use std::time::Duration;

use iomod::app::dispatcher::{CommandDispatcher, RxState};
use iomod::app::events::AppEvent;
use iomod::app::ports::SerialEvent;
use iomod::config::DEFAULT_BANNER;
use iomod::pipeline::Reading;
use iomod::rtdb::{IoIndex, RealTimeDb};

use crate::mock_hw::{MockSerial, SharedRecorder};

const RX_TIMEOUT: Duration = Duration::from_millis(100);

/// Started dispatcher with the banner already consumed.
fn started(db: &RealTimeDb) -> (CommandDispatcher<'_>, MockSerial) {
    let mut serial = MockSerial::new();
    let mut d = CommandDispatcher::new(db, RX_TIMEOUT);
    d.start(&mut serial, DEFAULT_BANNER).unwrap();
    assert_eq!(serial.take_sent(), [DEFAULT_BANNER]);
    (d, serial)
}

/// Feed every queued event to the dispatcher.
fn pump(d: &mut CommandDispatcher<'_>, serial: &mut MockSerial, sink: &mut SharedRecorder) {
    while let Some(event) = serial.events.pop_front() {
        d.handle_event(event, serial, sink);
    }
}

#[test]
fn toggling_led_one_twice() {
    let db = RealTimeDb::new();
    let (mut d, mut serial) = started(&db);
    let mut sink = SharedRecorder::default();
    let led0 = IoIndex::new(0).unwrap();

    serial.receive(b"1");
    pump(&mut d, &mut serial, &mut sink);
    assert!(db.led_state()[led0.get()]);

    serial.receive(b"1");
    pump(&mut d, &mut serial, &mut sink);
    assert!(!db.led_state()[led0.get()]);

    assert_eq!(serial.take_sent(), ["Toggle LED 1\r\n", "Toggle LED 1\r\n"]);
}

#[test]
fn raw_value_query_after_persistence() {
    let db = RealTimeDb::new();
    db.store_reading(Reading {
        raw_value: 700,
        derived_value: 63,
    });
    let (mut d, mut serial) = started(&db);
    let mut sink = SharedRecorder::default();

    serial.receive(b"90");
    pump(&mut d, &mut serial, &mut sink);
    assert_eq!(
        serial.take_sent(),
        ["Raw sensor value: 700\r\n", "Processed sensor value: 63\r\n"]
    );
}

#[test]
fn unknown_byte_is_ignored() {
    let db = RealTimeDb::new();
    let (mut d, mut serial) = started(&db);
    let mut sink = SharedRecorder::default();
    let before = db.snapshot();

    serial.receive(b"x");
    pump(&mut d, &mut serial, &mut sink);

    assert!(serial.take_sent().is_empty());
    assert_eq!(db.snapshot(), before);
    assert_eq!(sink.events(), [AppEvent::CommandIgnored(b'x')]);
}

#[test]
fn button_query_reports_polled_state() {
    let db = RealTimeDb::new();
    db.merge_buttons([None, Some(true), None, None]);
    let (mut d, mut serial) = started(&db);
    let mut sink = SharedRecorder::default();

    serial.receive(b"56");
    pump(&mut d, &mut serial, &mut sink);
    assert_eq!(
        serial.take_sent(),
        ["Button 1 state: 0\r\n", "Button 2 state: 1\r\n"]
    );
}

#[test]
fn full_window_then_rearm() {
    let db = RealTimeDb::new();
    let (mut d, mut serial) = started(&db);
    let mut sink = SharedRecorder::default();

    // Ten toggles of LED 4 fill one window, then the transceiver closes it.
    serial.receive(b"4444444444");
    serial.events.push_back(SerialEvent::RxDisabled);
    pump(&mut d, &mut serial, &mut sink);

    assert_eq!(serial.take_sent().len(), 10);
    assert!(!db.led_state()[3], "even number of toggles");
    assert_eq!(serial.arm_calls, 2);
    assert_eq!(d.state(), RxState::Armed);
    assert_eq!(sink.events().last(), Some(&AppEvent::ReceiveRearmed));
}
