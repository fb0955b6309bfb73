//! End-to-end pipeline: ADC → sample queue → transform → reading queue →
//! store, over real threads.

use std::time::{Duration, Instant};

use iomod::app::events::AppEvent;
use iomod::config::ConversionConfig;
use iomod::error::DriverError;
use iomod::pipeline::queue::BoundedQueue;
use iomod::pipeline::transform::Transformer;
use iomod::pipeline::{Reading, ReadingQueue, SampleQueue, acquisition, persistence, transform};
use iomod::rtdb::RealTimeDb;

use crate::mock_hw::{MockAdc, SharedRecorder};

#[test]
fn stages_hand_off_in_order() {
    let samples: SampleQueue = BoundedQueue::new();
    let readings: ReadingQueue = BoundedQueue::new();
    let db = RealTimeDb::new();
    let transformer = Transformer::new(&ConversionConfig::default());
    let sink = SharedRecorder::default();

    let script = [
        Ok(0),
        Err(DriverError::AdcReadFailed(-1)),
        Ok(512),
        Ok(1023),
        Ok(700),
    ];

    let mut acq_sink = sink.clone();
    let mut xform_sink = sink.clone();
    let mut persist_sink = sink.clone();

    std::thread::scope(|s| {
        s.spawn(|| {
            let mut adc = MockAdc::new(script);
            for _ in 0..5 {
                acquisition::step(&mut adc, &samples, &mut acq_sink);
            }
        });
        s.spawn(|| {
            for _ in 0..4 {
                transform::step(&transformer, &samples, &readings, &mut xform_sink);
            }
        });
        s.spawn(|| {
            for _ in 0..4 {
                persistence::step(&readings, &db, &mut persist_sink);
            }
        });
    });

    assert_eq!(db.raw_sample(), 700);
    assert_eq!(db.processed_value(), transformer.convert(700).derived_value);

    let stored: Vec<Reading> = sink
        .events()
        .into_iter()
        .filter_map(|e| match e {
            AppEvent::ReadingStored(r) => Some(r),
            _ => None,
        })
        .collect();
    assert_eq!(
        stored.iter().map(|r| r.raw_value).collect::<Vec<_>>(),
        [0, 512, 1023, 700]
    );
    assert_eq!(stored[1].derived_value, 30);
    assert!(
        sink.events()
            .contains(&AppEvent::SampleSkipped(DriverError::AdcReadFailed(-1)))
    );
    assert!(samples.is_empty() && readings.is_empty());
}

#[test]
fn task_loops_reach_the_store() {
    // Task bodies never return, so the queues and store must outlive the
    // test; the detached threads are reaped with the test process.
    let samples: &'static SampleQueue = Box::leak(Box::new(BoundedQueue::new()));
    let readings: &'static ReadingQueue = Box::leak(Box::new(BoundedQueue::new()));
    let db: &'static RealTimeDb = Box::leak(Box::new(RealTimeDb::new()));

    let adc = MockAdc::new([Ok(512)]);
    std::thread::spawn(move || {
        acquisition::run(adc, Duration::from_millis(5), samples, SharedRecorder::default());
    });
    let transformer = Transformer::new(&ConversionConfig::default());
    std::thread::spawn(move || {
        transform::run(transformer, samples, readings, SharedRecorder::default());
    });
    std::thread::spawn(move || {
        persistence::run(readings, db, SharedRecorder::default());
    });

    let deadline = Instant::now() + Duration::from_secs(5);
    while db.raw_sample() != 512 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(db.raw_sample(), 512);
    assert_eq!(db.processed_value(), 30);
}
