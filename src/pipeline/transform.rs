//! Raw sample → voltage → engineering value.
//!
//! `voltage = raw / full_scale * reference_v`
//! `derived = trunc(k * (voltage - offset_v))`
//!
//! With the default 10-bit / 3.0 V / k = 60 / offset = 1 V constants the
//! derived value is whole degrees Celsius.  Out-of-range raw codes are
//! converted with the same formula; nothing is clamped.

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::config::ConversionConfig;

use super::{Reading, ReadingQueue, Sample, SampleQueue};

/// Pure conversion step shared by the transform loop and its tests.
#[derive(Debug, Clone, Copy)]
pub struct Transformer {
    full_scale: f32,
    reference_v: f32,
    scale_k: f32,
    offset_v: f32,
}

impl Transformer {
    pub fn new(cfg: &ConversionConfig) -> Self {
        Self {
            full_scale: cfg.full_scale(),
            reference_v: cfg.reference_v,
            scale_k: cfg.scale_k,
            offset_v: cfg.offset_v,
        }
    }

    /// Volts represented by a raw code.
    pub fn voltage(&self, raw: Sample) -> f32 {
        (f32::from(raw) / self.full_scale) * self.reference_v
    }

    /// Engineering value for a voltage (truncated toward zero, saturating).
    pub fn derive(&self, voltage: f32) -> i32 {
        (self.scale_k * (voltage - self.offset_v)) as i32
    }

    pub fn convert(&self, raw: Sample) -> Reading {
        Reading {
            raw_value: raw,
            derived_value: self.derive(self.voltage(raw)),
        }
    }
}

/// Convert one queued sample and forward it.  Blocks on both queues.
pub fn step(
    transformer: &Transformer,
    samples: &SampleQueue,
    readings: &ReadingQueue,
    sink: &mut impl EventSink,
) {
    let raw = samples.get();
    let voltage = transformer.voltage(raw);
    let reading = Reading {
        raw_value: raw,
        derived_value: transformer.derive(voltage),
    };
    sink.emit(&AppEvent::ReadingDerived { reading, voltage });
    readings.put(reading);
}

/// Transformation task body.
pub fn run(
    transformer: Transformer,
    samples: &SampleQueue,
    readings: &ReadingQueue,
    mut sink: impl EventSink,
) -> ! {
    loop {
        step(&transformer, samples, readings, &mut sink);
    }
}
