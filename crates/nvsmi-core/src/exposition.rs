//! Plain-text exposition: `name{uuid="..."} value\n`, one line per datum.
//!
//! No HELP/TYPE comments, no sorting, no deduplication. Two devices with the
//! same uuid simply produce repeated lines.

use std::fmt::Write;

use crate::coerce::coerce_numeric;
use crate::document::{DeviceRecord, Document};
use crate::version::decompose_version;

pub const METRIC_PREFIX: &str = "nvidiasmi";

/// Number of lines emitted before any device-scoped line.
pub const BASELINE_LINES: usize = 4;

/// Number of lines emitted for each device.
pub const LINES_PER_DEVICE: usize = DEVICE_METRICS.len();

type Reading = fn(&DeviceRecord) -> &str;

/// Per-device metrics in emission order.
const DEVICE_METRICS: [(&str, Reading); 19] = [
    ("fan_speed", |d| d.fan_speed.as_str()),
    ("memory_usage_total", |d| d.memory.total.as_str()),
    ("memory_usage_used", |d| d.memory.used.as_str()),
    ("memory_usage_free", |d| d.memory.free.as_str()),
    ("utilization_gpu", |d| d.utilization.gpu.as_str()),
    ("utilization_memory", |d| d.utilization.memory.as_str()),
    ("temp_gpu", |d| d.temperature.current.as_str()),
    ("temp_gpu_max", |d| d.temperature.max_threshold.as_str()),
    ("temp_gpu_slow", |d| d.temperature.slow_threshold.as_str()),
    ("power_draw", |d| d.power.draw.as_str()),
    ("power_limit", |d| d.power.limit.as_str()),
    ("clock_graphics", |d| d.clocks.graphics.as_str()),
    ("clock_sm", |d| d.clocks.sm.as_str()),
    ("clock_mem", |d| d.clocks.mem.as_str()),
    ("clock_video", |d| d.clocks.video.as_str()),
    ("clock_graphics_max", |d| d.max_clocks.graphics.as_str()),
    ("clock_sm_max", |d| d.max_clocks.sm.as_str()),
    ("clock_mem_max", |d| d.max_clocks.mem.as_str()),
    ("clock_video_max", |d| d.max_clocks.video.as_str()),
];

struct ExpositionWriter {
    out: String,
}

impl ExpositionWriter {
    fn with_devices(devices: usize) -> Self {
        // ~64 bytes per line is plenty for uuid-labelled lines
        let lines = BASELINE_LINES + LINES_PER_DEVICE * devices;
        Self {
            out: String::with_capacity(lines * 64),
        }
    }

    fn line(&mut self, name: &str, uuid: Option<&str>, value: &str) {
        // Writing into a String cannot fail
        let _ = match uuid {
            Some(uuid) => writeln!(self.out, "{METRIC_PREFIX}_{name}{{uuid=\"{uuid}\"}} {value}"),
            None => writeln!(self.out, "{METRIC_PREFIX}_{name} {value}"),
        };
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Render a document as exposition text.
pub fn render(doc: &Document) -> String {
    let mut w = ExpositionWriter::with_devices(doc.devices.len());

    let version = decompose_version(&coerce_numeric(&doc.driver_version));
    w.line("driver_major_version", None, &version.major);
    w.line("driver_minor_version", None, &version.minor);
    w.line("driver_patch_version", None, &version.patch);
    w.line(
        "attached_gpus",
        None,
        &coerce_numeric(&doc.attached_device_count),
    );

    for device in &doc.devices {
        for (name, reading) in DEVICE_METRICS {
            w.line(name, Some(&device.uuid), &coerce_numeric(reading(device)));
        }
    }

    w.finish()
}
