//! The four report charts comparing the copy strategies.

use std::path::Path;

use common::{
    chart::Chart,
    render::{LineChartSpec, SeriesSpec, render_line_chart},
    style::{Marker, Style},
};
use eyre::Result;

pub mod data;

use data::{
    MSG_SIZES, Strategy, THREAD_COUNTS, count_points, cycles_per_byte, l1_misses, latency_us,
    llc_misses, points, throughput_gbps,
};

/// The report's chart producers, in rendering order.
pub fn default_charts() -> Vec<Box<dyn Chart>> {
    vec![
        Box::new(Throughput),
        Box::new(Latency),
        Box::new(CacheMisses),
        Box::new(CyclesPerByte),
    ]
}

pub struct Throughput;

impl Chart for Throughput {
    fn name(&self) -> &'static str {
        "throughput"
    }

    fn filename(&self) -> &'static str {
        "throughput_vs_msg_size.png"
    }

    fn render(&self, style: &Style, host_note: Option<&str>, out_dir: &Path) -> Result<()> {
        let mut spec = LineChartSpec::new(
            "Throughput vs Message Size (Threads=8)",
            "Message size (bytes)",
            "Throughput (Gbps)",
            self.filename(),
        )
        .log2_x();
        for (idx, strategy) in Strategy::ALL.into_iter().enumerate() {
            spec = spec.with_series(SeriesSpec::new(
                strategy.label(),
                points(&MSG_SIZES, throughput_gbps(strategy)),
                idx,
            ));
        }
        render_line_chart(&spec, style, host_note, out_dir)
    }
}

pub struct Latency;

impl Chart for Latency {
    fn name(&self) -> &'static str {
        "latency"
    }

    fn filename(&self) -> &'static str {
        "latency_vs_threads.png"
    }

    fn render(&self, style: &Style, host_note: Option<&str>, out_dir: &Path) -> Result<()> {
        let mut spec = LineChartSpec::new(
            "Latency vs Thread Count (Msg Size=64)",
            "Thread count",
            "Latency (µs)",
            self.filename(),
        );
        for (idx, strategy) in Strategy::ALL.into_iter().enumerate() {
            spec = spec.with_series(SeriesSpec::new(
                strategy.label(),
                points(&THREAD_COUNTS, latency_us(strategy)),
                idx,
            ));
        }
        render_line_chart(&spec, style, host_note, out_dir)
    }
}

/// L1 and LLC misses on one chart: per-strategy color shared between the two
/// cache levels, L1 solid with circles, LLC dashed with squares.
pub struct CacheMisses;

impl Chart for CacheMisses {
    fn name(&self) -> &'static str {
        "cache-misses"
    }

    fn filename(&self) -> &'static str {
        "cache_misses_vs_msg_size.png"
    }

    fn render(&self, style: &Style, host_note: Option<&str>, out_dir: &Path) -> Result<()> {
        let mut spec = LineChartSpec::new(
            "L1 and LLC Cache Misses vs Message Size (Threads=8)",
            "Message size (bytes)",
            "Cache misses",
            self.filename(),
        )
        .log2_x();
        for (idx, strategy) in Strategy::ALL.into_iter().enumerate() {
            spec = spec.with_series(
                SeriesSpec::new(
                    format!("{} (L1)", strategy.label()),
                    count_points(&MSG_SIZES, l1_misses(strategy)),
                    idx,
                )
                .with_marker(Marker::Circle),
            );
        }
        for (idx, strategy) in Strategy::ALL.into_iter().enumerate() {
            spec = spec.with_series(
                SeriesSpec::new(
                    format!("{} (LLC)", strategy.label()),
                    count_points(&MSG_SIZES, llc_misses(strategy)),
                    idx,
                )
                .with_marker(Marker::Square)
                .dashed(),
            );
        }
        render_line_chart(&spec, style, host_note, out_dir)
    }
}

pub struct CyclesPerByte;

impl Chart for CyclesPerByte {
    fn name(&self) -> &'static str {
        "cycles-per-byte"
    }

    fn filename(&self) -> &'static str {
        "cycles_per_byte_vs_msg_size.png"
    }

    fn render(&self, style: &Style, host_note: Option<&str>, out_dir: &Path) -> Result<()> {
        let mut spec = LineChartSpec::new(
            "CPU Cycles per Byte vs Message Size (Threads=8)",
            "Message size (bytes)",
            "Cycles per byte",
            self.filename(),
        )
        .log2_x();
        for (idx, strategy) in Strategy::ALL.into_iter().enumerate() {
            spec = spec.with_series(SeriesSpec::new(
                strategy.label(),
                points(&MSG_SIZES, cycles_per_byte(strategy)),
                idx,
            ));
        }
        render_line_chart(&spec, style, host_note, out_dir)
    }
}
