//! File-producing behavior of the chart producers.

use charts::default_charts;
use common::style::Style;
use tempfile::TempDir;

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

#[test]
fn each_chart_writes_exactly_one_valid_png() {
    let style = Style::init().expect("style");
    for chart in default_charts() {
        let out = TempDir::new().expect("temp dir");
        chart
            .render(&style, Some("CPU: test-cpu\nKernel: test-kernel"), out.path())
            .expect("render");

        let path = out.path().join(chart.filename());
        let bytes = std::fs::read(&path).expect("chart file");
        assert!(bytes.len() > PNG_MAGIC.len(), "{} is empty", path.display());
        assert_eq!(&bytes[..PNG_MAGIC.len()], &PNG_MAGIC, "{}", path.display());

        let produced = std::fs::read_dir(out.path()).expect("read dir").count();
        assert_eq!(produced, 1, "{} wrote extra files", chart.name());
    }
}

#[test]
fn full_report_is_four_files() {
    let style = Style::init().expect("style");
    let out = TempDir::new().expect("temp dir");
    for chart in default_charts() {
        chart
            .render(&style, Some("CPU: test-cpu\nKernel: test-kernel"), out.path())
            .expect("render");
    }
    assert_eq!(std::fs::read_dir(out.path()).expect("read dir").count(), 4);
}

#[test]
fn renders_without_host_note() {
    let style = Style::init().expect("style");
    let out = TempDir::new().expect("temp dir");
    for chart in default_charts() {
        chart.render(&style, None, out.path()).expect("render");
        assert!(out.path().join(chart.filename()).exists());
    }
}

#[test]
fn missing_nested_output_dirs_are_created() {
    let style = Style::init().expect("style");
    let out = TempDir::new().expect("temp dir");
    let nested = out.path().join("deep").join("nested").join("report");
    let charts = default_charts();
    let chart = &charts[0];
    chart.render(&style, None, &nested).expect("render");
    assert!(nested.join(chart.filename()).exists());
}

#[test]
fn rerun_overwrites_deterministically() {
    let style = Style::init().expect("style");
    let out = TempDir::new().expect("temp dir");
    let charts = default_charts();
    let chart = &charts[0];
    let path = out.path().join(chart.filename());

    chart
        .render(&style, Some("CPU: test-cpu\nKernel: test-kernel"), out.path())
        .expect("first render");
    let first = std::fs::read(&path).expect("first file");
    chart
        .render(&style, Some("CPU: test-cpu\nKernel: test-kernel"), out.path())
        .expect("second render");
    let second = std::fs::read(&path).expect("second file");

    assert_eq!(first, second);
}
