use sysinfo::System;
use tracing::debug;

/// Two-line host summary (CPU model, kernel release) for the chart corner.
///
/// Both queries are best-effort: a failed query leaves its line empty, and
/// `None` is returned only when neither yields anything, in which case the
/// charts render without the annotation box.
pub fn host_summary() -> Option<String> {
    let mut sys = System::new();
    sys.refresh_cpu_all();
    let cpu = sys
        .cpus()
        .first()
        .map(|cpu| cpu.brand().trim().to_owned())
        .unwrap_or_default();
    let kernel = System::kernel_version().unwrap_or_default();

    if cpu.is_empty() && kernel.is_empty() {
        debug!("No host info available, skipping annotation");
        return None;
    }
    Some(format!("CPU: {cpu}\nKernel: {kernel}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_is_two_labeled_lines() {
        // Whatever the host reports, the shape is fixed.
        if let Some(summary) = host_summary() {
            let lines = summary.lines().collect::<Vec<_>>();
            assert_eq!(lines.len(), 2);
            assert!(lines[0].starts_with("CPU: "));
            assert!(lines[1].starts_with("Kernel: "));
        }
    }
}
