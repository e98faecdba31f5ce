//! GPU Roster Extraction
//!
//! Pulls the detected GPU model names out of the hardware values section.

use std::sync::OnceLock;

use regex::Regex;

use bench_verdict_core::GpuRoster;

const GPU_LINE_PATTERN: &str = r"- GPUs NVIDIA CUDA\s*:\s*\d+\s*\(([^)]+)\)";

fn gpu_line() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(GPU_LINE_PATTERN).ok())
        .as_ref()
}

/// GPU names listed in `hardware_text`, empty when the line is absent.
pub fn extract_gpu_roster(hardware_text: &str) -> GpuRoster {
    let names = gpu_line()
        .and_then(|re| re.captures(hardware_text))
        .and_then(|caps| caps.get(1))
        .map(|list| {
            list.as_str()
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    GpuRoster::new(names)
}
