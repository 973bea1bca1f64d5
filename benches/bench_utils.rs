#![allow(dead_code)]

use sphincs_core::params::*;
use sphincs_core::ParameterSet;

/// Parameter sets measured by every benchmark. The small ("s") sets are left out.
pub const BENCH_SETS: [(&str, ParameterSet); 4] = [
    ("shake-128f", SPHINCS_SHAKE_128F),
    ("sha2-128f", SPHINCS_SHA2_128F),
    ("sha2-192f", SPHINCS_SHA2_192F),
    ("shake-256f", SPHINCS_SHAKE_256F),
];

pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1 << 10;

    if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
