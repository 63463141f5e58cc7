//! CPU load sampling for the admission gate.

use std::time::Instant;
use sysinfo::{CpuRefreshKind, RefreshKind, System};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("no CPUs reported by the system")]
    NoCpus,
    #[error("CPU usage reading is not a number: {0}")]
    Invalid(f32),
}

/// Source of the current CPU utilization in percent (0-100).
pub trait LoadSampler {
    fn sample(&mut self) -> Result<f32, SampleError>;
}

/// System-wide CPU usage via `sysinfo`.
///
/// Usage is measured between consecutive refreshes. A sample taken less than
/// `MINIMUM_CPU_UPDATE_INTERVAL` after the previous one waits out the remainder
/// so the reading is meaningful.
pub struct SysinfoSampler {
    system: System,
    last_refresh: Instant,
}

impl SysinfoSampler {
    pub fn new() -> Self {
        let mut system = System::new_with_specifics(
            RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing().with_cpu_usage()),
        );
        system.refresh_cpu_usage();
        Self {
            system,
            last_refresh: Instant::now(),
        }
    }
}

impl Default for SysinfoSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadSampler for SysinfoSampler {
    fn sample(&mut self) -> Result<f32, SampleError> {
        let elapsed = self.last_refresh.elapsed();
        if elapsed < sysinfo::MINIMUM_CPU_UPDATE_INTERVAL {
            std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL - elapsed);
        }
        self.system.refresh_cpu_usage();
        self.last_refresh = Instant::now();

        if self.system.cpus().is_empty() {
            return Err(SampleError::NoCpus);
        }
        let usage = self.system.global_cpu_usage();
        if usage.is_nan() {
            return Err(SampleError::Invalid(usage));
        }
        Ok(usage.clamp(0.0, 100.0))
    }
}
