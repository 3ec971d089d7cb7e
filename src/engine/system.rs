//! Read-only hardware inventory (CPU, RAM, GPU).
//!
//! Every field degrades to [`UNKNOWN`] when it cannot be read; gathering a
//! snapshot never fails.

use crate::engine::hardware::{self, GpuVendor};
use serde::{Deserialize, Serialize};
use sysinfo::System;

pub const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuInfo {
    pub name: String,
    pub vendor: String,
    /// Physical cores, "unknown" when the platform does not report them
    pub cores: String,
    pub threads: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryInfo {
    pub total_bytes: u64,
    pub total: String,
    pub speed: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuInfo {
    pub name: String,
    pub vendor: GpuVendor,
    pub dedicated_memory: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub cpu: CpuInfo,
    pub memory: MemoryInfo,
    pub gpu: GpuInfo,
}

/// System information provider
pub trait SystemInfoProvider {
    fn snapshot(&self) -> SystemSnapshot;
}

/// Reads CPU/RAM through sysinfo and the GPU through nvidia-smi or lspci
#[derive(Debug, Clone, Default)]
pub struct HostSystemInfo;

impl SystemInfoProvider for HostSystemInfo {
    fn snapshot(&self) -> SystemSnapshot {
        let mut system = System::new();
        system.refresh_cpu();
        system.refresh_memory();

        let cpus = system.cpus();
        let first = cpus.first();
        let cpu = CpuInfo {
            name: non_empty(first.map(|c| c.brand().trim().to_string())),
            vendor: non_empty(first.map(|c| c.vendor_id().trim().to_string())),
            cores: system
                .physical_core_count()
                .map(|n| n.to_string())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            threads: cpus.len(),
        };

        let total_bytes = system.total_memory();
        let memory = MemoryInfo {
            total_bytes,
            total: if total_bytes > 0 {
                format_bytes(total_bytes)
            } else {
                UNKNOWN.to_string()
            },
            // Not exposed by sysinfo; no portable source
            speed: UNKNOWN.to_string(),
        };

        let gpu = match hardware::detect_gpu() {
            Some((vendor, name, memory_mib)) => GpuInfo {
                name,
                vendor,
                dedicated_memory: memory_mib
                    .map(|mib| format_bytes(mib * 1024 * 1024))
                    .unwrap_or_else(|| UNKNOWN.to_string()),
            },
            None => GpuInfo {
                name: UNKNOWN.to_string(),
                vendor: GpuVendor::Unknown,
                dedicated_memory: UNKNOWN.to_string(),
            },
        };

        SystemSnapshot { cpu, memory, gpu }
    }
}

fn non_empty(value: Option<String>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Format bytes as human-readable size
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
