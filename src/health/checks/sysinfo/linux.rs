use std::io;

use chrono::{DateTime, Utc};
use http::request::Parts;
use tracing::{debug, warn};

use crate::health::check::{CheckGroups, CheckRecord, ChecksProvider, SYSTEM_COMPONENT};
use crate::health::checks::kernel;

/// Group reporting a failed counter read
pub const FAILURE_GROUP: &str = "sysinfo";
/// 1, 5 and 15 minute load averages, in that order
pub const LOADS_GROUP: &str = "sysinfo:loads";
pub const TOTAL_RAM_GROUP: &str = "sysinfo:totalram";
pub const FREE_RAM_GROUP: &str = "sysinfo:freeram";
pub const SHARED_RAM_GROUP: &str = "sysinfo:sharedram";
pub const BUFFER_RAM_GROUP: &str = "sysinfo:bufferram";
pub const TOTAL_SWAP_GROUP: &str = "sysinfo:totalswap";
pub const FREE_SWAP_GROUP: &str = "sysinfo:freeswap";
pub const PROCS_GROUP: &str = "sysinfo:procs";

const BYTES: &str = "B";

// Load averages are fixed point with SI_LOAD_SHIFT fractional bits
const LOAD_SCALE: f64 = (1u64 << 16) as f64;

type Reader = fn() -> io::Result<libc::sysinfo>;

/// System information from the kernel `sysinfo(2)` counter
#[derive(Debug, Clone, Copy)]
pub struct SysinfoProvider {
    read: Reader,
}

impl SysinfoProvider {
    pub fn new() -> Self {
        Self {
            read: kernel::sysinfo,
        }
    }

    #[cfg(test)]
    fn with_reader(read: Reader) -> Self {
        Self { read }
    }
}

impl Default for SysinfoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ChecksProvider for SysinfoProvider {
    fn name(&self) -> &'static str {
        "sysinfo"
    }

    fn health_checks(&self) -> CheckGroups {
        let result = (self.read)();
        let now = Utc::now();

        match result {
            Ok(info) => {
                debug!(procs = info.procs, "Read system information");
                groups(&info, now)
            }
            Err(e) => {
                warn!(error = %e, "Failed to read system information");
                CheckGroups::from([(
                    FAILURE_GROUP.to_string(),
                    vec![CheckRecord::failed(
                        SYSTEM_COMPONENT,
                        format!("sysinfo query failed: {e}"),
                        now,
                    )],
                )])
            }
        }
    }

    /// Grants every caller access
    fn authorize_health(&self, _request: &Parts) -> bool {
        true
    }
}

fn groups(info: &libc::sysinfo, now: DateTime<Utc>) -> CheckGroups {
    // Kernels before 2.3.23 leave mem_unit zero and report bytes
    let mem_unit = u64::from(info.mem_unit.max(1));
    let bytes = |value: libc::c_ulong| {
        vec![
            CheckRecord::observed(SYSTEM_COMPONENT, u64::from(value).saturating_mul(mem_unit), now)
                .with_unit(BYTES),
        ]
    };

    let loads = info
        .loads
        .iter()
        .map(|&load| CheckRecord::observed(SYSTEM_COMPONENT, u64::from(load) as f64 / LOAD_SCALE, now))
        .collect();

    CheckGroups::from([
        (LOADS_GROUP.to_string(), loads),
        (TOTAL_RAM_GROUP.to_string(), bytes(info.totalram)),
        (FREE_RAM_GROUP.to_string(), bytes(info.freeram)),
        (SHARED_RAM_GROUP.to_string(), bytes(info.sharedram)),
        (BUFFER_RAM_GROUP.to_string(), bytes(info.bufferram)),
        (TOTAL_SWAP_GROUP.to_string(), bytes(info.totalswap)),
        (FREE_SWAP_GROUP.to_string(), bytes(info.freeswap)),
        (
            PROCS_GROUP.to_string(),
            vec![CheckRecord::observed(SYSTEM_COMPONENT, u64::from(info.procs), now)],
        ),
    ])
}
