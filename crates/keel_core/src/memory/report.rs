//! Human-readable rendering of tracker statistics.

use super::{MemoryStats, MemoryTag};
use std::fmt;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;
const GIB: u64 = 1024 * MIB;

/// Byte count rendered with the largest fitting binary unit (B/KiB/MiB/GiB).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ByteSize(pub u64);

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.0;
        let (amount, unit) = if bytes >= GIB {
            (bytes as f64 / GIB as f64, "GiB")
        } else if bytes >= MIB {
            (bytes as f64 / MIB as f64, "MiB")
        } else if bytes >= KIB {
            (bytes as f64 / KIB as f64, "KiB")
        } else {
            (bytes as f64, "B")
        };
        write!(f, "{amount:.2}{unit}")
    }
}

/// Per-tag breakdown of tracked memory, one line per [`MemoryTag`].
#[derive(Debug, Clone, Default)]
pub struct UsageReport {
    stats: MemoryStats,
}

impl UsageReport {
    pub fn new(stats: MemoryStats) -> Self {
        Self { stats }
    }
}

impl fmt::Display for UsageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "System memory use (tagged):")?;
        for tag in MemoryTag::ALL {
            writeln!(f, "  {}: {}", tag.label(), ByteSize(self.stats.tagged(tag)))?;
        }
        Ok(())
    }
}
