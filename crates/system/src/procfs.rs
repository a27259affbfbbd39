//! Parsers for the procfs/sysfs text files the sources read.

use meter_core::{MeterError, Result};
use std::collections::HashMap;
use std::path::Path;

/// Read a whole kernel text file, mapping failures to `MeterError::System`.
pub(crate) fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| MeterError::System(format!("{}: {e}", path.display())))
}

/// `key value [kB]` lines (`/proc/meminfo`, `/proc/vmstat`) as bytes when a
/// `kB` suffix is present, raw numbers otherwise.
pub(crate) fn parse_key_values(text: &str) -> HashMap<&str, u64> {
    text.lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let key = parts.next()?.trim_end_matches(':');
            let value: u64 = parts.next()?.parse().ok()?;
            let value = match parts.next() {
                Some("kB") => value * 1024,
                _ => value,
            };
            Some((key, value))
        })
        .collect()
}

/// Single trimmed line from a sysfs attribute file.
pub(crate) fn read_attr(path: &Path) -> Option<String> {
    std::fs::read_to_string(path).ok().map(|s| s.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kb_values_become_bytes() {
        let text = "MemTotal:       16314388 kB\nBuffers:          123 kB\npswpin 42\nbroken line\n";
        let kv = parse_key_values(text);
        assert_eq!(kv["MemTotal"], 16314388 * 1024);
        assert_eq!(kv["Buffers"], 123 * 1024);
        assert_eq!(kv["pswpin"], 42);
        assert_eq!(kv.len(), 3);
    }
}
