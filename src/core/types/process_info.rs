//! Process information types

use super::ProcessId;

/// A process seen in a system snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEntry {
    pub pid: ProcessId,
    pub name: String,
}

impl ProcessEntry {
    pub fn new(pid: ProcessId, name: impl Into<String>) -> Self {
        ProcessEntry {
            pid,
            name: name.into(),
        }
    }

    /// Image names compare case-insensitively on Windows
    pub fn has_image_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Checks if this is the idle or kernel pseudo-process
    pub fn is_system_process(&self) -> bool {
        self.pid == 0 || self.pid == 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_name_match() {
        let entry = ProcessEntry::new(612, "WinLogon.EXE");
        assert!(entry.has_image_name("winlogon.exe"));
        assert!(!entry.has_image_name("lsass.exe"));
    }

    #[test]
    fn test_system_process() {
        assert!(ProcessEntry::new(4, "System").is_system_process());
        assert!(!ProcessEntry::new(612, "winlogon.exe").is_system_process());
    }
}
