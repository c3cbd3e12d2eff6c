//! Process enumeration using Windows ToolHelp32 API

use crate::core::types::ProcessEntry;
use crate::windows::bindings::kernel32;
use crate::windows::types::Handle;
use crate::windows::utils::{wide_to_string, Win32Result};
use std::mem;
use winapi::shared::minwindef::FALSE;
use winapi::um::tlhelp32::{Process32FirstW, Process32NextW, PROCESSENTRY32W};

/// Process enumerator using ToolHelp32 API
pub struct ProcessEnumerator {
    snapshot: Handle,
    first_called: bool,
}

impl ProcessEnumerator {
    /// Create a new process enumerator over a fresh snapshot
    pub fn new() -> Win32Result<Self> {
        Ok(ProcessEnumerator {
            snapshot: Handle::new(kernel32::process_snapshot()?),
            first_called: false,
        })
    }

    /// Get the next process in the enumeration
    fn next_process(&mut self) -> Option<ProcessEntry> {
        let mut entry: PROCESSENTRY32W = unsafe { mem::zeroed() };
        entry.dwSize = mem::size_of::<PROCESSENTRY32W>() as u32;

        let success = unsafe {
            if !self.first_called {
                self.first_called = true;
                Process32FirstW(self.snapshot.raw(), &mut entry)
            } else {
                Process32NextW(self.snapshot.raw(), &mut entry)
            }
        };

        if success == FALSE {
            return None;
        }

        Some(ProcessEntry::new(
            entry.th32ProcessID,
            wide_to_string(&entry.szExeFile),
        ))
    }
}

impl Iterator for ProcessEnumerator {
    type Item = ProcessEntry;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_process()
    }
}

/// Enumerate all running processes
pub fn enumerate_processes() -> Win32Result<Vec<ProcessEntry>> {
    Ok(ProcessEnumerator::new()?.collect())
}
