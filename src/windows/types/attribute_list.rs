//! Process/thread attribute list carrying a parent-process override

use crate::windows::utils::{ErrorCode, Win32Result};
use std::mem;
use std::ptr;
use winapi::shared::minwindef::FALSE;
use winapi::um::processthreadsapi::{
    DeleteProcThreadAttributeList, InitializeProcThreadAttributeList, UpdateProcThreadAttribute,
    LPPROC_THREAD_ATTRIBUTE_LIST,
};
use winapi::um::winbase::PROC_THREAD_ATTRIBUTE_PARENT_PROCESS;
use winapi::um::winnt::HANDLE;

/// Attribute list holding a single `PROC_THREAD_ATTRIBUTE_PARENT_PROCESS`
/// entry. The list is deleted and its storage freed on drop.
pub struct ParentProcessAttributeList {
    // usize words keep the opaque list pointer-aligned
    buffer: Vec<usize>,
    // UpdateProcThreadAttribute stores a pointer to this value
    parent: Box<HANDLE>,
}

impl ParentProcessAttributeList {
    /// Builds the list. `parent` must stay open until process creation ends.
    pub fn new(parent: HANDLE) -> Win32Result<Self> {
        let mut size = 0;
        // Sizing call, fails with ERROR_INSUFFICIENT_BUFFER by contract
        unsafe { InitializeProcThreadAttributeList(ptr::null_mut(), 1, 0, &mut size) };
        if size == 0 {
            return Err(ErrorCode::last_error());
        }

        let words = (size + mem::size_of::<usize>() - 1) / mem::size_of::<usize>();
        let mut list = ParentProcessAttributeList {
            buffer: vec![0usize; words],
            parent: Box::new(parent),
        };

        if unsafe { InitializeProcThreadAttributeList(list.raw_unchecked(), 1, 0, &mut size) }
            == FALSE
        {
            // Not initialized, so Drop must not delete it
            let err = ErrorCode::last_error();
            list.buffer.clear();
            return Err(err);
        }

        let value: *mut HANDLE = &mut *list.parent;
        if unsafe {
            UpdateProcThreadAttribute(
                list.raw_unchecked(),
                0,
                PROC_THREAD_ATTRIBUTE_PARENT_PROCESS,
                value as *mut _,
                mem::size_of::<HANDLE>(),
                ptr::null_mut(),
                ptr::null_mut(),
            )
        } == FALSE
        {
            return Err(ErrorCode::last_error());
        }

        Ok(list)
    }

    fn raw_unchecked(&mut self) -> LPPROC_THREAD_ATTRIBUTE_LIST {
        self.buffer.as_mut_ptr() as LPPROC_THREAD_ATTRIBUTE_LIST
    }

    /// Pointer for `STARTUPINFOEXW::lpAttributeList`
    pub fn as_raw(&mut self) -> LPPROC_THREAD_ATTRIBUTE_LIST {
        self.raw_unchecked()
    }
}

impl Drop for ParentProcessAttributeList {
    fn drop(&mut self) {
        if !self.buffer.is_empty() {
            unsafe { DeleteProcThreadAttributeList(self.raw_unchecked()) };
        }
    }
}
