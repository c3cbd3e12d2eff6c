//! UTF-16 conversions at the Win32 boundary

use std::ffi::{OsStr, OsString};
use std::os::windows::ffi::{OsStrExt, OsStringExt};

/// NUL-terminated UTF-16 copy of `s`, for `LPCWSTR` parameters
pub fn string_to_wide(s: &str) -> Vec<u16> {
    OsStr::new(s).encode_wide().chain(Some(0)).collect()
}

/// Decodes a UTF-16 buffer up to its first NUL, or entirely if it has none
pub fn wide_to_string(wide: &[u16]) -> String {
    let text = wide.split(|&c| c == 0).next().unwrap_or_default();
    OsString::from_wide(text).to_string_lossy().into_owned()
}

/// Copies a NUL-terminated UTF-16 string owned by the system, without the
/// terminator and without decoding it
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated UTF-16 string
pub unsafe fn wide_ptr_to_units(ptr: *const u16) -> Vec<u16> {
    if ptr.is_null() {
        return Vec::new();
    }
    let len = (0..).take_while(|&i| *ptr.add(i) != 0).count();
    std::slice::from_raw_parts(ptr, len).to_vec()
}
