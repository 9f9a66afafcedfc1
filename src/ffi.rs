//! FFI bindings for Yeti Pose
//!
//! This module provides C-compatible functions for driving the pose engine
//! from a UI written in another language. All functions use C strings
//! (null-terminated) and return allocated memory that must be freed by the
//! caller using `yeti_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::pipeline::{state_to_pose_json, state_to_svg, PoseProcessor};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Run a string-to-string conversion with last-error bookkeeping
unsafe fn convert<F>(json: *const c_char, f: F) -> *mut c_char
where
    F: FnOnce(&str) -> Result<String, crate::PoseError>,
{
    clear_last_error();

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    match f(&json_str) {
        Ok(out) => string_to_cstr(&out),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateless API
// ============================================================================

/// Evaluate interaction state JSON and return a pose frame JSON.
///
/// # Safety
/// - `json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `yeti_free_string`.
/// - Returns NULL on error; call `yeti_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn yeti_state_to_pose(json: *const c_char) -> *mut c_char {
    convert(json, state_to_pose_json)
}

/// Evaluate interaction state JSON and return the character as an SVG document.
///
/// # Safety
/// - `json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `yeti_free_string`.
/// - Returns NULL on error; call `yeti_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn yeti_render_svg(json: *const c_char) -> *mut c_char {
    convert(json, state_to_svg)
}

// ============================================================================
// Stateful Processor API
// ============================================================================

/// Opaque handle to a PoseProcessor
pub struct PoseProcessorHandle {
    processor: PoseProcessor,
}

/// Create a new PoseProcessor.
///
/// # Safety
/// - Returns a pointer to a newly allocated PoseProcessor.
/// - Must be freed with `yeti_processor_free`.
#[no_mangle]
pub unsafe extern "C" fn yeti_processor_new() -> *mut PoseProcessorHandle {
    clear_last_error();

    let handle = Box::new(PoseProcessorHandle {
        processor: PoseProcessor::new(),
    });
    Box::into_raw(handle)
}

/// Free a PoseProcessor.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `yeti_processor_new`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn yeti_processor_free(processor: *mut PoseProcessorHandle) {
    if !processor.is_null() {
        drop(Box::from_raw(processor));
    }
}

/// Process interaction state JSON with a stateful processor.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `yeti_processor_new`.
/// - `json` must be a valid null-terminated C string.
/// - Returns a newly allocated frame JSON string that must be freed with `yeti_free_string`.
/// - Returns NULL on error.
#[no_mangle]
pub unsafe extern "C" fn yeti_processor_process(
    processor: *mut PoseProcessorHandle,
    json: *const c_char,
) -> *mut c_char {
    if processor.is_null() {
        clear_last_error();
        set_last_error("Invalid processor pointer");
        return ptr::null_mut();
    }

    let handle = &mut *processor;
    convert(json, |s| handle.processor.process(s))
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by any yeti function.
///
/// # Safety
/// - `ptr` must be a pointer returned by a yeti function, or NULL.
#[no_mangle]
pub unsafe extern "C" fn yeti_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local string, valid until the next yeti call
///   on this thread. Do NOT free it.
/// - Returns NULL if there was no error.
#[no_mangle]
pub unsafe extern "C" fn yeti_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match e.borrow().as_ref() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

/// Get the Yeti Pose version string.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free it.
#[no_mangle]
pub unsafe extern "C" fn yeti_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
