// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Native printer enumeration through winspool.drv.
//
// winspool.drv is loaded at runtime. When it cannot be loaded, enumeration
// fails and the catalog falls back to the `wmic` inventory.

use libloading::{Library, Symbol};
use tracing::debug;

use printgate_core::error::{PrintgateError, Result};

const PRINTER_ENUM_LOCAL: u32 = 0x0000_0002;
const PRINTER_ENUM_CONNECTIONS: u32 = 0x0000_0004;
const ERROR_INSUFFICIENT_BUFFER: i32 = 122;

#[repr(C)]
#[allow(dead_code)]
struct PrinterInfo4W {
    printer_name: *const u16,
    server_name: *const u16,
    attributes: u32,
}

type EnumPrintersW = unsafe extern "system" fn(
    flags: u32,
    name: *const u16,
    level: u32,
    buffer: *mut u8,
    buffer_size: u32,
    needed: *mut u32,
    returned: *mut u32,
) -> i32;

type GetDefaultPrinterW = unsafe extern "system" fn(buffer: *mut u16, len: *mut u32) -> i32;

fn unavailable(what: &str, detail: impl std::fmt::Display) -> PrintgateError {
    PrintgateError::BackendUnavailable(format!("{what}: {detail}"))
}

/// Installed and connected printers, the default one first.
pub(crate) fn enumerate() -> Result<Vec<String>> {
    // SAFETY: winspool.drv is a system library with no initialisation side effects.
    let library = unsafe { Library::new("winspool.drv") }
        .map_err(|e| unavailable("failed to load winspool.drv", e))?;

    let mut names = Vec::new();
    if let Some(default) = default_printer(&library) {
        names.push(default);
    }
    for name in enum_printers(&library)? {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    debug!(count = names.len(), "enumerated printers via winspool");
    Ok(names)
}

fn default_printer(library: &Library) -> Option<String> {
    // SAFETY: the signature matches the documented GetDefaultPrinterW export.
    let get_default: Symbol<GetDefaultPrinterW> =
        unsafe { library.get(b"GetDefaultPrinterW\0") }.ok()?;

    let mut len: u32 = 0;
    // SAFETY: a null buffer with zero length only queries the required size.
    unsafe { get_default(std::ptr::null_mut(), &mut len) };
    if len == 0 {
        return None;
    }
    let mut buffer = vec![0u16; len as usize];
    // SAFETY: `buffer` holds `len` UTF-16 units.
    let ok = unsafe { get_default(buffer.as_mut_ptr(), &mut len) };
    if ok == 0 {
        return None;
    }
    let name = from_wide(buffer.as_ptr());
    (!name.is_empty()).then_some(name)
}

fn enum_printers(library: &Library) -> Result<Vec<String>> {
    // SAFETY: the signature matches the documented EnumPrintersW export.
    let enum_fn: Symbol<EnumPrintersW> = unsafe { library.get(b"EnumPrintersW\0") }
        .map_err(|e| unavailable("EnumPrintersW missing", e))?;
    let flags = PRINTER_ENUM_LOCAL | PRINTER_ENUM_CONNECTIONS;

    let mut needed: u32 = 0;
    let mut returned: u32 = 0;
    // SAFETY: a null buffer with zero size only reports the required size.
    let ok = unsafe {
        enum_fn(
            flags,
            std::ptr::null(),
            4,
            std::ptr::null_mut(),
            0,
            &mut needed,
            &mut returned,
        )
    };
    if ok == 0 {
        let code = std::io::Error::last_os_error();
        if code.raw_os_error() != Some(ERROR_INSUFFICIENT_BUFFER) {
            return Err(unavailable("EnumPrintersW failed", code));
        }
    }
    if needed == 0 {
        return Ok(Vec::new());
    }

    // u64 storage keeps the PRINTER_INFO_4W array pointer-aligned.
    let mut storage = vec![0u64; (needed as usize).div_ceil(8)];
    let buffer = storage.as_mut_ptr().cast::<u8>();
    // SAFETY: `storage` is at least `needed` bytes.
    let ok = unsafe {
        enum_fn(
            flags,
            std::ptr::null(),
            4,
            buffer,
            needed,
            &mut needed,
            &mut returned,
        )
    };
    if ok == 0 {
        return Err(unavailable(
            "EnumPrintersW failed",
            std::io::Error::last_os_error(),
        ));
    }

    let infos = buffer.cast::<PrinterInfo4W>();
    let names = (0..returned as usize)
        .filter_map(|i| {
            // SAFETY: the spooler wrote `returned` entries; their strings live in `storage`.
            let info = unsafe { &*infos.add(i) };
            (!info.printer_name.is_null()).then(|| from_wide(info.printer_name))
        })
        .filter(|name| !name.is_empty())
        .collect();
    Ok(names)
}

/// Read a NUL-terminated UTF-16 string.
fn from_wide(ptr: *const u16) -> String {
    let mut len = 0;
    // SAFETY: callers pass spooler-owned, NUL-terminated strings.
    unsafe {
        while *ptr.add(len) != 0 {
            len += 1;
        }
        String::from_utf16_lossy(std::slice::from_raw_parts(ptr, len))
    }
}
