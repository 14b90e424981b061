//! C FFI layer for cross-language interoperability.
//!
//! Every entry point takes null-terminated UTF-8 JSON and returns a
//! [`MathNodeResult`] whose strings are owned by the library.

use crate::config::{MathStyle, RenderConfig};
use crate::convert_json;
use crate::error::Result;
use crate::solution::{previews_from_json, steps_from_json};
use libc::{c_char, c_int};
use serde::Serialize;
use std::ffi::{CStr, CString};
use std::ptr;

/// Configuration for rendering.
#[repr(C)]
pub struct MathNodeConfig {
    /// Maximum nesting depth (0 or negative for the default)
    pub max_depth: c_int,
    /// Whether `\frac` is rewritten to `\dfrac`
    pub display_fractions: c_int,
    /// Math delimiters: 0 = inline `\( \)`, 1 = display `\[ \]`
    pub math_style: c_int,
    /// TOML configuration (null to use the fields above)
    pub toml: *const c_char,
}

impl Default for MathNodeConfig {
    fn default() -> Self {
        Self {
            max_depth: 0,
            display_fractions: 0,
            math_style: 0,
            toml: ptr::null(),
        }
    }
}

/// Result type for FFI operations.
#[repr(C)]
pub struct MathNodeResult {
    /// Pointer to result string (caller must free with mathnode_free_string)
    pub data: *mut c_char,
    /// Error message if data is null (caller must free with mathnode_free_string)
    pub error: *mut c_char,
}

impl MathNodeResult {
    fn ok(data: String) -> Self {
        Self {
            data: into_c_string(data),
            error: ptr::null_mut(),
        }
    }

    fn err(error: String) -> Self {
        Self {
            data: ptr::null_mut(),
            error: into_c_string(error),
        }
    }

    fn from_result(result: Result<String>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e.to_string()),
        }
    }
}

// Interior NULs cannot cross the boundary.
fn into_c_string(s: String) -> *mut c_char {
    let s = if s.contains('\0') { s.replace('\0', "") } else { s };
    CString::new(s).unwrap_or_default().into_raw()
}

unsafe fn read_str<'a>(input: *const c_char) -> std::result::Result<&'a str, MathNodeResult> {
    if input.is_null() {
        return Err(MathNodeResult::err("Null input pointer".to_string()));
    }
    CStr::from_ptr(input)
        .to_str()
        .map_err(|_| MathNodeResult::err("Invalid UTF-8 input".to_string()))
}

unsafe fn read_config(config: *const MathNodeConfig) -> Result<RenderConfig> {
    if config.is_null() {
        return Ok(RenderConfig::default());
    }

    let cfg = &*config;
    if !cfg.toml.is_null() {
        let text = CStr::from_ptr(cfg.toml).to_string_lossy();
        return RenderConfig::from_toml_str(&text);
    }

    let defaults = RenderConfig::default();
    Ok(RenderConfig {
        max_depth: if cfg.max_depth > 0 {
            cfg.max_depth as usize
        } else {
            defaults.max_depth
        },
        display_fractions: cfg.display_fractions != 0,
        math_style: if cfg.math_style == 1 {
            MathStyle::Display
        } else {
            MathStyle::Inline
        },
        ..defaults
    })
}

unsafe fn run<F>(input: *const c_char, config: *const MathNodeConfig, f: F) -> MathNodeResult
where
    F: FnOnce(&str, &RenderConfig) -> Result<String>,
{
    let input = match read_str(input) {
        Ok(s) => s,
        Err(e) => return e,
    };
    let config = match read_config(config) {
        Ok(c) => c,
        Err(e) => return MathNodeResult::err(e.to_string()),
    };
    MathNodeResult::from_result(f(input, &config))
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| crate::error::DecodeError::Json(e).into())
}

/// Convert a JSON node tree to a delimited LaTeX string.
///
/// # Safety
///
/// - `input` must be a valid null-terminated UTF-8 string.
/// - `config` must be null or a valid pointer to MathNodeConfig.
/// - The returned result must be freed with `mathnode_free_result`.
#[no_mangle]
pub unsafe extern "C" fn mathnode_convert_json(
    input: *const c_char,
    config: *const MathNodeConfig,
) -> MathNodeResult {
    run(input, config, convert_json)
}

/// Render a solution preview response. The data is a JSON batch report.
///
/// # Safety
///
/// - `input` must be a valid null-terminated UTF-8 string.
/// - `config` must be null or a valid pointer to MathNodeConfig.
/// - The returned result must be freed with `mathnode_free_result`.
#[no_mangle]
pub unsafe extern "C" fn mathnode_previews_json(
    input: *const c_char,
    config: *const MathNodeConfig,
) -> MathNodeResult {
    run(input, config, |json, config| {
        to_json(&previews_from_json(json, config)?)
    })
}

/// Render a detailed solution response. The data is a JSON batch report.
///
/// # Safety
///
/// - `input` must be a valid null-terminated UTF-8 string.
/// - `config` must be null or a valid pointer to MathNodeConfig.
/// - The returned result must be freed with `mathnode_free_result`.
#[no_mangle]
pub unsafe extern "C" fn mathnode_steps_json(
    input: *const c_char,
    config: *const MathNodeConfig,
) -> MathNodeResult {
    run(input, config, |json, config| {
        to_json(&steps_from_json(json, config)?)
    })
}

/// Free a string returned by mathnode functions.
///
/// # Safety
///
/// - `s` must be a pointer returned by a mathnode function, or null.
#[no_mangle]
pub unsafe extern "C" fn mathnode_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

/// Free a result struct.
///
/// # Safety
///
/// - `result` must be a valid MathNodeResult.
#[no_mangle]
pub unsafe extern "C" fn mathnode_free_result(result: MathNodeResult) {
    mathnode_free_string(result.data);
    mathnode_free_string(result.error);
}

/// Get the library version.
///
/// # Safety
///
/// The returned string is static and must not be freed.
#[no_mangle]
pub extern "C" fn mathnode_version() -> *const c_char {
    static VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");
    VERSION.as_ptr() as *const c_char
}

/// ```c
/// // mathnode_latex.h
/// #ifndef MATHNODE_LATEX_H
/// #define MATHNODE_LATEX_H
///
/// typedef struct {
///     int max_depth;          // <= 0 for the default
///     int display_fractions;  // 0 = \frac, 1 = \dfrac
///     int math_style;         // 0 = \( \), 1 = \[ \]
///     const char* toml;       // overrides the fields above when set
/// } MathNodeConfig;
///
/// typedef struct {
///     char* data;
///     char* error;
/// } MathNodeResult;
///
/// MathNodeResult mathnode_convert_json(const char* input, const MathNodeConfig* config);
/// MathNodeResult mathnode_previews_json(const char* input, const MathNodeConfig* config);
/// MathNodeResult mathnode_steps_json(const char* input, const MathNodeConfig* config);
/// void mathnode_free_string(char* s);
/// void mathnode_free_result(MathNodeResult result);
/// const char* mathnode_version(void);
///
/// #endif
/// ```
const _: () = ();

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    unsafe fn take(result: MathNodeResult) -> (Option<String>, Option<String>) {
        let read = |p: *mut c_char| {
            (!p.is_null()).then(|| CStr::from_ptr(p).to_string_lossy().into_owned())
        };
        let out = (read(result.data), read(result.error));
        mathnode_free_result(result);
        out
    }

    #[test]
    fn test_convert_json() {
        let input = CString::new(
            r#"{"type":"add","children":[{"type":"const","value":"2"},{"type":"const","value":"3"}]}"#,
        )
        .unwrap();
        let (data, error) = unsafe { take(mathnode_convert_json(input.as_ptr(), ptr::null())) };
        assert_eq!(data.as_deref(), Some(r"\(2+3\)"));
        assert_eq!(error, None);
    }

    #[test]
    fn test_display_style_config() {
        let input = CString::new(r#"{"type":"var","value":"x"}"#).unwrap();
        let config = MathNodeConfig {
            math_style: 1,
            ..Default::default()
        };
        let (data, _) = unsafe { take(mathnode_convert_json(input.as_ptr(), &config)) };
        assert_eq!(data.as_deref(), Some(r"\[x\]"));
    }

    #[test]
    fn test_toml_config() {
        let input = CString::new(r#"{"type":"var","value":"x"}"#).unwrap();
        let toml = CString::new("math_style = \"display\"").unwrap();
        let config = MathNodeConfig {
            toml: toml.as_ptr(),
            ..Default::default()
        };
        let (data, _) = unsafe { take(mathnode_convert_json(input.as_ptr(), &config)) };
        assert_eq!(data.as_deref(), Some(r"\[x\]"));

        let bad = CString::new("max_depth = \"deep\"").unwrap();
        let config = MathNodeConfig {
            toml: bad.as_ptr(),
            ..Default::default()
        };
        let (data, error) = unsafe { take(mathnode_convert_json(input.as_ptr(), &config)) };
        assert_eq!(data, None);
        assert!(error.unwrap().starts_with("Configuration error"));
    }

    #[test]
    fn test_errors() {
        let (data, error) = unsafe { take(mathnode_convert_json(ptr::null(), ptr::null())) };
        assert_eq!(data, None);
        assert_eq!(error.as_deref(), Some("Null input pointer"));

        let input = CString::new("not json").unwrap();
        let (_, error) = unsafe { take(mathnode_convert_json(input.as_ptr(), ptr::null())) };
        assert!(error.unwrap().starts_with("Decode error"));
    }

    #[test]
    fn test_steps_json() {
        let input = CString::new(r#"{"result":{"steps":[],"solution":{"type":"const","value":"5"}}}"#)
            .unwrap();
        let (data, _) = unsafe { take(mathnode_steps_json(input.as_ptr(), ptr::null())) };
        let report: serde_json::Value = serde_json::from_str(&data.unwrap()).unwrap();
        assert_eq!(report["items"][0]["step"], r"\(5\)");
        assert_eq!(report["items"][0]["header"], "Ответ");
    }

    #[test]
    fn test_previews_json_empty() {
        let input = CString::new(r#"{"groups":[]}"#).unwrap();
        let (data, _) = unsafe { take(mathnode_previews_json(input.as_ptr(), ptr::null())) };
        assert_eq!(data.as_deref(), Some(r#"{"items":[],"failures":[]}"#));
    }

    #[test]
    fn test_version() {
        let version = unsafe { CStr::from_ptr(mathnode_version()) };
        assert_eq!(version.to_str().unwrap(), env!("CARGO_PKG_VERSION"));
    }
}
