//! Service edges: wire transport, payload sealing, spreadsheet exchange,
//! fiscal receipts and the SMS relay.

pub mod api;
pub mod codec;
pub mod fiscal;
pub mod sms;
pub mod spreadsheet;

#[cfg(target_arch = "wasm32")]
pub mod files;

/// Log a non-fatal failure to the browser console. Outside the browser the
/// failure is already surfaced through the returned envelope, so this is a
/// no-op.
#[allow(clippy::missing_const_for_fn)]
pub(crate) fn log_failure(scope: &str, detail: &str) {
    #[cfg(target_arch = "wasm32")]
    gloo::console::error!(format!("{scope}: {detail}"));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = (scope, detail);
}
