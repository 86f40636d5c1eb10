//! C header fragment declaring the key table.
//!
//! The firmware build includes this file to embed every device key as a
//! `uint8_t keys[N][32]` array, one row per device in device-id order.

use std::fmt::Write;

use crate::constants::KEY_LEN;
use crate::keystore::KeyStore;

/// Name of the generated array.
pub const ARRAY_NAME: &str = "keys";

/// Render the key table for `store`.
///
/// Bytes are written as unpadded lowercase hex literals (`0x0`, `0xa`, `0xff`).
pub fn render_key_table(store: &KeyStore) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "uint8_t {ARRAY_NAME}[{}][{KEY_LEN}] = {{", store.len());
    for (_, record) in store.iter() {
        let values: Vec<String> = record
            .key
            .as_bytes()
            .iter()
            .map(|b| format!("0x{b:x}"))
            .collect();
        let _ = writeln!(out, "    {{{}}},", values.join(", "));
    }
    out.push_str("};\n");
    out
}
