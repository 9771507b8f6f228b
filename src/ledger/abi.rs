//! Contract interface loaded from a JSON ABI.
//!
//! Accepts either a bare ABI array or a build artifact carrying an `abi`
//! field. Entries are decoded by field type rather than position, so both
//! `(address, uint256, string)` and `(address, string, uint256)` layouts work.

use std::path::Path;

use alloy::dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt};
use alloy::json_abi::{Function, JsonAbi};
use alloy::primitives::{Address, Bytes};
use chrono::{DateTime, Utc};

use crate::config::LedgerConfig;
use crate::ledger::types::{Entry, LedgerError, LedgerResult};

const BUNDLED_ABI: &str = include_str!("../../abi/ProverbPortal.json");

/// The two contract functions the board needs.
#[derive(Debug, Clone)]
pub struct LedgerAbi {
    read: Function,
    write: Function,
}

impl LedgerAbi {
    /// Parse an ABI document and pick out the read and write functions.
    pub fn from_json(json: &str, read_function: &str, write_function: &str) -> LedgerResult<Self> {
        let document: serde_json::Value =
            serde_json::from_str(json).map_err(|e| LedgerError::Abi(format!("invalid JSON: {}", e)))?;
        let abi_value = match document.get("abi") {
            Some(abi) => abi.clone(),
            None => document,
        };
        let abi: JsonAbi = serde_json::from_value(abi_value)
            .map_err(|e| LedgerError::Abi(format!("not an ABI: {}", e)))?;

        let read = find_function(&abi, read_function)?;
        if !read.inputs.is_empty() || read.outputs.len() != 1 {
            return Err(LedgerError::Abi(format!(
                "'{}' must take no arguments and return a single list",
                read_function
            )));
        }

        let write = find_function(&abi, write_function)?;
        if write.inputs.len() != 1 || write.inputs[0].ty != "string" {
            return Err(LedgerError::Abi(format!(
                "'{}' must take a single string argument",
                write_function
            )));
        }

        Ok(Self { read, write })
    }

    /// Load from `abi_path`, or the bundled ABI when no path is configured.
    pub fn from_config(config: &LedgerConfig) -> LedgerResult<Self> {
        let json = match &config.abi_path {
            Some(path) => std::fs::read_to_string(Path::new(path))
                .map_err(|e| LedgerError::Abi(format!("cannot read '{}': {}", path, e)))?,
            None => BUNDLED_ABI.to_string(),
        };
        Self::from_json(&json, &config.read_function, &config.write_function)
    }

    /// Call data for the read function.
    pub fn encode_read(&self) -> LedgerResult<Bytes> {
        self.read
            .abi_encode_input(&[])
            .map(Bytes::from)
            .map_err(|e| LedgerError::Encode(e.to_string()))
    }

    /// Call data for appending `text`.
    pub fn encode_write(&self, text: &str) -> LedgerResult<Bytes> {
        self.write
            .abi_encode_input(&[DynSolValue::String(text.to_string())])
            .map(Bytes::from)
            .map_err(|e| LedgerError::Encode(e.to_string()))
    }

    /// Decode the read function's return data into entries, in contract order.
    pub fn decode_entries(&self, data: &[u8]) -> LedgerResult<Vec<Entry>> {
        let mut outputs = self
            .read
            .abi_decode_output(data)
            .map_err(|e| LedgerError::Decode(e.to_string()))?;

        let items = match outputs.pop() {
            Some(DynSolValue::Array(items)) | Some(DynSolValue::FixedArray(items)) => items,
            other => {
                return Err(LedgerError::Decode(format!(
                    "expected a list, got {:?}",
                    other
                )))
            }
        };

        items.into_iter().map(decode_entry).collect()
    }
}

fn find_function(abi: &JsonAbi, name: &str) -> LedgerResult<Function> {
    abi.function(name)
        .and_then(|overloads| overloads.first())
        .cloned()
        .ok_or_else(|| LedgerError::Abi(format!("function '{}' not found", name)))
}

fn decode_entry(value: DynSolValue) -> LedgerResult<Entry> {
    let fields = match value {
        DynSolValue::Tuple(fields) => fields,
        other => return Err(LedgerError::Decode(format!("expected a tuple, got {:?}", other))),
    };

    let mut author: Option<Address> = None;
    let mut seconds: Option<u64> = None;
    let mut message: Option<String> = None;

    for field in fields {
        match field {
            DynSolValue::Address(a) if author.is_none() => author = Some(a),
            DynSolValue::Uint(v, _) if seconds.is_none() => {
                seconds = Some(
                    u64::try_from(v)
                        .map_err(|_| LedgerError::Decode(format!("timestamp {} out of range", v)))?,
                )
            }
            DynSolValue::String(s) if message.is_none() => message = Some(s),
            _ => {}
        }
    }

    let author = author.ok_or_else(|| LedgerError::Decode("entry has no address field".to_string()))?;
    let seconds = seconds.ok_or_else(|| LedgerError::Decode("entry has no timestamp field".to_string()))?;
    let message = message.ok_or_else(|| LedgerError::Decode("entry has no message field".to_string()))?;

    let timestamp = i64::try_from(seconds)
        .ok()
        .and_then(|s| DateTime::<Utc>::from_timestamp(s, 0))
        .ok_or_else(|| LedgerError::Decode(format!("timestamp {} out of range", seconds)))?;

    Ok(Entry {
        author,
        timestamp,
        message,
    })
}
