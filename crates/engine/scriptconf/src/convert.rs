//! Conversion between Lua values and [`Value`]
//!
//! Lua → [`Value`]:
//! - `nil`, booleans and strings map directly
//! - integers and floats both become [`Value::Number`]
//! - tables become [`Value::Map`] with stringified keys, or
//!   [`Value::Sequence`] when array conversion is on and the table is an
//!   array (see [`is_array`])
//! - functions, userdata and threads follow the [`Unsupported`] policy,
//!   both as values and as table keys
//!
//! [`Value`] → Lua is total: maps become tables keyed by string, sequences
//! become tables indexed from 1.

use crate::{Error, Map, Result, Value};
use mlua::prelude::*;

/// Tables nested deeper than this are rejected (this also stops cycles)
pub const MAX_DEPTH: usize = 128;

/// What to do with Lua values that have no [`Value`] counterpart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unsupported {
    /// Render as `"<type>: 0x<address>"`, the way `tostring` does
    #[default]
    Stringify,
    /// Fail with [`Error::Conversion`]
    Reject,
}

/// Options for a Lua → [`Value`] conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConvertOptions {
    /// Turn array-shaped tables into [`Value::Sequence`]
    pub convert_arrays: bool,
    /// Policy for functions, userdata and other engine-only kinds
    pub unsupported: Unsupported,
}

impl ConvertOptions {
    pub fn with_arrays(mut self, convert_arrays: bool) -> Self {
        self.convert_arrays = convert_arrays;
        self
    }

    pub fn with_unsupported(mut self, unsupported: Unsupported) -> Self {
        self.unsupported = unsupported;
        self
    }
}

/// Convert a Lua value to our Value type
pub fn lua_value_to_value(val: &LuaValue, options: &ConvertOptions) -> Result<Value> {
    convert_lua(val, options, 0)
}

fn convert_lua(val: &LuaValue, options: &ConvertOptions, depth: usize) -> Result<Value> {
    match val {
        LuaValue::Nil => Ok(Value::Null),
        LuaValue::Boolean(b) => Ok(Value::Bool(*b)),
        LuaValue::Integer(i) => Ok(Value::Number(*i as f64)),
        LuaValue::Number(n) => Ok(Value::Number(*n)),
        LuaValue::String(s) => Ok(Value::String(s.to_string_lossy().into())),
        LuaValue::Table(t) => {
            if depth >= MAX_DEPTH {
                return Err(Error::conversion(
                    "table",
                    format!("nesting deeper than {} levels (cyclic table?)", MAX_DEPTH),
                ));
            }
            if options.convert_arrays && is_array(t)? {
                table_to_sequence(t, options, depth)
            } else {
                table_to_map(t, options, depth).map(Value::Map)
            }
        }
        other => match options.unsupported {
            Unsupported::Stringify => Ok(Value::String(describe(other))),
            Unsupported::Reject => Err(Error::conversion(
                other.type_name(),
                "no config representation",
            )),
        },
    }
}

/// Check if a table is an array: keys are exactly the integers `1..=n`
/// with `n` its raw length. Empty tables are never arrays.
pub fn is_array(table: &LuaTable) -> Result<bool> {
    let len = table.raw_len();
    if len == 0 {
        return Ok(false);
    }

    for i in 1..=len {
        if table.raw_get::<LuaValue>(i as i64)?.is_nil() {
            return Ok(false);
        }
    }

    for pair in table.pairs::<LuaValue, LuaValue>() {
        let (key, _) = pair?;
        let in_range = match key {
            LuaValue::Integer(i) => i >= 1 && (i as u64) <= len as u64,
            LuaValue::Number(n) => n.fract() == 0.0 && n >= 1.0 && n <= len as f64,
            _ => false,
        };
        if !in_range {
            return Ok(false);
        }
    }

    Ok(true)
}

fn table_to_sequence(table: &LuaTable, options: &ConvertOptions, depth: usize) -> Result<Value> {
    let len = table.raw_len();
    let mut items = Vec::with_capacity(len);
    for i in 1..=len {
        let v: LuaValue = table.raw_get(i as i64)?;
        items.push(convert_lua(&v, options, depth + 1)?);
    }
    Ok(Value::Sequence(items))
}

/// Convert a table's entries to a map, whatever its shape
pub fn lua_table_to_map(table: &LuaTable, options: &ConvertOptions) -> Result<Map> {
    table_to_map(table, options, 0)
}

/// Non-string keys are inserted first so a string key wins when both
/// stringify to the same text (`[1]` and `["1"]`).
fn table_to_map(table: &LuaTable, options: &ConvertOptions, depth: usize) -> Result<Map> {
    let mut map = Map::new();
    let mut string_keyed: Vec<(String, LuaValue)> = Vec::new();

    for pair in table.pairs::<LuaValue, LuaValue>() {
        let (key, value) = pair?;
        if let LuaValue::String(s) = &key {
            string_keyed.push((s.to_string_lossy().into(), value));
            continue;
        }
        let name = key_to_string(&key, options)?;
        map.insert(name, convert_lua(&value, options, depth + 1)?);
    }

    for (key, value) in string_keyed {
        let value = convert_lua(&value, options, depth + 1)?;
        map.insert(key, value);
    }

    Ok(map)
}

/// Render a table key as a map key.
///
/// Scalars are stringified the way Lua prints them; other kinds follow the
/// [`Unsupported`] policy.
pub fn key_to_string(key: &LuaValue, options: &ConvertOptions) -> Result<String> {
    match key {
        LuaValue::String(s) => Ok(s.to_string_lossy().into()),
        LuaValue::Integer(i) => Ok(i.to_string()),
        LuaValue::Number(n) => Ok(format_number(*n)),
        LuaValue::Boolean(b) => Ok(b.to_string()),
        other => match options.unsupported {
            Unsupported::Stringify => Ok(describe(other)),
            Unsupported::Reject => Err(Error::conversion(
                other.type_name(),
                "not usable as a map key",
            )),
        },
    }
}

/// Format a float like C's `%.14g`, which is what Lua's `tostring` uses
fn format_number(n: f64) -> String {
    const PRECISION: i32 = 14;

    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if n == 0.0 {
        return if n.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Exponent after rounding to PRECISION significant digits
    let sci = format!("{:.*e}", (PRECISION - 1) as usize, n);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exp: i32 = exp.parse().unwrap_or(0);

    if (-4..PRECISION).contains(&exp) {
        let fixed = format!("{:.*}", (PRECISION - 1 - exp) as usize, n);
        trim_fraction(&fixed).to_string()
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs())
    }
}

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

fn describe(val: &LuaValue) -> String {
    match val {
        LuaValue::Error(e) => e.to_string(),
        other => format!("{}: {:p}", other.type_name(), other.to_pointer()),
    }
}

/// Convert our Value type to a Lua value
///
/// Integral numbers become Lua integers, everything else a Lua float.
pub fn value_to_lua_value(lua: &Lua, val: &Value) -> Result<LuaValue> {
    match val {
        Value::Null => Ok(LuaValue::Nil),
        Value::Bool(b) => Ok(LuaValue::Boolean(*b)),
        Value::Number(n) => Ok(number_to_lua(*n)),
        Value::String(s) => Ok(LuaValue::String(lua.create_string(s)?)),
        Value::Map(map) => {
            let table = lua.create_table()?;
            for (k, v) in map {
                table.raw_set(k.as_str(), value_to_lua_value(lua, v)?)?;
            }
            Ok(LuaValue::Table(table))
        }
        Value::Sequence(items) => {
            let table = lua.create_table()?;
            for (i, v) in items.iter().enumerate() {
                table.raw_set((i + 1) as i64, value_to_lua_value(lua, v)?)?;
            }
            Ok(LuaValue::Table(table))
        }
    }
}

fn number_to_lua(n: f64) -> LuaValue {
    // i64::MAX as f64 rounds up to 2^63, which does not fit
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        LuaValue::Integer(n as i64)
    } else {
        LuaValue::Number(n)
    }
}
