//! Field readers used by entity schemas.
//!
//! Every reader takes the field key and a human label. Missing or `null`
//! fields fall back to the documented default without an issue; present
//! but invalid fields report an issue naming the label and fall back too.

use serde_json::{Map, Value};

use super::{Choice, Schema, SchemaContext};

/// Inclusive bounds and default for a non-negative whole-number field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: u32,
    pub max: Option<u32>,
    pub default: u32,
}

impl Bounds {
    /// Any value `>= 0`, defaulting to 0.
    pub const fn non_negative() -> Self {
        Self {
            min: 0,
            max: None,
            default: 0,
        }
    }

    /// Any value `>= min`, defaulting to `min`.
    pub const fn at_least(min: u32) -> Self {
        Self {
            min,
            max: None,
            default: min,
        }
    }

    /// Any value in `min..=max`, defaulting to `min`.
    pub const fn range(min: u32, max: u32) -> Self {
        Self {
            min,
            max: Some(max),
            default: min,
        }
    }

    pub const fn or(self, default: u32) -> Self {
        Self { default, ..self }
    }

    fn check(&self, label: &str, value: i64, cx: &mut SchemaContext) -> u32 {
        if value < i64::from(self.min) {
            if self.min == 0 {
                cx.report(format!("{label} may not be negative."));
            } else {
                cx.report(format!("{label} must be at least {}.", self.min));
            }
            return self.min;
        }
        if let Some(max) = self.max {
            if value > i64::from(max) {
                cx.report(format!("{label} may not exceed {max}."));
                return max;
            }
        }
        u32::try_from(value).unwrap_or_else(|_| {
            cx.report(format!("{label} may not exceed {}.", u32::MAX));
            self.default
        })
    }
}

/// Integral JSON number, accepting floats such as `3.0`.
pub(crate) fn whole_number(value: &Value) -> Option<i64> {
    let Value::Number(number) = value else {
        return None;
    };
    number.as_i64().or_else(|| {
        number
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
            .map(|f| f as i64)
    })
}

/// Read-only view over a JSON object's fields.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'v> {
    map: Option<&'v Map<String, Value>>,
}

impl<'v> Fields<'v> {
    /// Views `value` as an object, reporting `"<label> must be an object."`
    /// otherwise. A non-object yields an empty view so parsing can continue
    /// with defaults.
    pub fn of(value: &'v Value, label: &str, cx: &mut SchemaContext) -> Self {
        match value {
            Value::Object(map) => Self { map: Some(map) },
            _ => {
                cx.report(format!("{label} must be an object."));
                Self { map: None }
            }
        }
    }

    /// Present and non-null value for `key`.
    pub fn get(&self, key: &str) -> Option<&'v Value> {
        self.map
            .and_then(|map| map.get(key))
            .filter(|value| !value.is_null())
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Non-negative whole number within `bounds`.
    pub fn count(&self, cx: &mut SchemaContext, key: &str, label: &str, bounds: Bounds) -> u32 {
        let Some(value) = self.get(key) else {
            return bounds.default;
        };
        cx.at(key, |cx| match whole_number(value) {
            Some(n) => bounds.check(label, n, cx),
            None => {
                cx.report(format!("{label} must be a whole number."));
                bounds.default
            }
        })
    }

    /// Optional non-negative whole number; absent stays `None`.
    pub fn optional_count(
        &self,
        cx: &mut SchemaContext,
        key: &str,
        label: &str,
        bounds: Bounds,
    ) -> Option<u32> {
        self.has(key).then(|| self.count(cx, key, label, bounds))
    }

    /// Signed whole number (attribute modifiers may go below zero).
    pub fn signed(&self, cx: &mut SchemaContext, key: &str, label: &str) -> i32 {
        let Some(value) = self.get(key) else {
            return 0;
        };
        cx.at(key, |cx| match whole_number(value).map(i32::try_from) {
            Some(Ok(n)) => n,
            Some(Err(_)) => {
                cx.report(format!("{label} is out of range."));
                0
            }
            None => {
                cx.report(format!("{label} must be a whole number."));
                0
            }
        })
    }

    pub fn boolean(&self, cx: &mut SchemaContext, key: &str, label: &str, default: bool) -> bool {
        let Some(value) = self.get(key) else {
            return default;
        };
        match value.as_bool() {
            Some(flag) => flag,
            None => {
                cx.report_at(key, format!("{label} must be true or false."));
                default
            }
        }
    }

    /// Free text, defaulting to an empty string.
    pub fn text(&self, cx: &mut SchemaContext, key: &str, label: &str) -> String {
        self.optional_text(cx, key, label).unwrap_or_default()
    }

    /// Text that must be present and not blank.
    pub fn required_text(&self, cx: &mut SchemaContext, key: &str, label: &str) -> String {
        match self.get(key) {
            None => {
                cx.report_at(key, format!("{label} is required."));
                String::new()
            }
            Some(Value::String(text)) if text.trim().is_empty() => {
                cx.report_at(key, format!("{label} is required."));
                String::new()
            }
            Some(_) => self.text(cx, key, label),
        }
    }

    pub fn optional_text(&self, cx: &mut SchemaContext, key: &str, label: &str) -> Option<String> {
        let value = self.get(key)?;
        match value.as_str() {
            Some(text) => Some(text.to_string()),
            None => {
                cx.report_at(key, format!("{label} must be text."));
                None
            }
        }
    }

    /// One of a closed set of stored strings.
    pub fn choice<C: Choice>(&self, cx: &mut SchemaContext, key: &str, label: &str, default: C) -> C {
        let Some(value) = self.get(key) else {
            return default;
        };
        match value.as_str().and_then(C::from_stored) {
            Some(choice) => choice,
            None => {
                cx.report_at(key, format!("{label} must be one of {}.", C::listing()));
                default
            }
        }
    }

    /// List of free-text entries, optionally capped in length.
    pub fn strings(
        &self,
        cx: &mut SchemaContext,
        key: &str,
        label: &str,
        max: Option<usize>,
    ) -> Vec<String> {
        let items = self.items(cx, key, label);
        cx.at(key, |cx| {
            if let Some(max) = max {
                if items.len() > max {
                    cx.report(format!("{label} may not have more than {max} entries."));
                }
            }
            items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| match item.as_str() {
                    Some(text) => Some(text.to_string()),
                    None => {
                        cx.at(index, |cx| cx.report(format!("{label} entries must be text.")));
                        None
                    }
                })
                .collect()
        })
    }

    /// List of entity values parsed with their own schema.
    pub fn list<T: Schema>(&self, cx: &mut SchemaContext, key: &str, label: &str) -> Vec<T> {
        let items = self.items(cx, key, label);
        cx.at(key, |cx| {
            items
                .iter()
                .enumerate()
                .map(|(index, item)| cx.at(index, |cx| T::parse(item, cx)))
                .collect()
        })
    }

    /// List of non-negative whole numbers (entity references).
    pub fn numbers(&self, cx: &mut SchemaContext, key: &str, label: &str) -> Vec<u32> {
        let items = self.items(cx, key, label);
        cx.at(key, |cx| {
            items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| {
                    cx.at(index, |cx| match whole_number(item).map(u32::try_from) {
                        Some(Ok(n)) => Some(n),
                        _ => {
                            cx.report(format!("{label} entries must be whole numbers."));
                            None
                        }
                    })
                })
                .collect()
        })
    }

    /// Exactly `len` true/false flags; short lists are padded with `false`.
    pub fn flags(&self, cx: &mut SchemaContext, key: &str, label: &str, len: usize) -> Vec<bool> {
        let Some(value) = self.get(key) else {
            return vec![false; len];
        };
        cx.at(key, |cx| {
            let Some(items) = value.as_array() else {
                cx.report(format!("{label} must be a list of {len} flags."));
                return vec![false; len];
            };
            if items.len() != len {
                cx.report(format!("{label} must have exactly {len} flags."));
            }
            let mut flags: Vec<bool> = items
                .iter()
                .take(len)
                .enumerate()
                .map(|(index, item)| {
                    item.as_bool().unwrap_or_else(|| {
                        cx.at(index, |cx| cx.report(format!("{label} must be true or false.")));
                        false
                    })
                })
                .collect();
            flags.resize(len, false);
            flags
        })
    }

    /// Nested object parsed with its own schema; absent means all defaults.
    pub fn nested<T: Schema>(&self, cx: &mut SchemaContext, key: &str) -> T {
        match self.get(key) {
            Some(value) => cx.at(key, |cx| T::parse(value, cx)),
            None => T::parse(&Value::Object(Map::new()), cx),
        }
    }

    /// Nested object that may be absent altogether.
    pub fn optional<T: Schema>(&self, cx: &mut SchemaContext, key: &str) -> Option<T> {
        self.get(key).map(|value| cx.at(key, |cx| T::parse(value, cx)))
    }

    fn items(&self, cx: &mut SchemaContext, key: &str, label: &str) -> &'v [Value] {
        match self.get(key) {
            None => &[],
            Some(Value::Array(items)) => items.as_slice(),
            Some(_) => {
                cx.report_at(key, format!("{label} must be a list."));
                &[]
            }
        }
    }
}
