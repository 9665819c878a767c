//! Segment sources for rendering by lookup
//!
//! [`Template::render`] resolves each anchor key through a [`Segments`] value.
//! This module defines that trait, the [`ToSegment`] conversion used for map
//! values and derived struct fields, and implementations for the common
//! sources.
//!
//! # Built-in Implementations
//!
//! - `HashMap<K, V>`, `BTreeMap<K, V>` and `IndexMap<K, V>` where `V: ToSegment`
//! - `serde_json::Value` - object lookup by string key
//! - [`Serialized<T>`] - any `T: Serialize`, converted to JSON once
//! - [`FnSegments`] - a closure from key to segment
//!
//! # Derive Macro Support
//!
//! With the `derive` feature, `#[derive(Segments)]` exposes a struct's fields
//! by name:
//!
//! ```rust,ignore
//! use dom_template::Segments;
//!
//! #[derive(Segments)]
//! struct Link {
//!     href: String,
//!     #[segments(rename = "label")]
//!     text: String,
//!     #[segments(skip)]
//!     clicks: u64,
//! }
//! ```
//!
//! [`Template::render`]: crate::Template::render

use std::borrow::{Borrow, Cow};
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::error::Result;

/// A lookup from anchor keys to byte segments
///
/// Returning `None` means the key is unresolved; the renderer then writes
/// nothing for that anchor. Implementations return `Cow::Borrowed` when the
/// bytes already exist and `Cow::Owned` for computed values.
pub trait Segments<K: ?Sized> {
    fn segment(&self, key: &K) -> Option<Cow<'_, [u8]>>;
}

/// Conversion of a value into the bytes it renders as
///
/// Strings render as their UTF-8 bytes, numbers and booleans through their
/// `Display` output, and `None` as an unresolved segment. No escaping is
/// applied.
pub trait ToSegment {
    fn to_segment(&self) -> Option<Cow<'_, [u8]>>;
}

impl ToSegment for str {
    fn to_segment(&self) -> Option<Cow<'_, [u8]>> {
        Some(Cow::Borrowed(self.as_bytes()))
    }
}

impl ToSegment for String {
    fn to_segment(&self) -> Option<Cow<'_, [u8]>> {
        Some(Cow::Borrowed(self.as_bytes()))
    }
}

impl ToSegment for [u8] {
    fn to_segment(&self) -> Option<Cow<'_, [u8]>> {
        Some(Cow::Borrowed(self))
    }
}

impl ToSegment for Vec<u8> {
    fn to_segment(&self) -> Option<Cow<'_, [u8]>> {
        Some(Cow::Borrowed(self.as_slice()))
    }
}

impl ToSegment for Cow<'_, str> {
    fn to_segment(&self) -> Option<Cow<'_, [u8]>> {
        Some(Cow::Borrowed(self.as_bytes()))
    }
}

impl ToSegment for Cow<'_, [u8]> {
    fn to_segment(&self) -> Option<Cow<'_, [u8]>> {
        Some(Cow::Borrowed(&**self))
    }
}

impl<T: ToSegment> ToSegment for Option<T> {
    fn to_segment(&self) -> Option<Cow<'_, [u8]>> {
        self.as_ref().and_then(ToSegment::to_segment)
    }
}

impl<T: ToSegment + ?Sized> ToSegment for &T {
    fn to_segment(&self) -> Option<Cow<'_, [u8]>> {
        (**self).to_segment()
    }
}

macro_rules! impl_to_segment_for_display {
    ($($t:ty),*) => {
        $(
            impl ToSegment for $t {
                fn to_segment(&self) -> Option<Cow<'_, [u8]>> {
                    Some(Cow::Owned(self.to_string().into_bytes()))
                }
            }
        )*
    };
}

impl_to_segment_for_display!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char
);

impl<K, V, S> Segments<K> for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: ToSegment,
    S: BuildHasher,
{
    fn segment(&self, key: &K) -> Option<Cow<'_, [u8]>> {
        self.get(key)?.to_segment()
    }
}

impl<K, V> Segments<K> for BTreeMap<K, V>
where
    K: Ord,
    V: ToSegment,
{
    fn segment(&self, key: &K) -> Option<Cow<'_, [u8]>> {
        self.get(key)?.to_segment()
    }
}

impl<K, V, S> Segments<K> for IndexMap<K, V, S>
where
    K: Hash + Eq,
    V: ToSegment,
    S: BuildHasher,
{
    fn segment(&self, key: &K) -> Option<Cow<'_, [u8]>> {
        self.get(key)?.to_segment()
    }
}

impl<K, T> Segments<K> for &T
where
    K: ?Sized,
    T: Segments<K> + ?Sized,
{
    fn segment(&self, key: &K) -> Option<Cow<'_, [u8]>> {
        (**self).segment(key)
    }
}

/// Looks up top-level object members by key
///
/// Strings render as their bytes, numbers and booleans as their JSON text.
/// `null`, arrays, nested objects and non-object values are unresolved.
impl<K> Segments<K> for JsonValue
where
    K: AsRef<str> + ?Sized,
{
    fn segment(&self, key: &K) -> Option<Cow<'_, [u8]>> {
        json_segment(self.get(key.as_ref())?)
    }
}

fn json_segment(value: &JsonValue) -> Option<Cow<'_, [u8]>> {
    match value {
        JsonValue::String(s) => Some(Cow::Borrowed(s.as_bytes())),
        JsonValue::Number(n) => Some(Cow::Owned(n.to_string().into_bytes())),
        JsonValue::Bool(b) => Some(Cow::Owned(b.to_string().into_bytes())),
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}

/// Segments from any serializable value
///
/// The value is converted to a `serde_json::Value` on first lookup and the
/// conversion is cached. Values that do not serialize to an object resolve
/// nothing; use [`Serialized::to_json`] to see the conversion error.
pub struct Serialized<'a, T: Serialize> {
    value: &'a T,
    cached_json: once_cell::sync::OnceCell<JsonValue>,
}

impl<'a, T: Serialize> Serialized<'a, T> {
    pub fn new(value: &'a T) -> Self {
        Self {
            value,
            cached_json: once_cell::sync::OnceCell::new(),
        }
    }

    /// The JSON form of the wrapped value
    pub fn to_json(&self) -> Result<&JsonValue> {
        self.cached_json
            .get_or_try_init(|| serde_json::to_value(self.value))
            .map_err(Into::into)
    }
}

impl<K, T> Segments<K> for Serialized<'_, T>
where
    K: AsRef<str> + ?Sized,
    T: Serialize,
{
    fn segment(&self, key: &K) -> Option<Cow<'_, [u8]>> {
        self.to_json().ok()?.segment(key)
    }
}

/// Segments produced by a closure
///
/// ```rust,ignore
/// use dom_template::segments::FnSegments;
///
/// let upper = FnSegments(|key: &String| Some(key.to_uppercase().into_bytes()));
/// ```
pub struct FnSegments<F>(pub F);

impl<K, F, S> Segments<K> for FnSegments<F>
where
    K: ?Sized,
    F: Fn(&K) -> Option<S>,
    S: Into<Vec<u8>>,
{
    fn segment(&self, key: &K) -> Option<Cow<'_, [u8]>> {
        (self.0)(key).map(|segment| Cow::Owned(segment.into()))
    }
}

/// String-keyed map lookup for any key type that is `AsRef<str>`
///
/// Lets a `HashMap<String, V>` resolve a `Template<&str>`, whose keys are
/// passed to the lookup as `&&str`:
///
/// ```rust,ignore
/// let html = template.render(&ByStr(&map));
/// ```
pub struct ByStr<'a, M>(pub &'a M);

impl<Q, K, V, S> Segments<Q> for ByStr<'_, HashMap<K, V, S>>
where
    Q: AsRef<str> + ?Sized,
    K: Borrow<str> + Hash + Eq,
    V: ToSegment,
    S: BuildHasher,
{
    fn segment(&self, key: &Q) -> Option<Cow<'_, [u8]>> {
        self.0.get(key.as_ref())?.to_segment()
    }
}
