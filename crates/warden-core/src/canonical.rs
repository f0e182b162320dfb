//! # Canonical Serialization — JCS-Compatible Byte Production
//!
//! This module defines `CanonicalBytes`, the sole construction path for bytes
//! used in digest computation across the SiteWarden Stack.
//!
//! ## Security Invariant
//!
//! The `CanonicalBytes` newtype has a private inner field. The only way to
//! construct it is through `CanonicalBytes::new()`, which drives the typed
//! input through a float-checking serializer before JCS serialization. Any
//! function computing a digest must accept `&CanonicalBytes`, so a
//! non-canonical byte sequence can never reach a hash function.
//!
//! ## Number Handling
//!
//! Risk scores, probabilities, and finding confidences are intrinsically
//! fractional, so finite floats are accepted and serialized with RFC 8785's
//! ES6 number formatting, which is deterministic for every finite `f64`.
//! NaN and infinities have no JSON representation and are rejected at
//! construction.
//!
//! Changing this convention invalidates every previously sealed hash; it
//! must be paired with a bump of `RiskEngine::MODEL_VERSION` and of the
//! snapshot `version` scheme.

use serde::Serialize;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS-compatible canonicalization.
///
/// # Invariants
///
/// - The only constructor is `CanonicalBytes::new()`.
/// - All numbers are finite; NaN and infinities are rejected.
/// - All object keys are strings.
/// - Serialization uses sorted keys with compact separators (RFC 8785).
///
/// These invariants are enforced by the constructor and cannot be violated
/// by downstream code because the inner `Vec<u8>` is private.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// This is the ONLY way to construct `CanonicalBytes`. All digest
    /// computation in the stack must flow through this constructor.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::NonFiniteNumber` if the value contains
    /// NaN or infinite floats. Returns
    /// `CanonicalizationError::SerializationFailed` if JCS serialization
    /// fails.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        // The typed input must be checked before any `Value` conversion:
        // serde_json maps NaN/infinite floats to `Value::Null` instead of
        // erroring, which would silently seal `null` into a digest.
        obj.serialize(FiniteCheck)?;
        let s = serde_jcs::to_string(obj)?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[derive(Debug)]
enum FiniteCheckError {
    NonFinite,
    Message(String),
}

impl std::fmt::Display for FiniteCheckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFinite => f.write_str("non-finite number"),
            Self::Message(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for FiniteCheckError {}

impl serde::ser::Error for FiniteCheckError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        Self::Message(msg.to_string())
    }
}

impl From<FiniteCheckError> for CanonicalizationError {
    fn from(e: FiniteCheckError) -> Self {
        match e {
            FiniteCheckError::NonFinite => Self::NonFiniteNumber,
            FiniteCheckError::Message(msg) => {
                Self::SerializationFailed(serde::ser::Error::custom(msg))
            }
        }
    }
}

macro_rules! finite_check_ok {
    ($($method:ident: $ty:ty),* $(,)?) => {
        $(fn $method(self, _v: $ty) -> Result<(), FiniteCheckError> {
            Ok(())
        })*
    };
}

/// Serializer that walks a typed value and rejects NaN/infinite floats.
///
/// This must run on the TYPED input: by the time a value has become a
/// `serde_json::Value`, non-finite floats have already collapsed to
/// `Value::Null` and are indistinguishable from genuine nulls.
struct FiniteCheck;

impl serde::Serializer for FiniteCheck {
    type Ok = ();
    type Error = FiniteCheckError;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    finite_check_ok! {
        serialize_bool: bool,
        serialize_i8: i8,
        serialize_i16: i16,
        serialize_i32: i32,
        serialize_i64: i64,
        serialize_u8: u8,
        serialize_u16: u16,
        serialize_u32: u32,
        serialize_u64: u64,
        serialize_char: char,
        serialize_str: &str,
        serialize_bytes: &[u8],
    }

    fn serialize_f32(self, v: f32) -> Result<(), FiniteCheckError> {
        if v.is_finite() {
            Ok(())
        } else {
            Err(FiniteCheckError::NonFinite)
        }
    }

    fn serialize_f64(self, v: f64) -> Result<(), FiniteCheckError> {
        if v.is_finite() {
            Ok(())
        } else {
            Err(FiniteCheckError::NonFinite)
        }
    }

    fn serialize_none(self) -> Result<(), FiniteCheckError> {
        Ok(())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<(), FiniteCheckError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<(), FiniteCheckError> {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<(), FiniteCheckError> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
    ) -> Result<(), FiniteCheckError> {
        Ok(())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<(), FiniteCheckError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Result<(), FiniteCheckError> {
        value.serialize(self)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self, FiniteCheckError> {
        Ok(self)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self, FiniteCheckError> {
        Ok(self)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self, FiniteCheckError> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self, FiniteCheckError> {
        Ok(self)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self, FiniteCheckError> {
        Ok(self)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self, FiniteCheckError> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self, FiniteCheckError> {
        Ok(self)
    }
}

impl serde::ser::SerializeSeq for FiniteCheck {
    type Ok = ();
    type Error = FiniteCheckError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), FiniteCheckError> {
        value.serialize(FiniteCheck)
    }

    fn end(self) -> Result<(), FiniteCheckError> {
        Ok(())
    }
}

impl serde::ser::SerializeTuple for FiniteCheck {
    type Ok = ();
    type Error = FiniteCheckError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), FiniteCheckError> {
        value.serialize(FiniteCheck)
    }

    fn end(self) -> Result<(), FiniteCheckError> {
        Ok(())
    }
}

impl serde::ser::SerializeTupleStruct for FiniteCheck {
    type Ok = ();
    type Error = FiniteCheckError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), FiniteCheckError> {
        value.serialize(FiniteCheck)
    }

    fn end(self) -> Result<(), FiniteCheckError> {
        Ok(())
    }
}

impl serde::ser::SerializeTupleVariant for FiniteCheck {
    type Ok = ();
    type Error = FiniteCheckError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), FiniteCheckError> {
        value.serialize(FiniteCheck)
    }

    fn end(self) -> Result<(), FiniteCheckError> {
        Ok(())
    }
}

impl serde::ser::SerializeMap for FiniteCheck {
    type Ok = ();
    type Error = FiniteCheckError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), FiniteCheckError> {
        key.serialize(FiniteCheck)
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), FiniteCheckError> {
        value.serialize(FiniteCheck)
    }

    fn end(self) -> Result<(), FiniteCheckError> {
        Ok(())
    }
}

impl serde::ser::SerializeStruct for FiniteCheck {
    type Ok = ();
    type Error = FiniteCheckError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        _key: &'static str,
        value: &T,
    ) -> Result<(), FiniteCheckError> {
        value.serialize(FiniteCheck)
    }

    fn end(self) -> Result<(), FiniteCheckError> {
        Ok(())
    }
}

impl serde::ser::SerializeStructVariant for FiniteCheck {
    type Ok = ();
    type Error = FiniteCheckError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        _key: &'static str,
        value: &T,
    ) -> Result<(), FiniteCheckError> {
        value.serialize(FiniteCheck)
    }

    fn end(self) -> Result<(), FiniteCheckError> {
        Ok(())
    }
}
