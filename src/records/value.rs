//! # Decoded Field Values
//!
//! `Value` is what a single field decodes to. Integers are widened, floats are
//! widened to `f64`, and every blob-like field (`Bytes`, `Var`, `CStr`) is a
//! [`ByteRegion`] view into the decoded region rather than a copy.

use std::fmt;

use crate::memory::ByteRegion;
use crate::types::Scalar;

#[derive(Debug, Clone, Copy)]
pub enum Value<'a> {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Bytes(ByteRegion<'a>),
}

impl<'a> Value<'a> {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Unsigned(_) => "unsigned",
            Value::Signed(_) => "signed",
            Value::Float(_) => "float",
            Value::Bytes(_) => "bytes",
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Value::Unsigned(n) => Some(n),
            Value::Signed(n) => u64::try_from(n).ok(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Signed(n) => Some(n),
            Value::Unsigned(n) => i64::try_from(n).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Float(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_region(&self) -> Option<ByteRegion<'a>> {
        match *self {
            Value::Bytes(region) => Some(region),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&'a [u8]> {
        self.as_region().map(|r| r.as_bytes())
    }

    /// The bytes up to the first NUL, so NUL-padded fixed fields read naturally.
    pub fn trimmed_bytes(&self) -> Option<&'a [u8]> {
        let bytes = self.as_bytes()?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Some(&bytes[..end])
    }

    /// UTF-8 text of [`Value::trimmed_bytes`].
    pub fn as_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.trimmed_bytes()?).ok()
    }
}

impl From<Scalar> for Value<'_> {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Unsigned(n) => Value::Unsigned(n),
            Scalar::Signed(n) => Value::Signed(n),
            Scalar::Float(f) => Value::Float(f),
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unsigned(n) => write!(f, "{}", n),
            Value::Signed(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Bytes(region) => match self.as_str() {
                Some(text) => write!(f, "{:?}", text),
                None => write!(f, "<{} bytes>", region.len()),
            },
        }
    }
}
