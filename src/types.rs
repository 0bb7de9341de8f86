//! # Scalar Types
//!
//! Fixed-width primitive types that a layout field can hold, together with the
//! byte order used to interpret them and the decoded scalar value.
//!
//! ## Widths
//!
//! | Type | Width (bytes) | Natural alignment |
//! |------|---------------|-------------------|
//! | u8 / i8 | 1 | 1 |
//! | u16 / i16 | 2 | 2 |
//! | u32 / i32 / f32 | 4 | 4 |
//! | u64 / i64 / f64 | 8 | 8 |
//!
//! Integers are widened to `u64`/`i64` on decode so that consumers can treat
//! every integer field uniformly (for example as a length source).

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl ScalarType {
    pub const fn width(self) -> usize {
        match self {
            ScalarType::U8 | ScalarType::I8 => 1,
            ScalarType::U16 | ScalarType::I16 => 2,
            ScalarType::U32 | ScalarType::I32 | ScalarType::F32 => 4,
            ScalarType::U64 | ScalarType::I64 | ScalarType::F64 => 8,
        }
    }

    pub const fn natural_alignment(self) -> usize {
        self.width()
    }

    pub const fn is_unsigned(self) -> bool {
        matches!(
            self,
            ScalarType::U8 | ScalarType::U16 | ScalarType::U32 | ScalarType::U64
        )
    }

    pub const fn is_float(self) -> bool {
        matches!(self, ScalarType::F32 | ScalarType::F64)
    }

    pub const fn name(self) -> &'static str {
        match self {
            ScalarType::U8 => "u8",
            ScalarType::U16 => "u16",
            ScalarType::U32 => "u32",
            ScalarType::U64 => "u64",
            ScalarType::I8 => "i8",
            ScalarType::I16 => "i16",
            ScalarType::I32 => "i32",
            ScalarType::I64 => "i64",
            ScalarType::F32 => "f32",
            ScalarType::F64 => "f64",
        }
    }

    /// Interprets exactly `self.width()` bytes.
    pub(crate) fn decode(self, bytes: &[u8], endian: Endian) -> Scalar {
        macro_rules! read {
            ($ty:ty) => {{
                let mut buf = [0u8; std::mem::size_of::<$ty>()];
                buf.copy_from_slice(bytes);
                match endian {
                    Endian::Little => <$ty>::from_le_bytes(buf),
                    Endian::Big => <$ty>::from_be_bytes(buf),
                }
            }};
        }

        match self {
            ScalarType::U8 => Scalar::Unsigned(bytes[0] as u64),
            ScalarType::U16 => Scalar::Unsigned(read!(u16) as u64),
            ScalarType::U32 => Scalar::Unsigned(read!(u32) as u64),
            ScalarType::U64 => Scalar::Unsigned(read!(u64)),
            ScalarType::I8 => Scalar::Signed(bytes[0] as i8 as i64),
            ScalarType::I16 => Scalar::Signed(read!(i16) as i64),
            ScalarType::I32 => Scalar::Signed(read!(i32) as i64),
            ScalarType::I64 => Scalar::Signed(read!(i64)),
            ScalarType::F32 => Scalar::Float(read!(f32) as f64),
            ScalarType::F64 => Scalar::Float(read!(f64)),
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    #[default]
    Little,
    Big,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}
