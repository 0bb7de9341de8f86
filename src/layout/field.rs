//! # Field Specifications

use std::fmt;

use crate::types::ScalarType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Scalar(ScalarType),
    Bytes(usize),
    /// Payload length is the decoded value of the earlier field `length_from`.
    /// A terminated payload is followed by one NUL byte that is consumed but
    /// not part of the view.
    Var {
        length_from: String,
        terminated: bool,
    },
    CStr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    align: Option<usize>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            align: None,
        }
    }

    pub fn scalar(name: impl Into<String>, ty: ScalarType) -> Self {
        Self::new(name, FieldKind::Scalar(ty))
    }

    pub fn bytes(name: impl Into<String>, width: usize) -> Self {
        Self::new(name, FieldKind::Bytes(width))
    }

    pub fn var(name: impl Into<String>, length_from: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::Var {
                length_from: length_from.into(),
                terminated: false,
            },
        )
    }

    pub fn cstr(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::CStr)
    }

    /// Marks a `Var` field as followed by a NUL terminator. No effect on other kinds.
    pub fn terminated(mut self) -> Self {
        if let FieldKind::Var { terminated, .. } = &mut self.kind {
            *terminated = true;
        }
        self
    }

    pub fn aligned(mut self, align: usize) -> Self {
        self.align = Some(align);
        self
    }

    pub fn declared_alignment(&self) -> Option<usize> {
        self.align
    }

    /// Declared alignment, or the natural alignment of the field's type.
    pub fn alignment(&self) -> usize {
        self.align.unwrap_or(match self.kind {
            FieldKind::Scalar(ty) => ty.natural_alignment(),
            _ => 1,
        })
    }

    pub fn fixed_width(&self) -> Option<usize> {
        match self.kind {
            FieldKind::Scalar(ty) => Some(ty.width()),
            FieldKind::Bytes(width) => Some(width),
            FieldKind::Var { .. } | FieldKind::CStr => None,
        }
    }

    /// Smallest number of bytes this field can occupy.
    pub fn min_width(&self) -> usize {
        match self.kind {
            FieldKind::Scalar(ty) => ty.width(),
            FieldKind::Bytes(width) => width,
            FieldKind::Var { terminated, .. } => usize::from(terminated),
            FieldKind::CStr => 1,
        }
    }

    pub fn is_variable(&self) -> bool {
        self.fixed_width().is_none()
    }

    pub fn length_from(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Var { length_from, .. } => Some(length_from),
            _ => None,
        }
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.name)?;
        match &self.kind {
            FieldKind::Scalar(ty) => write!(f, "{}", ty)?,
            FieldKind::Bytes(width) => write!(f, "bytes[{}]", width)?,
            FieldKind::Var {
                length_from,
                terminated,
            } => {
                write!(f, "var({})", length_from)?;
                if *terminated {
                    f.write_str("+nul")?;
                }
            }
            FieldKind::CStr => f.write_str("cstr")?,
        }
        if let Some(align) = self.align {
            write!(f, " align {}", align)?;
        }
        Ok(())
    }
}
