//! Uniform and define value model.
//!
//! Bound values are an explicit tagged union chosen from the declared uniform
//! type at bind time — a scalar slot, a fixed-length float buffer, or a
//! nullable texture reference. Runtime writes are validated against the bound
//! variant, so there is no shape sniffing on the write path.
//!
//! Numeric buffers use [`SmallVec`] with 16 inline floats: the largest
//! supported uniform type is `mat4`, so buffers never spill to the heap and a
//! bound property table stays allocation-free after resolution.

use serde::Deserialize;
use smallvec::SmallVec;

use crate::texture::TextureRef;

/// Inline storage for numeric uniform values (`mat4` is the largest arity).
pub type FloatBuffer = SmallVec<[f32; 16]>;

/// Declared type of a uniform parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UniformType {
    Int,
    Int2,
    Int4,
    Float,
    Float2,
    Float3,
    Float4,
    Color3,
    Color4,
    Mat2,
    Mat3,
    Mat4,
    #[serde(rename = "texture2D")]
    Texture2D,
    TextureCube,
}

impl UniformType {
    /// Number of floats in the bound buffer, or `None` for texture types.
    #[must_use]
    pub fn arity(self) -> Option<usize> {
        match self {
            Self::Int | Self::Float => Some(1),
            Self::Int2 | Self::Float2 => Some(2),
            Self::Float3 | Self::Color3 => Some(3),
            Self::Int4 | Self::Float4 | Self::Color4 | Self::Mat2 => Some(4),
            Self::Mat3 => Some(9),
            Self::Mat4 => Some(16),
            Self::Texture2D | Self::TextureCube => None,
        }
    }

    /// Whether this type binds a texture reference instead of numbers.
    #[must_use]
    pub fn is_texture(self) -> bool {
        self.arity().is_none()
    }

    /// Construct a bound value for this type from an optional authored
    /// default. Texture types bind a null reference; numeric types bind a
    /// buffer of exactly `arity()` floats, zero-filled past the authored
    /// default.
    #[must_use]
    pub fn instantiate(self, default: Option<&[f32]>) -> UniformValue {
        match self.arity() {
            None => UniformValue::Texture(None),
            Some(1) => {
                let v = default.and_then(|d| d.first().copied()).unwrap_or(0.0);
                UniformValue::Scalar(v)
            }
            Some(n) => {
                let mut buf = FloatBuffer::from_elem(0.0, n);
                if let Some(d) = default {
                    let count = d.len().min(n);
                    buf[..count].copy_from_slice(&d[..count]);
                }
                UniformValue::Buffer(buf)
            }
        }
    }
}

/// A bound uniform value.
///
/// The variant is fixed at bind time from the declared [`UniformType`] and
/// never changes afterwards; writes that do not match the variant are
/// rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    /// Single-component numeric value (`int`, `float`).
    Scalar(f32),
    /// Fixed-length numeric value (vectors, colors, matrices). The length is
    /// set at bind time and is invariant: buffer writes must match it
    /// exactly and fill the existing storage in place.
    Buffer(FloatBuffer),
    /// Texture reference, null until explicitly written.
    Texture(Option<TextureRef>),
}

impl UniformValue {
    /// View the numeric contents as a slice (`Scalar` is a 1-slice).
    #[must_use]
    pub fn as_floats(&self) -> Option<&[f32]> {
        match self {
            Self::Scalar(v) => Some(std::slice::from_ref(v)),
            Self::Buffer(buf) => Some(buf),
            Self::Texture(_) => None,
        }
    }

    /// The bound texture reference, if this is a texture value.
    #[must_use]
    pub fn as_texture(&self) -> Option<Option<TextureRef>> {
        match self {
            Self::Texture(t) => Some(*t),
            _ => None,
        }
    }
}

/// Declared type of a compile-time shader define.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DefineType {
    Bool,
    Int,
    Float,
}

impl DefineType {
    /// The type's default instantiation (`false` / `0` / `0.0`).
    #[must_use]
    pub fn default_value(self) -> DefineValue {
        match self {
            Self::Bool => DefineValue::Bool(false),
            Self::Int => DefineValue::Int(0),
            Self::Float => DefineValue::Float(0.0),
        }
    }
}

/// Current value of a shader define.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefineValue {
    Bool(bool),
    Int(i32),
    Float(f32),
}

impl From<bool> for DefineValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for DefineValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for DefineValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_matches_declared_component_count() {
        assert_eq!(UniformType::Float.arity(), Some(1));
        assert_eq!(UniformType::Color4.arity(), Some(4));
        assert_eq!(UniformType::Mat3.arity(), Some(9));
        assert_eq!(UniformType::Mat4.arity(), Some(16));
        assert_eq!(UniformType::Texture2D.arity(), None);
    }

    #[test]
    fn instantiate_zero_fills_past_authored_default() {
        let value = UniformType::Float4.instantiate(Some(&[1.0, 2.0]));
        assert_eq!(value.as_floats(), Some(&[1.0, 2.0, 0.0, 0.0][..]));
    }

    #[test]
    fn instantiate_texture_binds_null() {
        let value = UniformType::TextureCube.instantiate(None);
        assert_eq!(value, UniformValue::Texture(None));
    }

    #[test]
    fn instantiate_scalar_takes_first_component() {
        let value = UniformType::Float.instantiate(Some(&[0.5, 9.0]));
        assert_eq!(value, UniformValue::Scalar(0.5));
    }
}
