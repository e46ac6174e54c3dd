//! Compile-time constant payloads for `prim.const`.

use serde::{Deserialize, Serialize};

/// A constant value attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstValue {
    /// A single integer; its shape is rank 0.
    Int(i64),
    /// Every element of the given shape holds the same value.
    Splat {
        /// Extent of each dimension.
        shape: Vec<u64>,
        /// The repeated value.
        value: i64,
    },
    /// Row-major element values for the given shape.
    Dense {
        /// Extent of each dimension.
        shape: Vec<u64>,
        /// Element values.
        values: Vec<i64>,
    },
}

impl ConstValue {
    /// Returns the shape of the constant.
    pub fn shape(&self) -> &[u64] {
        match self {
            ConstValue::Int(_) => &[],
            ConstValue::Splat { shape, .. } | ConstValue::Dense { shape, .. } => shape,
        }
    }

    /// Returns the number of elements the shape describes, or `None` if it
    /// does not fit in a `u64`.
    pub fn element_count(&self) -> Option<u64> {
        self.shape()
            .iter()
            .try_fold(1u64, |count, &extent| count.checked_mul(extent))
    }

    /// Returns `true` if a dense payload has exactly one value per element.
    ///
    /// A shape whose element count overflows is never complete.
    pub fn is_complete(&self) -> bool {
        match self {
            ConstValue::Dense { values, .. } => {
                self.element_count() == Some(values.len() as u64)
            }
            _ => true,
        }
    }
}
