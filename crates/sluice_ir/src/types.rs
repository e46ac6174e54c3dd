//! Interned types for values flowing through the dataflow graph.
//!
//! All types are interned into a [`TypeDb`], which assigns each unique type a
//! [`TypeId`] so that type equality is an ID comparison.

use crate::ids::TypeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A value type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Type {
    /// A signless integer of the given bit width.
    Int {
        /// The number of bits.
        width: u32,
    },
    /// A fixed-length vector of integers.
    Vector {
        /// Number of lanes.
        len: u32,
        /// The lane type.
        element: TypeId,
    },
    /// A memory-backed buffer.
    MemRef {
        /// Extent of each dimension.
        shape: Vec<u64>,
        /// The element type.
        element: TypeId,
    },
    /// A stream channel carrying one element type.
    Stream {
        /// The type of each element pushed through the channel.
        element: TypeId,
    },
}

/// The shape of an integer-like type: a scalar or a vector of scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntShape {
    /// A scalar integer.
    Scalar {
        /// Bit width.
        width: u32,
    },
    /// A vector of integers.
    Vector {
        /// Number of lanes.
        len: u32,
        /// Bit width of each lane.
        width: u32,
    },
}

impl IntShape {
    /// Returns the bit width of the scalar or of each lane.
    pub fn width(self) -> u32 {
        match self {
            IntShape::Scalar { width } | IntShape::Vector { width, .. } => width,
        }
    }

    /// Returns `true` for vectors.
    pub fn is_vector(self) -> bool {
        matches!(self, IntShape::Vector { .. })
    }

    /// Returns the lane count, or `None` for scalars.
    pub fn lanes(self) -> Option<u32> {
        match self {
            IntShape::Scalar { .. } => None,
            IntShape::Vector { len, .. } => Some(len),
        }
    }
}

/// Central type database.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeDb {
    types: Vec<Type>,
}

impl TypeDb {
    /// Creates a new, empty type database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a type, returning the existing ID if it was seen before.
    pub fn intern(&mut self, ty: Type) -> TypeId {
        if let Some(i) = self.types.iter().position(|existing| existing == &ty) {
            return TypeId::from_raw(i as u32);
        }
        let id = TypeId::from_raw(self.types.len() as u32);
        self.types.push(ty);
        id
    }

    /// Returns the type with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID is out of bounds.
    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id.as_raw() as usize]
    }

    /// Returns the width of a scalar integer type.
    pub fn int_width(&self, id: TypeId) -> Option<u32> {
        match self.get(id) {
            Type::Int { width } => Some(*width),
            _ => None,
        }
    }

    /// Classifies a scalar integer or a vector of scalar integers.
    pub fn int_shape(&self, id: TypeId) -> Option<IntShape> {
        match self.get(id) {
            Type::Int { width } => Some(IntShape::Scalar { width: *width }),
            Type::Vector { len, element } => self
                .int_width(*element)
                .map(|width| IntShape::Vector { len: *len, width }),
            _ => None,
        }
    }

    /// Returns the element type carried by a stream type.
    pub fn stream_element(&self, id: TypeId) -> Option<TypeId> {
        match self.get(id) {
            Type::Stream { element } => Some(*element),
            _ => None,
        }
    }

    /// Returns the shape of a memref type.
    pub fn memref_shape(&self, id: TypeId) -> Option<&[u64]> {
        match self.get(id) {
            Type::MemRef { shape, .. } => Some(shape),
            _ => None,
        }
    }

    /// Returns the total bit width of a type with a fixed size in bits.
    ///
    /// Streams have no storage of their own and return `None`, as does a
    /// memref too large to count in a `u64`.
    pub fn bit_width(&self, id: TypeId) -> Option<u64> {
        match self.get(id) {
            Type::Int { width } => Some(u64::from(*width)),
            Type::Vector { len, element } => self
                .bit_width(*element)
                .and_then(|w| w.checked_mul(u64::from(*len))),
            Type::MemRef { shape, element } => shape
                .iter()
                .try_fold(self.bit_width(*element)?, |bits, &extent| {
                    bits.checked_mul(extent)
                }),
            Type::Stream { .. } => None,
        }
    }

    /// Returns a value that renders the type as `i8`, `vector<2xi8>`, ...
    pub fn display(&self, id: TypeId) -> TypeDisplay<'_> {
        TypeDisplay { db: self, id }
    }

    /// Returns the number of interned types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no types have been interned.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Display adapter returned by [`TypeDb::display`].
pub struct TypeDisplay<'a> {
    db: &'a TypeDb,
    id: TypeId,
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.db.get(self.id) {
            Type::Int { width } => write!(f, "i{width}"),
            Type::Vector { len, element } => {
                write!(f, "vector<{len}x{}>", self.db.display(*element))
            }
            Type::MemRef { shape, element } => {
                write!(f, "memref<")?;
                for dim in shape {
                    write!(f, "{dim}x")?;
                }
                write!(f, "{}>", self.db.display(*element))
            }
            Type::Stream { element } => write!(f, "stream<{}>", self.db.display(*element)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_deduplicates() {
        let mut db = TypeDb::new();
        let a = db.intern(Type::Int { width: 8 });
        let b = db.intern(Type::Int { width: 8 });
        assert_eq!(a, b);
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn int_shape_classifies_scalars_and_vectors() {
        let mut db = TypeDb::new();
        let i8 = db.intern(Type::Int { width: 8 });
        let v2 = db.intern(Type::Vector {
            len: 2,
            element: i8,
        });
        let mem = db.intern(Type::MemRef {
            shape: vec![4],
            element: i8,
        });
        assert_eq!(db.int_shape(i8), Some(IntShape::Scalar { width: 8 }));
        assert_eq!(
            db.int_shape(v2),
            Some(IntShape::Vector { len: 2, width: 8 })
        );
        assert_eq!(db.int_shape(mem), None);
    }

    #[test]
    fn bit_widths() {
        let mut db = TypeDb::new();
        let i16 = db.intern(Type::Int { width: 16 });
        let v2 = db.intern(Type::Vector {
            len: 2,
            element: i16,
        });
        let mem = db.intern(Type::MemRef {
            shape: vec![4, 4],
            element: i16,
        });
        let stream = db.intern(Type::Stream { element: i16 });
        assert_eq!(db.bit_width(v2), Some(32));
        assert_eq!(db.bit_width(mem), Some(256));
        assert_eq!(db.bit_width(stream), None);
        let huge = db.intern(Type::MemRef {
            shape: vec![1 << 40, 1 << 40],
            element: i16,
        });
        assert_eq!(db.bit_width(huge), None);
    }

    #[test]
    fn display_forms() {
        let mut db = TypeDb::new();
        let i32 = db.intern(Type::Int { width: 32 });
        let v2 = db.intern(Type::Vector {
            len: 2,
            element: i32,
        });
        let mem = db.intern(Type::MemRef {
            shape: vec![4, 8],
            element: i32,
        });
        let stream = db.intern(Type::Stream { element: v2 });
        assert_eq!(db.display(i32).to_string(), "i32");
        assert_eq!(db.display(v2).to_string(), "vector<2xi32>");
        assert_eq!(db.display(mem).to_string(), "memref<4x8xi32>");
        assert_eq!(db.display(stream).to_string(), "stream<vector<2xi32>>");
    }

    #[test]
    fn stream_and_memref_accessors() {
        let mut db = TypeDb::new();
        let i8 = db.intern(Type::Int { width: 8 });
        let stream = db.intern(Type::Stream { element: i8 });
        let mem = db.intern(Type::MemRef {
            shape: vec![16],
            element: i8,
        });
        assert_eq!(db.stream_element(stream), Some(i8));
        assert_eq!(db.stream_element(i8), None);
        assert_eq!(db.memref_shape(mem), Some(&[16u64][..]));
    }

    #[test]
    fn serde_roundtrip() {
        let mut db = TypeDb::new();
        let i8 = db.intern(Type::Int { width: 8 });
        db.intern(Type::Stream { element: i8 });
        let json = serde_json::to_string(&db).unwrap();
        let restored: TypeDb = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.len(), 2);
    }
}
