//! Width and shape legality of primitive arithmetic, and pack detection.
//!
//! A `prim.mul` multiplies 8-bit operands into a 16-bit result. When exactly
//! one operand is a two-lane vector, the two lane products share a scalar
//! factor and can be computed by one double-pumped multiplier; that case is
//! the "pack multiply".

use crate::error::VerifyError;
use crate::graph::Graph;
use crate::ids::{OpId, ValueId};
use crate::op::OpKind;
use crate::types::IntShape;

/// Operand width of `prim.mul`.
pub const MUL_OPERAND_WIDTH: u32 = 8;
/// Result width of `prim.mul`.
pub const MUL_RESULT_WIDTH: u32 = 16;
/// Lane count of every vector a primitive accepts.
pub const PRIM_VECTOR_LANES: u32 = 2;
/// Integer widths `prim.cast` converts between.
pub const CAST_WIDTHS: [u32; 3] = [8, 16, 32];

/// The four legal operand combinations of `prim.mul`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MulShape {
    /// `i8 * i8 -> i16`.
    ScalarScalar,
    /// Lane-wise `vector<2xi8> * vector<2xi8> -> vector<2xi16>`.
    VectorVector,
    /// Vector left operand, scalar right operand.
    VectorScalar,
    /// Scalar left operand, vector right operand.
    ScalarVector,
}

impl MulShape {
    /// Returns `true` for the mixed vector/scalar combinations.
    pub fn is_pack(self) -> bool {
        matches!(self, MulShape::VectorScalar | MulShape::ScalarVector)
    }
}

/// What a legal `prim.cast` does to the lane width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastDirection {
    /// Input and output have the same width.
    Identity,
    /// The output is wider.
    Widen,
    /// The output is narrower; high bits are dropped.
    Narrow,
}

impl Graph {
    /// Classifies a value as a scalar or two-lane vector integer.
    fn prim_shape(&self, value: ValueId) -> Option<IntShape> {
        self.types
            .int_shape(self.value_type(value))
            .filter(|shape| shape.lanes().map_or(true, |n| n == PRIM_VECTOR_LANES))
    }

    fn malformed(&self, op: OpId, detail: &str) -> VerifyError {
        VerifyError::Malformed {
            op,
            name: self.op(op).kind.name().to_string(),
            detail: detail.to_string(),
        }
    }

    fn type_names(&self, values: &[ValueId]) -> String {
        values
            .iter()
            .map(|&v| self.type_name(self.value_type(v)))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Checks a `prim.mul` and returns its operand combination.
    ///
    /// Shapes are checked before widths: an operand that is not a scalar or
    /// two-lane vector integer is `IllegalOperandShape`; then any operand not
    /// 8-bit or result not 16-bit is `WidthMismatch`; finally the result's
    /// vector-ness must match the wider operand.
    pub fn mul_shape(&self, op: OpId) -> Result<MulShape, VerifyError> {
        let operation = self.op(op);
        if !matches!(operation.kind, OpKind::PrimMul) {
            return Err(self.malformed(op, "not a multiply"));
        }
        let (&[lhs, rhs], &[result]) = (operation.operands.as_slice(), operation.results.as_slice())
        else {
            return Err(self.malformed(op, "expected two operands and one result"));
        };

        let (Some(a), Some(b), Some(c)) = (
            self.prim_shape(lhs),
            self.prim_shape(rhs),
            self.prim_shape(result),
        ) else {
            return Err(VerifyError::IllegalOperandShape {
                op,
                detail: format!(
                    "operands and result must be integers or vector<2> of integers, found ({}) -> {}",
                    self.type_names(&[lhs, rhs]),
                    self.type_name(self.value_type(result)),
                ),
            });
        };

        if a.width() != MUL_OPERAND_WIDTH || b.width() != MUL_OPERAND_WIDTH {
            return Err(VerifyError::WidthMismatch {
                op,
                detail: format!(
                    "operands must be {MUL_OPERAND_WIDTH}-bit, found ({})",
                    self.type_names(&[lhs, rhs]),
                ),
            });
        }
        if c.width() != MUL_RESULT_WIDTH {
            return Err(VerifyError::WidthMismatch {
                op,
                detail: format!(
                    "result must be {MUL_RESULT_WIDTH}-bit, found {}",
                    self.type_name(self.value_type(result)),
                ),
            });
        }

        let shape = match (a.is_vector(), b.is_vector()) {
            (false, false) => MulShape::ScalarScalar,
            (true, true) => MulShape::VectorVector,
            (true, false) => MulShape::VectorScalar,
            (false, true) => MulShape::ScalarVector,
        };
        let vector_result = shape != MulShape::ScalarScalar;
        if c.is_vector() != vector_result {
            return Err(VerifyError::IllegalOperandShape {
                op,
                detail: format!(
                    "({}) must produce {}, found {}",
                    self.type_names(&[lhs, rhs]),
                    if vector_result { "vector<2xi16>" } else { "i16" },
                    self.type_name(self.value_type(result)),
                ),
            });
        }
        Ok(shape)
    }

    /// Returns `true` if `op` is a legal `prim.mul` pairing one vector
    /// operand with one scalar operand.
    pub fn is_pack_mul(&self, op: OpId) -> bool {
        self.mul_shape(op).is_ok_and(MulShape::is_pack)
    }

    /// Checks a `prim.cast` and returns what it does to the lane width.
    pub fn cast_direction(&self, op: OpId) -> Result<CastDirection, VerifyError> {
        let operation = self.op(op);
        if !matches!(operation.kind, OpKind::PrimCast) {
            return Err(self.malformed(op, "not a cast"));
        }
        let (&[input], &[output]) = (operation.operands.as_slice(), operation.results.as_slice())
        else {
            return Err(self.malformed(op, "expected one operand and one result"));
        };

        let (Some(from), Some(to)) = (self.prim_shape(input), self.prim_shape(output)) else {
            return Err(VerifyError::IllegalOperandShape {
                op,
                detail: format!(
                    "cast operands must be integers or vector<2> of integers, found {} -> {}",
                    self.type_name(self.value_type(input)),
                    self.type_name(self.value_type(output)),
                ),
            });
        };
        for shape in [from, to] {
            if !CAST_WIDTHS.contains(&shape.width()) {
                return Err(VerifyError::WidthMismatch {
                    op,
                    detail: format!(
                        "cast widths must be one of 8, 16 or 32, found {} -> {}",
                        self.type_name(self.value_type(input)),
                        self.type_name(self.value_type(output)),
                    ),
                });
            }
        }
        if from.is_vector() != to.is_vector() {
            return Err(VerifyError::ShapeMismatch {
                op,
                detail: format!(
                    "cast cannot change shape, found {} -> {}",
                    self.type_name(self.value_type(input)),
                    self.type_name(self.value_type(output)),
                ),
            });
        }
        Ok(match from.width().cmp(&to.width()) {
            std::cmp::Ordering::Equal => CastDirection::Identity,
            std::cmp::Ordering::Less => CastDirection::Widen,
            std::cmp::Ordering::Greater => CastDirection::Narrow,
        })
    }
}
