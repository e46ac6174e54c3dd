//! Legality of primitive arithmetic and constants.

use sluice_ir::{Graph, OpId, OpKind, VerifyError};

use crate::VerifyRule;

/// `prim.mul` operands and result form one of the four legal combinations.
pub struct MulLegality;

impl VerifyRule for MulLegality {
    fn name(&self) -> &str {
        "mul-legality"
    }

    fn description(&self) -> &str {
        "multiplies take 8-bit scalar or vector<2> operands and produce 16 bits"
    }

    fn applies_to(&self, kind: &OpKind) -> bool {
        matches!(kind, OpKind::PrimMul)
    }

    fn check_op(&self, graph: &Graph, op: OpId, errors: &mut Vec<VerifyError>) {
        match graph.mul_shape(op) {
            Ok(_) | Err(VerifyError::Malformed { .. }) => {}
            Err(err) => errors.push(err),
        }
    }
}

/// `prim.cast` converts between 8, 16 and 32-bit integers without changing shape.
pub struct CastLegality;

impl VerifyRule for CastLegality {
    fn name(&self) -> &str {
        "cast-legality"
    }

    fn description(&self) -> &str {
        "casts keep their shape and use 8, 16 or 32-bit lanes"
    }

    fn applies_to(&self, kind: &OpKind) -> bool {
        matches!(kind, OpKind::PrimCast)
    }

    fn check_op(&self, graph: &Graph, op: OpId, errors: &mut Vec<VerifyError>) {
        match graph.cast_direction(op) {
            Ok(_) | Err(VerifyError::Malformed { .. }) => {}
            Err(err) => errors.push(err),
        }
    }
}

/// A `prim.const` payload has the shape of its memref result.
pub struct ConstShape;

impl VerifyRule for ConstShape {
    fn name(&self) -> &str {
        "const-shape"
    }

    fn description(&self) -> &str {
        "constant payloads match the shape of their memref result"
    }

    fn applies_to(&self, kind: &OpKind) -> bool {
        matches!(kind, OpKind::PrimConst { .. })
    }

    fn check_op(&self, graph: &Graph, op: OpId, errors: &mut Vec<VerifyError>) {
        let operation = graph.op(op);
        let (OpKind::PrimConst { value }, Some(&result)) =
            (&operation.kind, operation.results.first())
        else {
            return;
        };
        let ty = graph.value_type(result);
        let Some(shape) = graph.types.memref_shape(ty) else {
            errors.push(VerifyError::TypeMismatch {
                op,
                expected: "a memref".into(),
                found: graph.type_name(ty),
            });
            return;
        };
        if value.shape() != shape {
            errors.push(VerifyError::ShapeMismatch {
                op,
                detail: format!(
                    "constant has shape {:?} but result is {}",
                    value.shape(),
                    graph.type_name(ty)
                ),
            });
        } else if !value.is_complete() {
            let detail = match value.element_count() {
                Some(count) => {
                    format!("dense constant of shape {:?} needs {count} values", value.shape())
                }
                None => format!(
                    "dense constant of shape {:?} has more elements than fit in a u64",
                    value.shape()
                ),
            };
            errors.push(VerifyError::ShapeMismatch { op, detail });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sluice_ir::ConstValue;

    fn check(rule: &dyn VerifyRule, graph: &Graph, op: OpId) -> Vec<VerifyError> {
        let mut errors = Vec::new();
        rule.check_op(graph, op, &mut errors);
        errors
    }

    #[test]
    fn legal_pack_mul_passes() {
        let mut g = Graph::new();
        let i8 = g.int_type(8);
        let v8 = g.vector_type(2, 8);
        let v16 = g.vector_type(2, 16);
        let mut b = g.builder();
        let x = b.arg(v8);
        let y = b.arg(i8);
        let p = b.mul(x, y, v16);
        let op = g.value(p).defining_op().unwrap();
        assert!(check(&MulLegality, &g, op).is_empty());
    }

    #[test]
    fn sixteen_bit_operand_rejected() {
        let mut g = Graph::new();
        let i8 = g.int_type(8);
        let i16 = g.int_type(16);
        let mut b = g.builder();
        let x = b.arg(i16);
        let y = b.arg(i8);
        let p = b.mul(x, y, i16);
        let op = g.value(p).defining_op().unwrap();
        assert_eq!(check(&MulLegality, &g, op)[0].kind_name(), "WidthMismatch");
    }

    #[test]
    fn malformed_mul_left_to_structure() {
        let mut g = Graph::new();
        let i16 = g.int_type(16);
        let mut b = g.builder();
        let op = b.create(OpKind::PrimMul, &[], &[i16]);
        assert!(check(&MulLegality, &g, op).is_empty());
    }

    #[test]
    fn cast_shape_change_rejected() {
        let mut g = Graph::new();
        let v8 = g.vector_type(2, 8);
        let i16 = g.int_type(16);
        let mut b = g.builder();
        let x = b.arg(v8);
        let y = b.cast(x, i16);
        let op = g.value(y).defining_op().unwrap();
        assert_eq!(check(&CastLegality, &g, op)[0].kind_name(), "ShapeMismatch");
    }

    #[test]
    fn const_shape_matches() {
        let mut g = Graph::new();
        let i32 = g.int_type(32);
        let mem = g.memref_type(&[2, 2], i32);
        let mut b = g.builder();
        let ok = b.constant(
            ConstValue::Dense {
                shape: vec![2, 2],
                values: vec![1, 2, 3, 4],
            },
            mem,
        );
        let bad = b.constant(
            ConstValue::Splat {
                shape: vec![4],
                value: 0,
            },
            mem,
        );
        let short = b.constant(
            ConstValue::Dense {
                shape: vec![2, 2],
                values: vec![1],
            },
            mem,
        );
        let op = |v| g.value(v).defining_op().unwrap();
        assert!(check(&ConstShape, &g, op(ok)).is_empty());
        assert_eq!(check(&ConstShape, &g, op(bad))[0].kind_name(), "ShapeMismatch");
        assert_eq!(check(&ConstShape, &g, op(short))[0].kind_name(), "ShapeMismatch");
    }

    #[test]
    fn scalar_const_in_rank_zero_memref() {
        let mut g = Graph::new();
        let i8 = g.int_type(8);
        let mem = g.memref_type(&[], i8);
        let mut b = g.builder();
        let c = b.constant(ConstValue::Int(7), mem);
        let op = g.value(c).defining_op().unwrap();
        assert!(check(&ConstShape, &g, op).is_empty());
    }

    #[test]
    fn const_into_scalar_is_type_mismatch() {
        let mut g = Graph::new();
        let i8 = g.int_type(8);
        let mut b = g.builder();
        let c = b.constant(ConstValue::Int(7), i8);
        let op = g.value(c).defining_op().unwrap();
        assert_eq!(check(&ConstShape, &g, op)[0].kind_name(), "TypeMismatch");
    }

    #[test]
    fn overflowing_dense_shape_is_shape_mismatch() {
        let mut g = Graph::new();
        let i8 = g.int_type(8);
        let mem = g.memref_type(&[1 << 40, 1 << 40], i8);
        let mut b = g.builder();
        let c = b.constant(
            ConstValue::Dense {
                shape: vec![1 << 40, 1 << 40],
                values: vec![],
            },
            mem,
        );
        let op = g.value(c).defining_op().unwrap();
        let errors = check(&ConstShape, &g, op);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind_name(), "ShapeMismatch");
        assert!(errors[0].to_string().contains("more elements than fit"));
        assert!(crate::verify(&g).is_err());
    }
}
