use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::evaluator::core::EvalResult,
};

/// Evaluates a scalar arithmetic operation.
///
/// All arithmetic is checked 64-bit integer arithmetic. Division truncates
/// toward zero, and a zero divisor is reported instead of panicking.
///
/// # Parameters
/// - `op`: The arithmetic operator.
/// - `left`: Left operand.
/// - `right`: Right operand.
/// - `line`: Line number for error reporting.
///
/// # Returns
/// An `EvalResult<i64>` containing the computed value.
///
/// # Example
/// ```
/// use arbor::{
///     ast::BinaryOperator,
///     error::RuntimeError,
///     interpreter::evaluator::binary::scalar::eval_scalar_op,
/// };
///
/// assert_eq!(eval_scalar_op(BinaryOperator::Div, -7, 2, 1), Ok(-3));
/// assert_eq!(eval_scalar_op(BinaryOperator::Div, 5, 0, 4),
///            Err(RuntimeError::DivisionByZero { line: 4 }));
/// ```
pub fn eval_scalar_op(op: BinaryOperator, left: i64, right: i64, line: usize) -> EvalResult<i64> {
    use BinaryOperator::{Add, Div, Mul, Sub};

    let value = match op {
        Add => left.checked_add(right),
        Sub => left.checked_sub(right),
        Mul => left.checked_mul(right),
        Div => {
            if right == 0 {
                return Err(RuntimeError::DivisionByZero { line });
            }
            left.checked_div(right)
        },
    };
    value.ok_or(RuntimeError::Overflow { line })
}
