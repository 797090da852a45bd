/// Scalar arithmetic on two integer operands.
pub mod scalar;
