//! Polynomial algorithms.
//!
//! - Division with remainder and GCD (Euclid)
//! - Squarefree decomposition (Yun)
//! - Sturm sequences for real-root counting
//! - Quadratic factors over ℚ (Kronecker)

pub mod factor;
pub mod gcd;
pub mod squarefree;
pub mod sturm;
