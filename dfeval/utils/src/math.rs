//! Checked integer helpers.
//!
//! Instance indices and token counts are derived from products of rates and
//! repetition counts. A wrapped value would silently map a token to the
//! wrong instance, so every operation here fails loudly instead.
use crate::{Error, EvalResult};
use num_integer::Integer;

/// `a * b`, or an [ArithmeticRange](crate::ErrorKind::ArithmeticRange) error
/// mentioning `what`.
pub fn checked_mul(a: u64, b: u64, what: &str) -> EvalResult<u64> {
    a.checked_mul(b).ok_or_else(|| {
        Error::arithmetic(format!("{what}: {a} * {b} overflows"))
    })
}

/// `a + b`, or an arithmetic range error mentioning `what`.
pub fn checked_add(a: u64, b: u64, what: &str) -> EvalResult<u64> {
    a.checked_add(b).ok_or_else(|| {
        Error::arithmetic(format!("{what}: {a} + {b} overflows"))
    })
}

/// `a - b`, or an arithmetic range error mentioning `what`.
pub fn checked_sub(a: u64, b: u64, what: &str) -> EvalResult<u64> {
    a.checked_sub(b).ok_or_else(|| {
        Error::arithmetic(format!("{what}: {a} - {b} is negative"))
    })
}

/// Least common multiple of `a` and `b`.
pub fn checked_lcm(a: u64, b: u64) -> EvalResult<u64> {
    if a == 0 || b == 0 {
        return Ok(0);
    }
    let g = a.gcd(&b);
    checked_mul(a / g, b, "least common multiple")
}

/// Least common multiple of all the values. Returns 1 for an empty iterator.
pub fn lcm_all<I>(values: I) -> EvalResult<u64>
where
    I: IntoIterator<Item = u64>,
{
    values.into_iter().try_fold(1, checked_lcm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lcm_of_repetitions() {
        assert_eq!(lcm_all([3, 2, 6]).unwrap(), 6);
        assert_eq!(lcm_all([4, 6, 10]).unwrap(), 60);
        assert_eq!(lcm_all(std::iter::empty()).unwrap(), 1);
    }

    #[test]
    fn lcm_overflow_is_reported() {
        let big = u64::MAX - 1;
        assert!(checked_lcm(big, big - 1).is_err());
    }

    #[test]
    fn underflow_is_reported() {
        assert_eq!(checked_sub(5, 3, "tokens").unwrap(), 2);
        assert!(checked_sub(3, 5, "tokens").is_err());
    }
}
