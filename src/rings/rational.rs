use crate::error::{MatrixError, Result};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::fmt::Display;
use std::ops;
use std::str::FromStr;

/// Exact fraction, always in lowest terms with a positive denominator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rational {
    num: BigInt,
    den: BigInt,
}

impl Rational {
    pub fn new(num: impl Into<BigInt>, den: impl Into<BigInt>) -> Result<Self> {
        let num = num.into();
        let den = den.into();
        if den.is_zero() {
            return Err(MatrixError::divide_by_zero(num.to_string()));
        }
        Ok(Self::reduced(num, den))
    }

    // `den` must be non zero
    fn reduced(num: BigInt, den: BigInt) -> Self {
        let g = num.gcd(&den);
        let num = num / &g;
        let den = den / &g;

        if den.is_negative() {
            return Self {
                num: -num,
                den: -den,
            };
        }
        Self { num, den }
    }

    pub fn from_integer(value: impl Into<BigInt>) -> Self {
        Self {
            num: value.into(),
            den: BigInt::one(),
        }
    }

    pub fn numer(&self) -> &BigInt {
        &self.num
    }

    pub fn denom(&self) -> &BigInt {
        &self.den
    }

    pub fn is_integer(&self) -> bool {
        self.den.is_one()
    }

    pub fn is_negative(&self) -> bool {
        self.num.is_negative()
    }

    pub fn abs(&self) -> Rational {
        Rational {
            num: self.num.abs(),
            den: self.den.clone(),
        }
    }

    /// Fails with `DivideByZero` naming `self` when `rhs` is zero.
    pub fn checked_div(&self, rhs: &Rational) -> Result<Rational> {
        if rhs.is_zero() {
            return Err(MatrixError::divide_by_zero(self.to_string()));
        }
        Ok(Rational::reduced(&self.num * &rhs.den, &self.den * &rhs.num))
    }

    pub fn recip(&self) -> Result<Rational> {
        Rational::one().checked_div(self)
    }
}

impl From<i32> for Rational {
    fn from(value: i32) -> Self {
        Rational::from_integer(value)
    }
}

impl From<i64> for Rational {
    fn from(value: i64) -> Self {
        Rational::from_integer(value)
    }
}

impl From<BigInt> for Rational {
    fn from(value: BigInt) -> Self {
        Rational::from_integer(value)
    }
}

impl FromStr for Rational {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || MatrixError::InvalidNumber {
            token: s.to_string(),
        };
        let mut parts = s.trim().splitn(2, '/');
        let num = parts.next().filter(|p| !p.is_empty()).ok_or_else(invalid)?;
        let den = parts.next().unwrap_or("1");

        Rational::new(
            BigInt::parse_bytes(num.trim().as_bytes(), 10).ok_or_else(invalid)?,
            BigInt::parse_bytes(den.trim().as_bytes(), 10).ok_or_else(invalid)?,
        )
    }
}

impl<'a> ops::Add<&'a Rational> for &'a Rational {
    type Output = Rational;

    fn add(self, rhs: &'a Rational) -> Rational {
        if self.den == rhs.den {
            return Rational::reduced(&self.num + &rhs.num, self.den.clone());
        }

        Rational::reduced(
            &self.num * &rhs.den + &rhs.num * &self.den,
            &self.den * &rhs.den,
        )
    }
}

impl<'a> ops::Sub<&'a Rational> for &'a Rational {
    type Output = Rational;

    fn sub(self, rhs: &'a Rational) -> Rational {
        self + &(-rhs)
    }
}

impl<'a> ops::Mul<&'a Rational> for &'a Rational {
    type Output = Rational;

    fn mul(self, rhs: &'a Rational) -> Rational {
        Rational::reduced(&self.num * &rhs.num, &self.den * &rhs.den)
    }
}

impl ops::Neg for &Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational {
            num: -&self.num,
            den: self.den.clone(),
        }
    }
}

impl ops::Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational {
            num: -self.num,
            den: self.den,
        }
    }
}

// By-value forms delegate to the borrowed ones
macro_rules! forward_binop {
    ($imp:ident, $method:ident) => {
        impl ops::$imp for Rational {
            type Output = Rational;

            fn $method(self, rhs: Rational) -> Rational {
                (&self).$method(&rhs)
            }
        }

        impl<'a> ops::$imp<&'a Rational> for Rational {
            type Output = Rational;

            fn $method(self, rhs: &'a Rational) -> Rational {
                (&self).$method(rhs)
            }
        }
    };
}

forward_binop!(Add, add);
forward_binop!(Sub, sub);
forward_binop!(Mul, mul);

impl One for Rational {
    fn one() -> Rational {
        Rational::from_integer(1)
    }

    fn is_one(&self) -> bool {
        self.num.is_one() && self.den.is_one()
    }
}

impl Zero for Rational {
    fn zero() -> Rational {
        Rational::from_integer(0)
    }

    fn is_zero(&self) -> bool {
        self.num.is_zero()
    }
}

impl Default for Rational {
    fn default() -> Self {
        Rational::zero()
    }
}

impl Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den.is_one() {
            return write!(f, "{}", self.num);
        }
        write!(f, "{}/{}", self.num, self.den)
    }
}

impl PartialEq<i64> for Rational {
    fn eq(&self, rhs: &i64) -> bool {
        self.den.is_one() && self.num == BigInt::from(*rhs)
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, rhs: &Rational) -> Option<Ordering> {
        Some(self.cmp(rhs))
    }
}

impl Ord for Rational {
    fn cmp(&self, rhs: &Rational) -> Ordering {
        (&self.num * &rhs.den).cmp(&(&rhs.num * &self.den))
    }
}

impl std::iter::Sum<Rational> for Rational {
    fn sum<I: Iterator<Item = Rational>>(iter: I) -> Rational {
        iter.fold(Rational::zero(), |acc, f| acc + f)
    }
}

impl<'a> std::iter::Sum<&'a Rational> for Rational {
    fn sum<I: Iterator<Item = &'a Rational>>(iter: I) -> Rational {
        iter.fold(Rational::zero(), |acc, f| acc + f)
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn q(num: i64, den: i64) -> Rational {
        Rational::new(num, den).unwrap()
    }

    #[test]
    fn test_rational_normalization() {
        assert_eq!(q(6, 8), q(3, 4));
        assert_eq!(q(3, -4).to_string(), "-3/4");
        assert_eq!(q(-3, -4).to_string(), "3/4");
        assert_eq!(q(10, 5).to_string(), "2");
        assert_eq!(q(0, -7).to_string(), "0");
        assert_eq!(*q(0, -7).denom(), BigInt::one());
        assert!(q(4, 2).is_integer());
        assert_eq!(q(4, 2), 2);
    }

    #[test]
    fn test_rational_arithmetic() {
        assert_eq!(q(1, 2) + q(1, 3), q(5, 6));
        assert_eq!(q(1, 2) - q(1, 3), q(1, 6));
        assert_eq!(q(2, 3) * q(9, 4), q(3, 2));
        assert_eq!(q(2, 3).checked_div(&q(4, 9)).unwrap(), q(3, 2));
        assert_eq!(-q(2, 3), q(-2, 3));
        assert_eq!(q(-2, 3).abs(), q(2, 3));
        assert_eq!(q(-2, 3).recip().unwrap(), q(-3, 2));
        assert_eq!(
            vec![q(1, 2), q(1, 4), q(1, 4)].into_iter().sum::<Rational>(),
            Rational::one()
        );
    }

    #[test]
    fn test_rational_divide_by_zero() {
        assert_eq!(
            q(3, 2).checked_div(&Rational::zero()),
            Err(MatrixError::divide_by_zero("3/2"))
        );
        assert_eq!(
            Rational::new(5, 0),
            Err(MatrixError::divide_by_zero("5"))
        );
        assert!(Rational::zero().recip().is_err());
    }

    #[test]
    fn test_rational_ordering() {
        assert!(q(1, 3) < q(1, 2));
        assert!(q(-1, 2) < q(-1, 3));
        assert_eq!(q(2, 4).cmp(&q(1, 2)), Ordering::Equal);
        assert_eq!(
            vec![q(3, 2), q(-7, 3), q(0, 1)].into_iter().max(),
            Some(q(3, 2))
        );
    }

    #[test]
    fn test_rational_from_str() {
        assert_eq!("7".parse::<Rational>().unwrap(), q(7, 1));
        assert_eq!(" -6/4 ".parse::<Rational>().unwrap(), q(-3, 2));
        assert_eq!(
            "abc".parse::<Rational>(),
            Err(MatrixError::InvalidNumber {
                token: "abc".into()
            })
        );
        assert!("1/".parse::<Rational>().is_err());
        assert!("".parse::<Rational>().is_err());
        assert_eq!(
            "1/0".parse::<Rational>(),
            Err(MatrixError::divide_by_zero("1"))
        );
    }

    #[test]
    fn test_rational_big_values() {
        let big = "100000000000000000000000000000000000000001".parse::<Rational>().unwrap();
        let third = q(1, 3);
        let x = &big * &third;
        assert_eq!(x.to_string(), "100000000000000000000000000000000000000001/3");
        assert_eq!(x * q(3, 1), big);
    }

    fn small() -> impl Strategy<Value = i64> {
        -1000i64..1000i64
    }

    fn non_zero() -> impl Strategy<Value = i64> {
        prop_oneof![(-1000i64..=-1i64), (1i64..=1000i64)]
    }

    proptest! {
        #[test]
        fn rational_add_commutative(a in small(), b in non_zero(), c in small(), d in non_zero()) {
            let x = q(a, b);
            let y = q(c, d);
            prop_assert_eq!(&x + &y, &y + &x);
        }

        #[test]
        fn rational_distributive(a in small(), b in non_zero(), c in small(), d in non_zero(), e in small()) {
            let x = q(a, b);
            let y = q(c, d);
            let z = Rational::from(e);
            prop_assert_eq!(&x * &(&y + &z), &(&x * &y) + &(&x * &z));
        }

        #[test]
        fn rational_div_inverts_mul(a in small(), b in non_zero(), c in non_zero(), d in non_zero()) {
            let x = q(a, b);
            let y = q(c, d);
            prop_assert_eq!((&x * &y).checked_div(&y).unwrap(), x);
        }

        #[test]
        fn rational_canonical_form(a in small(), b in non_zero()) {
            let x = q(a, b);
            prop_assert!(x.denom().is_positive());
            prop_assert!(x.numer().gcd(x.denom()).is_one());
            prop_assert_eq!(x.to_string().parse::<Rational>().unwrap(), x);
        }
    }
}
