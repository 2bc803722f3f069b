use rust_decimal::Decimal;
use std::str::FromStr;

/// Trait for converting user-entered numbers into `Decimal` amounts.
///
/// Lets asset constructors take `i32`, `f64`, `&str`, etc. directly instead of
/// wrapping them in `dec!()` or `Decimal::from()`.
///
/// Conversion never fails: values that cannot be represented (NaN, infinity,
/// unparsable strings) become zero, matching the engine's treatment of missing
/// numbers.
pub trait IntoAmount {
    fn into_amount(self) -> Decimal;
}

impl IntoAmount for Decimal {
    fn into_amount(self) -> Decimal {
        self
    }
}

impl IntoAmount for &Decimal {
    fn into_amount(self) -> Decimal {
        *self
    }
}

macro_rules! impl_into_amount_int {
    ($($t:ty),*) => {
        $(
            impl IntoAmount for $t {
                fn into_amount(self) -> Decimal {
                    Decimal::from(self)
                }
            }
        )*
    };
}

impl_into_amount_int!(i32, u32, i64, u64, isize, usize);

macro_rules! impl_into_amount_float {
    ($($t:ty),*) => {
        $(
            impl IntoAmount for $t {
                fn into_amount(self) -> Decimal {
                    // Display gives the shortest round-trip form, so 0.033 stays 0.033.
                    parse_amount(&self.to_string()).unwrap_or_else(|| {
                        tracing::warn!(value = %self, "non-finite amount treated as zero");
                        Decimal::ZERO
                    })
                }
            }
        )*
    };
}

impl_into_amount_float!(f32, f64);

impl IntoAmount for &str {
    fn into_amount(self) -> Decimal {
        parse_amount(self).unwrap_or_else(|| {
            tracing::warn!(value = %self, "unparsable amount treated as zero");
            Decimal::ZERO
        })
    }
}

impl IntoAmount for String {
    fn into_amount(self) -> Decimal {
        self.as_str().into_amount()
    }
}

impl<T: IntoAmount> IntoAmount for Option<T> {
    fn into_amount(self) -> Decimal {
        self.map(IntoAmount::into_amount).unwrap_or(Decimal::ZERO)
    }
}

/// Parses plain or scientific notation (`"1e3"`), trimming whitespace.
pub(crate) fn parse_amount(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_float_keeps_short_form() {
        assert_eq!(0.033_f64.into_amount(), dec!(0.033));
        assert_eq!(10.5_f64.into_amount(), dec!(10.5));
    }

    #[test]
    fn test_degenerate_inputs_become_zero() {
        assert_eq!(f64::NAN.into_amount(), Decimal::ZERO);
        assert_eq!(f64::INFINITY.into_amount(), Decimal::ZERO);
        assert_eq!("abc".into_amount(), Decimal::ZERO);
        assert_eq!(None::<i32>.into_amount(), Decimal::ZERO);
    }

    #[test]
    fn test_strings_and_scientific() {
        assert_eq!(" 950 ".into_amount(), dec!(950));
        assert_eq!("1e3".into_amount(), dec!(1000));
    }
}
