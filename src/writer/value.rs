//! Value Formatting
//!
//! How primitive values are spelled in attributes and tag data. Booleans
//! read `yes`/`no` in attributes and `true`/`false` in tag data; floating
//! point tag data drops a trailing `.0`.

use std::borrow::Cow;

/// A value the writer can emit as an attribute or as tag data
pub trait MarkupValue {
    /// Spelling inside an attribute value
    fn attribute_text(&self) -> Cow<'_, str>;

    /// Spelling between a start and end tag
    fn data_text(&self) -> Cow<'_, str> {
        self.attribute_text()
    }
}

/// Numeric values the `_not_zero`/`_not_one` writer variants can test
pub trait NumericValue {
    fn is_zero(&self) -> bool;
    fn is_one(&self) -> bool;
}

impl MarkupValue for bool {
    fn attribute_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(if *self { "yes" } else { "no" })
    }

    fn data_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(if *self { "true" } else { "false" })
    }
}

impl MarkupValue for str {
    fn attribute_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl MarkupValue for String {
    fn attribute_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl<T: MarkupValue + ?Sized> MarkupValue for &T {
    fn attribute_text(&self) -> Cow<'_, str> {
        (**self).attribute_text()
    }

    fn data_text(&self) -> Cow<'_, str> {
        (**self).data_text()
    }
}

macro_rules! integer_value {
    ($($ty:ty),*) => {$(
        impl MarkupValue for $ty {
            fn attribute_text(&self) -> Cow<'_, str> {
                Cow::Owned(itoa::Buffer::new().format(*self).to_string())
            }
        }

        impl NumericValue for $ty {
            #[inline]
            fn is_zero(&self) -> bool {
                *self == 0
            }

            #[inline]
            fn is_one(&self) -> bool {
                *self == 1
            }
        }
    )*};
}

macro_rules! float_value {
    ($($ty:ty),*) => {$(
        impl MarkupValue for $ty {
            fn attribute_text(&self) -> Cow<'_, str> {
                Cow::Owned(ryu::Buffer::new().format(*self).to_string())
            }

            fn data_text(&self) -> Cow<'_, str> {
                let mut buffer = ryu::Buffer::new();
                let text = buffer.format(*self);
                Cow::Owned(text.strip_suffix(".0").unwrap_or(text).to_string())
            }
        }

        impl NumericValue for $ty {
            #[inline]
            fn is_zero(&self) -> bool {
                *self == 0.0
            }

            #[inline]
            fn is_one(&self) -> bool {
                *self == 1.0
            }
        }
    )*};
}

integer_value!(i32, i64, u32, u64, usize);
float_value!(f32, f64);

impl<T: NumericValue + ?Sized> NumericValue for &T {
    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }

    fn is_one(&self) -> bool {
        (**self).is_one()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_spelling() {
        assert_eq!(true.attribute_text(), "yes");
        assert_eq!(false.attribute_text(), "no");
        assert_eq!(true.data_text(), "true");
        assert_eq!(false.data_text(), "false");
    }

    #[test]
    fn test_integer_spelling() {
        assert_eq!(42i32.attribute_text(), "42");
        assert_eq!((-7i64).data_text(), "-7");
        assert_eq!(u64::MAX.attribute_text(), "18446744073709551615");
    }

    #[test]
    fn test_float_spelling() {
        assert_eq!(1.0f64.attribute_text(), "1.0");
        assert_eq!(1.0f64.data_text(), "1");
        assert_eq!(2.5f64.data_text(), "2.5");
        assert_eq!(0.1f32.attribute_text(), "0.1");
        assert_eq!((-3.0f32).data_text(), "-3");
    }

    #[test]
    fn test_strings_borrow() {
        assert!(matches!("abc".attribute_text(), Cow::Borrowed("abc")));
        let owned = String::from("def");
        assert_eq!((&owned).data_text(), "def");
    }

    #[test]
    fn test_numeric_checks() {
        assert!(0i32.is_zero());
        assert!(!0i32.is_one());
        assert!(1u64.is_one());
        assert!(0.0f64.is_zero());
        assert!((-0.0f64).is_zero());
        assert!(1.0f32.is_one());
        assert!(!1.5f64.is_one());
    }
}
