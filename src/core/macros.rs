//! Macros for configuration types.

/// Implements [`ConfigValidator`](crate::core::config::ConfigValidator) from a list of
/// per-field checks.
///
/// Supported checks are `range(min, max)` (inclusive), `min(value)` and `positive()`.
///
/// # Usage
///
/// ```ignore
/// use wordline::core::config::ConfigValidator;
/// use wordline::impl_config_validator;
///
/// pub struct SmearConfig {
///     pub ratio: f32,
///     pub width: u32,
///     pub gap: f32,
/// }
///
/// impl_config_validator!(SmearConfig {
///     ratio: range(0.0, 1.0),
///     width: min(1),
///     gap: positive(),
/// });
///
/// let config = SmearConfig { ratio: 1.5, width: 10, gap: 0.1 };
/// assert!(config.validate().is_err());
/// ```
#[macro_export]
macro_rules! impl_config_validator {
    (@check $self:ident, $field:ident, range($min:expr, $max:expr)) => {
        $crate::core::validation::validate_range(
            $self.$field as f64,
            $min as f64,
            $max as f64,
            stringify!($field),
        )?;
    };
    (@check $self:ident, $field:ident, min($min:expr)) => {
        $crate::core::validation::validate_min($self.$field as f64, $min as f64, stringify!($field))?;
    };
    (@check $self:ident, $field:ident, positive()) => {
        $crate::core::validation::validate_positive($self.$field as f64, stringify!($field))?;
    };
    ($type:ty { $($field:ident : $check:ident ( $($arg:expr),* )),* $(,)? }) => {
        impl $crate::core::config::ConfigValidator for $type {
            fn validate(&self) -> Result<(), $crate::core::config::ConfigError> {
                $(
                    $crate::impl_config_validator!(@check self, $field, $check($($arg),*));
                )*
                Ok(())
            }
        }
    };
}
