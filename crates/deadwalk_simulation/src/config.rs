//! Валидация tuning-конфигов (профили зомби, state configs, ragdoll)

use thiserror::Error;

/// Ошибка конфигурации
///
/// Единственный fallible API ядра: в steady-state всё остальное
/// выражается через no-op или fallback state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("{field}: range {min}..{max} is empty")]
    EmptyRange {
        field: &'static str,
        min: f32,
        max: f32,
    },

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
}

pub(crate) fn check_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if value.is_nan() || value < min || value > max {
        return Err(ConfigError::OutOfRange { field, value, min, max });
    }
    Ok(())
}

pub(crate) fn check_unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    check_range(field, value, 0.0, 1.0)
}

pub(crate) fn check_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_nan() || value <= 0.0 {
        return Err(ConfigError::NonPositive { field, value });
    }
    Ok(())
}

pub(crate) fn check_span(field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if min.is_nan() || max.is_nan() || min > max {
        return Err(ConfigError::EmptyRange { field, min, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_unit() {
        assert!(check_unit("sight", 0.5).is_ok());
        assert!(check_unit("sight", 1.0).is_ok());
        assert_eq!(
            check_unit("sight", 1.5),
            Err(ConfigError::OutOfRange { field: "sight", value: 1.5, min: 0.0, max: 1.0 })
        );
        assert!(check_unit("sight", f32::NAN).is_err());
    }

    #[test]
    fn test_check_positive_and_span() {
        assert!(check_positive("blend_time", 1.5).is_ok());
        assert!(check_positive("blend_time", 0.0).is_err());
        assert!(check_span("idle_time", 10.0, 60.0).is_ok());
        assert!(check_span("idle_time", 60.0, 10.0).is_err());
    }

    #[test]
    fn test_error_message() {
        let err = ConfigError::NonPositive { field: "wait", value: -1.0 };
        assert_eq!(err.to_string(), "wait must be positive, got -1");
    }
}
