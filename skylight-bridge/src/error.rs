use std::path::PathBuf;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkyLightError {
    #[error("CGError::Success")]
    Success,
    #[error("CGError::Failure")]
    Failure,
    #[error("CGError::IllegalArgument")]
    IllegalArgument,
    #[error("CGError::InvalidConnection")]
    InvalidConnection,
    #[error("CGError::InvalidContext")]
    InvalidContext,
    #[error("CGError::CannotComplete")]
    CannotComplete,
    #[error("CGError::NotImplemented")]
    NotImplemented,
    #[error("CGError::RangeCheck")]
    RangeCheck,
    #[error("CGError::TypeCheck")]
    TypeCheck,
    #[error("CGError::InvalidOperation")]
    InvalidOperation,
    #[error("CGError::NoneAvailable")]
    NoneAvailable,
    #[error("CGError::Unknown {0}")]
    Unknown(i32),
}

impl SkyLightError {
    /// Zero is success, every other code is a failure
    pub fn check(code: impl Into<SkyLightError>) -> Result<(), SkyLightError> {
        match code.into() {
            SkyLightError::Success => Ok(()),
            error => Err(error),
        }
    }
}

impl From<i32> for SkyLightError {
    fn from(value: i32) -> Self {
        match value {
            0 => Self::Success,
            1000 => Self::Failure,
            1001 => Self::IllegalArgument,
            1002 => Self::InvalidConnection,
            1003 => Self::InvalidContext,
            1004 => Self::CannotComplete,
            1006 => Self::NotImplemented,
            1007 => Self::RangeCheck,
            1008 => Self::TypeCheck,
            1010 => Self::InvalidOperation,
            1011 => Self::NoneAvailable,
            error => Self::Unknown(error),
        }
    }
}

#[cfg(target_os = "macos")]
impl From<objc2_core_graphics::CGError> for SkyLightError {
    fn from(value: objc2_core_graphics::CGError) -> Self {
        Self::from(value.0)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("space descriptor is missing the '{0}' key")]
    MissingKey(&'static str),
    #[error("space descriptor key '{key}' is not {expected}")]
    WrongType {
        key: &'static str,
        expected: &'static str,
    },
    #[error("managed display spaces must only contain display dictionaries")]
    NotADisplay,
}

#[derive(thiserror::Error, Debug)]
pub enum DesktopImageError {
    #[error("{0} does not exist")]
    NotFound(PathBuf),
    #[error("{0} is not a regular file")]
    NotAFile(PathBuf),
    #[error("{path} does not have a supported image extension ({supported})")]
    UnsupportedFormat { path: PathBuf, supported: String },
    #[error("{0} cannot be expressed as a file URL")]
    InvalidUrl(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(SkyLightError::from(0), SkyLightError::Success);
        assert_eq!(SkyLightError::from(1000), SkyLightError::Failure);
        assert_eq!(SkyLightError::from(1002), SkyLightError::InvalidConnection);
        assert_eq!(SkyLightError::from(1006), SkyLightError::NotImplemented);
        assert_eq!(SkyLightError::from(1011), SkyLightError::NoneAvailable);

        for code in [1001, 1003, 1004, 1007, 1008, 1010] {
            assert!(!matches!(
                SkyLightError::from(code),
                SkyLightError::Unknown(_)
            ));
        }
    }

    #[test]
    fn test_unassigned_codes_are_unknown() {
        // 1005 and 1009 are not assigned in the CGError range
        assert_eq!(SkyLightError::from(1005), SkyLightError::Unknown(1005));
        assert_eq!(SkyLightError::from(-1), SkyLightError::Unknown(-1));
        assert_eq!(SkyLightError::from(1009).to_string(), "CGError::Unknown 1009");
    }

    #[test]
    fn test_check_only_accepts_zero() {
        assert!(SkyLightError::check(0).is_ok());
        assert_eq!(
            SkyLightError::check(1002),
            Err(SkyLightError::InvalidConnection)
        );
        assert_eq!(SkyLightError::check(42), Err(SkyLightError::Unknown(42)));
    }
}
