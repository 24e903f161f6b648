use std::{error::Error, fmt};

pub type GenericError = Box<dyn Error + Send + Sync + 'static>;

pub type PingResult<T> = std::result::Result<T, GenericError>;

/// Session-level failure: could not open the socket or the destination is
/// not a valid address. Per-packet conditions never surface here, they are
/// absorbed into the counters of the report.
#[derive(Debug)]
pub struct PingError {
    pub message: String,
    pub source: Option<GenericError>,
}

impl fmt::Display for PingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "PingError")?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

impl Error for PingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn Error + 'static))
    }
}

impl From<std::io::Error> for PingError {
    fn from(error: std::io::Error) -> PingError {
        PingError {
            message: error.to_string(),
            source: Some(Box::new(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;

    use super::*;

    #[test]
    fn fmt_without_message() {
        let ping_error = PingError {
            message: String::new(),
            source: None,
        };
        assert_eq!("PingError", format!("{ping_error}"));
    }

    #[test]
    fn fmt_with_message() {
        let ping_error = PingError {
            message: "testing std::fmt::Display".to_string(),
            source: None,
        };
        assert_eq!("PingError: testing std::fmt::Display", format!("{ping_error}"));
    }

    #[test]
    fn source_absent() {
        let ping_error = PingError {
            message: String::new(),
            source: None,
        };
        assert!(ping_error.source().is_none());
    }

    #[test]
    fn ping_error_from_std_io_error() {
        let std_io_error = std::io::Error::from(ErrorKind::PermissionDenied);
        let ping_error = PingError::from(std_io_error);
        assert!(ping_error.source().is_some());
        assert!(!ping_error.message.is_empty());
    }
}
