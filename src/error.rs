use thiserror::Error;

/// Operation-level failures. Validation problems are detected before any
/// network or storage side effect and carry fixed messages; everything
/// else is an integration failure from a platform service or the
/// external assembler. Nothing is retried.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{message}")]
    Integration {
        status: Option<u16>,
        message: String,
    },
}

impl ServiceError {
    pub fn integration(message: impl Into<String>) -> Self {
        ServiceError::Integration {
            status: None,
            message: message.into(),
        }
    }
}

impl From<kbase::Error> for ServiceError {
    fn from(err: kbase::Error) -> Self {
        let status = match &err {
            kbase::Error::Http { status } => Some(*status),
            _ => None,
        };
        ServiceError::Integration {
            status,
            message: err.to_string(),
        }
    }
}
