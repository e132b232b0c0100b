#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Validation {
        field: &'static str,
        transaction_id: String,
    },
    NotFound,
    Remote {
        status: Option<u16>,
    },
    Config,
}

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
}

impl Error {
    pub fn new<T: Into<String>>(kind: ErrorKind, message: T) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn new_parse<T: Into<String>>(message: T) -> Self {
        Self::new(ErrorKind::Parse, message)
    }

    pub fn new_validation<T: Into<String>>(field: &'static str, transaction_id: T) -> Self {
        let transaction_id = transaction_id.into();
        let message = format!("transaction {transaction_id}: field {field} is invalid");
        Self::new(
            ErrorKind::Validation {
                field,
                transaction_id,
            },
            message,
        )
    }

    pub fn new_not_found<T: Into<String>>(message: T) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn new_remote<T: Into<String>>(status: Option<u16>, message: T) -> Self {
        Self::new(ErrorKind::Remote { status }, message)
    }

    pub fn new_config<T: Into<String>>(message: T) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    /// Prefix the message with `context`, keeping the kind.
    pub fn context<T: std::fmt::Display>(mut self, context: T) -> Self {
        self.message = format!("{context}: {}", self.message);
        self
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.kind {
            ErrorKind::Parse => "parse error",
            ErrorKind::Validation { .. } => "validation error",
            ErrorKind::NotFound => "not found",
            ErrorKind::Remote { .. } => "remote error",
            ErrorKind::Config => "config error",
        };
        write!(f, "{kind}: {}", self.message)
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::new_parse(format!("not json format : {error}"))
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        let status = error.status().map(|status| status.as_u16());
        Error::new_remote(status, format!("http request failed : {error}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_keeps_kind() {
        let error = Error::new_not_found("no asset 7").context("account abc");
        assert_eq!(error.kind, ErrorKind::NotFound);
        assert_eq!(error.message, "account abc: no asset 7");
        assert_eq!(error.to_string(), "not found: account abc: no asset 7");
    }

    #[test]
    fn validation_carries_field_and_id() {
        let error = Error::new_validation("amount", "trx-1");
        assert_eq!(
            error.kind,
            ErrorKind::Validation {
                field: "amount",
                transaction_id: "trx-1".into()
            }
        );
        assert!(error.message.contains("trx-1"));
    }
}
