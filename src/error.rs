use std::fmt::{Debug, Display};
use std::io::Error as IoError;
use std::path::PathBuf;

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError, UrlencodedError};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use derivative::Derivative;
use mongodb::error::Error as DatabaseError;
use reqwest::Error as HttpClientError;
use serde::{Serialize, Serializer};
use serde_json::Error as JsonError;

#[derive(Debug, Serialize, Derivative)]
#[derivative(PartialEq, Eq)]
#[serde(untagged)]
pub enum Error {
    // 400
    #[serde(serialize_with = "display")]
    InvalidJson(#[derivative(PartialEq = "ignore")] JsonPayloadError),
    #[serde(serialize_with = "display")]
    InvalidPath(#[derivative(PartialEq = "ignore")] PathError),
    #[serde(serialize_with = "display")]
    InvalidForm(#[derivative(PartialEq = "ignore")] UrlencodedError),
    #[serde(serialize_with = "display")]
    InvalidQuery(#[derivative(PartialEq = "ignore")] QueryPayloadError),
    RequiredFieldMissing {
        field: &'static str,
    },
    InvalidAmount {
        value: String,
    },
    InvalidFileName {
        file_name: String,
    },
    EmptyUpload,

    // 404
    PathNotFound,
    UploadNotFound {
        file_name: String,
    },

    // 500
    InvalidConfiguration {
        variable: &'static str,
        value: String,
    },
    FailedToReadDocument {
        path: PathBuf,
        #[serde(serialize_with = "display")]
        #[derivative(PartialEq = "ignore")]
        error: IoError,
    },
    FailedToWriteDocument {
        path: PathBuf,
        #[serde(serialize_with = "display")]
        #[derivative(PartialEq = "ignore")]
        error: IoError,
    },
    InvalidDocument {
        path: PathBuf,
        #[serde(serialize_with = "display")]
        #[derivative(PartialEq = "ignore")]
        error: JsonError,
    },
    #[serde(serialize_with = "display")]
    FailedToSerializeJson(#[derivative(PartialEq = "ignore")] JsonError),
    #[serde(serialize_with = "display")]
    FailedDatabaseCall(#[derivative(PartialEq = "ignore")] DatabaseError),
    #[serde(serialize_with = "display")]
    IoError(#[derivative(PartialEq = "ignore")] IoError),

    // 502
    #[serde(serialize_with = "display")]
    FailedToSendEmail(#[derivative(PartialEq = "ignore")] HttpClientError),
    EmailRejected {
        status: u16,
    },
}

impl Error {
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::InvalidJson(_) => "E4001000",
            Error::InvalidPath(_) => "E4001001",
            Error::InvalidForm(_) => "E4001002",
            Error::InvalidQuery(_) => "E4001003",
            Error::RequiredFieldMissing { .. } => "E4001004",
            Error::InvalidAmount { .. } => "E4001005",
            Error::InvalidFileName { .. } => "E4001006",
            Error::EmptyUpload => "E4001007",
            Error::PathNotFound => "E4041000",
            Error::UploadNotFound { .. } => "E4041001",
            Error::InvalidConfiguration { .. } => "E5001000",
            Error::FailedToReadDocument { .. } => "E5001001",
            Error::FailedToWriteDocument { .. } => "E5001002",
            Error::FailedToSerializeJson(_) => "E5001003",
            Error::InvalidDocument { .. } => "E5001006",
            Error::FailedDatabaseCall(_) => "E5001004",
            Error::IoError(_) => "E5001005",
            Error::FailedToSendEmail(_) => "E5021000",
            Error::EmailRejected { .. } => "E5021001",
        }
    }

    pub fn error_message(&self) -> &'static str {
        match self {
            Error::InvalidJson(_) => "The given json could not be parsed",
            Error::InvalidPath(_) => "The given path could not be parsed",
            Error::InvalidForm(_) => "The given form could not be parsed",
            Error::InvalidQuery(_) => "The given query could not be parsed",
            Error::RequiredFieldMissing { .. } => "A required field was not filled in",
            Error::InvalidAmount { .. } => "The sponsorship amount is not a valid number",
            Error::InvalidFileName { .. } => "The uploaded file name is not usable",
            Error::EmptyUpload => "The uploaded file is empty",
            Error::PathNotFound => "The requested path was not found",
            Error::UploadNotFound { .. } => "The requested upload was not found",
            Error::InvalidConfiguration { .. } => "The server configuration is invalid",
            Error::FailedToReadDocument { .. } => "The data could not be loaded",
            Error::FailedToWriteDocument { .. } => "The data could not be saved",
            Error::FailedToSerializeJson(_) => "The data could not be saved",
            Error::InvalidDocument { .. } => "The stored data does not have the expected shape",
            Error::FailedDatabaseCall(_) => {
                "An error occurred when communicating with the database"
            }
            Error::IoError(_) => "An error occurred during an I/O operation",
            Error::FailedToSendEmail(_) => "The email could not be sent",
            Error::EmailRejected { .. } => "The email provider rejected the email",
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidJson(_) => StatusCode::BAD_REQUEST,
            Error::InvalidPath(_) => StatusCode::BAD_REQUEST,
            Error::InvalidForm(_) => StatusCode::BAD_REQUEST,
            Error::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Error::RequiredFieldMissing { .. } => StatusCode::BAD_REQUEST,
            Error::InvalidAmount { .. } => StatusCode::BAD_REQUEST,
            Error::InvalidFileName { .. } => StatusCode::BAD_REQUEST,
            Error::EmptyUpload => StatusCode::BAD_REQUEST,
            Error::PathNotFound => StatusCode::NOT_FOUND,
            Error::UploadNotFound { .. } => StatusCode::NOT_FOUND,
            Error::InvalidConfiguration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::FailedToReadDocument { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::FailedToWriteDocument { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::FailedToSerializeJson(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::InvalidDocument { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::FailedDatabaseCall(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::FailedToSendEmail(_) => StatusCode::BAD_GATEWAY,
            Error::EmailRejected { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        #[derive(Serialize)]
        struct Dummy<'a> {
            success: bool,
            error: &'static str,
            error_code: &'static str,
            #[serde(skip_serializing_if = "Option::is_none")]
            error_meta: Option<&'a Error>,
        }

        let status = self.status_code();

        // server-side detail stays in the logs
        let error_meta = if status.is_client_error() {
            Some(self)
        } else {
            tracing::error!(error = %self, code = self.error_code(), "request failed");
            None
        };

        HttpResponse::build(status).json(&Dummy {
            success: false,
            error: self.error_message(),
            error_code: self.error_code(),
            error_meta,
        })
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        Debug::fmt(self, f)
    }
}

impl From<JsonError> for Error {
    fn from(error: JsonError) -> Error {
        Error::FailedToSerializeJson(error)
    }
}

impl From<DatabaseError> for Error {
    fn from(error: DatabaseError) -> Error {
        Error::FailedDatabaseCall(error)
    }
}

impl From<IoError> for Error {
    fn from(error: IoError) -> Error {
        Error::IoError(error)
    }
}

impl From<HttpClientError> for Error {
    fn from(error: HttpClientError) -> Error {
        Error::FailedToSendEmail(error)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidJson(err) => Some(err),
            Error::InvalidPath(err) => Some(err),
            Error::InvalidForm(err) => Some(err),
            Error::InvalidQuery(err) => Some(err),
            Error::FailedToReadDocument { error, .. } => Some(error),
            Error::FailedToWriteDocument { error, .. } => Some(error),
            Error::InvalidDocument { error, .. } => Some(error),
            Error::FailedToSerializeJson(err) => Some(err),
            Error::FailedDatabaseCall(err) => Some(err),
            Error::IoError(err) => Some(err),
            Error::FailedToSendEmail(err) => Some(err),
            _ => None,
        }
    }
}

fn display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    serializer.collect_str(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn validation_errors_expose_their_meta() {
        let error = Error::RequiredFieldMissing { field: "name" };
        let response = error.error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error_code"], "E4001004");
        assert_eq!(body["error_meta"]["field"], "name");
    }

    #[actix_web::test]
    async fn storage_errors_hide_their_detail() {
        let error = Error::FailedToWriteDocument {
            path: PathBuf::from("/secret/place/campaigns.json"),
            error: IoError::from(std::io::ErrorKind::PermissionDenied),
        };
        let response = error.error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "The data could not be saved");
        assert!(body.get("error_meta").is_none());
    }

    #[test]
    fn equality_ignores_foreign_payloads() {
        let a = Error::FailedToReadDocument {
            path: PathBuf::from("a.json"),
            error: IoError::from(std::io::ErrorKind::Other),
        };
        let b = Error::FailedToReadDocument {
            path: PathBuf::from("a.json"),
            error: IoError::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(a, b);
    }
}
