//! Transport failure union and its classification taxonomy.

use std::fmt;

const MSG_BAD_REQUEST: &str = "请求参数错误";
const MSG_UNAUTHORIZED: &str = "登录已过期，请重新登录";
const MSG_FORBIDDEN: &str = "没有权限访问该资源";
const MSG_NOT_FOUND: &str = "请求的资源不存在";
const MSG_SERVER_ERROR: &str = "服务器内部错误";
const MSG_NETWORK_UNREACHABLE: &str = "服务器无响应，请检查网络连接";
const MSG_CONFIG_PREFIX: &str = "请求错误: ";

/// A failed call, tagged by how far it got.
///
/// The three tags are distinct at the transport boundary and must not be
/// collapsed: a response arrived with an error status, the request went out
/// but nothing came back, or the request never made it onto the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// A response was received with a non-success status.
    Status { status: u16, body: String },
    /// The request was sent but no response arrived (network, timeout).
    Network { message: String },
    /// The request could not be constructed or sent.
    Request { message: String },
}

/// Classification of a [`Failure`]. Exactly one kind applies per failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    ServerError,
    /// Response status outside the classified set. Carries no message and
    /// triggers no notification.
    Unclassified,
    NetworkUnreachable,
    ConfigError,
}

/// Status classification table. Adding a classified status is a data change
/// here, not a control-flow change.
const STATUS_KINDS: &[(u16, ErrorKind)] = &[
    (400, ErrorKind::BadRequest),
    (401, ErrorKind::Unauthorized),
    (403, ErrorKind::Forbidden),
    (404, ErrorKind::NotFound),
    (500, ErrorKind::ServerError),
];

/// Maps a status code to its kind; anything off the table is
/// [`ErrorKind::Unclassified`].
pub fn classify_status(status: u16) -> ErrorKind {
    STATUS_KINDS
        .iter()
        .find(|(code, _)| *code == status)
        .map(|(_, kind)| *kind)
        .unwrap_or(ErrorKind::Unclassified)
}

impl ErrorKind {
    /// Whether this kind tears down the session.
    pub fn invalidates_session(self) -> bool {
        self == ErrorKind::Unauthorized
    }
}

impl Failure {
    /// Total mapping from failure to classification kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Failure::Status { status, .. } => classify_status(*status),
            Failure::Network { .. } => ErrorKind::NetworkUnreachable,
            Failure::Request { .. } => ErrorKind::ConfigError,
        }
    }

    /// The fixed user-facing message for this failure, if its kind has one.
    /// Unclassified statuses have none.
    pub fn user_message(&self) -> Option<String> {
        match self {
            Failure::Status { status, .. } => match classify_status(*status) {
                ErrorKind::BadRequest => Some(MSG_BAD_REQUEST.to_string()),
                ErrorKind::Unauthorized => Some(MSG_UNAUTHORIZED.to_string()),
                ErrorKind::Forbidden => Some(MSG_FORBIDDEN.to_string()),
                ErrorKind::NotFound => Some(MSG_NOT_FOUND.to_string()),
                ErrorKind::ServerError => Some(MSG_SERVER_ERROR.to_string()),
                _ => None,
            },
            Failure::Network { .. } => Some(MSG_NETWORK_UNREACHABLE.to_string()),
            Failure::Request { message } => Some(format!("{}{}", MSG_CONFIG_PREFIX, message)),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Status { status, .. } => {
                write!(f, "Server responded with HTTP {}", status)
            }
            Failure::Network { message } => {
                write!(f, "No response from server: {}", message)
            }
            Failure::Request { message } => {
                write!(f, "Request could not be sent: {}", message)
            }
        }
    }
}

impl std::error::Error for Failure {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status_table() {
        assert_eq!(classify_status(400), ErrorKind::BadRequest);
        assert_eq!(classify_status(401), ErrorKind::Unauthorized);
        assert_eq!(classify_status(403), ErrorKind::Forbidden);
        assert_eq!(classify_status(404), ErrorKind::NotFound);
        assert_eq!(classify_status(500), ErrorKind::ServerError);
    }

    #[test]
    fn test_classify_status_off_table_is_unclassified() {
        assert_eq!(classify_status(418), ErrorKind::Unclassified);
        assert_eq!(classify_status(502), ErrorKind::Unclassified);
        assert_eq!(classify_status(200), ErrorKind::Unclassified);
    }

    #[test]
    fn test_failure_kind_mapping() {
        let status = Failure::Status {
            status: 401,
            body: String::new(),
        };
        assert_eq!(status.kind(), ErrorKind::Unauthorized);

        let network = Failure::Network {
            message: "connection refused".to_string(),
        };
        assert_eq!(network.kind(), ErrorKind::NetworkUnreachable);

        let request = Failure::Request {
            message: "Invalid URL".to_string(),
        };
        assert_eq!(request.kind(), ErrorKind::ConfigError);
    }

    #[test]
    fn test_user_messages_are_fixed() {
        let cases = [
            (400, "请求参数错误"),
            (401, "登录已过期，请重新登录"),
            (403, "没有权限访问该资源"),
            (404, "请求的资源不存在"),
            (500, "服务器内部错误"),
        ];
        for (status, expected) in cases {
            let failure = Failure::Status {
                status,
                body: String::new(),
            };
            assert_eq!(failure.user_message().as_deref(), Some(expected));
        }
    }

    #[test]
    fn test_unclassified_status_has_no_message() {
        let failure = Failure::Status {
            status: 418,
            body: String::new(),
        };
        assert_eq!(failure.user_message(), None);
    }

    #[test]
    fn test_network_failure_message() {
        let failure = Failure::Network {
            message: "timed out".to_string(),
        };
        assert_eq!(
            failure.user_message().as_deref(),
            Some("服务器无响应，请检查网络连接")
        );
    }

    #[test]
    fn test_config_failure_message_includes_cause() {
        let failure = Failure::Request {
            message: "Invalid URL".to_string(),
        };
        assert_eq!(
            failure.user_message().as_deref(),
            Some("请求错误: Invalid URL")
        );
    }

    #[test]
    fn test_only_unauthorized_invalidates_session() {
        assert!(ErrorKind::Unauthorized.invalidates_session());
        for kind in [
            ErrorKind::BadRequest,
            ErrorKind::Forbidden,
            ErrorKind::NotFound,
            ErrorKind::ServerError,
            ErrorKind::Unclassified,
            ErrorKind::NetworkUnreachable,
            ErrorKind::ConfigError,
        ] {
            assert!(!kind.invalidates_session());
        }
    }

    #[test]
    fn test_failure_display() {
        let failure = Failure::Status {
            status: 404,
            body: "missing".to_string(),
        };
        assert!(failure.to_string().contains("HTTP 404"));

        let failure = Failure::Network {
            message: "connection refused".to_string(),
        };
        assert!(failure.to_string().contains("connection refused"));

        let failure = Failure::Request {
            message: "bad header".to_string(),
        };
        assert!(failure.to_string().contains("bad header"));
    }
}
