use serde::{Deserialize, Serialize};

/// Protocol the client connected through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interface {
    #[default]
    Native,
    Http,
    Other,
}

/// Only meaningful when the interface is [`Interface::Http`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Unknown,
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub interface: Interface,
    pub http_method: HttpMethod,
    pub user: String,
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self::native("default")
    }
}

impl ClientInfo {
    pub fn native(user: impl Into<String>) -> Self {
        Self {
            interface: Interface::Native,
            http_method: HttpMethod::Unknown,
            user: user.into(),
        }
    }

    pub fn http(method: HttpMethod, user: impl Into<String>) -> Self {
        Self {
            interface: Interface::Http,
            http_method: method,
            user: user.into(),
        }
    }

    pub fn is_http_get(&self) -> bool {
        self.interface == Interface::Http && self.http_method == HttpMethod::Get
    }
}
