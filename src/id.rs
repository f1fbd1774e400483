//! Typed identifiers
//!
//! Every entity in the control plane is addressed by an opaque string id.
//! Each id kind gets its own newtype so a window id can never be passed
//! where a webview id is expected.

use serde::{Deserialize, Serialize};

macro_rules! opaque_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw id string
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The raw id string
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

opaque_id! {
    /// Identifies a live webview
    WebviewId
}

opaque_id! {
    /// Identifies a host window a webview can attach to
    WindowId
}

opaque_id! {
    /// Identifies a browsing session / storage partition
    WebsessionId
}

opaque_id! {
    /// Identifies the extension that owns a webview
    ExtensionId
}

opaque_id! {
    /// Key returned by `insert_css`, used to remove the inserted stylesheet
    CssKey
}

/// Identifies a registered event listener within one event channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);
