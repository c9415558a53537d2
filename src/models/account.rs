// file: src/models/account.rs
// description: followed account record extracted from the following page
// reference: internal data structures

use crate::utils::Validator;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const UNKNOWN_HANDLE: &str = "unknown_handle";
pub const AVATAR_EXTENSION: &str = "jpg";

/// One entry of the following list. Built by the parser, completed by the
/// avatar downloader and read by the exporters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowedAccount {
    pub display_name: Option<String>,
    pub user_handle: Option<String>,
    pub avatar_url: Option<String>,
    pub local_avatar_path: Option<PathBuf>,
}

impl FollowedAccount {
    pub fn new(
        display_name: Option<String>,
        user_handle: Option<String>,
        avatar_url: Option<String>,
    ) -> Self {
        Self {
            display_name,
            user_handle,
            avatar_url,
            local_avatar_path: None,
        }
    }

    pub fn handle_or_unknown(&self) -> &str {
        self.user_handle.as_deref().unwrap_or(UNKNOWN_HANDLE)
    }

    /// File name for the downloaded avatar, derived from the handle.
    pub fn avatar_file_name(&self) -> String {
        let safe = Validator::sanitize_file_name(self.handle_or_unknown());
        format!("{}.{}", safe, AVATAR_EXTENSION)
    }

    pub fn is_identifiable(&self) -> bool {
        let present = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.is_empty());
        present(&self.display_name) || present(&self.user_handle)
    }

    pub fn set_local_avatar(&mut self, path: Option<PathBuf>) {
        self.local_avatar_path = path;
    }

    pub fn has_local_avatar(&self) -> bool {
        self.local_avatar_path.is_some()
    }
}
