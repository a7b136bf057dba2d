//! Command: an opaque instruction queued for a plant device.
//!
//! The backend never interprets commands; it only preserves their order.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single instruction for a device, e.g. `WATER_NOW`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Command(String);

impl Command {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Command {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Command {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_serialize_list_as_array_of_strings() {
        let cmds = vec![Command::from("WATER_NOW"), Command::from("PHOTO")];
        let json = serde_json::to_string(&cmds).unwrap();
        assert_eq!(json, r#"["WATER_NOW","PHOTO"]"#);
    }

    #[test]
    fn should_serialize_empty_list_as_empty_array() {
        let cmds: Vec<Command> = Vec::new();
        assert_eq!(serde_json::to_string(&cmds).unwrap(), "[]");
    }
}
