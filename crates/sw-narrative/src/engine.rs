//! The fixed surface the bridge drives a story engine through.
//!
//! A compiled story is opaque: the bridge only continues it line by line,
//! reads and picks choices, and reads or writes its variables. Anything that
//! implements [`StoryEngine`] can be played.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::NarrativeResult;

/// A value in a story's variable bag or passed to an external function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum StoryValue {
    /// Unset.
    #[default]
    Null,
    /// A flag.
    Bool(bool),
    /// A whole number.
    Int(i64),
    /// A fractional number.
    Float(f64),
    /// Text.
    Str(String),
}

impl StoryValue {
    /// Integer view; floats are rounded, numeric strings parsed.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Float(v) => Some(v.round() as i64),
            Self::Bool(b) => Some(i64::from(*b)),
            Self::Str(s) => s.trim().parse().ok(),
            Self::Null => None,
        }
    }

    /// String view; other variants are `None`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Truthiness as story conditions see it.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Int(v) => *v != 0,
            Self::Float(v) => *v != 0.0,
            Self::Str(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for StoryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for StoryValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for StoryValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for StoryValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

/// A choice the story is currently offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryChoice {
    /// Position passed to `choose`.
    pub index: usize,
    /// Label shown to the player.
    pub text: String,
}

/// Functions a story may call out to while it runs.
pub trait StoryHost {
    /// Evaluate an external function. Unknown names should return
    /// [`StoryValue::Null`] rather than fail.
    fn call(&mut self, name: &str, args: &[StoryValue]) -> StoryValue;
}

/// A host with no external functions.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHost;

impl StoryHost for NoHost {
    fn call(&mut self, name: &str, _args: &[StoryValue]) -> StoryValue {
        tracing::warn!(function = name, "story called an external function with no host");
        StoryValue::Null
    }
}

/// The five operations the bridge needs from a story engine.
pub trait StoryEngine {
    /// The next line of text, or `None` once the story is waiting on a
    /// choice or has ended.
    fn continue_line(&mut self, host: &mut dyn StoryHost) -> NarrativeResult<Option<String>>;

    /// Choices on offer. Empty when the story has ended.
    fn choices(&self) -> Vec<StoryChoice>;

    /// Pick a choice by index.
    fn choose(&mut self, index: usize) -> NarrativeResult<()>;

    /// Read a variable.
    fn variable(&self, name: &str) -> Option<StoryValue>;

    /// Write a variable.
    fn set_variable(&mut self, name: &str, value: StoryValue);
}

/// Produces a running story for a story id, positioned at a knot.
pub trait StoryLoader {
    /// Load `story_id`, starting at `knot` (or the story's default entry).
    fn load(&self, story_id: &str, knot: Option<&str>) -> NarrativeResult<Box<dyn StoryEngine>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_deserialize_untagged() {
        let values: Vec<StoryValue> = serde_json::from_str(r#"[null, true, 3, 2.5, "hi"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                StoryValue::Null,
                StoryValue::Bool(true),
                StoryValue::Int(3),
                StoryValue::Float(2.5),
                StoryValue::Str("hi".into()),
            ]
        );
    }

    #[test]
    fn numeric_views() {
        assert_eq!(StoryValue::Float(2.6).as_i64(), Some(3));
        assert_eq!(StoryValue::Str(" -4 ".into()).as_i64(), Some(-4));
        assert_eq!(StoryValue::Null.as_i64(), None);
        assert!(!StoryValue::Str(String::new()).is_truthy());
        assert!(StoryValue::Int(1).is_truthy());
    }
}
