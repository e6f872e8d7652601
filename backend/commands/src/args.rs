/// Typed command arguments built from regex captures.
use crate::types::{Captures, CommandError};

pub trait CommandArgs: Sized {
    fn from_captures(captures: &Captures) -> Result<Self, CommandError>;
}

/// A user-facing id exactly as the operator typed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetArgs {
    pub raw: String,
}

impl TargetArgs {
    /// `None` when the digits do not fit a `u64`.
    pub fn numeric(&self) -> Option<u64> {
        self.raw.parse().ok()
    }
}

impl CommandArgs for TargetArgs {
    fn from_captures(captures: &Captures) -> Result<Self, CommandError> {
        Ok(Self { raw: captures.require(0)?.to_string() })
    }
}

/// `#id content`: the target and everything after it, verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendAtArgs {
    pub target: TargetArgs,
    pub content: String,
}

impl CommandArgs for SendAtArgs {
    fn from_captures(captures: &Captures) -> Result<Self, CommandError> {
        Ok(Self {
            target: TargetArgs::from_captures(captures)?,
            content: captures.require(1)?.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::compile_pattern;

    fn captures(pattern: &str, line: &str) -> Captures {
        let re = compile_pattern(pattern).unwrap();
        let caps = re.captures(line).unwrap();
        Captures::from_match(&re, &caps)
    }

    #[test]
    fn send_at_keeps_content_verbatim() {
        let args = SendAtArgs::from_captures(&captures(r"^#(\d+)(.*)", "#42 hello")).unwrap();
        assert_eq!(args.target.numeric(), Some(42));
        assert_eq!(args.content, " hello");
    }

    #[test]
    fn oversized_ids_are_not_numeric() {
        let args = TargetArgs::from_captures(&captures(r"-qn (\d+)", "-qn 99999999999999999999999")).unwrap();
        assert_eq!(args.numeric(), None);
        assert_eq!(args.raw, "99999999999999999999999");
    }

    #[test]
    fn target_needs_a_capture_group() {
        let err = TargetArgs::from_captures(&captures("-fr", "-fr")).unwrap_err();
        assert!(matches!(err, CommandError::MissingCapture { index: 0 }));
    }
}
