use std::fmt::{Display, Formatter};

/// Raw engine output split into lines. Carries no semantics of its own.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutputLines {
    lines: Vec<String>,
}

impl From<&str> for OutputLines {
    fn from(value: &str) -> Self {
        OutputLines {
            lines: value.lines().map(|it| it.to_string()).collect(),
        }
    }
}

impl OutputLines {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn raw(&self) -> &[String] {
        &self.lines
    }

    /// Lines with leading and trailing whitespace removed. Blank lines are kept
    /// (as empty strings), because several grammars use them as terminators.
    pub fn trimmed(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|it| it.trim())
    }
}

impl Display for OutputLines {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lines.join("\n"))
    }
}
