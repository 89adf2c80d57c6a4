use std::io;
use thiserror::Error;

/// Errors reported by the model compiler, the engine invoker, and the session API.
///
/// Parse problems are deliberately missing from this list: a section that cannot be found
/// in the engine output simply produces an empty result.
#[derive(Debug, Error)]
pub enum CabeanError {
    /// The engine process finished with a non-zero exit code.
    #[error("command `{command}` returned non-zero exit status {}\n{stderr}", display_code(.code))]
    EngineFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
    /// The engine process could not be started at all.
    #[error("cannot execute `{command}`: {source}")]
    EngineUnavailable {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("i/o error while preparing engine input: {0}")]
    Io(#[from] io::Error),
    /// A state specification or perturbation references a node the network does not have.
    #[error("unknown node `{0}`")]
    UnknownNode(String),
    #[error("invalid state specification `{0}`")]
    InvalidState(String),
    #[error("invalid perturbation specification `{0}`")]
    InvalidPerturbation(String),
    /// A constant node reached the compiler without being fixed by the initial state.
    #[error("constant node `{0}` is not fixed by the initial state")]
    UnresolvedConstant(String),
    #[error("network cannot be translated: {0}")]
    UnsupportedNetwork(String),
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "<signal>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::CabeanError;

    #[test]
    fn engine_failure_reports_command_and_stderr() {
        let error = CabeanError::EngineFailed {
            command: "cabean -asynbn model.ispl".to_string(),
            code: Some(3),
            stderr: "syntax error".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("cabean -asynbn model.ispl"));
        assert!(message.contains("status 3"));
        assert!(message.ends_with("syntax error"));
    }
}
