use crate::CabeanError;
use crate::engine::{BASE_OPTIONS, Engine, EngineConfig, EngineInvocation};
use log::{debug, info};
use std::io::Write;
use std::process::Command;
use tempfile::{Builder, NamedTempFile};

/// Runs the engine as an external process.
///
/// The compiled model and the excluded-perturbation list are written to private
/// temporary files which are removed once the process finishes (whatever the outcome),
/// unless [`EngineConfig::debug`] is set.
#[derive(Clone, Debug, Default)]
pub struct ProcessEngine {
    config: EngineConfig,
}

impl From<EngineConfig> for ProcessEngine {
    fn from(value: EngineConfig) -> Self {
        ProcessEngine::new(value)
    }
}

impl ProcessEngine {
    pub fn new(config: EngineConfig) -> ProcessEngine {
        ProcessEngine { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn keep(&self, file: NamedTempFile) -> Result<(), CabeanError> {
        let (_, path) = file.keep().map_err(|e| CabeanError::Io(e.error))?;
        info!("Engine input kept at `{}`.", path.display());
        Ok(())
    }
}

impl Engine for ProcessEngine {
    fn execute(&self, invocation: &EngineInvocation) -> Result<String, CabeanError> {
        let ispl_file = write_temporary(".ispl", &invocation.ispl)?;
        let excluded_file = invocation
            .excluded
            .as_deref()
            .map(|content| write_temporary("_rmPert.txt", content))
            .transpose()?;

        let mut command = Command::new(&self.config.executable);
        command
            .args(BASE_OPTIONS)
            .args(&self.config.extra_options)
            .args(&invocation.arguments);
        if let Some(file) = &excluded_file {
            command.arg("-rmPert").arg(file.path());
        }
        command.arg(ispl_file.path());

        let command_line = render_command(&command);
        info!("Running `{command_line}`.");
        let output = command
            .output()
            .map_err(|source| CabeanError::EngineUnavailable {
                command: command_line.clone(),
                source,
            })?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!("Engine produced {} bytes of output.", stdout.len());

        if self.config.debug {
            info!("Engine output:\n{stdout}");
            self.keep(ispl_file)?;
            if let Some(file) = excluded_file {
                self.keep(file)?;
            }
        }

        if !output.status.success() {
            return Err(CabeanError::EngineFailed {
                command: command_line,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
            });
        }
        Ok(stdout)
    }
}

fn write_temporary(suffix: &str, content: &str) -> Result<NamedTempFile, CabeanError> {
    let mut file = Builder::new().prefix("cabean").suffix(suffix).tempfile()?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    Ok(file)
}

fn render_command(command: &Command) -> String {
    let mut parts = vec![command.get_program().to_string_lossy().into_owned()];
    parts.extend(
        command
            .get_args()
            .map(|it| it.to_string_lossy().into_owned()),
    );
    parts.join(" ")
}
