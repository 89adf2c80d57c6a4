use crate::CabeanError;
use crate::model::BooleanModel;

/// Perturbations the engine must not use, written to the `-rmPert` file.
///
/// Specifications follow the `X+` / `X-` / `X` convention: `X+` forbids forcing `X` to
/// false (`R0`), `X-` forbids forcing it to true (`R1`), and a bare `X` forbids touching
/// it at all (`R`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExcludedPerturbations {
    never_false: Vec<String>,
    never_true: Vec<String>,
    untouched: Vec<String>,
}

impl ExcludedPerturbations {
    pub fn parse<S: AsRef<str>>(
        specs: &[S],
        model: &BooleanModel,
    ) -> Result<ExcludedPerturbations, CabeanError> {
        let mut result = ExcludedPerturbations::default();
        for spec in specs {
            let spec = spec.as_ref().trim();
            let (node, list) = if let Some(node) = spec.strip_suffix('+') {
                (node, &mut result.never_false)
            } else if let Some(node) = spec.strip_suffix('-') {
                (node, &mut result.never_true)
            } else {
                (spec, &mut result.untouched)
            };
            if node.is_empty() {
                return Err(CabeanError::InvalidPerturbation(spec.to_string()));
            }
            if !model.contains(node) {
                return Err(CabeanError::UnknownNode(node.to_string()));
            }
            list.push(node.to_string());
        }
        Ok(result)
    }

    pub fn is_empty(&self) -> bool {
        self.never_false.is_empty() && self.never_true.is_empty() && self.untouched.is_empty()
    }

    /// The file content expected by the engine.
    pub fn render(&self) -> String {
        format!(
            "R0: {}\nR1: {}\nR: {}\n",
            self.never_false.join(","),
            self.never_true.join(","),
            self.untouched.join(",")
        )
    }
}
