use std::path::PathBuf;

use crate::Parameter;

/// Everything needed to render the build script of one profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildScript {
    /// Profile identifier, also used in the default image name
    pub tag: String,
    /// Parameters in the order the profile declares them
    pub parameters: Vec<Parameter>,
    /// YAML configuration embedded into the generated script
    pub config_file: PathBuf,
}

impl BuildScript {
    /// Parameters ordered for display: required ones first, then the rest.
    ///
    /// This is a stable two-bucket partition. Declaration order is kept
    /// inside each bucket and no other key is considered.
    pub fn sorted_parameters(&self) -> Vec<&Parameter> {
        let (required, optional): (Vec<&Parameter>, Vec<&Parameter>) =
            self.parameters.iter().partition(|p| p.required);
        required.into_iter().chain(optional).collect()
    }

    /// Validate every parameter and reject duplicate flags or variables.
    pub fn validate(&self) -> crate::Result<()> {
        let mut flags: Vec<&str> = Vec::new();
        let mut variables: Vec<&str> = Vec::new();

        for param in &self.parameters {
            param.validate()?;

            if variables.contains(&param.variable.as_str()) {
                return Err(crate::Error::InvalidParameter {
                    variable: param.variable.clone(),
                    reason: "variable declared twice",
                });
            }
            variables.push(&param.variable);

            for name in &param.names {
                if flags.contains(&name.as_str()) {
                    return Err(crate::Error::InvalidParameter {
                        variable: param.variable.clone(),
                        reason: "flag name already used by another parameter",
                    });
                }
                flags.push(name);
            }
        }
        Ok(())
    }
}
