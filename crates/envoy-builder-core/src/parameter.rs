//! Flag definitions exposed by a generated build script.

use std::fmt;

use serde::Serialize;

/// A default or fixed value carried by a [`Parameter`].
///
/// Presence is modeled with `Option<ParamValue>` on the parameter, so a
/// default of `0` or `""` is never confused with "no default".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Text(String),
    Number(u32),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Number(value)
    }
}

/// One configurable value of a generated build script.
///
/// # Examples
///
/// ```
/// use envoy_builder_core::Parameter;
///
/// let port = Parameter::new(&["--lp"], "LISTENER_PORT", "Default proxy listening port.")
///     .placeholder("LISTENER_PORT")
///     .default_value(10000)
///     .runtime();
///
/// assert_eq!(port.names_formatted(), "--lp");
/// assert_eq!(port.default_value.unwrap().to_string(), "10000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Flag spellings, short form first (e.g. `-d`, `--descriptor`)
    pub names: Vec<String>,
    /// Token replaced in the YAML configuration as `@TOKEN@`
    pub placeholder: Option<String>,
    /// Help text shown by the generated script's `--help`
    pub description: String,
    /// Shell variable the generated script assigns
    pub variable: String,
    pub default_value: Option<ParamValue>,
    /// When set, the flag is a switch that assigns this value and takes no argument
    pub fixed_value: Option<ParamValue>,
    /// The generated script refuses to run without a value
    pub required: bool,
    /// The value is also applied to the Envoy configuration at container start
    pub runtime: bool,
}

impl Parameter {
    pub fn new(names: &[&str], variable: &str, description: &str) -> Self {
        Self {
            names: names.iter().map(|n| (*n).to_owned()).collect(),
            placeholder: None,
            description: description.to_owned(),
            variable: variable.to_owned(),
            default_value: None,
            fixed_value: None,
            required: false,
            runtime: false,
        }
    }

    pub fn placeholder(mut self, token: &str) -> Self {
        self.placeholder = Some(token.to_owned());
        self
    }

    pub fn default_value(mut self, value: impl Into<ParamValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn fixed_value(mut self, value: impl Into<ParamValue>) -> Self {
        self.fixed_value = Some(value.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn runtime(mut self) -> Self {
        self.runtime = true;
        self
    }

    /// Whether the flag toggles a fixed value instead of taking an argument.
    pub fn is_switch(&self) -> bool {
        self.fixed_value.is_some()
    }

    /// Flag spellings joined for a shell `case` pattern, e.g. `-d|--descriptor`.
    pub fn names_formatted(&self) -> String {
        self.names.join("|")
    }

    /// Check the invariants every hand-written profile must uphold.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`](crate::Error::InvalidParameter) naming the
    /// first violated rule.
    pub fn validate(&self) -> crate::Result<()> {
        let fail = |reason| {
            Err(crate::Error::InvalidParameter {
                variable: self.variable.clone(),
                reason,
            })
        };

        if !is_shell_identifier(&self.variable) {
            return fail("variable must be an uppercase shell identifier");
        }
        if self.names.is_empty() {
            return fail("at least one flag name is required");
        }
        if self
            .names
            .iter()
            .any(|n| !n.starts_with('-') || n.len() < 2 || n.contains(char::is_whitespace))
        {
            return fail("flag names must start with '-' and contain no whitespace");
        }
        if self
            .placeholder
            .as_deref()
            .is_some_and(|p| !is_shell_identifier(p))
        {
            return fail("placeholder must be an uppercase token");
        }
        if self.required && self.default_value.is_some() {
            return fail("a required parameter cannot have a default value");
        }
        if self.required && self.fixed_value.is_some() {
            return fail("a switch cannot be required");
        }
        if self.default_value.is_some() && self.fixed_value.is_some() {
            return fail("a switch cannot also have a default value");
        }
        Ok(())
    }
}

fn is_shell_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase() || c == '_')
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
