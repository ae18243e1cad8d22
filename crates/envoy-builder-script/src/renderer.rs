use envoy_builder_core::{BuildScript, ParamValue, Parameter};
use minijinja::{AutoEscape, Environment, UndefinedBehavior, Value};
use serde::Serialize;

/// Name the embedded template is registered under.
pub const TEMPLATE_NAME: &str = "build.sh";

const BUILD_SCRIPT_TEMPLATE: &str = include_str!("../templates/build.sh.j2");

/// Preferred heredoc delimiter around the embedded configuration.
const YAML_DELIMITER: &str = "ENVOY_YAML";

/// Renders a [`BuildScript`] into shell script text.
///
/// The template is parsed when the renderer is created, so a broken
/// template surfaces before any configuration file is touched.
pub struct ScriptRenderer<'source> {
    env: Environment<'source>,
    name: &'source str,
}

impl ScriptRenderer<'static> {
    /// Renderer backed by the embedded `build.sh` template.
    pub fn new() -> crate::Result<Self> {
        Self::with_template(TEMPLATE_NAME, BUILD_SCRIPT_TEMPLATE)
    }
}

impl<'source> ScriptRenderer<'source> {
    /// Renderer backed by a caller supplied template.
    ///
    /// # Errors
    ///
    /// [`Error::Template`](crate::Error::Template) if `source` does not parse.
    pub fn with_template(name: &'source str, source: &'source str) -> crate::Result<Self> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_keep_trailing_newline(true);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.add_filter("shell_quote", shell_quote);

        env.add_template(name, source)
            .map_err(|e| crate::Error::Template {
                name: name.to_owned(),
                source: e,
            })?;

        Ok(Self { env, name })
    }

    /// Read the profile's configuration file and render the script.
    ///
    /// # Errors
    ///
    /// - [`Error::ConfigRead`](crate::Error::ConfigRead) if the file cannot be read
    /// - [`Error::Render`](crate::Error::Render) if substitution fails
    pub fn render(&self, script: &BuildScript) -> crate::Result<String> {
        let path = &script.config_file;
        tracing::debug!(path = %path.display(), "loading config");
        let yaml = std::fs::read_to_string(path).map_err(|e| crate::Error::ConfigRead {
            path: path.clone(),
            source: e,
        })?;

        self.render_with_config(script, &yaml)
    }

    /// Render the script with configuration text that is already in memory.
    pub fn render_with_config(&self, script: &BuildScript, yaml: &str) -> crate::Result<String> {
        let render_err = |e| crate::Error::Render {
            name: self.name.to_owned(),
            source: e,
        };

        let context = ScriptContext {
            tag: &script.tag,
            parameters: script
                .sorted_parameters()
                .into_iter()
                .map(ParameterContext::from)
                .collect(),
            yaml_data: yaml,
            yaml_delimiter: heredoc_delimiter(yaml),
        };

        let output = self
            .env
            .get_template(self.name)
            .map_err(render_err)?
            .render(&context)
            .map_err(render_err)?;

        tracing::debug!(
            tag = %script.tag,
            parameters = context.parameters.len(),
            bytes = output.len(),
            "build script rendered"
        );

        Ok(output)
    }
}

/// Values the template can substitute.
#[derive(Serialize)]
struct ScriptContext<'a> {
    tag: &'a str,
    parameters: Vec<ParameterContext<'a>>,
    yaml_data: &'a str,
    /// Never equal to a line of `yaml_data`, so the heredoc cannot end early
    yaml_delimiter: String,
}

#[derive(Serialize)]
struct ParameterContext<'a> {
    names: &'a [String],
    names_formatted: String,
    placeholder: Option<&'a str>,
    description: &'a str,
    variable: &'a str,
    default_value: Option<&'a ParamValue>,
    fixed_value: Option<&'a ParamValue>,
    required: bool,
    runtime: bool,
}

impl<'a> From<&'a Parameter> for ParameterContext<'a> {
    fn from(p: &'a Parameter) -> Self {
        Self {
            names: &p.names,
            names_formatted: p.names_formatted(),
            placeholder: p.placeholder.as_deref(),
            description: &p.description,
            variable: &p.variable,
            default_value: p.default_value.as_ref(),
            fixed_value: p.fixed_value.as_ref(),
            required: p.required,
            runtime: p.runtime,
        }
    }
}

/// Heredoc delimiter that does not occur as a line of `text`.
///
/// Lines are compared after `str::lines` strips `\r`, which only ever
/// rejects more candidates than bash would.
fn heredoc_delimiter(text: &str) -> String {
    let taken = |candidate: &str| text.lines().any(|line| line == candidate);
    if !taken(YAML_DELIMITER) {
        return YAML_DELIMITER.to_owned();
    }
    let mut n = 1;
    loop {
        let candidate = format!("{YAML_DELIMITER}_{n}");
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Single-quote a value for POSIX shells.
fn shell_quote(value: &Value) -> String {
    format!("'{}'", value.to_string().replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn script(parameters: Vec<Parameter>) -> BuildScript {
        BuildScript {
            tag: "unit".to_owned(),
            parameters,
            config_file: PathBuf::from("unused.yaml"),
        }
    }

    #[test]
    fn heredoc_delimiter_avoids_config_lines() {
        assert_eq!(heredoc_delimiter(""), "ENVOY_YAML");
        assert_eq!(heredoc_delimiter("a: ENVOY_YAML\n"), "ENVOY_YAML");
        assert_eq!(heredoc_delimiter("a: 1\nENVOY_YAML\nb: 2\n"), "ENVOY_YAML_1");
        assert_eq!(
            heredoc_delimiter("ENVOY_YAML\nENVOY_YAML_1\r\nENVOY_YAML_2"),
            "ENVOY_YAML_3"
        );
    }

    #[test]
    fn shell_quote_wraps_and_escapes() {
        assert_eq!(shell_quote(&Value::from("plain")), "'plain'");
        assert_eq!(shell_quote(&Value::from(10000)), "'10000'");
        assert_eq!(shell_quote(&Value::from("it's")), r"'it'\''s'");
    }

    #[test]
    fn context_exposes_parameter_fields() {
        let renderer = ScriptRenderer::with_template(
            "fields.txt",
            "{% for p in parameters %}{{ p.names_formatted }};{{ p.placeholder }};\
             {{ p.variable }};{{ p.default_value if p.default_value is not none else \"-\" }};{{ p.required }};{{ p.runtime }}\n{% endfor %}",
        )
        .unwrap();
        let s = script(vec![
            Parameter::new(&["-d", "--descriptor"], "DESCRIPTOR", "gRPC descriptor file.")
                .placeholder("DESCRIPTOR")
                .default_value("descriptor.pb"),
            Parameter::new(&["--endpoint-address"], "ENDPOINT_ADDRESS", "Proxy forwarding address.")
                .placeholder("ENDPOINT_ADDRESS")
                .required()
                .runtime(),
        ]);

        let out = renderer.render_with_config(&s, "").unwrap();
        assert_eq!(
            out,
            "--endpoint-address;ENDPOINT_ADDRESS;ENDPOINT_ADDRESS;-;true;true\n\
             -d|--descriptor;DESCRIPTOR;DESCRIPTOR;descriptor.pb;false;false\n"
        );
    }

    #[test]
    fn absent_values_are_none_not_empty() {
        let renderer = ScriptRenderer::with_template(
            "absent.txt",
            "{% for p in parameters %}{{ p.default_value is none }}/{{ p.fixed_value is none }}{% endfor %}",
        )
        .unwrap();
        let s = script(vec![Parameter::new(&["--debug"], "DEBUG", "Debug.").fixed_value(1)]);
        assert_eq!(renderer.render_with_config(&s, "").unwrap(), "true/false");
    }

    #[test]
    fn undefined_variable_is_a_render_error() {
        let renderer = ScriptRenderer::with_template("strict.txt", "{{ no_such_value }}").unwrap();
        let err = renderer.render_with_config(&script(vec![]), "").unwrap_err();
        assert!(matches!(err, crate::Error::Render { .. }), "got: {err:?}");
    }

    #[test]
    fn yaml_is_never_escaped() {
        let renderer = ScriptRenderer::with_template("escape.json", "{{ yaml_data }}").unwrap();
        let yaml = "a: \"<b>&'\"\n";
        assert_eq!(renderer.render_with_config(&script(vec![]), yaml).unwrap(), yaml);
    }
}
