//! Registry of the build profiles the generator knows about.
//!
//! Each profile is a plain factory returning a fixed parameter list.
//! Adding a profile means writing a factory and registering its name in
//! [`PROFILES`].

use std::path::Path;

use crate::{BuildScript, Parameter};

/// Prefix of the default image name; the profile tag becomes the image tag.
pub const IMAGE_REPOSITORY: &str = "envoy-static-grpc";

type Factory = fn(&str, &Path) -> BuildScript;

/// Known profiles in registration order.
const PROFILES: &[(&str, Factory)] = &[
    ("local", local),
    ("simple-jwt", simple_jwt),
    ("simple-tls", simple_tls),
];

/// Names of all registered profiles.
pub fn names() -> impl Iterator<Item = &'static str> {
    PROFILES.iter().map(|(name, _)| *name)
}

/// Build the [`BuildScript`] registered under `tag`.
///
/// # Errors
///
/// - [`Error::UnknownProfile`](crate::Error::UnknownProfile) if no profile is
///   registered under `tag` (the empty string included)
/// - [`Error::InvalidParameter`](crate::Error::InvalidParameter) if the
///   profile definition breaks a parameter invariant
pub fn lookup(tag: &str, config_file: &Path) -> crate::Result<BuildScript> {
    let (_, factory) = PROFILES
        .iter()
        .find(|(name, _)| *name == tag)
        .ok_or_else(|| crate::Error::UnknownProfile {
            tag: tag.to_owned(),
            known: names().map(str::to_owned).collect(),
        })?;

    let script = factory(tag, config_file);
    script.validate()?;

    tracing::debug!(
        tag,
        parameters = script.parameters.len(),
        config = %script.config_file.display(),
        "profile selected"
    );

    Ok(script)
}

// ── Profiles ──

fn local(tag: &str, config_file: &Path) -> BuildScript {
    BuildScript {
        tag: tag.to_owned(),
        parameters: vec![
            image_name(tag),
            descriptor(),
            debug(),
            listener_port(10000),
            endpoint_port(8080),
        ],
        config_file: config_file.to_path_buf(),
    }
}

fn simple_jwt(tag: &str, config_file: &Path) -> BuildScript {
    BuildScript {
        tag: tag.to_owned(),
        parameters: vec![
            image_name(tag),
            descriptor(),
            debug(),
            listener_port(8080),
            endpoint_address(),
            endpoint_port(0),
        ],
        config_file: config_file.to_path_buf(),
    }
}

fn simple_tls(tag: &str, config_file: &Path) -> BuildScript {
    BuildScript {
        tag: tag.to_owned(),
        parameters: vec![
            image_name(tag),
            descriptor(),
            debug(),
            listener_port(8080),
            endpoint_address(),
            endpoint_port(0),
        ],
        config_file: config_file.to_path_buf(),
    }
}

// ── Shared parameters ──

fn image_name(tag: &str) -> Parameter {
    let p = Parameter::new(&["--image-name"], "IMAGE_NAME", "Name to use for image.")
        .placeholder("IMAGE_NAME");
    if tag.is_empty() {
        p
    } else {
        p.default_value(format!("{IMAGE_REPOSITORY}:{tag}"))
    }
}

fn descriptor() -> Parameter {
    Parameter::new(&["-d", "--descriptor"], "DESCRIPTOR", "gRPC descriptor file.")
        .placeholder("DESCRIPTOR")
        .default_value("descriptor.pb")
}

fn debug() -> Parameter {
    Parameter::new(
        &["--debug"],
        "DEBUG",
        "Activate debug mode. Debug mode keeps build artefacts.",
    )
    .fixed_value(1)
}

fn listener_port(port: u32) -> Parameter {
    let p = Parameter::new(&["--lp"], "LISTENER_PORT", "Default proxy listening port.")
        .placeholder("LISTENER_PORT")
        .runtime();
    if port > 0 { p.default_value(port) } else { p }
}

fn endpoint_address() -> Parameter {
    Parameter::new(
        &["--endpoint-address"],
        "ENDPOINT_ADDRESS",
        "Proxy forwarding address.",
    )
    .placeholder("ENDPOINT_ADDRESS")
    .required()
    .runtime()
}

fn endpoint_port(port: u32) -> Parameter {
    let p = Parameter::new(
        &["--endpoint-port"],
        "ENDPOINT_PORT",
        "Default proxy forwarding port.",
    )
    .placeholder("ENDPOINT_PORT")
    .runtime();
    if port > 0 { p.default_value(port) } else { p }
}
