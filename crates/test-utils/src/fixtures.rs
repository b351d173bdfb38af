//! Common test fixtures for parameter lookup tests.
//!
//! Pre-defined parameter sets and raw inputs covering the usual shapes of
//! graphic-store connection parameters.

use store_params::{
    CrsCode, ParameterDescriptor, ParameterSet, RawParameters, ValueKind,
};

/// Keys used by [`connection_parameters`].
pub mod keys {
    pub const USER: &str = "user";
    pub const PASSWORD: &str = "password";
    pub const PORT: &str = "port";
    pub const TIMEOUT: &str = "timeout";
    pub const CRS: &str = "crs";
    pub const BBOX: &str = "bbox";
    pub const READ_ONLY: &str = "read_only";
}

/// Descriptor for the username parameter.
pub fn user_param() -> ParameterDescriptor {
    ParameterDescriptor::new(keys::USER).with_description("Username for authentication")
}

/// Descriptor for the password parameter.
pub fn password_param() -> ParameterDescriptor {
    ParameterDescriptor::new(keys::PASSWORD).with_description("Password for authentication")
}

/// Required integer port.
pub fn port_param() -> ParameterDescriptor {
    ParameterDescriptor::of(keys::PORT, ValueKind::Integer).with_description("Server port")
}

/// Optional integer timeout in seconds.
pub fn timeout_param() -> ParameterDescriptor {
    ParameterDescriptor::of(keys::TIMEOUT, ValueKind::Integer)
        .with_description("Timeout in seconds")
        .optional()
}

/// A typical WMS-backed store connection: credentials, port and map defaults.
pub fn connection_parameters() -> ParameterSet {
    ParameterSet::builder()
        .name("wms-connection")
        .param(user_param())
        .param(password_param())
        .param(port_param().optional().with_sample(8080_i64))
        .param(
            ParameterDescriptor::of(keys::TIMEOUT, ValueKind::Duration)
                .with_description("Connection timeout")
                .optional(),
        )
        .param(
            ParameterDescriptor::of(keys::CRS, ValueKind::Crs)
                .with_description("Default CRS")
                .with_sample(CrsCode::Epsg4326)
                .optional(),
        )
        .param(
            ParameterDescriptor::of(keys::BBOX, ValueKind::BoundingBox)
                .with_description("Default extent")
                .optional(),
        )
        .param(ParameterDescriptor::of(keys::READ_ONLY, ValueKind::Boolean).optional())
        .build()
        .expect("connection fixture is a valid definition")
}

/// Raw text input built from `(key, value)` pairs.
pub fn raw(pairs: &[(&str, &str)]) -> RawParameters {
    RawParameters::from_pairs(pairs.iter().copied())
}

/// Raw input that satisfies every parameter of [`connection_parameters`].
pub fn full_connection_input() -> RawParameters {
    raw(&[
        (keys::USER, "gis"),
        (keys::PASSWORD, "s3cret"),
        (keys::PORT, "8080"),
        (keys::TIMEOUT, "30s"),
        (keys::CRS, "EPSG:3857"),
        (keys::BBOX, "-130,20,-60,55"),
        (keys::READ_ONLY, "true"),
    ])
}

/// Query strings as they arrive from connection URLs.
pub mod queries {
    /// Credentials plus a map extent.
    pub const CONNECTION: &str = "user=gis&password=s3cret&port=8080&crs=EPSG%3A4326&bbox=-130%2C20%2C-60%2C55";

    /// Port that is not a number.
    pub const BAD_PORT: &str = "user=gis&password=s3cret&port=http";
}

/// Parameter-set definition files understood by `param-check`.
pub mod definitions {
    /// A definition exercising text, integer and duration kinds.
    pub const CONNECTION_YAML: &str = r#"
name: wms-connection
parameters:
  - key: user
    type: text
    description: Username for authentication
  - key: password
    type: text
    description: Password for authentication
  - key: port
    type: integer
    required: false
    sample: "8080"
  - key: timeout
    type: duration
    required: false
"#;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_fixture_builds() {
        let set = connection_parameters();
        assert_eq!(set.len(), 7);
        assert_eq!(set.name(), Some("wms-connection"));
    }

    #[test]
    fn test_full_input_is_valid() {
        let report = connection_parameters().validate(&full_connection_input());
        assert!(report.is_valid(), "{:?}", report);
    }

    #[test]
    fn test_raw_helper() {
        let input = raw(&[("a", "1"), ("b", "")]);
        assert_eq!(input.len(), 2);
        assert!(input.contains_key("b"));
    }
}
