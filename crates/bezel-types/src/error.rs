//! Error types for bezel.

/// Unified error type for all bezel operations.
#[derive(Debug, thiserror::Error)]
pub enum BezelError {
    /// Panel dimensions violate a geometry invariant (negative size, edge
    /// band wider than half the rectangle). Always a programmer error.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A render-target bind failed because the surface is mid-reset.
    /// Transient: callers drop the frame and retry via the dirty flag.
    #[error("surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// A GPU-backed object was used before its device resources were
    /// allocated.
    #[error("not initialized: {0}")]
    NotInitialized(&'static str),

    /// Failure reported by the graphics device backend.
    #[error("device error: {0}")]
    Gpu(String),

    /// Configuration file failed to parse.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Convenience alias used throughout the bezel crates.
pub type Result<T> = std::result::Result<T, BezelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats() {
        let e = BezelError::InvalidGeometry("width < 2 * edge".into());
        assert_eq!(e.to_string(), "invalid geometry: width < 2 * edge");

        let e = BezelError::SurfaceUnavailable("target 3".into());
        assert_eq!(e.to_string(), "surface unavailable: target 3");

        let e = BezelError::NotInitialized("nine-slice vertex buffer");
        assert_eq!(e.to_string(), "not initialized: nine-slice vertex buffer");

        let e = BezelError::Gpu("out of buffer handles".into());
        assert_eq!(e.to_string(), "device error: out of buffer handles");
    }

    #[test]
    fn toml_error_converts() {
        let parsed: std::result::Result<toml::Value, _> = toml::from_str("not [ valid");
        let err: BezelError = parsed.unwrap_err().into();
        assert!(err.to_string().starts_with("TOML parse error:"));
    }
}
