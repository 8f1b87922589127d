use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// No finite geometry was found, even after the per-primitive fallback.
    #[error("could not compute a valid bounding box: geometry is empty or malformed")]
    DegenerateGeometry,

    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}
