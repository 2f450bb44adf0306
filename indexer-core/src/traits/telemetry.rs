//! Write-only telemetry sink

/// Numeric key/value publication
///
/// Purely observational: nothing published here feeds back into control.
pub trait TelemetrySink {
    /// Publish one value under `key`
    fn publish(&mut self, key: &'static str, value: f32);
}

/// Sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTelemetry;

impl TelemetrySink for NullTelemetry {
    fn publish(&mut self, _key: &'static str, _value: f32) {}
}
