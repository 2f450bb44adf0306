//! Operating modes

/// Scoring target selected by the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Target {
    Amp,
    Speaker,
}

/// Per-tick input from the command layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeRequest {
    /// Selected target, if any
    pub target: Option<Target>,
    /// Source-load override
    pub source: bool,
}

impl ModeRequest {
    pub const fn idle() -> Self {
        Self {
            target: None,
            source: false,
        }
    }

    pub const fn amp() -> Self {
        Self {
            target: Some(Target::Amp),
            source: false,
        }
    }

    pub const fn speaker() -> Self {
        Self {
            target: Some(Target::Speaker),
            source: false,
        }
    }

    pub const fn source() -> Self {
        Self {
            target: None,
            source: true,
        }
    }

    pub const fn with_source(mut self, source: bool) -> Self {
        self.source = source;
        self
    }

    /// The single authoritative mode for this tick
    pub fn resolve(&self) -> Mode {
        if self.source {
            return Mode::SourceLoad;
        }
        match self.target {
            Some(Target::Amp) => Mode::Amp,
            Some(Target::Speaker) => Mode::Speaker,
            None => Mode::Idle,
        }
    }
}

/// Resolved mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Rotate to the source angle; wheels and intake untouched
    SourceLoad,
    /// Stage for the amp
    Amp,
    /// Stage for the speaker
    Speaker,
    /// Nothing selected: feed wheels and intake zeroed
    Idle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_overrides_target() {
        assert_eq!(ModeRequest::amp().with_source(true).resolve(), Mode::SourceLoad);
        assert_eq!(ModeRequest::speaker().with_source(true).resolve(), Mode::SourceLoad);
        assert_eq!(ModeRequest::source().resolve(), Mode::SourceLoad);
    }

    #[test]
    fn test_target_modes() {
        assert_eq!(ModeRequest::amp().resolve(), Mode::Amp);
        assert_eq!(ModeRequest::speaker().resolve(), Mode::Speaker);
        assert_eq!(ModeRequest::idle().resolve(), Mode::Idle);
        assert_eq!(ModeRequest::default().resolve(), Mode::Idle);
    }
}
