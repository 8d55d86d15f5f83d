/// Playback state of a trigger control, exposed to the host as a string output.
///
/// `Waiting` is the pre-first-use sentinel; the machine itself never returns
/// to it. `Error` is entered when synthesis or playback fails, so the host
/// can observe the failure through the normal output channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Waiting,
    Speaking,
    Idle,
    Error,
}

impl PlaybackState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Speaking => "speaking",
            Self::Idle => "idle",
            Self::Error => "error",
        }
    }

    /// Parses a host-supplied state string. Unknown values fall back to
    /// `Waiting`, matching the control's initial output.
    pub fn parse(s: &str) -> Self {
        match s {
            "speaking" => Self::Speaking,
            "idle" => Self::Idle,
            "error" => Self::Error,
            _ => Self::Waiting,
        }
    }

    /// Guarded transition into `Speaking`.
    ///
    /// Returns false and leaves the state untouched while an utterance is
    /// already in flight; this is the control's only concurrency guard.
    pub fn try_begin(&mut self) -> bool {
        if *self == Self::Speaking {
            return false;
        }
        *self = Self::Speaking;
        true
    }

    /// Playback finished normally.
    pub fn complete(&mut self) {
        *self = Self::Idle;
    }

    /// Synthesis or playback failed.
    pub fn fail(&mut self) {
        *self = Self::Error;
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
