/// Interpretation context for keystrokes. Exactly one mode is active at a
/// time; the editor starts in Normal and has no terminal state (closing the
/// editor happens externally, via `:q`/`:wq`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    Command,
}

impl Mode {
    /// Status-bar label for the mode. Command mode echoes the command buffer
    /// instead and has no label of its own.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "-- NORMAL --",
            Self::Insert => "-- INSERT --",
            Self::Command => "",
        }
    }
}

/// How long an unmatched first key of a double-key sequence (`dd`, `gg`)
/// stays pending before it is discarded.
pub const PENDING_KEY_TIMEOUT_MS: u64 = 1000;

/// First half of a double-key sequence, held until the second key arrives or
/// the expiry passes. Expiry is checked against a monotonic timestamp on the
/// next key event; there is no timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingKey {
    pub key: char,
    pub expires_at: u64,
}

impl PendingKey {
    pub const fn new(key: char, now_ms: u64) -> Self {
        Self {
            key,
            expires_at: now_ms + PENDING_KEY_TIMEOUT_MS,
        }
    }

    /// Whether `key` completes this pending sequence at time `now_ms`.
    pub fn completes(self, key: char, now_ms: u64) -> bool {
        self.key == key && now_ms < self.expires_at
    }
}
