//! Platform Capabilities - Per-mount flags behind a small probe interface.
//!
//! Some embedded terminal hosts scroll the viewport whenever a field gains
//! focus, and their native obscured-value rendering interferes with the
//! host's autofill/zoom heuristics. Both quirks are isolated behind two
//! booleans computed once per mount and read-only afterwards; the edit and
//! keyboard algorithms stay platform-agnostic and consult the flags only
//! through the stabilizer and the display projection.
//!
//! Detection follows the channel convention of the embedding app: the host
//! forwards a login hint to the auth screen, and its presence marks the
//! embedded channel. Direct terminal sessions never carry it.

use std::rc::Rc;

use crate::projection::DisplayMode;

/// Environment variable the embedded host sets on the session it spawns.
/// Its presence marks the embedded channel.
pub const LOGIN_HINT_ENV: &str = "PINFIELD_LOGIN_HINT";

// =============================================================================
// Probe
// =============================================================================

/// Answers "is this the embedded host with the focus auto-scroll quirk?".
///
/// Implementations must be cheap; the widget consults the probe exactly
/// once per mount.
pub trait PlatformProbe {
    fn is_embedded_host(&self) -> bool;

    /// The login hint the host forwarded, if any (prefill for the
    /// identifier field upstream; the widget itself only uses presence).
    fn login_hint(&self) -> Option<String> {
        None
    }
}

/// Probe that reads the process environment. The default on terminal
/// targets.
pub struct EnvProbe;

impl PlatformProbe for EnvProbe {
    fn is_embedded_host(&self) -> bool {
        std::env::var_os(LOGIN_HINT_ENV).is_some()
    }

    fn login_hint(&self) -> Option<String> {
        std::env::var(LOGIN_HINT_ENV).ok().filter(|v| !v.is_empty())
    }
}

/// Probe that always reports a plain host. For non-interactive targets and
/// tests: every platform workaround stays inert.
pub struct InertProbe;

impl PlatformProbe for InertProbe {
    fn is_embedded_host(&self) -> bool {
        false
    }
}

/// Fixed-answer probe for tests.
pub struct StaticProbe(pub bool);

impl PlatformProbe for StaticProbe {
    fn is_embedded_host(&self) -> bool {
        self.0
    }
}

// =============================================================================
// Capabilities
// =============================================================================

/// Platform capability flags, computed once per mount.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    /// Focus transfers must be wrapped in scroll snapshot/restore.
    pub needs_scroll_stabilization: bool,
    /// Filled slots render as styled plain text instead of the native
    /// obscured mode. True only alongside `needs_scroll_stabilization`,
    /// and never when digits were explicitly requested.
    pub use_styled_mask: bool,
}

impl Capabilities {
    /// Compute the flags for one mount.
    pub fn for_mount(probe: &dyn PlatformProbe, show_digits: bool) -> Self {
        let embedded = probe.is_embedded_host();
        Self {
            needs_scroll_stabilization: embedded,
            use_styled_mask: embedded && !show_digits,
        }
    }

    /// Fully inert flags (plain hosts, non-interactive targets).
    pub fn inert() -> Self {
        Self {
            needs_scroll_stabilization: false,
            use_styled_mask: false,
        }
    }

    /// The presentation mode these flags imply.
    pub fn display_mode(&self, show_digits: bool) -> DisplayMode {
        if show_digits {
            DisplayMode::Digits
        } else if self.use_styled_mask {
            DisplayMode::StyledMask
        } else {
            DisplayMode::obscured()
        }
    }
}

/// Shared probe handle used by widget props.
pub type ProbeHandle = Rc<dyn PlatformProbe>;

// =============================================================================
// Tests
// =============================================================================
