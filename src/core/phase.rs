//! The two-valued signal phase.
//!
//! A `Phase` is either `Red` or `Green`, and the only transition between
//! them is an unconditional toggle.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display};

/// Trait for states that cycle by toggling.
///
/// Implementors are plain values: cheap to copy, comparable, and
/// safe to hand across threads through a channel.
///
/// # Example
///
/// ```rust
/// use phaselight::core::Signal;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
/// enum Gate {
///     Closed,
///     Open,
/// }
///
/// impl Signal for Gate {
///     fn initial() -> Self {
///         Self::Closed
///     }
///
///     fn toggled(&self) -> Self {
///         match self {
///             Self::Closed => Self::Open,
///             Self::Open => Self::Closed,
///         }
///     }
///
///     fn name(&self) -> &'static str {
///         match self {
///             Self::Closed => "Closed",
///             Self::Open => "Open",
///         }
///     }
/// }
///
/// assert_eq!(Gate::initial().toggled(), Gate::Open);
/// ```
pub trait Signal:
    Copy + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// The value a freshly constructed controller starts in.
    fn initial() -> Self;

    /// The value reached by a single toggle.
    ///
    /// Applying `toggled` twice must return the original value.
    fn toggled(&self) -> Self;

    /// Name for display/logging.
    fn name(&self) -> &'static str;
}

/// Phase of a two-state traffic signal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Stop. Every controller starts here.
    #[default]
    Red,
    /// Go.
    Green,
}

impl Phase {
    pub fn is_green(&self) -> bool {
        matches!(self, Self::Green)
    }

    pub fn is_red(&self) -> bool {
        matches!(self, Self::Red)
    }
}

impl Signal for Phase {
    fn initial() -> Self {
        Self::Red
    }

    fn toggled(&self) -> Self {
        match self {
            Self::Red => Self::Green,
            Self::Green => Self::Red,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Green => "Green",
        }
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
