//! Busy-line polling
//!
//! A full refresh holds the busy line for several hundred milliseconds, so
//! the line is sampled at a coarse fixed interval instead of spinning.

use inkplane_hal::{DelayNs, SerialTransport};

use crate::error::Error;

/// Default busy poll interval
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 100;

/// Busy-wait policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusyWait {
    /// Delay between busy-line reads
    pub poll_interval_ms: u32,
    /// Maximum number of busy reads before giving up (`None` = wait forever)
    pub max_polls: Option<u32>,
}

impl Default for BusyWait {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_polls: None,
        }
    }
}

impl BusyWait {
    /// Wait forever, polling every `poll_interval_ms`
    pub const fn unbounded(poll_interval_ms: u32) -> Self {
        Self {
            poll_interval_ms,
            max_polls: None,
        }
    }

    /// Give up with [`Error::Timeout`] after roughly `timeout_ms`
    pub const fn bounded(poll_interval_ms: u32, timeout_ms: u32) -> Self {
        let interval = if poll_interval_ms == 0 { 1 } else { poll_interval_ms };
        Self {
            poll_interval_ms,
            max_polls: Some(timeout_ms.div_ceil(interval)),
        }
    }

    /// Block until the transport reports not-busy
    ///
    /// Returns the number of busy reads observed (0 if the panel was
    /// already idle).
    pub fn wait<T, D>(&self, transport: &mut T, delay: &mut D) -> Result<u32, Error<T::Error>>
    where
        T: SerialTransport,
        D: DelayNs,
    {
        let mut polls: u32 = 0;
        while transport.is_busy().map_err(Error::Transport)? {
            if self.max_polls.is_some_and(|max| polls >= max) {
                #[cfg(feature = "defmt")]
                defmt::warn!("Busy line stuck after {} polls", polls);
                return Err(Error::Timeout);
            }
            polls = polls.saturating_add(1);
            delay.delay_ms(self.poll_interval_ms);
        }
        Ok(polls)
    }
}
