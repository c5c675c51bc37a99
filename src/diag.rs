/*!
Rate limiting for diagnostic messages about malformed input.

A peer can send arbitrarily many bad messages, so everything the decoders
log about untrusted bytes goes through a token bucket. The limiter state
is advisory only and never influences what a codec call returns.
*/

use std::cmp;
use std::sync::Mutex;
use std::time::Instant;

struct State {
    tokens: u32,
    last_fill: Option<Instant>,
    dropped: u64,
}

/// A token bucket for log messages, usable as a `static`.
pub struct RateLimit {
    rate: u32,
    burst: u32,
    state: Mutex<State>,
}

impl RateLimit {
    /// Constructs a limiter admitting `rate` messages per second
    /// with bursts of up to `burst`.
    pub const fn new(rate: u32, burst: u32) -> RateLimit {
        RateLimit {
            rate,
            burst,
            state: Mutex::new(State {
                tokens: burst,
                last_fill: None,
                dropped: 0,
            }),
        }
    }

    /// Takes a token if one is available. Returns whether the caller
    /// should emit its message.
    pub fn admit(&self) -> bool {
        let mut st = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let now = Instant::now();
        match st.last_fill {
            None => st.last_fill = Some(now),
            Some(then) => {
                let secs = now.duration_since(then).as_secs();
                if secs > 0 {
                    let refill = secs.saturating_mul(u64::from(self.rate));
                    st.tokens = cmp::min(u64::from(self.burst), u64::from(st.tokens) + refill) as u32;
                    st.last_fill = Some(now);
                }
            }
        }
        if st.tokens == 0 {
            st.dropped += 1;
            return false;
        }
        st.tokens -= 1;
        if st.dropped > 0 {
            debug!("{} rate-limited messages were suppressed", st.dropped);
            st.dropped = 0;
        }
        true
    }
}

/// Logs a warning, subject to the given `RateLimit`.
macro_rules! warn_rl {
    ($rl:expr, $($arg:tt)+) => {
        if $rl.admit() {
            warn!($($arg)+);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_is_honored() {
        let rl = RateLimit::new(1, 3);
        assert!(rl.admit());
        assert!(rl.admit());
        assert!(rl.admit());
        assert!(!rl.admit());
        assert!(!rl.admit());
    }

    #[test]
    fn zero_burst_admits_nothing() {
        let rl = RateLimit::new(1, 0);
        assert!(!rl.admit());
    }
}
