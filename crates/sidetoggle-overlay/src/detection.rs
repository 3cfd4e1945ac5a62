//! Enhancement-suite and night-mode detection.
//!
//! The enhancement suite injects its night switch some time after the page
//! loads, so the overlay polls for it once per frame for a bounded time.
//! When it never shows up, night mode is derived from the page URL instead:
//! night-mode pages are served from a host starting with `nm.`.

use tracing::debug;
use url::Url;

/// What the page reports about the enhancement suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResState {
    /// Night switch present and enabled.
    pub night_mode: bool,
}

/// Looks for the enhancement suite on the page.
pub trait ResProbe {
    /// `None` while the suite is not (yet) on the page.
    fn detect(&self) -> Option<ResState>;
}

/// A probe with a fixed answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StaticProbe(pub Option<ResState>);

impl StaticProbe {
    pub fn absent() -> Self {
        Self(None)
    }

    pub fn installed(night_mode: bool) -> Self {
        Self(Some(ResState { night_mode }))
    }
}

impl ResProbe for StaticProbe {
    fn detect(&self) -> Option<ResState> {
        self.0
    }
}

/// Result of one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Still waiting.
    Pending,
    /// The suite was found.
    Detected(ResState),
    /// Gave up; night mode comes from the URL.
    TimedOut { night_mode: bool },
    /// Polling already finished earlier.
    Finished,
}

/// Bounded per-frame poll for the enhancement suite.
#[derive(Debug, Clone)]
pub struct ResPoller {
    started_at_ms: f64,
    max_poll_ms: f64,
    night_host_prefix: String,
    finished: bool,
}

impl ResPoller {
    pub fn new(started_at_ms: f64, max_poll_ms: f64, night_host_prefix: impl Into<String>) -> Self {
        Self {
            started_at_ms,
            max_poll_ms,
            night_host_prefix: night_host_prefix.into(),
            finished: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn poll(&mut self, now_ms: f64, probe: &dyn ResProbe, page_url: &str) -> PollOutcome {
        if self.finished {
            return PollOutcome::Finished;
        }

        if now_ms - self.started_at_ms <= self.max_poll_ms {
            return match probe.detect() {
                Some(state) => {
                    self.finished = true;
                    debug!(night_mode = state.night_mode, "enhancement suite detected");
                    PollOutcome::Detected(state)
                }
                None => PollOutcome::Pending,
            };
        }

        self.finished = true;
        let night_mode = is_night_mode_url(page_url, &self.night_host_prefix);
        debug!(night_mode, "gave up waiting for the enhancement suite");
        PollOutcome::TimedOut { night_mode }
    }
}

/// Whether `page_url` is an http(s) URL whose host starts with `prefix`.
///
/// Unparsable URLs are not night mode.
pub fn is_night_mode_url(page_url: &str, prefix: &str) -> bool {
    let Ok(url) = Url::parse(page_url) else {
        return false;
    };
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    url.host_str()
        .is_some_and(|host| host.to_ascii_lowercase().starts_with(&prefix.to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_night_mode_url() {
        assert!(is_night_mode_url("https://nm.reddit.com/r/rust", "nm."));
        assert!(is_night_mode_url("HTTP://NM.reddit.com/", "nm."));
        assert!(!is_night_mode_url("https://www.reddit.com/", "nm."));
        assert!(!is_night_mode_url("ftp://nm.reddit.com/", "nm."));
        assert!(!is_night_mode_url("not a url", "nm."));
    }

    #[test]
    fn test_poll_detects_within_budget() {
        let mut poller = ResPoller::new(0.0, 5000.0, "nm.");
        assert_eq!(
            poller.poll(100.0, &StaticProbe::absent(), "https://www.reddit.com/"),
            PollOutcome::Pending
        );
        assert_eq!(
            poller.poll(200.0, &StaticProbe::installed(true), "https://www.reddit.com/"),
            PollOutcome::Detected(ResState { night_mode: true })
        );
        assert!(poller.is_finished());
        assert_eq!(
            poller.poll(300.0, &StaticProbe::installed(false), ""),
            PollOutcome::Finished
        );
    }

    #[test]
    fn test_poll_times_out_to_url() {
        let mut poller = ResPoller::new(1000.0, 5000.0, "nm.");
        assert_eq!(
            poller.poll(6000.0, &StaticProbe::absent(), "https://nm.reddit.com/"),
            PollOutcome::Pending
        );
        assert_eq!(
            poller.poll(6001.0, &StaticProbe::installed(false), "https://nm.reddit.com/"),
            PollOutcome::TimedOut { night_mode: true }
        );
    }
}
