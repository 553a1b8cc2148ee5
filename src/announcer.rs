use std::time::{Duration, Instant};

/// How long an announcement stays live before the channel self-clears.
pub const ANNOUNCEMENT_TTL: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
pub struct Announcement {
    pub message: String,
    pub expires_at: Instant,
}

/// Single-slot transient text channel narrating async state changes, the
/// terminal analog of an assistive-technology live region.
///
/// `announce` overwrites whatever is pending and re-arms the clear timer;
/// only the most recent message is ever live. `prune_expired` must run on
/// every UI tick so consumers observe the transition back to empty.
#[derive(Debug, Default)]
pub struct Announcer {
    pub current: Option<Announcement>,
}

impl Announcer {
    pub fn new() -> Self {
        Self { current: None }
    }

    pub fn announce(&mut self, message: impl Into<String>) {
        self.current = Some(Announcement {
            message: message.into(),
            expires_at: Instant::now() + ANNOUNCEMENT_TTL,
        });
    }

    pub fn message(&self) -> Option<&str> {
        self.current.as_ref().map(|a| a.message.as_str())
    }

    pub fn prune_expired(&mut self) {
        let now = Instant::now();
        if self.current.as_ref().is_some_and(|a| a.expires_at <= now) {
            self.current = None;
        }
    }
}
