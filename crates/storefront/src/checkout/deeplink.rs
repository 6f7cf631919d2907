//! WhatsApp deep links and the handoff to the platform.

use std::time::Duration;

use queens_beauty_core::PhoneNumber;
use tracing::instrument;

/// How long to wait for the app link before opening the web fallback.
pub const FALLBACK_DELAY: Duration = Duration::from_millis(1500);

const MOBILE_MARKERS: &[&str] = &["iphone", "ipad", "ipod", "android"];

/// Where the message is being sent from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Phones and tablets, which may have the WhatsApp app installed.
    Mobile,
    Desktop,
}

impl Platform {
    /// Classify a browser user agent.
    #[must_use]
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_ascii_lowercase();
        if MOBILE_MARKERS.iter().any(|marker| ua.contains(marker)) {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }
}

/// Web link opened on mobile when the app does not take over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebFallback {
    /// `https://wa.me/<phone>?text=...`
    WaMe,
    /// `https://web.whatsapp.com/send?phone=<phone>&text=...`
    WebWhatsApp,
}

/// A message addressed to a WhatsApp number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhatsAppMessage {
    phone: PhoneNumber,
    text: String,
    fallback: WebFallback,
}

impl WhatsAppMessage {
    #[must_use]
    pub fn new(phone: PhoneNumber, text: impl Into<String>, fallback: WebFallback) -> Self {
        Self {
            phone,
            text: text.into(),
            fallback,
        }
    }

    #[must_use]
    pub const fn phone(&self) -> &PhoneNumber {
        &self.phone
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// `whatsapp://send?phone=<phone>&text=<text>`
    #[must_use]
    pub fn app_link(&self) -> String {
        format!("whatsapp://send?phone={}&text={}", self.phone, self.encoded())
    }

    /// `https://wa.me/<phone>?text=<text>`
    #[must_use]
    pub fn wa_me_link(&self) -> String {
        format!("https://wa.me/{}?text={}", self.phone, self.encoded())
    }

    /// `https://web.whatsapp.com/send?phone=<phone>&text=<text>`
    #[must_use]
    pub fn web_link(&self) -> String {
        format!(
            "https://web.whatsapp.com/send?phone={}&text={}",
            self.phone,
            self.encoded()
        )
    }

    /// The web link used when the app does not open.
    #[must_use]
    pub fn fallback_link(&self) -> String {
        match self.fallback {
            WebFallback::WaMe => self.wa_me_link(),
            WebFallback::WebWhatsApp => self.web_link(),
        }
    }

    /// How to open this message on `platform`.
    #[must_use]
    pub fn handoff(&self, platform: Platform) -> Handoff {
        match platform {
            Platform::Mobile => Handoff::AppWithFallback {
                app: self.app_link(),
                fallback: self.fallback_link(),
                delay: FALLBACK_DELAY,
            },
            Platform::Desktop => Handoff::NewWindow {
                url: self.web_link(),
            },
        }
    }

    fn encoded(&self) -> String {
        urlencoding::encode(&self.text).into_owned()
    }
}

/// A ready-to-run handoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handoff {
    /// Navigate to the app link, then to `fallback` after `delay` unless the
    /// app took over.
    AppWithFallback {
        app: String,
        fallback: String,
        delay: Duration,
    },
    /// Open `url` in a new window.
    NewWindow { url: String },
}

impl Handoff {
    /// The link a user would follow first.
    #[must_use]
    pub fn primary_link(&self) -> &str {
        match self {
            Self::AppWithFallback { app, .. } => app,
            Self::NewWindow { url } => url,
        }
    }
}

/// Whatever actually opens links: a browser window, a terminal, a test double.
pub trait Launcher: Send + Sync {
    /// Replace the current page with `url`.
    fn navigate(&self, url: &str);

    /// Open `url` in a new window.
    fn open_window(&self, url: &str);

    /// Whether a previous [`navigate`](Self::navigate) left the page,
    /// meaning the WhatsApp app took over.
    fn navigated_away(&self) -> bool;
}

/// Run a handoff to completion.
///
/// Sleeps for the fallback delay on mobile; spawn it if the caller must not
/// wait.
#[instrument(skip_all)]
pub async fn deliver<L: Launcher + ?Sized>(launcher: &L, handoff: Handoff) {
    match handoff {
        Handoff::AppWithFallback {
            app,
            fallback,
            delay,
        } => {
            launcher.navigate(&app);
            tokio::time::sleep(delay).await;
            if launcher.navigated_away() {
                tracing::debug!("WhatsApp app opened, skipping web fallback");
            } else {
                tracing::debug!("WhatsApp app did not open, using web fallback");
                launcher.navigate(&fallback);
            }
        }
        Handoff::NewWindow { url } => launcher.open_window(&url),
    }
}
