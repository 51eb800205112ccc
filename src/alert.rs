//! Completion alerts.
//!
//! When a run reaches zero the [`Notifier`] plays a short ascending three-tone
//! cue, unless muted, and raises a desktop notification if permission was
//! granted. Both go through injected capabilities, so the countdown never
//! depends on a sound card or a notification daemon being present:
//!
//! - [`ToneSink`] plays one sine tone after a delay. [`RodioTones`] uses the
//!   default audio output; [`SilentTones`] does nothing.
//! - [`NotificationSink`] tracks permission and shows notifications.
//!   [`DesktopNotifications`] uses the platform notification service;
//!   [`NoNotifications`] is always denied.
//!
//! Alerts are fire-and-forget. A failing backend is logged and otherwise
//! ignored; it never affects the countdown.

use rodio::source::{SineWave, Source};
use rodio::{OutputStream, Sink};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Notification title shown on completion.
pub const NOTIFICATION_TITLE: &str = "Timer Complete!";

/// Notification body shown on completion.
pub const NOTIFICATION_BODY: &str = "Your timer has finished.";

/// One tone of the alert cue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Pitch in hertz.
    pub frequency_hz: f32,
    /// How long the tone sounds.
    pub duration: Duration,
    /// Offset from the start of the cue.
    pub delay: Duration,
}

impl Tone {
    const fn new(frequency_hz: f32, duration_ms: u64, delay_ms: u64) -> Self {
        Self {
            frequency_hz,
            duration: Duration::from_millis(duration_ms),
            delay: Duration::from_millis(delay_ms),
        }
    }
}

/// The completion cue: three ascending tones, 300 ms apart.
pub const ALERT_CUE: [Tone; 3] = [
    Tone::new(600.0, 200, 0),
    Tone::new(800.0, 200, 300),
    Tone::new(1000.0, 300, 600),
];

/// Peak amplitude of a tone.
const TONE_VOLUME: f32 = 0.3;

/// Plays tones.
pub trait ToneSink: Send + Sync {
    /// Schedules `tone` to play after its delay. Returns once scheduled; a
    /// failure while playing is the sink's to log.
    fn play_tone(&self, tone: &Tone) -> Result<()>;
}

/// Notification permission, as a browser would report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Permission {
    /// Not asked yet.
    #[default]
    Default,
    /// Notifications may be shown.
    Granted,
    /// Notifications must not be shown.
    Denied,
}

/// Shows desktop notifications.
pub trait NotificationSink: Send + Sync {
    /// Current permission.
    fn permission(&self) -> Permission;

    /// Asks for permission and returns the answer.
    fn request_permission(&self) -> Permission;

    /// Shows a notification.
    fn notify(&self, title: &str, body: &str) -> Result<()>;
}

/// Tones through the default audio output.
///
/// Each tone gets its own short-lived thread, which owns the output stream for
/// as long as the tone plays.
#[derive(Debug, Clone, Copy, Default)]
pub struct RodioTones;

impl RodioTones {
    fn play_blocking(tone: Tone) -> Result<()> {
        thread::sleep(tone.delay);
        let (_stream, handle) =
            OutputStream::try_default().map_err(|e| Error::Audio(e.to_string()))?;
        let sink = Sink::try_new(&handle).map_err(|e| Error::Audio(e.to_string()))?;
        let source = SineWave::new(tone.frequency_hz)
            .take_duration(tone.duration)
            .amplify(TONE_VOLUME);
        sink.append(source);
        sink.sleep_until_end();
        Ok(())
    }
}

impl ToneSink for RodioTones {
    fn play_tone(&self, tone: &Tone) -> Result<()> {
        let tone = *tone;
        thread::Builder::new()
            .name("alert-tone".to_string())
            .spawn(move || {
                if let Err(e) = Self::play_blocking(tone) {
                    warn!(error = %e, frequency = tone.frequency_hz, "alert tone not played");
                }
            })
            .map(|_| ())
            .map_err(|e| Error::Audio(e.to_string()))
    }
}

/// A tone sink that plays nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentTones;

impl ToneSink for SilentTones {
    fn play_tone(&self, _tone: &Tone) -> Result<()> {
        Ok(())
    }
}

/// Notifications through the platform notification service.
///
/// Terminals have no permission prompt, so the answer to a permission request
/// is decided up front: granted when notifications are enabled in the
/// configuration, denied otherwise.
#[derive(Debug)]
pub struct DesktopNotifications {
    allowed: bool,
    app_name: String,
    permission: Mutex<Permission>,
}

impl DesktopNotifications {
    /// Creates the sink. `allowed` is the answer any permission request gets.
    pub fn new(allowed: bool) -> Self {
        Self {
            allowed,
            app_name: env!("CARGO_PKG_NAME").to_string(),
            permission: Mutex::new(Permission::Default),
        }
    }
}

impl NotificationSink for DesktopNotifications {
    fn permission(&self) -> Permission {
        self.permission
            .lock()
            .map(|p| *p)
            .unwrap_or(Permission::Denied)
    }

    fn request_permission(&self) -> Permission {
        let answer = if self.allowed {
            Permission::Granted
        } else {
            Permission::Denied
        };
        match self.permission.lock() {
            Ok(mut p) => {
                *p = answer;
                answer
            }
            Err(_) => Permission::Denied,
        }
    }

    fn notify(&self, title: &str, body: &str) -> Result<()> {
        let title = title.to_string();
        let body = body.to_string();
        let app_name = self.app_name.clone();
        thread::Builder::new()
            .name("alert-notification".to_string())
            .spawn(move || {
                let shown = notify_rust::Notification::new()
                    .summary(&title)
                    .body(&body)
                    .appname(&app_name)
                    .show();
                if let Err(e) = shown {
                    warn!(error = %e, "desktop notification not shown");
                }
            })
            .map(|_| ())
            .map_err(|e| Error::Notification(e.to_string()))
    }
}

/// A notification sink that is always denied.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNotifications;

impl NotificationSink for NoNotifications {
    fn permission(&self) -> Permission {
        Permission::Denied
    }

    fn request_permission(&self) -> Permission {
        Permission::Denied
    }

    fn notify(&self, _title: &str, _body: &str) -> Result<()> {
        Err(Error::Notification("notifications are disabled".to_string()))
    }
}

/// What an alert burst did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertReport {
    /// Tones successfully scheduled.
    pub tones: usize,
    /// Whether a notification was handed to the sink successfully.
    pub notified: bool,
}

/// Raises completion alerts.
pub struct Notifier {
    tones: Arc<dyn ToneSink>,
    notifications: Arc<dyn NotificationSink>,
    muted: bool,
    permission_requested: bool,
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("muted", &self.muted)
            .field("permission_requested", &self.permission_requested)
            .finish_non_exhaustive()
    }
}

impl Notifier {
    /// Creates a notifier over the given capabilities.
    pub fn new(tones: Arc<dyn ToneSink>, notifications: Arc<dyn NotificationSink>) -> Self {
        Self {
            tones,
            notifications,
            muted: false,
            permission_requested: false,
        }
    }

    /// A notifier that stays quiet, for headless use.
    pub fn silent() -> Self {
        Self::new(Arc::new(SilentTones), Arc::new(NoNotifications))
    }

    /// Returns the notifier with its mute flag set.
    pub fn with_muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    /// Whether sound is muted.
    pub fn muted(&self) -> bool {
        self.muted
    }

    /// Flips the mute flag and returns the new value.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        debug!(muted = self.muted, "mute toggled");
        self.muted
    }

    /// Called when the widget is first shown. Requests notification
    /// permission once, if it has not been decided yet.
    pub fn on_shown(&mut self) {
        if self.permission_requested {
            return;
        }
        self.permission_requested = true;
        if self.notifications.permission() == Permission::Default {
            let answer = self.notifications.request_permission();
            debug!(?answer, "notification permission requested");
        }
    }

    /// Raises the completion alert.
    pub fn on_completed(&self) -> AlertReport {
        let mut report = AlertReport::default();

        if !self.muted {
            for tone in &ALERT_CUE {
                match self.tones.play_tone(tone) {
                    Ok(()) => report.tones += 1,
                    Err(e) => {
                        warn!(error = %e, "audio alert unavailable");
                        break;
                    }
                }
            }
        }

        if self.notifications.permission() == Permission::Granted {
            match self
                .notifications
                .notify(NOTIFICATION_TITLE, NOTIFICATION_BODY)
            {
                Ok(()) => report.notified = true,
                Err(e) => warn!(error = %e, "completion notification failed"),
            }
        }

        info!(tones = report.tones, notified = report.notified, "timer complete");
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct RecordingTones {
        played: Mutex<Vec<Tone>>,
    }

    impl ToneSink for RecordingTones {
        fn play_tone(&self, tone: &Tone) -> Result<()> {
            self.played.lock().unwrap().push(*tone);
            Ok(())
        }
    }

    struct BrokenTones;

    impl ToneSink for BrokenTones {
        fn play_tone(&self, _tone: &Tone) -> Result<()> {
            Err(Error::Audio("no device".to_string()))
        }
    }

    struct FakeNotifications {
        answer: Permission,
        permission: Mutex<Permission>,
        requests: AtomicUsize,
        shown: Mutex<Vec<(String, String)>>,
    }

    impl FakeNotifications {
        fn new(answer: Permission) -> Self {
            Self {
                answer,
                permission: Mutex::new(Permission::Default),
                requests: AtomicUsize::new(0),
                shown: Mutex::new(Vec::new()),
            }
        }
    }

    impl NotificationSink for FakeNotifications {
        fn permission(&self) -> Permission {
            *self.permission.lock().unwrap()
        }

        fn request_permission(&self) -> Permission {
            self.requests.fetch_add(1, Ordering::SeqCst);
            *self.permission.lock().unwrap() = self.answer;
            self.answer
        }

        fn notify(&self, title: &str, body: &str) -> Result<()> {
            self.shown
                .lock()
                .unwrap()
                .push((title.to_string(), body.to_string()));
            Ok(())
        }
    }

    #[test]
    fn test_cue_ascends() {
        for pair in ALERT_CUE.windows(2) {
            assert!(pair[0].frequency_hz < pair[1].frequency_hz);
            assert!(pair[0].delay < pair[1].delay);
        }
        assert_eq!(ALERT_CUE[0].delay, Duration::ZERO);
    }

    #[test]
    fn test_unmuted_completion_plays_cue_and_notifies() {
        let tones = Arc::new(RecordingTones::default());
        let notes = Arc::new(FakeNotifications::new(Permission::Granted));
        let mut notifier = Notifier::new(tones.clone(), notes.clone());
        notifier.on_shown();

        let report = notifier.on_completed();
        assert_eq!(report, AlertReport { tones: 3, notified: true });
        assert_eq!(tones.played.lock().unwrap().as_slice(), &ALERT_CUE);
        assert_eq!(
            notes.shown.lock().unwrap().as_slice(),
            &[(NOTIFICATION_TITLE.to_string(), NOTIFICATION_BODY.to_string())]
        );
    }

    #[test]
    fn test_muted_completion_is_silent_but_still_notifies() {
        let tones = Arc::new(RecordingTones::default());
        let notes = Arc::new(FakeNotifications::new(Permission::Granted));
        let mut notifier = Notifier::new(tones.clone(), notes.clone()).with_muted(true);
        notifier.on_shown();

        let report = notifier.on_completed();
        assert_eq!(report.tones, 0);
        assert!(report.notified);
        assert!(tones.played.lock().unwrap().is_empty());
    }

    #[test]
    fn test_permission_requested_once() {
        let notes = Arc::new(FakeNotifications::new(Permission::Denied));
        let mut notifier = Notifier::new(Arc::new(SilentTones), notes.clone());
        notifier.on_shown();
        notifier.on_shown();
        assert_eq!(notes.requests.load(Ordering::SeqCst), 1);

        // Denied means no notification and no further prompt.
        let report = notifier.on_completed();
        assert!(!report.notified);
        assert!(notes.shown.lock().unwrap().is_empty());
        assert_eq!(notes.requests.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_no_notification_before_permission() {
        let notes = Arc::new(FakeNotifications::new(Permission::Granted));
        let notifier = Notifier::new(Arc::new(SilentTones), notes.clone());
        assert!(!notifier.on_completed().notified);
    }

    #[test]
    fn test_broken_audio_is_swallowed() {
        let notes = Arc::new(FakeNotifications::new(Permission::Granted));
        let mut notifier = Notifier::new(Arc::new(BrokenTones), notes);
        notifier.on_shown();
        let report = notifier.on_completed();
        assert_eq!(report.tones, 0);
        assert!(report.notified);
    }

    #[test]
    fn test_toggle_mute() {
        let mut notifier = Notifier::silent();
        assert!(!notifier.muted());
        assert!(notifier.toggle_mute());
        assert!(notifier.muted());
        assert!(!notifier.toggle_mute());
    }

    #[test]
    fn test_desktop_permission_follows_configuration() {
        let allowed = DesktopNotifications::new(true);
        assert_eq!(allowed.permission(), Permission::Default);
        assert_eq!(allowed.request_permission(), Permission::Granted);
        assert_eq!(allowed.permission(), Permission::Granted);

        let refused = DesktopNotifications::new(false);
        assert_eq!(refused.request_permission(), Permission::Denied);
    }

    #[test]
    fn test_disabled_notifications_refuse() {
        let sink = NoNotifications;
        assert_eq!(sink.request_permission(), Permission::Denied);
        assert!(sink.notify("a", "b").is_err());
    }
}
