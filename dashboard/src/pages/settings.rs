use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use crate::AppContext;
use crate::hooks::use_auth;

pub const UPDATE_SUCCESS: &str = "Settings updated successfully!";

/// Simulated latency of saving the profile. Nothing is sent anywhere.
const SAVE_DELAY: Duration = Duration::from_secs(1);
/// How long the success notice stays up.
const NOTICE_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationPreferences {
    pub email: bool,
    pub push: bool,
    pub sms: bool,
    pub marketing: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email: true,
            push: false,
            sms: true,
            marketing: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsView {
    pub profile: ProfileForm,
    pub notifications: NotificationPreferences,
    pub is_saving: bool,
    pub notice: Option<&'static str>,
}

/// Profile and notification settings of the signed-in user.
///
/// Saving is simulated locally; preferences only live as long as the page.
pub struct SettingsPage {
    pub profile: ProfileForm,
    pub notifications: NotificationPreferences,
    saving: AtomicBool,
    notice_until: Mutex<Option<Instant>>,
}

impl SettingsPage {
    /// Open the page with the profile form seeded from the current user,
    /// or left blank when nobody is signed in.
    pub async fn open(ctx: &AppContext) -> Self {
        let profile = use_auth(ctx)
            .load()
            .await
            .user
            .map(|user| ProfileForm {
                name: user.name,
                email: user.email,
            })
            .unwrap_or_default();
        Self {
            profile,
            notifications: NotificationPreferences::default(),
            saving: AtomicBool::new(false),
            notice_until: Mutex::new(None),
        }
    }

    fn notice_until(&self) -> MutexGuard<'_, Option<Instant>> {
        self.notice_until
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::SeqCst)
    }

    pub async fn update_profile(&self) {
        {
            let _saving = Saving::start(&self.saving);
            tokio::time::sleep(SAVE_DELAY).await;
        }
        tracing::info!(name = %self.profile.name, "profile updated");
        *self.notice_until() = Some(Instant::now() + NOTICE_DURATION);
    }

    pub fn notice(&self) -> Option<&'static str> {
        let until = *self.notice_until();
        until
            .is_some_and(|until| Instant::now() < until)
            .then_some(UPDATE_SUCCESS)
    }

    pub fn view(&self) -> SettingsView {
        SettingsView {
            profile: self.profile.clone(),
            notifications: self.notifications,
            is_saving: self.is_saving(),
            notice: self.notice(),
        }
    }
}

/// Clears the saving flag when the save ends or is abandoned.
struct Saving<'a>(&'a AtomicBool);

impl<'a> Saving<'a> {
    fn start(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for Saving<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
