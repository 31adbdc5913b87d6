//! Local persistence for the session shell.

use crate::core::reducer::Action;
use crate::core::store::AppStore;
use crate::i18n::{DEFAULT_LOCALE, LocaleCode};
use crate::services::log_failure;
use gloo::storage::{LocalStorage, Storage};
use mauzo_api_models::Document;
use serde::Serialize;
use yewdux::prelude::Dispatch;

const USER_KEY: &str = "mauzo.user";
const LOCALE_KEY: &str = "mauzo.locale";
const THEME_KEY: &str = "mauzo.theme";
const PRIMARY_COLOR_KEY: &str = "mauzo.primary_color";

pub(super) fn load_user() -> Option<Document> {
    LocalStorage::get::<Document>(USER_KEY).ok()
}

/// Persist the signed-in user for the next boot.
pub fn persist_user(user: &Document) {
    set_storage(USER_KEY, user);
}

pub(super) fn load_theme() -> String {
    LocalStorage::get::<String>(THEME_KEY).unwrap_or_else(|_| "light".to_string())
}

pub(super) fn load_primary_color() -> String {
    LocalStorage::get::<String>(PRIMARY_COLOR_KEY).unwrap_or_else(|_| "#0f766e".to_string())
}

pub(super) fn load_locale() -> LocaleCode {
    if let Ok(value) = LocalStorage::get::<String>(LOCALE_KEY) {
        if let Some(locale) = LocaleCode::from_lang_tag(&value) {
            return locale;
        }
    }
    if let Some(tag) = web_sys::window().and_then(|window| window.navigator().language()) {
        if let Some(locale) = LocaleCode::from_lang_tag(&tag) {
            return locale;
        }
    }
    DEFAULT_LOCALE
}

/// Persist the shell preferences.
pub fn persist_preferences(theme: &str, primary_color: &str, locale: LocaleCode) {
    set_storage(THEME_KEY, theme);
    set_storage(PRIMARY_COLOR_KEY, primary_color);
    set_storage(LOCALE_KEY, locale.code());
}

/// Drop the stored session and reset the store to the signed-out shell.
pub fn sign_out() {
    LocalStorage::delete(USER_KEY);
    let dispatch = Dispatch::<AppStore>::new();
    dispatch.apply(Action::Authenticated(false));
    dispatch.apply(Action::Unmount);
}

fn set_storage<T: Serialize>(key: &'static str, value: T) {
    if let Err(err) = LocalStorage::set(key, value) {
        log_failure("storage", &format!("{key}: {err}"));
    }
}
