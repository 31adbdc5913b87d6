//! App shell boot for the browser build.
//!
//! Restores persisted preferences and the signed-in user, then re-validates
//! the session against the backend. A stored user only implies an attempted
//! re-authentication; the backend decides whether it still stands.

mod preferences;

use crate::console::Console;
use crate::core::config::AppConfig;
use crate::core::entity::EntityKind;
use crate::core::logic;
use crate::core::reducer::{Action, StatePatch};
use crate::core::store::AppStore;
use crate::i18n::TranslationBundle;
use crate::services::api::GlooTransport;
use serde_json::json;
use yewdux::prelude::Dispatch;

pub use preferences::{persist_preferences, persist_user, sign_out};

/// The persisted user's id: the token fallback after an unmount dropped the
/// in-state copy.
pub(crate) fn stored_user_id() -> Option<String> {
    preferences::load_user()
        .as_ref()
        .and_then(|user| logic::doc_id(user).map(ToString::to_string))
}

/// Build the controller and restore locally persisted state. Called once at
/// startup by the view crate.
#[must_use]
pub fn boot() -> Console<GlooTransport> {
    let dispatch = Dispatch::<AppStore>::new();
    let user = preferences::load_user();
    let authenticated = user.is_some();
    dispatch.apply(Action::Patch(StatePatch {
        theme: Some(preferences::load_theme()),
        primary_color: Some(preferences::load_primary_color()),
        locale: Some(preferences::load_locale()),
        user,
        ..StatePatch::default()
    }));
    dispatch.apply(Action::Authenticated(authenticated));
    Console::new(AppConfig::default(), GlooTransport)
}

/// Re-validate a restored session against the backend. On rejection the
/// stored user is dropped and authentication flips off.
pub async fn resume_session(console: &Console<GlooTransport>) {
    let dispatch = Dispatch::<AppStore>::new();
    let Some(user) = dispatch.get().session.user.clone() else {
        return;
    };
    let Some(id) = logic::doc_id(&user).map(ToString::to_string) else {
        return;
    };
    dispatch.apply(Action::Patch(StatePatch {
        schema: Some(EntityKind::User),
        collection: Some(EntityKind::User),
        ..StatePatch::default()
    }));
    console.read_record(&json!({"_id": id})).await;
    let store = console.store();
    if let Some(fresh) = store.slots.record(EntityKind::User) {
        preferences::persist_user(fresh);
        dispatch.apply(Action::Patch(StatePatch {
            user: Some(fresh.clone()),
            ..StatePatch::default()
        }));
        dispatch.apply(Action::Authenticated(true));
    } else {
        let bundle = TranslationBundle::new(store.session.locale);
        sign_out();
        dispatch.apply(Action::Patch(StatePatch::notify(
            bundle.text("notify.session_expired", "session expired, sign in again"),
        )));
    }
}
