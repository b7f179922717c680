//! Theme context
//!
//! [`ThemeState`] is created once at mount and passed explicitly to whatever
//! renders. Scheme changes crossfade the palette: colors are interpolated
//! along a 300ms `ease` timeline, the same curve the page's CSS transition uses.

use crate::platform::SystemSchemeSource;
use crate::preference::{PreferenceStore, ThemePreference};
use crate::theme::ColorScheme;
use crate::tokens::{ColorToken, Palette};
use folio_animation::{Easing, Timeline, TimelineEntryId};
use folio_core::Color;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle returned by [`ThemeState::subscribe`]
    pub struct SubscriptionId;
}

/// Length of the palette crossfade
pub const THEME_TRANSITION_MS: u32 = 300;

/// Curve of the palette crossfade
pub const THEME_TRANSITION_EASING: Easing = Easing::Ease;

type SchemeCallback = Box<dyn FnMut(ColorScheme)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SubscriptionKind {
    /// Every applied scheme change
    Change,
    /// System changes that were honored
    SystemChange,
}

struct Subscription {
    kind: SubscriptionKind,
    callback: SchemeCallback,
}

/// Theme transition animation state
struct ThemeTransition {
    from: Palette,
    to: Palette,
    timeline: Timeline,
    progress: TimelineEntryId,
}

/// Current theme plus its persisted preference
pub struct ThemeState<S: PreferenceStore> {
    preference: ThemePreference<S>,
    scheme: ColorScheme,
    palette: Palette,
    transitions: bool,
    transition: Option<ThemeTransition>,
    subscriptions: SlotMap<SubscriptionId, Subscription>,
}

impl<S: PreferenceStore> ThemeState<S> {
    /// Resolve the initial scheme and build the context
    pub fn init(preference: ThemePreference<S>, system: &dyn SystemSchemeSource) -> Self {
        let scheme = preference.initial(system);
        tracing::debug!(%scheme, persisted = preference.has_persisted(), "theme initialized");
        Self {
            preference,
            scheme,
            palette: Palette::for_scheme(scheme),
            transitions: true,
            transition: None,
            subscriptions: SlotMap::with_key(),
        }
    }

    /// Enable or disable the animated palette transition
    pub fn with_transitions(mut self, enabled: bool) -> Self {
        self.transitions = enabled;
        self
    }

    pub fn scheme(&self) -> ColorScheme {
        self.scheme
    }

    /// Class name for the document root, a pure function of the scheme
    pub fn root_class(&self) -> &'static str {
        self.scheme.class_name()
    }

    /// Palette as currently displayed, mid-transition values included
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn color(&self, token: ColorToken) -> Color {
        self.palette.get(token)
    }

    pub fn preference(&self) -> &ThemePreference<S> {
        &self.preference
    }

    pub fn into_preference(self) -> ThemePreference<S> {
        self.preference
    }

    /// Switch to the other scheme and persist it
    pub fn toggle(&mut self) -> ColorScheme {
        let next = self.scheme.toggle();
        self.set(next);
        next
    }

    /// Explicit user choice: persist and apply
    pub fn set(&mut self, scheme: ColorScheme) {
        self.preference.set(scheme);
        self.apply(scheme);
    }

    /// Drop the persisted choice and follow the system again
    pub fn follow_system(&mut self, system: &dyn SystemSchemeSource) {
        self.preference.clear();
        self.apply(system.current().unwrap_or_default());
    }

    /// Handle an OS scheme change. Ignored once a value is persisted;
    /// returns whether the change was honored.
    pub fn on_system_change(&mut self, scheme: ColorScheme) -> bool {
        if self.preference.has_persisted() {
            tracing::trace!(%scheme, "system scheme change ignored, preference persisted");
            return false;
        }
        self.notify(SubscriptionKind::SystemChange, scheme);
        self.apply(scheme);
        true
    }

    /// Called after every applied scheme change
    pub fn subscribe(&mut self, callback: impl FnMut(ColorScheme) + 'static) -> SubscriptionId {
        self.subscriptions.insert(Subscription {
            kind: SubscriptionKind::Change,
            callback: Box::new(callback),
        })
    }

    /// Called for system changes, only while nothing is persisted
    pub fn subscribe_os_change(
        &mut self,
        callback: impl FnMut(ColorScheme) + 'static,
    ) -> SubscriptionId {
        self.subscriptions.insert(Subscription {
            kind: SubscriptionKind::SystemChange,
            callback: Box::new(callback),
        })
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.remove(id).is_some()
    }

    /// Drop every subscription (unmount)
    pub fn clear_subscriptions(&mut self) {
        self.subscriptions.clear();
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// CSS `transition` value for the document body, `None` when disabled
    pub fn transition_css(&self) -> Option<String> {
        if !self.transitions {
            return None;
        }
        let timing = THEME_TRANSITION_EASING.css_name();
        Some(format!(
            "background-color {THEME_TRANSITION_MS}ms {timing}, color {THEME_TRANSITION_MS}ms {timing}"
        ))
    }

    /// Advance the palette transition. Returns true while more frames are needed.
    pub fn tick(&mut self, dt_secs: f32) -> bool {
        let Some(transition) = self.transition.as_mut() else {
            return false;
        };

        transition.timeline.tick(dt_secs * 1000.0);
        if !transition.timeline.is_playing() {
            self.palette = transition.to.clone();
            self.transition = None;
            tracing::trace!("theme transition finished");
            return false;
        }

        let t = transition.timeline.value(transition.progress).unwrap_or(1.0);
        self.palette = Palette::lerp(&transition.from, &transition.to, t);
        true
    }

    /// `--name: value` pairs for the current palette
    pub fn css_variables(&self) -> Vec<(String, String)> {
        self.palette.css_variables()
    }

    fn apply(&mut self, scheme: ColorScheme) {
        if scheme == self.scheme {
            return;
        }
        tracing::debug!(from = %self.scheme, to = %scheme, "color scheme changed");
        self.scheme = scheme;

        let target = Palette::for_scheme(scheme);
        // An interrupted crossfade restarts from the colors on screen
        self.transition = None;
        if self.transitions {
            let mut timeline = Timeline::new();
            let progress =
                timeline.add_eased(0, THEME_TRANSITION_MS, 0.0, 1.0, THEME_TRANSITION_EASING);
            timeline.start();
            self.transition = Some(ThemeTransition {
                from: self.palette.clone(),
                to: target,
                timeline,
                progress,
            });
        } else {
            self.palette = target;
        }

        self.notify(SubscriptionKind::Change, scheme);
    }

    fn notify(&mut self, kind: SubscriptionKind, scheme: ColorScheme) {
        for (_, subscription) in self.subscriptions.iter_mut() {
            if subscription.kind == kind {
                (subscription.callback)(scheme);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::FixedSchemeSource;
    use crate::preference::{MemoryStore, THEME_KEY};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn state(store: MemoryStore, os: Option<ColorScheme>) -> ThemeState<MemoryStore> {
        ThemeState::init(ThemePreference::new(store), &FixedSchemeSource::new(os))
    }

    #[test]
    fn test_toggle_persists() {
        let mut theme = state(MemoryStore::new(), None);
        assert_eq!(theme.scheme(), ColorScheme::Light);
        assert_eq!(theme.toggle(), ColorScheme::Dark);
        assert_eq!(theme.root_class(), "theme-dark");
        assert_eq!(
            theme.preference().store().load(THEME_KEY).unwrap().as_deref(),
            Some("dark")
        );
    }

    #[test]
    fn test_system_change_ignored_once_persisted() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut theme = state(MemoryStore::new(), Some(ColorScheme::Light));
        let sink = seen.clone();
        theme.subscribe_os_change(move |scheme| sink.borrow_mut().push(scheme));

        assert!(theme.on_system_change(ColorScheme::Dark));
        assert_eq!(theme.scheme(), ColorScheme::Dark);

        theme.set(ColorScheme::Light);
        assert!(!theme.on_system_change(ColorScheme::Dark));
        assert_eq!(theme.scheme(), ColorScheme::Light);
        assert_eq!(*seen.borrow(), vec![ColorScheme::Dark]);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let count = Rc::new(RefCell::new(0));
        let mut theme = state(MemoryStore::new(), None);
        let sink = count.clone();
        let id = theme.subscribe(move |_| *sink.borrow_mut() += 1);

        theme.toggle();
        assert!(theme.unsubscribe(id));
        theme.toggle();
        assert_eq!(*count.borrow(), 1);
        assert!(!theme.unsubscribe(id));
    }

    #[test]
    fn test_palette_transition_settles_on_target() {
        let mut theme = state(MemoryStore::new(), None);
        theme.toggle();
        assert!(theme.is_animating());
        assert_eq!(theme.palette().background, Palette::light().background);

        theme.tick(0.05);
        assert_ne!(theme.palette().background, Palette::light().background);

        let mut frames = 0;
        while theme.tick(1.0 / 60.0) {
            frames += 1;
            assert!(frames < 600, "transition never settled");
        }
        assert_eq!(theme.palette(), &Palette::dark());
    }

    #[test]
    fn test_crossfade_follows_ease_curve_for_300ms() {
        let mut theme = state(MemoryStore::new(), None);
        theme.toggle();

        // 0.15s in, `ease` is well past the linear midpoint
        assert!(theme.tick(0.15));
        let (light, dark) = (Palette::light().background, Palette::dark().background);
        let eased = light.r + (dark.r - light.r) * Easing::Ease.apply(0.5);
        let linear = light.r + (dark.r - light.r) * 0.5;
        let shown = theme.palette().background.r;
        assert!((shown - eased).abs() < 1e-3, "{shown} vs {eased}");
        assert!(shown < linear);

        assert!(theme.tick(0.14));
        assert!(!theme.tick(0.02));
        assert!(!theme.is_animating());
        assert_eq!(theme.palette(), &Palette::dark());
    }

    #[test]
    fn test_transition_css_matches_crossfade() {
        let theme = state(MemoryStore::new(), None);
        assert_eq!(
            theme.transition_css().as_deref(),
            Some("background-color 300ms ease, color 300ms ease")
        );
        let theme = theme.with_transitions(false);
        assert_eq!(theme.transition_css(), None);
    }

    #[test]
    fn test_without_transitions_switches_immediately() {
        let mut theme = state(MemoryStore::new(), None).with_transitions(false);
        theme.set(ColorScheme::Dark);
        assert!(!theme.is_animating());
        assert_eq!(theme.color(ColorToken::Background), Palette::dark().background);
    }

    #[test]
    fn test_follow_system_after_clear() {
        let mut theme = state(MemoryStore::with_value(THEME_KEY, "dark"), Some(ColorScheme::Light));
        assert_eq!(theme.scheme(), ColorScheme::Dark);
        theme.follow_system(&FixedSchemeSource::new(Some(ColorScheme::Light)));
        assert_eq!(theme.scheme(), ColorScheme::Light);
        assert!(theme.on_system_change(ColorScheme::Dark));
    }
}
