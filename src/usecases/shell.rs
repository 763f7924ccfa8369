//! Application state for the view shell, driven by explicit actions.
//!
//! The UI adapter owns one [`AppState`], dispatches [`Action`]s into it and renders
//! whatever [`AppState::screen`] returns. Navigation is gated by role: a view outside the
//! signed-in role's menu is never reachable.

use crate::domain::{Identity, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

/// Top-level views reachable from the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    NewComplaint,
    MyComplaints,
    Dashboard,
    AllComplaints,
    Notifications,
    Directory,
}

impl View {
    pub fn label(self) -> &'static str {
        match self {
            View::NewComplaint => "New complaint",
            View::MyComplaints => "My complaints",
            View::Dashboard => "Dashboard",
            View::AllComplaints => "All complaints",
            View::Notifications => "Notifications",
            View::Directory => "Directory",
        }
    }
}

/// Menu entries for `role`, in display order.
pub fn menu_for(role: Role) -> &'static [View] {
    match role {
        Role::Traveler => &[View::NewComplaint, View::MyComplaints, View::Notifications],
        Role::Agent => &[
            View::Dashboard,
            View::AllComplaints,
            View::Notifications,
            View::Directory,
        ],
    }
}

/// Landing view after sign-in.
pub fn default_view(role: Role) -> View {
    match role {
        Role::Traveler => View::NewComplaint,
        Role::Agent => View::Dashboard,
    }
}

/// What should be rendered next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Login,
    Register,
    Detail(String),
    View(View),
}

#[derive(Debug, Clone)]
pub enum Action {
    SignedIn(Identity),
    SignedOut,
    SwitchAuthMode(AuthMode),
    Navigate(View),
    SelectComplaint(String),
    Back,
}

#[derive(Debug, Clone)]
pub struct AppState {
    session: Option<Identity>,
    auth_mode: AuthMode,
    active_view: Option<View>,
    selected_complaint: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            session: None,
            auth_mode: AuthMode::Login,
            active_view: None,
            selected_complaint: None,
        }
    }
}

impl AppState {
    /// State for an identity restored from the session store, if any.
    pub fn restored(session: Option<Identity>) -> Self {
        let mut state = Self::default();
        if let Some(who) = session {
            state.dispatch(Action::SignedIn(who));
        }
        state
    }

    pub fn session(&self) -> Option<&Identity> {
        self.session.as_ref()
    }

    pub fn auth_mode(&self) -> AuthMode {
        self.auth_mode
    }

    pub fn selected_complaint(&self) -> Option<&str> {
        self.selected_complaint.as_deref()
    }

    /// The active view, always one of the signed-in role's menu entries.
    pub fn active_view(&self) -> Option<View> {
        let role = self.session.as_ref()?.role;
        Some(
            self.active_view
                .filter(|v| menu_for(role).contains(v))
                .unwrap_or_else(|| default_view(role)),
        )
    }

    pub fn menu(&self) -> &'static [View] {
        self.session
            .as_ref()
            .map(|who| menu_for(who.role))
            .unwrap_or(&[])
    }

    pub fn screen(&self) -> Screen {
        if self.session.is_none() {
            return match self.auth_mode {
                AuthMode::Login => Screen::Login,
                AuthMode::Register => Screen::Register,
            };
        }
        if let Some(id) = &self.selected_complaint {
            return Screen::Detail(id.clone());
        }
        match self.active_view() {
            Some(view) => Screen::View(view),
            None => Screen::Login,
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::SignedIn(who) => {
                self.active_view = Some(default_view(who.role));
                self.selected_complaint = None;
                self.auth_mode = AuthMode::Login;
                self.session = Some(who);
            }
            Action::SignedOut => *self = Self::default(),
            Action::SwitchAuthMode(mode) => {
                if self.session.is_none() {
                    self.auth_mode = mode;
                }
            }
            Action::Navigate(view) => {
                let Some(role) = self.session.as_ref().map(|w| w.role) else {
                    return;
                };
                self.selected_complaint = None;
                self.active_view = Some(if menu_for(role).contains(&view) {
                    view
                } else {
                    default_view(role)
                });
            }
            Action::SelectComplaint(id) => {
                if self.session.is_some() {
                    self.selected_complaint = Some(id);
                }
            }
            Action::Back => self.selected_complaint = None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn who(role: Role) -> Identity {
        Identity {
            id: "1".into(),
            email: "x@example.com".into(),
            name: "X".into(),
            role,
            phone: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn signed_out_shows_auth_forms() {
        let mut s = AppState::default();
        assert_eq!(s.screen(), Screen::Login);
        s.dispatch(Action::SwitchAuthMode(AuthMode::Register));
        assert_eq!(s.screen(), Screen::Register);
        // navigation is ignored while signed out
        s.dispatch(Action::Navigate(View::Dashboard));
        s.dispatch(Action::SelectComplaint("1".into()));
        assert_eq!(s.screen(), Screen::Register);
        assert!(s.menu().is_empty());
    }

    #[test]
    fn sign_in_lands_on_role_default() {
        let mut s = AppState::default();
        s.dispatch(Action::SignedIn(who(Role::Traveler)));
        assert_eq!(s.screen(), Screen::View(View::NewComplaint));
        s.dispatch(Action::SignedIn(who(Role::Agent)));
        assert_eq!(s.screen(), Screen::View(View::Dashboard));
    }

    #[test]
    fn views_outside_role_menu_fall_back() {
        let mut s = AppState::restored(Some(who(Role::Traveler)));
        s.dispatch(Action::Navigate(View::MyComplaints));
        assert_eq!(s.screen(), Screen::View(View::MyComplaints));
        for forbidden in [View::Dashboard, View::AllComplaints, View::Directory] {
            s.dispatch(Action::Navigate(forbidden));
            assert_eq!(s.screen(), Screen::View(View::NewComplaint));
        }
        for role in Role::ALL {
            let s = AppState::restored(Some(who(role)));
            assert!(menu_for(role).contains(&s.active_view().unwrap()));
        }
    }

    #[test]
    fn detail_overrides_view_until_back() {
        let mut s = AppState::restored(Some(who(Role::Agent)));
        s.dispatch(Action::Navigate(View::AllComplaints));
        s.dispatch(Action::SelectComplaint("42".into()));
        assert_eq!(s.screen(), Screen::Detail("42".into()));
        s.dispatch(Action::Back);
        assert_eq!(s.screen(), Screen::View(View::AllComplaints));
        s.dispatch(Action::SelectComplaint("42".into()));
        s.dispatch(Action::Navigate(View::Notifications));
        assert_eq!(s.screen(), Screen::View(View::Notifications));
    }

    #[test]
    fn sign_out_resets_everything() {
        let mut s = AppState::restored(Some(who(Role::Agent)));
        s.dispatch(Action::SelectComplaint("42".into()));
        s.dispatch(Action::SignedOut);
        assert_eq!(s.screen(), Screen::Login);
        assert!(s.session().is_none());
        assert!(s.selected_complaint().is_none());
        assert_eq!(s.auth_mode(), AuthMode::Login);
    }
}
