//! Per-visitor view state.
//!
//! One browser sees one screen at a time, chosen from a finite set. The
//! state machine holds the current view plus two flags (initial lookup
//! pending, authenticated) and moves strictly in response to explicit
//! intents or auth changes. There is no back-stack, no timer and no
//! URL-based routing; navigation is plain in-memory assignment.

use std::str::FromStr;

/// The visitor's current view.
///
/// `Registration` is the editable form; `Success` is the terminal screen
/// after the row was inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Landing,
    Signup,
    Login,
    Registration,
    Success,
}

/// Explicit navigation events emitted by buttons on the screens.
///
/// `SubmissionSucceeded` is raised internally by the registration handler,
/// never parsed from a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    SwitchToSignup,
    SwitchToLogin,
    OpenRegistration,
    BackToLanding,
    SubmissionSucceeded,
}

impl FromStr for Intent {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "signup" => Ok(Self::SwitchToSignup),
            "login" => Ok(Self::SwitchToLogin),
            "register" => Ok(Self::OpenRegistration),
            "home" => Ok(Self::BackToLanding),
            _ => Err(()),
        }
    }
}

/// What actually gets rendered, derived from view + auth + loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Loading,
    Landing,
    Signup,
    Login,
    Registration,
    Success,
}

/// The transition rules from the contract:
///
/// - while the initial session lookup is pending, only the loading screen
///   is visible and intents are ignored;
/// - anonymous visitors toggle between login and signup, and any attempt to
///   reach the registration view shows the login screen instead;
/// - a false→true auth edge while on signup or login lands on the
///   registration form;
/// - authenticated visitors move landing ⇄ registration, and a successful
///   submission parks them on the terminal success screen.
#[derive(Debug, Clone)]
pub struct ViewRouter {
    loading: bool,
    authenticated: bool,
    view: View,
}

impl Default for ViewRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewRouter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            loading: true,
            authenticated: false,
            view: View::Landing,
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    #[must_use]
    pub fn view(&self) -> View {
        self.view
    }

    /// Complete the initial session lookup.
    pub fn resolve(&mut self, authenticated: bool) {
        self.loading = false;
        self.authenticated = authenticated;
    }

    /// Apply an auth state change coming from the session provider.
    pub fn set_authenticated(&mut self, authenticated: bool) {
        let was = self.authenticated;
        self.authenticated = authenticated;

        if !was && authenticated && matches!(self.view, View::Signup | View::Login) {
            // Post-auth destination is the registration form
            self.view = View::Registration;
        }

        if was && !authenticated {
            self.view = View::Landing;
        }
    }

    /// Apply a navigation intent. Ignored while the lookup is pending.
    pub fn apply(&mut self, intent: Intent) {
        if self.loading {
            return;
        }

        match intent {
            Intent::SwitchToSignup if !self.authenticated => self.view = View::Signup,
            Intent::SwitchToLogin if !self.authenticated => self.view = View::Login,
            Intent::OpenRegistration => self.view = View::Registration,
            Intent::BackToLanding => self.view = View::Landing,
            Intent::SubmissionSucceeded if self.view == View::Registration => {
                self.view = View::Success;
            }
            _ => (),
        }
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        if self.loading {
            return Screen::Loading;
        }

        if self.authenticated {
            match self.view {
                View::Registration => Screen::Registration,
                View::Success => Screen::Success,
                _ => Screen::Landing,
            }
        } else {
            match self.view {
                View::Landing => Screen::Landing,
                View::Signup => Screen::Signup,
                // Anonymous visitors must sign in before the form
                _ => Screen::Login,
            }
        }
    }
}
