//! Route guards. Both wait for the browser session to load before deciding,
//! so the server and the first client render agree.

use leptos::prelude::*;
use leptos_router::{components::Redirect, hooks::use_location};

use crate::auth::use_auth;

pub const DEFAULT_LANDING: &str = "/home";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardOutcome {
    Pending,
    Render,
    Redirect(String),
}

/// Pages for signed-out visitors only.
pub fn guest_outcome(ready: bool, authenticated: bool) -> GuardOutcome {
    match (ready, authenticated) {
        (false, _) => GuardOutcome::Pending,
        (true, true) => GuardOutcome::Redirect(DEFAULT_LANDING.to_string()),
        (true, false) => GuardOutcome::Render,
    }
}

/// Pages that need a session. Unauthenticated visitors go to the login page,
/// which sends them back to `location` (path plus query) afterwards.
pub fn member_outcome(ready: bool, authenticated: bool, location: &str) -> GuardOutcome {
    match (ready, authenticated) {
        (false, _) => GuardOutcome::Pending,
        (true, true) => GuardOutcome::Render,
        (true, false) => GuardOutcome::Redirect(format!(
            "/login?from={}",
            urlencoding::encode(location)
        )),
    }
}

/// Where to go after signing in. Only same-origin paths are honoured;
/// browsers read `\` as `/`, so any backslash is refused.
pub fn login_target(from: Option<&str>) -> String {
    match from {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && path != "/login"
                && !path.starts_with("/login?") =>
        {
            path.to_string()
        }
        _ => DEFAULT_LANDING.to_string(),
    }
}

fn render(outcome: GuardOutcome, children: &ChildrenFn) -> AnyView {
    match outcome {
        GuardOutcome::Pending => view! {
            <div class="loading-screen">
                <div class="spinner"></div>
            </div>
        }
        .into_any(),
        GuardOutcome::Render => children().into_any(),
        GuardOutcome::Redirect(path) => view! { <Redirect path=path /> }.into_any(),
    }
}

#[component]
pub fn PublicRoute(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    move || render(guest_outcome(auth.is_ready(), auth.is_authenticated()), &children)
}

#[component]
pub fn ProtectedRoute(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let location = use_location();
    move || {
        let path = location.pathname.get_untracked();
        let search = location.search.get_untracked();
        let query = search.trim_start_matches('?');
        let target = if query.is_empty() {
            path
        } else {
            format!("{path}?{query}")
        };
        render(
            member_outcome(auth.is_ready(), auth.is_authenticated(), &target),
            &children,
        )
    }
}
