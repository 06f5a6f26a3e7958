use leptos::{ev::SubmitEvent, prelude::*, task::spawn_local};
use leptos_router::{
    hooks::{use_navigate, use_query_map},
    NavigateOptions,
};

use crate::auth::use_auth;
use crate::components::google::GoogleSignIn;
use crate::components::guard::login_target;
use crate::pages::failure_message;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    let query = use_query_map();

    let (email, setEmail) = signal(String::new());
    let (password, setPassword) = signal(String::new());
    let (error, setError) = signal(String::new());
    let (loading, setLoading) = signal(false);

    let destination = move || login_target(query.with_untracked(|q| q.get("from")).as_deref());

    let goHome = {
        let navigate = navigate.clone();
        move || {
            navigate(
                &destination(),
                NavigateOptions {
                    replace: true,
                    ..Default::default()
                },
            )
        }
    };

    let onSubmit = {
        let goHome = goHome.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            setError.set(String::new());
            setLoading.set(true);

            let client = auth.client();
            let goHome = goHome.clone();
            spawn_local(async move {
                let result = client
                    .sign_in(&email.get_untracked(), &password.get_untracked())
                    .await;
                auth.sync();
                match result {
                    Ok(_) => goHome(),
                    Err(e) => setError.set(failure_message(&e, "Login failed")),
                }
                setLoading.set(false);
            });
        }
    };

    let onGoogleCredential = move |idToken: String| {
        setError.set(String::new());
        setLoading.set(true);

        let client = auth.client();
        let goHome = goHome.clone();
        spawn_local(async move {
            let result = client.sign_in_with_google(&idToken).await;
            auth.sync();
            match result {
                Ok(_) => goHome(),
                Err(e) => setError.set(failure_message(&e, "Google authentication failed")),
            }
            setLoading.set(false);
        });
    };

    let onGoogleError = move || setError.set("Google sign-in was cancelled or failed".to_string());

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1 class="auth-title">"📚 BookBuddy"</h1>
                <p class="auth-subtitle">"Welcome back to your library"</p>

                <GoogleSignIn on_credential=onGoogleCredential on_error=onGoogleError />

                <div class="divider"><span>"OR"</span></div>

                <form class="auth-form" on:submit=onSubmit>
                    <div class="form-group">
                        <input
                            type="email"
                            placeholder="Email"
                            prop:value=email
                            on:input=move |ev| setEmail.set(event_target_value(&ev))
                            required
                        />
                    </div>
                    <div class="form-group">
                        <input
                            type="password"
                            placeholder="Password"
                            prop:value=password
                            on:input=move |ev| setPassword.set(event_target_value(&ev))
                            required
                        />
                    </div>
                    <div class="form-links">
                        <a href="/forgot-password">"Forgot password?"</a>
                    </div>
                    <Show when=move || !error.get().is_empty()>
                        <div class="alert alert-error">{move || error.get()}</div>
                    </Show>
                    <button type="submit" class="btn btn-primary" disabled=move || loading.get()>
                        {move || if loading.get() { "Signing in..." } else { "Sign In with Email" }}
                    </button>
                </form>

                <p class="auth-footer">
                    "Don't have an account? " <a href="/register">"Sign up here"</a>
                </p>
            </div>
        </div>
    }
}
