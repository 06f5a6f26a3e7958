use bookbuddy_client::reset::validate_new_password;
use bookbuddy_client::FormError;
use bookbuddy_types::RegisterRequest;
use leptos::{ev::SubmitEvent, prelude::*, task::spawn_local};
use leptos_router::{hooks::use_navigate, NavigateOptions};

use crate::auth::use_auth;
use crate::components::guard::DEFAULT_LANDING;
use crate::pages::failure_message;

fn validate(username: &str, email: &str, password: &str, confirmation: &str) -> Result<(), FormError> {
    if username.trim().is_empty() {
        return Err(FormError::Required("Username"));
    }
    if email.trim().is_empty() {
        return Err(FormError::Required("Email"));
    }
    validate_new_password(password, confirmation)
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();

    let (username, setUsername) = signal(String::new());
    let (email, setEmail) = signal(String::new());
    let (password, setPassword) = signal(String::new());
    let (confirmPassword, setConfirmPassword) = signal(String::new());
    let (error, setError) = signal(String::new());
    let (loading, setLoading) = signal(false);

    let onSubmit = move |ev: SubmitEvent| {
        ev.prevent_default();
        setError.set(String::new());

        let request = RegisterRequest {
            username: username.get_untracked().trim().to_string(),
            email: email.get_untracked().trim().to_string(),
            password: password.get_untracked(),
        };
        if let Err(e) = validate(
            &request.username,
            &request.email,
            &request.password,
            &confirmPassword.get_untracked(),
        ) {
            setError.set(e.to_string());
            return;
        }

        setLoading.set(true);
        let client = auth.client();
        let navigate = navigate.clone();
        spawn_local(async move {
            let result = client.register(&request).await;
            auth.sync();
            match result {
                Ok(_) => navigate(
                    DEFAULT_LANDING,
                    NavigateOptions {
                        replace: true,
                        ..Default::default()
                    },
                ),
                Err(e) => setError.set(failure_message(&e, "Registration failed")),
            }
            setLoading.set(false);
        });
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1 class="auth-title">"📚 BookBuddy"</h1>
                <p class="auth-subtitle">"Create your account"</p>

                <Show when=move || !error.get().is_empty()>
                    <div class="alert alert-error">{move || error.get()}</div>
                </Show>

                <form class="auth-form" on:submit=onSubmit>
                    <div class="form-group">
                        <label for="username">"Username"</label>
                        <input
                            id="username"
                            type="text"
                            prop:value=username
                            on:input=move |ev| setUsername.set(event_target_value(&ev))
                            required
                        />
                    </div>
                    <div class="form-group">
                        <label for="email">"Email"</label>
                        <input
                            id="email"
                            type="email"
                            prop:value=email
                            on:input=move |ev| setEmail.set(event_target_value(&ev))
                            required
                        />
                    </div>
                    <div class="form-group">
                        <label for="password">"Password"</label>
                        <input
                            id="password"
                            type="password"
                            prop:value=password
                            on:input=move |ev| setPassword.set(event_target_value(&ev))
                            required
                        />
                    </div>
                    <div class="form-group">
                        <label for="confirm-password">"Confirm Password"</label>
                        <input
                            id="confirm-password"
                            type="password"
                            prop:value=confirmPassword
                            on:input=move |ev| setConfirmPassword.set(event_target_value(&ev))
                            required
                        />
                    </div>
                    <button type="submit" class="btn btn-primary" disabled=move || loading.get()>
                        {move || if loading.get() { "Creating account..." } else { "Sign Up" }}
                    </button>
                </form>

                <p class="auth-footer">
                    "Already have an account? " <a href="/login">"Sign in"</a>
                </p>
            </div>
        </div>
    }
}
