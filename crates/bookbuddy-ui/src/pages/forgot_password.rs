use std::time::Duration;

use bookbuddy_client::reset::{
    sanitize_otp, validate_new_password, validate_otp, ResetFlow, ResetStep, OTP_EXPIRED_MESSAGE,
    OTP_LENGTH,
};
use bookbuddy_client::FormError;
use bookbuddy_types::{ResetPasswordRequest, VerifyOtpRequest};
use leptos::{ev::SubmitEvent, prelude::*, task::spawn_local};
use leptos_router::components::Redirect;

use crate::auth::use_auth;
use crate::pages::failure_message;

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    let auth = use_auth();

    let flow = RwSignal::new(ResetFlow::new());
    let email = RwSignal::new(String::new());
    let otp = RwSignal::new(String::new());
    let newPassword = RwSignal::new(String::new());
    let confirmPassword = RwSignal::new(String::new());
    let error = RwSignal::new(String::new());
    let success = RwSignal::new(String::new());
    let loading = RwSignal::new(false);
    let finished = RwSignal::new(false);

    #[cfg(feature = "hydrate")]
    {
        use bookbuddy_client::reset::Tick;

        let countdown = move || {
            if !flow.with_untracked(ResetFlow::timer_active) {
                return;
            }
            let mut outcome = Tick::Idle;
            flow.update(|f| outcome = f.tick());
            if outcome == Tick::Expired {
                error.set(OTP_EXPIRED_MESSAGE.to_string());
            }
        };
        if let Ok(handle) = set_interval_with_handle(countdown, Duration::from_secs(1)) {
            on_cleanup(move || handle.clear());
        }
    }

    let clearMessages = move || {
        error.set(String::new());
        success.set(String::new());
    };

    let requestOtp = move |resend: bool| {
        clearMessages();
        let address = email.get_untracked().trim().to_string();
        if address.is_empty() {
            error.set(FormError::Required("Email").to_string());
            return;
        }

        loading.set(true);
        let client = auth.client();
        spawn_local(async move {
            match client.gateway().forgot_password(&address).await {
                Ok(()) => {
                    let message = if resend {
                        "New OTP sent to your email."
                    } else {
                        "OTP sent to your email. Please check your inbox."
                    };
                    success.set(message.to_string());
                    otp.set(String::new());
                    flow.update(ResetFlow::otp_sent);
                }
                Err(e) => {
                    let fallback = if resend { "Failed to resend OTP" } else { "Failed to send OTP" };
                    error.set(failure_message(&e, fallback));
                }
            }
            loading.set(false);
        });
    };

    let onSendOtp = move |ev: SubmitEvent| {
        ev.prevent_default();
        requestOtp(false);
    };

    let onVerifyOtp = move |ev: SubmitEvent| {
        ev.prevent_default();
        clearMessages();

        let code = otp.get_untracked();
        if let Err(e) = validate_otp(&code) {
            error.set(e.to_string());
            return;
        }
        if !flow.with_untracked(ResetFlow::can_verify) {
            error.set(OTP_EXPIRED_MESSAGE.to_string());
            return;
        }

        let request = VerifyOtpRequest {
            email: email.get_untracked().trim().to_string(),
            otp: code,
        };
        loading.set(true);
        let client = auth.client();
        spawn_local(async move {
            match client.gateway().verify_otp(&request).await {
                Ok(()) => {
                    success.set("OTP verified successfully!".to_string());
                    set_timeout(
                        move || {
                            flow.update(ResetFlow::otp_verified);
                            clearMessages();
                        },
                        Duration::from_secs(1),
                    );
                }
                Err(e) => error.set(failure_message(&e, "Invalid OTP")),
            }
            loading.set(false);
        });
    };

    let onResetPassword = move |ev: SubmitEvent| {
        ev.prevent_default();
        clearMessages();

        let password = newPassword.get_untracked();
        if let Err(e) = validate_new_password(&password, &confirmPassword.get_untracked()) {
            error.set(e.to_string());
            return;
        }

        let request = ResetPasswordRequest {
            email: email.get_untracked().trim().to_string(),
            otp: otp.get_untracked(),
            new_password: password,
        };
        loading.set(true);
        let client = auth.client();
        spawn_local(async move {
            match client.gateway().reset_password(&request).await {
                Ok(()) => {
                    success.set("Password reset successfully! Redirecting to login...".to_string());
                    flow.update(ResetFlow::completed);
                    set_timeout(move || finished.set(true), Duration::from_secs(2));
                }
                Err(e) => error.set(failure_message(&e, "Failed to reset password")),
            }
            loading.set(false);
        });
    };

    let onChangeEmail = move |_| {
        flow.update(ResetFlow::change_email);
        otp.set(String::new());
        clearMessages();
    };

    let step = move || flow.with(ResetFlow::step);

    let emailForm = move || {
        view! {
            <form class="auth-form" on:submit=onSendOtp>
                <div class="form-group">
                    <label for="email">"Email"</label>
                    <input
                        id="email"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=email
                        on:input=move |ev| email.set(event_target_value(&ev))
                        required
                    />
                </div>
                <button type="submit" class="btn btn-primary" disabled=move || loading.get()>
                    {move || if loading.get() { "Sending..." } else { "Send OTP" }}
                </button>
            </form>
        }
    };

    let verifyForm = move || {
        view! {
            <form class="auth-form" on:submit=onVerifyOtp>
                <Show when=move || flow.with(ResetFlow::timer_active)>
                    <div class="otp-timer">
                        {move || format!("OTP expires in: {}", flow.with(ResetFlow::countdown))}
                    </div>
                </Show>
                <div class="form-group">
                    <label>"Email"</label>
                    <input type="email" prop:value=email readonly />
                </div>
                <div class="form-group">
                    <label for="otp">"OTP"</label>
                    <input
                        id="otp"
                        type="text"
                        inputmode="numeric"
                        placeholder="Enter 6-digit OTP"
                        maxlength=OTP_LENGTH.to_string()
                        prop:value=otp
                        on:input=move |ev| otp.set(sanitize_otp(&event_target_value(&ev)))
                        required
                    />
                </div>
                <button
                    type="submit"
                    class="btn btn-primary"
                    disabled=move || loading.get() || !flow.with(ResetFlow::timer_active)
                >
                    {move || if loading.get() { "Verifying..." } else { "Verify OTP" }}
                </button>
                <button
                    type="button"
                    class="btn btn-secondary"
                    disabled=move || loading.get()
                    on:click=move |_| requestOtp(true)
                >
                    "Resend OTP"
                </button>
                <button type="button" class="btn btn-link" on:click=onChangeEmail>
                    "Change Email"
                </button>
            </form>
        }
    };

    let passwordForm = move || {
        view! {
            <form class="auth-form" on:submit=onResetPassword>
                <div class="form-group">
                    <label for="new-password">"New Password"</label>
                    <input
                        id="new-password"
                        type="password"
                        minlength="6"
                        prop:value=newPassword
                        on:input=move |ev| newPassword.set(event_target_value(&ev))
                        required
                    />
                </div>
                <div class="form-group">
                    <label for="confirm-password">"Confirm Password"</label>
                    <input
                        id="confirm-password"
                        type="password"
                        minlength="6"
                        prop:value=confirmPassword
                        on:input=move |ev| confirmPassword.set(event_target_value(&ev))
                        required
                    />
                </div>
                <button type="submit" class="btn btn-primary" disabled=move || loading.get()>
                    {move || if loading.get() { "Resetting..." } else { "Reset Password" }}
                </button>
            </form>
        }
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1 class="auth-title">"Reset Password"</h1>
                <p class="auth-subtitle">{move || step().title()}</p>

                <div class="step-indicator">
                    <span class=move || step_class(step(), ResetStep::Email)></span>
                    <span class=move || step_class(step(), ResetStep::Verify)></span>
                    <span class=move || step_class(step(), ResetStep::Password)></span>
                </div>

                <Show when=move || !error.get().is_empty()>
                    <div class="alert alert-error">{move || error.get()}</div>
                </Show>
                <Show when=move || !success.get().is_empty()>
                    <div class="alert alert-success">{move || success.get()}</div>
                </Show>

                {move || match step() {
                    ResetStep::Email => emailForm().into_any(),
                    ResetStep::Verify => verifyForm().into_any(),
                    ResetStep::Password => passwordForm().into_any(),
                }}

                <p class="auth-footer">
                    <a href="/login">"Back to Login"</a>
                </p>
                {move || finished.get().then(|| view! { <Redirect path="/login" /> })}
            </div>
        </div>
    }
}

fn step_class(current: ResetStep, marker: ResetStep) -> &'static str {
    let order = |step: ResetStep| match step {
        ResetStep::Email => 0,
        ResetStep::Verify => 1,
        ResetStep::Password => 2,
    };
    match order(current).cmp(&order(marker)) {
        std::cmp::Ordering::Equal => "step-dot step-current",
        std::cmp::Ordering::Greater => "step-dot step-done",
        std::cmp::Ordering::Less => "step-dot",
    }
}
