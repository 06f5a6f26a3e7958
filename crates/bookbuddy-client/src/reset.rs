//! State of the three-step password reset: request an OTP, verify it, set a
//! new password.

use crate::error::FormError;

pub const OTP_LENGTH: usize = 6;
pub const OTP_LIFETIME_SECS: u32 = 600;
pub const MIN_PASSWORD_LEN: usize = 6;
pub const OTP_EXPIRED_MESSAGE: &str = "OTP expired. Please request a new one.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ResetStep {
    #[default]
    Email,
    Verify,
    Password,
}

impl ResetStep {
    pub fn title(self) -> &'static str {
        match self {
            ResetStep::Email => "Enter your email to receive OTP",
            ResetStep::Verify => "Enter the OTP sent to your email",
            ResetStep::Password => "Create your new password",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    Idle,
    Running(u32),
    Expired,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResetFlow {
    step: ResetStep,
    remaining_secs: u32,
    timer_active: bool,
}

impl Default for ResetFlow {
    fn default() -> Self {
        Self {
            step: ResetStep::Email,
            remaining_secs: OTP_LIFETIME_SECS,
            timer_active: false,
        }
    }
}

impl ResetFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> ResetStep {
        self.step
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn timer_active(&self) -> bool {
        self.timer_active
    }

    /// Verification is only possible while the OTP is still live.
    pub fn can_verify(&self) -> bool {
        self.step == ResetStep::Verify && self.timer_active
    }

    /// An OTP was sent or re-sent: (re)start the countdown on the verify step.
    pub fn otp_sent(&mut self) {
        self.step = ResetStep::Verify;
        self.remaining_secs = OTP_LIFETIME_SECS;
        self.timer_active = true;
    }

    pub fn otp_verified(&mut self) {
        self.step = ResetStep::Password;
    }

    /// The new password was accepted; the countdown no longer matters.
    pub fn completed(&mut self) {
        self.timer_active = false;
    }

    pub fn change_email(&mut self) {
        self.step = ResetStep::Email;
        self.timer_active = false;
    }

    /// Advances the countdown by one second.
    pub fn tick(&mut self) -> Tick {
        if !self.timer_active || self.remaining_secs == 0 {
            return Tick::Idle;
        }
        if self.remaining_secs <= 1 {
            self.remaining_secs = 0;
            self.timer_active = false;
            return Tick::Expired;
        }
        self.remaining_secs -= 1;
        Tick::Running(self.remaining_secs)
    }

    pub fn countdown(&self) -> String {
        format_countdown(self.remaining_secs)
    }
}

pub fn format_countdown(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Keeps only digits, at most [`OTP_LENGTH`] of them.
pub fn sanitize_otp(input: &str) -> String {
    input
        .chars()
        .filter(char::is_ascii_digit)
        .take(OTP_LENGTH)
        .collect()
}

pub fn validate_otp(otp: &str) -> Result<(), FormError> {
    if otp.len() == OTP_LENGTH && otp.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(FormError::InvalidOtp)
    }
}

pub fn validate_new_password(password: &str, confirmation: &str) -> Result<(), FormError> {
    if password != confirmation {
        return Err(FormError::PasswordMismatch);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(FormError::PasswordTooShort);
    }
    Ok(())
}
