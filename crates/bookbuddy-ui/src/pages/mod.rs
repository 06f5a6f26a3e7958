pub mod forgot_password;
pub mod home;
pub mod login;
pub mod not_found;
pub mod register;

use bookbuddy_client::ClientError;

pub const NETWORK_ERROR: &str = "Network error. Please try again.";

/// Inline text for a failed auth call: transport problems get a generic
/// retry hint, gateway rejections show the gateway's own message.
pub fn failure_message(error: &ClientError, fallback: &str) -> String {
    if error.is_network() {
        return NETWORK_ERROR.to_string();
    }
    error.gateway_message().unwrap_or(fallback).to_string()
}
