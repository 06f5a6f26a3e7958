use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::{
    components::{Redirect, Route, Router, Routes},
    StaticSegment,
};

use crate::auth::AuthProvider;
use crate::components::guard::{ProtectedRoute, PublicRoute};
use crate::components::layout::Layout;
use crate::components::toast::ToastProvider;
use crate::pages::forgot_password::ForgotPasswordPage;
use crate::pages::home::HomePage;
use crate::pages::login::LoginPage;
use crate::pages::not_found::NotFoundPage;
use crate::pages::register::RegisterPage;

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <script src="https://accounts.google.com/gsi/client" defer></script>
                <AutoReload options=options.clone() />
                <HydrationScripts options />
                <MetaTags />
            </head>
            <body>
                <App />
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="BookBuddy" />
        <AuthProvider>
            <ToastProvider>
                <Router>
                    <Routes fallback=|| view! { <NotFoundPage /> }.into_any()>
                        <Route path=StaticSegment("") view=|| view! { <Redirect path="/login" /> } />
                        <Route path=StaticSegment("login") view=LoginView />
                        <Route path=StaticSegment("register") view=RegisterView />
                        <Route path=StaticSegment("forgot-password") view=ForgotPasswordView />
                        <Route path=StaticSegment("home") view=HomeView />
                    </Routes>
                </Router>
            </ToastProvider>
        </AuthProvider>
    }
}

#[component]
fn LoginView() -> impl IntoView {
    view! {
        <PublicRoute>
            <LoginPage />
        </PublicRoute>
    }
}

#[component]
fn RegisterView() -> impl IntoView {
    view! {
        <PublicRoute>
            <RegisterPage />
        </PublicRoute>
    }
}

#[component]
fn ForgotPasswordView() -> impl IntoView {
    view! {
        <PublicRoute>
            <ForgotPasswordPage />
        </PublicRoute>
    }
}

#[component]
fn HomeView() -> impl IntoView {
    view! {
        <ProtectedRoute>
            <Layout>
                <HomePage />
            </Layout>
        </ProtectedRoute>
    }
}
