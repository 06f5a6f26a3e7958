use leptos::prelude::*;

use crate::auth::use_auth;

#[component]
pub fn Layout(children: Children) -> impl IntoView {
    let auth = use_auth();

    view! {
        <div class="app-layout">
            <nav class="top-nav">
                <a class="nav-brand" href="/home">"📚 My Library"</a>
                <div class="nav-user">
                    <span class="nav-greeting">{move || format!("Welcome, {}!", auth.username())}</span>
                    <button class="btn btn-secondary" on:click=move |_| auth.logout()>
                        "Sign Out"
                    </button>
                </div>
            </nav>
            <main class="main-content">{children()}</main>
        </div>
    }
}
