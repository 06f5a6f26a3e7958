//! Reactive wrapper around the session so views re-render on sign-in and
//! sign-out.

use bookbuddy_client::{GatewayClient, LibraryClient, Session};
use bookbuddy_types::User;
use leptos::prelude::*;

#[cfg(feature = "hydrate")]
pub type AppStore = bookbuddy_client::BrowserStore;
#[cfg(not(feature = "hydrate"))]
pub type AppStore = bookbuddy_client::MemoryStore;

pub type AppClient = LibraryClient<AppStore>;

#[derive(Clone, Copy)]
pub struct AuthContext {
    user: RwSignal<Option<User>>,
    ready: RwSignal<bool>,
    client: StoredValue<AppClient, LocalStorage>,
}

impl AuthContext {
    pub fn username(&self) -> String {
        self.user
            .with(|user| user.as_ref().map(|u| u.username.clone()))
            .unwrap_or_default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.with(Option::is_some)
    }

    /// False until the stored session has been read in the browser.
    pub fn is_ready(&self) -> bool {
        self.ready.get()
    }

    pub fn client(&self) -> AppClient {
        self.client.get_value()
    }

    /// Copies the session's current user into the signal. Call after any
    /// client operation that may have signed in, refreshed, or signed out.
    pub fn sync(&self) {
        let user = self.client.with_value(|client| client.session().user());
        self.user.set(user);
    }

    pub fn logout(&self) {
        self.client.with_value(|client| client.sign_out());
        self.user.set(None);
    }
}

fn gateway_origin() -> String {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window()
            .and_then(|window| window.location().origin().ok())
            .unwrap_or_default()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        String::from("http://localhost")
    }
}

#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    let client = LibraryClient::new(
        Session::new(AppStore::default()),
        GatewayClient::new(gateway_origin()),
    );
    let ctx = AuthContext {
        user: RwSignal::new(None),
        ready: RwSignal::new(false),
        client: StoredValue::new_local(client),
    };
    provide_context(ctx);

    // Effects only run in the browser, after hydration.
    Effect::new(move |_| {
        let restored = ctx.client.with_value(|client| client.session().restore());
        ctx.user.set(restored);
        ctx.ready.set(true);
    });

    children()
}

pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}
