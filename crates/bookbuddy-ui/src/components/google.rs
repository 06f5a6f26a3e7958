//! "Sign in with Google" button backed by Google Identity Services.

use bookbuddy_types::PublicConfig;
use leptos::prelude::*;

/// Client settings the browser needs from the server.
#[server(prefix = "/rpc")]
pub async fn get_public_config() -> Result<PublicConfig, ServerFnError> {
    Ok(use_context::<PublicConfig>().unwrap_or_default())
}

/// Give up waiting for the GIS script after this many polls.
#[cfg(feature = "hydrate")]
const MAX_LOAD_ATTEMPTS: u32 = 40;

#[allow(unused_variables)]
#[component]
pub fn GoogleSignIn<S, E>(on_credential: S, on_error: E) -> impl IntoView
where
    S: Fn(String) + Clone + 'static,
    E: Fn() + Clone + 'static,
{
    let container = NodeRef::<leptos::html::Div>::new();
    let (clientId, setClientId) = signal(Option::<String>::None);
    let (attempt, setAttempt) = signal(0u32);

    #[cfg(feature = "hydrate")]
    {
        leptos::task::spawn_local(async move {
            match get_public_config().await {
                Ok(config) => setClientId.set(config.google_client_id),
                Err(e) => leptos::logging::error!("failed to load client config: {e}"),
            }
        });

        let mounted = StoredValue::new(false);
        Effect::new(move |_| {
            let tries = attempt.get();
            let Some(id) = clientId.get() else { return };
            let Some(element) = container.get() else { return };
            if mounted.get_value() {
                return;
            }
            if !gis::is_loaded() {
                if tries < MAX_LOAD_ATTEMPTS {
                    set_timeout(
                        move || setAttempt.update(|n| *n += 1),
                        std::time::Duration::from_millis(250),
                    );
                }
                return;
            }
            match gis::mount(&id, &element, on_credential.clone(), on_error.clone()) {
                Ok(()) => mounted.set_value(true),
                Err(e) => leptos::logging::error!("google sign-in unavailable: {e:?}"),
            }
        });
    }

    view! { <div class="google-signin" node_ref=container></div> }
}

#[cfg(feature = "hydrate")]
mod gis {
    use js_sys::{Object, Reflect};
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(js_namespace = ["google", "accounts", "id"], js_name = initialize)]
        fn initialize(config: &JsValue);

        #[wasm_bindgen(js_namespace = ["google", "accounts", "id"], js_name = renderButton)]
        fn render_button(parent: &web_sys::HtmlElement, options: &JsValue);

        #[wasm_bindgen(js_namespace = ["google", "accounts", "id"])]
        fn prompt();
    }

    pub fn is_loaded() -> bool {
        Reflect::get(&js_sys::global(), &JsValue::from_str("google"))
            .map(|google| !google.is_undefined())
            .unwrap_or(false)
    }

    fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), JsValue> {
        Reflect::set(target, &JsValue::from_str(key), value).map(|_| ())
    }

    pub fn mount<S, E>(
        clientId: &str,
        parent: &web_sys::HtmlElement,
        onCredential: S,
        onError: E,
    ) -> Result<(), JsValue>
    where
        S: Fn(String) + 'static,
        E: Fn() + 'static,
    {
        let callback = Closure::<dyn Fn(JsValue)>::new(move |response: JsValue| {
            let credential = Reflect::get(&response, &JsValue::from_str("credential"))
                .ok()
                .and_then(|value| value.as_string());
            match credential {
                Some(token) => onCredential(token),
                None => onError(),
            }
        });

        let config = Object::new();
        set(&config, "client_id", &JsValue::from_str(clientId))?;
        set(&config, "callback", callback.as_ref())?;
        initialize(&config);
        // GIS keeps the callback for the lifetime of the page.
        callback.forget();

        let options = Object::new();
        for (key, value) in [("theme", "outline"), ("size", "large"), ("text", "signin_with")] {
            set(&options, key, &JsValue::from_str(value))?;
        }
        set(&options, "width", &JsValue::from_f64(300.0))?;
        render_button(parent, &options);
        // One Tap
        prompt();
        Ok(())
    }
}
