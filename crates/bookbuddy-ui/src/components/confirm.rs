use leptos::prelude::*;

/// Modal yes/no prompt shown while `open` is true.
#[component]
pub fn ConfirmDialog<C, X>(
    open: Signal<bool>,
    title: &'static str,
    description: &'static str,
    on_confirm: C,
    on_cancel: X,
) -> impl IntoView
where
    C: Fn() + Clone + Send + Sync + 'static,
    X: Fn() + Clone + Send + Sync + 'static,
{
    move || {
        if !open.get() {
            return view! { <div class="dialog-closed"></div> }.into_any();
        }
        let confirm = on_confirm.clone();
        let cancel = on_cancel.clone();
        view! {
            <div class="dialog-backdrop">
                <div class="dialog" role="alertdialog">
                    <h3 class="dialog-title">{title}</h3>
                    <p class="dialog-description">{description}</p>
                    <div class="dialog-actions">
                        <button class="btn btn-secondary" on:click=move |_| cancel()>
                            "Cancel"
                        </button>
                        <button class="btn btn-danger" on:click=move |_| confirm()>
                            "Continue"
                        </button>
                    </div>
                </div>
            </div>
        }
        .into_any()
    }
}
