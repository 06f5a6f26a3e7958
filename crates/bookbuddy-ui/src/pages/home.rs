use bookbuddy_client::editor::BookEditor;
use bookbuddy_client::ClientError;
use bookbuddy_types::Book;
use leptos::{ev::SubmitEvent, prelude::*, task::spawn_local};

use crate::auth::use_auth;
use crate::components::confirm::ConfirmDialog;
use crate::components::toast::use_toasts;

/// Book operations only distinguish "could not reach the server" from
/// everything else.
fn book_error(error: &ClientError, fallback: &str) -> String {
    if error.is_network() {
        "Network error".to_string()
    } else {
        fallback.to_string()
    }
}

fn upload_error(error: &ClientError) -> String {
    if error.is_network() {
        return "Network error during upload".to_string();
    }
    format!(
        "Failed to upload Excel: {}",
        error.body_text().unwrap_or("Unknown error")
    )
}

#[cfg(feature = "hydrate")]
async fn read_file(file: &web_sys::File) -> Result<Vec<u8>, wasm_bindgen::JsValue> {
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer()).await?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

#[allow(unused_variables)]
#[component]
pub fn HomePage() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();

    let (books, setBooks) = signal(Vec::<Book>::new());
    let (loading, setLoading) = signal(true);
    let (error, setError) = signal(String::new());
    let editor = RwSignal::new(BookEditor::new());
    let deleteId = RwSignal::new(Option::<String>::None);
    let fileInput = NodeRef::<leptos::html::Input>::new();

    let fetchBooks = move || {
        setLoading.set(true);
        let client = auth.client();
        spawn_local(async move {
            match client.books().await {
                Ok(list) => setBooks.set(list),
                Err(e) => setError.set(book_error(&e, "Failed to fetch books")),
            }
            auth.sync();
            setLoading.set(false);
        });
    };

    #[cfg(feature = "hydrate")]
    fetchBooks();

    let onSubmit = move |ev: SubmitEvent| {
        ev.prevent_default();
        setError.set(String::new());

        let current = editor.get_untracked();
        if let Err(e) = current.validate() {
            setError.set(e.to_string());
            return;
        }

        let client = auth.client();
        spawn_local(async move {
            let result = client.save_book(current.editing_id(), &current.draft).await;
            auth.sync();
            match result {
                Ok(()) => {
                    toasts.success(current.success_message());
                    editor.update(BookEditor::reset);
                    fetchBooks();
                }
                Err(e) => setError.set(book_error(&e, "Failed to save book")),
            }
        });
    };

    let performDelete = move || {
        let Some(id) = deleteId.get_untracked() else {
            return;
        };
        deleteId.set(None);

        let client = auth.client();
        spawn_local(async move {
            let result = client.delete_book(&id).await;
            auth.sync();
            match result {
                Ok(()) => {
                    toasts.success("Delete was successful!");
                    fetchBooks();
                }
                Err(e) => setError.set(book_error(&e, "Failed to delete book")),
            }
        });
    };

    let onUpload = move |_| {
        #[cfg(feature = "hydrate")]
        {
            let Some(input) = fileInput.get() else {
                return;
            };
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                toasts.error("Please select an Excel file to upload.");
                return;
            };

            let client = auth.client();
            spawn_local(async move {
                let contents = match read_file(&file).await {
                    Ok(contents) => contents,
                    Err(e) => {
                        leptos::logging::error!("Upload error: {e:?}");
                        toasts.error("Network error during upload");
                        return;
                    }
                };
                let result = client.import_excel(&file.name(), contents).await;
                auth.sync();
                match result {
                    Ok(_) => {
                        toasts.success("Excel uploaded and data imported successfully!");
                        input.set_value("");
                        fetchBooks();
                    }
                    Err(e) => {
                        if e.is_network() {
                            leptos::logging::error!("Upload error: {e}");
                        }
                        toasts.error(upload_error(&e));
                    }
                }
            });
        }
    };

    view! {
        <div class="page-header">
            <h1>"📚 My Library"</h1>
            <p class="subtitle">{move || format!("Welcome back, {}!", auth.username())}</p>
        </div>

        <div class="library-grid">
            <section class="card">
                <h2 class="card-title">{move || editor.with(BookEditor::title)}</h2>
                <form class="book-form" on:submit=onSubmit>
                    <div class="form-group">
                        <label for="book-name">"Book Title"</label>
                        <input
                            id="book-name"
                            type="text"
                            placeholder="Enter book title"
                            prop:value=move || editor.with(|e| e.draft.name.clone())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                editor.update(|e| e.draft.name = value);
                            }
                            required
                        />
                    </div>
                    <div class="form-group">
                        <label for="book-author">"Author"</label>
                        <input
                            id="book-author"
                            type="text"
                            placeholder="Enter author name"
                            prop:value=move || editor.with(|e| e.draft.author.clone())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                editor.update(|e| e.draft.author = value);
                            }
                            required
                        />
                    </div>
                    <div class="form-actions">
                        <button type="submit" class="btn btn-primary">
                            {move || editor.with(BookEditor::submit_label)}
                        </button>
                        <Show when=move || editor.with(BookEditor::is_editing)>
                            <button
                                type="button"
                                class="btn btn-secondary"
                                on:click=move |_| editor.update(BookEditor::reset)
                            >
                                "Cancel"
                            </button>
                        </Show>
                    </div>
                    <Show when=move || !error.get().is_empty()>
                        <p class="form-error">{move || error.get()}</p>
                    </Show>
                </form>

                <div class="upload">
                    <input type="file" accept=".xlsx, .xls" node_ref=fileInput />
                    <button class="btn btn-primary" on:click=onUpload>
                        "Upload Excel"
                    </button>
                </div>
            </section>

            <section class="card">
                <h2 class="card-title">{move || format!("Your Books ({})", books.with(Vec::len))}</h2>
                {move || {
                    if loading.get() {
                        return view! { <p class="empty-state">"Loading books..."</p> }.into_any();
                    }
                    if books.with(Vec::is_empty) {
                        return view! {
                            <p class="empty-state">"No books yet. Add your first book!"</p>
                        }
                        .into_any();
                    }
                    view! {
                        <table class="book-table">
                            <thead>
                                <tr>
                                    <th>"Title"</th>
                                    <th>"Author"</th>
                                    <th>"Actions"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <For
                                    each=move || books.get()
                                    key=|book| book.id.clone()
                                    let:book
                                >
                                    {
                                        let editTarget = book.clone();
                                        let deleteTarget = book.id.clone();
                                        view! {
                                            <tr>
                                                <td class="book-name">{book.name.clone()}</td>
                                                <td>{book.author.clone()}</td>
                                                <td class="row-actions">
                                                    <button
                                                        class="btn btn-small btn-secondary"
                                                        on:click=move |_| {
                                                            editor.update(|e| e.begin_edit(&editTarget))
                                                        }
                                                    >
                                                        "Edit"
                                                    </button>
                                                    <button
                                                        class="btn btn-small btn-danger"
                                                        on:click=move |_| {
                                                            deleteId.set(Some(deleteTarget.clone()))
                                                        }
                                                    >
                                                        "Delete"
                                                    </button>
                                                </td>
                                            </tr>
                                        }
                                    }
                                </For>
                            </tbody>
                        </table>
                    }
                    .into_any()
                }}
            </section>
        </div>

        <ConfirmDialog
            open=Signal::derive(move || deleteId.with(Option::is_some))
            title="Are you absolutely sure?"
            description="This action cannot be undone. This will permanently delete the book from your library."
            on_confirm=performDelete
            on_cancel=move || deleteId.set(None)
        />
    }
}
