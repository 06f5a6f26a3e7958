use bookbuddy_types::{Book, BookDraft};

use crate::error::FormError;

/// Add/edit form state for the book list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BookEditor {
    editing: Option<Book>,
    pub draft: BookDraft,
}

impl BookEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_edit(&mut self, book: &Book) {
        self.draft = BookDraft::from(book);
        self.editing = Some(book.clone());
    }

    /// Drops the edit target and clears the form. Also used after a save.
    pub fn reset(&mut self) {
        self.editing = None;
        self.draft = BookDraft::default();
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing.as_ref().map(|book| book.id.as_str())
    }

    pub fn title(&self) -> &'static str {
        if self.is_editing() {
            "Edit Book"
        } else {
            "Add New Book"
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_editing() {
            "Update Book"
        } else {
            "Add Book"
        }
    }

    pub fn success_message(&self) -> &'static str {
        if self.is_editing() {
            "Edit was successful!"
        } else {
            "Book added successfully!"
        }
    }

    /// Both fields are required, matching the form's `required` inputs.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.draft.name.trim().is_empty() {
            return Err(FormError::Required("Book title"));
        }
        if self.draft.author.trim().is_empty() {
            return Err(FormError::Required("Author"));
        }
        Ok(())
    }
}
