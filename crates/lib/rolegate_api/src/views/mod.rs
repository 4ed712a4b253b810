//! JSON view models for the admin screens.
//!
//! Each screen is a [`Page`] whose body is a grid, a detail view or a form.
//! Display values are computed from the record passed in; nothing here
//! reads global state.

pub mod permissions;
pub mod roles;

use serde::Serialize;

/// Page envelope shared by every admin screen.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub header: String,
    pub description: String,
    pub breadcrumb: Vec<Crumb>,
    pub body: T,
}

#[derive(Debug, Clone, Serialize)]
pub struct Crumb {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Crumb {
    pub fn link(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: Some(url.into()),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: None,
        }
    }
}

/// Which screen of a resource a page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    List,
    Detail,
    Edit,
    Create,
}

impl Screen {
    fn description(self) -> &'static str {
        match self {
            Screen::List => "List",
            Screen::Detail => "Detail",
            Screen::Edit => "Edit",
            Screen::Create => "Create",
        }
    }

    fn crumb(self) -> &'static str {
        match self {
            Screen::List => "Listing",
            Screen::Detail => "View",
            Screen::Edit => "Editing",
            Screen::Create => "New",
        }
    }
}

/// Build the page envelope for a resource screen.
///
/// `index_url` is the resource listing path without the admin prefix, as the
/// breadcrumb links are resolved relative to it.
pub fn page<T>(title: &str, index_url: &str, screen: Screen, id: Option<i64>, body: T) -> Page<T> {
    let mut breadcrumb = vec![Crumb::link(title, index_url), Crumb::text(screen.crumb())];
    if let Some(id) = id {
        breadcrumb.push(Crumb::text(id.to_string()));
    }
    Page {
        header: title.to_string(),
        description: screen.description().to_string(),
        breadcrumb,
        body,
    }
}

/// Grid column descriptor.
#[derive(Debug, Clone, Serialize)]
pub struct Column {
    pub name: &'static str,
    pub label: &'static str,
    pub sortable: bool,
}

impl Column {
    pub const fn new(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            sortable: false,
        }
    }

    pub const fn sortable(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            sortable: true,
        }
    }
}

/// Tools available for selected rows. Bulk delete is never offered.
#[derive(Debug, Clone, Serialize)]
pub struct BatchActions {
    pub delete: bool,
}

impl BatchActions {
    pub const fn without_delete() -> Self {
        Self { delete: false }
    }
}

/// Per-row action switches.
#[derive(Debug, Clone, Serialize)]
pub struct RowActions {
    pub view: bool,
    pub edit: bool,
    pub delete: bool,
}

impl RowActions {
    pub const fn all() -> Self {
        Self {
            view: true,
            edit: true,
            delete: true,
        }
    }
}

/// Listing grid.
#[derive(Debug, Clone, Serialize)]
pub struct Grid<R> {
    pub columns: Vec<Column>,
    pub rows: Vec<GridRow<R>>,
    pub batch_actions: BatchActions,
}

#[derive(Debug, Clone, Serialize)]
pub struct GridRow<R> {
    #[serde(flatten)]
    pub record: R,
    pub actions: RowActions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    Display,
    Text,
    Textarea,
    MultipleSelect,
    Listbox,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectOption {
    pub value: serde_json::Value,
    pub label: String,
}

/// One input of a create/edit form.
#[derive(Debug, Clone, Serialize)]
pub struct FormField {
    pub kind: FieldKind,
    pub name: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    pub value: serde_json::Value,
}

impl FormField {
    pub fn new(kind: FieldKind, name: &'static str, label: &'static str) -> Self {
        Self {
            kind,
            name,
            label,
            rules: Vec::new(),
            help: None,
            options: Vec::new(),
            value: serde_json::Value::Null,
        }
    }

    pub fn required(mut self) -> Self {
        self.rules.push("required");
        self
    }

    pub fn help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }

    pub fn options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    pub fn value(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.value = value.into();
        self
    }
}

/// Create or edit form.
#[derive(Debug, Clone, Serialize)]
pub struct Form {
    /// Where the form submits to.
    pub action: String,
    /// `POST` for create, `PUT` for update.
    pub method: &'static str,
    pub fields: Vec<FormField>,
}

/// Detail view: ordered label/value pairs.
#[derive(Debug, Clone, Serialize)]
pub struct Detail {
    pub fields: Vec<DetailField>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailField {
    pub name: &'static str,
    pub label: &'static str,
    pub value: serde_json::Value,
}

impl DetailField {
    pub fn new(name: &'static str, label: &'static str, value: impl Into<serde_json::Value>) -> Self {
        Self {
            name,
            label,
            value: value.into(),
        }
    }
}
