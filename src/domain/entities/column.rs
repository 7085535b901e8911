/// A button rendered inside a commands column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnButton {
    pub name: String,
    pub text: String,
}

impl ColumnButton {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// One output column of a grid.
///
/// Property columns project a row onto a single field through a dot path.
/// Commands columns only carry buttons and never appear in row data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    Property { field: String, title: String },
    Commands { title: String, buttons: Vec<ColumnButton> },
}

impl Column {
    pub fn property(field: impl Into<String>, title: impl Into<String>) -> Self {
        Column::Property {
            field: field.into(),
            title: title.into(),
        }
    }

    pub fn commands(title: impl Into<String>, buttons: Vec<ColumnButton>) -> Self {
        Column::Commands {
            title: title.into(),
            buttons,
        }
    }

    pub fn field_path(&self) -> Option<&str> {
        match self {
            Column::Property { field, .. } => Some(field),
            Column::Commands { .. } => None,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Column::Property { title, .. } | Column::Commands { title, .. } => title,
        }
    }
}
