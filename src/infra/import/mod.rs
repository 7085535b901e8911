pub mod csv;
pub mod xlsx;

fn dataset_name(path: &std::path::Path, fallback: &str) -> String {
    path.file_stem()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(fallback)
        .to_string()
}
