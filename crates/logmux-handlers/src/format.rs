//! Helpers for formatting call site attributes

/// Strip the directory part of a source file path
pub fn extract_file_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(pos) => &path[pos + 1..],
        None => path,
    }
}

/// Strip the return type and argument list from a function signature
///
/// `"int app::main(int, char**)"` becomes `"app::main"`.
pub fn extract_func_name(signature: &str) -> &str {
    let end = signature.find('(').unwrap_or(signature.len());
    let head = &signature[..end];
    match head.rfind(' ') {
        Some(pos) => &head[pos + 1..],
        None => head,
    }
}
