const FALLBACK_NAME: &str = "download";
const MAX_NAME_LEN: usize = 120;

/// Turn a server-supplied node name into a file name that is safe to create
/// inside the download directory on any platform.
pub fn safe_file_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let trimmed = replaced.trim_matches(&[' ', '.'][..]);

    let mut cleaned = if trimmed.is_empty() || trimmed.chars().all(|c| c == '_') {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    };
    if cleaned.chars().count() > MAX_NAME_LEN {
        cleaned = keep_extension_truncate(&cleaned);
    }
    if is_reserved_windows_name(&cleaned) {
        cleaned.insert(0, '_');
    }
    cleaned
}

fn keep_extension_truncate(name: &str) -> String {
    let (stem, extension) = match name.rsplit_once('.') {
        Some((stem, extension)) if extension.len() <= 10 && !stem.is_empty() => {
            (stem, Some(extension))
        }
        _ => (name, None),
    };
    let budget = MAX_NAME_LEN - extension.map_or(0, |ext| ext.chars().count() + 1);
    let mut shortened: String = stem.chars().take(budget).collect();
    if let Some(extension) = extension {
        shortened.push('.');
        shortened.push_str(extension);
    }
    shortened
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    let stem = name.split('.').next().unwrap_or(name);
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(stem))
}
