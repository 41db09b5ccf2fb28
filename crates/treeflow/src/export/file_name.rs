/// File name used when a title yields nothing usable.
pub const DEFAULT_FILE_NAME: &str = "flowchart.png";

/// Derive the PNG file name for a flowchart title.
///
/// The title is trimmed and lower-cased, and every run of whitespace (and
/// any path separator) becomes a single `_`.
///
/// # Examples
///
/// ```
/// use treeflow::export::file_name_for_title;
///
/// assert_eq!(file_name_for_title("Photosynthesis Process"), "photosynthesis_process.png");
/// assert_eq!(file_name_for_title("   "), "flowchart.png");
/// ```
pub fn file_name_for_title(title: &str) -> String {
    let stem = title
        .split(|c: char| c.is_whitespace() || c == '/' || c == '\\')
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_");

    if stem.is_empty() {
        DEFAULT_FILE_NAME.to_string()
    } else {
        format!("{stem}.png")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_joins_words() {
        assert_eq!(file_name_for_title("The Water Cycle"), "the_water_cycle.png");
    }

    #[test]
    fn test_whitespace_runs_collapse() {
        assert_eq!(file_name_for_title("  Big \t\n Idea  "), "big_idea.png");
    }

    #[test]
    fn test_path_separators_are_replaced() {
        assert_eq!(file_name_for_title("Input/Output"), "input_output.png");
        assert_eq!(file_name_for_title("..\\up"), ".._up.png");
    }

    #[test]
    fn test_empty_title_falls_back() {
        assert_eq!(file_name_for_title(""), DEFAULT_FILE_NAME);
        assert_eq!(file_name_for_title("/"), DEFAULT_FILE_NAME);
    }

    #[test]
    fn test_unicode_title() {
        assert_eq!(file_name_for_title("Ökosystem Wald"), "ökosystem_wald.png");
    }
}
