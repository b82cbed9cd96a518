use crate::types::ProjectFile;

/// Concatenate the project files into the single downloadable text blob the
/// UI offers as an export: one `=== path ===` banner per file, in input order.
pub fn export_project(files: &[ProjectFile]) -> String {
    let mut out = String::new();
    for file in files {
        out.push_str(&format!("\n\n=== {} ===\n{}", file.path, file.content));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_export_format() {
        let files = vec![
            ProjectFile::new("package.json", "{}"),
            ProjectFile::new("src/app/page.tsx", "export default 1"),
        ];

        let blob = export_project(&files);
        assert_eq!(
            blob,
            "\n\n=== package.json ===\n{}\n\n=== src/app/page.tsx ===\nexport default 1"
        );
    }

    #[test]
    fn test_export_empty_list() {
        assert_eq!(export_project(&[]), "");
    }
}
