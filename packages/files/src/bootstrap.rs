use crate::types::ProjectFile;

/// Manifest stub injected into every mount so the generated project is
/// runnable regardless of its own content. Declares the install/dev/start
/// scripts the lifecycle controller spawns and the minimal dependency set.
const BOOTSTRAP_MANIFEST: &str = r#"{
  "name": "sitewright-site",
  "version": "0.1.0",
  "private": true,
  "scripts": {
    "dev": "next dev",
    "build": "next build",
    "start": "next start"
  },
  "dependencies": {
    "next": "14.2.5",
    "react": "18.3.1",
    "react-dom": "18.3.1"
  }
}
"#;

/// Minimal framework config stub
const BOOTSTRAP_NEXT_CONFIG: &str = r#"/** @type {import('next').NextConfig} */
const nextConfig = {};

export default nextConfig;
"#;

/// The fixed bootstrap file set injected into every mount.
///
/// A project file at the same path replaces the stub (the generated output is
/// treated as already validated), so these only fill the gaps that would leave
/// the project unbootable.
pub fn bootstrap_files() -> Vec<ProjectFile> {
    vec![
        ProjectFile::new("package.json", BOOTSTRAP_MANIFEST),
        ProjectFile::new("next.config.mjs", BOOTSTRAP_NEXT_CONFIG),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_declares_dev_and_start_scripts() {
        let files = bootstrap_files();
        let manifest = files.iter().find(|f| f.path == "package.json").unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&manifest.content).unwrap();
        assert!(parsed["scripts"]["dev"].is_string());
        assert!(parsed["scripts"]["start"].is_string());
        assert!(parsed["dependencies"]["next"].is_string());
    }

    #[test]
    fn test_bootstrap_set_is_fixed() {
        let paths: Vec<String> = bootstrap_files().into_iter().map(|f| f.path).collect();
        assert_eq!(paths, vec!["package.json", "next.config.mjs"]);
    }
}
