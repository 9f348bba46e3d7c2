//! assets.toml manifest parsing and batch export
//!
//! ```toml
//! [output]
//! dir = "build"
//!
//! [[meshes]]
//! id = "platform1"
//! path = "models/platforms.glb"
//! object = "platform1"
//! ```
//!
//! Every mesh entry is an independent export, so entries are built in parallel.

use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::formats::ExportSummary;
use crate::mesh::{convert_mesh, is_supported_mesh};
use vdf_common::VDF_EXTENSION;

/// assets.toml manifest structure
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssetsManifest {
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub meshes: Vec<MeshEntry>,
}

/// Output configuration section
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    /// Output directory, relative to the manifest. Default: the manifest's directory
    pub dir: Option<String>,
}

/// Single mesh entry
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MeshEntry {
    /// Output file stem (`<id>.vdf`)
    pub id: String,
    /// Source file, relative to the manifest
    pub path: String,

    /// Mesh name to extract from a glTF/GLB file.
    /// If not specified, uses the first mesh in the file.
    #[serde(default)]
    pub object: Option<String>,
}

/// A parsed manifest and the directory its relative paths resolve against
pub struct ManifestContext {
    pub manifest: AssetsManifest,
    pub project_dir: PathBuf,
}

impl ManifestContext {
    /// Directory exported files are written to
    pub fn output_dir(&self, override_dir: Option<&Path>) -> PathBuf {
        match (override_dir, &self.manifest.output.dir) {
            (Some(dir), _) => dir.to_path_buf(),
            (None, Some(dir)) => self.project_dir.join(dir),
            (None, None) => self.project_dir.clone(),
        }
    }
}

impl AssetsManifest {
    /// Parse manifest from string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse assets.toml")
    }
}

/// Load manifest from file
pub fn load_manifest(manifest_path: &Path) -> Result<ManifestContext> {
    let content = std::fs::read_to_string(manifest_path)
        .with_context(|| format!("Failed to read manifest: {}", manifest_path.display()))?;
    let manifest = AssetsManifest::parse(&content)?;

    let project_dir = manifest_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    Ok(ManifestContext {
        manifest,
        project_dir,
    })
}

/// Check ids and source paths without exporting anything
pub fn validate(ctx: &ManifestContext) -> Result<()> {
    let mut seen = HashSet::new();

    for entry in &ctx.manifest.meshes {
        if entry.id.trim().is_empty() {
            bail!("Mesh entry with path {:?} has an empty id", entry.path);
        }
        if entry.id.contains(['/', '\\']) {
            bail!("Mesh id {:?} must not contain path separators", entry.id);
        }
        if !seen.insert(entry.id.as_str()) {
            bail!("Duplicate mesh id {:?}", entry.id);
        }

        let source = ctx.project_dir.join(&entry.path);
        if !is_supported_mesh(&source) {
            bail!(
                "Mesh {:?}: unsupported source {:?} (use .obj, .gltf, or .glb)",
                entry.id,
                entry.path
            );
        }
        if !source.is_file() {
            bail!("Mesh {:?}: source not found: {}", entry.id, source.display());
        }
    }

    if ctx.manifest.meshes.is_empty() {
        tracing::warn!("Manifest declares no meshes");
    }

    Ok(())
}

/// Validate, then export every mesh entry
///
/// Entries are exported in parallel. All entries are attempted; if any fail the
/// returned error lists each failure. Successful outputs are kept.
pub fn build_all(
    ctx: &ManifestContext,
    output_override: Option<&Path>,
) -> Result<Vec<(String, ExportSummary)>> {
    validate(ctx)?;

    let out_dir = ctx.output_dir(output_override);
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let results: Vec<(String, Result<ExportSummary>)> = ctx
        .manifest
        .meshes
        .par_iter()
        .map(|entry| {
            let input = ctx.project_dir.join(&entry.path);
            let output = out_dir.join(format!("{}.{}", entry.id, VDF_EXTENSION));
            tracing::info!("Converting {:?} -> {:?}", input, output);
            let result = convert_mesh(&input, &output, entry.object.as_deref());
            (entry.id.clone(), result)
        })
        .collect();

    let mut built = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (id, result) in results {
        match result {
            Ok(summary) => built.push((id, summary)),
            Err(err) => failures.push(format!("  {}: {:#}", id, err)),
        }
    }

    if !failures.is_empty() {
        bail!(
            "{} of {} meshes failed:\n{}",
            failures.len(),
            ctx.manifest.meshes.len(),
            failures.join("\n")
        );
    }

    Ok(built)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const TRIANGLE_OBJ: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    fn context(content: &str, dir: &Path) -> ManifestContext {
        ManifestContext {
            manifest: AssetsManifest::parse(content).unwrap(),
            project_dir: dir.to_path_buf(),
        }
    }

    #[test]
    fn test_parse_manifest() {
        let manifest = AssetsManifest::parse(
            r#"
            [output]
            dir = "build"

            [[meshes]]
            id = "platform1"
            path = "models/platforms.glb"
            object = "platform1"

            [[meshes]]
            id = "crate"
            path = "models/crate.obj"
            "#,
        )
        .unwrap();

        assert_eq!(manifest.output.dir.as_deref(), Some("build"));
        assert_eq!(manifest.meshes.len(), 2);
        assert_eq!(manifest.meshes[0].object.as_deref(), Some("platform1"));
        assert!(manifest.meshes[1].object.is_none());
    }

    #[test]
    fn test_parse_empty_manifest() {
        let manifest = AssetsManifest::parse("").unwrap();
        assert!(manifest.meshes.is_empty());
        assert!(manifest.output.dir.is_none());
    }

    #[test]
    fn test_unknown_field_is_error() {
        let toml = "[[meshes]]\nid = \"a\"\npath = \"a.obj\"\nscale = 2\n";
        assert!(AssetsManifest::parse(toml).is_err());
    }

    #[test]
    fn test_output_dir() {
        let ctx = context("[output]\ndir = \"out\"\n", Path::new("project"));
        assert_eq!(ctx.output_dir(None), Path::new("project").join("out"));
        assert_eq!(ctx.output_dir(Some(Path::new("/tmp/x"))), Path::new("/tmp/x"));

        let ctx = context("", Path::new("project"));
        assert_eq!(ctx.output_dir(None), Path::new("project"));
    }

    #[test]
    fn test_validate_duplicate_ids() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.obj"), TRIANGLE_OBJ).unwrap();

        let ctx = context(
            "[[meshes]]\nid = \"a\"\npath = \"a.obj\"\n[[meshes]]\nid = \"a\"\npath = \"a.obj\"\n",
            dir.path(),
        );
        let err = validate(&ctx).unwrap_err();
        assert!(err.to_string().contains("Duplicate mesh id"));
    }

    #[test]
    fn test_validate_missing_and_unsupported_sources() {
        let dir = tempdir().unwrap();

        let ctx = context("[[meshes]]\nid = \"a\"\npath = \"a.obj\"\n", dir.path());
        assert!(validate(&ctx).unwrap_err().to_string().contains("not found"));

        let ctx = context("[[meshes]]\nid = \"a\"\npath = \"a.fbx\"\n", dir.path());
        assert!(validate(&ctx).unwrap_err().to_string().contains("unsupported"));

        let ctx = context("[[meshes]]\nid = \"\"\npath = \"a.obj\"\n", dir.path());
        assert!(validate(&ctx).unwrap_err().to_string().contains("empty id"));
    }

    #[test]
    fn test_build_all() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.obj"), TRIANGLE_OBJ).unwrap();
        std::fs::write(dir.path().join("b.obj"), TRIANGLE_OBJ).unwrap();

        let ctx = context(
            "[output]\ndir = \"build\"\n\
             [[meshes]]\nid = \"first\"\npath = \"a.obj\"\n\
             [[meshes]]\nid = \"second\"\npath = \"b.obj\"\n",
            dir.path(),
        );
        let built = build_all(&ctx, None).unwrap();

        assert_eq!(built.len(), 2);
        for (id, summary) in &built {
            let path = dir.path().join("build").join(format!("{}.vdf", id));
            assert_eq!(std::fs::metadata(&path).unwrap().len() as usize, summary.bytes_written);
            assert_eq!(summary.bytes_written, 32 + 36 + 36 + 6);
        }
    }

    #[test]
    fn test_build_all_reports_every_failure() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("good.obj"), TRIANGLE_OBJ).unwrap();
        std::fs::write(dir.path().join("bad1.obj"), "# empty\n").unwrap();
        std::fs::write(dir.path().join("bad2.obj"), "# empty\n").unwrap();

        let ctx = context(
            "[[meshes]]\nid = \"good\"\npath = \"good.obj\"\n\
             [[meshes]]\nid = \"bad1\"\npath = \"bad1.obj\"\n\
             [[meshes]]\nid = \"bad2\"\npath = \"bad2.obj\"\n",
            dir.path(),
        );
        let err = build_all(&ctx, None).unwrap_err().to_string();
        assert!(err.contains("2 of 3 meshes failed"));
        assert!(err.contains("bad1"));
        assert!(err.contains("bad2"));
        assert!(dir.path().join("good.vdf").exists());
    }
}
