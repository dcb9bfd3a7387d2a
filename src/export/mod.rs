use fs_err as fs;
use serde_json::{json, Value};
use std::io::{Cursor, Seek, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::bundle::GeneratedBundle;
use crate::errors::ExportError;
use crate::safety::filename_is_safe;

pub const MANIFEST_NAME: &str = "package.json";

#[derive(Debug, Clone)]
pub struct ArchiveSummary {
    pub path: PathBuf,
    pub entries: usize,
    pub bytes: u64,
}

#[derive(Debug, Clone)]
pub struct WriteSummary {
    pub dir: PathBuf,
    pub written: Vec<PathBuf>,
    pub bytes: u64,
}

/// `package.json`-style descriptor synthesized from the bundle.
pub fn manifest(bundle: &GeneratedBundle) -> Value {
    json!({
        "name": bundle.slug(),
        "version": "1.0.0",
        "description": bundle.description(),
        "main": bundle.entry_point().unwrap_or("index.html"),
        "scripts": bundle.scripts(),
        "dependencies": bundle.dependencies(),
        "keywords": bundle.template_kind().keywords(),
        "author": "VoiceAble Generator",
        "license": "MIT",
    })
}

pub fn archive_file_name(bundle: &GeneratedBundle) -> String {
    format!("{}.zip", bundle.slug())
}

/// Zip with every bundle file verbatim plus the manifest, which replaces any
/// `package.json` the bundle already carries.
pub fn archive_bytes(bundle: &GeneratedBundle) -> Result<Vec<u8>, ExportError> {
    let mut cursor = Cursor::new(Vec::new());
    write_archive(bundle, &mut cursor)?;
    Ok(cursor.into_inner())
}

/// Writes `<dest>/<slug>.zip`. The archive is assembled in a temporary file
/// next to the target and only then moved into place, so a failure leaves
/// nothing behind.
pub fn archive(bundle: &GeneratedBundle, dest: &Path) -> Result<ArchiveSummary, ExportError> {
    check_names(bundle)?;
    fs::create_dir_all(dest)?;
    let target = dest.join(archive_file_name(bundle));
    let data = archive_bytes(bundle)?;
    let mut tmp = NamedTempFile::new_in(dest)?;
    tmp.write_all(&data)?;
    tmp.flush()?;
    tmp.persist(&target).map_err(|e| ExportError::Io(e.error))?;

    let bytes = data.len() as u64;
    let entries = entry_names(bundle).len();
    tracing::info!(path = %target.display(), bytes, entries, "archive written");
    Ok(ArchiveSummary { path: target, entries, bytes })
}

fn entry_names(bundle: &GeneratedBundle) -> Vec<&str> {
    let mut names: Vec<&str> = bundle
        .files()
        .keys()
        .map(String::as_str)
        .filter(|n| *n != MANIFEST_NAME)
        .collect();
    names.push(MANIFEST_NAME);
    names
}

fn write_archive<W: Write + Seek>(bundle: &GeneratedBundle, out: W) -> Result<(), ExportError> {
    check_names(bundle)?;
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    let mut zip = ZipWriter::new(out);
    for (name, content) in bundle.files() {
        if name == MANIFEST_NAME {
            continue;
        }
        zip.start_file(name.as_str(), options)?;
        zip.write_all(content.as_bytes())?;
    }
    zip.start_file(MANIFEST_NAME, options)?;
    zip.write_all(serde_json::to_string_pretty(&manifest(bundle))?.as_bytes())?;
    zip.finish()?;
    Ok(())
}

fn check_names(bundle: &GeneratedBundle) -> Result<(), ExportError> {
    if bundle.entry_point().is_none() {
        return Err(ExportError::NoEntryPoint);
    }
    match bundle.files().keys().find(|n| !filename_is_safe(n)) {
        Some(bad) => Err(ExportError::UnsafeName(bad.clone())),
        None => Ok(()),
    }
}

/// Unpack the bundle (plus manifest) into `dir`, one atomic write per file.
pub fn write_files(bundle: &GeneratedBundle, dir: &Path) -> Result<WriteSummary, ExportError> {
    check_names(bundle)?;
    fs::create_dir_all(dir)?;
    let manifest_text = serde_json::to_string_pretty(&manifest(bundle))?;

    let mut written = Vec::new();
    let mut bytes = 0u64;
    let files = bundle
        .files()
        .iter()
        .filter(|(name, _)| name.as_str() != MANIFEST_NAME)
        .map(|(name, body)| (name.as_str(), body.as_str()))
        .chain(std::iter::once((MANIFEST_NAME, manifest_text.as_str())));

    for (name, body) in files {
        let abs = dir.join(name);
        if let Some(parent) = abs.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = NamedTempFile::new_in(abs.parent().unwrap_or(dir))?;
        fs::write(tmp.path(), body)?;
        tmp.persist(&abs).map_err(|e| ExportError::Io(e.error))?;
        bytes += body.len() as u64;
        written.push(abs);
    }

    Ok(WriteSummary { dir: dir.to_path_buf(), written, bytes })
}

/// Writes the bundle into `dir` (a fresh temporary directory when `None`)
/// and, when `open_browser` is set, opens the entry page with the system
/// handler. Returns the path of the entry page.
pub fn preview(bundle: &GeneratedBundle, dir: Option<&Path>, open_browser: bool) -> Result<PathBuf, ExportError> {
    let dir = match dir {
        Some(d) => d.to_path_buf(),
        None => tempfile::Builder::new()
            .prefix(&format!("voiceable-{}-", bundle.slug()))
            .tempdir()?
            .keep(),
    };
    write_files(bundle, &dir)?;
    let entry = dir.join(bundle.entry_point().ok_or(ExportError::NoEntryPoint)?);

    if open_browser {
        open::that(&entry).map_err(|e| ExportError::Open(format!("{}: {e}", entry.display())))?;
        tracing::info!(path = %entry.display(), "preview opened");
    }
    Ok(entry)
}

/// Human-readable setup and hosting guide.
pub fn deployment_instructions(bundle: &GeneratedBundle) -> String {
    let entry = bundle.entry_point().unwrap_or("index.html");
    let mut s = format!("# Deploying {}\n\n{}\n\n## Files\n", bundle.name(), bundle.description());
    for (name, body) in bundle.files().iter().filter(|(name, _)| name.as_str() != MANIFEST_NAME) {
        s.push_str(&format!("- {name} ({} bytes)\n", body.len()));
    }
    s.push_str(&format!("- {MANIFEST_NAME} (generated)\n"));

    for (title, items) in [("Features", bundle.features()), ("Accessibility", bundle.accessibility_features())] {
        if !items.is_empty() {
            s.push_str(&format!("\n## {title}\n"));
            for item in items {
                s.push_str(&format!("- {item}\n"));
            }
        }
    }

    s.push_str("\n## Run locally\n");
    s.push_str(&format!("1. Extract {}\n", archive_file_name(bundle)));
    s.push_str(&format!("2. Open {entry} in a modern web browser\n"));
    s.push_str("3. Optional: serve the folder, e.g. `python3 -m http.server 3000`, and visit http://localhost:3000\n");

    if !bundle.scripts().is_empty() {
        s.push_str("\n## Scripts\n");
        for (name, what) in bundle.scripts() {
            s.push_str(&format!("- {name}: {what}\n"));
        }
    }

    s.push_str("\n## Publish\n");
    s.push_str("- Netlify: drag the extracted folder onto https://app.netlify.com/drop\n");
    s.push_str("- Vercel: run `npx vercel` inside the folder\n");
    s.push_str(&format!(
        "- GitHub Pages: push the files to a repository and enable Pages for the branch; {entry} is served at the site root\n"
    ));
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::{BundleParts, TemplateKind};
    use crate::templates;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use std::io::Read;
    use zip::ZipArchive;

    fn bundle(files: &[(&str, &str)]) -> GeneratedBundle {
        GeneratedBundle::build(BundleParts {
            name: "Hello Tool".into(),
            description: "says hi".into(),
            template_kind: TemplateKind::Custom,
            files: files.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            scripts: BTreeMap::from([("start".to_string(), "Open index.html in a browser".to_string())]),
            ..Default::default()
        })
    }

    fn read_entries(bytes: Vec<u8>) -> BTreeMap<String, String> {
        let mut zip = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut out = BTreeMap::new();
        for i in 0..zip.len() {
            let mut f = zip.by_index(i).unwrap();
            let mut s = String::new();
            f.read_to_string(&mut s).unwrap();
            out.insert(f.name().to_string(), s);
        }
        out
    }

    #[test]
    fn archive_has_files_plus_manifest() {
        let b = bundle(&[("index.html", "<html></html>"), ("README.md", "hi")]);
        let entries = read_entries(archive_bytes(&b).unwrap());
        assert_eq!(entries.len(), 3);
        assert_eq!(entries["index.html"], "<html></html>");
        assert_eq!(entries["README.md"], "hi");

        let manifest: Value = serde_json::from_str(&entries[MANIFEST_NAME]).unwrap();
        assert_eq!(manifest["name"], "hello-tool");
        assert_eq!(manifest["main"], "index.html");
        assert_eq!(manifest["scripts"]["start"], "Open index.html in a browser");
    }

    #[test]
    fn bundled_manifest_is_replaced() {
        let b = bundle(&[("index.html", "<html></html>"), ("package.json", "{\"name\":\"x\"}")]);
        let entries = read_entries(archive_bytes(&b).unwrap());
        assert_eq!(entries.len(), 2);
        assert!(entries[MANIFEST_NAME].contains("hello-tool"));
    }

    #[test]
    fn unicode_content_is_preserved() {
        let text = "<p>Médicaments 薬 💊</p>";
        let b = bundle(&[("index.html", text)]);
        let entries = read_entries(archive_bytes(&b).unwrap());
        assert_eq!(entries["index.html"], text);
    }

    #[test]
    fn archive_to_disk_is_complete() {
        let dir = tempfile::tempdir().unwrap();
        let b = templates::generate("screen reader for news articles", TemplateKind::ScreenReader);
        let sum = archive(&b, dir.path()).unwrap();
        assert_eq!(sum.path, dir.path().join("screen-reader-news.zip"));
        assert_eq!(sum.entries, b.files().len() + 1);
        assert_eq!(sum.bytes, std::fs::metadata(&sum.path).unwrap().len());
        let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1, "no temporary files left behind");
    }

    #[test]
    fn unsafe_bundle_delivers_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let b = bundle(&[("index.html", "<html>"), ("../escape.js", "x")]);
        let err = archive(&b, dir.path()).unwrap_err();
        assert!(matches!(err, ExportError::UnsafeName(ref n) if n == "../escape.js"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
        // The bundle is untouched and can be retried elsewhere.
        assert_eq!(b.files().len(), 2);
    }

    #[test]
    fn bundle_without_html_is_refused() {
        let b = bundle(&[("README.md", "hi")]);
        assert!(matches!(archive_bytes(&b), Err(ExportError::NoEntryPoint)));
    }

    #[test]
    fn write_files_creates_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let b = bundle(&[("index.html", "<html>"), ("js/app.js", "1;")]);
        let sum = write_files(&b, dir.path()).unwrap();
        assert_eq!(sum.written.len(), 3);
        let on_disk: u64 = sum.written.iter().map(|p| std::fs::metadata(p).unwrap().len()).sum();
        assert_eq!(sum.bytes, on_disk);
        assert_eq!(std::fs::read_to_string(dir.path().join("js/app.js")).unwrap(), "1;");
        assert!(dir.path().join(MANIFEST_NAME).is_file());
    }

    #[test]
    fn preview_without_opening_writes_entry() {
        let dir = tempfile::tempdir().unwrap();
        let b = templates::generate("week planner", TemplateKind::Planner);
        let before = b.clone();
        let entry = preview(&b, Some(dir.path()), false).unwrap();
        assert_eq!(entry, dir.path().join("index.html"));
        assert_eq!(std::fs::read_to_string(&entry).unwrap(), b.files()["index.html"]);
        assert_eq!(b, before);
    }

    #[test]
    fn instructions_cover_files_and_scripts() {
        let b = bundle(&[("index.html", "<html></html>"), ("README.md", "hi")]);
        let text = deployment_instructions(&b);
        assert!(text.starts_with("# Deploying Hello Tool"));
        assert!(text.contains("- index.html (13 bytes)"));
        assert!(text.contains("- package.json (generated)"));
        assert!(text.contains("1. Extract hello-tool.zip"));
        assert!(text.contains("- start: Open index.html in a browser"));
        assert_eq!(text, deployment_instructions(&b));
    }

    #[test]
    fn preview_in_fresh_directory_outlives_the_call() {
        let b = templates::generate("week planner", TemplateKind::Planner);
        let entry = preview(&b, None, false).unwrap();
        assert!(entry.is_file());
        let dir = entry.parent().unwrap();
        assert!(dir.file_name().unwrap().to_string_lossy().starts_with("voiceable-week-planner-"));
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn instructions_list_manifest_once() {
        let b = bundle(&[("index.html", "<html></html>"), ("package.json", "{\"name\":\"x\"}")]);
        let text = deployment_instructions(&b);
        assert_eq!(text.matches("- package.json").count(), 1);
        assert!(text.contains("- package.json (generated)"));
    }

    #[test]
    fn instructions_include_template_features() {
        let b = templates::generate("screen reader for news articles", TemplateKind::ScreenReader);
        let text = deployment_instructions(&b);
        assert!(text.contains("\n## Features\n- "));
        assert!(text.contains("- Keyboard navigation"));
    }
}
