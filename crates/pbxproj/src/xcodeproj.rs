//! `.xcodeproj` bundles on disk
//!
//! A bundle is a directory holding `project.pbxproj` (plus workspace and
//! scheme data, which are not read here).

use crate::error::{ProjError, Result};
use crate::proj::PbxProj;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const PBXPROJ_FILE: &str = "project.pbxproj";

/// An opened Xcode project bundle
#[derive(Debug, Clone)]
pub struct XcodeProj {
    /// Path of the `.xcodeproj` directory
    pub path: PathBuf,
    pub pbxproj: PbxProj,
}

impl XcodeProj {
    /// Open a bundle and decode its `project.pbxproj`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ProjError::FileNotFound(path.to_path_buf()));
        }
        let pbxproj_path = Self::pbxproj_path(path);
        if !pbxproj_path.is_file() {
            return Err(ProjError::PbxprojNotFound(path.to_path_buf()));
        }

        let bytes = fs::read(&pbxproj_path)?;
        let mut pbxproj = PbxProj::from_bytes(&bytes)?;
        if let Some(name) = path.file_stem().and_then(|s| s.to_str()) {
            pbxproj.set_project_name(name);
        }
        info!(
            path = %path.display(),
            objects = pbxproj.objects.len(),
            "Opened project"
        );

        Ok(Self {
            path: path.to_path_buf(),
            pbxproj,
        })
    }

    /// `project.pbxproj` inside a bundle
    pub fn pbxproj_path(bundle: &Path) -> PathBuf {
        bundle.join(PBXPROJ_FILE)
    }

    /// Directory containing the bundle, which `SOURCE_ROOT` paths are relative to
    pub fn source_root(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Write the project back to the bundle it was opened from
    pub fn save(&self) -> Result<()> {
        self.write(&self.path)
    }

    /// Write the project into the bundle at `bundle`, creating it if needed.
    ///
    /// The text is rendered in full, written to a temporary file next to the
    /// destination, then renamed over it.
    pub fn write(&self, bundle: &Path) -> Result<()> {
        fs::create_dir_all(bundle)?;
        let target = Self::pbxproj_path(bundle);
        let text = self.pbxproj.encode();

        let temp_path = target.with_extension("pbxproj.tmp");
        fs::write(&temp_path, text.as_bytes())?;
        if let Err(e) = fs::rename(&temp_path, &target) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        debug!(bytes = text.len(), "Rendered project file");
        info!(path = %target.display(), "Saved project");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PROJECT: &str = r#"// !$*UTF8*$!
{
	archiveVersion = 1;
	classes = {
	};
	objectVersion = 50;
	objects = {
		CL_1 = {isa = XCConfigurationList; buildConfigurations = (); };
		G_1 = {isa = PBXGroup; children = (); sourceTree = "<group>"; };
		P_1 = {isa = PBXProject; buildConfigurationList = CL_1; mainGroup = G_1; targets = (); };
	};
	rootObject = P_1;
}
"#;

    fn bundle(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("Demo.xcodeproj");
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("project.pbxproj"), PROJECT).unwrap();
        path
    }

    #[test]
    fn test_open_names_project_after_bundle() {
        let dir = TempDir::new().unwrap();
        let project = XcodeProj::open(bundle(&dir)).unwrap();
        assert_eq!(project.pbxproj.root_project().unwrap().name, "Demo");
        assert_eq!(project.source_root(), dir.path());
    }

    #[test]
    fn test_open_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("Nope.xcodeproj");
        assert!(matches!(
            XcodeProj::open(&missing),
            Err(ProjError::FileNotFound(_))
        ));

        fs::create_dir_all(&missing).unwrap();
        assert!(matches!(
            XcodeProj::open(&missing),
            Err(ProjError::PbxprojNotFound(_))
        ));
    }

    #[test]
    fn test_save_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = bundle(&dir);
        let project = XcodeProj::open(&path).unwrap();
        project.save().unwrap();

        let written = fs::read_to_string(path.join("project.pbxproj")).unwrap();
        assert!(written.starts_with("// !$*UTF8*$!\n{\n"));
        assert!(written.contains("Build configuration list for PBXProject \"Demo\""));
        assert!(!path.join("project.pbxproj.tmp").exists());

        let reopened = XcodeProj::open(&path).unwrap();
        assert_eq!(reopened.pbxproj, project.pbxproj);
    }

    #[test]
    fn test_write_creates_bundle() {
        let dir = TempDir::new().unwrap();
        let project = XcodeProj::open(bundle(&dir)).unwrap();
        let copy = dir.path().join("Copy.xcodeproj");
        project.write(&copy).unwrap();
        assert!(copy.join("project.pbxproj").is_file());
    }
}
