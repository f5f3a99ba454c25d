//! The decoded contents of a `project.pbxproj` file

use crate::encoder::PbxProjEncoder;
use crate::error::{ProjError, Result};
use crate::objects::fields::Fields;
use crate::objects::{Number, Object, Project};
use crate::plist::{self, Dictionary, Value};
use crate::reference::Reference;
use crate::store::Objects;
use tracing::debug;

/// Archive header, root reference and object store of a project file
#[derive(Debug, Clone, PartialEq)]
pub struct PbxProj {
    pub archive_version: Number,
    pub object_version: Number,
    /// Kept verbatim; Xcode always writes it empty
    pub classes: Dictionary,
    /// Reference of the `PBXProject` node
    pub root_object: Reference,
    pub objects: Objects,
}

impl PbxProj {
    /// Read and decode a property list document (ASCII, XML or binary)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::decode(&plist::read(bytes)?)
    }

    /// Decode the root dictionary of a project file.
    ///
    /// All objects are decoded into a fresh store, which is only returned
    /// when every one of them decodes.
    pub fn decode(value: &Value) -> Result<Self> {
        let root = value.as_dictionary().ok_or_else(|| ProjError::InvalidValue {
            field: "PBXProj".to_string(),
            expected: "a dictionary at the document root",
        })?;
        let fields = Fields::new("PBXProj", root);

        let mut objects = Objects::new();
        if let Some(entries) = root.get("objects") {
            let entries = entries.as_dictionary().ok_or_else(|| ProjError::InvalidValue {
                field: "PBXProj.objects".to_string(),
                expected: "a dictionary",
            })?;
            for (reference, entry) in entries {
                let reference = Reference::from(reference.as_str());
                let dict = entry.as_dictionary().ok_or_else(|| ProjError::InvalidValue {
                    field: format!("PBXProj.objects.{reference}"),
                    expected: "a dictionary",
                })?;
                let object = Object::decode(&reference, dict)?;
                objects.add(object, reference);
            }
        }

        let proj = Self {
            archive_version: fields
                .number("archiveVersion")?
                .unwrap_or_else(|| Number::from(1)),
            object_version: fields
                .number("objectVersion")?
                .unwrap_or_else(|| Number::from(0)),
            classes: fields.dictionary("classes")?.unwrap_or_default(),
            root_object: fields.required_reference("rootObject")?,
            objects,
        };
        debug!(
            objects = proj.objects.len(),
            object_version = %proj.object_version,
            "Decoded project graph"
        );
        Ok(proj)
    }

    /// Replace the graph with a freshly decoded one; on error `self` is untouched
    pub fn reload(&mut self, value: &Value) -> Result<()> {
        let mut decoded = Self::decode(value)?;
        let name = self.root_project().map(|p| p.name.clone());
        if let (Some(name), Some(project)) = (name, decoded.root_project_mut()) {
            project.name = name;
        }
        *self = decoded;
        Ok(())
    }

    /// Xcode-compatible text of the project file
    pub fn encode(&self) -> String {
        PbxProjEncoder::new().encode(self)
    }

    /// The `PBXProject` named by `rootObject`
    pub fn root_project(&self) -> Option<&Project> {
        self.objects.project(&self.root_object)
    }

    pub fn root_project_mut(&mut self) -> Option<&mut Project> {
        self.objects.project_mut(&self.root_object)
    }

    /// Main group of the root project
    pub fn main_group(&self) -> Option<&Reference> {
        self.root_project().map(|p| &p.main_group)
    }

    /// Set the project name used in comments (the `.xcodeproj` bundle name)
    pub fn set_project_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        for (_, object) in self.objects.iter_mut() {
            if let Object::Project(project) = object {
                project.name = name.clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::ObjectKind;
    use pretty_assertions::assert_eq;

    const MINIMAL: &str = r#"// !$*UTF8*$!
{
	archiveVersion = 1;
	classes = {
	};
	objectVersion = 46;
	objects = {
		CL_1 = {isa = XCConfigurationList; buildConfigurations = (BC_1); };
		BC_1 = {isa = XCBuildConfiguration; name = Debug; buildSettings = {}; };
		G_1 = {isa = PBXGroup; children = (); sourceTree = "<group>"; };
		P_1 = {isa = PBXProject; buildConfigurationList = CL_1; mainGroup = G_1; targets = (); };
	};
	rootObject = P_1;
}
"#;

    #[test]
    fn test_decode_minimal() {
        let proj = PbxProj::from_bytes(MINIMAL.as_bytes()).unwrap();
        assert_eq!(proj.archive_version, 1);
        assert_eq!(proj.object_version, 46);
        assert_eq!(proj.root_object, "P_1");
        assert_eq!(proj.objects.len(), 4);
        assert_eq!(proj.main_group().map(Reference::as_str), Some("G_1"));
        assert_eq!(proj.objects.count(ObjectKind::Group), 1);
    }

    #[test]
    fn test_header_defaults() {
        let proj = PbxProj::from_bytes(b"{ objects = {}; rootObject = P_1; }").unwrap();
        assert_eq!(proj.archive_version, 1);
        assert_eq!(proj.object_version, 0);
        assert!(proj.classes.is_empty());
        assert!(proj.objects.is_empty());
    }

    #[test]
    fn test_root_object_is_required() {
        let err = PbxProj::from_bytes(b"{ objects = {}; }").unwrap_err();
        assert!(matches!(err, ProjError::MissingField { field: "rootObject", .. }));
    }

    #[test]
    fn test_unknown_isa_fails_the_whole_load() {
        let text = MINIMAL.replace(
            "G_1 = {isa = PBXGroup;",
            "X_1 = {isa = PBXFancyThing; }; G_1 = {isa = PBXGroup;",
        );
        let err = PbxProj::from_bytes(text.as_bytes()).unwrap_err();
        assert!(matches!(err, ProjError::UnknownElementKind { ref isa, .. } if isa == "PBXFancyThing"));
    }

    #[test]
    fn test_missing_main_group_leaves_graph_unmodified() {
        let mut proj = PbxProj::from_bytes(MINIMAL.as_bytes()).unwrap();
        proj.set_project_name("App");
        let before = proj.clone();

        let broken = plist::read(MINIMAL.replace(" mainGroup = G_1;", "").as_bytes()).unwrap();
        let err = proj.reload(&broken).unwrap_err();
        assert_eq!(err.to_string(), "PBXProject is missing required attribute mainGroup");
        assert_eq!(proj, before);
    }

    #[test]
    fn test_reload_keeps_project_name() {
        let mut proj = PbxProj::from_bytes(MINIMAL.as_bytes()).unwrap();
        proj.set_project_name("App");
        let value = plist::read(MINIMAL.as_bytes()).unwrap();
        proj.reload(&value).unwrap();
        assert_eq!(proj.root_project().unwrap().name, "App");
    }

    #[test]
    fn test_encode_comments_use_project_name() {
        let mut proj = PbxProj::from_bytes(MINIMAL.as_bytes()).unwrap();
        proj.set_project_name("App");
        let text = proj.encode();
        assert!(text.contains("buildConfigurationList = CL_1 /* Build configuration list for PBXProject \"App\" */;"));
        assert!(text.contains("\t\tCL_1 /* Build configuration list for PBXProject \"App\" */ = {"));
        assert!(text.contains("\t\t\t\tBC_1 /* Debug */,\n"));
    }

    const APP: &str = include_str!("../fixtures/App.pbxproj");

    fn app() -> PbxProj {
        let mut proj = PbxProj::from_bytes(APP.as_bytes()).unwrap();
        proj.set_project_name("App");
        proj
    }

    #[test]
    fn test_fixture_graph() {
        let proj = app();
        assert_eq!(proj.object_version, 55);
        assert_eq!(proj.objects.len(), 35);
        assert_eq!(proj.objects.targets().count(), 2);
        assert!(proj.objects.dangling_references().is_empty());

        let (_, target) = proj.objects.targets_named("App").into_iter().next().unwrap();
        let (phase, _) = proj.objects.sources_build_phase(target).unwrap();
        assert_eq!(phase, "A1000001000000000000P001");
        let files: Vec<_> = proj
            .objects
            .source_files(target)
            .into_iter()
            .filter_map(|(_, file)| file.path.as_deref())
            .collect();
        assert_eq!(files, vec!["AppDelegate.swift", "ContentView.swift"]);
    }

    #[test]
    fn test_fixture_encodes_like_xcode() {
        let text = app().encode();
        assert!(text.contains(
            "\t\tA1000001000000000000A001 /* AppDelegate.swift in Sources */ = {isa = PBXBuildFile; fileRef = A1000001000000000000F001 /* AppDelegate.swift */; };\n"
        ));
        assert!(text.contains("\t\t\t\tA1000001000000000000A004 /* Logging in Frameworks */,\n"));
        assert!(text.contains("/* Begin PBXShellScriptBuildPhase section */\n"));
        assert!(text.contains("\t\t\t\tA1000001000000000000P004 /* Lint */,\n"));
        assert!(text.contains("\trootObject = A1000001000000000000E001 /* Project object */;\n"));
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn test_fixture_round_trips() {
        let proj = app();
        let first = proj.encode();
        let mut reread = PbxProj::from_bytes(first.as_bytes()).unwrap();
        reread.set_project_name("App");
        assert_eq!(reread, proj);
        assert_eq!(reread.encode(), first);
    }

    #[test]
    fn test_encode_is_a_fixed_point() {
        let proj = PbxProj::from_bytes(MINIMAL.as_bytes()).unwrap();
        let first = proj.encode();
        let second = PbxProj::from_bytes(first.as_bytes()).unwrap().encode();
        assert_eq!(first, second);
    }

    #[test]
    fn test_integer_like_text_is_written_back() {
        let text = MINIMAL.replace(
            "G_1 = {isa = PBXGroup;",
            "FR_1 = {isa = PBXFileReference; fileEncoding = 04; indentWidth = \" 2\"; tabWidth = \"\"; path = a.c; sourceTree = \"<group>\"; }; G_1 = {isa = PBXGroup;",
        );
        let proj = PbxProj::from_bytes(text.as_bytes()).unwrap();
        let file = proj.objects.file_reference("FR_1").unwrap();
        assert_eq!(file.file_encoding.as_ref().and_then(Number::value), Some(4));
        assert_eq!(file.element.indent_width.as_ref().and_then(Number::value), Some(2));
        assert_eq!(file.element.tab_width.as_ref().map(Number::as_str), Some(""));

        let encoded = proj.encode();
        assert!(encoded.contains("fileEncoding = 04;"));
        assert!(encoded.contains("indentWidth = \" 2\";"));
        assert!(encoded.contains("tabWidth = \"\";"));
    }

    #[test]
    fn test_comments_attribute_round_trips() {
        let text = MINIMAL
            .replace(
                "G_1 = {isa = PBXGroup;",
                "FR_1 = {isa = PBXFileReference; comments = \"generated\"; path = a.c; sourceTree = \"<group>\"; }; \
                 S_1 = {isa = PBXSourcesBuildPhase; comments = \"compile\"; files = (); }; \
                 T_1 = {isa = PBXNativeTarget; comments = \"main app\"; name = App; buildPhases = (S_1); }; \
                 G_1 = {isa = PBXGroup;",
            )
            .replace("targets = ();", "targets = (T_1);");
        let proj = PbxProj::from_bytes(text.as_bytes()).unwrap();
        let objects = &proj.objects;
        let file = objects.file_reference("FR_1").unwrap();
        assert_eq!(file.element.comments.as_deref(), Some("generated"));
        let phase = objects.build_phase("S_1").unwrap();
        assert_eq!(phase.comments.as_deref(), Some("compile"));
        let target = objects.target("T_1").unwrap();
        assert_eq!(target.comments.as_deref(), Some("main app"));

        let encoded = proj.encode();
        assert!(encoded.contains("comments = generated;"));
        assert!(encoded.contains("\t\t\tcomments = compile;\n"));
        assert!(encoded.contains("\t\t\tcomments = \"main app\";\n"));
        assert_eq!(PbxProj::from_bytes(encoded.as_bytes()).unwrap(), proj);
    }
}
