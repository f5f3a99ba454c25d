//! Xcode-canonical `.pbxproj` writer
//!
//! The output matches what Xcode itself writes: one section per node kind in
//! alphabetical `isa` order, entries sorted by reference, tab indentation,
//! and `/* comments */` naming the referenced nodes. Build files and file
//! references are written on a single line.

use crate::objects::ObjectKind;
use crate::plist::{CommentedString, PlistDictionary, PlistValue};
use crate::proj::PbxProj;
use crate::reference::Reference;
use crate::store::Objects;
use std::collections::HashMap;
use std::ops::Deref;

/// Store view handed to node encoders for the duration of one encode.
///
/// Holds the build file to owning phase index so `<file> in <phase>`
/// comments are lookups rather than scans of every phase.
pub(crate) struct EncodeContext<'a> {
    objects: &'a Objects,
    phase_of_file: HashMap<&'a str, &'a str>,
}

impl<'a> EncodeContext<'a> {
    pub(crate) fn new(objects: &'a Objects) -> Self {
        let mut phase_of_file = HashMap::new();
        for (_, object) in objects.build_phases() {
            let (Some(phase), Some(name)) = (object.as_build_phase(), object.build_phase_name())
            else {
                continue;
            };
            for file in &phase.files {
                phase_of_file.entry(file.as_str()).or_insert(name);
            }
        }
        Self {
            objects,
            phase_of_file,
        }
    }

    /// `<file> in <phase>` when the owning phase is known
    pub(crate) fn build_file_comment(&self, build_file: &Reference) -> Option<String> {
        let phase_name = self.phase_of_file.get(build_file.as_str())?;
        let file_name = self.objects.build_file_name(build_file).unwrap_or("(null)");
        Some(format!("{file_name} in {phase_name}"))
    }
}

impl Deref for EncodeContext<'_> {
    type Target = Objects;

    fn deref(&self) -> &Objects {
        self.objects
    }
}

/// Stateful text writer for a [`PbxProj`]
#[derive(Debug)]
pub struct PbxProjEncoder {
    indent: usize,
    output: String,
    multiline: bool,
}

impl Default for PbxProjEncoder {
    fn default() -> Self {
        Self {
            indent: 0,
            output: String::new(),
            multiline: true,
        }
    }
}

impl PbxProjEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the whole document
    pub fn encode(mut self, proj: &PbxProj) -> String {
        self.output.push_str("// !$*UTF8*$!");
        self.new_line();
        self.dictionary_start();
        self.entry(
            &CommentedString::new("archiveVersion"),
            &PlistValue::string(proj.archive_version.as_str()),
            true,
        );
        self.entry(
            &CommentedString::new("classes"),
            &PlistValue::from(&proj.classes),
            true,
        );
        self.entry(
            &CommentedString::new("objectVersion"),
            &PlistValue::string(proj.object_version.as_str()),
            true,
        );
        self.write_indent();
        self.output.push_str("objects = {");
        self.indent += 1;
        self.new_line();
        let context = EncodeContext::new(&proj.objects);
        for &kind in ObjectKind::ALL {
            self.section(proj, &context, kind);
        }
        self.indent -= 1;
        self.write_indent();
        self.output.push_str("};");
        self.new_line();
        self.entry(
            &CommentedString::new("rootObject"),
            &PlistValue::commented(proj.root_object.as_str(), Some("Project object")),
            true,
        );
        self.dictionary_end();
        self.new_line();
        self.output
    }

    fn section(&mut self, proj: &PbxProj, context: &EncodeContext<'_>, kind: ObjectKind) {
        if proj.objects.count(kind) == 0 {
            return;
        }
        self.new_line();
        self.output.push_str(&format!("/* Begin {} section */", kind.isa()));
        self.new_line();
        for (reference, object) in proj.objects.of_kind(kind) {
            let (key, value) = object.encode(context, reference);
            self.entry(&key, &value, !kind.is_single_line());
        }
        self.output.push_str(&format!("/* End {} section */", kind.isa()));
        self.new_line();
    }

    /// `key = value;` followed by a line break (or a space on a single line).
    ///
    /// The indent is written before `multiline` takes effect, so single-line
    /// entries still start at the current depth.
    fn entry(&mut self, key: &CommentedString, value: &PlistValue, multiline: bool) {
        self.write_indent();
        let before = self.multiline;
        self.multiline = multiline;
        self.commented_string(key);
        self.output.push_str(" = ");
        self.value(value);
        self.output.push(';');
        self.multiline = before;
        self.new_line();
    }

    fn value(&mut self, value: &PlistValue) {
        match value {
            PlistValue::String(string) => self.commented_string(string),
            PlistValue::Array(items) => self.array(items),
            PlistValue::Dictionary(dict) => self.dictionary(dict),
        }
    }

    fn commented_string(&mut self, string: &CommentedString) {
        self.output.push_str(&string.valid_string());
        if let Some(comment) = &string.comment {
            self.output.push_str(" /* ");
            self.output.push_str(&comment.replace("*/", "(*)/"));
            self.output.push_str(" */");
        }
    }

    fn dictionary(&mut self, dict: &PlistDictionary) {
        self.dictionary_start();
        let isa = dict.iter().filter(|(key, _)| key.string == "isa");
        let rest = dict.iter().filter(|(key, _)| key.string != "isa");
        let multiline = self.multiline;
        for (key, value) in isa.chain(rest) {
            self.entry(key, value, multiline);
        }
        self.dictionary_end();
    }

    fn array(&mut self, items: &[PlistValue]) {
        self.output.push('(');
        if self.multiline {
            self.new_line();
        }
        self.indent += 1;
        for item in items {
            self.write_indent();
            self.value(item);
            self.output.push(',');
            self.new_line();
        }
        self.indent -= 1;
        self.write_indent();
        self.output.push(')');
    }

    fn dictionary_start(&mut self) {
        self.output.push('{');
        if self.multiline {
            self.new_line();
        }
        self.indent += 1;
    }

    fn dictionary_end(&mut self) {
        self.indent -= 1;
        self.write_indent();
        self.output.push('}');
    }

    fn new_line(&mut self) {
        self.output.push(if self.multiline { '\n' } else { ' ' });
    }

    fn write_indent(&mut self) {
        if self.multiline {
            for _ in 0..self.indent {
                self.output.push('\t');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{
        BuildFile, FileReference, Group, Number, Object, ObjectKind, SourceTree, SourcesBuildPhase,
    };
    use crate::plist::{Dictionary, Value};
    use crate::reference::Reference;
    use crate::store::Objects;
    use pretty_assertions::assert_eq;

    fn proj_with(objects: Objects) -> PbxProj {
        PbxProj {
            archive_version: Number::from(1),
            object_version: Number::from(46),
            classes: Dictionary::new(),
            root_object: Reference::from("P_1"),
            objects,
        }
    }

    #[test]
    fn test_empty_document_layout() {
        let text = PbxProjEncoder::new().encode(&proj_with(Objects::new()));
        assert_eq!(
            text,
            "// !$*UTF8*$!\n{\n\tarchiveVersion = 1;\n\tclasses = {\n\t};\n\tobjectVersion = 46;\n\tobjects = {\n\t};\n\trootObject = P_1 /* Project object */;\n}\n"
        );
    }

    #[test]
    fn test_single_line_build_file() {
        let mut objects = Objects::new();
        let mut file = FileReference::default();
        file.element.source_tree = Some(SourceTree::Group);
        file.element.path = Some("a.swift".into());
        file.last_known_file_type = Some("sourcecode.swift".into());
        objects.add(file, "FR_1");

        let mut settings = Dictionary::new();
        settings.insert(
            "ATTRIBUTES".into(),
            Value::Array(vec![Value::from("Weak")]),
        );
        let mut build_file = BuildFile::new("FR_1".into());
        build_file.settings = Some(settings);
        objects.add(build_file, "BF_1");

        let text = PbxProjEncoder::new().encode(&proj_with(objects));
        assert!(text.contains(
            "\n/* Begin PBXBuildFile section */\n\t\tBF_1 = {isa = PBXBuildFile; fileRef = FR_1 /* a.swift */; settings = {ATTRIBUTES = (Weak, ); }; };\n/* End PBXBuildFile section */\n"
        ));
        assert!(text.contains(
            "\t\tFR_1 /* a.swift */ = {isa = PBXFileReference; lastKnownFileType = sourcecode.swift; path = a.swift; sourceTree = \"<group>\"; };\n"
        ));
    }

    #[test]
    fn test_multiline_group_and_section_order() {
        let mut objects = Objects::new();
        let mut group = Group::new(Some("Sources".into()), Some("Sources".into()));
        group.children.push(Reference::from("FR_1"));
        objects.add(group, "G_1");
        let mut file = FileReference::default();
        file.element.source_tree = Some(SourceTree::Group);
        file.element.path = Some("main.swift".into());
        objects.add(file, "FR_1");

        let text = PbxProjEncoder::new().encode(&proj_with(objects));
        assert!(text.contains(
            "\t\tG_1 /* Sources */ = {\n\t\t\tisa = PBXGroup;\n\t\t\tchildren = (\n\t\t\t\tFR_1 /* main.swift */,\n\t\t\t);\n\t\t\tname = Sources;\n\t\t\tpath = Sources;\n\t\t\tsourceTree = \"<group>\";\n\t\t};\n"
        ));
        let file_section = text.find("Begin PBXFileReference").unwrap();
        let group_section = text.find("Begin PBXGroup").unwrap();
        assert!(file_section < group_section);
        assert!(!text.contains("PBXBuildFile section"));
    }

    #[test]
    fn test_empty_array_spans_lines() {
        let mut objects = Objects::new();
        objects.add(Group::new(Some("Empty".into()), None), "G_1");
        let text = PbxProjEncoder::new().encode(&proj_with(objects));
        assert!(text.contains("\t\t\tchildren = (\n\t\t\t);\n"));
    }

    #[test]
    fn test_comment_terminator_is_neutralised() {
        let mut objects = Objects::new();
        let mut file = FileReference::default();
        file.element.source_tree = Some(SourceTree::Group);
        file.element.path = Some("notes*/x.txt".into());
        objects.add(file, "FR_1");

        let text = PbxProjEncoder::new().encode(&proj_with(objects));
        assert!(text.contains("\t\tFR_1 /* notes(*)/x.txt */ = {"));
        assert!(text.contains("path = \"notes*/x.txt\";"));

        let reread = PbxProj::from_bytes(text.as_bytes()).unwrap();
        let file = reread.objects.file_reference("FR_1").unwrap();
        assert_eq!(file.element.path.as_deref(), Some("notes*/x.txt"));
    }

    #[test]
    fn test_build_file_comment_index() {
        let mut objects = Objects::new();
        let mut file = FileReference::default();
        file.element.path = Some("a.swift".into());
        objects.add(file, "FR_1");
        objects.add(BuildFile::new("FR_1".into()), "BF_1");
        objects.add(BuildFile::new("FR_MISSING".into()), "BF_2");
        objects.add(BuildFile::new("FR_1".into()), "BF_3");
        let mut phase = SourcesBuildPhase::default();
        phase.phase.files = vec![Reference::from("BF_1"), Reference::from("BF_2")];
        objects.add(phase, "P_1");

        let context = EncodeContext::new(&objects);
        assert_eq!(context.phase_of_file.len(), 2);
        for reference in ["BF_1", "BF_2", "BF_3"] {
            let reference = Reference::from(reference);
            assert_eq!(
                context.build_file_comment(&reference),
                objects.build_file_comment(reference.as_str())
            );
        }
        assert_eq!(
            context.build_file_comment(&Reference::from("BF_1")).as_deref(),
            Some("a.swift in Sources")
        );
        assert_eq!(
            context.build_file_comment(&Reference::from("BF_2")).as_deref(),
            Some("(null) in Sources")
        );
        assert_eq!(context.build_file_comment(&Reference::from("BF_3")), None);
    }

    fn minimal_node(kind: ObjectKind) -> Object {
        let mut dict = Dictionary::new();
        dict.insert("isa".into(), Value::from(kind.isa()));
        let required: &[(&str, &str)] = match kind {
            ObjectKind::Project => &[("mainGroup", "G_1"), ("buildConfigurationList", "CL_1")],
            ObjectKind::ContainerItemProxy => &[("containerPortal", "P_1")],
            ObjectKind::AggregateTarget | ObjectKind::LegacyTarget | ObjectKind::NativeTarget => {
                &[("name", "T")]
            }
            ObjectKind::BuildConfiguration => &[("name", "Debug")],
            ObjectKind::SwiftPackageProductDependency => &[("productName", "Lib")],
            _ => &[],
        };
        for (key, value) in required {
            dict.insert((*key).into(), Value::from(*value));
        }
        Object::decode(&Reference::from(kind.isa()), &dict).unwrap()
    }

    #[test]
    fn test_every_kind_gets_a_section_in_order() {
        let mut objects = Objects::new();
        for (index, &kind) in ObjectKind::ALL.iter().enumerate() {
            objects.add(minimal_node(kind), format!("N_{index:02}"));
        }
        assert_eq!(objects.len(), ObjectKind::ALL.len());

        let text = PbxProjEncoder::new().encode(&proj_with(objects.clone()));
        let mut last_end = 0;
        for &kind in ObjectKind::ALL {
            let begin = text
                .find(&format!("/* Begin {} section */\n", kind.isa()))
                .unwrap_or_else(|| panic!("no section for {}", kind.isa()));
            let end = text.find(&format!("/* End {} section */\n", kind.isa())).unwrap();
            assert!(last_end < begin, "{} out of order", kind.isa());
            assert!(begin < end);
            last_end = end;
        }

        let (emptied, _) = objects
            .of_kind(ObjectKind::ShellScriptBuildPhase)
            .next()
            .unwrap();
        let emptied = emptied.clone();
        assert!(objects.remove(emptied.as_str()).is_some());
        let text = PbxProjEncoder::new().encode(&proj_with(objects));
        assert!(!text.contains("PBXShellScriptBuildPhase section"));
        assert!(text.contains("/* Begin PBXSourcesBuildPhase section */"));
    }
}
