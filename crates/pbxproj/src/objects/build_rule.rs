use super::fields::Fields;
use super::{Node, ObjectKind};
use crate::error::Result;
use crate::plist::{CommentedString, Fragment, PlistValue};
use crate::reference::Reference;
use crate::encoder::EncodeContext;

/// `PBXBuildRule`: custom processing for files matching a type or pattern
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildRule {
    pub compiler_spec: String,
    pub file_patterns: Option<String>,
    pub file_type: String,
    pub is_editable: bool,
    pub name: Option<String>,
    pub output_files: Vec<String>,
    pub output_files_compiler_flags: Option<Vec<String>>,
    pub script: Option<String>,
}

impl Node for BuildRule {
    const KIND: ObjectKind = ObjectKind::BuildRule;

    fn decode(fields: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            compiler_spec: fields.string_or_default("compilerSpec")?,
            file_patterns: fields.string("filePatterns")?,
            file_type: fields.string_or_default("fileType")?,
            is_editable: fields.flag("isEditable")?.unwrap_or(false),
            name: fields.string("name")?,
            output_files: fields.strings_or_empty("outputFiles")?,
            output_files_compiler_flags: fields.strings("outputFilesCompilerFlags")?,
            script: fields.string("script")?,
        })
    }

    fn encode(&self, _objects: &EncodeContext<'_>, reference: &Reference) -> (CommentedString, PlistValue) {
        let mut fragment = Fragment::new(Self::KIND.isa());
        fragment.set_str("compilerSpec", self.compiler_spec.as_str());
        fragment.set_opt("filePatterns", self.file_patterns.as_ref());
        fragment.set_str("fileType", self.file_type.as_str());
        fragment.set_flag("isEditable", self.is_editable);
        fragment.set_opt("name", self.name.as_ref());
        fragment.set("outputFiles", PlistValue::strings(self.output_files.iter().cloned()));
        if let Some(flags) = &self.output_files_compiler_flags {
            fragment.set("outputFilesCompilerFlags", PlistValue::strings(flags.iter().cloned()));
        }
        fragment.set_opt("script", self.script.as_ref());
        (
            CommentedString::with_comment(reference.as_str(), Some(Self::KIND.isa())),
            fragment.into_value(),
        )
    }
}
