//! Build phases
//!
//! All seven phase kinds share [`BuildPhase`]. The five kinds without extra
//! attributes are generated by `simple_phase!`.

use super::fields::Fields;
use super::{Node, Number, ObjectKind};
use crate::error::Result;
use crate::plist::{CommentedString, Fragment, PlistValue};
use crate::reference::Reference;
use crate::encoder::EncodeContext;

/// Value Xcode writes for `buildActionMask`
pub const DEFAULT_BUILD_ACTION_MASK: u32 = 2_147_483_647;

/// Attributes shared by every build phase kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPhase {
    pub build_action_mask: Number,
    /// Build file references, in build order
    pub files: Vec<Reference>,
    pub run_only_for_deployment_postprocessing: bool,
    pub comments: Option<String>,
}

impl Default for BuildPhase {
    fn default() -> Self {
        Self {
            build_action_mask: Number::from(DEFAULT_BUILD_ACTION_MASK),
            files: Vec::new(),
            run_only_for_deployment_postprocessing: false,
            comments: None,
        }
    }
}

impl BuildPhase {
    pub(crate) fn decode(fields: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            build_action_mask: fields
                .number("buildActionMask")?
                .unwrap_or_else(|| Number::from(DEFAULT_BUILD_ACTION_MASK)),
            files: fields.references("files")?,
            run_only_for_deployment_postprocessing: fields
                .flag("runOnlyForDeploymentPostprocessing")?
                .unwrap_or(false),
            comments: fields.string("comments")?,
        })
    }

    pub(crate) fn write(&self, objects: &EncodeContext<'_>, fragment: &mut Fragment) {
        fragment.set_str("buildActionMask", self.build_action_mask.as_str());
        let files = self
            .files
            .iter()
            .map(|file| {
                let comment = objects
                    .build_file_comment(file)
                    .or_else(|| objects.build_file_name(file).map(str::to_string));
                PlistValue::commented(file.as_str(), comment)
            })
            .collect();
        fragment.set("files", PlistValue::Array(files));
        fragment.set_flag(
            "runOnlyForDeploymentPostprocessing",
            self.run_only_for_deployment_postprocessing,
        );
        fragment.set_opt("comments", self.comments.as_ref());
    }
}

macro_rules! simple_phase {
    ($(#[$doc:meta])* $name:ident, $display:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $name {
            pub phase: BuildPhase,
        }

        impl Node for $name {
            const KIND: ObjectKind = ObjectKind::$name;

            fn decode(fields: &Fields<'_>) -> Result<Self> {
                Ok(Self {
                    phase: BuildPhase::decode(fields)?,
                })
            }

            fn encode(
                &self,
                objects: &EncodeContext<'_>,
                reference: &Reference,
            ) -> (CommentedString, PlistValue) {
                let mut fragment = Fragment::new(Self::KIND.isa());
                self.phase.write(objects, &mut fragment);
                (
                    CommentedString::with_comment(reference.as_str(), Some($display)),
                    fragment.into_value(),
                )
            }
        }
    };
}

simple_phase!(
    /// `PBXSourcesBuildPhase`: compiled sources
    SourcesBuildPhase,
    "Sources"
);
simple_phase!(
    /// `PBXFrameworksBuildPhase`: linked frameworks and libraries
    FrameworksBuildPhase,
    "Frameworks"
);
simple_phase!(
    /// `PBXResourcesBuildPhase`: bundled resources
    ResourcesBuildPhase,
    "Resources"
);
simple_phase!(
    /// `PBXHeadersBuildPhase`: public, private and project headers
    HeadersBuildPhase,
    "Headers"
);
simple_phase!(
    /// `PBXRezBuildPhase`: Carbon resources
    RezBuildPhase,
    "Rez"
);

/// Destination of a copy-files phase (`dstSubfolderSpec`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SubFolder {
    AbsolutePath,
    Wrapper,
    Executables,
    Resources,
    Frameworks,
    SharedFrameworks,
    SharedSupport,
    Plugins,
    JavaResources,
    ProductsDirectory,
    /// Any other code, kept as written
    Other(Number),
}

impl SubFolder {
    pub fn from_number(number: Number) -> Self {
        match number.as_str() {
            "0" => SubFolder::AbsolutePath,
            "1" => SubFolder::Wrapper,
            "6" => SubFolder::Executables,
            "7" => SubFolder::Resources,
            "10" => SubFolder::Frameworks,
            "11" => SubFolder::SharedFrameworks,
            "12" => SubFolder::SharedSupport,
            "13" => SubFolder::Plugins,
            "15" => SubFolder::JavaResources,
            "16" => SubFolder::ProductsDirectory,
            _ => SubFolder::Other(number),
        }
    }

    pub fn number(&self) -> Number {
        match self {
            SubFolder::AbsolutePath => Number::from(0),
            SubFolder::Wrapper => Number::from(1),
            SubFolder::Executables => Number::from(6),
            SubFolder::Resources => Number::from(7),
            SubFolder::Frameworks => Number::from(10),
            SubFolder::SharedFrameworks => Number::from(11),
            SubFolder::SharedSupport => Number::from(12),
            SubFolder::Plugins => Number::from(13),
            SubFolder::JavaResources => Number::from(15),
            SubFolder::ProductsDirectory => Number::from(16),
            SubFolder::Other(number) => number.clone(),
        }
    }
}

/// `PBXCopyFilesBuildPhase`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyFilesBuildPhase {
    pub phase: BuildPhase,
    pub dst_path: Option<String>,
    pub dst_subfolder_spec: Option<SubFolder>,
    pub name: Option<String>,
}

impl Node for CopyFilesBuildPhase {
    const KIND: ObjectKind = ObjectKind::CopyFilesBuildPhase;

    fn decode(fields: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            phase: BuildPhase::decode(fields)?,
            dst_path: fields.string("dstPath")?,
            dst_subfolder_spec: fields.number("dstSubfolderSpec")?.map(SubFolder::from_number),
            name: fields.string("name")?,
        })
    }

    fn encode(&self, objects: &EncodeContext<'_>, reference: &Reference) -> (CommentedString, PlistValue) {
        let mut fragment = Fragment::new(Self::KIND.isa());
        self.phase.write(objects, &mut fragment);
        fragment.set_opt("dstPath", self.dst_path.as_ref());
        fragment.set_opt("dstSubfolderSpec", self.dst_subfolder_spec.as_ref().map(SubFolder::number));
        fragment.set_opt("name", self.name.as_ref());
        let comment = self.name.as_deref().unwrap_or("CopyFiles");
        (
            CommentedString::with_comment(reference.as_str(), Some(comment)),
            fragment.into_value(),
        )
    }
}

/// `PBXShellScriptBuildPhase`: a "Run Script" phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellScriptBuildPhase {
    pub phase: BuildPhase,
    pub name: Option<String>,
    pub input_paths: Vec<String>,
    pub output_paths: Vec<String>,
    pub input_file_list_paths: Option<Vec<String>>,
    pub output_file_list_paths: Option<Vec<String>>,
    pub shell_path: Option<String>,
    pub shell_script: Option<String>,
    pub show_env_vars_in_log: bool,
}

impl Default for ShellScriptBuildPhase {
    fn default() -> Self {
        Self {
            phase: BuildPhase::default(),
            name: None,
            input_paths: Vec::new(),
            output_paths: Vec::new(),
            input_file_list_paths: None,
            output_file_list_paths: None,
            shell_path: Some("/bin/sh".to_string()),
            shell_script: None,
            show_env_vars_in_log: true,
        }
    }
}

impl Node for ShellScriptBuildPhase {
    const KIND: ObjectKind = ObjectKind::ShellScriptBuildPhase;

    fn decode(fields: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            phase: BuildPhase::decode(fields)?,
            name: fields.string("name")?,
            input_paths: fields.strings_or_empty("inputPaths")?,
            output_paths: fields.strings_or_empty("outputPaths")?,
            input_file_list_paths: fields.strings("inputFileListPaths")?,
            output_file_list_paths: fields.strings("outputFileListPaths")?,
            shell_path: fields.string("shellPath")?,
            shell_script: fields.string("shellScript")?,
            show_env_vars_in_log: fields.flag("showEnvVarsInLog")?.unwrap_or(true),
        })
    }

    fn encode(&self, objects: &EncodeContext<'_>, reference: &Reference) -> (CommentedString, PlistValue) {
        let mut fragment = Fragment::new(Self::KIND.isa());
        self.phase.write(objects, &mut fragment);
        fragment.set_opt("name", self.name.as_ref());
        fragment.set("inputPaths", PlistValue::strings(self.input_paths.iter().cloned()));
        fragment.set("outputPaths", PlistValue::strings(self.output_paths.iter().cloned()));
        if let Some(paths) = &self.input_file_list_paths {
            fragment.set("inputFileListPaths", PlistValue::strings(paths.iter().cloned()));
        }
        if let Some(paths) = &self.output_file_list_paths {
            fragment.set("outputFileListPaths", PlistValue::strings(paths.iter().cloned()));
        }
        fragment.set_opt("shellPath", self.shell_path.as_ref());
        fragment.set_opt("shellScript", self.shell_script.as_ref());
        if !self.show_env_vars_in_log {
            fragment.set_flag("showEnvVarsInLog", false);
        }
        let comment = self.name.as_deref().unwrap_or("ShellScript");
        (
            CommentedString::with_comment(reference.as_str(), Some(comment)),
            fragment.into_value(),
        )
    }
}
