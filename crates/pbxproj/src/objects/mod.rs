//! Node kinds of a project graph
//!
//! Every object in the `objects` dictionary of a `.pbxproj` decodes into one
//! variant of [`Object`], selected by its `isa` attribute. Shared attribute
//! sets ([`FileElement`], [`BuildPhase`], [`Target`]) are embedded structs
//! rather than a class hierarchy.

mod build_file;
mod build_phase;
mod build_rule;
mod configuration;
mod container_item_proxy;
pub(crate) mod fields;
mod file_element;
mod file_reference;
mod group;
mod number;
mod product_type;
mod project;
mod reference_proxy;
mod source_tree;
mod swift_package;
mod target;
mod target_dependency;

pub use build_file::BuildFile;
pub use build_phase::{
    BuildPhase, CopyFilesBuildPhase, FrameworksBuildPhase, HeadersBuildPhase,
    ResourcesBuildPhase, RezBuildPhase, ShellScriptBuildPhase, SourcesBuildPhase, SubFolder,
};
pub use build_rule::BuildRule;
pub use configuration::{BuildConfiguration, ConfigurationList};
pub use container_item_proxy::{ContainerItemProxy, ProxyType};
pub use file_element::FileElement;
pub use file_reference::{last_known_file_type, FileReference};
pub use group::{Group, VariantGroup, VersionGroup};
pub use number::Number;
pub use product_type::ProductType;
pub use project::Project;
pub use reference_proxy::ReferenceProxy;
pub use source_tree::SourceTree;
pub use swift_package::{RemoteSwiftPackageReference, SwiftPackageProductDependency, VersionRequirement};
pub use target::{AggregateTarget, LegacyTarget, NativeTarget, Target};
pub use target_dependency::TargetDependency;

use crate::error::{ProjError, Result};
use crate::plist::{CommentedString, Dictionary, PlistValue};
use crate::reference::Reference;
use crate::encoder::EncodeContext;
use fields::Fields;

/// Behaviour every node kind provides to the decoder and encoder
pub(crate) trait Node: Sized {
    const KIND: ObjectKind;

    fn decode(fields: &Fields<'_>) -> Result<Self>;

    /// Key (reference plus comment) and value of this node's entry
    fn encode(&self, objects: &EncodeContext<'_>, reference: &Reference) -> (CommentedString, PlistValue);
}

macro_rules! object_kinds {
    ($($variant:ident => $isa:literal),* $(,)?) => {
        /// Discriminant of [`Object`].
        ///
        /// Declaration order is the alphabetical `isa` order, which is the
        /// order sections are written in.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum ObjectKind {
            $($variant,)*
        }

        impl ObjectKind {
            /// Every kind in section order
            pub const ALL: &'static [ObjectKind] = &[$(ObjectKind::$variant,)*];

            /// The `isa` string
            pub fn isa(self) -> &'static str {
                match self {
                    $(ObjectKind::$variant => $isa,)*
                }
            }

            /// Kind for an `isa` string
            pub fn from_isa(isa: &str) -> Option<Self> {
                match isa {
                    $($isa => Some(ObjectKind::$variant),)*
                    _ => None,
                }
            }
        }

        /// A decoded node of any kind
        #[derive(Debug, Clone, PartialEq)]
        pub enum Object {
            $($variant($variant),)*
        }

        impl Object {
            pub fn kind(&self) -> ObjectKind {
                match self {
                    $(Object::$variant(_) => ObjectKind::$variant,)*
                }
            }

            pub(crate) fn decode_as(kind: ObjectKind, dict: &Dictionary) -> Result<Self> {
                match kind {
                    $(ObjectKind::$variant => {
                        let fields = Fields::new($isa, dict);
                        <$variant as Node>::decode(&fields).map(Object::$variant)
                    })*
                }
            }

            pub(crate) fn encode(
                &self,
                objects: &EncodeContext<'_>,
                reference: &Reference,
            ) -> (CommentedString, PlistValue) {
                match self {
                    $(Object::$variant(object) => object.encode(objects, reference),)*
                }
            }
        }

        $(
            impl From<$variant> for Object {
                fn from(object: $variant) -> Self {
                    Object::$variant(object)
                }
            }
        )*
    };
}

object_kinds! {
    AggregateTarget => "PBXAggregateTarget",
    BuildFile => "PBXBuildFile",
    BuildRule => "PBXBuildRule",
    ContainerItemProxy => "PBXContainerItemProxy",
    CopyFilesBuildPhase => "PBXCopyFilesBuildPhase",
    FileReference => "PBXFileReference",
    FrameworksBuildPhase => "PBXFrameworksBuildPhase",
    Group => "PBXGroup",
    HeadersBuildPhase => "PBXHeadersBuildPhase",
    LegacyTarget => "PBXLegacyTarget",
    NativeTarget => "PBXNativeTarget",
    Project => "PBXProject",
    ReferenceProxy => "PBXReferenceProxy",
    ResourcesBuildPhase => "PBXResourcesBuildPhase",
    RezBuildPhase => "PBXRezBuildPhase",
    ShellScriptBuildPhase => "PBXShellScriptBuildPhase",
    SourcesBuildPhase => "PBXSourcesBuildPhase",
    TargetDependency => "PBXTargetDependency",
    VariantGroup => "PBXVariantGroup",
    BuildConfiguration => "XCBuildConfiguration",
    ConfigurationList => "XCConfigurationList",
    RemoteSwiftPackageReference => "XCRemoteSwiftPackageReference",
    SwiftPackageProductDependency => "XCSwiftPackageProductDependency",
    VersionGroup => "XCVersionGroup",
}

impl ObjectKind {
    /// Order in which sub-collections are searched by a polymorphic lookup.
    ///
    /// The specialised group kinds come before plain groups.
    pub const LOOKUP_ORDER: [ObjectKind; 24] = [
        ObjectKind::BuildFile,
        ObjectKind::AggregateTarget,
        ObjectKind::ContainerItemProxy,
        ObjectKind::CopyFilesBuildPhase,
        ObjectKind::VariantGroup,
        ObjectKind::VersionGroup,
        ObjectKind::Group,
        ObjectKind::BuildConfiguration,
        ObjectKind::ConfigurationList,
        ObjectKind::LegacyTarget,
        ObjectKind::NativeTarget,
        ObjectKind::FileReference,
        ObjectKind::Project,
        ObjectKind::ReferenceProxy,
        ObjectKind::FrameworksBuildPhase,
        ObjectKind::HeadersBuildPhase,
        ObjectKind::ResourcesBuildPhase,
        ObjectKind::RezBuildPhase,
        ObjectKind::ShellScriptBuildPhase,
        ObjectKind::SourcesBuildPhase,
        ObjectKind::TargetDependency,
        ObjectKind::BuildRule,
        ObjectKind::RemoteSwiftPackageReference,
        ObjectKind::SwiftPackageProductDependency,
    ];

    /// Upper-case letters of the `isa` without its `PBX`/`XC` prefix
    pub fn acronym(self) -> String {
        let isa = self.isa();
        let stripped = isa
            .strip_prefix("PBX")
            .or_else(|| isa.strip_prefix("XC"))
            .unwrap_or(isa);
        stripped.chars().filter(char::is_ascii_uppercase).collect()
    }

    /// Whether entries of this kind are written on a single line
    pub fn is_single_line(self) -> bool {
        matches!(self, ObjectKind::BuildFile | ObjectKind::FileReference)
    }

    pub fn is_target(self) -> bool {
        matches!(
            self,
            ObjectKind::NativeTarget | ObjectKind::LegacyTarget | ObjectKind::AggregateTarget
        )
    }

    pub fn is_build_phase(self) -> bool {
        matches!(
            self,
            ObjectKind::SourcesBuildPhase
                | ObjectKind::FrameworksBuildPhase
                | ObjectKind::ResourcesBuildPhase
                | ObjectKind::HeadersBuildPhase
                | ObjectKind::RezBuildPhase
                | ObjectKind::CopyFilesBuildPhase
                | ObjectKind::ShellScriptBuildPhase
        )
    }

    pub fn is_group_like(self) -> bool {
        matches!(
            self,
            ObjectKind::Group | ObjectKind::VariantGroup | ObjectKind::VersionGroup
        )
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.isa())
    }
}

impl Object {
    /// Decode one entry of the `objects` dictionary
    pub fn decode(reference: &Reference, dict: &Dictionary) -> Result<Self> {
        let isa = dict
            .get("isa")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ProjError::MissingKind {
                reference: reference.clone(),
            })?;
        let kind = ObjectKind::from_isa(isa).ok_or_else(|| ProjError::UnknownElementKind {
            reference: reference.clone(),
            isa: isa.to_string(),
        })?;
        Self::decode_as(kind, dict)
    }

    /// Shared target attributes, for any target kind
    pub fn as_target(&self) -> Option<&Target> {
        match self {
            Object::NativeTarget(t) => Some(&t.base),
            Object::LegacyTarget(t) => Some(&t.base),
            Object::AggregateTarget(t) => Some(&t.base),
            _ => None,
        }
    }

    pub fn as_target_mut(&mut self) -> Option<&mut Target> {
        match self {
            Object::NativeTarget(t) => Some(&mut t.base),
            Object::LegacyTarget(t) => Some(&mut t.base),
            Object::AggregateTarget(t) => Some(&mut t.base),
            _ => None,
        }
    }

    /// Shared build phase attributes, for any build phase kind
    pub fn as_build_phase(&self) -> Option<&BuildPhase> {
        match self {
            Object::SourcesBuildPhase(p) => Some(&p.phase),
            Object::FrameworksBuildPhase(p) => Some(&p.phase),
            Object::ResourcesBuildPhase(p) => Some(&p.phase),
            Object::HeadersBuildPhase(p) => Some(&p.phase),
            Object::RezBuildPhase(p) => Some(&p.phase),
            Object::CopyFilesBuildPhase(p) => Some(&p.phase),
            Object::ShellScriptBuildPhase(p) => Some(&p.phase),
            _ => None,
        }
    }

    pub fn as_build_phase_mut(&mut self) -> Option<&mut BuildPhase> {
        match self {
            Object::SourcesBuildPhase(p) => Some(&mut p.phase),
            Object::FrameworksBuildPhase(p) => Some(&mut p.phase),
            Object::ResourcesBuildPhase(p) => Some(&mut p.phase),
            Object::HeadersBuildPhase(p) => Some(&mut p.phase),
            Object::RezBuildPhase(p) => Some(&mut p.phase),
            Object::CopyFilesBuildPhase(p) => Some(&mut p.phase),
            Object::ShellScriptBuildPhase(p) => Some(&mut p.phase),
            _ => None,
        }
    }

    /// Display name of a build phase: `Sources`, `Frameworks`, ... or the
    /// phase's own name for copy-files and script phases
    pub fn build_phase_name(&self) -> Option<&str> {
        match self {
            Object::SourcesBuildPhase(_) => Some("Sources"),
            Object::FrameworksBuildPhase(_) => Some("Frameworks"),
            Object::ResourcesBuildPhase(_) => Some("Resources"),
            Object::HeadersBuildPhase(_) => Some("Headers"),
            Object::RezBuildPhase(_) => Some("Rez"),
            Object::CopyFilesBuildPhase(p) => Some(p.name.as_deref().unwrap_or("CopyFiles")),
            Object::ShellScriptBuildPhase(p) => Some(p.name.as_deref().unwrap_or("ShellScript")),
            _ => None,
        }
    }

    /// Shared file element attributes, for file references and group kinds
    pub fn as_file_element(&self) -> Option<&FileElement> {
        match self {
            Object::FileReference(f) => Some(&f.element),
            Object::Group(g) => Some(&g.element),
            Object::VariantGroup(g) => Some(&g.element),
            Object::VersionGroup(g) => Some(&g.element),
            _ => None,
        }
    }

    pub fn as_file_element_mut(&mut self) -> Option<&mut FileElement> {
        match self {
            Object::FileReference(f) => Some(&mut f.element),
            Object::Group(g) => Some(&mut g.element),
            Object::VariantGroup(g) => Some(&mut g.element),
            Object::VersionGroup(g) => Some(&mut g.element),
            _ => None,
        }
    }

    /// Children of any group kind
    pub fn children(&self) -> Option<&[Reference]> {
        match self {
            Object::Group(g) => Some(&g.children),
            Object::VariantGroup(g) => Some(&g.children),
            Object::VersionGroup(g) => Some(&g.children),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Reference>> {
        match self {
            Object::Group(g) => Some(&mut g.children),
            Object::VariantGroup(g) => Some(&mut g.children),
            Object::VersionGroup(g) => Some(&mut g.children),
            _ => None,
        }
    }
}
