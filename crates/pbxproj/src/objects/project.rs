use super::fields::Fields;
use super::{Node, Number, ObjectKind};
use crate::error::Result;
use crate::plist::{CommentedString, Dictionary, Fragment, PlistDictionary, PlistValue, Value};
use crate::reference::Reference;
use crate::encoder::EncodeContext;

/// `PBXProject`: the root object of a project graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Project {
    /// Name of the `.xcodeproj` bundle; not stored in the file
    pub name: String,
    pub build_configuration_list: Reference,
    pub compatibility_version: Option<String>,
    pub development_region: Option<String>,
    pub has_scanned_for_encodings: Number,
    pub known_regions: Vec<String>,
    pub main_group: Reference,
    pub product_ref_group: Option<Reference>,
    pub project_dir_path: String,
    /// `{ProductGroup = ...; ProjectRef = ...;}` entries for referenced projects
    pub project_references: Vec<Dictionary>,
    pub project_root: String,
    pub targets: Vec<Reference>,
    pub attributes: Dictionary,
    pub package_references: Vec<Reference>,
}

impl Project {
    fn project_reference_value(objects: &EncodeContext<'_>, entry: &Dictionary) -> PlistValue {
        let dict: PlistDictionary = entry
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => PlistValue::commented(s.as_str(), objects.file_name(s)),
                    other => PlistValue::from(other),
                };
                (CommentedString::new(key.as_str()), value)
            })
            .collect();
        PlistValue::Dictionary(dict)
    }
}

impl Node for Project {
    const KIND: ObjectKind = ObjectKind::Project;

    fn decode(fields: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            name: String::new(),
            build_configuration_list: fields.required_reference("buildConfigurationList")?,
            compatibility_version: fields.string("compatibilityVersion")?,
            development_region: fields.string("developmentRegion")?,
            has_scanned_for_encodings: fields
                .number("hasScannedForEncodings")?
                .unwrap_or_else(|| Number::from(0)),
            known_regions: fields.strings_or_empty("knownRegions")?,
            main_group: fields.required_reference("mainGroup")?,
            product_ref_group: fields.reference("productRefGroup")?,
            project_dir_path: fields.string_or_default("projectDirPath")?,
            project_references: fields.dictionaries("projectReferences")?,
            project_root: fields.string_or_default("projectRoot")?,
            targets: fields.references("targets")?,
            attributes: fields.dictionary("attributes")?.unwrap_or_default(),
            package_references: fields.references("packageReferences")?,
        })
    }

    fn encode(&self, objects: &EncodeContext<'_>, reference: &Reference) -> (CommentedString, PlistValue) {
        let mut fragment = Fragment::new(Self::KIND.isa());
        fragment.set("attributes", PlistValue::from(&self.attributes));
        fragment.set(
            "buildConfigurationList",
            PlistValue::commented(
                self.build_configuration_list.as_str(),
                Some(format!("Build configuration list for PBXProject \"{}\"", self.name)),
            ),
        );
        fragment.set_opt("compatibilityVersion", self.compatibility_version.as_ref());
        fragment.set_opt("developmentRegion", self.development_region.as_ref());
        fragment.set_str("hasScannedForEncodings", self.has_scanned_for_encodings.as_str());
        fragment.set("knownRegions", PlistValue::strings(self.known_regions.iter().cloned()));
        fragment.set_str("mainGroup", self.main_group.as_str());
        if !self.package_references.is_empty() {
            fragment.set(
                "packageReferences",
                PlistValue::Array(
                    self.package_references
                        .iter()
                        .map(|package| {
                            PlistValue::commented(package.as_str(), objects.package_comment(package))
                        })
                        .collect(),
                ),
            );
        }
        if let Some(group) = &self.product_ref_group {
            let name = objects.group(group).and_then(|g| g.element.name.as_deref());
            fragment.set("productRefGroup", PlistValue::commented(group.as_str(), name));
        }
        fragment.set_str("projectDirPath", self.project_dir_path.as_str());
        if !self.project_references.is_empty() {
            fragment.set(
                "projectReferences",
                PlistValue::Array(
                    self.project_references
                        .iter()
                        .map(|entry| Self::project_reference_value(objects, entry))
                        .collect(),
                ),
            );
        }
        fragment.set_str("projectRoot", self.project_root.as_str());
        fragment.set(
            "targets",
            PlistValue::Array(
                self.targets
                    .iter()
                    .map(|target| {
                        let name = objects.target(target).map(|t| t.name.as_str());
                        PlistValue::commented(target.as_str(), name)
                    })
                    .collect(),
            ),
        );
        (
            CommentedString::with_comment(reference.as_str(), Some("Project object")),
            fragment.into_value(),
        )
    }
}
