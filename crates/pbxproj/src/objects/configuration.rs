use super::fields::Fields;
use super::{Node, ObjectKind};
use crate::error::Result;
use crate::plist::{CommentedString, Dictionary, Fragment, PlistValue};
use crate::reference::Reference;
use crate::encoder::EncodeContext;

/// `XCBuildConfiguration`: one named set of build settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildConfiguration {
    pub name: String,
    /// `.xcconfig` file reference the settings are based on
    pub base_configuration_reference: Option<Reference>,
    pub build_settings: Dictionary,
}

impl BuildConfiguration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl Node for BuildConfiguration {
    const KIND: ObjectKind = ObjectKind::BuildConfiguration;

    fn decode(fields: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            name: fields.required_string("name")?,
            base_configuration_reference: fields.reference("baseConfigurationReference")?,
            build_settings: fields.dictionary("buildSettings")?.unwrap_or_default(),
        })
    }

    fn encode(&self, objects: &EncodeContext<'_>, reference: &Reference) -> (CommentedString, PlistValue) {
        let mut fragment = Fragment::new(Self::KIND.isa());
        fragment.set_str("name", self.name.as_str());
        fragment.set("buildSettings", PlistValue::from(&self.build_settings));
        if let Some(base) = &self.base_configuration_reference {
            fragment.set(
                "baseConfigurationReference",
                PlistValue::commented(base.as_str(), objects.file_name(base)),
            );
        }
        (
            CommentedString::with_comment(reference.as_str(), Some(self.name.as_str())),
            fragment.into_value(),
        )
    }
}

/// `XCConfigurationList`: the configurations of a project or target
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationList {
    pub build_configurations: Vec<Reference>,
    pub default_configuration_is_visible: bool,
    pub default_configuration_name: Option<String>,
}

impl Node for ConfigurationList {
    const KIND: ObjectKind = ObjectKind::ConfigurationList;

    fn decode(fields: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            build_configurations: fields.references("buildConfigurations")?,
            default_configuration_is_visible: fields
                .flag("defaultConfigurationIsVisible")?
                .unwrap_or(false),
            default_configuration_name: fields.string("defaultConfigurationName")?,
        })
    }

    fn encode(&self, objects: &EncodeContext<'_>, reference: &Reference) -> (CommentedString, PlistValue) {
        let mut fragment = Fragment::new(Self::KIND.isa());
        fragment.set(
            "buildConfigurations",
            PlistValue::Array(
                self.build_configurations
                    .iter()
                    .map(|config| PlistValue::commented(config.as_str(), objects.config_name(config)))
                    .collect(),
            ),
        );
        fragment.set_flag(
            "defaultConfigurationIsVisible",
            self.default_configuration_is_visible,
        );
        fragment.set_opt("defaultConfigurationName", self.default_configuration_name.as_ref());
        let comment = objects
            .object_with_configuration_list(reference)
            .map(|(kind, name)| format!("Build configuration list for {} \"{}\"", kind.isa(), name));
        (
            CommentedString::with_comment(reference.as_str(), comment),
            fragment.into_value(),
        )
    }
}
