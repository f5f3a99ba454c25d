//! Targets
//!
//! Native, legacy (external build tool) and aggregate targets share
//! [`Target`]. Xcode never writes `buildRules` for aggregate targets and
//! omits it for legacy targets when empty.

use super::fields::Fields;
use super::{Node, ObjectKind, ProductType};
use crate::error::Result;
use crate::plist::{CommentedString, Fragment, PlistValue};
use crate::reference::Reference;
use crate::encoder::EncodeContext;

/// Attributes shared by every target kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    pub build_configuration_list: Option<Reference>,
    pub build_phases: Vec<Reference>,
    pub build_rules: Vec<Reference>,
    pub dependencies: Vec<Reference>,
    pub product_name: Option<String>,
    pub product_reference: Option<Reference>,
    pub product_type: Option<ProductType>,
    pub comments: Option<String>,
}

impl Target {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub(crate) fn decode(fields: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            name: fields.required_string("name")?,
            build_configuration_list: fields.reference("buildConfigurationList")?,
            build_phases: fields.references("buildPhases")?,
            build_rules: fields.references("buildRules")?,
            dependencies: fields.references("dependencies")?,
            product_name: fields.string("productName")?,
            product_reference: fields.reference("productReference")?,
            product_type: fields.string("productType")?.map(|s| ProductType::parse(&s)),
            comments: fields.string("comments")?,
        })
    }

    fn write(&self, kind: ObjectKind, objects: &EncodeContext<'_>, fragment: &mut Fragment) {
        if let Some(list) = &self.build_configuration_list {
            let comment = format!("Build configuration list for {} \"{}\"", kind.isa(), self.name);
            fragment.set("buildConfigurationList", PlistValue::commented(list.as_str(), Some(comment)));
        }
        fragment.set(
            "buildPhases",
            PlistValue::Array(
                self.build_phases
                    .iter()
                    .map(|phase| PlistValue::commented(phase.as_str(), objects.build_phase_name(phase)))
                    .collect(),
            ),
        );
        let write_rules = match kind {
            ObjectKind::AggregateTarget => false,
            ObjectKind::LegacyTarget => !self.build_rules.is_empty(),
            _ => true,
        };
        if write_rules {
            fragment.set(
                "buildRules",
                PlistValue::Array(
                    self.build_rules
                        .iter()
                        .map(|rule| {
                            PlistValue::commented(rule.as_str(), Some(ObjectKind::BuildRule.isa()))
                        })
                        .collect(),
                ),
            );
        }
        fragment.set(
            "dependencies",
            PlistValue::Array(
                self.dependencies
                    .iter()
                    .map(|dep| {
                        PlistValue::commented(dep.as_str(), Some(ObjectKind::TargetDependency.isa()))
                    })
                    .collect(),
            ),
        );
        fragment.set_str("name", self.name.as_str());
        fragment.set_opt("productName", self.product_name.as_ref());
        if let Some(product) = &self.product_reference {
            fragment.set(
                "productReference",
                PlistValue::commented(product.as_str(), objects.file_name(product)),
            );
        }
        fragment.set_opt("productType", self.product_type.as_ref());
        fragment.set_opt("comments", self.comments.as_ref());
    }

    fn key(&self, reference: &Reference) -> CommentedString {
        CommentedString::with_comment(reference.as_str(), Some(self.name.as_str()))
    }
}

/// `PBXNativeTarget`: a target built by Xcode's own build system
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NativeTarget {
    pub base: Target,
    pub product_install_path: Option<String>,
    pub package_product_dependencies: Vec<Reference>,
}

impl NativeTarget {
    pub fn new(name: impl Into<String>, product_type: ProductType) -> Self {
        Self {
            base: Target {
                product_type: Some(product_type),
                ..Target::new(name)
            },
            ..Default::default()
        }
    }
}

impl Node for NativeTarget {
    const KIND: ObjectKind = ObjectKind::NativeTarget;

    fn decode(fields: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            base: Target::decode(fields)?,
            product_install_path: fields.string("productInstallPath")?,
            package_product_dependencies: fields.references("packageProductDependencies")?,
        })
    }

    fn encode(&self, objects: &EncodeContext<'_>, reference: &Reference) -> (CommentedString, PlistValue) {
        let mut fragment = Fragment::new(Self::KIND.isa());
        self.base.write(Self::KIND, objects, &mut fragment);
        fragment.set_opt("productInstallPath", self.product_install_path.as_ref());
        if !self.package_product_dependencies.is_empty() {
            fragment.set(
                "packageProductDependencies",
                PlistValue::Array(
                    self.package_product_dependencies
                        .iter()
                        .map(|dep| PlistValue::commented(dep.as_str(), objects.product_name(dep)))
                        .collect(),
                ),
            );
        }
        (self.base.key(reference), fragment.into_value())
    }
}

/// `PBXLegacyTarget`: a target driven by an external build tool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyTarget {
    pub base: Target,
    pub build_tool_path: Option<String>,
    pub build_arguments_string: Option<String>,
    pub pass_build_settings_in_environment: bool,
    pub build_working_directory: Option<String>,
}

impl Node for LegacyTarget {
    const KIND: ObjectKind = ObjectKind::LegacyTarget;

    fn decode(fields: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            base: Target::decode(fields)?,
            build_tool_path: fields.string("buildToolPath")?,
            build_arguments_string: fields.string("buildArgumentsString")?,
            pass_build_settings_in_environment: fields
                .flag("passBuildSettingsInEnvironment")?
                .unwrap_or(false),
            build_working_directory: fields.string("buildWorkingDirectory")?,
        })
    }

    fn encode(&self, objects: &EncodeContext<'_>, reference: &Reference) -> (CommentedString, PlistValue) {
        let mut fragment = Fragment::new(Self::KIND.isa());
        self.base.write(Self::KIND, objects, &mut fragment);
        fragment.set_opt("buildToolPath", self.build_tool_path.as_ref());
        fragment.set_opt("buildArgumentsString", self.build_arguments_string.as_ref());
        fragment.set_flag(
            "passBuildSettingsInEnvironment",
            self.pass_build_settings_in_environment,
        );
        fragment.set_opt("buildWorkingDirectory", self.build_working_directory.as_ref());
        (self.base.key(reference), fragment.into_value())
    }
}

/// `PBXAggregateTarget`: a target that only groups dependencies and scripts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateTarget {
    pub base: Target,
}

impl Node for AggregateTarget {
    const KIND: ObjectKind = ObjectKind::AggregateTarget;

    fn decode(fields: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            base: Target::decode(fields)?,
        })
    }

    fn encode(&self, objects: &EncodeContext<'_>, reference: &Reference) -> (CommentedString, PlistValue) {
        let mut fragment = Fragment::new(Self::KIND.isa());
        self.base.write(Self::KIND, objects, &mut fragment);
        (self.base.key(reference), fragment.into_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Objects;

    fn has_key(value: &PlistValue, key: &str) -> bool {
        value
            .as_dictionary()
            .unwrap()
            .contains_key(&CommentedString::new(key))
    }

    #[test]
    fn test_build_rules_emission_per_kind() {
        let objects = Objects::default();
        let context = EncodeContext::new(&objects);
        let reference = Reference::from("T_1");

        let native = NativeTarget::new("App", ProductType::Application);
        assert!(has_key(&native.encode(&context, &reference).1, "buildRules"));

        let legacy = LegacyTarget {
            base: Target::new("Make"),
            ..Default::default()
        };
        assert!(!has_key(&legacy.encode(&context, &reference).1, "buildRules"));

        let mut legacy_with_rules = legacy.clone();
        legacy_with_rules.base.build_rules.push(Reference::from("BR_1"));
        assert!(has_key(&legacy_with_rules.encode(&context, &reference).1, "buildRules"));

        let mut aggregate = AggregateTarget {
            base: Target::new("All"),
        };
        aggregate.base.build_rules.push(Reference::from("BR_1"));
        assert!(!has_key(&aggregate.encode(&context, &reference).1, "buildRules"));
    }

    #[test]
    fn test_configuration_list_comment_uses_isa() {
        let mut target = AggregateTarget {
            base: Target::new("All"),
        };
        target.base.build_configuration_list = Some(Reference::from("CL_1"));
        let (key, value) = target.encode(&EncodeContext::new(&Objects::default()), &Reference::from("AT_1"));
        assert_eq!(key.comment.as_deref(), Some("All"));
        assert_eq!(
            value
                .as_dictionary()
                .unwrap()
                .get(&CommentedString::new("buildConfigurationList")),
            Some(&PlistValue::commented(
                "CL_1",
                Some("Build configuration list for PBXAggregateTarget \"All\"")
            ))
        );
    }

    #[test]
    fn test_name_is_required() {
        let dict = crate::plist::Dictionary::new();
        let err = NativeTarget::decode(&Fields::new("PBXNativeTarget", &dict)).unwrap_err();
        assert!(err.to_string().contains("name"));
    }
}
